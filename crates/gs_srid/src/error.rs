// crates/gs_srid/src/error.rs

//! 注册表错误类型

use gs_foundation::GsError;
use gs_geo::GeoError;
use gs_reproject::ReprojectError;
use thiserror::Error;

/// 注册表结果类型
pub type SridResult<T> = Result<T, SridError>;

/// 注册表错误
#[derive(Debug, Error)]
pub enum SridError {
    /// SRID 不存在
    #[error("SRID 不存在: {0}")]
    NotFound(i32),

    /// 标签未登记
    #[error("标签未登记: {kind}={code}")]
    TagNotFound {
        /// 标签类型名
        kind: &'static str,
        /// 标签值
        code: i64,
    },

    /// 同一坐标系实例重复注册
    #[error("坐标系已注册: {crs} (SRID {srid})")]
    DuplicateRegistration {
        /// 已有条目的 SRID
        srid: i32,
        /// 坐标系名称
        crs: String,
    },

    /// 显式 SRID 已被占用
    #[error("SRID {srid} 已被占用: {occupant}")]
    SridOccupied {
        /// 请求的 SRID
        srid: i32,
        /// 占用者名称
        occupant: String,
    },

    /// SRID 无效
    #[error("无效的 SRID {srid}: {reason}")]
    InvalidSrid {
        /// SRID
        srid: i32,
        /// 原因
        reason: String,
    },

    /// 条目已失效或注册表状态异常
    #[error("注册表状态无效: {0}")]
    InvalidState(String),

    /// 坐标系或转换错误
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// 重投影错误
    #[error(transparent)]
    Reproject(#[from] ReprojectError),
}

impl SridError {
    /// 是否为重复注册（同一实例或 SRID 被占用）
    pub fn is_duplicate_registration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRegistration { .. } | Self::SridOccupied { .. }
        )
    }

    /// 是否为查找失败
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::TagNotFound { .. })
    }
}

impl From<SridError> for GsError {
    fn from(err: SridError) -> Self {
        match err {
            SridError::Geo(inner) => inner.into(),
            SridError::Reproject(inner) => inner.into(),
            SridError::NotFound(_) | SridError::TagNotFound { .. } => {
                GsError::not_found(err.to_string())
            }
            _ => GsError::registry(err.to_string()),
        }
    }
}
