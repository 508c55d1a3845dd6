// crates/gs_geo/src/error.rs

//! 坐标系与转换错误类型
//!
//! `GeoError` 覆盖坐标系创建、转换解析与逆向应用的失败情形，
//! 可通过 `From` 汇入 `gs_foundation::GsError`。

use gs_foundation::GsError;
use thiserror::Error;

/// 坐标系模块结果类型
pub type GeoResult<T> = Result<T, GeoError>;

/// 坐标系与转换错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// 在给定选项下找不到任何转换路径
    #[error("找不到转换路径: {source_crs} -> {target_crs} ({reason})")]
    NoPathFound {
        /// 源坐标系名称
        source_crs: String,
        /// 目标坐标系名称
        target_crs: String,
        /// 失败原因
        reason: String,
    },

    /// 操作不可逆
    #[error("操作不可逆: {operation}")]
    NoInverse {
        /// 操作名称
        operation: String,
    },

    /// 不支持的 EPSG 代码
    #[error("不支持的 EPSG 代码: {code}")]
    UnsupportedEpsg {
        /// EPSG 代码
        code: u32,
    },

    /// 坐标系定义无法解析
    #[error("无法解析坐标系定义 '{definition}': {reason}")]
    CrsParseFailed {
        /// 原始定义
        definition: String,
        /// 原因
        reason: String,
    },

    /// 参数无效
    #[error("参数无效: {name}={value} ({reason})")]
    InvalidParameter {
        /// 参数名
        name: &'static str,
        /// 参数值
        value: String,
        /// 原因
        reason: String,
    },

    /// 两个坐标系维度或域不兼容，无法构造转换
    #[error("坐标系不兼容: {source_crs} -> {target_crs} ({reason})")]
    IncompatibleCrs {
        /// 源坐标系名称
        source_crs: String,
        /// 目标坐标系名称
        target_crs: String,
        /// 原因
        reason: String,
    },
}

impl GeoError {
    /// 创建路径缺失错误
    pub fn no_path_found(
        source_crs: impl Into<String>,
        target_crs: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::NoPathFound {
            source_crs: source_crs.into(),
            target_crs: target_crs.into(),
            reason: reason.into(),
        }
    }

    /// 创建不可逆错误
    pub fn no_inverse(operation: impl Into<String>) -> Self {
        Self::NoInverse {
            operation: operation.into(),
        }
    }

    /// 创建解析失败错误
    pub fn parse_failed(definition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CrsParseFailed {
            definition: definition.into(),
            reason: reason.into(),
        }
    }

    /// 创建参数无效错误
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<GeoError> for GsError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::NoPathFound { .. } | GeoError::NoInverse { .. } => {
                GsError::transform(err.to_string())
            }
            GeoError::InvalidParameter { .. } => GsError::invalid_input(err.to_string()),
            _ => GsError::crs(err.to_string()),
        }
    }
}
