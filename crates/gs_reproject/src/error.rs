// crates/gs_reproject/src/error.rs

//! 重投影错误类型

use gs_foundation::GsError;
use gs_geo::{Coord, GeoError};
use thiserror::Error;

/// 重投影结果类型
pub type ReprojectResult<T> = Result<T, ReprojectError>;

/// 重投影错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReprojectError {
    /// 批量中的某个点无法映射，整批中止
    #[error("第 {index} 个点重投影失败: {point}")]
    ReprojectionFailed {
        /// 点在序列中的下标
        index: usize,
        /// 原始坐标
        point: Coord,
    },

    /// 请求逆向过滤，但转换不可逆
    #[error("转换不可逆: {operation}")]
    NoInverse {
        /// 转换名称
        operation: String,
    },

    /// 打包数据长度与维数不符
    #[error("数据长度 {len} 不是维数 {dimension} 的整数倍")]
    InvalidLayout {
        /// 数据长度
        len: usize,
        /// 维数
        dimension: usize,
    },

    /// 坐标系或转换错误
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl ReprojectError {
    /// 创建单点失败错误
    pub fn failed(index: usize, point: Coord) -> Self {
        Self::ReprojectionFailed { index, point }
    }

    /// 失败点的下标
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            Self::ReprojectionFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<ReprojectError> for GsError {
    fn from(err: ReprojectError) -> Self {
        match err {
            ReprojectError::Geo(inner) => inner.into(),
            ReprojectError::InvalidLayout { .. } => GsError::invalid_input(err.to_string()),
            _ => GsError::transform(err.to_string()),
        }
    }
}
