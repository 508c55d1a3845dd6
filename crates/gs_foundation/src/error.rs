// crates/gs_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `GsError` 枚举和 `GsResult` 类型别名，作为整个工作区的汇聚错误类型。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义通用错误，坐标系、注册表等错误在各自 crate 中定义，
//!    并通过 `From` 转换汇入 `GsError`
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **可追溯**: 支持错误链
//!
//! # 示例
//!
//! ```
//! use gs_foundation::error::{GsError, GsResult};
//!
//! fn load() -> GsResult<()> {
//!     Err(GsError::config("配置文件格式错误"))
//! }
//! assert!(load().is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type GsResult<T> = Result<T, GsError>;

/// GeoSrid 错误类型
///
/// 下游 crate 的错误（坐标系解析、转换解析、重投影、SRID 注册表）
/// 各自实现 `From<..> for GsError`，应用层可用同一类型汇总处理。
#[derive(Error, Debug)]
pub enum GsError {
    // ========================================================================
    // 输入与配置
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 具体错误信息
        message: String,
    },

    // ========================================================================
    // 坐标系与转换
    // ========================================================================

    /// 坐标参考系统错误
    #[error("坐标系错误: {message}")]
    Crs {
        /// 具体错误信息
        message: String,
    },

    /// 坐标转换错误
    #[error("坐标转换错误: {message}")]
    Transform {
        /// 具体错误信息
        message: String,
    },

    /// SRID 注册表错误
    #[error("SRID 注册表错误: {message}")]
    Registry {
        /// 具体错误信息
        message: String,
    },

    /// 资源未找到
    #[error("未找到: {resource}")]
    NotFound {
        /// 资源描述
        resource: String,
    },
}

// ============================================================================
// 便捷构造方法
// ============================================================================

impl GsError {
    /// 创建无效输入错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建范围错误
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 创建序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 创建坐标系错误
    pub fn crs(message: impl Into<String>) -> Self {
        Self::Crs {
            message: message.into(),
        }
    }

    /// 创建坐标转换错误
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }

    /// 创建注册表错误
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// 创建未找到错误
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 是否为“未找到”类错误（调用方通常可自行回退）
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for GsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
