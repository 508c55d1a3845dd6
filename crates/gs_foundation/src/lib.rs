// crates/gs_foundation/src/lib.rs

//! GeoSrid 基础层
//!
//! 提供整个工作区共用的基础设施：
//!
//! - `error`: 统一错误类型 `GsError` / `GsResult`
//! - `precision`: 坐标精度模型 `PrecisionModel`
//!
//! 本层不依赖任何其他 `gs_*` crate。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod precision;

/// 预导入模块
pub mod prelude {
    pub use crate::error::{GsError, GsResult};
    pub use crate::precision::PrecisionModel;
}

pub use error::{GsError, GsResult};
pub use precision::{PrecisionModel, PrecisionParseError};
