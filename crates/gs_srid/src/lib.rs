// crates/gs_srid/src/lib.rs

//! GeoSrid SRID 注册表
//!
//! 把坐标系句柄绑定到进程内唯一的整数 SRID，并提供按标签的二级索引。
//!
//! # 模块
//!
//! - `registry`: 注册表（单把读写锁覆盖全部索引）
//! - `item`: 条目、条目参数与扩展表
//! - `tag`: 标签类型
//! - `config`: 注册表配置
//! - `reproject`: 以 SRID 指定源/目标的重投影入口
//!
//! # 示例
//!
//! ```
//! use gs_geo::Crs;
//! use gs_srid::{SridRegistry, SridTag};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Site {
//!     Delft,
//! }
//!
//! impl SridTag for Site {
//!     const KIND: &'static str = "site";
//!     fn code(self) -> i64 {
//!         0
//!     }
//!     fn from_code(code: i64) -> Option<Self> {
//!         (code == 0).then_some(Self::Delft)
//!     }
//! }
//!
//! let registry = SridRegistry::default();
//! let item = registry
//!     .ensure(Site::Delft, || Crs::create("EPSG:28992"), Some(28992))
//!     .unwrap();
//! assert_eq!(item.srid(), 28992);
//! assert_eq!(item.tag::<Site>(), Some(Site::Delft));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod item;
pub mod registry;
pub mod reproject;
pub mod tag;

/// 预导入模块
pub mod prelude {
    pub use crate::config::RegistryConfig;
    pub use crate::error::{SridError, SridResult};
    pub use crate::item::{SridItem, SridItemArgs};
    pub use crate::registry::SridRegistry;
    pub use crate::tag::SridTag;
}

pub use config::{RegistryConfig, DEFAULT_AUTO_SRID_BASE};
pub use error::{SridError, SridResult};
pub use item::{ItemValue, SridItem, SridItemArgs};
pub use registry::SridRegistry;
pub use tag::{SridTag, TagBinding};
