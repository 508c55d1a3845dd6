// crates/gs_config/src/lib.rs

//! GeoSrid 配置层
//!
//! 读取 JSON 配置文件，按其中的种子列表初始化 SRID 注册表。
//!
//! # 模块
//!
//! - [`srid_config`]: `SridConfig` 与种子坐标系
//! - [`error`]: 配置错误类型
//!
//! # 示例
//!
//! ```
//! use gs_config::SridConfig;
//!
//! let config = SridConfig::from_json_str(
//!     r#"{ "seeds": [ { "srid": 28992, "definition": "EPSG:28992" } ] }"#,
//! )
//! .unwrap();
//! let registry = config.build_registry().unwrap();
//! assert!(registry.get_by_srid(28992).is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod srid_config;

pub use error::ConfigError;
pub use srid_config::{SeedCrs, SridConfig};
