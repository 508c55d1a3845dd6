// crates/gs_geo/src/lib.rs

//! GeoSrid 坐标系与转换解析
//!
//! 提供坐标参考系统 (CRS) 句柄、原子坐标操作以及转换解析。
//!
//! # 模块
//!
//! - `coord`: 四维坐标元组与“无值”哨兵
//! - `area`: 使用范围
//! - `ellipsoid` / `datum`: 椭球体与大地基准
//! - `projection`: 投影（横轴墨卡托、Web Mercator、斜轴立体）
//! - `crs`: CRS 句柄、EPSG 目录与定义解析
//! - `operation`: 原子操作、Helmert 变换与操作提供者
//! - `node`: 转换节点 (`Single` / `Sequence` / `Candidates`)
//! - `resolver`: 转换解析与排序
//! - `geodesic`: 椭球面距离
//!
//! # 示例
//!
//! ```
//! use gs_geo::prelude::*;
//!
//! let wgs84 = Crs::wgs84();
//! let node = Resolver::default()
//!     .resolve(&wgs84, &wgs84, &TransformOptions::default())
//!     .unwrap();
//! assert!(node.name().starts_with("Null geographic offset"));
//!
//! // EPSG:4326 纬度在前
//! let p = Coord::xy(52.0, 5.0);
//! assert!(node.apply(p).approx_eq(&p, 1e-12));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod area;
pub mod coord;
pub mod crs;
pub mod datum;
pub mod ellipsoid;
pub mod error;
pub mod geodesic;
pub mod node;
pub mod operation;
pub mod options;
pub mod projection;
pub mod resolver;

/// 预导入模块
pub mod prelude {
    pub use crate::area::UsageArea;
    pub use crate::coord::Coord;
    pub use crate::crs::{AxisOrder, Crs, CrsDefinition, CrsDomain};
    pub use crate::error::{GeoError, GeoResult};
    pub use crate::node::{Direction, TransformNode};
    pub use crate::operation::{CoordinateOperation, OperationProvider};
    pub use crate::options::{IntermediateCrsPolicy, TransformOptions};
    pub use crate::resolver::Resolver;
}

// 重导出常用类型
pub use area::UsageArea;
pub use coord::Coord;
pub use crs::{AxisOrder, Crs, CrsDefinition, CrsDomain, CrsId, CrsKind, CrsSpec};
pub use datum::Datum;
pub use ellipsoid::Ellipsoid;
pub use error::{GeoError, GeoResult};
pub use node::{Direction, TransformNode};
pub use operation::{
    BuiltinOperation, BuiltinOperationProvider, CoordinateOperation, DatumShiftEntry,
    OperationPath, OperationProvider, OperationRef,
};
pub use options::{IntermediateCrsPolicy, TransformOptions};
pub use resolver::{normalize_axes, Resolver};
