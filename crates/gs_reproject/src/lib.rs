// crates/gs_reproject/src/lib.rs

//! GeoSrid 坐标序列与重投影
//!
//! # 模块
//!
//! - `sequence`: 坐标序列接口、打包序列与逐点序列
//! - `factory`: 按 SRID / 精度 / 布局创建序列
//! - `filter`: 重投影过滤器（逐点与打包快速路径）
//!
//! # 示例
//!
//! ```
//! use gs_foundation::PrecisionModel;
//! use gs_geo::normalize_axes;
//! use gs_geo::prelude::*;
//! use gs_reproject::{reproject_sequence, CoordinateSequence, Ordinates, PackedSequence};
//!
//! let wgs84 = Crs::wgs84();
//! let node = Resolver::default()
//!     .resolve(&wgs84, &normalize_axes(&wgs84), &TransformOptions::default())
//!     .unwrap();
//! let mut seq = PackedSequence::from_coords(Ordinates::Xy, &[Coord::xy(52.0, 5.0)]);
//! reproject_sequence(&mut seq, &node, &PrecisionModel::Floating).unwrap();
//! assert_eq!(seq.get(0).x, 5.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod factory;
pub mod filter;
pub mod sequence;

/// 预导入模块
pub mod prelude {
    pub use crate::error::{ReprojectError, ReprojectResult};
    pub use crate::factory::{SequenceFactory, SequenceLayout};
    pub use crate::filter::{reproject_sequence, ReprojectFilter, SequenceFilter};
    pub use crate::sequence::{
        CoordinateArraySequence, CoordinateSequence, Ordinates, PackedSequence,
    };
}

pub use error::{ReprojectError, ReprojectResult};
pub use factory::{SequenceFactory, SequenceLayout};
pub use filter::{
    reproject_sequence, GenericReprojectFilter, PackedReprojectFilter, ReprojectFilter,
    SequenceFilter,
};
pub use sequence::{CoordinateArraySequence, CoordinateSequence, Ordinates, PackedSequence};
