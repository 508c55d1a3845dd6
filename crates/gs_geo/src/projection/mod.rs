// crates/gs_geo/src/projection/mod.rs

//! 地图投影
//!
//! 内置投影均以经纬度（度，经度在前）为输入，输出东向/北向米制坐标。
//! 定义域外的点返回 `None`，由上层转为“无值”哨兵。
//!
//! - 横轴墨卡托（UTM、ETRS89-UTM、高斯-克吕格）
//! - Web Mercator
//! - 斜轴立体（RD New）

pub mod math_utils;
pub mod oblique_stereographic;
pub mod transverse_mercator;
pub mod web_mercator;

use crate::ellipsoid::Ellipsoid;
pub use oblique_stereographic::{ObliqueStereographic, ObliqueStereographicParams};
pub use transverse_mercator::{TransverseMercator, TransverseMercatorParams};
pub use web_mercator::WebMercator;

/// 投影（静态分发）
#[derive(Debug, Clone)]
pub enum Projection {
    /// 横轴墨卡托
    TransverseMercator(TransverseMercator),
    /// Web Mercator
    WebMercator(WebMercator),
    /// 斜轴立体
    ObliqueStereographic(ObliqueStereographic),
}

impl Projection {
    /// 创建横轴墨卡托投影
    #[must_use]
    pub fn transverse_mercator(params: TransverseMercatorParams) -> Self {
        Self::TransverseMercator(TransverseMercator::new(params))
    }

    /// 创建斜轴立体投影
    #[must_use]
    pub fn oblique_stereographic(params: ObliqueStereographicParams) -> Self {
        Self::ObliqueStereographic(ObliqueStereographic::new(params))
    }

    /// 经纬度 -> 投影坐标
    #[inline]
    #[must_use]
    pub fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        match self {
            Self::TransverseMercator(p) => p.forward(lon, lat),
            Self::WebMercator(p) => p.forward(lon, lat),
            Self::ObliqueStereographic(p) => p.forward(lon, lat),
        }
    }

    /// 投影坐标 -> 经纬度
    #[inline]
    #[must_use]
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            Self::TransverseMercator(p) => p.inverse(x, y),
            Self::WebMercator(p) => p.inverse(x, y),
            Self::ObliqueStereographic(p) => p.inverse(x, y),
        }
    }

    /// 投影方法名
    #[must_use]
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::TransverseMercator(_) => "Transverse Mercator",
            Self::WebMercator(_) => "Popular Visualisation Pseudo Mercator",
            Self::ObliqueStereographic(_) => "Oblique Stereographic",
        }
    }

    /// 投影使用的椭球体；Web Mercator 视为 WGS84 球面
    #[must_use]
    pub fn ellipsoid(&self) -> Ellipsoid {
        match self {
            Self::TransverseMercator(p) => p.params().ellipsoid,
            Self::WebMercator(_) => Ellipsoid::WGS84,
            Self::ObliqueStereographic(p) => p.params().ellipsoid,
        }
    }

    /// 方法与参数是否一致
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TransverseMercator(a), Self::TransverseMercator(b)) => {
                a.params().approx_eq(b.params())
            }
            (Self::WebMercator(_), Self::WebMercator(_)) => true,
            (Self::ObliqueStereographic(a), Self::ObliqueStereographic(b)) => {
                a.params().approx_eq(b.params())
            }
            _ => false,
        }
    }
}
