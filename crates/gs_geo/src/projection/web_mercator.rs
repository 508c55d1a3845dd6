// crates/gs_geo/src/projection/web_mercator.rs

//! Web Mercator 投影 (EPSG:3857)
//!
//! 也称为 Pseudo Mercator。把 WGS84 经纬度直接当作球面坐标投影，
//! 不做椭球改正，仅适用于底图显示。

use crate::ellipsoid::Ellipsoid;
use std::f64::consts::PI;

/// 球半径（等于 WGS84 长半轴）
pub const WEB_MERCATOR_RADIUS: f64 = Ellipsoid::WGS84.a;

/// 最大纬度 (度)，对应 y = ±20037508.34 米
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779;

/// Web Mercator 投影
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WebMercator;

impl WebMercator {
    /// 经纬度 -> 投影坐标；纬度裁剪到 ±85.05°，超出 ±90° 返回 `None`
    #[must_use]
    pub fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let lat = lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT);
        let x = WEB_MERCATOR_RADIUS * lon.to_radians();
        let y = WEB_MERCATOR_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
        Some((x, y))
    }

    /// 投影坐标 -> 经纬度
    #[must_use]
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
        let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Some((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let (x, y) = WebMercator.forward(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-9 && y.abs() < 1e-9);
    }

    #[test]
    fn test_extent() {
        let (x, y) = WebMercator.forward(180.0, WEB_MERCATOR_MAX_LAT).unwrap();
        assert!((x - 20_037_508.342_789).abs() < 1e-3);
        assert!((y - 20_037_508.342_789).abs() < 1.0);
    }

    #[test]
    fn test_round_trip() {
        let (x, y) = WebMercator.forward(116.39, 39.91).unwrap();
        let (lon, lat) = WebMercator.inverse(x, y).unwrap();
        assert!((lon - 116.39).abs() < 1e-10);
        assert!((lat - 39.91).abs() < 1e-10);
    }
}
