// crates/gs_geo/src/area.rs

//! 使用范围（经纬度包围盒）
//!
//! `UsageArea` 描述坐标操作声明精度有效的地理范围，以 WGS 84 经纬度（度）表示。
//! `west > east` 表示跨越 180° 经线的范围。

use serde::{Deserialize, Serialize};

/// 经纬度包围盒
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageArea {
    /// 范围名称
    #[serde(default)]
    pub name: String,
    /// 西边界经度
    pub west: f64,
    /// 南边界纬度
    pub south: f64,
    /// 东边界经度
    pub east: f64,
    /// 北边界纬度
    pub north: f64,
}

impl UsageArea {
    /// 创建未命名范围
    #[must_use]
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            name: String::new(),
            west,
            south,
            east,
            north,
        }
    }

    /// 创建命名范围
    #[must_use]
    pub fn named(name: impl Into<String>, west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            name: name.into(),
            ..Self::new(west, south, east, north)
        }
    }

    /// 全球范围
    #[must_use]
    pub fn world() -> Self {
        Self::named("World", -180.0, -90.0, 180.0, 90.0)
    }

    /// 是否跨越 180° 经线
    #[inline]
    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// 经度区间（跨越 180° 时拆为两段）
    fn lon_intervals(&self) -> Vec<(f64, f64)> {
        if self.crosses_antimeridian() {
            vec![(self.west, 180.0), (-180.0, self.east)]
        } else {
            vec![(self.west, self.east)]
        }
    }

    /// 经度跨度（度）
    #[must_use]
    pub fn width(&self) -> f64 {
        self.lon_intervals().iter().map(|(w, e)| e - w).sum()
    }

    /// 纬度跨度（度）
    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// 面积（平方度）
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// 点是否在范围内（边界包含）
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if !(self.south..=self.north).contains(&lat) {
            return false;
        }
        self.lon_intervals()
            .iter()
            .any(|&(w, e)| (w..=e).contains(&lon))
    }

    /// 两个范围是否相交
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection(other).is_some()
    }

    /// 交集范围，不相交时返回 `None`
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let south = self.south.max(other.south);
        let north = self.north.min(other.north);
        if south > north {
            return None;
        }

        let mut parts = Vec::new();
        for (w1, e1) in self.lon_intervals() {
            for (w2, e2) in other.lon_intervals() {
                let w = w1.max(w2);
                let e = e1.min(e2);
                if w <= e {
                    parts.push((w, e));
                }
            }
        }

        let (west, east) = match parts.as_slice() {
            [] => return None,
            [(w, e)] => (*w, *e),
            [(w, e1), (w2, e)] if *e1 >= 180.0 && *w2 <= -180.0 => (*w, *e),
            [(w2, e), (w, e1)] if *e1 >= 180.0 && *w2 <= -180.0 => (*w, *e),
            _ => {
                let w = parts.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
                let e = parts.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
                (w, e)
            }
        };

        Some(Self {
            name: if self.name.is_empty() {
                other.name.clone()
            } else {
                self.name.clone()
            },
            west,
            south,
            east,
            north,
        })
    }

    /// `aoi` 被本范围覆盖的比例 (0..=1)
    ///
    /// 零面积的 `aoi`（单点或线）在被包含时返回 1。
    #[must_use]
    pub fn overlap_fraction(&self, aoi: &Self) -> f64 {
        let Some(inter) = self.intersection(aoi) else {
            return 0.0;
        };
        let total = aoi.area();
        if total <= 0.0 {
            return 1.0;
        }
        (inter.area() / total).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_and_area() {
        let nl = UsageArea::named("Netherlands", 3.2, 50.75, 7.22, 53.7);
        assert!(nl.contains(5.0, 52.0));
        assert!(!nl.contains(9.0, 52.0));
        assert!((nl.area() - 4.02 * 2.95).abs() < 1e-9);
    }

    #[test]
    fn test_intersection() {
        let a = UsageArea::new(0.0, 0.0, 10.0, 10.0);
        let b = UsageArea::new(5.0, 5.0, 15.0, 15.0);
        let i = a.intersection(&b).unwrap();
        assert_eq!((i.west, i.south, i.east, i.north), (5.0, 5.0, 10.0, 10.0));
        assert!(!a.intersects(&UsageArea::new(11.0, 0.0, 12.0, 1.0)));
    }

    #[test]
    fn test_antimeridian() {
        let fiji = UsageArea::new(170.0, -20.0, -170.0, -10.0);
        assert!(fiji.crosses_antimeridian());
        assert!(fiji.contains(179.0, -15.0));
        assert!(fiji.contains(-179.0, -15.0));
        assert!(!fiji.contains(0.0, -15.0));
        assert!((fiji.width() - 20.0).abs() < 1e-12);

        let i = fiji.intersection(&UsageArea::world()).unwrap();
        assert_eq!((i.west, i.east), (170.0, -170.0));
    }

    #[test]
    fn test_overlap_fraction() {
        let op = UsageArea::new(0.0, 0.0, 10.0, 10.0);
        let aoi = UsageArea::new(5.0, 0.0, 15.0, 10.0);
        assert!((op.overlap_fraction(&aoi) - 0.5).abs() < 1e-12);
        let point = UsageArea::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(op.overlap_fraction(&point), 1.0);
    }
}
