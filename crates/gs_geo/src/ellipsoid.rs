// crates/gs_geo/src/ellipsoid.rs

//! 椭球体定义
//!
//! 提供地球椭球体参数与大地坐标/地心坐标互换，
//! 支持 WGS84、GRS80/CGCS2000、Bessel 1841 等标准椭球体。
//!
//! # 示例
//!
//! ```
//! use gs_geo::ellipsoid::Ellipsoid;
//!
//! let wgs84 = Ellipsoid::WGS84;
//! let (x, y, z) = wgs84.geodetic_to_geocentric(0.0, 0.0, 0.0);
//! assert!((x - wgs84.a).abs() < 1e-6);
//! assert!(y.abs() < 1e-6 && z.abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

/// 地球椭球体
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// 长半轴 (m)
    pub a: f64,
    /// 扁率 (flattening)
    pub f: f64,
}

impl Ellipsoid {
    // ========================================================================
    // 预定义椭球体
    // ========================================================================

    /// WGS84 椭球体 (EPSG:7030)
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// GRS 1980 椭球体 (EPSG:7019)，ETRS89 使用
    pub const GRS80: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };

    /// CGCS2000 椭球体 (EPSG:1024)，参数与 GRS80 相同
    pub const CGCS2000: Self = Self::GRS80;

    /// Bessel 1841 椭球体 (EPSG:7004)，Amersfoort 使用
    pub const BESSEL_1841: Self = Self {
        a: 6_377_397.155,
        f: 1.0 / 299.152_812_8,
    };

    /// 克拉索夫斯基椭球体 (EPSG:7024)
    pub const KRASSOVSKY: Self = Self {
        a: 6_378_245.0,
        f: 1.0 / 298.3,
    };

    /// 国际椭球体 1924 (EPSG:7022)
    pub const INTERNATIONAL_1924: Self = Self {
        a: 6_378_388.0,
        f: 1.0 / 297.0,
    };

    // ========================================================================
    // 构造方法
    // ========================================================================

    /// 从长半轴和扁率创建椭球体
    #[must_use]
    pub const fn new(a: f64, f: f64) -> Self {
        Self { a, f }
    }

    /// 从 EPSG 椭球体代码获取
    #[must_use]
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            7030 => Some(Self::WGS84),
            7019 | 1024 => Some(Self::GRS80),
            7004 => Some(Self::BESSEL_1841),
            7024 => Some(Self::KRASSOVSKY),
            7022 => Some(Self::INTERNATIONAL_1924),
            _ => None,
        }
    }

    // ========================================================================
    // 派生参数
    // ========================================================================

    /// 短半轴 b = a(1-f)
    #[inline]
    #[must_use]
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// 第一偏心率的平方 e² = 2f - f²
    #[inline]
    #[must_use]
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// 第一偏心率 e
    #[inline]
    #[must_use]
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// 第三扁率 n = f/(2-f)
    #[inline]
    #[must_use]
    pub fn n(&self) -> f64 {
        self.f / (2.0 - self.f)
    }

    /// 卯酉圈曲率半径 N = a / √(1-e²sin²φ)
    #[inline]
    #[must_use]
    pub fn prime_vertical_radius(&self, lat_rad: f64) -> f64 {
        let sin_lat = lat_rad.sin();
        self.a / (1.0 - self.e2() * sin_lat * sin_lat).sqrt()
    }

    /// 子午圈曲率半径 M = a(1-e²) / (1-e²sin²φ)^(3/2)
    #[inline]
    #[must_use]
    pub fn meridional_radius(&self, lat_rad: f64) -> f64 {
        let sin_lat = lat_rad.sin();
        let e2 = self.e2();
        self.a * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5)
    }

    /// 两个椭球体参数是否在容差内一致
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.a - other.a).abs() < 1e-4 && (self.f - other.f).abs() < 1e-12
    }

    // ========================================================================
    // 大地坐标 <-> 地心坐标
    // ========================================================================

    /// 大地坐标（经度、纬度：度；高程：米）转地心直角坐标
    #[must_use]
    pub fn geodetic_to_geocentric(&self, lon: f64, lat: f64, h: f64) -> (f64, f64, f64) {
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
        let n = self.a / (1.0 - self.e2() * sin_lat * sin_lat).sqrt();
        (
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - self.e2()) + h) * sin_lat,
        )
    }

    /// 地心直角坐标转大地坐标（经度、纬度：度；高程：米）
    ///
    /// 迭代求解，收敛到亚毫米级。
    #[must_use]
    pub fn geocentric_to_geodetic(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        const MAX_ITER: usize = 10;
        const TOL: f64 = 1e-12;

        let e2 = self.e2();
        let p = x.hypot(y);
        let lon = y.atan2(x);

        if p < 1e-9 {
            // 极轴上
            let lat = if z >= 0.0 { 90.0 } else { -90.0 };
            return (lon.to_degrees(), lat, z.abs() - self.b());
        }

        let mut lat = z.atan2(p * (1.0 - e2));
        for _ in 0..MAX_ITER {
            let (sin_lat, cos_lat) = lat.sin_cos();
            let n = self.prime_vertical_radius(lat);
            let h = p * cos_lat + z * sin_lat - self.a * self.a / n;
            let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
            let done = (next - lat).abs() < TOL;
            lat = next;
            if done {
                break;
            }
        }

        // 高程取最终纬度
        let (sin_lat, cos_lat) = lat.sin_cos();
        let h = p * cos_lat + z * sin_lat - self.a * self.a / self.prime_vertical_radius(lat);
        (lon.to_degrees(), lat.to_degrees(), h)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl std::fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ellipsoid(a={}, f=1/{:.6})", self.a, 1.0 / self.f)
    }
}

// ============================================================================
// 测试
// ============================================================================
