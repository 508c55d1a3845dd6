// crates/gs_geo/src/projection/transverse_mercator.rs

//! 高精度横轴墨卡托投影（Karney 2011 算法）
//!
//! 基于 6 阶 Krüger 级数，全球范围（极点附近除外）精度达纳米级。
//! 系数在构造时一次性预计算，正反算只做 Clenshaw 求和。
//!
//! # 参考文献
//!
//! Karney, C. F. F. (2011). "Transverse Mercator with an accuracy of a few nanometers".
//! Journal of Geodesy, 85(8), 475-485.

use super::math_utils::{ang_diff, ang_normalize, polyval, sincosd, tauf, taupf};
use crate::ellipsoid::Ellipsoid;
use num_complex::Complex64;
use std::f64::consts::PI;

// ============================================================================
// 级数系数
// ============================================================================

const MAX_ORDER: usize = 6;

/// alpha 系数（正算），每行末项为分母
const ALPHA_COEFFS: [&[f64]; MAX_ORDER] = [
    &[31564.0, -66675.0, 34440.0, 47250.0, -100800.0, 75600.0, 151200.0],
    &[-1983433.0, 863232.0, 748608.0, -1161216.0, 524160.0, 1935360.0],
    &[670412.0, 406647.0, -533952.0, 184464.0, 725760.0],
    &[6601661.0, -7732800.0, 2230245.0, 7257600.0],
    &[-13675556.0, 3438171.0, 7983360.0],
    &[212378941.0, 319334400.0],
];

/// beta 系数（反算），每行末项为分母
const BETA_COEFFS: [&[f64]; MAX_ORDER] = [
    &[384796.0, -382725.0, -6720.0, 932400.0, -1612800.0, 1209600.0, 2419200.0],
    &[-1118711.0, 1695744.0, -1174656.0, 258048.0, 80640.0, 3870720.0],
    &[22276.0, -16929.0, -15984.0, 12852.0, 362880.0],
    &[-830251.0, -158400.0, 197865.0, 7257600.0],
    &[-435388.0, 453717.0, 15966720.0],
    &[20648693.0, 638668800.0],
];

/// 子午线弧长比例 b1 的系数
const B1_COEFFS: [f64; 5] = [1.0, 4.0, 64.0, 256.0, 256.0];

// ============================================================================
// 参数
// ============================================================================

/// 横轴墨卡托参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercatorParams {
    /// 椭球体
    pub ellipsoid: Ellipsoid,
    /// 中央子午线 (度)
    pub central_meridian: f64,
    /// 比例因子
    pub scale_factor: f64,
    /// 假东 (米)
    pub false_easting: f64,
    /// 假北 (米)
    pub false_northing: f64,
}

impl TransverseMercatorParams {
    /// UTM 分带参数
    #[must_use]
    pub fn utm(zone: u8, north: bool, ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            central_meridian: f64::from(zone) * 6.0 - 183.0,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if north { 0.0 } else { 10_000_000.0 },
        }
    }

    /// 高斯-克吕格 3 度带参数
    ///
    /// `with_zone_prefix` 为 true 时假东加上带号前缀（如 39 带 → 39_500_000）。
    #[must_use]
    pub fn gauss_kruger_3(zone: u8, with_zone_prefix: bool, ellipsoid: Ellipsoid) -> Self {
        let prefix = if with_zone_prefix {
            f64::from(zone) * 1_000_000.0
        } else {
            0.0
        };
        Self {
            ellipsoid,
            central_meridian: f64::from(zone) * 3.0,
            scale_factor: 1.0,
            false_easting: prefix + 500_000.0,
            false_northing: 0.0,
        }
    }

    /// 参数是否在容差内一致
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.ellipsoid.approx_eq(&other.ellipsoid)
            && (self.central_meridian - other.central_meridian).abs() < 1e-10
            && (self.scale_factor - other.scale_factor).abs() < 1e-12
            && (self.false_easting - other.false_easting).abs() < 1e-6
            && (self.false_northing - other.false_northing).abs() < 1e-6
    }
}

// ============================================================================
// 投影
// ============================================================================

/// 预计算好系数的横轴墨卡托投影
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    params: TransverseMercatorParams,
    e2: f64,
    es: f64,
    e2m: f64,
    /// a1 = a * b1
    a1: f64,
    alp: [f64; MAX_ORDER],
    bet: [f64; MAX_ORDER],
}

impl TransverseMercator {
    /// 根据参数预计算投影系数
    #[must_use]
    pub fn new(params: TransverseMercatorParams) -> Self {
        let f = params.ellipsoid.f;
        let e2 = f * (2.0 - f);
        let es = f.signum() * e2.abs().sqrt();
        let n = f / (2.0 - f);

        let b1 = polyval(&B1_COEFFS[..4], n * n) / (B1_COEFFS[4] * (1.0 + n));

        let mut alp = [0.0; MAX_ORDER];
        let mut bet = [0.0; MAX_ORDER];
        let mut d = n;
        for l in 0..MAX_ORDER {
            let ca = ALPHA_COEFFS[l];
            let cb = BETA_COEFFS[l];
            let m = ca.len() - 1;
            alp[l] = d * polyval(&ca[..m], n) / ca[m];
            bet[l] = d * polyval(&cb[..m], n) / cb[m];
            d *= n;
        }

        Self {
            params,
            e2,
            es,
            e2m: 1.0 - e2,
            a1: b1 * params.ellipsoid.a,
            alp,
            bet,
        }
    }

    /// 投影参数
    #[must_use]
    pub fn params(&self) -> &TransverseMercatorParams {
        &self.params
    }

    /// 经纬度（度）-> 投影坐标（米）
    ///
    /// 纬度超出 [-90, 90] 或输入非有限时返回 `None`。
    #[must_use]
    pub fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        let k0 = self.params.scale_factor;

        let lon_diff = ang_diff(self.params.central_meridian, lon);
        let latsign = if lat.is_sign_negative() { -1.0 } else { 1.0 };
        let lonsign = if lon_diff.is_sign_negative() { -1.0 } else { 1.0 };
        let lat = lat.abs();
        let lon_diff = lon_diff.abs();

        let backside = lon_diff > 90.0;
        let lon_diff = if backside { 180.0 - lon_diff } else { lon_diff };

        let (sphi, cphi) = sincosd(lat);
        let (slam, clam) = sincosd(lon_diff);

        let (xip, etap) = if lat == 90.0 {
            (PI / 2.0, 0.0)
        } else {
            let taup = taupf(sphi / cphi, self.es);
            (
                taup.atan2(clam),
                (slam / taup.hypot(clam)).asinh(),
            )
        };

        // Clenshaw 求和
        let c0 = (2.0 * xip).cos();
        let ch0 = (2.0 * etap).cosh();
        let s0 = (2.0 * xip).sin();
        let sh0 = (2.0 * etap).sinh();
        let a = Complex64::new(2.0 * c0 * ch0, -2.0 * s0 * sh0);

        let mut y0 = Complex64::new(0.0, 0.0);
        let mut y1 = Complex64::new(0.0, 0.0);
        for j in (0..MAX_ORDER).rev() {
            let tmp = y0;
            y0 = a * y0 - y1 + self.alp[j];
            y1 = tmp;
        }
        let zeta = Complex64::new(xip, etap) + Complex64::new(s0 * ch0, c0 * sh0) * y0;

        let xi = if backside { PI - zeta.re } else { zeta.re };
        let y = self.a1 * k0 * xi * latsign;
        let x = self.a1 * k0 * zeta.im * lonsign;

        Some((x + self.params.false_easting, y + self.params.false_northing))
    }

    /// 投影坐标（米）-> 经纬度（度）
    #[must_use]
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let k0 = self.params.scale_factor;
        let xi = (y - self.params.false_northing) / (self.a1 * k0);
        let eta = (x - self.params.false_easting) / (self.a1 * k0);

        let xisign = if xi.is_sign_negative() { -1.0 } else { 1.0 };
        let etasign = if eta.is_sign_negative() { -1.0 } else { 1.0 };
        let xi = xi.abs();
        let eta = eta.abs();

        let backside = xi > PI / 2.0;
        let xi = if backside { PI - xi } else { xi };

        let c0 = (2.0 * xi).cos();
        let ch0 = (2.0 * eta).cosh();
        let s0 = (2.0 * xi).sin();
        let sh0 = (2.0 * eta).sinh();
        let a = Complex64::new(2.0 * c0 * ch0, -2.0 * s0 * sh0);

        let mut y0 = Complex64::new(0.0, 0.0);
        let mut y1 = Complex64::new(0.0, 0.0);
        for j in (0..MAX_ORDER).rev() {
            let tmp = y0;
            y0 = a * y0 - y1 - self.bet[j];
            y1 = tmp;
        }
        let zetap = Complex64::new(xi, eta) + Complex64::new(s0 * ch0, c0 * sh0) * y0;
        let (xip, etap) = (zetap.re, zetap.im);

        let s = etap.sinh();
        let c = xip.cos().max(0.0);
        let r = s.hypot(c);

        let (lon, lat) = if r == 0.0 {
            (0.0, 90.0)
        } else {
            let tau = tauf(xip.sin() / r, self.es);
            (s.atan2(c).to_degrees(), tau.atan().to_degrees())
        };

        let lat = lat * xisign;
        let mut lon = lon * etasign;
        if backside {
            lon = 180.0 - lon;
        }
        let lon = ang_normalize(lon + self.params.central_meridian);

        if lon.is_finite() && lat.is_finite() {
            Some((lon, lat))
        } else {
            None
        }
    }

    /// 第一偏心率平方
    #[must_use]
    pub fn e2(&self) -> f64 {
        self.e2
    }

    /// 1 - e²
    #[must_use]
    pub fn e2m(&self) -> f64 {
        self.e2m
    }
}

// ============================================================================
// 测试
// ============================================================================
