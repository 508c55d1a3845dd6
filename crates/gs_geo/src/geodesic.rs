// crates/gs_geo/src/geodesic.rs

//! 椭球面测地距离
//!
//! - [`vincenty_distance`]: Vincenty 反算公式，毫米级精度，近对跖点可能不收敛
//! - [`haversine_distance`]: 球面大圆距离，用于不收敛时的估算

use crate::ellipsoid::Ellipsoid;

const MAX_ITER: usize = 200;
const TOLERANCE: f64 = 1e-12;

/// 地球平均半径 (米)
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// Vincenty 公式计算椭球面距离
///
/// 输入为经纬度（度）。迭代不收敛或输入非有限时返回 `None`。
#[must_use]
pub fn vincenty_distance(
    ellipsoid: &Ellipsoid,
    lon1: f64,
    lat1: f64,
    lon2: f64,
    lat2: f64,
) -> Option<f64> {
    if !(lon1.is_finite() && lat1.is_finite() && lon2.is_finite() && lat2.is_finite()) {
        return None;
    }
    if lat1.abs() > 90.0 || lat2.abs() > 90.0 {
        return None;
    }

    let a = ellipsoid.a;
    let f = ellipsoid.f;
    let b = ellipsoid.b();

    let l = (lon2 - lon1).to_radians();

    // 归化纬度
    let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;
    let mut cos_sq_alpha = 0.0;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut cos_2sigma_m = 0.0;
    let mut sigma = 0.0;

    for _ in 0..MAX_ITER {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        if sin_sigma < 1e-12 {
            // 两点重合
            return Some(0.0);
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha.powi(2);

        cos_2sigma_m = if cos_sq_alpha.abs() < 1e-12 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - lambda_prev).abs() < TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return None;
    }

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let aa = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let bb = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let delta_sigma = bb
        * sin_sigma
        * (cos_2sigma_m
            + bb / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - bb / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

    Some(b * aa * (sigma - delta_sigma))
}

/// Haversine 大圆距离（度输入，米输出）
#[must_use]
pub fn haversine_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64, radius: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlat = phi2 - phi1;
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * radius * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vincenty_flinders_buninyong() {
        // Vincenty (1975) 原文算例
        let d = vincenty_distance(
            &Ellipsoid::GRS80,
            144.424_867_888_889,
            -37.951_033_416_667,
            143.926_495_527_778,
            -37.652_821_138_889,
        )
        .unwrap();
        assert!((d - 54_972.271).abs() < 1e-3, "d={d}");
    }

    #[test]
    fn test_vincenty_equator_degree() {
        let d = vincenty_distance(&Ellipsoid::WGS84, 0.0, 0.0, 1.0, 0.0).unwrap();
        assert!((d - 111_319.490_793).abs() < 1e-3, "d={d}");
    }

    #[test]
    fn test_same_point() {
        assert_eq!(vincenty_distance(&Ellipsoid::WGS84, 5.0, 52.0, 5.0, 52.0), Some(0.0));
    }

    #[test]
    fn test_invalid_input() {
        assert!(vincenty_distance(&Ellipsoid::WGS84, f64::NAN, 0.0, 1.0, 0.0).is_none());
        assert!(vincenty_distance(&Ellipsoid::WGS84, 0.0, 95.0, 1.0, 0.0).is_none());
    }

    #[test]
    fn test_nearly_antipodal_does_not_converge() {
        assert!(vincenty_distance(&Ellipsoid::WGS84, 0.0, 0.0, 179.7, 0.5).is_none());
    }

    #[test]
    fn test_haversine_close_to_vincenty() {
        let h = haversine_distance(4.9, 52.37, 5.12, 52.09, EARTH_MEAN_RADIUS);
        let v = vincenty_distance(&Ellipsoid::WGS84, 4.9, 52.37, 5.12, 52.09).unwrap();
        assert!((h - v).abs() / v < 0.005);
    }
}
