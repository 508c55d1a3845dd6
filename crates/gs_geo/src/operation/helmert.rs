// crates/gs_geo/src/operation/helmert.rs

//! Helmert 七参数 / 十四参数地心坐标变换（位置矢量约定）
//!
//! X' = T + (1 + s)·R·X，其中
//!
//! ```text
//!     |  1   -rz   ry |
//! R = |  rz   1   -rx |
//!     | -ry   rx   1  |
//! ```
//!
//! 平移单位为米，旋转为角秒，尺度为 ppm。时间相关变换的每个参数
//! 按 `p(t) = p + rate·(t - reference_epoch)` 取值；未给出历元时取参考历元。

use serde::{Deserialize, Serialize};

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);
const PPM: f64 = 1e-6;

/// 七个 Helmert 参数
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HelmertValues {
    /// X 平移 (m)
    pub tx: f64,
    /// Y 平移 (m)
    pub ty: f64,
    /// Z 平移 (m)
    pub tz: f64,
    /// X 旋转 (角秒)
    pub rx: f64,
    /// Y 旋转 (角秒)
    pub ry: f64,
    /// Z 旋转 (角秒)
    pub rz: f64,
    /// 尺度差 (ppm)
    pub ds: f64,
}

impl HelmertValues {
    fn scaled_add(&self, rate: &Self, dt: f64) -> Self {
        Self {
            tx: self.tx + rate.tx * dt,
            ty: self.ty + rate.ty * dt,
            tz: self.tz + rate.tz * dt,
            rx: self.rx + rate.rx * dt,
            ry: self.ry + rate.ry * dt,
            rz: self.rz + rate.rz * dt,
            ds: self.ds + rate.ds * dt,
        }
    }

    /// (平移, (1+s)·R)
    fn matrix(&self) -> ([f64; 3], [[f64; 3]; 3]) {
        let m = 1.0 + self.ds * PPM;
        let rx = self.rx * ARCSEC_TO_RAD;
        let ry = self.ry * ARCSEC_TO_RAD;
        let rz = self.rz * ARCSEC_TO_RAD;
        (
            [self.tx, self.ty, self.tz],
            [
                [m, -m * rz, m * ry],
                [m * rz, m, -m * rx],
                [-m * ry, m * rx, m],
            ],
        )
    }
}

/// Helmert 变换参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Helmert {
    /// 参考历元处的参数
    pub values: HelmertValues,
    /// 每年变化率，`None` 表示静态变换
    #[serde(default)]
    pub rates: Option<HelmertValues>,
    /// 参考历元（十进制年）
    #[serde(default)]
    pub reference_epoch: f64,
}

impl Helmert {
    /// 三参数平移
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::seven_parameter(tx, ty, tz, 0.0, 0.0, 0.0, 0.0)
    }

    /// 七参数
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn seven_parameter(tx: f64, ty: f64, tz: f64, rx: f64, ry: f64, rz: f64, ds: f64) -> Self {
        Self {
            values: HelmertValues {
                tx,
                ty,
                tz,
                rx,
                ry,
                rz,
                ds,
            },
            rates: None,
            reference_epoch: 0.0,
        }
    }

    /// 全零（空）变换
    #[must_use]
    pub fn null() -> Self {
        Self::translation(0.0, 0.0, 0.0)
    }

    /// 附加变化率，变为十四参数时间相关变换
    #[must_use]
    pub fn with_rates(mut self, rates: HelmertValues, reference_epoch: f64) -> Self {
        self.rates = Some(rates);
        self.reference_epoch = reference_epoch;
        self
    }

    /// 是否时间相关
    #[inline]
    #[must_use]
    pub fn is_time_dependent(&self) -> bool {
        self.rates.is_some()
    }

    /// 给定历元处的有效参数；`epoch` 非有限时取参考历元
    #[must_use]
    pub fn values_at(&self, epoch: f64) -> HelmertValues {
        match &self.rates {
            Some(rates) if epoch.is_finite() => {
                self.values.scaled_add(rates, epoch - self.reference_epoch)
            }
            _ => self.values,
        }
    }

    /// 地心坐标正变换
    #[must_use]
    pub fn forward(&self, xyz: [f64; 3], epoch: f64) -> [f64; 3] {
        let (t, r) = self.values_at(epoch).matrix();
        let mut out = t;
        for (i, row) in r.iter().enumerate() {
            out[i] += row[0] * xyz[0] + row[1] * xyz[1] + row[2] * xyz[2];
        }
        out
    }

    /// 地心坐标逆变换（精确求解 3x3 线性方程），矩阵奇异时返回 `None`
    #[must_use]
    pub fn inverse(&self, xyz: [f64; 3], epoch: f64) -> Option<[f64; 3]> {
        let (t, r) = self.values_at(epoch).matrix();
        let b = [xyz[0] - t[0], xyz[1] - t[1], xyz[2] - t[2]];

        let det = r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
            - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
            + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0]);
        if det.abs() < 1e-15 {
            return None;
        }

        // Cramer 法则
        let solve = |col: usize| {
            let mut m = r;
            for (row, value) in m.iter_mut().zip(b) {
                row[col] = value;
            }
            (m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
                - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
                + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]))
                / det
        };
        Some([solve(0), solve(1), solve(2)])
    }
}
