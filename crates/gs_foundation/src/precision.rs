// crates/gs_foundation/src/precision.rs

//! 坐标精度模型
//!
//! 提供 `PrecisionModel` 枚举，用于在重投影写回坐标前对 X/Y 做舍入。
//! 三种模型：
//!
//! - `Floating`: 双精度，不舍入
//! - `FloatingSingle`: 舍入到单精度可表示的值
//! - `Fixed { scale }`: 舍入到 `1/scale` 网格（如 `scale = 1000` 即毫米）

use crate::error::{GsError, GsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 坐标精度模型
///
/// # 示例
///
/// ```rust
/// use gs_foundation::PrecisionModel;
///
/// let mm = PrecisionModel::fixed(1000.0);
/// assert_eq!(mm.make_precise(1.23456), 1.235);
/// assert_eq!(PrecisionModel::Floating.make_precise(1.23456), 1.23456);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrecisionModel {
    /// 双精度浮点，值原样保留
    #[default]
    Floating,
    /// 单精度浮点，值舍入到 f32
    FloatingSingle,
    /// 固定网格，值舍入到 `1/scale` 的整数倍
    Fixed {
        /// 比例因子（每单位的网格数，必须为正）
        scale: f64,
    },
}

impl PrecisionModel {
    /// 创建固定精度模型
    #[must_use]
    pub const fn fixed(scale: f64) -> Self {
        Self::Fixed { scale }
    }

    /// 将单个坐标值舍入到本精度模型
    ///
    /// 非有限值（未设置的 NaN、无穷）原样返回。
    #[inline]
    #[must_use]
    pub fn make_precise(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        match *self {
            Self::Floating => value,
            Self::FloatingSingle => f64::from(value as f32),
            Self::Fixed { scale } => (value * scale).round() / scale,
        }
    }

    /// 是否为浮点模型（不做网格舍入）
    #[inline]
    #[must_use]
    pub fn is_floating(&self) -> bool {
        !matches!(self, Self::Fixed { .. })
    }

    /// 网格尺寸 (1/scale)，浮点模型返回 0
    #[must_use]
    pub fn grid_size(&self) -> f64 {
        match *self {
            Self::Fixed { scale } => 1.0 / scale,
            _ => 0.0,
        }
    }

    /// 可表达的最大有效位数
    #[must_use]
    pub fn maximum_significant_digits(&self) -> u32 {
        match *self {
            Self::Floating => 16,
            Self::FloatingSingle => 6,
            Self::Fixed { scale } => {
                let digits = scale.log10().ceil();
                if digits.is_finite() && digits > 0.0 {
                    1 + digits as u32
                } else {
                    1
                }
            }
        }
    }

    /// 验证参数
    ///
    /// # Errors
    ///
    /// 固定模型的 `scale` 非有限或非正时返回 `GsError::OutOfRange`。
    pub fn validate(&self) -> GsResult<()> {
        if let Self::Fixed { scale } = *self {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(GsError::out_of_range(
                    "precision.scale",
                    scale,
                    f64::MIN_POSITIVE,
                    f64::MAX,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PrecisionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floating => write!(f, "floating"),
            Self::FloatingSingle => write!(f, "floating_single"),
            Self::Fixed { scale } => write!(f, "fixed:{scale}"),
        }
    }
}

/// 精度模型解析错误
#[derive(Debug, Clone)]
pub struct PrecisionParseError(String);

impl FromStr for PrecisionModel {
    type Err = PrecisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "floating" | "double" | "f64" => return Ok(Self::Floating),
            "floating_single" | "single" | "f32" => return Ok(Self::FloatingSingle),
            _ => {}
        }
        let scale = lower
            .strip_prefix("fixed:")
            .and_then(|rest| rest.trim().parse::<f64>().ok())
            .ok_or_else(|| PrecisionParseError(s.to_string()))?;
        let model = Self::Fixed { scale };
        model
            .validate()
            .map_err(|_| PrecisionParseError(s.to_string()))?;
        Ok(model)
    }
}

impl fmt::Display for PrecisionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "无效的精度模型: '{}', 期望 'floating'、'floating_single' 或 'fixed:<scale>'",
            self.0
        )
    }
}

impl std::error::Error for PrecisionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_floating() {
        assert_eq!(PrecisionModel::default(), PrecisionModel::Floating);
    }

    #[test]
    fn test_fixed_rounding() {
        let pm = PrecisionModel::fixed(100.0);
        assert_eq!(pm.make_precise(12.345_67), 12.35);
        assert_eq!(pm.make_precise(-12.345_67), -12.35);
        assert!((pm.grid_size() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_unset_values_pass_through() {
        let pm = PrecisionModel::fixed(1.0);
        assert!(pm.make_precise(f64::NAN).is_nan());
        assert_eq!(pm.make_precise(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_floating_single() {
        let v = 0.1_f64;
        let r = PrecisionModel::FloatingSingle.make_precise(v);
        assert_eq!(r, f64::from(0.1_f32));
        assert_ne!(r, v);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("single".parse::<PrecisionModel>().ok(), Some(PrecisionModel::FloatingSingle));
        let pm: PrecisionModel = "fixed:1000".parse().unwrap();
        assert_eq!(pm, PrecisionModel::fixed(1000.0));
        assert_eq!(pm.to_string(), "fixed:1000");
        assert!("fixed:-1".parse::<PrecisionModel>().is_err());
        assert!("exact".parse::<PrecisionModel>().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(PrecisionModel::fixed(0.0).validate().is_err());
        assert!(PrecisionModel::fixed(f64::NAN).validate().is_err());
        assert!(PrecisionModel::Floating.validate().is_ok());
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&PrecisionModel::fixed(10.0)).unwrap();
        assert!(json.contains("\"type\":\"fixed\""));
        let back: PrecisionModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PrecisionModel::fixed(10.0));
    }

    #[test]
    fn test_significant_digits() {
        assert_eq!(PrecisionModel::fixed(1000.0).maximum_significant_digits(), 4);
        assert_eq!(PrecisionModel::Floating.maximum_significant_digits(), 16);
    }
}
