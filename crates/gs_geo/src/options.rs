// crates/gs_geo/src/options.rs

//! 转换解析选项

use crate::area::UsageArea;
use serde::{Deserialize, Serialize};

/// 是否允许经由中间坐标系（通常为 WGS 84）换乘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntermediateCrsPolicy {
    /// 只使用直接操作
    Never,
    /// 没有直接操作时才换乘
    #[default]
    IfNoDirectPath,
    /// 总是同时考虑换乘路径
    Always,
}

/// 转换解析选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// 允许粗略转换（无已知基准变换时的经纬度原样保留）
    pub allow_ballpark_conversions: bool,
    /// 只接受可逆的路径
    pub require_inverse: bool,
    /// 感兴趣区域（经纬度）
    pub area_of_interest: Option<UsageArea>,
    /// 期望精度（米）；精度更差或未知的路径被丢弃
    pub desired_accuracy: Option<f64>,
    /// 中间坐标系策略
    pub intermediate_crs_policy: IntermediateCrsPolicy,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            allow_ballpark_conversions: true,
            require_inverse: false,
            area_of_interest: None,
            desired_accuracy: None,
            intermediate_crs_policy: IntermediateCrsPolicy::IfNoDirectPath,
        }
    }
}

impl TransformOptions {
    /// 严格选项：不允许粗略转换
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_ballpark_conversions: false,
            ..Self::default()
        }
    }

    /// 设置是否允许粗略转换
    #[must_use]
    pub fn with_ballpark(mut self, allow: bool) -> Self {
        self.allow_ballpark_conversions = allow;
        self
    }

    /// 设置是否要求可逆
    #[must_use]
    pub fn with_require_inverse(mut self, require: bool) -> Self {
        self.require_inverse = require;
        self
    }

    /// 设置感兴趣区域
    #[must_use]
    pub fn with_area_of_interest(mut self, area: UsageArea) -> Self {
        self.area_of_interest = Some(area);
        self
    }

    /// 设置期望精度
    #[must_use]
    pub fn with_desired_accuracy(mut self, meters: f64) -> Self {
        self.desired_accuracy = Some(meters);
        self
    }

    /// 设置中间坐标系策略
    #[must_use]
    pub fn with_intermediate_policy(mut self, policy: IntermediateCrsPolicy) -> Self {
        self.intermediate_crs_policy = policy;
        self
    }
}
