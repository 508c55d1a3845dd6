// crates/gs_srid/src/config.rs

//! 注册表配置

use gs_foundation::{GsError, GsResult, PrecisionModel};
use serde::{Deserialize, Serialize};

/// 自动分配 SRID 的默认起点
pub const DEFAULT_AUTO_SRID_BASE: i32 = -21000;

/// 注册表配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 自动分配 SRID 的起点（负数，向下递减）
    pub auto_srid_base: i32,
    /// 条目未指定精度时使用的精度模型
    pub default_precision: PrecisionModel,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            auto_srid_base: DEFAULT_AUTO_SRID_BASE,
            default_precision: PrecisionModel::Floating,
        }
    }
}

impl RegistryConfig {
    /// 设置自动分配起点
    #[must_use]
    pub fn with_auto_srid_base(mut self, base: i32) -> Self {
        self.auto_srid_base = base;
        self
    }

    /// 设置默认精度
    #[must_use]
    pub fn with_default_precision(mut self, precision: PrecisionModel) -> Self {
        self.default_precision = precision;
        self
    }

    /// 验证配置
    ///
    /// # Errors
    ///
    /// 起点非负或精度参数无效时返回错误。
    pub fn validate(&self) -> GsResult<()> {
        if self.auto_srid_base >= 0 {
            return Err(GsError::out_of_range(
                "registry.auto_srid_base",
                f64::from(self.auto_srid_base),
                f64::from(i32::MIN),
                -1.0,
            ));
        }
        self.default_precision.validate()
    }
}
