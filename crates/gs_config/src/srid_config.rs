// crates/gs_config/src/srid_config.rs

//! SRID 配置文件
//!
//! JSON 格式，所有字段都可省略：
//!
//! ```json
//! {
//!   "registry": { "auto_srid_base": -21000, "default_precision": { "type": "floating" } },
//!   "transform": { "allow_ballpark_conversions": false },
//!   "seeds": [
//!     { "srid": 28992, "definition": "EPSG:28992" },
//!     { "definition": "+proj=utm +zone=32 +datum=WGS84" }
//!   ]
//! }
//! ```

use crate::error::ConfigError;
use gs_geo::{Crs, CrsDefinition, TransformOptions};
use gs_srid::{RegistryConfig, SridItemArgs, SridRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 预注册的坐标系
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCrs {
    /// SRID；省略时自动分配
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srid: Option<i32>,
    /// 坐标系定义（`EPSG:n`、URN、WKT 或 PROJ 字符串）
    pub definition: String,
    /// 条目参数
    #[serde(default)]
    pub args: SridItemArgs,
}

impl SeedCrs {
    /// 创建种子
    pub fn new(srid: Option<i32>, definition: impl Into<String>) -> Self {
        Self {
            srid,
            definition: definition.into(),
            args: SridItemArgs::default(),
        }
    }
}

/// SRID 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SridConfig {
    /// 注册表配置
    pub registry: RegistryConfig,
    /// 默认转换选项
    pub transform: TransformOptions,
    /// 预注册的坐标系
    pub seeds: Vec<SeedCrs>,
}

impl SridConfig {
    /// 从 JSON 文件加载并验证
    ///
    /// # Errors
    ///
    /// 读取、解析或验证失败时返回错误。
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// 从 JSON 字符串解析并验证
    ///
    /// # Errors
    ///
    /// 解析或验证失败时返回错误。
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: SridConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    ///
    /// # Errors
    ///
    /// 返回第一个无效字段。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.auto_srid_base >= 0 {
            return Err(ConfigError::invalid(
                "registry.auto_srid_base",
                self.registry.auto_srid_base,
                "自动 SRID 起点必须为负",
            ));
        }
        if self.registry.default_precision.validate().is_err() {
            return Err(ConfigError::invalid(
                "registry.default_precision",
                self.registry.default_precision,
                "固定精度的比例因子必须为正",
            ));
        }

        if let Some(accuracy) = self.transform.desired_accuracy {
            if !accuracy.is_finite() || accuracy <= 0.0 {
                return Err(ConfigError::invalid(
                    "transform.desired_accuracy",
                    accuracy,
                    "期望精度必须为正",
                ));
            }
        }

        let mut seen = HashSet::new();
        for (i, seed) in self.seeds.iter().enumerate() {
            if let Some(srid) = seed.srid {
                if srid == 0 {
                    return Err(ConfigError::invalid(
                        format!("seeds[{i}].srid"),
                        srid,
                        "SRID 不能为 0",
                    ));
                }
                if !seen.insert(srid) {
                    return Err(ConfigError::invalid(
                        format!("seeds[{i}].srid"),
                        srid,
                        "SRID 重复",
                    ));
                }
            }
            if let Some(precision) = seed.args.precision {
                if precision.validate().is_err() {
                    return Err(ConfigError::invalid(
                        format!("seeds[{i}].args.precision"),
                        precision,
                        "固定精度的比例因子必须为正",
                    ));
                }
            }
            CrsDefinition::parse(&seed.definition).map_err(|e| {
                ConfigError::invalid(
                    format!("seeds[{i}].definition"),
                    &seed.definition,
                    e.to_string(),
                )
            })?;
        }
        Ok(())
    }

    /// 保存为 JSON 文件
    ///
    /// # Errors
    ///
    /// 序列化或写入失败时返回错误。
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 添加种子
    #[must_use]
    pub fn with_seed(mut self, seed: SeedCrs) -> Self {
        self.seeds.push(seed);
        self
    }

    /// 按配置创建注册表并注册全部种子
    ///
    /// # Errors
    ///
    /// 验证失败、定义无法创建或注册冲突时返回错误。
    pub fn build_registry(&self) -> Result<SridRegistry, ConfigError> {
        self.validate()?;
        let registry = SridRegistry::new(self.registry);
        for seed in &self.seeds {
            let crs = Crs::create(&seed.definition)?;
            registry.register_with(crs, seed.srid, seed.args)?;
        }
        tracing::info!("注册表已初始化: {} 个坐标系", registry.len());
        Ok(registry)
    }
}
