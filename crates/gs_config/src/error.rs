// crates/gs_config/src/error.rs

//! 配置层错误类型

use gs_foundation::GsError;
use gs_geo::GeoError;
use gs_srid::SridError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 坐标系定义错误
    #[error("坐标系定义错误: {0}")]
    Crs(#[from] GeoError),

    /// 注册表错误
    #[error("注册表错误: {0}")]
    Registry(#[from] SridError),
}

impl ConfigError {
    pub(crate) fn invalid(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for GsError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => e.into(),
            ConfigError::Parse(message) => GsError::serialization(message),
            ConfigError::Crs(e) => e.into(),
            ConfigError::Registry(e) => e.into(),
            ConfigError::InvalidValue { .. } => GsError::config(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("seeds[0].srid", 0, "SRID 不能为 0");
        assert!(err.to_string().contains("seeds[0].srid"));
        let gs: GsError = err.into();
        assert!(matches!(gs, GsError::Config { .. }));
    }

    #[test]
    fn test_parse_error_maps_to_serialization() {
        let err = ConfigError::Parse("EOF while parsing".to_string());
        let gs: GsError = err.into();
        assert!(matches!(gs, GsError::Serialization { .. }));
    }
}
