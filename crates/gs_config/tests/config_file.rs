// crates/gs_config/tests/config_file.rs

//! 配置文件读写与注册表初始化测试

use gs_config::{ConfigError, SeedCrs, SridConfig};
use gs_foundation::PrecisionModel;
use gs_geo::{Coord, IntermediateCrsPolicy, Resolver};
use gs_srid::SridItemArgs;
use std::io::Write;

fn sample() -> SridConfig {
    let mut config = SridConfig::default()
        .with_seed(SeedCrs::new(Some(4326), "EPSG:4326"))
        .with_seed(SeedCrs::new(Some(28992), "urn:ogc:def:crs:EPSG::28992"))
        .with_seed(SeedCrs {
            srid: None,
            definition: "+proj=utm +zone=32 +datum=WGS84 +units=m".to_string(),
            args: SridItemArgs::default().with_precision(PrecisionModel::fixed(1000.0)),
        });
    config.transform.allow_ballpark_conversions = false;
    config.registry.auto_srid_base = -100;
    config
}

/// 保存后重新加载，内容不变
#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("srid.json");
    let config = sample();
    config.save_to_file(&path).unwrap();

    let loaded = SridConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

/// 手写 JSON：省略的字段取默认值
#[test]
fn test_load_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "transform": {{ "intermediate_crs_policy": "always" }},
            "seeds": [ {{ "definition": "EPSG:25832" }} ]
        }}"#
    )
    .unwrap();

    let config = SridConfig::from_file(file.path()).unwrap();
    assert_eq!(config.transform.intermediate_crs_policy, IntermediateCrsPolicy::Always);
    assert!(config.transform.allow_ballpark_conversions);
    assert_eq!(config.registry.auto_srid_base, -21000);
    assert_eq!(config.seeds.len(), 1);
}

/// 缺失文件返回 IO 错误
#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SridConfig::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

/// 按种子初始化注册表，并用配置中的转换选项重投影
#[test]
fn test_build_registry() {
    let config = sample();
    let registry = config.build_registry().unwrap();
    assert_eq!(registry.srids(), vec![-100, 4326, 28992]);

    let utm = registry.get_by_srid(-100).unwrap();
    assert_eq!(utm.precision(), PrecisionModel::fixed(1000.0));
    assert_eq!(utm.crs().epsg(), None);

    let mut points = vec![Coord::xy(54.0, 9.0)];
    registry
        .reproject_between(&Resolver::default(), &mut points, 4326, -100, &config.transform)
        .unwrap();
    assert!((points[0].x - 500_000.0).abs() < 1e-6);
    assert_eq!(points[0].y, (points[0].y * 1000.0).round() / 1000.0);
}

/// 目录外的 EPSG 代码在初始化时报告坐标系错误
#[test]
fn test_unsupported_seed() {
    let config = SridConfig::default().with_seed(SeedCrs::new(Some(1), "EPSG:1"));
    assert!(config.validate().is_ok());
    assert!(matches!(config.build_registry(), Err(ConfigError::Crs(_))));
}
