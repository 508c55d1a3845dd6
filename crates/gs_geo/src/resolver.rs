// crates/gs_geo/src/resolver.rs

//! 转换解析器
//!
//! 解析器只负责组织与排序：候选路径由 [`OperationProvider`] 给出，
//! 解析器按选项筛选后排序，得到一个 [`TransformNode`]。
//!
//! 排序规则（稳定）：
//!
//! 1. 声明精度更高（数值更小）者优先，精度未知者排最后
//! 2. 给定感兴趣区域时，使用范围覆盖比例更大者优先
//! 3. 提供者的声明顺序
//!
//! # 示例
//!
//! ```
//! use gs_geo::prelude::*;
//!
//! let resolver = Resolver::default();
//! let utm32 = Crs::from_epsg(25832).unwrap();
//! let utm33 = Crs::from_epsg(25833).unwrap();
//! let node = resolver.resolve(&utm32, &utm33, &TransformOptions::default()).unwrap();
//! let p = node.apply(Coord::xy(500_000.0, 6_000_000.0));
//! let back = node.apply_reversed(p).unwrap();
//! assert!(back.approx_eq(&Coord::xy(500_000.0, 6_000_000.0), 0.01));
//! ```

use crate::crs::Crs;
use crate::error::{GeoError, GeoResult};
use crate::node::TransformNode;
use crate::operation::{BuiltinOperation, BuiltinOperationProvider, OperationProvider};
use crate::options::TransformOptions;
use std::sync::Arc;

/// 转换解析器
#[derive(Debug, Clone)]
pub struct Resolver {
    provider: Arc<dyn OperationProvider>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinOperationProvider::new()))
    }
}

/// 参与排序的候选
struct Ranked {
    node: TransformNode,
    accuracy: f64,
    overlap: f64,
}

impl Resolver {
    /// 使用指定提供者
    #[must_use]
    pub fn new(provider: Arc<dyn OperationProvider>) -> Self {
        Self { provider }
    }

    /// 操作提供者
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn OperationProvider> {
        &self.provider
    }

    /// 解析 `source` 到 `target` 的转换
    ///
    /// # Errors
    ///
    /// - 坐标域不同或筛选后没有可用路径时返回 `GeoError::NoPathFound`
    /// - 提供者报告结构性不兼容时原样返回其错误
    pub fn resolve(
        &self,
        source: &Crs,
        target: &Crs,
        options: &TransformOptions,
    ) -> GeoResult<TransformNode> {
        if source.domain() != target.domain() {
            return Err(GeoError::no_path_found(
                source.name(),
                target.name(),
                "坐标域不兼容",
            ));
        }

        if source.is_equivalent(target) {
            tracing::debug!("{} 与 {} 等价，使用空偏移", source, target);
            return Ok(TransformNode::Single(
                BuiltinOperation::null_offset(source, target).into_ref(),
            ));
        }

        let paths = self.provider.create_operations(source, target, options)?;
        let offered = paths.len();

        let mut dropped_ballpark = 0usize;
        let mut ranked: Vec<Ranked> = Vec::with_capacity(offered);
        for path in paths.into_iter().filter(|p| !p.is_empty()) {
            let node = TransformNode::from_path(path);
            if !options.allow_ballpark_conversions && node.is_ballpark() {
                dropped_ballpark += 1;
                continue;
            }
            if !Self::accepts(&node, options) {
                continue;
            }
            let overlap = match (&options.area_of_interest, node.usage_area()) {
                (Some(aoi), Some(area)) => area.overlap_fraction(aoi),
                _ => 0.0,
            };
            ranked.push(Ranked {
                accuracy: node.accuracy().unwrap_or(f64::INFINITY),
                overlap,
                node,
            });
        }

        if ranked.is_empty() {
            let reason = if offered == 0 {
                "没有可用的坐标操作".to_string()
            } else if dropped_ballpark == offered {
                "只有粗略转换，但选项不允许".to_string()
            } else {
                format!("{offered} 条候选路径均不满足选项")
            };
            tracing::warn!("{} -> {} 解析失败: {}", source, target, reason);
            return Err(GeoError::no_path_found(source.name(), target.name(), reason));
        }

        ranked.sort_by(|a, b| {
            a.accuracy
                .total_cmp(&b.accuracy)
                .then_with(|| b.overlap.total_cmp(&a.overlap))
        });

        tracing::debug!(
            "{} -> {}: {} 条候选，选用 {}",
            source,
            target,
            ranked.len(),
            ranked[0].node.name()
        );

        if ranked.len() == 1 {
            return Ok(ranked.remove(0).node);
        }
        Ok(TransformNode::Candidates(
            ranked.into_iter().map(|r| r.node).collect(),
        ))
    }

    /// 可逆性、精度与感兴趣区域筛选
    fn accepts(node: &TransformNode, options: &TransformOptions) -> bool {
        if options.require_inverse && !node.has_inverse() {
            return false;
        }
        if let Some(desired) = options.desired_accuracy {
            match node.accuracy() {
                Some(acc) if acc <= desired => {}
                _ => return false,
            }
        }
        if let (Some(aoi), Some(area)) = (&options.area_of_interest, node.usage_area()) {
            if !area.intersects(aoi) {
                return false;
            }
        }
        true
    }
}

/// 返回常规轴序（东向在前）的坐标系句柄
#[must_use]
pub fn normalize_axes(crs: &Crs) -> Crs {
    crs.normalize_axes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::UsageArea;
    use crate::coord::Coord;
    use crate::operation::{CoordinateOperation, OperationPath};
    use crate::options::IntermediateCrsPolicy;

    #[test]
    fn test_equivalent_is_null_offset() {
        let resolver = Resolver::default();
        let a = Crs::from_epsg(4326).unwrap();
        let b = Crs::create("EPSG:4326").unwrap();
        let node = resolver.resolve(&a, &b, &TransformOptions::default()).unwrap();
        assert!(matches!(node, TransformNode::Single(_)));
        assert!(node.name().starts_with("Null geographic offset"));
    }

    #[test]
    fn test_domain_mismatch() {
        let resolver = Resolver::default();
        let t = Crs::temporal("Unix time", "second");
        let err = resolver
            .resolve(&Crs::wgs84(), &t, &TransformOptions::default())
            .unwrap_err();
        assert!(matches!(err, GeoError::NoPathFound { .. }));
    }

    #[test]
    fn test_ranking_by_accuracy() {
        let resolver = Resolver::default();
        let rd = Crs::from_epsg(28992).unwrap();
        let node = resolver
            .resolve(&rd, &Crs::wgs84(), &TransformOptions::default())
            .unwrap();
        let candidates = node.candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].accuracy(), Some(1.0));
        assert_eq!(candidates[1].accuracy(), Some(2.0));
        assert!(candidates[0].name().contains("Amersfoort to WGS 84 (1)"));
    }

    #[test]
    fn test_desired_accuracy_filter() {
        let resolver = Resolver::default();
        let rd = Crs::from_epsg(28992).unwrap();
        let opts = TransformOptions::default().with_desired_accuracy(1.5);
        let node = resolver.resolve(&rd, &Crs::wgs84(), &opts).unwrap();
        assert!(matches!(node, TransformNode::Sequence(_)));

        let opts = TransformOptions::default().with_desired_accuracy(0.5);
        assert!(resolver.resolve(&rd, &Crs::wgs84(), &opts).is_err());
    }

    #[test]
    fn test_ballpark_rejected_when_strict() {
        let resolver = Resolver::new(Arc::new(BuiltinOperationProvider::empty()));
        let a = Crs::from_epsg(4289).unwrap();
        let b = Crs::from_epsg(4490).unwrap();
        let node = resolver.resolve(&a, &b, &TransformOptions::default()).unwrap();
        assert!(node.is_ballpark());

        let err = resolver.resolve(&a, &b, &TransformOptions::strict()).unwrap_err();
        match err {
            GeoError::NoPathFound { reason, .. } => assert!(reason.contains("粗略")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_area_of_interest_filters_disjoint() {
        let resolver = Resolver::default();
        let rd = Crs::from_epsg(28992).unwrap();
        let china = UsageArea::new(110.0, 30.0, 120.0, 40.0);
        let opts = TransformOptions::default().with_area_of_interest(china);
        assert!(resolver.resolve(&rd, &Crs::wgs84(), &opts).is_err());
    }

    /// 只有元数据的测试操作
    #[derive(Debug)]
    struct Stub {
        name: &'static str,
        accuracy: Option<f64>,
        area: Option<UsageArea>,
    }

    impl CoordinateOperation for Stub {
        fn name(&self) -> &str {
            self.name
        }
        fn method_name(&self) -> &str {
            "stub"
        }
        fn source_crs(&self) -> Option<&Crs> {
            None
        }
        fn target_crs(&self) -> Option<&Crs> {
            None
        }
        fn accuracy(&self) -> Option<f64> {
            self.accuracy
        }
        fn usage_area(&self) -> Option<&UsageArea> {
            self.area.as_ref()
        }
        fn has_inverse(&self) -> bool {
            true
        }
        fn forward(&self, c: Coord) -> Coord {
            c
        }
        fn inverse(&self, c: Coord) -> Coord {
            c
        }
    }

    #[derive(Debug)]
    struct StubProvider;

    impl OperationProvider for StubProvider {
        fn create_operations(
            &self,
            _: &Crs,
            _: &Crs,
            _: &TransformOptions,
        ) -> GeoResult<Vec<OperationPath>> {
            let stub = |name, accuracy, area| -> OperationPath {
                vec![Arc::new(Stub {
                    name,
                    accuracy,
                    area,
                })]
            };
            Ok(vec![
                stub("unknown", None, None),
                stub("west", Some(1.0), Some(UsageArea::new(0.0, 0.0, 10.0, 10.0))),
                stub("east", Some(1.0), Some(UsageArea::new(5.0, 0.0, 15.0, 10.0))),
                stub("coarse", Some(5.0), None),
                stub("east-twin", Some(1.0), Some(UsageArea::new(5.0, 0.0, 15.0, 10.0))),
            ])
        }
    }

    fn stub_names(aoi: Option<UsageArea>) -> Vec<String> {
        let resolver = Resolver::new(Arc::new(StubProvider));
        let opts = TransformOptions {
            area_of_interest: aoi,
            ..TransformOptions::default()
        };
        let node = resolver
            .resolve(&Crs::wgs84(), &Crs::from_epsg(3857).unwrap(), &opts)
            .unwrap();
        node.candidates().iter().map(TransformNode::name).collect()
    }

    #[test]
    fn test_ranking_ties_are_stable() {
        assert_eq!(
            stub_names(None),
            ["west", "east", "east-twin", "coarse", "unknown"]
        );
        // 重复解析结果一致
        assert_eq!(stub_names(None), stub_names(None));
    }

    #[test]
    fn test_ranking_by_overlap() {
        let aoi = UsageArea::new(9.0, 1.0, 14.0, 2.0);
        assert_eq!(
            stub_names(Some(aoi)),
            ["east", "east-twin", "west", "coarse", "unknown"]
        );
    }

    #[test]
    fn test_intermediate_always_adds_hops() {
        let resolver = Resolver::default();
        let wgs = Crs::wgs84();
        let etrs = Crs::from_epsg(4258).unwrap();
        let direct = resolver.resolve(&wgs, &etrs, &TransformOptions::default()).unwrap();
        assert_eq!(direct.candidates().len(), 2);
        // WGS 84 本身就是换乘坐标系，不会再增加路径
        let always = TransformOptions::default().with_intermediate_policy(IntermediateCrsPolicy::Always);
        let node = resolver.resolve(&wgs, &etrs, &always).unwrap();
        assert_eq!(node.candidates().len(), 2);
        assert!(node.is_time_dependent());
    }

    #[test]
    fn test_normalize_axes() {
        let wgs = Crs::wgs84();
        let n = normalize_axes(&wgs);
        assert!(wgs.is_equivalent_relaxed(&n));
        assert!(!wgs.is_equivalent(&n));
    }
}
