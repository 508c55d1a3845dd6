// crates/gs_srid/src/reproject.rs

//! 基于注册表的重投影入口
//!
//! 以 SRID 指定源与目标，精度取目标条目的精度模型。目标坐标系未登记时
//! 经 `find_or_register` 按需注册。

use crate::error::SridResult;
use crate::item::SridItem;
use crate::registry::SridRegistry;
use gs_geo::{Crs, Resolver, TransformNode, TransformOptions};
use gs_reproject::{CoordinateSequence, ReprojectFilter, SequenceFilter};
use std::sync::Arc;

impl SridRegistry {
    /// 解析两个条目之间的转换
    ///
    /// # Errors
    ///
    /// SRID 不存在时返回 `NotFound`；无可用路径时返回 `Geo`。
    pub fn resolve_between(
        &self,
        resolver: &Resolver,
        source_srid: i32,
        target_srid: i32,
        options: &TransformOptions,
    ) -> SridResult<TransformNode> {
        let source = self.get_by_srid(source_srid)?;
        let target = self.get_by_srid(target_srid)?;
        Ok(resolver.resolve(source.crs(), target.crs(), options)?)
    }

    /// 把序列从一个 SRID 重投影到另一个 SRID
    ///
    /// 源与目标相同时不解析转换，只按目标精度舍入。
    ///
    /// # Errors
    ///
    /// 解析失败或任一点失败时返回错误，失败时序列不变。
    pub fn reproject_between(
        &self,
        resolver: &Resolver,
        sequence: &mut dyn CoordinateSequence,
        source_srid: i32,
        target_srid: i32,
        options: &TransformOptions,
    ) -> SridResult<()> {
        let target = self.get_by_srid(target_srid)?;
        if source_srid == target_srid {
            round_in_place(sequence, &target);
            return Ok(());
        }
        let node = self.resolve_between(resolver, source_srid, target_srid, options)?;
        run(sequence, node, &target)
    }

    /// 把序列重投影到任意坐标系，返回目标条目
    ///
    /// # Errors
    ///
    /// 同 [`SridRegistry::reproject_between`]。
    pub fn reproject_to_crs(
        &self,
        resolver: &Resolver,
        sequence: &mut dyn CoordinateSequence,
        source_srid: i32,
        target: &Crs,
        options: &TransformOptions,
    ) -> SridResult<Arc<SridItem>> {
        let source = self.get_by_srid(source_srid)?;
        let target = self.find_or_register(target)?;
        if Arc::ptr_eq(&source, &target) {
            round_in_place(sequence, &target);
            return Ok(target);
        }
        let node = resolver.resolve(source.crs(), target.crs(), options)?;
        run(sequence, node, &target)?;
        Ok(target)
    }
}

fn run(
    sequence: &mut dyn CoordinateSequence,
    node: TransformNode,
    target: &SridItem,
) -> SridResult<()> {
    tracing::debug!(
        "重投影 {} 个点到 SRID {}: {}",
        sequence.len(),
        target.srid(),
        node.name()
    );
    ReprojectFilter::new(node, target.precision()).filter(sequence)?;
    Ok(())
}

fn round_in_place(sequence: &mut dyn CoordinateSequence, target: &SridItem) {
    let factory = target.factory();
    for i in 0..sequence.len() {
        let coord = sequence.get(i);
        sequence.set(i, factory.make_precise(coord));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SridError;
    use crate::item::SridItemArgs;
    use gs_foundation::PrecisionModel;
    use gs_geo::Coord;
    use gs_reproject::{Ordinates, PackedSequence};

    #[test]
    fn test_same_srid_is_noop() {
        let reg = SridRegistry::default();
        reg.register_as(Crs::wgs84(), 4326).unwrap();
        let mut seq = PackedSequence::from_coords(Ordinates::Xy, &[Coord::xy(1.0, 2.0)]);
        reg.reproject_between(&Resolver::default(), &mut seq, 4326, 4326, &TransformOptions::default())
            .unwrap();
        assert_eq!(seq.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_same_srid_applies_precision() {
        let reg = SridRegistry::default();
        reg.register_with(
            Crs::wgs84(),
            Some(4326),
            SridItemArgs::default().with_precision(PrecisionModel::fixed(100.0)),
        )
        .unwrap();
        let mut seq = PackedSequence::from_coords(Ordinates::Xyz, &[Coord::xyz(52.123_456, 5.987_654, 7.777)]);
        reg.reproject_between(&Resolver::default(), &mut seq, 4326, 4326, &TransformOptions::default())
            .unwrap();
        assert_eq!(seq.as_slice(), &[52.12, 5.99, 7.777]);

        // 目标即源条目时同样舍入
        let target = reg
            .reproject_to_crs(
                &Resolver::default(),
                &mut seq,
                4326,
                &reg.get_by_srid(4326).unwrap().crs().clone(),
                &TransformOptions::default(),
            )
            .unwrap();
        assert_eq!(target.srid(), 4326);
        assert_eq!(seq.as_slice(), &[52.12, 5.99, 7.777]);
    }

    #[test]
    fn test_missing_srid() {
        let reg = SridRegistry::default();
        let mut seq = PackedSequence::new(Ordinates::Xy);
        let err = reg
            .reproject_between(&Resolver::default(), &mut seq, 1, 2, &TransformOptions::default())
            .unwrap_err();
        assert!(matches!(err, SridError::NotFound(2)));
    }

    #[test]
    fn test_reproject_to_unregistered_crs() {
        let reg = SridRegistry::default();
        reg.register_as(Crs::wgs84(), 4326).unwrap();
        let mut seq = vec![Coord::xy(0.0, 3.0)];
        let target = reg
            .reproject_to_crs(
                &Resolver::default(),
                &mut seq,
                4326,
                &Crs::from_epsg(3857).unwrap(),
                &TransformOptions::default(),
            )
            .unwrap();
        assert!(target.srid() < 0);
        assert_eq!(reg.len(), 2);
        assert!(seq[0].x > 333_000.0 && seq[0].x < 334_000.0);
    }
}
