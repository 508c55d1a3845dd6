// crates/gs_geo/src/node.rs

//! 转换节点
//!
//! [`TransformNode`] 是解析结果的闭合和类型：
//!
//! - `Single`：一个原子操作
//! - `Sequence`：按顺序组合的节点，逆向时倒序逐个求逆
//! - `Candidates`：可互相替代的节点，已按优先级排好序（最优在前）
//!
//! 点映射失败时返回 [`Coord::NO_VALUE`]，不产生错误；
//! 只有结构性问题（如请求不可逆操作的逆映射）才返回 `GeoError`。

use crate::area::UsageArea;
use crate::coord::Coord;
use crate::crs::Crs;
use crate::error::{GeoError, GeoResult};
use crate::geodesic::vincenty_distance;
use crate::operation::{OperationPath, OperationRef};
use std::fmt;

/// 应用方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// 正向
    #[default]
    Forward,
    /// 逆向
    Inverse,
}

impl Direction {
    /// 相反方向
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Inverse,
            Self::Inverse => Self::Forward,
        }
    }
}

/// 转换节点
#[derive(Debug, Clone)]
pub enum TransformNode {
    /// 单个原子操作
    Single(OperationRef),
    /// 顺序组合
    Sequence(Vec<TransformNode>),
    /// 排好序的候选
    Candidates(Vec<TransformNode>),
}

impl TransformNode {
    /// 由一条操作路径构造：单步为 `Single`，多步为 `Sequence`
    #[must_use]
    pub fn from_path(path: OperationPath) -> Self {
        match <[OperationRef; 1]>::try_from(path) {
            Ok([op]) => Self::Single(op),
            Err(path) => Self::Sequence(path.into_iter().map(Self::Single).collect()),
        }
    }

    // ========================================================================
    // 应用
    // ========================================================================

    /// 正向映射
    ///
    /// 候选节点先按排名尝试使用范围包含该点的候选，再按排名尝试其余候选，
    /// 得到“无值”时继续下一个。
    #[must_use]
    pub fn apply(&self, coord: Coord) -> Coord {
        let coord = coord.canonical();
        if coord.is_no_value() {
            return Coord::NO_VALUE;
        }
        match self {
            Self::Single(op) => op.forward(coord),
            Self::Sequence(steps) => {
                let mut current = coord;
                for step in steps {
                    current = step.apply(current);
                    if current.is_no_value() {
                        break;
                    }
                }
                current
            }
            Self::Candidates(list) => {
                for (rank, candidate) in Self::by_location(list, coord, Direction::Forward) {
                    let out = candidate.apply(coord);
                    if !out.is_no_value() {
                        if rank > 0 {
                            tracing::debug!("候选回退: 第 {} 个候选 {} 成功", rank, candidate.name());
                        }
                        return out;
                    }
                }
                Coord::NO_VALUE
            }
        }
    }

    /// 逆向映射
    ///
    /// # Errors
    ///
    /// 所选路径不可逆时返回 `GeoError::NoInverse`。
    pub fn apply_reversed(&self, coord: Coord) -> GeoResult<Coord> {
        if !self.has_inverse() {
            return Err(GeoError::no_inverse(self.name()));
        }
        let coord = coord.canonical();
        if coord.is_no_value() {
            return Ok(Coord::NO_VALUE);
        }
        match self {
            Self::Single(op) => Ok(op.inverse(coord)),
            Self::Sequence(steps) => {
                let mut current = coord;
                for step in steps.iter().rev() {
                    current = step.apply_reversed(current)?;
                    if current.is_no_value() {
                        break;
                    }
                }
                Ok(current)
            }
            Self::Candidates(list) => {
                let ordered = Self::by_location(list, coord, Direction::Inverse);
                for (rank, candidate) in ordered.into_iter().filter(|(_, c)| c.has_inverse()) {
                    let out = candidate.apply_reversed(coord)?;
                    if !out.is_no_value() {
                        if rank > 0 {
                            tracing::debug!("逆向候选回退: 第 {} 个候选 {} 成功", rank, candidate.name());
                        }
                        return Ok(out);
                    }
                }
                Ok(Coord::NO_VALUE)
            }
        }
    }

    /// 按点位重排候选，保留原排名序号
    ///
    /// 使用范围包含该点（或未声明范围）的候选在前，其余在后，两组内部保持排名顺序。
    /// 点位无法换算为经纬度的候选视为包含。
    fn by_location(
        list: &[TransformNode],
        coord: Coord,
        direction: Direction,
    ) -> Vec<(usize, &TransformNode)> {
        let (mut inside, outside): (Vec<_>, Vec<_>) =
            list.iter().enumerate().partition(|(_, candidate)| {
                let Some(area) = candidate.usage_area() else {
                    return true;
                };
                let crs = match direction {
                    Direction::Forward => candidate.source_crs(),
                    Direction::Inverse => candidate.target_crs(),
                };
                match crs.and_then(|crs| crs.to_lon_lat(coord)) {
                    Some((lon, lat)) => area.contains(lon, lat),
                    None => true,
                }
            });
        if let Some((rank, first)) = inside.first().filter(|(rank, _)| *rank != 0) {
            tracing::trace!("候选按点位重排: 第 {} 个候选 {} 优先", rank, first.name());
        }
        inside.extend(outside);
        inside
    }

    /// 按方向应用
    ///
    /// # Errors
    ///
    /// 逆向且不可逆时返回 `GeoError::NoInverse`。
    pub fn apply_direction(&self, direction: Direction, coord: Coord) -> GeoResult<Coord> {
        match direction {
            Direction::Forward => Ok(self.apply(coord)),
            Direction::Inverse => self.apply_reversed(coord),
        }
    }

    /// 往返 `n` 次后相对起点的平面偏移
    ///
    /// `Forward` 为先正后逆，`Inverse` 为先逆后正。中途得到“无值”时返回 `+∞`。
    ///
    /// # Errors
    ///
    /// 不可逆时返回 `GeoError::NoInverse`。
    pub fn round_trip(&self, direction: Direction, n: usize, coord: Coord) -> GeoResult<f64> {
        let start = coord.canonical();
        let mut current = start;
        for _ in 0..n {
            current = self.apply_direction(direction, current)?;
            current = self.apply_direction(direction.opposite(), current)?;
            if current.is_no_value() {
                return Ok(f64::INFINITY);
            }
        }
        Ok(start.distance_2d(&current))
    }

    // ========================================================================
    // 属性
    // ========================================================================

    /// 是否可逆
    #[must_use]
    pub fn has_inverse(&self) -> bool {
        match self {
            Self::Single(op) => op.has_inverse(),
            Self::Sequence(steps) => steps.iter().all(Self::has_inverse),
            Self::Candidates(list) => list.iter().any(Self::has_inverse),
        }
    }

    /// 声明精度（米）
    ///
    /// 顺序组合为各步之和，任一步未知则未知；候选节点取排名第一者。
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        match self {
            Self::Single(op) => op.accuracy().filter(|a| a.is_finite() && *a >= 0.0),
            Self::Sequence(steps) => steps
                .iter()
                .try_fold(0.0, |total, step| step.accuracy().map(|a| total + a)),
            Self::Candidates(list) => list.first().and_then(Self::accuracy),
        }
    }

    /// 使用范围
    ///
    /// 顺序组合为各步范围的交集（未声明范围的步骤不参与）。
    #[must_use]
    pub fn usage_area(&self) -> Option<UsageArea> {
        match self {
            Self::Single(op) => op.usage_area().cloned(),
            Self::Sequence(steps) => {
                let mut result: Option<UsageArea> = None;
                for area in steps.iter().filter_map(Self::usage_area) {
                    result = match result {
                        None => Some(area),
                        Some(current) => Some(current.intersection(&area)?),
                    };
                }
                result
            }
            Self::Candidates(list) => list.first().and_then(Self::usage_area),
        }
    }

    /// 源坐标系
    #[must_use]
    pub fn source_crs(&self) -> Option<Crs> {
        match self {
            Self::Single(op) => op.source_crs().cloned(),
            Self::Sequence(list) | Self::Candidates(list) => list.first().and_then(Self::source_crs),
        }
    }

    /// 目标坐标系
    #[must_use]
    pub fn target_crs(&self) -> Option<Crs> {
        match self {
            Self::Single(op) => op.target_crs().cloned(),
            Self::Sequence(steps) => steps.last().and_then(Self::target_crs),
            Self::Candidates(list) => list.first().and_then(Self::target_crs),
        }
    }

    /// 名称
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Single(op) => op.name().to_string(),
            Self::Sequence(steps) => steps.iter().map(Self::name).collect::<Vec<_>>().join(" + "),
            Self::Candidates(list) => list.first().map(Self::name).unwrap_or_default(),
        }
    }

    /// 方法名称
    #[must_use]
    pub fn method_name(&self) -> String {
        match self {
            Self::Single(op) => op.method_name().to_string(),
            Self::Sequence(_) => "Concatenated operation".to_string(),
            Self::Candidates(list) => list.first().map(Self::method_name).unwrap_or_default(),
        }
    }

    /// 是否包含粗略转换（候选节点看排名第一者）
    #[must_use]
    pub fn is_ballpark(&self) -> bool {
        match self {
            Self::Single(op) => op.is_ballpark(),
            Self::Sequence(steps) => steps.iter().any(Self::is_ballpark),
            Self::Candidates(list) => list.first().is_some_and(Self::is_ballpark),
        }
    }

    /// 是否有步骤依赖时间历元
    #[must_use]
    pub fn is_time_dependent(&self) -> bool {
        match self {
            Self::Single(op) => op.is_time_dependent(),
            Self::Sequence(list) | Self::Candidates(list) => list.iter().any(Self::is_time_dependent),
        }
    }

    /// 顺序组合的各步骤；其他变体返回自身
    #[must_use]
    pub fn steps(&self) -> &[TransformNode] {
        match self {
            Self::Sequence(steps) => steps,
            _ => std::slice::from_ref(self),
        }
    }

    /// 排好序的候选；其他变体返回自身
    #[must_use]
    pub fn candidates(&self) -> &[TransformNode] {
        match self {
            Self::Candidates(list) => list,
            _ => std::slice::from_ref(self),
        }
    }

    // ========================================================================
    // 距离
    // ========================================================================

    /// 源坐标系中两点的椭球面距离（米）
    ///
    /// 源坐标系未知、没有椭球或计算不收敛时返回 `NaN`。
    #[must_use]
    pub fn geo_distance(&self, a: Coord, b: Coord) -> f64 {
        let Some(crs) = self.source_crs() else {
            return f64::NAN;
        };
        let Some(ellipsoid) = crs.ellipsoid() else {
            return f64::NAN;
        };
        let (Some((lon1, lat1)), Some((lon2, lat2))) = (crs.to_lon_lat(a), crs.to_lon_lat(b)) else {
            return f64::NAN;
        };
        vincenty_distance(&ellipsoid, lon1, lat1, lon2, lat2).unwrap_or(f64::NAN)
    }

    /// 计入高差的三维距离（米），任一点没有 Z 时高差按 0 计
    #[must_use]
    pub fn geo_distance_z(&self, a: Coord, b: Coord) -> f64 {
        let horizontal = self.geo_distance(a, b);
        let a = a.canonical();
        let b = b.canonical();
        let dz = if a.has_z() && b.has_z() { b.z - a.z } else { 0.0 };
        horizontal.hypot(dz)
    }
}

impl fmt::Display for TransformNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{BuiltinOperation, CoordinateOperation};

    /// 平移测试操作
    #[derive(Debug)]
    struct Shift {
        name: &'static str,
        dx: f64,
        accuracy: Option<f64>,
        invertible: bool,
        fail_above: f64,
        crs: Option<Crs>,
        area: Option<UsageArea>,
    }

    impl Shift {
        fn new(name: &'static str, dx: f64) -> Self {
            Self {
                name,
                dx,
                accuracy: Some(1.0),
                invertible: true,
                fail_above: f64::INFINITY,
                crs: None,
                area: None,
            }
        }
    }

    impl CoordinateOperation for Shift {
        fn name(&self) -> &str {
            self.name
        }
        fn method_name(&self) -> &str {
            "shift"
        }
        fn source_crs(&self) -> Option<&Crs> {
            self.crs.as_ref()
        }
        fn target_crs(&self) -> Option<&Crs> {
            self.crs.as_ref()
        }
        fn accuracy(&self) -> Option<f64> {
            self.accuracy
        }
        fn usage_area(&self) -> Option<&UsageArea> {
            self.area.as_ref()
        }
        fn has_inverse(&self) -> bool {
            self.invertible
        }
        fn forward(&self, c: Coord) -> Coord {
            if c.x > self.fail_above {
                return Coord::NO_VALUE;
            }
            Coord { x: c.x + self.dx, ..c }
        }
        fn inverse(&self, c: Coord) -> Coord {
            Coord { x: c.x - self.dx, ..c }
        }
    }

    fn single(op: Shift) -> TransformNode {
        TransformNode::Single(std::sync::Arc::new(op))
    }

    #[test]
    fn test_sequence_order_and_reversal() {
        let seq = TransformNode::Sequence(vec![single(Shift::new("a", 1.0)), single(Shift::new("b", 10.0))]);
        let p = Coord::xy(0.0, 0.0);
        let q = seq.apply(p);
        assert_eq!(q.x, 11.0);
        assert_eq!(seq.apply_reversed(q).unwrap().x, 0.0);
        assert_eq!(seq.name(), "a + b");
        assert_eq!(seq.accuracy(), Some(2.0));
        assert_eq!(seq.steps().len(), 2);
    }

    #[test]
    fn test_sequence_stops_on_no_value() {
        let mut failing = Shift::new("fail", 0.0);
        failing.fail_above = -1.0;
        let seq = TransformNode::Sequence(vec![single(failing), single(Shift::new("b", 1.0))]);
        assert!(seq.apply(Coord::xy(0.0, 0.0)).is_no_value());
    }

    #[test]
    fn test_no_inverse() {
        let mut op = Shift::new("one-way", 1.0);
        op.invertible = false;
        let node = single(op);
        let err = node.apply_reversed(Coord::xy(0.0, 0.0)).unwrap_err();
        assert_eq!(err, GeoError::no_inverse("one-way"));
        assert!(node.round_trip(Direction::Forward, 1, Coord::xy(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_candidates_fallback() {
        let mut first = Shift::new("first", 1.0);
        first.fail_above = 100.0;
        let node = TransformNode::Candidates(vec![single(first), single(Shift::new("second", 2.0))]);
        assert_eq!(node.apply(Coord::xy(0.0, 0.0)).x, 1.0);
        assert_eq!(node.apply(Coord::xy(200.0, 0.0)).x, 202.0);
        assert_eq!(node.name(), "first");
        assert_eq!(node.candidates().len(), 2);
    }

    /// 经度在前的区域平移
    fn regional(name: &'static str, dx: f64, accuracy: f64, area: UsageArea) -> TransformNode {
        let mut op = Shift::new(name, dx);
        op.accuracy = Some(accuracy);
        op.crs = Some(Crs::wgs84().normalize_axes());
        op.area = Some(area);
        single(op)
    }

    #[test]
    fn test_candidates_prefer_containing_area() {
        // 排名第一的候选范围不含该点
        let node = TransformNode::Candidates(vec![
            regional("china", 0.05, 0.5, UsageArea::named("China", 73.0, 18.0, 135.0, 54.0)),
            regional("netherlands", -0.0004, 1.0, UsageArea::named("Netherlands", 3.2, 50.7, 7.2, 53.7)),
        ]);
        let nl = node.apply(Coord::xy(5.0, 52.0));
        assert!((nl.x - 4.9996).abs() < 1e-12, "x={}", nl.x);
        let cn = node.apply(Coord::xy(100.0, 30.0));
        assert!((cn.x - 100.05).abs() < 1e-12);

        // 逆向同样按点位选择
        let back = node.apply_reversed(nl).unwrap();
        assert!((back.x - 5.0).abs() < 1e-12);

        // 不在任何范围内时按排名
        let ocean = node.apply(Coord::xy(-30.0, 0.0));
        assert!((ocean.x - (-29.95)).abs() < 1e-12);
        assert_eq!(node.name(), "china");
    }

    #[test]
    fn test_candidates_outside_area_used_as_fallback() {
        let mut local = Shift::new("local", 1.0);
        local.crs = Some(Crs::wgs84().normalize_axes());
        local.area = Some(UsageArea::new(0.0, 0.0, 10.0, 10.0));
        local.fail_above = 4.0;
        let far = regional("far", 2.0, 5.0, UsageArea::new(100.0, 0.0, 110.0, 10.0));
        let node = TransformNode::Candidates(vec![single(local), far]);
        assert_eq!(node.apply(Coord::xy(1.0, 1.0)).x, 2.0);
        // 范围内候选失败，退回范围外候选
        assert_eq!(node.apply(Coord::xy(5.0, 1.0)).x, 7.0);
    }

    #[test]
    fn test_candidates_inverse_skips_one_way() {
        let mut one_way = Shift::new("one-way", 1.0);
        one_way.invertible = false;
        let node = TransformNode::Candidates(vec![single(one_way), single(Shift::new("two-way", 5.0))]);
        assert!(node.has_inverse());
        assert_eq!(node.apply_reversed(Coord::xy(10.0, 0.0)).unwrap().x, 5.0);
    }

    #[test]
    fn test_unknown_accuracy_propagates() {
        let mut unknown = Shift::new("u", 0.0);
        unknown.accuracy = None;
        let seq = TransformNode::Sequence(vec![single(Shift::new("a", 0.0)), single(unknown)]);
        assert_eq!(seq.accuracy(), None);
    }

    #[test]
    fn test_infinite_z_is_unset() {
        let node = single(Shift::new("a", 1.0));
        let out = node.apply(Coord::xyz(0.0, 0.0, f64::INFINITY));
        assert!(!out.has_z());
        assert!(out.z.is_nan());
    }

    #[test]
    fn test_round_trip_drift() {
        let node = single(Shift::new("a", 0.5));
        let drift = node.round_trip(Direction::Forward, 10, Coord::xy(1.0, 2.0)).unwrap();
        assert!(drift < 1e-12);
    }

    #[test]
    fn test_geo_distance() {
        let wgs = Crs::wgs84();
        let node = TransformNode::Single(BuiltinOperation::null_offset(&wgs, &wgs).into_ref());
        // EPSG:4326 纬度在前
        let d = node.geo_distance(Coord::xy(0.0, 0.0), Coord::xy(0.0, 1.0));
        assert!((d - 111_319.490_793).abs() < 1e-3);
        let dz = node.geo_distance_z(Coord::xyz(0.0, 0.0, 0.0), Coord::xyz(0.0, 0.0, 3.0));
        assert!((dz - 3.0).abs() < 1e-9);

        let anonymous = single(Shift::new("a", 0.0));
        assert!(anonymous.geo_distance(Coord::xy(0.0, 0.0), Coord::xy(1.0, 1.0)).is_nan());
    }
}
