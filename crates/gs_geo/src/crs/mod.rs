// crates/gs_geo/src/crs/mod.rs

//! 坐标参考系统 (CRS) 句柄
//!
//! `Crs` 是构造后不可变、引用计数共享的句柄：
//!
//! - **同一性**：`==` 与 `Hash` 按实例比较（克隆句柄共享同一实例），
//!   [`Crs::duplicate`] 生成定义相同但身份不同的新实例；
//! - **等价性**：[`Crs::is_equivalent`] 比较语义（种类、基准、投影参数、轴序、维数），
//!   忽略名称与标识；[`Crs::is_equivalent_relaxed`] 额外忽略轴序。
//!
//! # 示例
//!
//! ```
//! use gs_geo::crs::Crs;
//!
//! let wgs84 = Crs::from_epsg(4326).unwrap();
//! let normalized = wgs84.normalize_axes();
//! assert!(!wgs84.is_equivalent(&normalized));
//! assert!(wgs84.is_equivalent_relaxed(&normalized));
//! ```

pub mod catalog;
pub mod definition;

use crate::area::UsageArea;
use crate::coord::Coord;
use crate::datum::Datum;
use crate::ellipsoid::Ellipsoid;
use crate::error::GeoResult;
use crate::projection::Projection;
pub use definition::CrsDefinition;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// 基本类型
// ============================================================================

/// CRS 实例标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrsId(u64);

impl CrsId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// 原始数值
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// 水平轴顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisOrder {
    /// 东向/经度在前（常规顺序）
    #[default]
    EastNorth,
    /// 北向/纬度在前（如 EPSG:4326 的权威轴序）
    NorthEast,
}

/// 坐标域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrsDomain {
    /// 空间（地理、投影）
    Spatial,
    /// 仅时间
    Temporal,
}

/// CRS 种类
#[derive(Debug, Clone)]
pub enum CrsKind {
    /// 地理坐标系（度）
    Geographic {
        /// 大地基准
        datum: Datum,
        /// 维数：2（经纬度）或 3（含椭球高）
        dimension: usize,
    },
    /// 投影坐标系（米）
    Projected {
        /// 大地基准
        datum: Datum,
        /// 投影
        projection: Projection,
    },
    /// 时间坐标系
    Temporal {
        /// 时间单位
        unit: String,
    },
}

/// 结构化 CRS 参数
#[derive(Debug, Clone)]
pub struct CrsSpec {
    /// 名称
    pub name: String,
    /// 种类
    pub kind: CrsKind,
    /// 轴序
    pub axis_order: AxisOrder,
    /// EPSG 代码
    pub epsg: Option<u32>,
    /// 使用范围
    pub area: Option<UsageArea>,
    /// 原始定义文本
    pub definition: String,
}

impl CrsSpec {
    /// 基于基准的二维地理坐标系（经度在前）
    #[must_use]
    pub fn geographic(name: impl Into<String>, datum: Datum) -> Self {
        let name = name.into();
        Self {
            definition: name.clone(),
            name,
            kind: CrsKind::Geographic { datum, dimension: 2 },
            axis_order: AxisOrder::EastNorth,
            epsg: None,
            area: None,
        }
    }

    /// 投影坐标系
    #[must_use]
    pub fn projected(name: impl Into<String>, datum: Datum, projection: Projection) -> Self {
        let name = name.into();
        Self {
            definition: name.clone(),
            name,
            kind: CrsKind::Projected { datum, projection },
            axis_order: AxisOrder::EastNorth,
            epsg: None,
            area: None,
        }
    }

    /// 时间坐标系
    #[must_use]
    pub fn temporal(name: impl Into<String>, unit: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            definition: name.clone(),
            name,
            kind: CrsKind::Temporal { unit: unit.into() },
            axis_order: AxisOrder::EastNorth,
            epsg: None,
            area: None,
        }
    }

    /// 设置轴序
    #[must_use]
    pub fn with_axis_order(mut self, order: AxisOrder) -> Self {
        self.axis_order = order;
        self
    }

    /// 设置 EPSG 代码与定义文本
    #[must_use]
    pub fn with_epsg(mut self, code: u32) -> Self {
        self.epsg = Some(code);
        self.definition = format!("EPSG:{code}");
        self
    }

    /// 设置使用范围
    #[must_use]
    pub fn with_area(mut self, area: UsageArea) -> Self {
        self.area = Some(area);
        self
    }

    /// 设置原始定义文本
    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// 设置地理坐标系维数（2 或 3）
    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        if let CrsKind::Geographic { dimension: d, .. } = &mut self.kind {
            *d = dimension.clamp(2, 3);
        }
        self
    }
}

// ============================================================================
// CRS 句柄
// ============================================================================

#[derive(Debug)]
struct CrsInner {
    id: CrsId,
    spec: CrsSpec,
}

/// CRS 句柄
#[derive(Clone)]
pub struct Crs {
    inner: Arc<CrsInner>,
}

impl Crs {
    /// 从结构化参数创建
    #[must_use]
    pub fn new(spec: CrsSpec) -> Self {
        Self {
            inner: Arc::new(CrsInner {
                id: CrsId::next(),
                spec,
            }),
        }
    }

    /// 从定义字符串创建（`EPSG:n`、URN、含权威代码的 WKT 或 PROJ 字符串）
    ///
    /// # Errors
    ///
    /// 定义无法识别时返回 `GeoError::CrsParseFailed`，EPSG 代码不在目录中时
    /// 返回 `GeoError::UnsupportedEpsg`。
    pub fn create(definition: &str) -> GeoResult<Self> {
        let spec = CrsDefinition::parse(definition)?.to_spec()?;
        Ok(Self::new(spec))
    }

    /// 从 EPSG 代码创建
    ///
    /// # Errors
    ///
    /// 代码不在内置目录中时返回 `GeoError::UnsupportedEpsg`。
    pub fn from_epsg(code: u32) -> GeoResult<Self> {
        catalog::lookup(code).map(Self::new)
    }

    /// WGS 84 地理坐标系（EPSG:4326，纬度在前）
    #[must_use]
    pub fn wgs84() -> Self {
        Self::new(catalog::wgs84_geographic())
    }

    /// 基于基准的二维地理坐标系（经度在前）
    #[must_use]
    pub fn geographic(datum: Datum) -> Self {
        let name = datum.name.clone();
        Self::new(CrsSpec::geographic(name, datum))
    }

    /// 时间坐标系
    #[must_use]
    pub fn temporal(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(CrsSpec::temporal(name, unit))
    }

    /// 以相同定义创建新实例（身份不同）
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self::new(self.inner.spec.clone())
    }

    // ========================================================================
    // 访问器
    // ========================================================================

    /// 实例标识
    #[inline]
    #[must_use]
    pub fn id(&self) -> CrsId {
        self.inner.id
    }

    /// 是否为同一实例
    #[inline]
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 结构化参数
    #[must_use]
    pub fn spec(&self) -> &CrsSpec {
        &self.inner.spec
    }

    /// 名称
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.spec.name
    }

    /// 原始定义文本
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.inner.spec.definition
    }

    /// EPSG 代码
    #[must_use]
    pub fn epsg(&self) -> Option<u32> {
        self.inner.spec.epsg
    }

    /// 种类
    #[must_use]
    pub fn kind(&self) -> &CrsKind {
        &self.inner.spec.kind
    }

    /// 轴序
    #[must_use]
    pub fn axis_order(&self) -> AxisOrder {
        self.inner.spec.axis_order
    }

    /// 使用范围
    #[must_use]
    pub fn area(&self) -> Option<&UsageArea> {
        self.inner.spec.area.as_ref()
    }

    /// 坐标域
    #[must_use]
    pub fn domain(&self) -> CrsDomain {
        match self.kind() {
            CrsKind::Temporal { .. } => CrsDomain::Temporal,
            _ => CrsDomain::Spatial,
        }
    }

    /// 坐标维数
    #[must_use]
    pub fn dimension(&self) -> usize {
        match self.kind() {
            CrsKind::Geographic { dimension, .. } => *dimension,
            CrsKind::Projected { .. } => 2,
            CrsKind::Temporal { .. } => 1,
        }
    }

    /// 大地基准（时间坐标系为 `None`）
    #[must_use]
    pub fn datum(&self) -> Option<&Datum> {
        match self.kind() {
            CrsKind::Geographic { datum, .. } | CrsKind::Projected { datum, .. } => Some(datum),
            CrsKind::Temporal { .. } => None,
        }
    }

    /// 椭球体（时间坐标系为 `None`）
    #[must_use]
    pub fn ellipsoid(&self) -> Option<Ellipsoid> {
        self.datum().map(|d| d.ellipsoid)
    }

    /// 投影（仅投影坐标系）
    #[must_use]
    pub fn projection(&self) -> Option<&Projection> {
        match self.kind() {
            CrsKind::Projected { projection, .. } => Some(projection),
            _ => None,
        }
    }

    /// 是否为地理坐标系
    #[must_use]
    pub fn is_geographic(&self) -> bool {
        matches!(self.kind(), CrsKind::Geographic { .. })
    }

    /// 是否为投影坐标系
    #[must_use]
    pub fn is_projected(&self) -> bool {
        matches!(self.kind(), CrsKind::Projected { .. })
    }

    // ========================================================================
    // 等价性
    // ========================================================================

    fn kind_equivalent(&self, other: &Self) -> bool {
        match (self.kind(), other.kind()) {
            (
                CrsKind::Geographic {
                    datum: d1,
                    dimension: n1,
                },
                CrsKind::Geographic {
                    datum: d2,
                    dimension: n2,
                },
            ) => n1 == n2 && d1.same_as(d2),
            (
                CrsKind::Projected {
                    datum: d1,
                    projection: p1,
                },
                CrsKind::Projected {
                    datum: d2,
                    projection: p2,
                },
            ) => d1.same_as(d2) && p1.approx_eq(p2),
            (CrsKind::Temporal { unit: u1 }, CrsKind::Temporal { unit: u2 }) => u1 == u2,
            _ => false,
        }
    }

    /// 语义等价（忽略名称与标识，比较轴序）
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.same_instance(other)
            || (self.axis_order() == other.axis_order() && self.kind_equivalent(other))
    }

    /// 宽松等价：在 [`Crs::is_equivalent`] 基础上忽略轴序差异
    #[must_use]
    pub fn is_equivalent_relaxed(&self, other: &Self) -> bool {
        self.same_instance(other) || self.kind_equivalent(other)
    }

    // ========================================================================
    // 轴序
    // ========================================================================

    /// 返回常规轴序（东向在前）的句柄
    ///
    /// 已经是常规轴序时返回自身的共享句柄。
    #[must_use]
    pub fn normalize_axes(&self) -> Self {
        if self.axis_order() == AxisOrder::EastNorth {
            return self.clone();
        }
        let mut spec = self.inner.spec.clone();
        spec.axis_order = AxisOrder::EastNorth;
        spec.epsg = None;
        Self::new(spec)
    }

    /// 本坐标系的点 -> 常规轴序的点
    #[inline]
    #[must_use]
    pub fn to_east_north(&self, coord: Coord) -> Coord {
        match self.axis_order() {
            AxisOrder::EastNorth => coord,
            AxisOrder::NorthEast => coord.swap_xy(),
        }
    }

    /// 同基准、经度在前的地理坐标系（时间坐标系为 `None`）
    #[must_use]
    pub fn geographic_base(&self) -> Option<Self> {
        match self.kind() {
            CrsKind::Geographic { .. } if self.axis_order() == AxisOrder::EastNorth => {
                Some(self.clone())
            }
            CrsKind::Geographic { datum, dimension } => {
                let spec = CrsSpec::geographic(self.name(), datum.clone()).with_dimension(*dimension);
                Some(Self::new(spec))
            }
            CrsKind::Projected { datum, .. } => Some(Self::geographic(datum.clone())),
            CrsKind::Temporal { .. } => None,
        }
    }

    /// 本坐标系的点 -> (经度, 纬度)，无法换算时返回 `None`
    #[must_use]
    pub fn to_lon_lat(&self, coord: Coord) -> Option<(f64, f64)> {
        if coord.is_no_value() {
            return None;
        }
        let en = self.to_east_north(coord);
        match self.kind() {
            CrsKind::Geographic { .. } => Some((en.x, en.y)),
            CrsKind::Projected { projection, .. } => projection.inverse(en.x, en.y),
            CrsKind::Temporal { .. } => None,
        }
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl Eq for Crs {}

impl Hash for Crs {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crs")
            .field("id", &self.id().value())
            .field("name", &self.name())
            .field("epsg", &self.epsg())
            .field("axis_order", &self.axis_order())
            .finish()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_vs_equivalence() {
        let a = Crs::from_epsg(28992).unwrap();
        let b = a.clone();
        let c = a.duplicate();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_equivalent(&c));
        assert!(a.is_equivalent_relaxed(&c));
    }

    #[test]
    fn test_separately_created_are_equivalent() {
        let a = Crs::create("EPSG:25832").unwrap();
        let b = Crs::create("urn:ogc:def:crs:EPSG::25832").unwrap();
        assert_ne!(a, b);
        assert!(a.is_equivalent(&b));
    }

    #[test]
    fn test_normalize_axes() {
        let wgs84 = Crs::wgs84();
        assert_eq!(wgs84.axis_order(), AxisOrder::NorthEast);
        let n = wgs84.normalize_axes();
        assert_eq!(n.axis_order(), AxisOrder::EastNorth);
        assert!(!wgs84.is_equivalent(&n));
        assert!(wgs84.is_equivalent_relaxed(&n));

        // 已是常规轴序：返回等价句柄
        let again = n.normalize_axes();
        assert!(again.is_equivalent(&n));

        let utm = Crs::from_epsg(32632).unwrap();
        assert!(utm.normalize_axes().is_equivalent(&utm));
    }

    #[test]
    fn test_different_datums_not_equivalent() {
        let wgs = Crs::from_epsg(4326).unwrap();
        let etrs = Crs::from_epsg(4258).unwrap();
        assert!(!wgs.is_equivalent_relaxed(&etrs));
    }

    #[test]
    fn test_temporal() {
        let t = Crs::temporal("Unix time", "second");
        assert_eq!(t.domain(), CrsDomain::Temporal);
        assert!(t.ellipsoid().is_none());
        assert!(t.geographic_base().is_none());
        assert!(t.to_lon_lat(Coord::xy(1.0, 2.0)).is_none());
    }

    #[test]
    fn test_to_lon_lat() {
        let wgs84 = Crs::wgs84();
        assert_eq!(wgs84.to_lon_lat(Coord::xy(52.0, 5.0)), Some((5.0, 52.0)));

        let rd = Crs::from_epsg(28992).unwrap();
        let (lon, lat) = rd.to_lon_lat(Coord::xy(155_000.0, 463_000.0)).unwrap();
        assert!((lon - 5.387_638_888_888_89).abs() < 1e-9);
        assert!((lat - 52.156_160_555_555_55).abs() < 1e-9);
    }

    #[test]
    fn test_geographic_base() {
        let utm = Crs::from_epsg(25832).unwrap();
        let base = utm.geographic_base().unwrap();
        assert!(base.is_geographic());
        assert_eq!(base.axis_order(), AxisOrder::EastNorth);
        assert!(base.datum().unwrap().same_as(&Datum::etrs89()));
    }
}
