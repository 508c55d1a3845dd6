// crates/gs_geo/src/operation/provider.rs

//! 操作提供者
//!
//! 提供者负责给出两个坐标系间的全部候选路径，每条路径是按顺序组合的原子操作；
//! 排序与筛选由解析器完成。
//!
//! 内置提供者的路径结构：
//!
//! ```text
//! 源坐标系 --(轴序交换 / 投影反算)--> 源基准经纬度
//!          --(基准变换，可能经 WGS 84 换乘)--> 目标基准经纬度
//!          --(投影正算 / 轴序交换)--> 目标坐标系
//! ```

use super::helmert::{Helmert, HelmertValues};
use super::{BuiltinOperation, OperationRef};
use crate::area::UsageArea;
use crate::crs::{catalog, AxisOrder, Crs, CrsKind};
use crate::datum::Datum;
use crate::error::{GeoError, GeoResult};
use crate::options::{IntermediateCrsPolicy, TransformOptions};
use std::fmt;

/// 一条候选路径：按顺序执行的原子操作
pub type OperationPath = Vec<OperationRef>;

/// 操作提供者
pub trait OperationProvider: Send + Sync + fmt::Debug {
    /// 列出 `source` 到 `target` 的候选路径
    ///
    /// 返回顺序即声明顺序，解析器以此作为最终的排序依据。
    ///
    /// # Errors
    ///
    /// 两个坐标系结构上无法互相转换时返回错误。
    fn create_operations(
        &self,
        source: &Crs,
        target: &Crs,
        options: &TransformOptions,
    ) -> GeoResult<Vec<OperationPath>>;
}

// ============================================================================
// 基准变换目录
// ============================================================================

/// 一条已登记的基准变换
#[derive(Debug, Clone)]
pub struct DatumShiftEntry {
    /// 名称
    pub name: String,
    /// 源基准
    pub source: Datum,
    /// 目标基准
    pub target: Datum,
    /// Helmert 参数（源 -> 目标）
    pub helmert: Helmert,
    /// 声明精度（米）
    pub accuracy: Option<f64>,
    /// 使用范围
    pub area: Option<UsageArea>,
}

impl DatumShiftEntry {
    /// 创建条目
    #[must_use]
    pub fn new(name: impl Into<String>, source: Datum, target: Datum, helmert: Helmert) -> Self {
        Self {
            name: name.into(),
            source,
            target,
            helmert,
            accuracy: None,
            area: None,
        }
    }

    /// 设置精度
    #[must_use]
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// 设置使用范围
    #[must_use]
    pub fn with_area(mut self, area: UsageArea) -> Self {
        self.area = Some(area);
        self
    }

    /// 沿 `from -> to` 方向的操作；方向不匹配时返回 `None`
    fn operation(&self, from: &Datum, to: &Datum) -> Option<BuiltinOperation> {
        let forward = self.source.same_as(from) && self.target.same_as(to);
        let backward = self.source.same_as(to) && self.target.same_as(from);
        if !forward && !backward {
            return None;
        }
        let op = BuiltinOperation::datum_shift(
            self.name.clone(),
            &Crs::geographic(self.source.clone()),
            &Crs::geographic(self.target.clone()),
            self.helmert,
            self.accuracy,
            self.area.clone(),
        )?;
        Some(if forward { op } else { op.reversed() })
    }
}

/// 内置目录
fn builtin_shifts() -> Vec<DatumShiftEntry> {
    let wgs84 = Datum::wgs84();
    vec![
        DatumShiftEntry::new(
            "Amersfoort to WGS 84 (1)",
            Datum::amersfoort(),
            wgs84.clone(),
            Helmert::seven_parameter(
                565.2369, 50.0087, 465.658, -0.406_857, 0.350_733, -1.870_35, 4.0812,
            ),
        )
        .with_accuracy(1.0)
        .with_area(catalog::netherlands()),
        DatumShiftEntry::new(
            "Amersfoort to WGS 84 (2)",
            Datum::amersfoort(),
            wgs84.clone(),
            Helmert::translation(593.16, 26.15, 478.54),
        )
        .with_accuracy(2.0)
        .with_area(catalog::netherlands()),
        DatumShiftEntry::new(
            "ETRS89 to WGS 84 (1)",
            Datum::etrs89(),
            wgs84.clone(),
            Helmert::null(),
        )
        .with_accuracy(1.0)
        .with_area(catalog::europe()),
        DatumShiftEntry::new(
            "WGS 84 to ETRS89 (time-dependent)",
            wgs84.clone(),
            Datum::etrs89(),
            Helmert::seven_parameter(0.0547, 0.0522, -0.0741, 0.001_701, 0.010_290, -0.016_632, 0.002_12)
                .with_rates(
                    HelmertValues {
                        tx: 0.0001,
                        ty: 0.0001,
                        tz: -0.0019,
                        rx: 0.000_081,
                        ry: 0.000_490,
                        rz: -0.000_792,
                        ds: 0.000_11,
                    },
                    2010.0,
                ),
        )
        .with_accuracy(0.1)
        .with_area(catalog::europe()),
        DatumShiftEntry::new(
            "China 2000 to WGS 84 (1)",
            Datum::cgcs2000(),
            wgs84,
            Helmert::null(),
        )
        .with_accuracy(1.0)
        .with_area(catalog::china()),
    ]
}

// ============================================================================
// 内置提供者
// ============================================================================

/// 内置操作提供者
#[derive(Debug, Clone)]
pub struct BuiltinOperationProvider {
    shifts: Vec<DatumShiftEntry>,
}

impl Default for BuiltinOperationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinOperationProvider {
    /// 带内置基准变换目录的提供者
    #[must_use]
    pub fn new() -> Self {
        Self {
            shifts: builtin_shifts(),
        }
    }

    /// 不含任何基准变换的提供者
    #[must_use]
    pub fn empty() -> Self {
        Self { shifts: Vec::new() }
    }

    /// 追加一条基准变换（链式）
    #[must_use]
    pub fn with_shift(mut self, entry: DatumShiftEntry) -> Self {
        self.shifts.push(entry);
        self
    }

    /// 追加一条基准变换
    pub fn add_shift(&mut self, entry: DatumShiftEntry) {
        self.shifts.push(entry);
    }

    /// 已登记的基准变换
    #[must_use]
    pub fn shifts(&self) -> &[DatumShiftEntry] {
        &self.shifts
    }

    /// `from -> to` 的全部直接基准变换（目录 + 基准内嵌的 `to_wgs84`）
    fn direct_shifts(&self, from: &Datum, to: &Datum) -> Vec<Vec<OperationRef>> {
        let mut paths: Vec<Vec<OperationRef>> = self
            .shifts
            .iter()
            .filter_map(|entry| entry.operation(from, to))
            .map(|op| vec![op.into_ref()])
            .collect();

        let embedded = |datum: &Datum| {
            let helmert = datum.to_wgs84?;
            BuiltinOperation::datum_shift(
                format!("Transformation from {} to WGS 84", datum.name),
                &Crs::geographic(datum.clone()),
                &Crs::geographic(Datum::wgs84()),
                helmert,
                None,
                None,
            )
        };

        match (from.to_wgs84.is_some(), to.to_wgs84.is_some()) {
            (true, false) if to.is_wgs84() => paths.extend(embedded(from).map(|op| vec![op.into_ref()])),
            (false, true) if from.is_wgs84() => {
                paths.extend(embedded(to).map(|op| vec![op.reversed().into_ref()]));
            }
            (true, true) => {
                if let (Some(a), Some(b)) = (embedded(from), embedded(to)) {
                    paths.push(vec![a.into_ref(), b.reversed().into_ref()]);
                }
            }
            _ => {}
        }
        paths
    }

    /// 经 WGS 84 换乘的基准变换
    fn via_wgs84(&self, from: &Datum, to: &Datum) -> Vec<Vec<OperationRef>> {
        let wgs84 = Datum::wgs84();
        if from.same_as(&wgs84) || to.same_as(&wgs84) {
            return Vec::new();
        }
        let first = self.direct_shifts(from, &wgs84);
        let second = self.direct_shifts(&wgs84, to);
        let mut paths = Vec::with_capacity(first.len() * second.len());
        for a in &first {
            for b in &second {
                paths.push(a.iter().chain(b).cloned().collect());
            }
        }
        paths
    }
}

/// `crs` -> 经度在前的同基准地理坐标系
fn lead_steps(crs: &Crs, base: &Crs) -> Vec<OperationRef> {
    match crs.kind() {
        CrsKind::Geographic { .. } if crs.axis_order() == AxisOrder::NorthEast => {
            vec![BuiltinOperation::axis_swap(crs, base).into_ref()]
        }
        CrsKind::Projected { .. } => BuiltinOperation::conversion(base, crs)
            .map(|op| vec![op.reversed().into_ref()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// 经度在前的同基准地理坐标系 -> `crs`
fn tail_steps(base: &Crs, crs: &Crs) -> Vec<OperationRef> {
    match crs.kind() {
        CrsKind::Geographic { .. } if crs.axis_order() == AxisOrder::NorthEast => {
            vec![BuiltinOperation::axis_swap(base, crs).into_ref()]
        }
        CrsKind::Projected { .. } => BuiltinOperation::conversion(base, crs)
            .map(|op| vec![op.into_ref()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

impl OperationProvider for BuiltinOperationProvider {
    fn create_operations(
        &self,
        source: &Crs,
        target: &Crs,
        options: &TransformOptions,
    ) -> GeoResult<Vec<OperationPath>> {
        let incompatible = |reason: &str| GeoError::IncompatibleCrs {
            source_crs: source.name().to_string(),
            target_crs: target.name().to_string(),
            reason: reason.to_string(),
        };

        if let (CrsKind::Temporal { unit: u1 }, CrsKind::Temporal { unit: u2 }) =
            (source.kind(), target.kind())
        {
            if u1 != u2 {
                return Err(incompatible("时间单位不同"));
            }
            return Ok(vec![vec![BuiltinOperation::null_offset(source, target).into_ref()]]);
        }

        let (Some(src_base), Some(tgt_base)) = (source.geographic_base(), target.geographic_base())
        else {
            return Err(incompatible("坐标域不同"));
        };
        let (Some(src_datum), Some(tgt_datum)) = (source.datum(), target.datum()) else {
            return Err(incompatible("缺少大地基准"));
        };

        let lead = lead_steps(source, &src_base);

        if src_datum.same_as(tgt_datum) {
            let mut path = lead;
            path.extend(tail_steps(&src_base, target));
            if path.is_empty() {
                path.push(BuiltinOperation::null_offset(source, target).into_ref());
            }
            return Ok(vec![path]);
        }

        let tail = tail_steps(&tgt_base, target);

        let mut shifts = self.direct_shifts(src_datum, tgt_datum);
        let hop = match options.intermediate_crs_policy {
            IntermediateCrsPolicy::Never => false,
            IntermediateCrsPolicy::IfNoDirectPath => shifts.is_empty(),
            IntermediateCrsPolicy::Always => true,
        };
        if hop {
            shifts.extend(self.via_wgs84(src_datum, tgt_datum));
        }
        if shifts.is_empty() {
            shifts.push(vec![BuiltinOperation::ballpark(&src_base, &tgt_base).into_ref()]);
        }

        Ok(shifts
            .into_iter()
            .map(|middle| {
                lead.iter()
                    .cloned()
                    .chain(middle)
                    .chain(tail.iter().cloned())
                    .collect()
            })
            .collect())
    }
}
