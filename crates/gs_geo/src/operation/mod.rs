// crates/gs_geo/src/operation/mod.rs

//! 原子坐标操作
//!
//! [`CoordinateOperation`] 是坐标操作的统一接口：一个操作把源坐标系中的点映射到
//! 目标坐标系，失败时返回 [`Coord::NO_VALUE`] 而不是报错，以便批量处理继续进行。
//!
//! 内置实现 [`BuiltinOperation`] 覆盖：
//!
//! - 空偏移（同一坐标系）与粗略偏移（无已知基准变换）
//! - 轴序交换
//! - 投影正/反算
//! - 基于地心坐标的 Helmert 基准变换（可含历元）

pub mod helmert;
pub mod provider;

use crate::area::UsageArea;
use crate::coord::{Coord, UNSET};
use crate::crs::Crs;
use crate::ellipsoid::Ellipsoid;
use crate::projection::Projection;
use helmert::Helmert;
use std::fmt;
use std::sync::Arc;

pub use provider::{BuiltinOperationProvider, DatumShiftEntry, OperationPath, OperationProvider};

/// 共享的操作引用
pub type OperationRef = Arc<dyn CoordinateOperation>;

// ============================================================================
// 操作接口
// ============================================================================

/// 坐标操作
pub trait CoordinateOperation: Send + Sync + fmt::Debug {
    /// 操作名称
    fn name(&self) -> &str;

    /// 方法名称
    fn method_name(&self) -> &str;

    /// 源坐标系；仅有定义、无固定端点的操作返回 `None`
    fn source_crs(&self) -> Option<&Crs>;

    /// 目标坐标系
    fn target_crs(&self) -> Option<&Crs>;

    /// 声明精度（米），未知时为 `None`
    fn accuracy(&self) -> Option<f64>;

    /// 使用范围
    fn usage_area(&self) -> Option<&UsageArea>;

    /// 是否可逆
    fn has_inverse(&self) -> bool;

    /// 是否为粗略转换（未经验证的基准处理）
    fn is_ballpark(&self) -> bool {
        false
    }

    /// 结果是否依赖坐标的时间历元
    fn is_time_dependent(&self) -> bool {
        false
    }

    /// 正向映射
    fn forward(&self, coord: Coord) -> Coord;

    /// 逆向映射；不可逆时返回 `Coord::NO_VALUE`
    fn inverse(&self, coord: Coord) -> Coord;
}

// ============================================================================
// 内置操作
// ============================================================================

/// 内置操作的计算方法
#[derive(Debug, Clone)]
pub enum OperationMethod {
    /// 坐标不变
    Noop,
    /// 交换 X/Y
    AxisSwap,
    /// 经纬度 -> 投影坐标
    Projection(Projection),
    /// 地理坐标经地心坐标做 Helmert 变换
    DatumShift {
        /// 源椭球
        source: Ellipsoid,
        /// 目标椭球
        target: Ellipsoid,
        /// 参数
        helmert: Helmert,
    },
}

/// 操作元数据
#[derive(Debug, Clone)]
struct OperationMeta {
    name: String,
    method_name: String,
    source: Option<Crs>,
    target: Option<Crs>,
    accuracy: Option<f64>,
    area: Option<UsageArea>,
    ballpark: bool,
}

/// 内置坐标操作
#[derive(Debug, Clone)]
pub struct BuiltinOperation {
    meta: OperationMeta,
    method: OperationMethod,
    reversed: bool,
}

const INVERSE_PREFIX: &str = "Inverse of ";

impl BuiltinOperation {
    /// 空偏移：坐标在两个等价坐标系间不变
    #[must_use]
    pub fn null_offset(source: &Crs, target: &Crs) -> Self {
        let name = if source.is_geographic() && target.is_geographic() {
            format!("Null geographic offset from {source} to {target}")
        } else {
            format!("Null offset from {source} to {target}")
        };
        Self {
            meta: OperationMeta {
                name,
                method_name: "Geographic2D offsets".to_string(),
                source: Some(source.clone()),
                target: Some(target.clone()),
                accuracy: Some(0.0),
                area: None,
                ballpark: false,
            },
            method: OperationMethod::Noop,
            reversed: false,
        }
    }

    /// 粗略偏移：两个基准间没有已知变换时，经纬度原样保留
    #[must_use]
    pub fn ballpark(source: &Crs, target: &Crs) -> Self {
        Self {
            meta: OperationMeta {
                name: format!("Ballpark geographic offset from {source} to {target}"),
                method_name: "Geographic2D offsets".to_string(),
                source: Some(source.clone()),
                target: Some(target.clone()),
                accuracy: None,
                area: None,
                ballpark: true,
            },
            method: OperationMethod::Noop,
            reversed: false,
        }
    }

    /// 轴序交换
    #[must_use]
    pub fn axis_swap(source: &Crs, target: &Crs) -> Self {
        Self {
            meta: OperationMeta {
                name: "axis order change (2D)".to_string(),
                method_name: "Axis Order Reversal (2D)".to_string(),
                source: Some(source.clone()),
                target: Some(target.clone()),
                accuracy: Some(0.0),
                area: None,
                ballpark: false,
            },
            method: OperationMethod::AxisSwap,
            reversed: false,
        }
    }

    /// 投影换算：`base`（经度在前的地理坐标系）-> `projected`
    ///
    /// `projected` 不是投影坐标系时返回 `None`。
    #[must_use]
    pub fn conversion(base: &Crs, projected: &Crs) -> Option<Self> {
        let projection = projected.projection()?.clone();
        let name = projected
            .name()
            .split_once(" / ")
            .map_or_else(|| projection.method_name().to_string(), |(_, n)| n.to_string());
        Some(Self {
            meta: OperationMeta {
                name,
                method_name: projection.method_name().to_string(),
                source: Some(base.clone()),
                target: Some(projected.clone()),
                accuracy: Some(0.0),
                area: projected.area().cloned(),
                ballpark: false,
            },
            method: OperationMethod::Projection(projection),
            reversed: false,
        })
    }

    /// Helmert 基准变换，`source`/`target` 为经度在前的地理坐标系
    ///
    /// 任一坐标系没有椭球（时间坐标系）时返回 `None`。
    #[must_use]
    pub fn datum_shift(
        name: impl Into<String>,
        source: &Crs,
        target: &Crs,
        helmert: Helmert,
        accuracy: Option<f64>,
        area: Option<UsageArea>,
    ) -> Option<Self> {
        let method_name = if helmert.is_time_dependent() {
            "Time-dependent Position Vector tfm (geog2D)"
        } else if helmert.values.rx == 0.0
            && helmert.values.ry == 0.0
            && helmert.values.rz == 0.0
            && helmert.values.ds == 0.0
        {
            "Geocentric translations (geog2D domain)"
        } else {
            "Position Vector transformation (geog2D domain)"
        };
        Some(Self {
            meta: OperationMeta {
                name: name.into(),
                method_name: method_name.to_string(),
                source: Some(source.clone()),
                target: Some(target.clone()),
                accuracy,
                area,
                ballpark: false,
            },
            method: OperationMethod::DatumShift {
                source: source.ellipsoid()?,
                target: target.ellipsoid()?,
                helmert,
            },
            reversed: false,
        })
    }

    /// 反向操作：源/目标互换，正/逆映射互换
    #[must_use]
    pub fn reversed(&self) -> Self {
        let name = match self.meta.name.strip_prefix(INVERSE_PREFIX) {
            Some(original) => original.to_string(),
            None => format!("{INVERSE_PREFIX}{}", self.meta.name),
        };
        let mut meta = self.meta.clone();
        meta.name = name;
        std::mem::swap(&mut meta.source, &mut meta.target);
        Self {
            meta,
            method: self.method.clone(),
            reversed: !self.reversed,
        }
    }

    /// 计算方法
    #[must_use]
    pub fn method(&self) -> &OperationMethod {
        &self.method
    }

    /// 包装为共享引用
    #[must_use]
    pub fn into_ref(self) -> OperationRef {
        Arc::new(self)
    }

    fn apply_method(&self, coord: Coord, forward: bool) -> Coord {
        if coord.is_no_value() {
            return Coord::NO_VALUE;
        }
        match &self.method {
            OperationMethod::Noop => coord,
            OperationMethod::AxisSwap => coord.swap_xy(),
            OperationMethod::Projection(projection) => {
                let mapped = if forward {
                    projection.forward(coord.x, coord.y)
                } else {
                    projection.inverse(coord.x, coord.y)
                };
                match mapped {
                    Some((x, y)) => Coord { x, y, ..coord },
                    None => Coord::NO_VALUE,
                }
            }
            OperationMethod::DatumShift {
                source,
                target,
                helmert,
            } => {
                if forward {
                    shift(coord, source, target, |xyz| Some(helmert.forward(xyz, coord.t)))
                } else {
                    shift(coord, target, source, |xyz| helmert.inverse(xyz, coord.t))
                }
            }
        }
    }
}

/// 地理坐标 -> 地心坐标 -> 变换 -> 地理坐标
///
/// 输入没有 Z 时按椭球高 0 计算，输出也不带 Z。
fn shift(
    coord: Coord,
    from: &Ellipsoid,
    to: &Ellipsoid,
    transform: impl Fn([f64; 3]) -> Option<[f64; 3]>,
) -> Coord {
    if coord.y.abs() > 90.0 {
        return Coord::NO_VALUE;
    }
    let h = if coord.has_z() { coord.z } else { 0.0 };
    let (x, y, z) = from.geodetic_to_geocentric(coord.x, coord.y, h);
    let Some([x, y, z]) = transform([x, y, z]) else {
        return Coord::NO_VALUE;
    };
    let (lon, lat, h) = to.geocentric_to_geodetic(x, y, z);
    if !(lon.is_finite() && lat.is_finite()) {
        return Coord::NO_VALUE;
    }
    Coord {
        x: lon,
        y: lat,
        z: if coord.has_z() { h } else { UNSET },
        t: coord.t,
    }
}

impl CoordinateOperation for BuiltinOperation {
    fn name(&self) -> &str {
        &self.meta.name
    }

    fn method_name(&self) -> &str {
        &self.meta.method_name
    }

    fn source_crs(&self) -> Option<&Crs> {
        self.meta.source.as_ref()
    }

    fn target_crs(&self) -> Option<&Crs> {
        self.meta.target.as_ref()
    }

    fn accuracy(&self) -> Option<f64> {
        self.meta.accuracy
    }

    fn usage_area(&self) -> Option<&UsageArea> {
        self.meta.area.as_ref()
    }

    fn has_inverse(&self) -> bool {
        true
    }

    fn is_ballpark(&self) -> bool {
        self.meta.ballpark
    }

    fn is_time_dependent(&self) -> bool {
        matches!(&self.method, OperationMethod::DatumShift { helmert, .. } if helmert.is_time_dependent())
    }

    fn forward(&self, coord: Coord) -> Coord {
        self.apply_method(coord, !self.reversed)
    }

    fn inverse(&self, coord: Coord) -> Coord {
        self.apply_method(coord, self.reversed)
    }
}
