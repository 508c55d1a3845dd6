// crates/gs_reproject/src/factory.rs

//! 坐标序列工厂
//!
//! 按 SRID、精度模型与存储布局创建序列。每个注册表条目惰性持有一个工厂。

use crate::sequence::{CoordinateArraySequence, CoordinateSequence, Ordinates, PackedSequence};
use gs_foundation::PrecisionModel;
use gs_geo::Coord;
use serde::{Deserialize, Serialize};

/// 序列存储布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceLayout {
    /// 交错数组（可走快速路径）
    #[default]
    Packed,
    /// 逐点数组
    Array,
}

/// 坐标序列工厂
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceFactory {
    srid: i32,
    precision: PrecisionModel,
    layout: SequenceLayout,
}

impl SequenceFactory {
    /// 创建工厂
    pub fn new(srid: i32, precision: PrecisionModel, layout: SequenceLayout) -> Self {
        Self {
            srid,
            precision,
            layout,
        }
    }

    /// 浮点精度、打包布局的工厂
    pub fn floating(srid: i32) -> Self {
        Self::new(srid, PrecisionModel::Floating, SequenceLayout::Packed)
    }

    /// SRID
    #[inline]
    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// 精度模型
    #[inline]
    pub fn precision(&self) -> PrecisionModel {
        self.precision
    }

    /// 存储布局
    #[inline]
    pub fn layout(&self) -> SequenceLayout {
        self.layout
    }

    /// 创建空序列
    pub fn create(&self, ordinates: Ordinates) -> Box<dyn CoordinateSequence + Send> {
        match self.layout {
            SequenceLayout::Packed => Box::new(PackedSequence::new(ordinates)),
            SequenceLayout::Array => Box::new(CoordinateArraySequence::new(ordinates)),
        }
    }

    /// 由坐标创建序列，X/Y 按精度模型舍入
    pub fn from_coords(
        &self,
        ordinates: Ordinates,
        coords: &[Coord],
    ) -> Box<dyn CoordinateSequence + Send> {
        let rounded: Vec<Coord> = coords.iter().map(|&c| self.make_precise(c)).collect();
        match self.layout {
            SequenceLayout::Packed => Box::new(PackedSequence::from_coords(ordinates, &rounded)),
            SequenceLayout::Array => {
                Box::new(CoordinateArraySequence::from_coords(ordinates, &rounded))
            }
        }
    }

    /// 创建打包序列（忽略布局设置）
    pub fn create_packed(&self, ordinates: Ordinates, coords: &[Coord]) -> PackedSequence {
        let mut seq = PackedSequence::with_capacity(ordinates, coords.len());
        for &c in coords {
            seq.push(self.make_precise(c));
        }
        seq
    }

    /// 按精度模型舍入 X/Y，Z/T 原样保留
    #[inline]
    pub fn make_precise(&self, coord: Coord) -> Coord {
        Coord {
            x: self.precision.make_precise(coord.x),
            y: self.precision.make_precise(coord.y),
            ..coord
        }
    }
}
