// crates/gs_reproject/src/sequence.rs

//! 坐标序列抽象
//!
//! 重投影过滤器遍历的统一接口，两种存储：
//!
//! - [`PackedSequence`]: 单个交错排列的 `f64` 数组（`x0 y0 [z0 [t0]] x1 y1 ...`）
//! - [`CoordinateArraySequence`]: 逐点存放 [`Coord`]
//!
//! 读取时未声明的轴为“未设置”；写回时只写声明的轴。

use crate::error::{ReprojectError, ReprojectResult};
use gs_geo::coord::UNSET;
use gs_geo::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// 轴声明
// ============================================================================

/// 序列声明的坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordinates {
    /// X, Y
    #[default]
    Xy,
    /// X, Y, Z
    Xyz,
    /// X, Y, Z, T
    Xyzt,
}

impl Ordinates {
    /// 每点的轴数
    #[inline]
    pub const fn dimension(self) -> usize {
        match self {
            Self::Xy => 2,
            Self::Xyz => 3,
            Self::Xyzt => 4,
        }
    }

    /// 由轴数创建
    pub const fn from_dimension(dimension: usize) -> Option<Self> {
        match dimension {
            2 => Some(Self::Xy),
            3 => Some(Self::Xyz),
            4 => Some(Self::Xyzt),
            _ => None,
        }
    }

    /// 是否声明 Z
    #[inline]
    pub const fn has_z(self) -> bool {
        !matches!(self, Self::Xy)
    }

    /// 是否声明 T
    #[inline]
    pub const fn has_t(self) -> bool {
        matches!(self, Self::Xyzt)
    }

    /// 把坐标裁剪到声明的轴，未声明的轴置为未设置
    #[inline]
    pub fn restrict(self, coord: Coord) -> Coord {
        let coord = coord.canonical();
        Coord {
            x: coord.x,
            y: coord.y,
            z: if self.has_z() { coord.z } else { UNSET },
            t: if self.has_t() { coord.t } else { UNSET },
        }
    }
}

impl fmt::Display for Ordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xy => write!(f, "XY"),
            Self::Xyz => write!(f, "XYZ"),
            Self::Xyzt => write!(f, "XYZT"),
        }
    }
}

// ============================================================================
// 序列 trait
// ============================================================================

/// 坐标序列trait
///
/// `get`/`set` 的下标越界时 panic，与切片索引一致。
pub trait CoordinateSequence {
    /// 点数
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 声明的轴
    fn ordinates(&self) -> Ordinates;

    /// 每点轴数
    fn dimension(&self) -> usize {
        self.ordinates().dimension()
    }

    /// 读取第 `index` 个点
    fn get(&self, index: usize) -> Coord;

    /// 写入第 `index` 个点（只写声明的轴）
    fn set(&mut self, index: usize, coord: Coord);

    /// 打包存储视图
    fn as_packed(&self) -> Option<&PackedSequence> {
        None
    }

    /// 可变打包存储视图，供快速路径直接改写数组
    fn as_packed_mut(&mut self) -> Option<&mut PackedSequence> {
        None
    }

    /// 复制出全部点
    fn to_coords(&self) -> Vec<Coord> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

// ============================================================================
// Vec<Coord> 实现 CoordinateSequence
// ============================================================================

impl CoordinateSequence for Vec<Coord> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn ordinates(&self) -> Ordinates {
        Ordinates::Xyzt
    }

    #[inline]
    fn get(&self, index: usize) -> Coord {
        self[index].canonical()
    }

    #[inline]
    fn set(&mut self, index: usize, coord: Coord) {
        self[index] = coord.canonical();
    }
}

// ============================================================================
// 打包序列
// ============================================================================

/// 交错排列的打包坐标序列
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackedSequence {
    ordinates: Ordinates,
    data: Vec<f64>,
}

impl PackedSequence {
    /// 创建空序列
    pub fn new(ordinates: Ordinates) -> Self {
        Self {
            ordinates,
            data: Vec::new(),
        }
    }

    /// 预留 `capacity` 个点
    pub fn with_capacity(ordinates: Ordinates, capacity: usize) -> Self {
        Self {
            ordinates,
            data: Vec::with_capacity(capacity * ordinates.dimension()),
        }
    }

    /// 从交错数组创建
    ///
    /// # Errors
    ///
    /// 数组长度不是维数的整数倍时返回 `InvalidLayout`。
    pub fn from_vec(ordinates: Ordinates, data: Vec<f64>) -> ReprojectResult<Self> {
        let dimension = ordinates.dimension();
        if data.len() % dimension != 0 {
            return Err(ReprojectError::InvalidLayout {
                len: data.len(),
                dimension,
            });
        }
        Ok(Self { ordinates, data })
    }

    /// 从坐标列表创建
    pub fn from_coords(ordinates: Ordinates, coords: &[Coord]) -> Self {
        let mut seq = Self::with_capacity(ordinates, coords.len());
        for &c in coords {
            seq.push(c);
        }
        seq
    }

    /// 追加一个点
    pub fn push(&mut self, coord: Coord) {
        let c = self.ordinates.restrict(coord);
        self.data.push(c.x);
        self.data.push(c.y);
        if self.ordinates.has_z() {
            self.data.push(c.z);
        }
        if self.ordinates.has_t() {
            self.data.push(c.t);
        }
    }

    /// 原始数组
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// 可变原始数组
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// 转换为数组
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl CoordinateSequence for PackedSequence {
    #[inline]
    fn len(&self) -> usize {
        self.data.len() / self.ordinates.dimension()
    }

    #[inline]
    fn ordinates(&self) -> Ordinates {
        self.ordinates
    }

    fn get(&self, index: usize) -> Coord {
        let dim = self.ordinates.dimension();
        let p = &self.data[index * dim..(index + 1) * dim];
        Coord {
            x: p[0],
            y: p[1],
            z: if dim > 2 { p[2] } else { UNSET },
            t: if dim > 3 { p[3] } else { UNSET },
        }
        .canonical()
    }

    fn set(&mut self, index: usize, coord: Coord) {
        let dim = self.ordinates.dimension();
        let c = self.ordinates.restrict(coord);
        let p = &mut self.data[index * dim..(index + 1) * dim];
        p[0] = c.x;
        p[1] = c.y;
        if dim > 2 {
            p[2] = c.z;
        }
        if dim > 3 {
            p[3] = c.t;
        }
    }

    fn as_packed(&self) -> Option<&PackedSequence> {
        Some(self)
    }

    fn as_packed_mut(&mut self) -> Option<&mut PackedSequence> {
        Some(self)
    }
}

// ============================================================================
// 逐点序列
// ============================================================================

/// 逐点存放的坐标序列
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinateArraySequence {
    ordinates: Ordinates,
    coords: Vec<Coord>,
}

impl CoordinateArraySequence {
    /// 创建空序列
    pub fn new(ordinates: Ordinates) -> Self {
        Self {
            ordinates,
            coords: Vec::new(),
        }
    }

    /// 从坐标列表创建，未声明的轴被丢弃
    pub fn from_coords(ordinates: Ordinates, coords: &[Coord]) -> Self {
        Self {
            ordinates,
            coords: coords.iter().map(|&c| ordinates.restrict(c)).collect(),
        }
    }

    /// 追加一个点
    pub fn push(&mut self, coord: Coord) {
        self.coords.push(self.ordinates.restrict(coord));
    }

    /// 坐标切片
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// 转换为坐标列表
    pub fn into_coords(self) -> Vec<Coord> {
        self.coords
    }
}

impl CoordinateSequence for CoordinateArraySequence {
    #[inline]
    fn len(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    fn ordinates(&self) -> Ordinates {
        self.ordinates
    }

    #[inline]
    fn get(&self, index: usize) -> Coord {
        self.coords[index]
    }

    #[inline]
    fn set(&mut self, index: usize, coord: Coord) {
        self.coords[index] = self.ordinates.restrict(coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_layout() {
        let seq = PackedSequence::from_coords(
            Ordinates::Xyz,
            &[Coord::xyz(1.0, 2.0, 3.0), Coord::xy(4.0, 5.0)],
        );
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.as_slice()[..3], [1.0, 2.0, 3.0]);
        // 缺失的 Z 存为 NaN
        assert!(seq.as_slice()[5].is_nan());
        assert!(!seq.get(1).has_z());
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(PackedSequence::from_vec(Ordinates::Xy, vec![1.0, 2.0, 3.0]).is_err());
        let seq = PackedSequence::from_vec(Ordinates::Xyzt, vec![0.0; 8]).unwrap();
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_set_writes_declared_axes_only() {
        let mut seq = PackedSequence::from_coords(Ordinates::Xy, &[Coord::xy(0.0, 0.0)]);
        seq.set(0, Coord::xyzt(1.0, 2.0, 3.0, 4.0));
        assert_eq!(seq.as_slice(), &[1.0, 2.0]);

        let mut arr = CoordinateArraySequence::from_coords(Ordinates::Xyz, &[Coord::xy(0.0, 0.0)]);
        arr.set(0, Coord::xyzt(1.0, 2.0, 3.0, 4.0));
        let c = arr.get(0);
        assert_eq!(c.z, 3.0);
        assert!(!c.has_t());
    }

    #[test]
    fn test_infinite_axis_reads_as_unset() {
        let seq = PackedSequence::from_vec(Ordinates::Xyz, vec![1.0, 2.0, f64::INFINITY]).unwrap();
        let c = seq.get(0);
        assert!(!c.has_z());
        assert!(c.z.is_nan());
    }

    #[test]
    fn test_capability_tag() {
        let mut packed = PackedSequence::new(Ordinates::Xy);
        let mut array = CoordinateArraySequence::new(Ordinates::Xy);
        let mut plain: Vec<Coord> = Vec::new();
        assert!(packed.as_packed_mut().is_some());
        assert!(array.as_packed_mut().is_none());
        assert!(plain.as_packed_mut().is_none());
        assert_eq!(plain.dimension(), 4);
    }

    #[test]
    fn test_ordinates_serde() {
        let json = serde_json::to_string(&Ordinates::Xyz).unwrap();
        assert_eq!(json, "\"xyz\"");
        assert_eq!(Ordinates::from_dimension(4), Some(Ordinates::Xyzt));
        assert_eq!(Ordinates::from_dimension(5), None);
    }
}
