// crates/gs_reproject/src/filter.rs

//! 重投影过滤器
//!
//! 对坐标序列逐点应用转换节点，失败即中止整批（fail-fast）：
//!
//! 1. 按序对每个点求 `node.apply`（或逆向）
//! 2. 结果为“无值”时返回 `ReprojectionFailed(index, 原始点)`
//! 3. X/Y 按精度模型舍入，Z/T 原样保留
//! 4. 只写回序列声明的轴
//!
//! 两个实现共用 [`SequenceFilter`] 接口：
//!
//! - [`GenericReprojectFilter`]: 经由 `get`/`set` 逐点处理
//! - [`PackedReprojectFilter`]: 直接读写交错数组
//!
//! [`ReprojectFilter`] 在调用边界检查 `as_packed_mut` 选择实现。
//! 两条路径都先写入暂存区，全部成功后才写回，失败时序列保持原样。

use crate::error::{ReprojectError, ReprojectResult};
use crate::sequence::{CoordinateSequence, PackedSequence};
use gs_foundation::PrecisionModel;
use gs_geo::coord::UNSET;
use gs_geo::{Coord, Direction, TransformNode};

// ============================================================================
// 过滤器接口
// ============================================================================

/// 序列过滤器trait
pub trait SequenceFilter {
    /// 就地处理序列
    ///
    /// # Errors
    ///
    /// 任一点失败时返回错误，序列不被修改。
    fn filter(&self, sequence: &mut dyn CoordinateSequence) -> ReprojectResult<()>;
}

// ============================================================================
// 调度过滤器
// ============================================================================

/// 重投影过滤器
#[derive(Debug, Clone)]
pub struct ReprojectFilter {
    node: TransformNode,
    precision: PrecisionModel,
    direction: Direction,
}

impl ReprojectFilter {
    /// 创建正向过滤器
    pub fn new(node: TransformNode, precision: PrecisionModel) -> Self {
        Self {
            node,
            precision,
            direction: Direction::Forward,
        }
    }

    /// 设置方向
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// 转换节点
    pub fn node(&self) -> &TransformNode {
        &self.node
    }

    /// 精度模型
    pub fn precision(&self) -> PrecisionModel {
        self.precision
    }

    /// 方向
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// 逐点实现
    pub fn generic(&self) -> GenericReprojectFilter<'_> {
        GenericReprojectFilter { inner: self }
    }

    /// 打包数组实现
    pub fn packed(&self) -> PackedReprojectFilter<'_> {
        PackedReprojectFilter { inner: self }
    }

    /// 映射单个点
    ///
    /// # Errors
    ///
    /// 结果为“无值”时返回 `ReprojectionFailed`。
    pub fn transform_point(&self, index: usize, coord: Coord) -> ReprojectResult<Coord> {
        let out = self.node.apply_direction(self.direction, coord)?;
        if out.is_no_value() {
            tracing::warn!("重投影失败: 第 {} 个点 {} ({})", index, coord, self.node.name());
            return Err(ReprojectError::failed(index, coord));
        }
        Ok(Coord {
            x: self.precision.make_precise(out.x),
            y: self.precision.make_precise(out.y),
            ..out
        })
    }

    fn check_direction(&self) -> ReprojectResult<()> {
        if self.direction == Direction::Inverse && !self.node.has_inverse() {
            return Err(ReprojectError::NoInverse {
                operation: self.node.name(),
            });
        }
        Ok(())
    }
}

impl SequenceFilter for ReprojectFilter {
    fn filter(&self, sequence: &mut dyn CoordinateSequence) -> ReprojectResult<()> {
        if let Some(packed) = sequence.as_packed_mut() {
            return self.packed().filter_packed(packed);
        }
        self.generic().filter(sequence)
    }
}

// ============================================================================
// 逐点实现
// ============================================================================

/// 经由 `get`/`set` 的逐点过滤器
#[derive(Debug, Clone, Copy)]
pub struct GenericReprojectFilter<'a> {
    inner: &'a ReprojectFilter,
}

impl SequenceFilter for GenericReprojectFilter<'_> {
    fn filter(&self, sequence: &mut dyn CoordinateSequence) -> ReprojectResult<()> {
        self.inner.check_direction()?;
        let results = (0..sequence.len())
            .map(|i| self.inner.transform_point(i, sequence.get(i)))
            .collect::<ReprojectResult<Vec<_>>>()?;
        for (i, coord) in results.into_iter().enumerate() {
            sequence.set(i, coord);
        }
        tracing::trace!("逐点重投影完成: {} 个点", sequence.len());
        Ok(())
    }
}

// ============================================================================
// 打包数组实现
// ============================================================================

/// 直接读写交错数组的过滤器
#[derive(Debug, Clone, Copy)]
pub struct PackedReprojectFilter<'a> {
    inner: &'a ReprojectFilter,
}

impl PackedReprojectFilter<'_> {
    /// 处理打包序列
    ///
    /// # Errors
    ///
    /// 任一点失败时返回错误，数组不被修改。
    pub fn filter_packed(&self, sequence: &mut PackedSequence) -> ReprojectResult<()> {
        self.inner.check_direction()?;
        let dim = sequence.dimension();
        let src = sequence.as_slice();
        let mut scratch = vec![0.0; src.len()];

        for (i, (p, out)) in src
            .chunks_exact(dim)
            .zip(scratch.chunks_exact_mut(dim))
            .enumerate()
        {
            let coord = Coord {
                x: p[0],
                y: p[1],
                z: if dim > 2 { p[2] } else { UNSET },
                t: if dim > 3 { p[3] } else { UNSET },
            }
            .canonical();
            let q = self.inner.transform_point(i, coord)?.canonical();
            out[0] = q.x;
            out[1] = q.y;
            if dim > 2 {
                out[2] = q.z;
            }
            if dim > 3 {
                out[3] = q.t;
            }
        }

        sequence.as_mut_slice().copy_from_slice(&scratch);
        tracing::trace!("打包重投影完成: {} 个点", sequence.len());
        Ok(())
    }
}

impl SequenceFilter for PackedReprojectFilter<'_> {
    fn filter(&self, sequence: &mut dyn CoordinateSequence) -> ReprojectResult<()> {
        if let Some(packed) = sequence.as_packed_mut() {
            return self.filter_packed(packed);
        }
        self.inner.generic().filter(sequence)
    }
}

// ============================================================================
// 便捷函数
// ============================================================================

/// 对序列应用转换（正向）
///
/// # Errors
///
/// 任一点得到“无值”时返回 `ReprojectionFailed`，序列不被修改。
pub fn reproject_sequence(
    sequence: &mut dyn CoordinateSequence,
    node: &TransformNode,
    precision: &PrecisionModel,
) -> ReprojectResult<()> {
    ReprojectFilter::new(node.clone(), *precision).filter(sequence)
}
