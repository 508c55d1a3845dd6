// crates/gs_geo/src/coord.rs

//! 坐标元组
//!
//! `Coord` 最多携带 4 个轴：X/经度、Y/纬度、Z/高程、T/时间（历元，十进制年）。
//! 未设置的轴统一用 `NaN` 表示；读入时 `+∞` 等非有限值同样视为未设置。
//! 转换不得凭空生成 Z 或 T，也不得把未设置的轴当作 0。
//!
//! 转换失败时返回 [`Coord::NO_VALUE`]（所有轴均未设置）。

use std::fmt;

/// 未设置轴的哨兵值
pub const UNSET: f64 = f64::NAN;

/// 四维坐标元组
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    /// X / 经度 / 东向
    pub x: f64,
    /// Y / 纬度 / 北向
    pub y: f64,
    /// Z / 高程
    pub z: f64,
    /// T / 时间历元（十进制年）
    pub t: f64,
}

impl Coord {
    /// “无值”哨兵：所有轴均未设置
    pub const NO_VALUE: Self = Self {
        x: UNSET,
        y: UNSET,
        z: UNSET,
        t: UNSET,
    };

    /// 创建二维坐标
    #[inline]
    #[must_use]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: UNSET,
            t: UNSET,
        }
    }

    /// 创建三维坐标
    #[inline]
    #[must_use]
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, t: UNSET }
    }

    /// 创建四维坐标
    #[inline]
    #[must_use]
    pub const fn xyzt(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// 设置时间历元
    #[inline]
    #[must_use]
    pub const fn with_t(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// 是否为“无值”哨兵（X 或 Y 不是有限值）
    #[inline]
    #[must_use]
    pub fn is_no_value(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite())
    }

    /// Z 轴是否已设置
    #[inline]
    #[must_use]
    pub fn has_z(&self) -> bool {
        self.z.is_finite()
    }

    /// T 轴是否已设置
    #[inline]
    #[must_use]
    pub fn has_t(&self) -> bool {
        self.t.is_finite()
    }

    /// 有效维数：2、3 或 4，由已设置的尾部轴决定
    #[must_use]
    pub fn dimension(&self) -> usize {
        if self.has_t() {
            4
        } else if self.has_z() {
            3
        } else {
            2
        }
    }

    /// 把非有限的 Z/T 统一为 `NaN`
    #[inline]
    #[must_use]
    pub fn canonical(self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            z: if self.has_z() { self.z } else { UNSET },
            t: if self.has_t() { self.t } else { UNSET },
        }
    }

    /// 交换 X/Y
    #[inline]
    #[must_use]
    pub const fn swap_xy(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
            z: self.z,
            t: self.t,
        }
    }

    /// 平面欧氏距离
    #[inline]
    #[must_use]
    pub fn distance_2d(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// 近似相等：X/Y 差值不超过 `tol`，Z 要么都未设置要么差值不超过 `tol`
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        if (self.x - other.x).abs() > tol || (self.y - other.y).abs() > tol {
            return false;
        }
        match (self.has_z(), other.has_z()) {
            (true, true) => (self.z - other.z).abs() <= tol,
            (false, false) => true,
            _ => false,
        }
    }

    /// 逐轴比较，`NaN` 与 `NaN` 视为相等
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        fn eq(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }
        eq(self.x, other.x) && eq(self.y, other.y) && eq(self.z, other.z) && eq(self.t, other.t)
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self::NO_VALUE
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self::xy(x, y)
    }
}

impl From<(f64, f64, f64)> for Coord {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::xyz(x, y, z)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", self.x, self.y)?;
        if self.has_z() {
            write!(f, ", z={}", self.z)?;
        }
        if self.has_t() {
            write!(f, ", t={}", self.t)?;
        }
        write!(f, ")")
    }
}
