// crates/gs_srid/src/tag.rs

//! 标签类型
//!
//! 调用方以有限枚举作为条目的二级键。每种标签类型提供稳定的类型名
//! `KIND`，注册表首次遇到该类型名时为其分配槽位。

/// 注册表标签trait
///
/// # 示例
///
/// ```
/// use gs_srid::SridTag;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Region {
///     Netherlands,
///     Germany,
/// }
///
/// impl SridTag for Region {
///     const KIND: &'static str = "region";
///
///     fn code(self) -> i64 {
///         self as i64
///     }
///
///     fn from_code(code: i64) -> Option<Self> {
///         match code {
///             0 => Some(Self::Netherlands),
///             1 => Some(Self::Germany),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Region::from_code(Region::Germany.code()), Some(Region::Germany));
/// ```
pub trait SridTag: Copy + Send + Sync + 'static {
    /// 类型名（进程内唯一）
    const KIND: &'static str;

    /// 标签值
    fn code(self) -> i64;

    /// 由标签值还原
    fn from_code(code: i64) -> Option<Self>;
}

/// 条目上记录的一个标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagBinding {
    /// 槽位
    pub slot: usize,
    /// 类型名
    pub kind: &'static str,
    /// 标签值
    pub code: i64,
}
