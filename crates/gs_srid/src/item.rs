// crates/gs_srid/src/item.rs

//! 注册表条目
//!
//! 每个条目绑定一个 SRID 与一个坐标系句柄，另外持有：
//!
//! - 惰性创建的序列工厂（首次访问时构建一次）
//! - 只增不减的标签列表（由注册表在写锁内维护）
//! - 调用方扩展用的键值表，自带独立的锁

use crate::tag::{SridTag, TagBinding};
use gs_foundation::PrecisionModel;
use gs_geo::Crs;
use gs_reproject::{SequenceFactory, SequenceLayout};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// 条目参数
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SridItemArgs {
    /// 精度模型；`None` 时使用注册表默认值
    pub precision: Option<PrecisionModel>,
    /// 序列存储布局
    pub layout: SequenceLayout,
}

impl SridItemArgs {
    /// 指定精度模型
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.precision = Some(precision);
        self
    }

    /// 指定存储布局
    #[must_use]
    pub fn with_layout(mut self, layout: SequenceLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// 扩展表中的值
pub type ItemValue = Arc<dyn Any + Send + Sync>;

/// 注册表条目
pub struct SridItem {
    srid: i32,
    crs: Crs,
    args: SridItemArgs,
    default_precision: PrecisionModel,
    factory: OnceLock<SequenceFactory>,
    tags: RwLock<Vec<TagBinding>>,
    items: Mutex<HashMap<String, ItemValue>>,
}

impl SridItem {
    pub(crate) fn new(
        srid: i32,
        crs: Crs,
        args: SridItemArgs,
        default_precision: PrecisionModel,
    ) -> Self {
        Self {
            srid,
            crs,
            args,
            default_precision,
            factory: OnceLock::new(),
            tags: RwLock::new(Vec::new()),
            items: Mutex::new(HashMap::new()),
        }
    }

    /// SRID
    #[inline]
    pub fn srid(&self) -> i32 {
        self.srid
    }

    /// 坐标系
    #[inline]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// 条目参数
    pub fn args(&self) -> &SridItemArgs {
        &self.args
    }

    /// 生效的精度模型
    pub fn precision(&self) -> PrecisionModel {
        self.args.precision.unwrap_or(self.default_precision)
    }

    /// 序列工厂（首次访问时创建）
    pub fn factory(&self) -> &SequenceFactory {
        self.factory
            .get_or_init(|| SequenceFactory::new(self.srid, self.precision(), self.args.layout))
    }

    // ========================================================================
    // 标签
    // ========================================================================

    /// 读取某类型的标签
    pub fn tag<T: SridTag>(&self) -> Option<T> {
        self.tags
            .read()
            .iter()
            .find(|b| b.kind == T::KIND)
            .and_then(|b| T::from_code(b.code))
    }

    /// 全部标签
    pub fn tags(&self) -> Vec<TagBinding> {
        self.tags.read().clone()
    }

    pub(crate) fn binding_in_slot(&self, slot: usize) -> Option<TagBinding> {
        self.tags.read().iter().find(|b| b.slot == slot).copied()
    }

    pub(crate) fn push_binding(&self, binding: TagBinding) {
        self.tags.write().push(binding);
    }

    // ========================================================================
    // 扩展表
    // ========================================================================

    /// 写入扩展值，返回旧值
    pub fn set_item(&self, key: impl Into<String>, value: ItemValue) -> Option<ItemValue> {
        self.items.lock().insert(key.into(), value)
    }

    /// 读取扩展值并转换为具体类型
    pub fn item<V: Any + Send + Sync>(&self, key: &str) -> Option<Arc<V>> {
        let value = self.items.lock().get(key).cloned()?;
        value.downcast::<V>().ok()
    }

    /// 取出或创建扩展值
    pub fn item_or_insert_with<V, F>(&self, key: &str, init: F) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
        F: FnOnce() -> V,
    {
        let mut items = self.items.lock();
        let value = items
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(init()) as ItemValue)
            .clone();
        value.downcast::<V>().ok()
    }

    /// 删除扩展值
    pub fn remove_item(&self, key: &str) -> Option<ItemValue> {
        self.items.lock().remove(key)
    }

    /// 扩展表的键
    pub fn item_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for SridItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SridItem")
            .field("srid", &self.srid)
            .field("crs", &self.crs)
            .field("args", &self.args)
            .field("tags", &*self.tags.read())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SridItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SRID {} ({})", self.srid, self.crs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> SridItem {
        SridItem::new(
            -21000,
            Crs::wgs84(),
            SridItemArgs::default(),
            PrecisionModel::fixed(1e6),
        )
    }

    #[test]
    fn test_factory_uses_default_precision() {
        let it = item();
        assert_eq!(it.factory().precision(), PrecisionModel::fixed(1e6));
        assert_eq!(it.factory().srid(), -21000);
        // 同一实例
        assert!(std::ptr::eq(it.factory(), it.factory()));
    }

    #[test]
    fn test_args_override_precision() {
        let it = SridItem::new(
            1,
            Crs::wgs84(),
            SridItemArgs::default()
                .with_precision(PrecisionModel::Floating)
                .with_layout(SequenceLayout::Array),
            PrecisionModel::fixed(10.0),
        );
        assert_eq!(it.precision(), PrecisionModel::Floating);
        assert_eq!(it.factory().layout(), SequenceLayout::Array);
    }

    #[test]
    fn test_items_side_table() {
        let it = item();
        assert!(it.set_item("label", Arc::new("north".to_string())).is_none());
        assert_eq!(it.item::<String>("label").as_deref().map(String::as_str), Some("north"));
        // 类型不符
        assert!(it.item::<u32>("label").is_none());

        let counter = it.item_or_insert_with("count", || 7_u32).unwrap();
        assert_eq!(*counter, 7);
        let again = it.item_or_insert_with("count", || 9_u32).unwrap();
        assert_eq!(*again, 7);
        assert_eq!(it.item_keys(), vec!["count".to_string(), "label".to_string()]);

        assert!(it.remove_item("label").is_some());
        assert!(it.item::<String>("label").is_none());
    }

    #[test]
    fn test_items_independent_of_tags() {
        let it = item();
        it.set_item("x", Arc::new(1_i32));
        assert!(it.tags().is_empty());
    }
}
