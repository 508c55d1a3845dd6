// crates/gs_srid/src/registry.rs

//! SRID 注册表
//!
//! 所有索引共用一把读写锁：
//!
//! - 主表 `srid -> 条目`
//! - 反向表 `坐标系实例 -> 条目`
//! - 每种标签类型一个二级表 `标签值 -> 条目`，槽位按类型名首次出现时分配
//!
//! 多表更新都在同一次写锁内完成，读者不会看到只出现在部分索引中的条目。
//! 未显式给出 SRID 时从负数起点向下分配，跳过已占用的值。

use crate::config::RegistryConfig;
use crate::error::{SridError, SridResult};
use crate::item::{SridItem, SridItemArgs};
use crate::tag::{SridTag, TagBinding};
use gs_geo::{Crs, CrsId, GeoResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// 内部状态
// ============================================================================

struct RegistryState {
    by_srid: HashMap<i32, Arc<SridItem>>,
    by_crs: HashMap<CrsId, Arc<SridItem>>,
    slots: HashMap<&'static str, usize>,
    tag_maps: Vec<HashMap<i64, Arc<SridItem>>>,
    next_auto: i32,
}

impl RegistryState {
    fn new(auto_srid_base: i32) -> Self {
        Self {
            by_srid: HashMap::new(),
            by_crs: HashMap::new(),
            slots: HashMap::new(),
            tag_maps: Vec::new(),
            next_auto: auto_srid_base,
        }
    }

    fn slot(&self, kind: &'static str) -> Option<usize> {
        self.slots.get(kind).copied()
    }

    fn slot_or_insert(&mut self, kind: &'static str) -> usize {
        if let Some(slot) = self.slot(kind) {
            return slot;
        }
        let slot = self.tag_maps.len();
        self.tag_maps.push(HashMap::new());
        self.slots.insert(kind, slot);
        tracing::debug!("标签类型 {} 分配槽位 {}", kind, slot);
        slot
    }

    fn tagged<T: SridTag>(&self, tag: T) -> Option<&Arc<SridItem>> {
        let slot = self.slot(T::KIND)?;
        self.tag_maps[slot].get(&tag.code())
    }

    fn is_live(&self, item: &Arc<SridItem>) -> bool {
        self.by_srid
            .get(&item.srid())
            .is_some_and(|current| Arc::ptr_eq(current, item))
    }

    /// 下一个空闲的自动 SRID（不修改计数器）
    fn peek_auto(&self) -> SridResult<i32> {
        let mut candidate = self.next_auto;
        while self.by_srid.contains_key(&candidate) {
            candidate = candidate
                .checked_sub(1)
                .ok_or_else(|| SridError::InvalidState("自动 SRID 已耗尽".into()))?;
        }
        Ok(candidate)
    }

    /// 等价的已登记条目：实例相同优先，其次按 SRID 从大到小
    fn find_equivalent(&self, crs: &Crs) -> Option<Arc<SridItem>> {
        if let Some(item) = self.by_crs.get(&crs.id()) {
            return Some(Arc::clone(item));
        }
        self.by_srid
            .values()
            .filter(|item| item.crs().is_equivalent(crs))
            .max_by_key(|item| item.srid())
            .cloned()
    }

    /// 检查能否注册，返回将使用的 SRID
    fn check_insert(&self, crs: &Crs, srid: Option<i32>) -> SridResult<i32> {
        if let Some(existing) = self.by_crs.get(&crs.id()) {
            return Err(SridError::DuplicateRegistration {
                srid: existing.srid(),
                crs: crs.name().to_string(),
            });
        }
        match srid {
            Some(0) => Err(SridError::InvalidSrid {
                srid: 0,
                reason: "0 保留为“未指定”".into(),
            }),
            Some(s) => match self.by_srid.get(&s) {
                Some(occupant) => Err(SridError::SridOccupied {
                    srid: s,
                    occupant: occupant.crs().name().to_string(),
                }),
                None => Ok(s),
            },
            None => self.peek_auto(),
        }
    }

    /// 写入主表与反向表；调用方已通过 `check_insert`
    fn commit_insert(&mut self, item: &Arc<SridItem>, auto: bool) {
        let srid = item.srid();
        self.by_srid.insert(srid, Arc::clone(item));
        self.by_crs.insert(item.crs().id(), Arc::clone(item));
        if auto {
            self.next_auto = srid.saturating_sub(1);
        }
    }

    /// 写入标签；调用方已确认标签值空闲且条目在该槽位无标签
    fn commit_tag(&mut self, item: &Arc<SridItem>, kind: &'static str, code: i64) {
        let slot = self.slot_or_insert(kind);
        self.tag_maps[slot].insert(code, Arc::clone(item));
        item.push_binding(TagBinding { slot, kind, code });
    }
}

// ============================================================================
// 注册表
// ============================================================================

/// SRID 注册表
///
/// 显式构造并以共享引用传递；测试中每个用例各自创建实例。
///
/// # 示例
///
/// ```
/// use gs_geo::Crs;
/// use gs_srid::SridRegistry;
///
/// let registry = SridRegistry::default();
/// let rd = registry.register(Crs::from_epsg(28992).unwrap(), Some(28992)).unwrap();
/// let auto = registry.register(Crs::wgs84(), None).unwrap();
///
/// assert_eq!(registry.get_by_srid(28992).unwrap().srid(), rd.srid());
/// assert_eq!(auto.srid(), -21000);
/// ```
pub struct SridRegistry {
    config: RegistryConfig,
    state: RwLock<RegistryState>,
}

impl Default for SridRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl SridRegistry {
    /// 创建注册表
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RegistryState::new(config.auto_srid_base)),
        }
    }

    /// 配置
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn make_item(&self, srid: i32, crs: Crs, args: SridItemArgs) -> Arc<SridItem> {
        Arc::new(SridItem::new(srid, crs, args, self.config.default_precision))
    }

    // ========================================================================
    // 注册
    // ========================================================================

    /// 注册坐标系
    ///
    /// `srid` 为 `None` 时自动分配负数 SRID。
    ///
    /// # Errors
    ///
    /// 该实例已注册时返回 `DuplicateRegistration`；显式 SRID 已被占用时返回
    /// `SridOccupied`；SRID 为 0 时返回 `InvalidSrid`。
    pub fn register(&self, crs: Crs, srid: Option<i32>) -> SridResult<Arc<SridItem>> {
        self.register_with(crs, srid, SridItemArgs::default())
    }

    /// 以显式 SRID 注册
    ///
    /// # Errors
    ///
    /// 同 [`SridRegistry::register`]。
    pub fn register_as(&self, crs: Crs, srid: i32) -> SridResult<Arc<SridItem>> {
        self.register(crs, Some(srid))
    }

    /// 带条目参数注册
    ///
    /// # Errors
    ///
    /// 同 [`SridRegistry::register`]。
    pub fn register_with(
        &self,
        crs: Crs,
        srid: Option<i32>,
        args: SridItemArgs,
    ) -> SridResult<Arc<SridItem>> {
        let mut state = self.state.write();
        let assigned = state.check_insert(&crs, srid)?;
        let item = self.make_item(assigned, crs, args);
        state.commit_insert(&item, srid.is_none());
        drop(state);

        tracing::info!("注册坐标系: SRID {} -> {}", item.srid(), item.crs());
        Ok(item)
    }

    /// 查找等价条目，不存在时注册其副本
    ///
    /// 先比较实例，再比较语义等价。新注册的是 `crs` 的副本，
    /// 调用方手中的句柄仍可单独注册。
    ///
    /// # Errors
    ///
    /// 自动 SRID 耗尽时返回 `InvalidState`。
    pub fn find_or_register(&self, crs: &Crs) -> SridResult<Arc<SridItem>> {
        if let Some(item) = self.state.read().find_equivalent(crs) {
            return Ok(item);
        }

        let mut state = self.state.write();
        // 获取写锁期间可能已有其他线程注册
        if let Some(item) = state.find_equivalent(crs) {
            return Ok(item);
        }
        let private = crs.duplicate();
        let srid = state.check_insert(&private, None)?;
        let item = self.make_item(srid, private, SridItemArgs::default());
        state.commit_insert(&item, true);
        drop(state);

        tracing::info!("按需注册坐标系: SRID {} -> {}", item.srid(), item.crs());
        Ok(item)
    }

    /// 注销条目
    ///
    /// 条目从所有索引中移除，之后对它登记标签返回 `InvalidState`。
    ///
    /// # Errors
    ///
    /// SRID 不存在时返回 `NotFound`。
    pub fn unregister(&self, srid: i32) -> SridResult<Arc<SridItem>> {
        let mut state = self.state.write();
        let item = state.by_srid.remove(&srid).ok_or(SridError::NotFound(srid))?;
        state.by_crs.remove(&item.crs().id());
        for binding in item.tags() {
            state.tag_maps[binding.slot].remove(&binding.code);
        }
        drop(state);

        tracing::info!("注销坐标系: SRID {} -> {}", srid, item.crs());
        Ok(item)
    }

    // ========================================================================
    // 查询
    // ========================================================================

    /// 按 SRID 查找
    ///
    /// # Errors
    ///
    /// 不存在时返回 `NotFound`。
    pub fn get_by_srid(&self, srid: i32) -> SridResult<Arc<SridItem>> {
        self.try_get_by_srid(srid).ok_or(SridError::NotFound(srid))
    }

    /// 按 SRID 查找（不报错）
    pub fn try_get_by_srid(&self, srid: i32) -> Option<Arc<SridItem>> {
        self.state.read().by_srid.get(&srid).cloned()
    }

    /// 按坐标系实例查找
    pub fn get_by_crs(&self, crs: &Crs) -> Option<Arc<SridItem>> {
        self.state.read().by_crs.get(&crs.id()).cloned()
    }

    /// 按标签查找
    pub fn get_by_tag<T: SridTag>(&self, tag: T) -> Option<Arc<SridItem>> {
        self.state.read().tagged(tag).cloned()
    }

    /// 按标签查找，不存在时报错
    ///
    /// # Errors
    ///
    /// 标签未登记时返回 `TagNotFound`。
    pub fn require_by_tag<T: SridTag>(&self, tag: T) -> SridResult<Arc<SridItem>> {
        self.get_by_tag(tag).ok_or(SridError::TagNotFound {
            kind: T::KIND,
            code: tag.code(),
        })
    }

    /// SRID 是否已占用
    pub fn contains_srid(&self, srid: i32) -> bool {
        self.state.read().by_srid.contains_key(&srid)
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.state.read().by_srid.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 全部 SRID（升序）
    pub fn srids(&self) -> Vec<i32> {
        let mut srids: Vec<i32> = self.state.read().by_srid.keys().copied().collect();
        srids.sort_unstable();
        srids
    }

    /// 已分配的标签类型数
    pub fn tag_kind_count(&self) -> usize {
        self.state.read().tag_maps.len()
    }

    // ========================================================================
    // 标签
    // ========================================================================

    /// 为条目登记标签
    ///
    /// 返回 `false` 的情形：该标签值已属于其他条目，或条目在该类型下已有
    /// 另一个标签值。重复登记同一对 (条目, 标签) 返回 `true`。
    ///
    /// # Errors
    ///
    /// 条目已失效（其 SRID 不再映射到它）时返回 `InvalidState`。
    pub fn register_tag<T: SridTag>(&self, item: &Arc<SridItem>, tag: T) -> SridResult<bool> {
        let code = tag.code();
        let mut state = self.state.write();
        if !state.is_live(item) {
            return Err(SridError::InvalidState(format!(
                "条目 SRID {} 已失效",
                item.srid()
            )));
        }

        if let Some(owner) = state.tagged(tag) {
            if Arc::ptr_eq(owner, item) {
                return Ok(true);
            }
            tracing::warn!(
                "标签 {}={} 已属于 SRID {}，拒绝登记到 SRID {}",
                T::KIND,
                code,
                owner.srid(),
                item.srid()
            );
            return Ok(false);
        }
        if let Some(existing) = state.slot(T::KIND).and_then(|s| item.binding_in_slot(s)) {
            tracing::warn!(
                "SRID {} 已有 {} 标签 {}，拒绝登记 {}",
                item.srid(),
                T::KIND,
                existing.code,
                code
            );
            return Ok(false);
        }

        state.commit_tag(item, T::KIND, code);
        tracing::debug!("登记标签: {}={} -> SRID {}", T::KIND, code, item.srid());
        Ok(true)
    }

    // ========================================================================
    // ensure
    // ========================================================================

    /// 按标签取得条目，不存在时构建并注册
    ///
    /// `builder` 在锁外调用且至多调用一次；标签已存在时不调用。`preferred`
    /// 空闲时使用它；若已被等价坐标系占用且该条目在此标签类型下尚无标签，
    /// 则复用该条目；否则自动分配。条目与标签在同一次写锁内提交，失败时
    /// 注册表不变。
    ///
    /// 并发调用同一标签时可能都执行 `builder`，只有一个结果被采用。
    ///
    /// # Errors
    ///
    /// `builder` 失败时返回 `Geo`；自动 SRID 耗尽时返回 `InvalidState`。
    pub fn ensure<T, F>(
        &self,
        tag: T,
        builder: F,
        preferred: Option<i32>,
    ) -> SridResult<Arc<SridItem>>
    where
        T: SridTag,
        F: FnOnce() -> GeoResult<Crs>,
    {
        self.ensure_with(tag, builder, preferred, SridItemArgs::default())
    }

    /// 带条目参数的 [`SridRegistry::ensure`]
    ///
    /// # Errors
    ///
    /// 同 [`SridRegistry::ensure`]。
    pub fn ensure_with<T, F>(
        &self,
        tag: T,
        builder: F,
        preferred: Option<i32>,
        args: SridItemArgs,
    ) -> SridResult<Arc<SridItem>>
    where
        T: SridTag,
        F: FnOnce() -> GeoResult<Crs>,
    {
        if let Some(item) = self.get_by_tag(tag) {
            return Ok(item);
        }

        let crs = builder()?;
        let code = tag.code();

        let mut state = self.state.write();
        if let Some(item) = state.tagged(tag).cloned() {
            tracing::debug!("ensure 竞争失败，丢弃新建的 {}", crs);
            return Ok(item);
        }
        let slot = state.slot(T::KIND);
        let can_take_tag =
            |item: &Arc<SridItem>| slot.is_none_or(|s| item.binding_in_slot(s).is_none());

        // 复用已登记的同一实例或占用首选 SRID 的等价条目
        let reusable = state
            .by_crs
            .get(&crs.id())
            .or_else(|| {
                preferred
                    .and_then(|p| state.by_srid.get(&p))
                    .filter(|occupant| occupant.crs().is_equivalent(&crs))
            })
            .filter(|item| can_take_tag(item))
            .cloned();
        if let Some(item) = reusable {
            state.commit_tag(&item, T::KIND, code);
            drop(state);
            tracing::info!("ensure 复用 SRID {} 并登记标签 {}={}", item.srid(), T::KIND, code);
            return Ok(item);
        }

        let crs = if state.by_crs.contains_key(&crs.id()) {
            crs.duplicate()
        } else {
            crs
        };
        let srid = preferred.filter(|p| *p != 0 && !state.by_srid.contains_key(p));
        let assigned = state.check_insert(&crs, srid)?;
        let item = self.make_item(assigned, crs, args);
        state.commit_insert(&item, srid.is_none());
        state.commit_tag(&item, T::KIND, code);
        drop(state);

        tracing::info!(
            "ensure 注册坐标系: SRID {} -> {} (标签 {}={})",
            item.srid(),
            item.crs(),
            T::KIND,
            code
        );
        Ok(item)
    }
}

impl std::fmt::Debug for SridRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SridRegistry")
            .field("config", &self.config)
            .field("entries", &state.by_srid.len())
            .field("tag_kinds", &state.tag_maps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gs_geo::GeoError;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Zone {
        North,
        South,
    }

    impl SridTag for Zone {
        const KIND: &'static str = "zone";

        fn code(self) -> i64 {
            self as i64
        }

        fn from_code(code: i64) -> Option<Self> {
            match code {
                0 => Some(Self::North),
                1 => Some(Self::South),
                _ => None,
            }
        }
    }

    #[test]
    fn test_register_explicit_and_auto() {
        let reg = SridRegistry::default();
        let a = reg.register(Crs::from_epsg(25832).unwrap(), Some(25832)).unwrap();
        let b = reg.register(Crs::wgs84(), None).unwrap();
        let c = reg.register(Crs::wgs84(), None).unwrap();
        assert_eq!(a.srid(), 25832);
        assert_eq!(b.srid(), -21000);
        assert_eq!(c.srid(), -21001);
        assert_eq!(reg.srids(), vec![-21001, -21000, 25832]);
    }

    #[test]
    fn test_same_instance_twice_is_duplicate() {
        let reg = SridRegistry::default();
        let crs = Crs::wgs84();
        reg.register(crs.clone(), None).unwrap();
        let err = reg.register(crs, None).unwrap_err();
        assert!(matches!(err, SridError::DuplicateRegistration { srid: -21000, .. }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_occupied_srid() {
        let reg = SridRegistry::default();
        reg.register_as(Crs::wgs84(), 4326).unwrap();
        let err = reg.register_as(Crs::wgs84(), 4326).unwrap_err();
        assert!(err.is_duplicate_registration());
        assert!(matches!(reg.register_as(Crs::wgs84(), 0), Err(SridError::InvalidSrid { .. })));
    }

    #[test]
    fn test_auto_skips_explicit() {
        let reg = SridRegistry::default();
        reg.register_as(Crs::wgs84(), -21000).unwrap();
        reg.register_as(Crs::wgs84(), -21001).unwrap();
        let auto = reg.register(Crs::wgs84(), None).unwrap();
        assert_eq!(auto.srid(), -21002);
    }

    #[test]
    fn test_custom_auto_base() {
        let reg = SridRegistry::new(RegistryConfig::default().with_auto_srid_base(-5));
        assert_eq!(reg.register(Crs::wgs84(), None).unwrap().srid(), -5);
    }

    #[test]
    fn test_find_or_register_dedups() {
        let reg = SridRegistry::default();
        let rd = Crs::from_epsg(28992).unwrap();
        let first = reg.find_or_register(&rd).unwrap();
        let second = reg.find_or_register(&rd).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // 注册的是副本，原句柄仍可单独注册
        assert!(!first.crs().same_instance(&rd));
        assert!(reg.register(rd, Some(28992)).is_ok());

        // 等价的新实例同样命中，且优先较大的 SRID
        let again = reg.find_or_register(&Crs::from_epsg(28992).unwrap()).unwrap();
        assert_eq!(again.srid(), 28992);
    }

    #[test]
    fn test_register_tag_rules() {
        let reg = SridRegistry::default();
        let a = reg.register(Crs::wgs84(), None).unwrap();
        let b = reg.register(Crs::from_epsg(4258).unwrap(), None).unwrap();

        assert!(reg.register_tag(&a, Zone::North).unwrap());
        assert!(reg.register_tag(&a, Zone::North).unwrap());
        // 标签已属于 a
        assert!(!reg.register_tag(&b, Zone::North).unwrap());
        // a 已有 zone 标签
        assert!(!reg.register_tag(&a, Zone::South).unwrap());

        assert!(Arc::ptr_eq(&reg.get_by_tag(Zone::North).unwrap(), &a));
        assert!(reg.get_by_tag(Zone::South).is_none());
        assert_eq!(a.tag::<Zone>(), Some(Zone::North));
        assert_eq!(b.tag::<Zone>(), None);
        assert_eq!(reg.tag_kind_count(), 1);
    }

    #[test]
    fn test_stale_item_is_invalid_state() {
        let reg = SridRegistry::default();
        let item = reg.register(Crs::wgs84(), None).unwrap();
        let other = SridRegistry::default();
        let err = other.register_tag(&item, Zone::North).unwrap_err();
        assert!(matches!(err, SridError::InvalidState(_)));
    }

    #[test]
    fn test_unregister_makes_item_stale() {
        let reg = SridRegistry::default();
        let item = reg.register_as(Crs::wgs84(), 4326).unwrap();
        assert!(reg.register_tag(&item, Zone::North).unwrap());

        let removed = reg.unregister(4326).unwrap();
        assert!(Arc::ptr_eq(&removed, &item));
        assert!(reg.get_by_tag(Zone::North).is_none());
        assert!(reg.get_by_crs(item.crs()).is_none());
        assert!(matches!(
            reg.register_tag(&item, Zone::South),
            Err(SridError::InvalidState(_))
        ));
        assert!(matches!(reg.unregister(4326), Err(SridError::NotFound(4326))));

        // 同一实例可重新注册
        let again = reg.register_as(item.crs().clone(), 4326).unwrap();
        assert!(!Arc::ptr_eq(&again, &item));
    }

    #[test]
    fn test_require_by_tag() {
        let reg = SridRegistry::default();
        let err = reg.require_by_tag(Zone::South).unwrap_err();
        assert!(matches!(err, SridError::TagNotFound { kind: "zone", code: 1 }));
    }

    #[test]
    fn test_ensure_calls_builder_once() {
        let reg = SridRegistry::default();
        let calls = Cell::new(0);
        let build = || {
            calls.set(calls.get() + 1);
            Crs::from_epsg(28992)
        };
        let a = reg.ensure(Zone::North, build, Some(28992)).unwrap();
        let b = reg.ensure(Zone::North, build, Some(28992)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.get(), 1);
        assert_eq!(a.srid(), 28992);
    }

    #[test]
    fn test_ensure_builder_failure_leaves_registry_unchanged() {
        let reg = SridRegistry::default();
        let err = reg
            .ensure(Zone::North, || Crs::create("EPSG:1"), Some(1))
            .unwrap_err();
        assert!(matches!(err, SridError::Geo(GeoError::UnsupportedEpsg { .. })));
        assert!(reg.is_empty());
        assert!(reg.get_by_tag(Zone::North).is_none());
    }

    #[test]
    fn test_ensure_reuses_equivalent_occupant() {
        let reg = SridRegistry::default();
        let plain = reg.register_as(Crs::from_epsg(4258).unwrap(), 4258).unwrap();
        let item = reg
            .ensure(Zone::South, || Crs::from_epsg(4258), Some(4258))
            .unwrap();
        assert!(Arc::ptr_eq(&plain, &item));
        assert_eq!(item.tag::<Zone>(), Some(Zone::South));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_ensure_falls_back_to_auto() {
        let reg = SridRegistry::default();
        reg.register_as(Crs::wgs84(), 28992).unwrap();
        let item = reg
            .ensure(Zone::North, || Crs::from_epsg(28992), Some(28992))
            .unwrap();
        assert_eq!(item.srid(), -21000);
        assert_eq!(reg.get_by_srid(28992).unwrap().crs().epsg(), Some(4326));
    }
}
