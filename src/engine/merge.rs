// ==========================================
// 环境监测配置管理系统 - 合并引擎
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 4.2 合并
// 职责: 逐集合把暂存实体与目标库对账, 分类为 新增/替换/保持
// 红线: 合并顺序固定（后写对象可引用先写对象）;
//       平台传输介质匹配优先于 (站点, 标识符) 匹配;
//       校验模式不改变任何分类决策, 仅抑制后续写入
// ==========================================

use crate::domain::database::ConfigDatabase;
use crate::domain::types::name_key;
use crate::importer::assembler::ParseSignals;
use crate::importer::error::{ImportError, ImportResult};
use chrono::Utc;
use tracing::{debug, info, warn};

// ==========================================
// MergeOptions - 合并配置（不可变）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// 只分类不写入（干跑冲突报告）
    pub validate_only: bool,
    /// 冲突时保留目标库对象
    pub keep_old: bool,
    /// 合并前清空目标库（互斥于 validate_only / keep_old）
    pub overwrite: bool,
    /// 仅清空平台相关子集（-p 与 -W 同时给出）
    pub platform_related_only: bool,
    /// 空白标识符的缺省值, 匹配开始前统一指派
    pub new_designator: Option<String>,
}

impl MergeOptions {
    /// 构造即校验: 选项组合不一致是配置错误, 不是运行时错误
    pub fn new(
        validate_only: bool,
        keep_old: bool,
        overwrite: bool,
        platform_related_only: bool,
        new_designator: Option<String>,
    ) -> ImportResult<MergeOptions> {
        if overwrite && validate_only {
            return Err(ImportError::ConflictingOptions(
                "覆盖模式与校验模式不能同时启用".to_string(),
            ));
        }
        if overwrite && keep_old {
            return Err(ImportError::ConflictingOptions(
                "覆盖模式与保留旧值模式不能同时启用".to_string(),
            ));
        }
        Ok(MergeOptions {
            validate_only,
            keep_old,
            overwrite,
            platform_related_only,
            new_designator,
        })
    }
}

// ==========================================
// EntityRef - 新增/替换对象的目标库句柄
// ==========================================
// 说明: 以名称键（平台以目标库索引）指向目标库集合内的实体,
//       写入器凭句柄回查实体当前状态, 不持有对象副本
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRef {
    /// 首选名称值
    Site(String),
    /// 目标库平台集合索引（合并只追加或原位替换, 索引稳定）
    Platform(usize),
    PlatformConfig(String),
    EquipmentModel(String),
    NetworkList(String),
    PresentationGroup(String),
    DataSource(String),
    RoutingSpec(String),
    CompAppInfo(String),
    ScheduleEntry(String),
    Enum(String),
}

/// 合并结果: 平台索引重建标志 + 新增/替换对象句柄 + 待写间隔记录
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub write_platform_list: bool,
    pub new_objects: Vec<EntityRef>,
    pub pending_intervals: Vec<crate::domain::schedule::IntervalRecord>,
}

// ==========================================
// MergeEngine
// ==========================================
pub struct MergeEngine {
    options: MergeOptions,
    signals: ParseSignals,
}

impl MergeEngine {
    pub fn new(options: MergeOptions, signals: ParseSignals) -> Self {
        Self { options, signals }
    }

    /// 合并暂存库到目标库
    ///
    /// 固定顺序: 枚举 → 网络列表 → 平台 → 展示组 → 数据源 →
    /// 路由规范 → 站点 → 数据类型等价 → 平台配置 → 设备型号
    pub fn merge(
        &self,
        destination: &mut ConfigDatabase,
        staging: &mut ConfigDatabase,
    ) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        if self.options.overwrite && !self.options.platform_related_only {
            // 覆盖模式: 整集集合清空, 由本次导入完整替换
            destination.engineering_units.clear();
            destination.unit_converters.clear();
            destination.equivalences.clear();
            if self.signals.enums_seen {
                destination.enums.clear();
            }
        }

        self.apply_default_designator(staging);

        if self.signals.enums_seen {
            self.merge_enums(destination, staging, &mut outcome);
        }
        self.merge_network_lists(destination, staging, &mut outcome);
        self.merge_platforms(destination, staging, &mut outcome);
        self.merge_presentation_groups(destination, staging, &mut outcome);
        self.merge_data_sources(destination, staging, &mut outcome);
        self.merge_routing_specs(destination, staging, &mut outcome);
        self.merge_sites(destination, staging, &mut outcome);
        self.merge_equivalences(destination, staging);
        self.merge_platform_configs(destination, staging, &mut outcome);
        self.merge_equipment_models(destination, staging, &mut outcome);

        if self.signals.units_seen {
            for eu in &staging.engineering_units {
                destination.merge_engineering_unit(eu.clone());
            }
            for uc in &staging.unit_converters {
                destination.merge_unit_converter(uc.clone());
            }
        }

        // 进程定义与调度条目按存在性并入, 不做内容对账
        for app in &staging.loading_apps {
            if destination.find_loading_app(&app.app_name).is_none() {
                destination.loading_apps.push(app.clone());
                outcome
                    .new_objects
                    .push(EntityRef::CompAppInfo(app.app_name.clone()));
            }
        }
        for entry in &staging.schedule_entries {
            if destination.find_schedule_entry(&entry.name).is_none() {
                destination.schedule_entries.push(entry.clone());
                outcome
                    .new_objects
                    .push(EntityRef::ScheduleEntry(entry.name.clone()));
            }
        }

        for iv in &staging.intervals {
            match destination
                .intervals
                .iter_mut()
                .find(|i| name_key(&i.name) == name_key(&iv.name))
            {
                Some(existing) => *existing = iv.clone(),
                None => destination.intervals.push(iv.clone()),
            }
            outcome.pending_intervals.push(iv.clone());
        }

        info!(
            "合并完成: 新增/替换 {} 个对象, 平台索引重建={}",
            outcome.new_objects.len(),
            outcome.write_platform_list
        );
        outcome
    }

    /// 匹配开始前给空白标识符指派缺省值
    fn apply_default_designator(&self, staging: &mut ConfigDatabase) {
        if let Some(designator) = &self.options.new_designator {
            for p in staging.platforms.iter_mut() {
                if p.designator_is_blank() {
                    p.designator = Some(designator.clone());
                }
            }
        }
    }

    // ===== 枚举: 值就地替换 =====

    fn merge_enums(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for se in &staging.enums {
            match destination.find_enum(&se.name) {
                None => {
                    destination.enums.push(se.clone());
                    outcome.new_objects.push(EntityRef::Enum(se.name.clone()));
                }
                Some(idx) => {
                    if destination.enums[idx].value_eq(se) {
                        continue;
                    }
                    if self.options.keep_old {
                        debug!("保留目标库枚举: {}", se.name);
                        continue;
                    }
                    let dest = &mut destination.enums[idx];
                    for v in &se.values {
                        dest.replace_value(v.clone());
                    }
                    if se.default_value.is_some() {
                        dest.default_value = se.default_value.clone();
                    }
                    outcome.new_objects.push(EntityRef::Enum(se.name.clone()));
                }
            }
        }
    }

    // ===== 网络列表 =====

    fn merge_network_lists(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for snl in &staging.network_lists {
            match destination.find_network_list(&snl.name) {
                None => {
                    destination.network_lists.push(snl.clone());
                    outcome
                        .new_objects
                        .push(EntityRef::NetworkList(snl.name.clone()));
                }
                Some(idx) => {
                    if destination.network_lists[idx].value_eq(snl) {
                        continue;
                    }
                    if self.options.keep_old {
                        debug!("保留目标库网络列表: {}", snl.name);
                        continue;
                    }
                    let old_id = destination.network_lists[idx].id;
                    let mut replacement = snl.clone();
                    replacement.id = old_id;
                    destination.network_lists[idx] = replacement;
                    outcome
                        .new_objects
                        .push(EntityRef::NetworkList(snl.name.clone()));
                }
            }
        }
    }

    // ===== 平台: 双自然键五分支匹配 =====

    fn merge_platforms(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for sp in &staging.platforms {
            let Some(ssite) = &sp.site else {
                warn!("平台没有站点, 无法匹配, 跳过: {}", sp.display_name());
                continue;
            };

            // 分支 1: 暂存站点任一别名解析目标库站点
            let dest_site_idx = ssite
                .names
                .iter()
                .find_map(|n| destination.find_site_index(&n.value));

            // 分支 2: (站点, 标识符) 匹配
            let site_desig_match = dest_site_idx.and_then(|site_idx| {
                destination.find_platform_by_site_designator(site_idx, sp.designator.as_deref())
            });

            // 分支 3: 传输介质匹配, 命中即覆盖分支 2 的结果
            let at = sp.expiration.unwrap_or_else(Utc::now);
            let tm_match = sp.transport_media.iter().find_map(|tm| {
                destination.find_platform_by_transport(&tm.medium_type, &tm.medium_id, at)
            });
            if let (Some(t), Some(s)) = (tm_match, site_desig_match) {
                if t != s {
                    warn!(
                        "平台 {} 的介质匹配与 (站点,标识符) 匹配指向不同目标, 介质匹配优先",
                        sp.display_name()
                    );
                }
            }

            match tm_match.or(site_desig_match) {
                // 分支 4: 两类键都未命中, 纯新增
                None => {
                    destination.platforms.push(sp.clone());
                    outcome
                        .new_objects
                        .push(EntityRef::Platform(destination.platforms.len() - 1));
                    outcome.write_platform_list = true;
                }
                // 分支 5: 命中且内容不同, 按保留策略替换或保持
                Some(idx) => {
                    if destination.platforms[idx].value_eq(sp) {
                        continue;
                    }
                    if self.options.keep_old {
                        debug!("保留目标库平台: {}", destination.platforms[idx].display_name());
                        continue;
                    }
                    let old_id = destination.platforms[idx].id;
                    let mut replacement = sp.clone();
                    if let Some(id) = old_id {
                        // 沿用被替换平台的身份, 下游外键保持可解析
                        replacement.force_set_id(id);
                    }
                    destination.platforms[idx] = replacement;
                    outcome.new_objects.push(EntityRef::Platform(idx));
                    outcome.write_platform_list = true;
                }
            }
        }
    }

    // ===== 展示组 =====

    fn merge_presentation_groups(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for spg in &staging.presentation_groups {
            match destination.find_presentation_group(&spg.name) {
                None => {
                    destination.presentation_groups.push(spg.clone());
                    outcome
                        .new_objects
                        .push(EntityRef::PresentationGroup(spg.name.clone()));
                }
                Some(idx) => {
                    if destination.presentation_groups[idx].value_eq(spg) {
                        continue;
                    }
                    if self.options.keep_old {
                        debug!("保留目标库展示组: {}", spg.name);
                        continue;
                    }
                    let old_id = destination.presentation_groups[idx].id;
                    let mut replacement = spg.clone();
                    replacement.id = old_id;
                    destination.presentation_groups[idx] = replacement;
                    outcome
                        .new_objects
                        .push(EntityRef::PresentationGroup(spg.name.clone()));
                }
            }
        }
    }

    // ===== 数据源 =====

    fn merge_data_sources(
        &self,
        destination: &mut ConfigDatabase,
        staging: &mut ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for sds in staging.data_sources.iter_mut() {
            match destination.find_data_source(&sds.name) {
                None => {
                    destination.data_sources.push(sds.clone());
                    outcome
                        .new_objects
                        .push(EntityRef::DataSource(sds.name.clone()));
                }
                Some(idx) => {
                    if destination.data_sources[idx].value_eq(sds) {
                        // 内容相同: 暂存副本直接继承目标库身份,
                        // 后写的路由规范按名称解析到有效 ID
                        sds.id = destination.data_sources[idx].id;
                        continue;
                    }
                    if self.options.keep_old {
                        debug!("保留目标库数据源: {}", sds.name);
                        continue;
                    }
                    let old_id = destination.data_sources[idx].id;
                    let mut replacement = sds.clone();
                    replacement.id = old_id;
                    destination.data_sources[idx] = replacement;
                    outcome
                        .new_objects
                        .push(EntityRef::DataSource(sds.name.clone()));
                }
            }
        }
    }

    // ===== 路由规范 =====

    fn merge_routing_specs(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for srs in &staging.routing_specs {
            match destination.find_routing_spec(&srs.name) {
                None => {
                    destination.routing_specs.push(srs.clone());
                    outcome
                        .new_objects
                        .push(EntityRef::RoutingSpec(srs.name.clone()));
                }
                Some(idx) => {
                    if destination.routing_specs[idx].value_eq(srs) {
                        continue;
                    }
                    if self.options.keep_old {
                        debug!("保留目标库路由规范: {}", srs.name);
                        continue;
                    }
                    let old_id = destination.routing_specs[idx].id;
                    let mut replacement = srs.clone();
                    replacement.id = old_id;
                    destination.routing_specs[idx] = replacement;
                    outcome
                        .new_objects
                        .push(EntityRef::RoutingSpec(srs.name.clone()));
                }
            }
        }
    }

    // ===== 站点: 首选名称为身份键 =====

    fn merge_sites(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for ssite in &staging.sites {
            let Some(preferred) = ssite.preferred_name().map(|n| n.value.clone()) else {
                warn!("站点没有名称, 跳过");
                continue;
            };
            match destination.find_site_by_preferred(&preferred) {
                None => {
                    destination.sites.push(ssite.clone());
                    outcome.new_objects.push(EntityRef::Site(preferred));
                }
                Some(idx) => {
                    if destination.sites[idx].value_eq(ssite) {
                        continue;
                    }
                    if self.options.keep_old {
                        debug!("保留目标库站点: {}", preferred);
                        continue;
                    }
                    let old_id = destination.sites[idx].id;
                    let mut replacement = ssite.clone();
                    replacement.id = old_id;
                    destination.sites[idx] = replacement;
                    outcome.new_objects.push(EntityRef::Site(preferred));
                }
            }
        }
    }

    // ===== 数据类型等价: 只增不减 =====

    fn merge_equivalences(&self, destination: &mut ConfigDatabase, staging: &mut ConfigDatabase) {
        for group in staging.equivalences.groups() {
            for pair in group.windows(2) {
                destination.equivalences.assert_equivalence(&pair[0], &pair[1]);
            }
        }
        for key in staging.equivalences.registered_keys() {
            destination.equivalences.register(&key);
        }
    }

    // ===== 平台配置 =====

    fn merge_platform_configs(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for sc in staging.platform_configs.values() {
            let existing = destination
                .get_platform_config(&sc.name)
                .map(|e| (e.value_eq(sc), e.id));
            match existing {
                None => {
                    destination.put_platform_config(sc.clone());
                    outcome
                        .new_objects
                        .push(EntityRef::PlatformConfig(sc.name.clone()));
                }
                Some((true, _)) => {}
                Some((false, _)) if self.options.keep_old => {
                    debug!("保留目标库平台配置: {}", sc.name);
                }
                Some((false, old_id)) => {
                    let mut replacement = sc.clone();
                    replacement.id = old_id;
                    destination.put_platform_config(replacement);
                    outcome
                        .new_objects
                        .push(EntityRef::PlatformConfig(sc.name.clone()));
                }
            }
        }
    }

    // ===== 设备型号 =====

    fn merge_equipment_models(
        &self,
        destination: &mut ConfigDatabase,
        staging: &ConfigDatabase,
        outcome: &mut MergeOutcome,
    ) {
        for sm in staging.equipment_models.values() {
            let existing = destination
                .get_equipment_model(&sm.name)
                .map(|e| (e.value_eq(sm), e.id));
            match existing {
                None => {
                    destination.put_equipment_model(sm.clone());
                    outcome
                        .new_objects
                        .push(EntityRef::EquipmentModel(sm.name.clone()));
                }
                Some((true, _)) => {}
                Some((false, _)) if self.options.keep_old => {
                    debug!("保留目标库设备型号: {}", sm.name);
                }
                Some((false, old_id)) => {
                    let mut replacement = sm.clone();
                    replacement.id = old_id;
                    destination.put_equipment_model(replacement);
                    outcome
                        .new_objects
                        .push(EntityRef::EquipmentModel(sm.name.clone()));
                }
            }
        }
    }
}

/// 写入前依赖排查用: 句柄对应实体是否仍在目标库
pub fn ref_display(entity: &EntityRef) -> String {
    match entity {
        EntityRef::Site(n) => format!("站点 {}", n),
        EntityRef::Platform(i) => format!("平台 #{}", i),
        EntityRef::PlatformConfig(n) => format!("平台配置 {}", n),
        EntityRef::EquipmentModel(n) => format!("设备型号 {}", n),
        EntityRef::NetworkList(n) => format!("网络列表 {}", n),
        EntityRef::PresentationGroup(n) => format!("展示组 {}", n),
        EntityRef::DataSource(n) => format!("数据源 {}", n),
        EntityRef::RoutingSpec(n) => format!("路由规范 {}", n),
        EntityRef::CompAppInfo(n) => format!("计算进程 {}", n),
        EntityRef::ScheduleEntry(n) => format!("调度条目 {}", n),
        EntityRef::Enum(n) => format!("枚举 {}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::platform::{Platform, TransportMedium};
    use crate::domain::routing::DataSource;
    use crate::domain::site::{Site, SiteName};

    fn site(values: &[(&str, &str)]) -> Site {
        let mut s = Site::new();
        for (t, v) in values {
            s.add_name(SiteName::new(*t, *v));
        }
        s
    }

    fn platform(site_name: &str, designator: Option<&str>, tm: Option<(&str, &str)>) -> Platform {
        let mut p = Platform::new();
        p.site = Some(site(&[("local", site_name)]));
        p.designator = designator.map(str::to_string);
        if let Some((t, id)) = tm {
            p.transport_media.push(TransportMedium::new(t, id));
        }
        p
    }

    fn engine(keep_old: bool) -> MergeEngine {
        let options = MergeOptions::new(false, keep_old, false, false, None).unwrap();
        MergeEngine::new(options, ParseSignals::default())
    }

    #[test]
    fn conflicting_options_rejected_at_construction() {
        assert!(MergeOptions::new(true, false, true, false, None).is_err());
        assert!(MergeOptions::new(false, true, true, false, None).is_err());
        assert!(MergeOptions::new(false, false, true, false, None).is_ok());
    }

    #[test]
    fn second_merge_of_same_snapshot_is_a_no_op() {
        let mut staging = ConfigDatabase::new();
        staging.sites.push(site(&[("local", "S1")]));
        staging.platforms.push(platform("S1", Some("A"), Some(("goes", "CE1"))));

        let mut destination = ConfigDatabase::new();
        let first = engine(false).merge(&mut destination, &mut staging.clone());
        assert!(!first.new_objects.is_empty());

        let second = engine(false).merge(&mut destination, &mut staging);
        assert!(second.new_objects.is_empty(), "{:?}", second.new_objects);
        assert!(!second.write_platform_list);
    }

    #[test]
    fn keep_old_retains_destination_site() {
        let mut destination = ConfigDatabase::new();
        let mut old = site(&[("local", "S1")]);
        old.description = Some("旧描述".into());
        destination.sites.push(old);

        let mut staging = ConfigDatabase::new();
        let mut new = site(&[("local", "S1")]);
        new.description = Some("新描述".into());
        staging.sites.push(new);

        let outcome = engine(true).merge(&mut destination, &mut staging);
        assert!(outcome.new_objects.is_empty());
        assert_eq!(destination.sites[0].description.as_deref(), Some("旧描述"));
    }

    #[test]
    fn transport_match_overrides_site_designator_match() {
        // 目标库: P2 按 (站点, 标识符) 命中, P3 按介质命中; 介质匹配胜出
        let mut destination = ConfigDatabase::new();
        destination.sites.push(site(&[("local", "S1")]));
        let mut p2 = platform("S1", Some("A"), None);
        p2.force_set_id(2);
        destination.platforms.push(p2);
        let mut p3 = platform("S2", None, Some(("goes", "1234")));
        p3.force_set_id(3);
        destination.platforms.push(p3);

        let mut staging = ConfigDatabase::new();
        let p1 = platform("S1", Some("A"), Some(("goes", "1234")));
        staging.platforms.push(p1);

        let outcome = engine(false).merge(&mut destination, &mut staging);
        assert_eq!(outcome.new_objects.iter().filter(|r| matches!(r, EntityRef::Platform(_))).count(), 1);
        // P3 被替换并沿用其身份
        assert_eq!(destination.platforms[1].id, Some(3));
        assert_eq!(destination.platforms[1].designator.as_deref(), Some("A"));
        // P2 原样保留
        assert_eq!(destination.platforms[0].id, Some(2));
        assert!(destination.platforms[0].transport_media.is_empty());
    }

    #[test]
    fn siteless_platform_is_skipped() {
        let mut staging = ConfigDatabase::new();
        let mut p = Platform::new();
        p.transport_media.push(TransportMedium::new("goes", "CE9"));
        staging.platforms.push(p);

        let mut destination = ConfigDatabase::new();
        let outcome = engine(false).merge(&mut destination, &mut staging);
        assert!(destination.platforms.is_empty());
        assert!(outcome.new_objects.is_empty());
    }

    #[test]
    fn blank_designator_defaulted_before_matching() {
        let options = MergeOptions::new(false, false, false, false, Some("Z".into())).unwrap();
        let eng = MergeEngine::new(options, ParseSignals::default());

        let mut staging = ConfigDatabase::new();
        staging.platforms.push(platform("S1", Some("  "), None));

        let mut destination = ConfigDatabase::new();
        eng.merge(&mut destination, &mut staging);
        assert_eq!(destination.platforms[0].designator.as_deref(), Some("Z"));
    }

    #[test]
    fn unchanged_data_source_adopts_destination_id() {
        let mut destination = ConfigDatabase::new();
        let mut ds = DataSource::named("lrgs1", "lrgs");
        ds.id = Some(42);
        destination.data_sources.push(ds);

        let mut staging = ConfigDatabase::new();
        staging.data_sources.push(DataSource::named("lrgs1", "lrgs"));

        let outcome = engine(false).merge(&mut destination, &mut staging);
        assert_eq!(staging.data_sources[0].id, Some(42));
        assert!(!outcome
            .new_objects
            .iter()
            .any(|r| matches!(r, EntityRef::DataSource(_))));
    }

    #[test]
    fn replacement_keeps_destination_identity() {
        let mut destination = ConfigDatabase::new();
        let mut old = site(&[("local", "S1")]);
        old.id = Some(7);
        destination.sites.push(old);

        let mut staging = ConfigDatabase::new();
        let mut new = site(&[("local", "S1")]);
        new.description = Some("更新".into());
        staging.sites.push(new);

        engine(false).merge(&mut destination, &mut staging);
        assert_eq!(destination.sites[0].id, Some(7));
        assert_eq!(destination.sites[0].description.as_deref(), Some("更新"));
    }

    #[test]
    fn equivalences_merge_is_additive() {
        use crate::domain::data_type::DataTypeKey;
        let mut destination = ConfigDatabase::new();
        destination.equivalences.assert_equivalence(
            &DataTypeKey::new("shef-pe", "HG"),
            &DataTypeKey::new("epa-code", "00065"),
        );

        let mut staging = ConfigDatabase::new();
        staging.equivalences.assert_equivalence(
            &DataTypeKey::new("epa-code", "00065"),
            &DataTypeKey::new("cwms", "Stage"),
        );

        engine(false).merge(&mut destination, &mut staging);
        assert!(destination.equivalences.are_equivalent(
            &DataTypeKey::new("shef-pe", "HG"),
            &DataTypeKey::new("cwms", "Stage"),
        ));
    }

    #[test]
    fn overwrite_clears_whole_set_collections() {
        use crate::domain::units::EngineeringUnit;
        let options = MergeOptions::new(false, false, true, false, None).unwrap();
        let eng = MergeEngine::new(options, ParseSignals::default());

        let mut destination = ConfigDatabase::new();
        destination.engineering_units.push(EngineeringUnit::new("ft"));

        let mut staging = ConfigDatabase::new();
        eng.merge(&mut destination, &mut staging);
        assert!(destination.engineering_units.is_empty());
    }
}
