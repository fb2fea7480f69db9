// ==========================================
// 环境监测配置管理系统 - 内存配置数据库
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 1. 数据库对象图
// 说明: 一次导入运行独占两个实例（目标库 / 暂存库）;
//       上下文显式传参, 不设全局"当前数据库"指针
// ==========================================

use crate::domain::config::{EquipmentModel, PlatformConfig};
use crate::domain::data_type::EquivalenceSet;
use crate::domain::enums::DbEnum;
use crate::domain::platform::Platform;
use crate::domain::presentation::PresentationGroup;
use crate::domain::routing::{DataSource, NetworkList, RoutingSpec};
use crate::domain::schedule::{CompAppInfo, IntervalRecord, ScheduleEntry};
use crate::domain::site::Site;
use crate::domain::types::name_key;
use crate::domain::units::{EngineeringUnit, UnitConverter};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// ==========================================
// ConfigDatabase - 配置对象图
// ==========================================
// 规范实例约束: 配置/设备型号集合以名称键持有唯一规范实例,
// 其余嵌入副本在归一化阶段折叠到这些实例
#[derive(Debug, Clone, Default)]
pub struct ConfigDatabase {
    pub sites: Vec<Site>,
    pub platforms: Vec<Platform>,
    /// 名称键(小写) → 规范实例
    pub platform_configs: BTreeMap<String, PlatformConfig>,
    /// 名称键(小写) → 规范实例
    pub equipment_models: BTreeMap<String, EquipmentModel>,
    pub network_lists: Vec<NetworkList>,
    pub presentation_groups: Vec<PresentationGroup>,
    pub data_sources: Vec<DataSource>,
    pub routing_specs: Vec<RoutingSpec>,
    pub enums: Vec<DbEnum>,
    pub equivalences: EquivalenceSet,
    pub engineering_units: Vec<EngineeringUnit>,
    pub unit_converters: Vec<UnitConverter>,
    pub loading_apps: Vec<CompAppInfo>,
    pub schedule_entries: Vec<ScheduleEntry>,
    pub intervals: Vec<IntervalRecord>,
}

impl ConfigDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== 站点 =====

    /// 按任一名称值查站点（身份匹配入口）
    pub fn find_site(&self, name_value: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.has_name_value(name_value))
    }

    pub fn find_site_index(&self, name_value: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.has_name_value(name_value))
    }

    /// 按首选名称查站点（合并的通用身份键）
    pub fn find_site_by_preferred(&self, preferred: &str) -> Option<usize> {
        self.sites.iter().position(|s| {
            s.preferred_name()
                .map(|n| n.matches_value(preferred))
                .unwrap_or(false)
        })
    }

    /// 增加或替换站点（按首选名称）, 返回其索引
    pub fn upsert_site(&mut self, site: Site) -> usize {
        if let Some(pn) = site.preferred_name().map(|n| n.value.clone()) {
            if let Some(idx) = self.find_site_by_preferred(&pn) {
                self.sites[idx] = site;
                return idx;
            }
        }
        self.sites.push(site);
        self.sites.len() - 1
    }

    // ===== 平台 =====

    /// 按 (站点索引, 标识符) 查平台; 标识符空白与缺失视为等同
    pub fn find_platform_by_site_designator(
        &self,
        site_idx: usize,
        designator: Option<&str>,
    ) -> Option<usize> {
        let desired = designator.map(|d| d.trim()).filter(|d| !d.is_empty());
        let site = self.sites.get(site_idx)?;
        self.platforms.iter().position(|p| {
            let p_desig = p
                .designator
                .as_deref()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty());
            let desig_match = match (p_desig, desired) {
                (None, None) => true,
                (Some(a), Some(b)) => name_key(a) == name_key(b),
                _ => false,
            };
            if !desig_match {
                return false;
            }
            match &p.site {
                Some(ps) => ps
                    .preferred_name()
                    .map(|n| site.has_name_value(&n.value))
                    .unwrap_or(false),
                None => false,
            }
        })
    }

    /// 按 (介质类型, 介质ID) 于给定时刻查平台
    ///
    /// 多个历史版本命中时选择失效时间最早但不早于该时刻的版本,
    /// 否则回落到未失效的当前版本
    pub fn find_platform_by_transport(
        &self,
        medium_type: &str,
        medium_id: &str,
        at: DateTime<Utc>,
    ) -> Option<usize> {
        let mut best: Option<(usize, Option<DateTime<Utc>>)> = None;
        for (idx, p) in self.platforms.iter().enumerate() {
            if !p.transport_media.iter().any(|tm| tm.matches(medium_type, medium_id)) {
                continue;
            }
            if !p.covers(at) {
                continue;
            }
            match (best, p.expiration) {
                (None, exp) => best = Some((idx, exp)),
                (Some((_, Some(best_exp))), Some(exp)) if exp < best_exp => {
                    best = Some((idx, Some(exp)))
                }
                (Some((_, None)), Some(exp)) => best = Some((idx, Some(exp))),
                _ => {}
            }
        }
        best.map(|(idx, _)| idx)
    }

    // ===== 名称键集合 =====

    pub fn get_platform_config(&self, name: &str) -> Option<&PlatformConfig> {
        self.platform_configs.get(&name_key(name))
    }

    pub fn put_platform_config(&mut self, config: PlatformConfig) {
        self.platform_configs.insert(name_key(&config.name), config);
    }

    pub fn get_equipment_model(&self, name: &str) -> Option<&EquipmentModel> {
        self.equipment_models.get(&name_key(name))
    }

    pub fn put_equipment_model(&mut self, model: EquipmentModel) {
        self.equipment_models.insert(name_key(&model.name), model);
    }

    // ===== 其余按名称的集合 =====

    pub fn find_network_list(&self, name: &str) -> Option<usize> {
        self.network_lists
            .iter()
            .position(|n| name_key(&n.name) == name_key(name))
    }

    pub fn find_presentation_group(&self, name: &str) -> Option<usize> {
        self.presentation_groups
            .iter()
            .position(|g| name_key(&g.name) == name_key(name))
    }

    pub fn find_data_source(&self, name: &str) -> Option<usize> {
        self.data_sources
            .iter()
            .position(|d| name_key(&d.name) == name_key(name))
    }

    pub fn find_routing_spec(&self, name: &str) -> Option<usize> {
        self.routing_specs
            .iter()
            .position(|r| name_key(&r.name) == name_key(name))
    }

    pub fn find_enum(&self, name: &str) -> Option<usize> {
        self.enums
            .iter()
            .position(|e| name_key(&e.name) == name_key(name))
    }

    pub fn find_enum_mut(&mut self, name: &str) -> Option<&mut DbEnum> {
        self.enums
            .iter_mut()
            .find(|e| name_key(&e.name) == name_key(name))
    }

    pub fn find_loading_app(&self, app_name: &str) -> Option<usize> {
        self.loading_apps
            .iter()
            .position(|a| name_key(&a.app_name) == name_key(app_name))
    }

    pub fn find_schedule_entry(&self, name: &str) -> Option<usize> {
        self.schedule_entries
            .iter()
            .position(|s| name_key(&s.name) == name_key(name))
    }

    // ===== 工程单位（整集语义）=====

    /// 并入单位（按缩写替换或追加）
    pub fn merge_engineering_unit(&mut self, eu: EngineeringUnit) {
        if let Some(existing) = self
            .engineering_units
            .iter_mut()
            .find(|e| name_key(&e.abbr) == name_key(&eu.abbr))
        {
            *existing = eu;
        } else {
            self.engineering_units.push(eu);
        }
    }

    /// 并入换算器（按 (from, to) 替换或追加）
    pub fn merge_unit_converter(&mut self, uc: UnitConverter) {
        if let Some(existing) = self.unit_converters.iter_mut().find(|c| {
            name_key(&c.from_abbr) == name_key(&uc.from_abbr)
                && name_key(&c.to_abbr) == name_key(&uc.to_abbr)
        }) {
            *existing = uc;
        } else {
            self.unit_converters.push(uc);
        }
    }

    /// 各集合计数摘要（日志用）
    pub fn counts_summary(&self) -> String {
        format!(
            "站点={} 平台={} 配置={} 设备型号={} 网络列表={} 展示组={} 数据源={} 路由规范={} 枚举={} 单位={} 进程={} 调度={}",
            self.sites.len(),
            self.platforms.len(),
            self.platform_configs.len(),
            self.equipment_models.len(),
            self.network_lists.len(),
            self.presentation_groups.len(),
            self.data_sources.len(),
            self.routing_specs.len(),
            self.enums.len(),
            self.engineering_units.len(),
            self.loading_apps.len(),
            self.schedule_entries.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::platform::TransportMedium;
    use crate::domain::site::SiteName;
    use chrono::TimeZone;

    fn site(values: &[(&str, &str)]) -> Site {
        let mut s = Site::new();
        for (t, v) in values {
            s.add_name(SiteName::new(*t, *v));
        }
        s
    }

    #[test]
    fn find_site_matches_alias() {
        let mut db = ConfigDatabase::new();
        db.sites.push(site(&[("usgs", "12345678"), ("local", "RIVERTON")]));
        assert!(db.find_site("riverton").is_some());
        assert!(db.find_site_by_preferred("riverton").is_none()); // 首选是 usgs 名
        assert!(db.find_site_by_preferred("12345678").is_some());
    }

    #[test]
    fn platform_site_designator_blank_equivalence() {
        let mut db = ConfigDatabase::new();
        db.sites.push(site(&[("local", "S1")]));
        let mut p = Platform::new();
        p.site = Some(site(&[("local", "S1")]));
        p.designator = Some("  ".into());
        db.platforms.push(p);
        assert_eq!(db.find_platform_by_site_designator(0, None), Some(0));
        assert_eq!(db.find_platform_by_site_designator(0, Some("")), Some(0));
        assert_eq!(db.find_platform_by_site_designator(0, Some("A")), None);
    }

    #[test]
    fn transport_lookup_prefers_covering_version() {
        let mut db = ConfigDatabase::new();
        let mut current = Platform::new();
        current.transport_media.push(TransportMedium::new("goes", "CE1"));
        let mut historical = Platform::new();
        historical.transport_media.push(TransportMedium::new("goes", "CE1"));
        historical.expiration = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        db.platforms.push(current);
        db.platforms.push(historical);

        let before = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        // 历史窗口内优先取最早覆盖的历史版本
        assert_eq!(db.find_platform_by_transport("goes", "CE1", before), Some(1));
        // 历史版本已失效, 回落当前版本
        assert_eq!(db.find_platform_by_transport("goes", "CE1", after), Some(0));
    }
}
