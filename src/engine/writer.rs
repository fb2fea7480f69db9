// ==========================================
// 环境监测配置管理系统 - 依序写入器
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 4.4 依序写入
// 顺序: 设备型号 → 平台配置 → 站点 → 平台 → 简单数据源 →
//       组数据源 → 路由规范 → 计算进程 → 其余 → 平台索引 → 间隔
//       (每一类持久化行需要上一类已分配的代理身份)
// 红线: 单对象写入失败记日志后继续; 仅 I/O 级错误终止整批
// ==========================================

use crate::domain::database::ConfigDatabase;
use crate::domain::enums::{DbEnum, EnumValue};
use crate::domain::types::{name_key, EntityId, ENUM_SITE_NAME_TYPE};
use crate::engine::merge::{ref_display, EntityRef, MergeOutcome};
use crate::importer::assembler::ParseSignals;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::io::DatabaseIo;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// 写入阶段计数
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct DependencyOrderedWriter<'a> {
    io: &'a dyn DatabaseIo,
    /// 新平台空缺属主机构的缺省值（-O）
    default_owner: Option<String>,
}

impl<'a> DependencyOrderedWriter<'a> {
    pub fn new(io: &'a dyn DatabaseIo, default_owner: Option<String>) -> Self {
        Self { io, default_owner }
    }

    pub fn write(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        signals: &ParseSignals,
    ) -> RepositoryResult<WriteSummary> {
        let mut summary = WriteSummary::default();

        let new_name_types = self.register_site_name_types(destination, &outcome.new_objects);

        // 整集集合: 输入中出现过才触碰
        if signals.enums_seen || new_name_types {
            self.io.write_enum_list(&destination.enums)?;
        }
        if signals.units_seen {
            self.io
                .write_unit_set(&destination.engineering_units, &destination.unit_converters)?;
        }
        if signals.equivalences_seen {
            let groups = destination.equivalences.groups();
            self.io.write_equivalences(&groups)?;
        }

        self.write_equipment_models(destination, outcome, &mut summary)?;
        self.write_platform_configs(destination, outcome, &mut summary)?;
        self.write_sites(destination, outcome, &mut summary)?;
        self.write_platforms(destination, outcome, &mut summary)?;
        self.write_data_sources(destination, outcome, &mut summary)?;
        self.write_routing_specs(destination, outcome, &mut summary)?;
        self.write_loading_apps(destination, outcome, &mut summary)?;
        self.write_remaining(destination, outcome, &mut summary)?;

        if outcome.write_platform_list {
            self.io.write_platform_index(&destination.platforms)?;
        }
        if !outcome.pending_intervals.is_empty() {
            self.io.write_intervals(&outcome.pending_intervals)?;
        }

        info!(
            "写入完成: 成功={} 跳过={} 失败={}",
            summary.written, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    /// 新出现的站点名称类型登记到 SiteNameType 枚举; 返回是否有新增
    fn register_site_name_types(
        &self,
        destination: &mut ConfigDatabase,
        new_objects: &[EntityRef],
    ) -> bool {
        let mut types: BTreeSet<String> = BTreeSet::new();
        for entity in new_objects {
            match entity {
                EntityRef::Site(preferred) => {
                    if let Some(idx) = destination.find_site_by_preferred(preferred) {
                        for n in &destination.sites[idx].names {
                            types.insert(n.name_type.clone());
                        }
                    }
                }
                EntityRef::Platform(idx) => {
                    if let Some(site) = destination.platforms.get(*idx).and_then(|p| p.site.as_ref())
                    {
                        for n in &site.names {
                            types.insert(n.name_type.clone());
                        }
                    }
                }
                _ => {}
            }
        }
        if types.is_empty() {
            return false;
        }

        if destination.find_enum(ENUM_SITE_NAME_TYPE).is_none() {
            destination.enums.push(DbEnum::named(ENUM_SITE_NAME_TYPE));
        }
        let mut added = false;
        if let Some(e) = destination.find_enum_mut(ENUM_SITE_NAME_TYPE) {
            for t in types {
                if e.find_value(&t).is_none() {
                    e.replace_value(EnumValue::new(t, None));
                    added = true;
                }
            }
        }
        added
    }

    /// 单对象写入守卫: 对象级错误降级为计数+日志, I/O 级错误上抛
    fn guard(
        &self,
        result: RepositoryResult<EntityId>,
        entity: &EntityRef,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<Option<EntityId>> {
        match result {
            Ok(id) => {
                summary.written += 1;
                Ok(Some(id))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("写入失败, 跳过 {}: {}", ref_display(entity), e);
                summary.failed += 1;
                Ok(None)
            }
        }
    }

    fn write_equipment_models(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        for entity in &outcome.new_objects {
            let EntityRef::EquipmentModel(name) = entity else {
                continue;
            };
            let Some(model) = destination.get_equipment_model(name).cloned() else {
                continue;
            };
            if let Some(id) = self.guard(self.io.write_equipment_model(&model), entity, summary)? {
                if let Some(m) = destination.equipment_models.get_mut(&name_key(name)) {
                    m.id = Some(id);
                }
            }
        }
        Ok(())
    }

    fn write_platform_configs(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        for entity in &outcome.new_objects {
            let EntityRef::PlatformConfig(name) = entity else {
                continue;
            };
            let Some(mut config) = destination.get_platform_config(name).cloned() else {
                continue;
            };
            // 设备型号引用已在归一化阶段折叠, 此处补分配到的身份
            if let Some(em) = &mut config.equipment_model {
                em.id = destination.get_equipment_model(&em.name).and_then(|m| m.id);
            }
            if let Some(id) = self.guard(self.io.write_platform_config(&config), entity, summary)? {
                if let Some(c) = destination.platform_configs.get_mut(&name_key(name)) {
                    c.id = Some(id);
                }
            }
        }
        Ok(())
    }

    fn write_sites(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        for entity in &outcome.new_objects {
            let EntityRef::Site(preferred) = entity else {
                continue;
            };
            let Some(idx) = destination.find_site_by_preferred(preferred) else {
                continue;
            };
            let site = destination.sites[idx].clone();
            if let Some(id) = self.guard(self.io.write_site(&site), entity, summary)? {
                destination.sites[idx].id = Some(id);
            }
        }
        Ok(())
    }

    fn write_platforms(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        for entity in &outcome.new_objects {
            let EntityRef::Platform(idx) = entity else {
                continue;
            };
            let Some(platform) = destination.platforms.get(*idx).cloned() else {
                continue;
            };

            // 无介质或无配置的平台不可运营, 不写入
            if platform.transport_media.is_empty() {
                info!("平台 {} 没有传输介质, 不写入", platform.display_name());
                summary.skipped += 1;
                continue;
            }
            if platform.effective_config_name().is_none() {
                info!("平台 {} 没有配置, 不写入", platform.display_name());
                summary.skipped += 1;
                continue;
            }

            let mut platform = platform;
            if platform
                .owner_agency
                .as_deref()
                .map(str::trim)
                .map_or(true, str::is_empty)
            {
                platform.owner_agency = self.default_owner.clone();
            }

            // 外键身份按名称回查目标库
            if let Some(site) = &mut platform.site {
                let resolved = site
                    .preferred_name()
                    .map(|n| n.value.clone())
                    .and_then(|v| destination.find_site(&v))
                    .and_then(|s| s.id);
                site.id = resolved;
            }
            if let Some(config) = &mut platform.config {
                config.id = destination
                    .get_platform_config(&config.name)
                    .and_then(|c| c.id);
            }

            if let Some(id) = self.guard(self.io.write_platform(&platform), entity, summary)? {
                destination.platforms[*idx].force_set_id(id);
            }
        }
        Ok(())
    }

    fn write_data_sources(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        // 组数据源按名称引用简单数据源, 必须后写
        for group_pass in [false, true] {
            for entity in &outcome.new_objects {
                let EntityRef::DataSource(name) = entity else {
                    continue;
                };
                let Some(idx) = destination.find_data_source(name) else {
                    continue;
                };
                if destination.data_sources[idx].is_group() != group_pass {
                    continue;
                }
                let ds = destination.data_sources[idx].clone();
                if let Some(id) = self.guard(self.io.write_data_source(&ds), entity, summary)? {
                    destination.data_sources[idx].id = Some(id);
                }
            }
        }
        Ok(())
    }

    fn write_routing_specs(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        for entity in &outcome.new_objects {
            let EntityRef::RoutingSpec(name) = entity else {
                continue;
            };
            let Some(idx) = destination.find_routing_spec(name) else {
                continue;
            };
            let spec = destination.routing_specs[idx].clone();
            if let Some(id) = self.guard(self.io.write_routing_spec(&spec), entity, summary)? {
                destination.routing_specs[idx].id = Some(id);
            }
        }
        Ok(())
    }

    fn write_loading_apps(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        for entity in &outcome.new_objects {
            let EntityRef::CompAppInfo(name) = entity else {
                continue;
            };
            let Some(idx) = destination.find_loading_app(name) else {
                continue;
            };
            let app = destination.loading_apps[idx].clone();
            if let Some(id) = self.guard(self.io.write_loading_app(&app), entity, summary)? {
                destination.loading_apps[idx].id = Some(id);
            }
        }
        Ok(())
    }

    /// 其余类型: 网络列表、展示组、调度条目
    fn write_remaining(
        &self,
        destination: &mut ConfigDatabase,
        outcome: &MergeOutcome,
        summary: &mut WriteSummary,
    ) -> RepositoryResult<()> {
        for entity in &outcome.new_objects {
            match entity {
                EntityRef::NetworkList(name) => {
                    let Some(idx) = destination.find_network_list(name) else {
                        continue;
                    };
                    let nl = destination.network_lists[idx].clone();
                    if let Some(id) = self.guard(self.io.write_network_list(&nl), entity, summary)? {
                        destination.network_lists[idx].id = Some(id);
                    }
                }
                EntityRef::PresentationGroup(name) => {
                    let Some(idx) = destination.find_presentation_group(name) else {
                        continue;
                    };
                    let pg = destination.presentation_groups[idx].clone();
                    if let Some(id) =
                        self.guard(self.io.write_presentation_group(&pg), entity, summary)?
                    {
                        destination.presentation_groups[idx].id = Some(id);
                    }
                }
                EntityRef::ScheduleEntry(name) => {
                    let Some(idx) = destination.find_schedule_entry(name) else {
                        continue;
                    };
                    let se = destination.schedule_entries[idx].clone();
                    if let Some(id) =
                        self.guard(self.io.write_schedule_entry(&se), entity, summary)?
                    {
                        destination.schedule_entries[idx].id = Some(id);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
