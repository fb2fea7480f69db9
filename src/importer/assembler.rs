// ==========================================
// 环境监测配置管理系统 - 暂存库装配器
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 4.1 暂存装配
// 职责: 逐文件读取交换元素, 装入独立暂存库; 记录解析信号;
//       平台后处理（清身份 / 提取嵌入对象 / 历史版本过滤）
// 红线: 暂存库实体不携带目标库身份; 平台清单文件判为致命错误
// ==========================================

use crate::domain::database::ConfigDatabase;
use crate::domain::types::{name_key, ElementFilter};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::xml::{read_element_file, ParsedElement};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// 解析信号: 记录本批输入里出现过哪些整集元素
///
/// 写入器据此决定是否写出枚举/单位/等价集合, 未出现则不触碰目标集
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseSignals {
    pub enums_seen: bool,
    pub units_seen: bool,
    pub equivalences_seen: bool,
}

/// 装配结果: 暂存库 + 解析信号 + 阶段计数
#[derive(Debug)]
pub struct AssembleOutcome {
    pub staging: ConfigDatabase,
    pub signals: ParseSignals,
    pub files_read: usize,
    pub elements_staged: usize,
    pub elements_skipped: usize,
}

// ==========================================
// StagingAssembler
// ==========================================
pub struct StagingAssembler {
    /// 接受失效时间非空的历史平台版本（-H）
    allow_historical: bool,
    /// 配置软链接模式（-C）: 不暂存嵌入配置, 平台仅保留名称引用
    link_configs_by_name: bool,
}

impl StagingAssembler {
    pub fn new(allow_historical: bool, link_configs_by_name: bool) -> Self {
        Self {
            allow_historical,
            link_configs_by_name,
        }
    }

    /// 读取全部输入文件, 装配暂存库
    pub fn assemble(
        &self,
        files: &[PathBuf],
        filter: &ElementFilter,
    ) -> ImportResult<AssembleOutcome> {
        let mut staging = ConfigDatabase::new();
        let mut signals = ParseSignals::default();
        let mut staged = 0usize;
        let mut skipped = 0usize;

        for path in files {
            let element = read_element_file(path, filter)?;
            match element {
                ParsedElement::Skipped(kind) => {
                    debug!("跳过被过滤的元素: {} ({})", kind, path.display());
                    skipped += 1;
                }
                ParsedElement::PlatformList => {
                    return Err(ImportError::PlatformListNotImportable(
                        path.display().to_string(),
                    ));
                }
                other => {
                    if self.stage_element(other, &mut staging, &mut signals) {
                        staged += 1;
                    } else {
                        skipped += 1;
                    }
                }
            }
        }

        self.link_presentation_parents(&mut staging);
        info!("暂存库装配完成: {}", staging.counts_summary());

        Ok(AssembleOutcome {
            staging,
            signals,
            files_read: files.len(),
            elements_staged: staged,
            elements_skipped: skipped,
        })
    }

    /// 单元素入库; 返回 false 表示被降级丢弃（已记日志）
    fn stage_element(
        &self,
        element: ParsedElement,
        staging: &mut ConfigDatabase,
        signals: &mut ParseSignals,
    ) -> bool {
        match element {
            ParsedElement::Platform(platform) => self.stage_platform(platform, staging),
            ParsedElement::Site(site) => {
                if site.preferred_name().is_none() {
                    warn!("站点没有任何名称, 丢弃");
                    return false;
                }
                staging.upsert_site(site);
                true
            }
            ParsedElement::RoutingSpec { spec, data_sources } => {
                for ds in data_sources {
                    match staging.find_data_source(&ds.name) {
                        Some(idx) => staging.data_sources[idx] = ds,
                        None => staging.data_sources.push(ds),
                    }
                }
                match staging.find_routing_spec(&spec.name) {
                    Some(idx) => staging.routing_specs[idx] = spec,
                    None => staging.routing_specs.push(spec),
                }
                true
            }
            ParsedElement::NetworkList(nl) => {
                match staging.find_network_list(&nl.name) {
                    Some(idx) => staging.network_lists[idx] = nl,
                    None => staging.network_lists.push(nl),
                }
                true
            }
            ParsedElement::PresentationGroup(pg) => {
                match staging.find_presentation_group(&pg.name) {
                    Some(idx) => staging.presentation_groups[idx] = pg,
                    None => staging.presentation_groups.push(pg),
                }
                true
            }
            ParsedElement::ScheduleEntry(se) => {
                match staging.find_schedule_entry(&se.name) {
                    Some(idx) => staging.schedule_entries[idx] = se,
                    None => staging.schedule_entries.push(se),
                }
                true
            }
            ParsedElement::CompAppInfo(app) => {
                match staging.find_loading_app(&app.app_name) {
                    Some(idx) => staging.loading_apps[idx] = app,
                    None => staging.loading_apps.push(app),
                }
                true
            }
            ParsedElement::PlatformConfig(config) => {
                self.stage_embedded_models(&config, staging);
                staging.put_platform_config(config);
                true
            }
            ParsedElement::EquipmentModel(em) => {
                staging.put_equipment_model(em);
                true
            }
            ParsedElement::EnumList(enums) => {
                signals.enums_seen = true;
                for e in enums {
                    match staging.find_enum(&e.name) {
                        Some(idx) => staging.enums[idx] = e,
                        None => staging.enums.push(e),
                    }
                }
                true
            }
            ParsedElement::EngineeringUnitList { units, converters } => {
                signals.units_seen = true;
                for eu in units {
                    staging.merge_engineering_unit(eu);
                }
                for uc in converters {
                    staging.merge_unit_converter(uc);
                }
                true
            }
            ParsedElement::DataTypeEquivalenceList(groups) => {
                signals.equivalences_seen = true;
                for group in groups {
                    for pair in group.windows(2) {
                        staging.equivalences.assert_equivalence(&pair[0], &pair[1]);
                    }
                }
                true
            }
            ParsedElement::IntervalList(intervals) => {
                for iv in intervals {
                    match staging
                        .intervals
                        .iter_mut()
                        .find(|i| name_key(&i.name) == name_key(&iv.name))
                    {
                        Some(existing) => *existing = iv,
                        None => staging.intervals.push(iv),
                    }
                }
                true
            }
            // 上层已分流
            ParsedElement::PlatformList | ParsedElement::Skipped(_) => false,
        }
    }

    /// 平台后处理: 历史过滤 → 清身份 → 提取嵌入对象 → 入库
    fn stage_platform(
        &self,
        mut platform: crate::domain::platform::Platform,
        staging: &mut ConfigDatabase,
    ) -> bool {
        if platform.expiration.is_some() && !self.allow_historical {
            warn!("历史平台版本被忽略 (未指定接受历史版本): {}", platform.display_name());
            return false;
        }

        platform.clear_id();

        if let Some(config) = platform.config.take() {
            self.stage_embedded_models(&config, staging);
            if self.link_configs_by_name {
                // 软链接模式: 配置定义不入暂存库, 平台仅留名称引用
                platform.config_name = Some(config.name);
            } else {
                platform.config_name = None;
                platform.config = Some(config.clone());
                staging.put_platform_config(config);
            }
        }

        for tm in &platform.transport_media {
            if let Some(em) = &tm.equipment_model {
                staging.put_equipment_model(em.clone());
            }
        }

        if let Some(site) = &platform.site {
            if site.preferred_name().is_none() {
                // 站点提取失败降级: 平台保留, 站点引用清除
                warn!("平台内嵌站点没有名称, 清除站点引用: {}", platform.display_name());
                platform.site = None;
            } else {
                staging.upsert_site(site.clone());
            }
        }

        staging.platforms.push(platform);
        true
    }

    /// 把配置及其传感器携带的设备型号副本登记到暂存库规范集合
    fn stage_embedded_models(
        &self,
        config: &crate::domain::config::PlatformConfig,
        staging: &mut ConfigDatabase,
    ) {
        if let Some(em) = &config.equipment_model {
            staging.put_equipment_model(em.clone());
        }
        for sensor in &config.sensors {
            if let Some(em) = &sensor.equipment_model {
                staging.put_equipment_model(em.clone());
            }
        }
    }

    /// 展示组父链接: inherits_from 名称在本批其他组中可解析则建立链接
    fn link_presentation_parents(&self, staging: &mut ConfigDatabase) {
        let names: Vec<String> = staging
            .presentation_groups
            .iter()
            .map(|g| g.name.clone())
            .collect();
        for group in staging.presentation_groups.iter_mut() {
            group.parent = None;
            if let Some(parent_name) = &group.inherits_from {
                let resolved = names.iter().find(|n| {
                    name_key(n) == name_key(parent_name) && name_key(n) != name_key(&group.name)
                });
                match resolved {
                    Some(n) => group.parent = Some(n.clone()),
                    None => debug!(
                        "展示组 {} 的继承来源 {} 不在本批输入中, 留待合并时对目标库解析",
                        group.name, parent_name
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ElementKind;
    use std::fs;
    use std::path::Path;

    fn accept_all(_: ElementKind) -> bool {
        true
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn platform_file_stages_embedded_objects() {
        let dir = tempfile::tempdir().unwrap();
        let f = write_file(
            dir.path(),
            "p1.xml",
            r#"<Platform designator="A">
                 <Site><SiteName nameType="local">S1</SiteName></Site>
                 <PlatformConfig name="cfg1">
                   <EquipmentModel name="SU8200"/>
                 </PlatformConfig>
                 <TransportMedium mediumType="goes" mediumId="CE1"/>
               </Platform>"#,
        );
        let assembler = StagingAssembler::new(false, false);
        let out = assembler.assemble(&[f], &accept_all).unwrap();
        assert_eq!(out.elements_staged, 1);
        assert_eq!(out.staging.platforms.len(), 1);
        assert_eq!(out.staging.sites.len(), 1);
        assert!(out.staging.get_platform_config("cfg1").is_some());
        assert!(out.staging.get_equipment_model("SU8200").is_some());
        assert!(out.staging.platforms[0].id.is_none());
    }

    #[test]
    fn historical_platform_dropped_unless_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let xml = r#"<Platform>
                       <Site><SiteName nameType="local">S1</SiteName></Site>
                       <Expiration>2024-01-01T00:00:00Z</Expiration>
                     </Platform>"#;
        let f = write_file(dir.path(), "hist.xml", xml);

        let strict = StagingAssembler::new(false, false);
        let out = strict.assemble(&[f.clone()], &accept_all).unwrap();
        assert_eq!(out.staging.platforms.len(), 0);
        assert_eq!(out.elements_skipped, 1);

        let lenient = StagingAssembler::new(true, false);
        let out = lenient.assemble(&[f], &accept_all).unwrap();
        assert_eq!(out.staging.platforms.len(), 1);
    }

    #[test]
    fn soft_link_mode_keeps_name_reference_only() {
        let dir = tempfile::tempdir().unwrap();
        let f = write_file(
            dir.path(),
            "p2.xml",
            r#"<Platform>
                 <Site><SiteName nameType="local">S2</SiteName></Site>
                 <PlatformConfig name="cfg2"/>
               </Platform>"#,
        );
        let assembler = StagingAssembler::new(false, true);
        let out = assembler.assemble(&[f], &accept_all).unwrap();
        let p = &out.staging.platforms[0];
        assert!(p.config.is_none());
        assert_eq!(p.config_name.as_deref(), Some("cfg2"));
        assert!(out.staging.platform_configs.is_empty());
    }

    #[test]
    fn platform_list_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let f = write_file(dir.path(), "list.xml", "<PlatformList/>");
        let assembler = StagingAssembler::new(false, false);
        let err = assembler.assemble(&[f], &accept_all).unwrap_err();
        assert!(matches!(err, ImportError::PlatformListNotImportable(_)));
    }

    #[test]
    fn signals_track_whole_set_elements() {
        let dir = tempfile::tempdir().unwrap();
        let enums = write_file(
            dir.path(),
            "enums.xml",
            r#"<EnumList><Enum name="SiteNameType"><EnumValue value="usgs"/></Enum></EnumList>"#,
        );
        let units = write_file(
            dir.path(),
            "units.xml",
            r#"<EngineeringUnitList><EngineeringUnit abbr="ft"/></EngineeringUnitList>"#,
        );
        let assembler = StagingAssembler::new(false, false);
        let out = assembler.assemble(&[enums, units], &accept_all).unwrap();
        assert!(out.signals.enums_seen);
        assert!(out.signals.units_seen);
        assert!(!out.signals.equivalences_seen);
        assert_eq!(out.staging.enums.len(), 1);
        assert_eq!(out.staging.engineering_units.len(), 1);
    }

    #[test]
    fn presentation_parent_linked_within_batch() {
        let dir = tempfile::tempdir().unwrap();
        let parent = write_file(
            dir.path(),
            "pg1.xml",
            r#"<PresentationGroup name="base"/>"#,
        );
        let child = write_file(
            dir.path(),
            "pg2.xml",
            r#"<PresentationGroup name="derived"><InheritsFrom>BASE</InheritsFrom></PresentationGroup>"#,
        );
        let assembler = StagingAssembler::new(false, false);
        let out = assembler.assemble(&[parent, child], &accept_all).unwrap();
        let derived = &out.staging.presentation_groups
            [out.staging.find_presentation_group("derived").unwrap()];
        assert_eq!(derived.parent.as_deref(), Some("base"));
    }
}
