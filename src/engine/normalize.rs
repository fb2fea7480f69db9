// ==========================================
// 环境监测配置管理系统 - 引用归一化
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 4.3 归一化
// 职责: 合并后对整个目标库跑一遍, 把共享从属对象的重复副本
//       折叠到目标库规范实例; 给新站点补缺省机构代码;
//       把新展示组的父链接重新解析到目标库
// 红线: 作用域是整个目标库而非仅 new_objects, 早前运行留下的
//       悬挂副本也要被重新指向
// ==========================================

use crate::domain::database::ConfigDatabase;
use crate::domain::types::{name_key, SITE_NAME_TYPE_USGS};
use crate::engine::merge::EntityRef;
use tracing::debug;

pub struct ReferenceNormalizer {
    /// 新站点 usgs 名称缺省机构代码（-A）
    default_agency: Option<String>,
}

impl ReferenceNormalizer {
    pub fn new(default_agency: Option<String>) -> Self {
        Self { default_agency }
    }

    pub fn normalize(&self, destination: &mut ConfigDatabase, new_objects: &[EntityRef]) {
        self.collapse_config_models(destination);
        self.collapse_platform_references(destination);
        self.apply_default_agency(destination, new_objects);
        self.relink_presentation_parents(destination, new_objects);
    }

    /// 配置自身与各传感器的设备型号副本折叠到规范实例
    fn collapse_config_models(&self, destination: &mut ConfigDatabase) {
        let ConfigDatabase {
            ref mut platform_configs,
            ref equipment_models,
            ..
        } = *destination;
        for config in platform_configs.values_mut() {
            if let Some(em) = &config.equipment_model {
                if let Some(canonical) = equipment_models.get(&name_key(&em.name)) {
                    config.equipment_model = Some(canonical.clone());
                }
            }
            for sensor in config.sensors.iter_mut() {
                if let Some(em) = &sensor.equipment_model {
                    if let Some(canonical) = equipment_models.get(&name_key(&em.name)) {
                        sensor.equipment_model = Some(canonical.clone());
                    }
                }
            }
        }
    }

    /// 平台的介质设备型号与配置引用折叠到规范实例
    fn collapse_platform_references(&self, destination: &mut ConfigDatabase) {
        let ConfigDatabase {
            ref mut platforms,
            ref platform_configs,
            ref equipment_models,
            ..
        } = *destination;
        for platform in platforms.iter_mut() {
            for tm in platform.transport_media.iter_mut() {
                if let Some(em) = &tm.equipment_model {
                    if let Some(canonical) = equipment_models.get(&name_key(&em.name)) {
                        tm.equipment_model = Some(canonical.clone());
                    }
                }
            }
            if let Some(config_name) = platform.effective_config_name().map(str::to_string) {
                match platform_configs.get(&name_key(&config_name)) {
                    Some(canonical) => platform.config = Some(canonical.clone()),
                    None => debug!(
                        "平台 {} 引用的配置 {} 不在目标库中",
                        platform.display_name(),
                        config_name
                    ),
                }
            }
        }
    }

    /// 新站点的 usgs 名称缺少机构代码时补缺省值
    fn apply_default_agency(&self, destination: &mut ConfigDatabase, new_objects: &[EntityRef]) {
        let Some(agency) = &self.default_agency else {
            return;
        };
        for entity in new_objects {
            let EntityRef::Site(preferred) = entity else {
                continue;
            };
            let Some(idx) = destination.find_site_by_preferred(preferred) else {
                continue;
            };
            if let Some(name) = destination.sites[idx].name_of_type_mut(SITE_NAME_TYPE_USGS) {
                if name.agency_code.is_none() {
                    name.agency_code = Some(agency.clone());
                }
            }
        }
    }

    /// 新展示组的父链接对目标库重新解析, 解析不到置空
    fn relink_presentation_parents(
        &self,
        destination: &mut ConfigDatabase,
        new_objects: &[EntityRef],
    ) {
        let names: Vec<String> = destination
            .presentation_groups
            .iter()
            .map(|g| g.name.clone())
            .collect();
        for entity in new_objects {
            let EntityRef::PresentationGroup(group_name) = entity else {
                continue;
            };
            let Some(idx) = destination.find_presentation_group(group_name) else {
                continue;
            };
            let group = &mut destination.presentation_groups[idx];
            if let Some(parent_name) = group.parent.clone().or_else(|| group.inherits_from.clone())
            {
                group.parent = names
                    .iter()
                    .find(|n| {
                        name_key(n) == name_key(&parent_name) && name_key(n) != name_key(&group.name)
                    })
                    .cloned();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{ConfigSensor, EquipmentModel, PlatformConfig};
    use crate::domain::platform::{Platform, TransportMedium};
    use crate::domain::presentation::PresentationGroup;
    use crate::domain::site::{Site, SiteName};

    #[test]
    fn duplicate_model_copies_collapse_to_canonical() {
        let mut db = ConfigDatabase::new();
        let mut canonical = EquipmentModel::named("SU8200");
        canonical.id = Some(9);
        canonical.company = Some("Sutron".into());
        db.put_equipment_model(canonical);

        let mut config = PlatformConfig::named("cfg1");
        config.equipment_model = Some(EquipmentModel::named("SU8200"));
        let mut sensor = ConfigSensor::new(1, "STAGE");
        sensor.equipment_model = Some(EquipmentModel::named("su8200"));
        config.sensors.push(sensor);
        db.put_platform_config(config);

        let mut platform = Platform::new();
        let mut tm = TransportMedium::new("goes", "CE1");
        tm.equipment_model = Some(EquipmentModel::named("SU8200"));
        platform.transport_media.push(tm);
        platform.config = Some(PlatformConfig::named("cfg1"));
        db.platforms.push(platform);

        ReferenceNormalizer::new(None).normalize(&mut db, &[]);

        let cfg = db.get_platform_config("cfg1").unwrap();
        assert_eq!(cfg.equipment_model.as_ref().unwrap().id, Some(9));
        assert_eq!(cfg.sensors[0].equipment_model.as_ref().unwrap().id, Some(9));
        let p = &db.platforms[0];
        assert_eq!(p.transport_media[0].equipment_model.as_ref().unwrap().id, Some(9));
        assert_eq!(
            p.config.as_ref().unwrap().equipment_model.as_ref().unwrap().id,
            Some(9)
        );
    }

    #[test]
    fn soft_linked_platform_gets_canonical_config() {
        let mut db = ConfigDatabase::new();
        let mut canonical = PlatformConfig::named("cfg2");
        canonical.id = Some(5);
        db.put_platform_config(canonical);

        let mut platform = Platform::new();
        platform.config_name = Some("CFG2".into());
        db.platforms.push(platform);

        ReferenceNormalizer::new(None).normalize(&mut db, &[]);
        assert_eq!(db.platforms[0].config.as_ref().unwrap().id, Some(5));
    }

    #[test]
    fn default_agency_applied_to_new_sites_only() {
        let mut db = ConfigDatabase::new();
        let mut s1 = Site::new();
        s1.add_name(SiteName::new("usgs", "11111111"));
        db.sites.push(s1);
        let mut s2 = Site::new();
        s2.add_name(SiteName::new("usgs", "22222222"));
        db.sites.push(s2);

        let normalizer = ReferenceNormalizer::new(Some("USGS".into()));
        normalizer.normalize(&mut db, &[EntityRef::Site("11111111".into())]);

        assert_eq!(db.sites[0].names[0].agency_code.as_deref(), Some("USGS"));
        assert!(db.sites[1].names[0].agency_code.is_none());
    }

    #[test]
    fn parent_relink_clears_unresolvable() {
        let mut db = ConfigDatabase::new();
        let mut derived = PresentationGroup::named("derived");
        derived.inherits_from = Some("missing".into());
        derived.parent = Some("missing".into());
        db.presentation_groups.push(derived);

        ReferenceNormalizer::new(None)
            .normalize(&mut db, &[EntityRef::PresentationGroup("derived".into())]);
        assert!(db.presentation_groups[0].parent.is_none());

        db.presentation_groups.push(PresentationGroup::named("missing"));
        ReferenceNormalizer::new(None)
            .normalize(&mut db, &[EntityRef::PresentationGroup("derived".into())]);
        assert_eq!(db.presentation_groups[0].parent.as_deref(), Some("missing"));
    }
}
