// ==========================================
// 环境监测配置管理系统 - 覆盖清库处理器
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 4.5 覆盖模式
// 顺序: 子表先于父表（调度 → 路由 → 数据源 → 网络列表 →
//       平台 → 平台配置 → 设备型号）; 整集集合清空不逐行删
// 红线: 进程定义与站点行永不删除 —— 外部子系统持有本引擎
//       看不见的外键
// ==========================================

use crate::domain::database::ConfigDatabase;
use crate::repository::error::RepositoryResult;
use crate::repository::io::DatabaseIo;
use tracing::info;

pub struct OverwriteHandler<'a> {
    io: &'a dyn DatabaseIo,
    /// 仅清空平台相关子集（-p 与 -W 同时给出）
    platform_related_only: bool,
}

impl<'a> OverwriteHandler<'a> {
    pub fn new(io: &'a dyn DatabaseIo, platform_related_only: bool) -> Self {
        Self {
            io,
            platform_related_only,
        }
    }

    /// 清空目标库的持久化表, 并同步清空内存目标库的对应集合
    pub fn clear(&self, destination: &mut ConfigDatabase) -> RepositoryResult<()> {
        let mut deleted = 0usize;

        if !self.platform_related_only {
            deleted += self.io.delete_all_schedule_entries()?;
            destination.schedule_entries.clear();
            deleted += self.io.delete_all_routing_specs()?;
            destination.routing_specs.clear();
            deleted += self.io.delete_all_data_sources()?;
            destination.data_sources.clear();
        }

        deleted += self.io.delete_all_network_lists()?;
        destination.network_lists.clear();
        deleted += self.io.delete_all_platforms()?;
        destination.platforms.clear();
        deleted += self.io.delete_all_platform_configs()?;
        destination.platform_configs.clear();
        deleted += self.io.delete_all_equipment_models()?;
        destination.equipment_models.clear();

        if !self.platform_related_only {
            self.io.clear_setup_tables()?;
            destination.engineering_units.clear();
            destination.unit_converters.clear();
            destination.equivalences.clear();
            destination.enums.clear();
            destination.presentation_groups.clear();
        }

        info!(
            "覆盖清库完成: 删除 {} 条记录 (平台相关子集={})",
            deleted, self.platform_related_only
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{EquipmentModel, PlatformConfig};
    use crate::domain::data_type::DataTypeKey;
    use crate::domain::enums::DbEnum;
    use crate::domain::platform::Platform;
    use crate::domain::routing::{DataSource, NetworkList, RoutingSpec};
    use crate::domain::schedule::{CompAppInfo, IntervalRecord, ScheduleEntry};
    use crate::domain::site::{Site, SiteName};
    use crate::domain::types::EntityId;
    use crate::domain::units::{EngineeringUnit, UnitConverter};
    use crate::repository::error::RepositoryError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct DeletionIo {
        deletes: RefCell<Vec<&'static str>>,
    }

    impl DeletionIo {
        fn mark(&self, what: &'static str) -> RepositoryResult<usize> {
            self.deletes.borrow_mut().push(what);
            Ok(1)
        }
    }

    impl DatabaseIo for DeletionIo {
        fn read_all(&self) -> RepositoryResult<ConfigDatabase> {
            Ok(ConfigDatabase::new())
        }
        fn write_site(&self, _: &Site) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_platform(&self, _: &Platform) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_platform_config(&self, _: &PlatformConfig) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_equipment_model(&self, _: &EquipmentModel) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_network_list(&self, _: &NetworkList) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_presentation_group(
            &self,
            _: &crate::domain::presentation::PresentationGroup,
        ) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_data_source(&self, _: &DataSource) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_routing_spec(&self, _: &RoutingSpec) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_loading_app(&self, _: &CompAppInfo) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_schedule_entry(&self, _: &ScheduleEntry) -> RepositoryResult<EntityId> {
            Err(RepositoryError::NotFound("桩".into()))
        }
        fn write_enum_list(&self, _: &[DbEnum]) -> RepositoryResult<()> {
            Ok(())
        }
        fn write_unit_set(
            &self,
            _: &[EngineeringUnit],
            _: &[UnitConverter],
        ) -> RepositoryResult<()> {
            Ok(())
        }
        fn write_equivalences(&self, _: &[Vec<DataTypeKey>]) -> RepositoryResult<()> {
            Ok(())
        }
        fn write_platform_index(&self, _: &[Platform]) -> RepositoryResult<()> {
            Ok(())
        }
        fn write_intervals(&self, _: &[IntervalRecord]) -> RepositoryResult<()> {
            Ok(())
        }
        fn delete_all_schedule_entries(&self) -> RepositoryResult<usize> {
            self.mark("schedule")
        }
        fn delete_all_routing_specs(&self) -> RepositoryResult<usize> {
            self.mark("routing")
        }
        fn delete_all_data_sources(&self) -> RepositoryResult<usize> {
            self.mark("datasource")
        }
        fn delete_all_network_lists(&self) -> RepositoryResult<usize> {
            self.mark("netlist")
        }
        fn delete_all_platforms(&self) -> RepositoryResult<usize> {
            self.mark("platform")
        }
        fn delete_all_platform_configs(&self) -> RepositoryResult<usize> {
            self.mark("config")
        }
        fn delete_all_equipment_models(&self) -> RepositoryResult<usize> {
            self.mark("model")
        }
        fn clear_setup_tables(&self) -> RepositoryResult<()> {
            self.deletes.borrow_mut().push("setup");
            Ok(())
        }
    }

    fn populated_db() -> ConfigDatabase {
        let mut db = ConfigDatabase::new();
        let mut site = Site::new();
        site.add_name(SiteName::new("local", "S1"));
        db.sites.push(site);
        db.loading_apps.push(CompAppInfo::named("compproc"));
        db.platforms.push(Platform::new());
        db.routing_specs.push(RoutingSpec::named("rs1"));
        db.engineering_units.push(EngineeringUnit::new("ft"));
        db
    }

    #[test]
    fn full_clear_deletes_children_before_parents() {
        let io = DeletionIo::default();
        let mut db = populated_db();
        OverwriteHandler::new(&io, false).clear(&mut db).unwrap();

        let deletes = io.deletes.borrow();
        let pos = |w: &str| deletes.iter().position(|d| *d == w).unwrap();
        assert!(pos("schedule") < pos("routing"));
        assert!(pos("routing") < pos("datasource"));
        assert!(pos("datasource") < pos("netlist"));
        assert!(pos("netlist") < pos("platform"));
        assert!(pos("platform") < pos("config"));
        assert!(pos("config") < pos("model"));
        assert!(deletes.contains(&"setup"));

        // 站点与进程定义永不删除
        assert_eq!(db.sites.len(), 1);
        assert_eq!(db.loading_apps.len(), 1);
        assert!(db.platforms.is_empty());
        assert!(db.engineering_units.is_empty());
    }

    #[test]
    fn platform_related_subset_spares_setup_and_routing() {
        let io = DeletionIo::default();
        let mut db = populated_db();
        OverwriteHandler::new(&io, true).clear(&mut db).unwrap();

        let deletes = io.deletes.borrow();
        assert!(!deletes.contains(&"schedule"));
        assert!(!deletes.contains(&"routing"));
        assert!(!deletes.contains(&"datasource"));
        assert!(!deletes.contains(&"setup"));
        assert!(deletes.contains(&"platform"));
        assert!(deletes.contains(&"config"));

        assert_eq!(db.routing_specs.len(), 1);
        assert_eq!(db.engineering_units.len(), 1);
        assert!(db.platforms.is_empty());
    }
}
