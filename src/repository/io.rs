// ==========================================
// 环境监测配置管理系统 - 持久化边界
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 6. 持久化协作方
// 契约: 逐实体 write 返回目标库身份; 整集集合一次性写出;
//       引擎只依赖这些签名, 不依赖任何 SQL 方言
// ==========================================

use crate::domain::config::{EquipmentModel, PlatformConfig};
use crate::domain::data_type::DataTypeKey;
use crate::domain::database::ConfigDatabase;
use crate::domain::enums::DbEnum;
use crate::domain::platform::Platform;
use crate::domain::presentation::PresentationGroup;
use crate::domain::routing::{DataSource, NetworkList, RoutingSpec};
use crate::domain::schedule::{CompAppInfo, IntervalRecord, ScheduleEntry};
use crate::domain::site::Site;
use crate::domain::types::EntityId;
use crate::domain::units::{EngineeringUnit, UnitConverter};
use crate::repository::error::RepositoryResult;

pub trait DatabaseIo {
    /// 读入整个目标库对象图
    fn read_all(&self) -> RepositoryResult<ConfigDatabase>;

    // ===== 逐实体写入（按名称 upsert, 返回目标库身份）=====

    fn write_site(&self, site: &Site) -> RepositoryResult<EntityId>;
    fn write_platform(&self, platform: &Platform) -> RepositoryResult<EntityId>;
    fn write_platform_config(&self, config: &PlatformConfig) -> RepositoryResult<EntityId>;
    fn write_equipment_model(&self, model: &EquipmentModel) -> RepositoryResult<EntityId>;
    fn write_network_list(&self, list: &NetworkList) -> RepositoryResult<EntityId>;
    fn write_presentation_group(&self, group: &PresentationGroup) -> RepositoryResult<EntityId>;
    fn write_data_source(&self, source: &DataSource) -> RepositoryResult<EntityId>;
    fn write_routing_spec(&self, spec: &RoutingSpec) -> RepositoryResult<EntityId>;
    fn write_loading_app(&self, app: &CompAppInfo) -> RepositoryResult<EntityId>;
    fn write_schedule_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<EntityId>;

    // ===== 整集写出（出现即整体替换）=====

    fn write_enum_list(&self, enums: &[DbEnum]) -> RepositoryResult<()>;
    fn write_unit_set(
        &self,
        units: &[EngineeringUnit],
        converters: &[UnitConverter],
    ) -> RepositoryResult<()>;
    fn write_equivalences(&self, groups: &[Vec<DataTypeKey>]) -> RepositoryResult<()>;
    /// 平台索引: 平台集变动后重建的快速检索表
    fn write_platform_index(&self, platforms: &[Platform]) -> RepositoryResult<()>;
    fn write_intervals(&self, intervals: &[IntervalRecord]) -> RepositoryResult<()>;

    // ===== 覆盖模式删除（子表先于父表）=====

    fn delete_all_schedule_entries(&self) -> RepositoryResult<usize>;
    fn delete_all_routing_specs(&self) -> RepositoryResult<usize>;
    fn delete_all_data_sources(&self) -> RepositoryResult<usize>;
    fn delete_all_network_lists(&self) -> RepositoryResult<usize>;
    fn delete_all_platforms(&self) -> RepositoryResult<usize>;
    fn delete_all_platform_configs(&self) -> RepositoryResult<usize>;
    fn delete_all_equipment_models(&self) -> RepositoryResult<usize>;
    /// 清空单位/换算器/数据类型/枚举整集（不逐行删除）
    fn clear_setup_tables(&self) -> RepositoryResult<()>;
}
