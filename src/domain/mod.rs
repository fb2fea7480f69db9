// ==========================================
// 环境监测配置管理系统 - 领域模型层
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 2. 实体定义
// ==========================================
// 职责: 定义配置实体、身份键规则与内存对象图
// 红线: 不含数据访问逻辑, 不含合并决策逻辑
// ==========================================

pub mod config;
pub mod data_type;
pub mod database;
pub mod enums;
pub mod platform;
pub mod presentation;
pub mod routing;
pub mod schedule;
pub mod site;
pub mod types;
pub mod units;

// 重导出核心类型
pub use config::{ConfigSensor, EquipmentModel, PlatformConfig};
pub use data_type::{DataTypeKey, EquivalenceSet};
pub use database::ConfigDatabase;
pub use enums::{DbEnum, EnumValue};
pub use platform::{Platform, TransportMedium};
pub use presentation::{DataPresentation, PresentationGroup};
pub use routing::{DataSource, NetworkList, NetworkListEntry, RoutingSpec};
pub use schedule::{CompAppInfo, IntervalRecord, ScheduleEntry};
pub use site::{Site, SiteName};
pub use types::{ElementKind, EntityId};
pub use units::{EngineeringUnit, UnitConverter};
