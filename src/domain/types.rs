// ==========================================
// 环境监测配置管理系统 - 领域类型定义
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 0.2 实体与标识体系
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 目标库代理主键（由仓储层在写入时分配）
///
/// 不变式: 实体写入前必须已获得目标库身份;
/// 暂存库实体在装配阶段一律清除身份, 防止误用为目标库 ID
pub type EntityId = i64;

// ==========================================
// ElementKind - 交换文件顶层元素类型
// ==========================================
// 红线: 路由分发必须是对该枚举的穷尽 match, 不做动态类型判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Platform,
    Site,
    RoutingSpec,
    NetworkList,
    PresentationGroup,
    ScheduleEntry,
    CompAppInfo,
    PlatformConfig,
    EquipmentModel,
    EnumList,
    EngineeringUnitList,
    DataTypeEquivalenceList,
    IntervalList,
    /// 平台清单文件: 不允许作为单文件导入
    PlatformList,
}

impl ElementKind {
    /// 根据 XML 根元素标签识别元素类型（大小写不敏感）
    pub fn from_tag(tag: &str) -> Option<ElementKind> {
        let t = tag.to_ascii_lowercase();
        match t.as_str() {
            "platform" => Some(ElementKind::Platform),
            "site" => Some(ElementKind::Site),
            "routingspec" => Some(ElementKind::RoutingSpec),
            "networklist" => Some(ElementKind::NetworkList),
            "presentationgroup" => Some(ElementKind::PresentationGroup),
            "scheduleentry" => Some(ElementKind::ScheduleEntry),
            "compappinfo" => Some(ElementKind::CompAppInfo),
            "platformconfig" => Some(ElementKind::PlatformConfig),
            "equipmentmodel" => Some(ElementKind::EquipmentModel),
            "enumlist" => Some(ElementKind::EnumList),
            "engineeringunitlist" => Some(ElementKind::EngineeringUnitList),
            "datatypeequivalencelist" => Some(ElementKind::DataTypeEquivalenceList),
            "intervallist" => Some(ElementKind::IntervalList),
            "platformlist" => Some(ElementKind::PlatformList),
            _ => None,
        }
    }

    /// 平台相关元素（-p 模式下仅接受这些类型）
    pub fn is_platform_related(&self) -> bool {
        matches!(
            self,
            ElementKind::Platform
                | ElementKind::NetworkList
                | ElementKind::PlatformConfig
                | ElementKind::EquipmentModel
                | ElementKind::Site
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Platform => "Platform",
            ElementKind::Site => "Site",
            ElementKind::RoutingSpec => "RoutingSpec",
            ElementKind::NetworkList => "NetworkList",
            ElementKind::PresentationGroup => "PresentationGroup",
            ElementKind::ScheduleEntry => "ScheduleEntry",
            ElementKind::CompAppInfo => "CompAppInfo",
            ElementKind::PlatformConfig => "PlatformConfig",
            ElementKind::EquipmentModel => "EquipmentModel",
            ElementKind::EnumList => "EnumList",
            ElementKind::EngineeringUnitList => "EngineeringUnitList",
            ElementKind::DataTypeEquivalenceList => "DataTypeEquivalenceList",
            ElementKind::IntervalList => "IntervalList",
            ElementKind::PlatformList => "PlatformList",
        };
        write!(f, "{}", s)
    }
}

/// 元素过滤谓词: 在解析元素体之前决定是否接受该顶层元素
pub type ElementFilter = dyn Fn(ElementKind) -> bool;

/// 站点名称类型枚举的固定枚举名（写入平台前自动登记新出现的名称类型）
pub const ENUM_SITE_NAME_TYPE: &str = "SiteNameType";

/// usgs 类型站点名称（新站点缺省机构代码落在该名称上）
pub const SITE_NAME_TYPE_USGS: &str = "usgs";

/// 名称键统一小写, 所有按名称的身份匹配都大小写不敏感
pub fn name_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_kind_from_tag_is_case_insensitive() {
        assert_eq!(ElementKind::from_tag("PLATFORM"), Some(ElementKind::Platform));
        assert_eq!(ElementKind::from_tag("NetworkList"), Some(ElementKind::NetworkList));
        assert_eq!(ElementKind::from_tag("unknown"), None);
    }

    #[test]
    fn platform_related_kinds() {
        assert!(ElementKind::Platform.is_platform_related());
        assert!(ElementKind::Site.is_platform_related());
        assert!(!ElementKind::RoutingSpec.is_platform_related());
        assert!(!ElementKind::ScheduleEntry.is_platform_related());
    }
}
