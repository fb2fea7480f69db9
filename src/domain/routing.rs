// ==========================================
// 环境监测配置管理系统 - 路由领域模型
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 2.5 DataSource/RoutingSpec/NetworkList
// 身份键: 名称（大小写不敏感）
// ==========================================

use crate::domain::types::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// DataSource - 数据源
// ==========================================
// 说明: is_group 影响写入顺序（组数据源引用简单数据源, 必须后写）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSource {
    pub id: Option<EntityId>,
    pub name: String,
    pub source_type: String, // lrgs/file/hostlist/roundrobin ...
    pub args: Option<String>,
    /// 组类型成员（按名称引用其他数据源）
    pub members: Vec<String>,
}

impl DataSource {
    pub fn named(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: source_type.into(),
            ..Default::default()
        }
    }

    /// 组类型数据源: 含成员, 或类型本身即组语义
    pub fn is_group(&self) -> bool {
        !self.members.is_empty()
            || matches!(
                self.source_type.to_ascii_lowercase().as_str(),
                "hostlist" | "roundrobin"
            )
    }

    pub fn value_eq(&self, other: &DataSource) -> bool {
        self.name == other.name
            && self.source_type == other.source_type
            && self.args == other.args
            && self.members == other.members
    }
}

// ==========================================
// RoutingSpec - 路由规范
// ==========================================
// 说明: 按名称引用数据源与网络列表, 写入时要求数据源已有身份
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingSpec {
    pub id: Option<EntityId>,
    pub name: String,
    pub data_source_name: Option<String>,
    pub network_lists: Vec<String>,
    pub consumer_type: Option<String>,
    pub consumer_arg: Option<String>,
    pub since_time: Option<String>,
    pub until_time: Option<String>,
    pub enable_equations: bool,
    /// 自由属性袋（JSON 持久化）
    pub properties: BTreeMap<String, String>,
}

impl RoutingSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn value_eq(&self, other: &RoutingSpec) -> bool {
        self.name == other.name
            && self.data_source_name == other.data_source_name
            && self.network_lists == other.network_lists
            && self.consumer_type == other.consumer_type
            && self.consumer_arg == other.consumer_arg
            && self.since_time == other.since_time
            && self.until_time == other.until_time
            && self.enable_equations == other.enable_equations
            && self.properties == other.properties
    }
}

// ==========================================
// NetworkList - 网络列表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkListEntry {
    pub transport_id: String, // 传输介质 ID
    pub platform_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkList {
    pub id: Option<EntityId>,
    pub name: String,
    pub transport_medium_type: Option<String>,
    pub site_name_type_preference: Option<String>,
    pub entries: Vec<NetworkListEntry>,
}

impl NetworkList {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn value_eq(&self, other: &NetworkList) -> bool {
        self.name == other.name
            && self.transport_medium_type == other.transport_medium_type
            && self.site_name_type_preference == other.site_name_type_preference
            && self.entries == other.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_detection_by_members_or_type() {
        let mut ds = DataSource::named("ds1", "lrgs");
        assert!(!ds.is_group());
        ds.members.push("ds2".into());
        assert!(ds.is_group());
        let ds2 = DataSource::named("ds3", "hostlist");
        assert!(ds2.is_group());
    }

    #[test]
    fn routing_spec_value_eq_covers_references() {
        let mut a = RoutingSpec::named("rs1");
        let mut b = RoutingSpec::named("rs1");
        assert!(a.value_eq(&b));
        a.network_lists.push("nl1".into());
        assert!(!a.value_eq(&b));
        b.network_lists.push("nl1".into());
        b.id = Some(9);
        assert!(a.value_eq(&b));
    }
}
