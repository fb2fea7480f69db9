// ==========================================
// 环境监测配置管理系统 - 站点领域模型
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 2.1 Site/SiteName
// 身份键: 首选名称值（大小写不敏感）, 任一别名亦可参与匹配
// ==========================================

use crate::domain::types::{name_key, EntityId};
use serde::{Deserialize, Serialize};

// ==========================================
// SiteName - 站点名称
// ==========================================
// 约束: 同一站点内 name_type 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteName {
    pub name_type: String,           // 名称类型 (usgs/local/nwshb5 ...)
    pub value: String,               // 名称值
    pub agency_code: Option<String>, // 机构代码
}

impl SiteName {
    pub fn new(name_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name_type: name_type.into(),
            value: value.into(),
            agency_code: None,
        }
    }

    /// 名称值是否与给定值匹配（大小写不敏感）
    pub fn matches_value(&self, value: &str) -> bool {
        name_key(&self.value) == name_key(value)
    }
}

// ==========================================
// Site - 监测站点
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Site {
    pub id: Option<EntityId>,
    /// 有序名称集, 首个元素为首选名称
    pub names: Vec<SiteName>,
    pub description: Option<String>,
    pub elevation: Option<f64>,
    pub timezone: Option<String>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    /// 首选名称（有序集的第一个）
    pub fn preferred_name(&self) -> Option<&SiteName> {
        self.names.first()
    }

    /// 按类型取名称
    pub fn name_of_type(&self, name_type: &str) -> Option<&SiteName> {
        self.names
            .iter()
            .find(|n| name_key(&n.name_type) == name_key(name_type))
    }

    pub fn name_of_type_mut(&mut self, name_type: &str) -> Option<&mut SiteName> {
        self.names
            .iter_mut()
            .find(|n| name_key(&n.name_type) == name_key(name_type))
    }

    /// 增加名称; 同类型名称被替换（类型唯一约束）
    pub fn add_name(&mut self, name: SiteName) {
        if let Some(existing) = self.name_of_type_mut(&name.name_type) {
            *existing = name;
        } else {
            self.names.push(name);
        }
    }

    /// 任一名称值与给定值匹配（身份匹配入口）
    pub fn has_name_value(&self, value: &str) -> bool {
        self.names.iter().any(|n| n.matches_value(value))
    }

    /// 显示身份（日志用）
    pub fn display_name(&self) -> String {
        self.preferred_name()
            .map(|n| n.value.clone())
            .unwrap_or_else(|| "<未命名站点>".to_string())
    }

    /// 内容相等性: 不含代理主键, 合并分类据此比较
    pub fn value_eq(&self, other: &Site) -> bool {
        self.names == other.names
            && self.description == other.description
            && self.elevation == other.elevation
            && self.timezone == other.timezone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_with_names(values: &[(&str, &str)]) -> Site {
        let mut s = Site::new();
        for (t, v) in values {
            s.add_name(SiteName::new(*t, *v));
        }
        s
    }

    #[test]
    fn add_name_replaces_same_type() {
        let mut s = site_with_names(&[("usgs", "12345678")]);
        s.add_name(SiteName::new("USGS", "87654321"));
        assert_eq!(s.names.len(), 1);
        assert_eq!(s.names[0].value, "87654321");
    }

    #[test]
    fn any_alias_participates_in_identity() {
        let s = site_with_names(&[("usgs", "12345678"), ("local", "RIVERTON")]);
        assert!(s.has_name_value("riverton"));
        assert!(s.has_name_value("12345678"));
        assert!(!s.has_name_value("elsewhere"));
    }

    #[test]
    fn value_eq_ignores_id() {
        let mut a = site_with_names(&[("local", "A")]);
        let mut b = site_with_names(&[("local", "A")]);
        a.id = Some(5);
        b.id = None;
        assert!(a.value_eq(&b));
        b.description = Some("x".into());
        assert!(!a.value_eq(&b));
    }
}
