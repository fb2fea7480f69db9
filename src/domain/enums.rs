// ==========================================
// 环境监测配置管理系统 - 枚举领域模型
// ==========================================
// 身份键: 枚举名（大小写不敏感）
// 合并语义: 值就地替换, 覆盖模式下逐值 replace, 不删除既有值
// ==========================================

use crate::domain::types::{name_key, EntityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: String,
    pub description: Option<String>,
    pub exec_class: Option<String>,
    pub edit_class: Option<String>,
    pub sort_number: Option<i32>,
}

impl EnumValue {
    pub fn new(value: impl Into<String>, description: Option<String>) -> Self {
        Self {
            value: value.into(),
            description,
            exec_class: None,
            edit_class: None,
            sort_number: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbEnum {
    pub id: Option<EntityId>,
    pub name: String,
    pub default_value: Option<String>,
    /// 有序值集
    pub values: Vec<EnumValue>,
}

impl DbEnum {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn find_value(&self, value: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| name_key(&v.value) == name_key(value))
    }

    /// 替换或追加枚举值（值键大小写不敏感, 保持原顺序位置）
    pub fn replace_value(&mut self, ev: EnumValue) {
        if let Some(existing) = self
            .values
            .iter_mut()
            .find(|v| name_key(&v.value) == name_key(&ev.value))
        {
            *existing = ev;
        } else {
            self.values.push(ev);
        }
    }

    pub fn value_eq(&self, other: &DbEnum) -> bool {
        self.name == other.name
            && self.default_value == other.default_value
            && self.values == other.values
    }
}
