// ==========================================
// 环境监测配置管理系统 - 展示组领域模型
// ==========================================
// 身份键: 名称（大小写不敏感）
// 说明: inherits_from 为名称字符串, 装载后解析为父组引用;
//       Rust 侧以"已校验的父组名称"表达对象引用, 未解析保持 None
// ==========================================

use crate::domain::data_type::DataTypeKey;
use crate::domain::types::EntityId;
use serde::{Deserialize, Serialize};

/// 展示元素: 数据类型在输出中的呈现规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPresentation {
    pub data_type: DataTypeKey,
    pub units: Option<String>,
    pub max_decimals: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationGroup {
    pub id: Option<EntityId>,
    pub name: String,
    /// 继承来源（原始名称字符串, 来自交换文件）
    pub inherits_from: Option<String>,
    /// 解析后的父组名称; None 表示未解析或无父组
    pub parent: Option<String>,
    pub elements: Vec<DataPresentation>,
}

impl PresentationGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn value_eq(&self, other: &PresentationGroup) -> bool {
        self.name == other.name
            && self.inherits_from == other.inherits_from
            && self.elements == other.elements
    }
}
