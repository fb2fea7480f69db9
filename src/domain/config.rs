// ==========================================
// 环境监测配置管理系统 - 平台配置/设备型号领域模型
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 2.3 PlatformConfig / 2.4 EquipmentModel
// 身份键: 名称（大小写不敏感）
// ==========================================

use crate::domain::data_type::DataTypeKey;
use crate::domain::types::EntityId;
use serde::{Deserialize, Serialize};

// ==========================================
// EquipmentModel - 设备型号
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentModel {
    pub id: Option<EntityId>,
    pub name: String,
    pub company: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub equipment_type: Option<String>,
}

impl EquipmentModel {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn value_eq(&self, other: &EquipmentModel) -> bool {
        self.name == other.name
            && self.company == other.company
            && self.model == other.model
            && self.description == other.description
            && self.equipment_type == other.equipment_type
    }
}

// ==========================================
// ConfigSensor - 配置传感器
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSensor {
    pub sensor_number: i32,
    pub sensor_name: String,
    /// 传感器量纲（可多个数据类型标准）
    pub data_types: Vec<DataTypeKey>,
    /// 嵌入式设备型号副本; 归一化后指向目标库规范实例的内容
    pub equipment_model: Option<EquipmentModel>,
    pub recording_interval: Option<i32>, // 记录间隔(秒)
}

// ConfigSensor 的内容相等性直接用 PartialEq:
// EquipmentModel 副本不携带 id 时 derive 比较即为内容比较,
// 归一化前的比较一律先剥离 id（见 value_eq）
impl PartialEq for EquipmentModel {
    fn eq(&self, other: &Self) -> bool {
        self.value_eq(other)
    }
}

impl ConfigSensor {
    pub fn new(sensor_number: i32, sensor_name: impl Into<String>) -> Self {
        Self {
            sensor_number,
            sensor_name: sensor_name.into(),
            data_types: Vec::new(),
            equipment_model: None,
            recording_interval: None,
        }
    }
}

// ==========================================
// PlatformConfig - 平台配置
// ==========================================
// 说明: 配置可被多个平台共享, 合并后所有引用折叠到目标库规范实例
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub id: Option<EntityId>,
    pub name: String,
    pub description: Option<String>,
    pub equipment_model: Option<EquipmentModel>,
    pub sensors: Vec<ConfigSensor>,
}

impl PlatformConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn value_eq(&self, other: &PlatformConfig) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.equipment_model == other.equipment_model
            && self.sensors == other.sensors
    }
}
