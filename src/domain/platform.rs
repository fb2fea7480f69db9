// ==========================================
// 环境监测配置管理系统 - 采集平台领域模型
// ==========================================
// 依据: Config_Interchange_Spec_v1.1.md - 2.2 Platform/TransportMedium
// 身份双键: (站点, 标识符) 与 (介质类型, 介质ID, 失效时间)
// 红线: 传输介质匹配优先于 (站点, 标识符) 匹配
// ==========================================

use crate::domain::config::{EquipmentModel, PlatformConfig};
use crate::domain::site::Site;
use crate::domain::types::{name_key, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// TransportMedium - 传输介质
// ==========================================
// 用途: 平台的通信通道身份 (如 GOES 卫星 ID + 信道)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMedium {
    pub medium_type: String,           // 介质类型 (goes/goes-self-timed/iridium ...)
    pub medium_id: String,             // 介质 ID (DCP 地址等)
    pub channel: Option<i32>,          // 信道号
    pub expiration: Option<DateTime<Utc>>, // 介质失效时间
    /// 嵌入式设备型号副本, 归一化后折叠到目标库规范实例
    pub equipment_model: Option<EquipmentModel>,
}

impl TransportMedium {
    pub fn new(medium_type: impl Into<String>, medium_id: impl Into<String>) -> Self {
        Self {
            medium_type: medium_type.into(),
            medium_id: medium_id.into(),
            channel: None,
            expiration: None,
            equipment_model: None,
        }
    }

    /// (类型, ID) 是否匹配; 类型大小写不敏感, ID 精确比较
    pub fn matches(&self, medium_type: &str, medium_id: &str) -> bool {
        name_key(&self.medium_type) == name_key(medium_type) && self.medium_id == medium_id
    }

    /// 卫星类介质（平台描述缺省时用其 ID 查 PDT）
    pub fn is_satellite(&self) -> bool {
        name_key(&self.medium_type).starts_with("goes")
    }
}

// ==========================================
// Platform - 数据采集平台
// ==========================================
// 生命周期: 解析时创建于暂存库 → 归一化阶段身份重指派 → 交写入器后不再变更
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Platform {
    pub id: Option<EntityId>,
    /// 所属站点（可空; 无站点的平台无法匹配, 合并时跳过）
    pub site: Option<Site>,
    /// 嵌入式配置副本（-C 软链接模式下仅保留名称引用）
    pub config: Option<PlatformConfig>,
    /// 软链接模式下的配置名称引用
    pub config_name: Option<String>,
    /// 标识符: 同一站点多平台的二级区分键
    pub designator: Option<String>,
    pub owner_agency: Option<String>,
    pub description: Option<String>,
    /// 失效时间; 非空表示历史版本
    pub expiration: Option<DateTime<Utc>>,
    pub transport_media: Vec<TransportMedium>,
}

impl Platform {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清除身份（装配阶段防止暂存 ID 渗入目标库）
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// 强制指派身份（替换既有平台时沿用其 ID, 保证下游外键仍可解析）
    pub fn force_set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    /// 标识符是否为空白
    pub fn designator_is_blank(&self) -> bool {
        self.designator
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true)
    }

    /// 生效配置名: 嵌入副本优先, 其次软链接名称
    pub fn effective_config_name(&self) -> Option<&str> {
        self.config
            .as_ref()
            .map(|c| c.name.as_str())
            .or(self.config_name.as_deref())
    }

    /// 显示身份（日志用）: 站点首选名-标识符 或介质 ID
    pub fn display_name(&self) -> String {
        if let Some(site) = &self.site {
            match &self.designator {
                Some(d) if !d.trim().is_empty() => {
                    format!("{}-{}", site.display_name(), d)
                }
                _ => site.display_name(),
            }
        } else if let Some(tm) = self.transport_media.first() {
            format!("{}:{}", tm.medium_type, tm.medium_id)
        } else {
            "<未知平台>".to_string()
        }
    }

    /// 平台在给定时刻是否有效: 无失效时间恒有效, 否则时刻不晚于失效时间
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        match self.expiration {
            None => true,
            Some(exp) => at <= exp,
        }
    }

    /// 内容相等性: 不含代理主键
    pub fn value_eq(&self, other: &Platform) -> bool {
        let site_eq = match (&self.site, &other.site) {
            (None, None) => true,
            (Some(a), Some(b)) => a.value_eq(b),
            _ => false,
        };
        let config_eq = match (&self.config, &other.config) {
            (None, None) => true,
            (Some(a), Some(b)) => a.value_eq(b),
            _ => false,
        };
        site_eq
            && config_eq
            && self.config_name == other.config_name
            && self.designator == other.designator
            && self.owner_agency == other.owner_agency
            && self.description == other.description
            && self.expiration == other.expiration
            && self.transport_media == other.transport_media
    }
}
