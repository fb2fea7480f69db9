// ==========================================
// 环境监测配置管理系统 - 进程/调度领域模型
// ==========================================
// 合并语义: 按存在性合并（pass-through, 不做内容比较）
// ==========================================

use crate::domain::types::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 计算进程定义（loading app）
///
/// 红线: 覆盖模式下永不删除 —— 外部子系统持有对进程记录的外键
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompAppInfo {
    pub id: Option<EntityId>,
    pub app_name: String,
    pub comment: Option<String>,
    pub properties: BTreeMap<String, String>,
}

impl CompAppInfo {
    pub fn named(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Default::default()
        }
    }
}

/// 调度条目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: Option<EntityId>,
    pub name: String,
    pub loading_app_name: Option<String>,
    pub routing_spec_name: Option<String>,
    pub enabled: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub run_interval: Option<String>,
}

impl ScheduleEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// 时间间隔记录（随交换文件一并摄入, 批次末尾写出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub name: String,
    pub cal_constant: String, // 日历单位 (minute/hour/day ...)
    pub cal_multiplier: i32,
}
