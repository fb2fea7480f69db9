// ==========================================
// 环境监测配置管理系统 - 工程单位领域模型
// ==========================================
// 合并语义: 单位与换算器按整集处理, 暂存集并入目标集;
// 覆盖模式下整集清空由后续导入完整替换, 不逐行删除
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeringUnit {
    pub abbr: String, // 缩写即身份键（大小写不敏感）
    pub name: Option<String>,
    pub family: Option<String>,   // english/metric/univ
    pub measures: Option<String>, // length/volume/flow ...
}

impl EngineeringUnit {
    pub fn new(abbr: impl Into<String>) -> Self {
        Self {
            abbr: abbr.into(),
            name: None,
            family: None,
            measures: None,
        }
    }
}

/// 单位换算器: (from, to) 为身份键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConverter {
    pub from_abbr: String,
    pub to_abbr: String,
    pub algorithm: String, // none/linear/usgs-standard/poly-5
    /// 算法系数 a..f
    pub coefficients: [f64; 6],
}

impl UnitConverter {
    pub fn new(from_abbr: impl Into<String>, to_abbr: impl Into<String>) -> Self {
        Self {
            from_abbr: from_abbr.into(),
            to_abbr: to_abbr.into(),
            algorithm: "none".to_string(),
            coefficients: [0.0; 6],
        }
    }
}
