// ==========================================
// 环境监测配置管理系统 - PDT 描述补全
// ==========================================
// 用途: 平台描述缺省时从平台描述表 (PDT) 按卫星介质 ID 补全;
//       仅在显式给出 PDT 文件路径时启用
// 格式: 文本行, 冒号分隔; 首字段为 DCP 地址, 末字段为站点描述,
//       # 起头的行为注释
// ==========================================

use crate::domain::database::ConfigDatabase;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// DCP 地址 → 描述
#[derive(Debug, Default)]
pub struct PdtIndex {
    descriptions: HashMap<String, String>,
}

impl PdtIndex {
    pub fn load(path: &Path) -> ImportResult<PdtIndex> {
        let content = fs::read_to_string(path).map_err(|e| ImportError::PdtLoadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut descriptions = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split(':');
            let addr = match parts.next() {
                Some(a) if !a.trim().is_empty() => a.trim().to_ascii_uppercase(),
                _ => continue,
            };
            let desc = parts.last().map(str::trim).unwrap_or("");
            if !desc.is_empty() {
                descriptions.insert(addr, desc.to_string());
            }
        }
        info!("PDT 加载完成: {} 条描述 ({})", descriptions.len(), path.display());
        Ok(PdtIndex { descriptions })
    }

    pub fn description_for(&self, dcp_address: &str) -> Option<&str> {
        self.descriptions
            .get(&dcp_address.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// 补全暂存库平台的空描述: 先取站点描述, 其次按卫星介质 ID 查 PDT
    pub fn fill_platform_descriptions(&self, staging: &mut ConfigDatabase) {
        for platform in staging.platforms.iter_mut() {
            if platform.description.as_deref().map(str::trim).is_some_and(|d| !d.is_empty()) {
                continue;
            }
            if let Some(desc) = platform
                .site
                .as_ref()
                .and_then(|s| s.description.clone())
                .filter(|d| !d.trim().is_empty())
            {
                platform.description = Some(desc);
                continue;
            }
            let from_pdt = platform
                .transport_media
                .iter()
                .filter(|tm| tm.is_satellite())
                .find_map(|tm| self.description_for(&tm.medium_id));
            if let Some(desc) = from_pdt {
                debug!("平台 {} 描述取自 PDT", platform.display_name());
                platform.description = Some(desc.to_string());
            }
        }
    }
}
