// ==========================================
// 环境监测配置管理系统 - 运行配置层
// ==========================================
// 职责: 一次导入运行的全部可配置项, 以显式上下文值传递
// 红线: 不设全局可变状态; 选项冲突在任何 I/O 之前拒绝
// ==========================================

use crate::domain::types::ElementKind;
use crate::importer::error::{ImportError, ImportResult};
use std::path::PathBuf;

/// 一次导入运行的完整配置
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// 只分类不写入（-v）
    pub validate_only: bool,
    /// 冲突时保留目标库对象（-o）
    pub keep_old: bool,
    /// 新站点 usgs 名称的缺省机构代码（-A）
    pub default_agency: Option<String>,
    /// 新平台的缺省属主机构（-O）
    pub default_owner: Option<String>,
    /// 空白标识符的缺省值（-G）
    pub new_designator: Option<String>,
    /// 目标库位置（-E）
    pub db_location: String,
    /// PDT 文件路径, 用于平台描述补全（-t）
    pub pdt_file: Option<PathBuf>,
    /// 配置软链接模式: 忽略交换文件内嵌配置, 按名称链接既有配置（-C）
    pub link_configs: bool,
    /// 覆盖模式: 导入前清空目标库（-W）
    pub overwrite: bool,
    /// 跳过覆盖确认提示（-y）
    pub assume_yes: bool,
    /// 接受历史平台版本（-H）
    pub allow_historical: bool,
    /// 仅接受平台相关元素（-p）
    pub platform_related_only: bool,
    /// 输入交换文件（≥1）
    pub files: Vec<PathBuf>,
}

impl ImportOptions {
    /// 选项组合校验, 在任何 I/O 之前调用
    pub fn validate(&self) -> ImportResult<()> {
        if self.overwrite && self.validate_only {
            return Err(ImportError::ConflictingOptions(
                "覆盖模式与校验模式不能同时启用".to_string(),
            ));
        }
        if self.overwrite && self.keep_old {
            return Err(ImportError::ConflictingOptions(
                "覆盖模式与保留旧值模式不能同时启用".to_string(),
            ));
        }
        if self.files.is_empty() {
            return Err(ImportError::ConflictingOptions(
                "至少需要一个输入文件".to_string(),
            ));
        }
        Ok(())
    }

    /// 元素过滤谓词: -p 模式下仅接受平台相关元素
    pub fn element_filter(&self) -> Box<dyn Fn(ElementKind) -> bool> {
        if self.platform_related_only {
            Box::new(|kind: ElementKind| kind.is_platform_related())
        } else {
            Box::new(|_| true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ImportOptions {
        ImportOptions {
            files: vec![PathBuf::from("a.xml")],
            ..Default::default()
        }
    }

    #[test]
    fn overwrite_conflicts_rejected() {
        let mut opts = base();
        opts.overwrite = true;
        opts.validate_only = true;
        assert!(opts.validate().is_err());

        let mut opts = base();
        opts.overwrite = true;
        opts.keep_old = true;
        assert!(opts.validate().is_err());

        let mut opts = base();
        opts.overwrite = true;
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn filter_follows_platform_related_mode() {
        let mut opts = base();
        opts.platform_related_only = true;
        let filter = opts.element_filter();
        assert!(filter(ElementKind::Platform));
        assert!(!filter(ElementKind::RoutingSpec));

        opts.platform_related_only = false;
        let filter = opts.element_filter();
        assert!(filter(ElementKind::RoutingSpec));
    }
}
