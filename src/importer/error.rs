// ==========================================
// 环境监测配置管理系统 - 导入模块错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
///
/// 分级: 解析错误与领域错误为致命（终止本次运行）;
/// 数据质量问题不走错误通道, 由装配器降级处理并记日志
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（致命）=====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {path}: {message}")]
    FileReadError { path: String, message: String },

    #[error("XML 解析失败: {path}: {message}")]
    XmlParseError { path: String, message: String },

    #[error("无法识别的顶层元素: {path}: <{tag}>")]
    UnknownTopElement { path: String, tag: String },

    // ===== 领域错误（致命, 写入前终止）=====
    #[error("平台清单文件不允许作为单文件导入: {0}")]
    PlatformListNotImportable(String),

    #[error("选项组合不一致: {0}")]
    ConflictingOptions(String),

    // ===== 元素体内容错误（致命）=====
    #[error("元素缺少必需属性: <{element}> 缺少 {attribute}")]
    MissingAttribute {
        element: String,
        attribute: String,
    },

    #[error("字段值无法解析 (元素 <{element}>, 字段 {field}): {value}")]
    InvalidFieldValue {
        element: String,
        field: String,
        value: String,
    },

    // ===== PDT 文件错误（致命, 仅当显式给出 -t）=====
    #[error("PDT 文件加载失败: {path}: {message}")]
    PdtLoadError { path: String, message: String },
}

pub type ImportResult<T> = Result<T, ImportError>;
