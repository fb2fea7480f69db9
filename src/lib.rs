// ==========================================
// 环境监测配置管理系统 - 核心库
// ==========================================
// 系统定位: 关系型配置库的批量合并/导入引擎
// 控制流: 暂存装配 → 合并 → 引用归一化 → 依序写入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 合并/归一化/写入
pub mod engine;

// 导入层 - 交换文件读取与暂存装配
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::ImportOptions;
pub use domain::{ConfigDatabase, ElementKind, EntityId};
pub use engine::{
    DependencyOrderedWriter, EntityRef, MergeEngine, MergeOptions, MergeOutcome,
    OverwriteHandler, ReferenceNormalizer, WriteSummary,
};
pub use importer::{
    AssembleOutcome, ImportError, ImportResult, ParseSignals, ParsedElement, PdtIndex,
    StagingAssembler,
};
pub use repository::{DatabaseIo, RepositoryError, RepositoryResult, SqliteDatabaseIo};
