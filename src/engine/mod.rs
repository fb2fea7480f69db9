// ==========================================
// 环境监测配置管理系统 - 合并/写入引擎层
// ==========================================
// 控制流: 暂存装配 → 合并 → 引用归一化 → 依序写入,
//         覆盖清库可选地在装配前执行
// ==========================================

pub mod merge;
pub mod normalize;
pub mod overwrite;
pub mod writer;

pub use merge::{EntityRef, MergeEngine, MergeOptions, MergeOutcome};
pub use normalize::ReferenceNormalizer;
pub use overwrite::OverwriteHandler;
pub use writer::{DependencyOrderedWriter, WriteSummary};
