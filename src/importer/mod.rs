// ==========================================
// 环境监测配置管理系统 - 导入层
// ==========================================
// 职责: 交换文件读取、暂存库装配、PDT 描述补全
// 红线: 不触碰目标库, 不做合并决策
// ==========================================

pub mod assembler;
pub mod error;
pub mod pdt;
pub mod xml;

pub use assembler::{AssembleOutcome, ParseSignals, StagingAssembler};
pub use error::{ImportError, ImportResult};
pub use pdt::PdtIndex;
pub use xml::{read_element_file, ParsedElement};
