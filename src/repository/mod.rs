// ==========================================
// 环境监测配置管理系统 - 仓储层
// ==========================================
// 红线: Repository 不含合并/分类逻辑
// ==========================================

pub mod error;
pub mod io;
pub mod sqlite_io;

pub use error::{RepositoryError, RepositoryResult};
pub use io::DatabaseIo;
pub use sqlite_io::SqliteDatabaseIo;
