// ==========================================
// 环境监测配置管理系统 - 仓储层错误类型
// ==========================================
// 分级: 连接/锁错误为 I/O 级（终止整批写入）;
//       其余为对象级（记日志后继续本批其余对象）
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== I/O 级错误（终止整批）=====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    // ===== 对象级错误（记日志后继续）=====
    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("记录不存在: {0}")]
    NotFound(String),

    /// 依赖对象尚未获得目标库身份; 可恢复的校验错误, 不是运行时缺陷
    #[error("依赖对象缺少目标库身份: {0}")]
    MissingIdentity(String),

    #[error("序列化失败: {0}")]
    SerializationError(String),
}

impl RepositoryError {
    /// I/O 级错误终止整批写入, 对象级错误仅跳过当前对象
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatabaseConnectionError(_) | RepositoryError::LockError(_)
        )
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(e: rusqlite::Error) -> Self {
        RepositoryError::DatabaseQueryError(e.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::SerializationError(e.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
