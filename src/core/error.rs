//! 统一错误处理模块
//!
//! 提供模拟核心范围内的错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析和验证失败
//! - **模拟错误** (`core::error::SnowfallError`): 初始化阶段的失败（生成粒子、创建线程池）
//!
//! 每帧更新本身不会失败，因此这里没有运行时错误。

use crate::config::ConfigError;
use thiserror::Error;

/// 模拟核心错误类型
#[derive(Error, Debug)]
pub enum SnowfallError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn snowflakes: {0}")]
    Spawn(String),

    #[error("Failed to create worker pool: {0}")]
    ThreadPool(String),
}

/// 模拟结果类型别名
pub type SnowfallResult<T> = Result<T, SnowfallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::ValidationError("cloud_radius must be >= 0".to_string());
        let err: SnowfallError = config_err.into();
        assert!(matches!(err, SnowfallError::Config(_)));
    }

    #[test]
    fn test_error_display() {
        let err = SnowfallError::Spawn("out of memory".to_string());
        assert_eq!(err.to_string(), "Failed to spawn snowflakes: out of memory");

        let err: SnowfallError =
            ConfigError::ValidationError("chunk_size must be > 0".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Config validation error: chunk_size must be > 0"
        );
    }
}
