//! 日志初始化
//!
//! 基于tracing的日志框架。`RUST_LOG`环境变量优先，
//! 未设置时使用配置文件中的日志级别。

use crate::config::{LogLevel, LoggingConfig};
use tracing_subscriber::EnvFilter;

impl LogLevel {
    /// 转换为`EnvFilter`指令字符串
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 初始化日志系统
///
/// 重复调用是安全的：已经安装的全局订阅者会被保留。
/// 如果配置关闭了控制台输出，则不安装订阅者。
pub fn initialize_logging(config: &LoggingConfig) {
    if !config.log_to_console {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    tracing::info!(target: "snowfall", "Logging initialized at level {:?}", config.level);
}
