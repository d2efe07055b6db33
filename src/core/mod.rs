//! 核心模块
//!
//! 包含模拟核心的公共基础设施：
//! - `error` - 错误类型定义
//! - `macros` - 样板代码宏
//! - `logging` - tracing日志初始化

pub mod error;
pub mod logging;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{SnowfallError, SnowfallResult};
pub use logging::initialize_logging;
