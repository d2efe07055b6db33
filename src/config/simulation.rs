use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 批量更新的默认分块大小（每块粒子数）
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// 模拟调度配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 每个并行任务处理的粒子数
    pub chunk_size: usize,

    /// 是否启用多线程更新
    pub parallel: bool,

    /// 专用工作线程数（0表示使用全局线程池）
    pub worker_threads: usize,
}

impl_default!(SimulationConfig {
    chunk_size: DEFAULT_CHUNK_SIZE,
    parallel: true,
    worker_threads: 0,
});

impl SimulationConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunk_size must be > 0".to_string(),
            ));
        }
        let cores = num_cpus::get();
        if self.worker_threads > cores * 4 {
            tracing::warn!(
                target: "snowfall",
                "worker_threads {} exceeds 4x the {} available cores",
                self.worker_threads,
                cores
            );
        }
        Ok(())
    }

    /// 获取实际使用的线程数
    pub fn resolved_worker_threads(&self) -> usize {
        if !self.parallel {
            1
        } else if self.worker_threads == 0 {
            num_cpus::get()
        } else {
            self.worker_threads
        }
    }
}

/// 演示程序的运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 模拟帧数
    pub ticks: u32,

    /// 固定帧时长（秒）
    pub delta_time: f32,
}

impl_default!(RunConfig {
    ticks: 600,
    delta_time: 1.0 / 60.0,
});

impl RunConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.delta_time.is_finite() || self.delta_time <= 0.0 {
            return Err(ConfigError::ValidationError(
                "run.delta_time must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_simulation_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.chunk_size, 64);
        assert!(config.validate().is_ok());
        assert!(config.resolved_worker_threads() > 0);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = SimulationConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_large_worker_count_is_portable() {
        let config = SimulationConfig {
            worker_threads: num_cpus::get() * 4 + 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sequential_uses_one_thread() {
        let config = SimulationConfig {
            parallel: false,
            worker_threads: 8,
            ..Default::default()
        };
        assert_eq!(config.resolved_worker_threads(), 1);
    }

    #[test]
    fn test_run_config_rejects_bad_delta() {
        let config = RunConfig {
            delta_time: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(RunConfig::default().validate().is_ok());
    }
}
