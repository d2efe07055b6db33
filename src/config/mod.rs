//! 统一配置系统
//!
//! 提供TOML/JSON配置文件、环境变量覆盖和加载时验证
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::impl_default;

pub mod simulation;

pub use simulation::{RunConfig, SimulationConfig, DEFAULT_CHUNK_SIZE};

/// 单个模拟允许的最大粒子数
pub const MAX_PARTICLES: usize = 1 << 24;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 降雪主配置
///
/// 顶层字段描述云层与雪花的生成参数，子表描述调度、日志和演示运行。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowfallConfig {
    /// 云层半径，雪花的水平起点在此圆盘内均匀分布
    pub cloud_radius: f32,

    /// 云层移动速度（单位/秒，乘以输入轴）
    pub cloud_speed: f32,

    /// 云层初始高度，同时也是初始生成的最大高度
    pub cloud_height: f32,

    /// 基础下落速度
    pub fall_speed: f32,

    /// 下落速度的随机抖动幅度
    pub fall_speed_random: f32,

    /// 自旋角速度（度/秒）
    pub fall_angular_speed: f32,

    /// 雪花数量
    pub particle_count: usize,

    /// 随机种子（None时使用系统熵）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// 调度配置
    pub simulation: SimulationConfig,

    /// 日志配置
    pub logging: LoggingConfig,

    /// 演示运行配置
    pub run: RunConfig,
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            cloud_radius: 100.0,
            cloud_speed: 100.0,
            cloud_height: 50.0,
            fall_speed: 50.0,
            fall_speed_random: 2.0,
            fall_angular_speed: 2.0,
            particle_count: 10_000,
            seed: None,
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl SnowfallConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置雪花数量
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// 设置随机种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 设置云层半径
    pub fn with_cloud_radius(mut self, radius: f32) -> Self {
        self.cloud_radius = radius;
        self
    }

    /// 设置下落速度及抖动
    pub fn with_fall_speed(mut self, speed: f32, random: f32) -> Self {
        self.fall_speed = speed;
        self.fall_speed_random = random;
        self
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 使用给定的查找函数覆盖配置
    ///
    /// 无法解析的值会被忽略并记录警告。
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse_into<T: std::str::FromStr>(key: &str, raw: Option<String>, slot: &mut T) {
            if let Some(raw) = raw {
                match raw.trim().parse() {
                    Ok(value) => *slot = value,
                    Err(_) => {
                        tracing::warn!(target: "snowfall", "Ignoring unparsable {}={:?}", key, raw)
                    }
                }
            }
        }

        parse_into("SNOWFALL_CLOUD_RADIUS", lookup("SNOWFALL_CLOUD_RADIUS"), &mut self.cloud_radius);
        parse_into("SNOWFALL_CLOUD_SPEED", lookup("SNOWFALL_CLOUD_SPEED"), &mut self.cloud_speed);
        parse_into("SNOWFALL_CLOUD_HEIGHT", lookup("SNOWFALL_CLOUD_HEIGHT"), &mut self.cloud_height);
        parse_into("SNOWFALL_FALL_SPEED", lookup("SNOWFALL_FALL_SPEED"), &mut self.fall_speed);
        parse_into(
            "SNOWFALL_FALL_SPEED_RANDOM",
            lookup("SNOWFALL_FALL_SPEED_RANDOM"),
            &mut self.fall_speed_random,
        );
        parse_into(
            "SNOWFALL_FALL_ANGULAR_SPEED",
            lookup("SNOWFALL_FALL_ANGULAR_SPEED"),
            &mut self.fall_angular_speed,
        );
        parse_into(
            "SNOWFALL_PARTICLE_COUNT",
            lookup("SNOWFALL_PARTICLE_COUNT"),
            &mut self.particle_count,
        );
        parse_into(
            "SNOWFALL_WORKER_THREADS",
            lookup("SNOWFALL_WORKER_THREADS"),
            &mut self.simulation.worker_threads,
        );
        parse_into(
            "SNOWFALL_CHUNK_SIZE",
            lookup("SNOWFALL_CHUNK_SIZE"),
            &mut self.simulation.chunk_size,
        );
        parse_into(
            "SNOWFALL_PARALLEL",
            lookup("SNOWFALL_PARALLEL"),
            &mut self.simulation.parallel,
        );

        if let Some(raw) = lookup("SNOWFALL_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => {
                    tracing::warn!(target: "snowfall", "Ignoring unparsable SNOWFALL_SEED={:?}", raw)
                }
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        let non_negative = [
            ("cloud_radius", self.cloud_radius),
            ("cloud_speed", self.cloud_speed),
            ("cloud_height", self.cloud_height),
            ("fall_speed_random", self.fall_speed_random),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a finite number >= 0, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("fall_speed", self.fall_speed),
            ("fall_angular_speed", self.fall_angular_speed),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }

        // 抖动区间宽度和速度上下界都必须可表示，否则采样时会溢出
        let slowest = self.fall_speed - self.fall_speed_random;
        let fastest = self.fall_speed + self.fall_speed_random;
        if !(self.fall_speed_random * 2.0).is_finite()
            || !slowest.is_finite()
            || !fastest.is_finite()
        {
            return Err(ConfigError::ValidationError(format!(
                "fall_speed {} +/- fall_speed_random {} overflows",
                self.fall_speed, self.fall_speed_random
            )));
        }

        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::ValidationError(format!(
                "particle_count {} exceeds the maximum of {}",
                self.particle_count, MAX_PARTICLES
            )));
        }

        self.simulation.validate()?;
        self.run.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./snowfall.toml
    /// 2. ./snowfall.json
    /// 3. 使用默认配置
    pub fn load_or_default() -> Self {
        for path in ["snowfall.toml", "snowfall.json"] {
            if !Path::new(path).exists() {
                continue;
            }
            let loaded = if path.ends_with(".toml") {
                Self::from_toml_file(path)
            } else {
                Self::from_json_file(path)
            };
            match loaded {
                Ok(config) => {
                    tracing::info!(target: "snowfall", "Loaded config from {}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!(target: "snowfall", "Ignoring {}: {}", path, e);
                }
            }
        }

        tracing::info!(target: "snowfall", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = SnowfallConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.particle_count, 10_000);
        assert_eq!(config.cloud_radius, 100.0);
    }

    #[test]
    fn test_toml_serialization() {
        let config = SnowfallConfig::default().with_seed(7);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: SnowfallConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_serialization() {
        let config = SnowfallConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed: SnowfallConfig = serde_json::from_str(&json_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SnowfallConfig::from_toml_str(
            r#"
            particle_count = 500
            seed = 42

            [simulation]
            chunk_size = 128
            "#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.simulation.chunk_size, 128);
        assert!(config.simulation.parallel);
        assert_eq!(config.fall_speed, 50.0);
    }

    #[test]
    fn test_negative_count_is_parse_error() {
        let result = SnowfallConfig::from_toml_str("particle_count = -5");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_rejects_negative_radius() {
        let config = SnowfallConfig::default().with_cloud_radius(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_nan_and_oversized() {
        let mut config = SnowfallConfig::default();
        config.fall_speed = f32::NAN;
        assert!(config.validate().is_err());

        let config = SnowfallConfig::default().with_particle_count(MAX_PARTICLES + 1);
        assert!(config.validate().is_err());

        let config = SnowfallConfig::default().with_fall_speed(50.0, -2.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_overflowing_jitter() {
        let config = SnowfallConfig::default()
            .with_particle_count(1)
            .with_seed(1)
            .with_fall_speed(0.0, 3.0e38);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let config = SnowfallConfig::default().with_fall_speed(f32::MAX, 1.0e38);
        assert!(config.validate().is_err());

        let config = SnowfallConfig::default().with_fall_speed(1.0e6, 1.0e6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SNOWFALL_PARTICLE_COUNT", "256"),
            ("SNOWFALL_SEED", "99"),
            ("SNOWFALL_PARALLEL", "false"),
            ("SNOWFALL_CLOUD_RADIUS", "not-a-number"),
            ("SNOWFALL_FALL_SPEED_RANDOM", "4.5"),
            ("SNOWFALL_FALL_ANGULAR_SPEED", "-30"),
            ("SNOWFALL_CHUNK_SIZE", "256"),
        ]
        .into_iter()
        .collect();

        let mut config = SnowfallConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.particle_count, 256);
        assert_eq!(config.seed, Some(99));
        assert!(!config.simulation.parallel);
        assert_eq!(config.cloud_radius, 100.0);
        assert_eq!(config.fall_speed_random, 4.5);
        assert_eq!(config.fall_angular_speed, -30.0);
        assert_eq!(config.simulation.chunk_size, 256);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snowfall.toml");

        let config = SnowfallConfig::default().with_particle_count(32).with_seed(3);
        config.save_toml(&path).unwrap();
        let loaded = SnowfallConfig::from_toml_file(&path).unwrap();
        assert_eq!(config, loaded);

        let json_path = dir.path().join("snowfall.json");
        config.save_json(&json_path).unwrap();
        assert_eq!(SnowfallConfig::from_json_file(&json_path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let result = SnowfallConfig::from_toml_file("/nonexistent/snowfall.toml");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }
}
