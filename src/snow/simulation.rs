//! 降雪模拟
//!
//! 每帧先读取一次云层位置快照，再对全部雪花执行下落与旋转更新。
//! 雪花之间互不依赖，按固定大小分块后并行处理；下落只写位置，
//! 旋转只写朝向，两者通过`rayon::join`同时执行。
//!
//! ## 使用示例
//!
//! ```
//! use snowfall::prelude::*;
//!
//! let config = SnowfallConfig::default().with_particle_count(256).with_seed(1);
//! let mut snowfall = Snowfall::new(&config).unwrap();
//! let stats = snowfall.step(1.0 / 60.0, CloudInput::new(1.0, 0.0));
//! assert_eq!(stats.particles_updated, 256);
//! ```

use crate::config::{SimulationConfig, SnowfallConfig};
use crate::core::{SnowfallError, SnowfallResult};
use crate::snow::cloud::{CloudInput, CloudState};
use crate::snow::fall::fall_batch;
use crate::snow::instance::SnowflakeInstance;
use crate::snow::rotation::rotate_batch;
use crate::snow::store::{ParticleStore, StoreSlicesMut};
use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::time::Instant;

/// 单帧统计信息
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickStats {
    /// 更新的雪花数量
    pub particles_updated: usize,
    /// 本帧重置的雪花数量
    pub resets: usize,
    /// 处理时间（微秒）
    pub processing_time_us: u64,
}

impl TickStats {
    /// 计算吞吐量（雪花/秒）
    pub fn throughput(&self) -> f64 {
        if self.processing_time_us == 0 {
            return 0.0;
        }
        (self.particles_updated as f64) / (self.processing_time_us as f64 / 1_000_000.0)
    }
}

/// 降雪模拟
///
/// 持有雪花存储和（可选的）专用工作线程池。云层状态不在这里：
/// 调用方每帧把云层以只读引用传入，保证更新期间它不会被修改。
#[derive(Resource)]
pub struct SnowfallSimulation {
    store: ParticleStore,
    settings: SimulationConfig,
    pool: Option<rayon::ThreadPool>,
    seed: Option<u64>,
    ticks: u64,
    elapsed_seconds: f64,
}

impl SnowfallSimulation {
    /// 按配置生成雪花并创建模拟
    ///
    /// 未指定种子时从系统熵中取一个并记录下来，便于复现。
    pub fn new(config: &SnowfallConfig) -> SnowfallResult<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let store = ParticleStore::spawn(config, &mut rng)?;

        let mut simulation = Self::with_store(store, config.simulation.clone())?;
        simulation.seed = Some(seed);
        tracing::info!(target: "snowfall", "Snowfall simulation seeded with {}", seed);
        Ok(simulation)
    }

    /// 使用已有存储创建模拟
    pub fn with_store(store: ParticleStore, settings: SimulationConfig) -> SnowfallResult<Self> {
        settings.validate()?;

        let pool = if settings.parallel && settings.worker_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(settings.worker_threads)
                .thread_name(|i| format!("snowfall-worker-{}", i))
                .build()
                .map_err(|e| SnowfallError::ThreadPool(e.to_string()))?;
            tracing::info!(
                target: "snowfall",
                "Created worker pool with {} threads",
                settings.worker_threads
            );
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            store,
            settings,
            pool,
            seed: None,
            ticks: 0,
            elapsed_seconds: 0.0,
        })
    }

    /// 推进一帧
    ///
    /// 云层位置在开始时读取一次，所有雪花看到同一个快照。
    /// 非有限或负的帧时长按零长度帧处理。
    pub fn tick(&mut self, cloud: &CloudState, delta_time: f32) -> TickStats {
        let start = Instant::now();
        let delta_time = effective_delta_time(delta_time);
        let cloud_position = cloud.position();
        let chunk_size = self.settings.chunk_size;
        let slices = self.store.slices_mut();

        let resets = if !self.settings.parallel {
            update_sequential(slices, cloud_position, delta_time)
        } else if let Some(pool) = &self.pool {
            pool.install(|| update_parallel(slices, cloud_position, delta_time, chunk_size))
        } else {
            update_parallel(slices, cloud_position, delta_time, chunk_size)
        };

        self.ticks += 1;
        self.elapsed_seconds += delta_time as f64;

        TickStats {
            particles_updated: self.store.len(),
            resets,
            processing_time_us: start.elapsed().as_micros() as u64,
        }
    }

    /// 把当前状态写入实例缓冲区（覆盖原有内容）
    pub fn write_instances(&self, out: &mut Vec<SnowflakeInstance>) {
        out.clear();
        out.extend(
            self.store
                .positions()
                .iter()
                .zip(self.store.rotations())
                .map(|(&position, &rotation)| SnowflakeInstance::new(position, rotation)),
        );
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn settings(&self) -> &SimulationConfig {
        &self.settings
    }

    /// 生成时使用的种子（显式存储创建时为None）
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// 已执行的帧数
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// 累计模拟时间（秒）
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

/// 把宿主传入的帧时长规整为可用值
///
/// NaN、无穷或负值会让位置永久变为NaN，此时退化为零长度帧。
pub(crate) fn effective_delta_time(delta_time: f32) -> f32 {
    if delta_time.is_finite() && delta_time >= 0.0 {
        delta_time
    } else {
        tracing::warn!(
            target: "snowfall",
            "Treating invalid delta time {} as a zero-length step",
            delta_time
        );
        0.0
    }
}

fn update_sequential(slices: StoreSlicesMut<'_>, cloud_position: Vec3, delta_time: f32) -> usize {
    let resets = fall_batch(
        slices.positions,
        slices.fall_speeds,
        slices.origins,
        cloud_position,
        delta_time,
    );
    rotate_batch(slices.rotations, slices.angular_speeds, delta_time);
    resets
}

fn update_parallel(
    slices: StoreSlicesMut<'_>,
    cloud_position: Vec3,
    delta_time: f32,
    chunk_size: usize,
) -> usize {
    let StoreSlicesMut {
        positions,
        rotations,
        fall_speeds,
        angular_speeds,
        origins,
    } = slices;

    let (resets, ()) = rayon::join(
        || {
            positions
                .par_chunks_mut(chunk_size)
                .zip(fall_speeds.par_chunks(chunk_size))
                .zip(origins.par_chunks(chunk_size))
                .map(|((positions, speeds), origins)| {
                    fall_batch(positions, speeds, origins, cloud_position, delta_time)
                })
                .sum::<usize>()
        },
        || {
            rotations
                .par_chunks_mut(chunk_size)
                .zip(angular_speeds.par_chunks(chunk_size))
                .for_each(|(rotations, speeds)| rotate_batch(rotations, speeds, delta_time));
        },
    );
    resets
}

/// 云层与模拟的组合
///
/// 按固定顺序推进一帧：先移动云层，再用新的云层位置更新雪花。
pub struct Snowfall {
    pub cloud: CloudState,
    pub simulation: SnowfallSimulation,
}

impl Snowfall {
    pub fn new(config: &SnowfallConfig) -> SnowfallResult<Self> {
        Ok(Self {
            cloud: CloudState::from_config(config),
            simulation: SnowfallSimulation::new(config)?,
        })
    }

    /// 推进一帧
    pub fn step(&mut self, delta_time: f32, input: CloudInput) -> TickStats {
        let delta_time = effective_delta_time(delta_time);
        self.cloud.advance(input, delta_time);
        self.simulation.tick(&self.cloud, delta_time)
    }
}
