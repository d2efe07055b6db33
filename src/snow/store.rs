//! SoA (Structure of Arrays) 粒子存储
//!
//! 每个字段一个连续数组，供分块并行更新使用。
//! 粒子数量在生成后固定，没有删除操作：落地的雪花原地重置。

use crate::config::SnowfallConfig;
use crate::core::{SnowfallError, SnowfallResult};
use crate::snow::sampling;
use glam::{Quat, Vec3};
use rand::Rng;

/// 单个雪花的行视图
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    /// 世界坐标位置
    pub position: Vec3,
    /// 下落速度（单位/秒）
    pub fall_speed: f32,
    /// 绕局部Z轴的角速度（弧度/秒）
    pub angular_speed: f32,
    /// 相对云层的水平偏移（y恒为0）
    pub origin: Vec3,
    /// 朝向
    pub rotation: Quat,
}

impl Default for Snowflake {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            fall_speed: 0.0,
            angular_speed: 0.0,
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Snowflake {
    /// 在给定位置创建雪花，水平偏移取自位置
    pub fn new(position: Vec3, fall_speed: f32) -> Self {
        Self {
            position,
            fall_speed,
            origin: Vec3::new(position.x, 0.0, position.z),
            ..Default::default()
        }
    }

    /// 设置角速度（弧度/秒）
    pub fn with_angular_speed(mut self, angular_speed: f32) -> Self {
        self.angular_speed = angular_speed;
        self
    }

    /// 设置朝向
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// 设置水平偏移，y分量被忽略
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = Vec3::new(origin.x, 0.0, origin.z);
        self
    }
}

/// 同时借用全部字段的可变视图
///
/// 位置与朝向可写，其余字段只读，便于把下落和旋转拆给不同任务。
pub struct StoreSlicesMut<'a> {
    pub positions: &'a mut [Vec3],
    pub rotations: &'a mut [Quat],
    pub fall_speeds: &'a [f32],
    pub angular_speeds: &'a [f32],
    pub origins: &'a [Vec3],
}

/// 雪花存储
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    positions: Vec<Vec3>,
    rotations: Vec<Quat>,
    fall_speeds: Vec<f32>,
    angular_speeds: Vec<f32>,
    origins: Vec<Vec3>,
}

impl ParticleStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 按配置生成`config.particle_count`个雪花
    ///
    /// 每个雪花依次采样：圆盘内水平偏移、下落速度、初始高度、偏航角。
    /// 相同的种子和配置总是得到相同的存储。
    pub fn spawn<R: Rng + ?Sized>(config: &SnowfallConfig, rng: &mut R) -> SnowfallResult<Self> {
        config.validate()?;

        let count = config.particle_count;
        let mut store = Self::with_capacity(count)?;
        let angular_speed = config.fall_angular_speed.to_radians();

        for _ in 0..count {
            let disc = sampling::sample_disc(rng, config.cloud_radius);
            let fall_speed =
                sampling::sample_jittered(rng, config.fall_speed, config.fall_speed_random);
            let height = sampling::sample_height(rng, config.cloud_height);
            let rotation = sampling::sample_orientation(rng);

            store.push(Snowflake {
                position: Vec3::new(disc.x, height, disc.y),
                fall_speed,
                angular_speed,
                origin: Vec3::new(disc.x, 0.0, disc.y),
                rotation,
            });
        }

        tracing::info!(
            target: "snowfall",
            "Spawned {} snowflakes in a cloud of radius {}",
            count,
            config.cloud_radius
        );
        Ok(store)
    }

    /// 从显式给定的雪花构建存储
    pub fn from_snowflakes<I>(snowflakes: I) -> Self
    where
        I: IntoIterator<Item = Snowflake>,
    {
        let mut store = Self::new();
        for snowflake in snowflakes {
            store.push(snowflake);
        }
        store
    }

    /// 预分配容量，分配失败时中止生成
    fn with_capacity(count: usize) -> SnowfallResult<Self> {
        let mut store = Self::new();
        let spawn_err = |e: std::collections::TryReserveError| {
            SnowfallError::Spawn(format!("cannot reserve {} snowflakes: {}", count, e))
        };
        store.positions.try_reserve_exact(count).map_err(spawn_err)?;
        store.rotations.try_reserve_exact(count).map_err(spawn_err)?;
        store.fall_speeds.try_reserve_exact(count).map_err(spawn_err)?;
        store.angular_speeds.try_reserve_exact(count).map_err(spawn_err)?;
        store.origins.try_reserve_exact(count).map_err(spawn_err)?;
        Ok(store)
    }

    fn push(&mut self, snowflake: Snowflake) {
        self.positions.push(snowflake.position);
        self.rotations.push(snowflake.rotation);
        self.fall_speeds.push(snowflake.fall_speed);
        self.angular_speeds.push(snowflake.angular_speed);
        self.origins.push(Vec3::new(snowflake.origin.x, 0.0, snowflake.origin.z));
    }

    /// 获取雪花数量
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    pub fn fall_speeds(&self) -> &[f32] {
        &self.fall_speeds
    }

    pub fn angular_speeds(&self) -> &[f32] {
        &self.angular_speeds
    }

    pub fn origins(&self) -> &[Vec3] {
        &self.origins
    }

    /// 获取第`index`个雪花
    pub fn get(&self, index: usize) -> Option<Snowflake> {
        if index >= self.len() {
            return None;
        }
        Some(Snowflake {
            position: self.positions[index],
            fall_speed: self.fall_speeds[index],
            angular_speed: self.angular_speeds[index],
            origin: self.origins[index],
            rotation: self.rotations[index],
        })
    }

    /// 按行遍历
    pub fn iter(&self) -> impl Iterator<Item = Snowflake> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// 拆分为各字段切片
    pub fn slices_mut(&mut self) -> StoreSlicesMut<'_> {
        StoreSlicesMut {
            positions: &mut self.positions,
            rotations: &mut self.rotations,
            fall_speeds: &self.fall_speeds,
            angular_speeds: &self.angular_speeds,
            origins: &self.origins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(count: usize) -> SnowfallConfig {
        SnowfallConfig::default().with_particle_count(count).with_seed(11)
    }

    #[test]
    fn test_spawn_count_and_bounds() {
        let config = config(2000);
        let mut rng = StdRng::seed_from_u64(11);
        let store = ParticleStore::spawn(&config, &mut rng).unwrap();

        assert_eq!(store.len(), 2000);
        for flake in store.iter() {
            assert_eq!(flake.origin.y, 0.0);
            assert!(flake.origin.length() <= config.cloud_radius + 1e-3);
            assert_eq!(flake.position.x, flake.origin.x);
            assert_eq!(flake.position.z, flake.origin.z);
            assert!((0.0..=config.cloud_height).contains(&flake.position.y));
            assert!((48.0..=52.0).contains(&flake.fall_speed));
            assert!((flake.angular_speed - 2.0f32.to_radians()).abs() < 1e-7);
        }
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let config = config(100);
        let a = ParticleStore::spawn(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = ParticleStore::spawn(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let c = ParticleStore::spawn(&config, &mut StdRng::seed_from_u64(6)).unwrap();

        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.rotations(), b.rotations());
        assert_ne!(a.positions(), c.positions());
    }

    #[test]
    fn test_spawn_rejects_invalid_config() {
        let config = config(10).with_cloud_radius(-5.0);
        let result = ParticleStore::spawn(&config, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(SnowfallError::Config(_))));
    }

    #[test]
    fn test_empty_spawn() {
        let store = ParticleStore::spawn(&config(0), &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(store.is_empty());
        assert!(store.get(0).is_none());
    }

    #[test]
    fn test_from_snowflakes_flattens_origin() {
        let flake = Snowflake::new(Vec3::new(3.0, 25.0, -4.0), 10.0)
            .with_origin(Vec3::new(3.0, 7.0, -4.0));
        let store = ParticleStore::from_snowflakes([flake]);

        let stored = store.get(0).unwrap();
        assert_eq!(stored.origin, Vec3::new(3.0, 0.0, -4.0));
        assert_eq!(stored.position, Vec3::new(3.0, 25.0, -4.0));
        assert_eq!(stored.fall_speed, 10.0);
    }
}
