//! ECS集成
//!
//! 把云层、输入和模拟作为bevy_ecs资源挂到`World`上，
//! 由两个串联的系统完成每帧更新：先移动云层，再更新雪花。

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;

use crate::config::SnowfallConfig;
use crate::core::SnowfallResult;
use crate::snow::simulation::effective_delta_time;
use crate::snow::{CloudInput, CloudState, SnowfallSimulation, TickStats};


/// 帧时间资源，由宿主每帧写入`delta_seconds`
#[derive(Resource, Clone, Copy, Debug)]
pub struct FrameTime {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
}

impl Default for FrameTime {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            elapsed_seconds: 0.0,
        }
    }
}

impl FrameTime {
    /// 以固定帧时长创建
    pub fn fixed(delta_seconds: f32) -> Self {
        Self {
            delta_seconds,
            ..Default::default()
        }
    }
}

/// 最近一帧的统计信息
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct LastTickStats(pub TickStats);

/// 插入降雪所需的全部资源
pub fn insert_snowfall_resources(world: &mut World, config: &SnowfallConfig) -> SnowfallResult<()> {
    let simulation = SnowfallSimulation::new(config)?;
    world.insert_resource(CloudState::from_config(config));
    world.insert_resource(CloudInput::default());
    world.insert_resource(FrameTime::fixed(config.run.delta_time));
    world.insert_resource(LastTickStats::default());
    world.insert_resource(simulation);
    Ok(())
}

/// 累计帧时间系统
pub fn advance_time_system(mut time: ResMut<FrameTime>) {
    time.elapsed_seconds += effective_delta_time(time.delta_seconds) as f64;
}

/// 云层移动系统
pub fn move_cloud_system(
    time: Res<FrameTime>,
    input: Res<CloudInput>,
    mut cloud: ResMut<CloudState>,
) {
    cloud.advance(*input, effective_delta_time(time.delta_seconds));
}

/// 雪花更新系统
///
/// 云层以只读资源借入，更新期间不可能被其他系统修改。
pub fn snowfall_update_system(
    time: Res<FrameTime>,
    cloud: Res<CloudState>,
    mut simulation: ResMut<SnowfallSimulation>,
    mut stats: ResMut<LastTickStats>,
) {
    stats.0 = simulation.tick(&cloud, time.delta_seconds);
}

/// 构建降雪调度
///
/// 并行发生在模拟内部的工作线程池中，调度器本身单线程执行。
pub fn snowfall_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            advance_time_system,
            move_cloud_system,
            snowfall_update_system,
        )
            .chain(),
    );
    schedule
}
