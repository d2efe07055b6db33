//! 无头降雪演示
//!
//! 加载配置，让云层沿圆周移动，按固定帧时长运行模拟并输出统计信息。

use snowfall::core::{initialize_logging, SnowfallResult};
use snowfall::prelude::*;

fn main() {
    if let Err(e) = run() {
        eprintln!("Snowfall failed to start: {}", e);
        std::process::exit(1);
    }
}

fn run() -> SnowfallResult<()> {
    let mut config = SnowfallConfig::load_or_default();
    config.apply_env_overrides();
    config.validate()?;
    initialize_logging(&config.logging);

    let mut snowfall = Snowfall::new(&config)?;
    let mut instances = Vec::with_capacity(config.particle_count);

    let delta_time = config.run.delta_time;
    let ticks_per_second = ((1.0 / delta_time).round() as u32).max(1);
    let mut resets_this_second = 0;

    tracing::info!(
        target: "snowfall",
        "Running {} ticks of {:.4}s with {} snowflakes on {} threads",
        config.run.ticks,
        delta_time,
        snowfall.simulation.len(),
        config.simulation.resolved_worker_threads()
    );

    for tick in 0..config.run.ticks {
        let t = tick as f32 * delta_time;
        let input = CloudInput::new(t.cos(), t.sin());
        let stats = snowfall.step(delta_time, input);
        snowfall.simulation.write_instances(&mut instances);

        resets_this_second += stats.resets;
        tracing::trace!(target: "snowfall", "tick {}: {:?}", tick, stats);

        if (tick + 1) % ticks_per_second == 0 {
            tracing::info!(
                target: "snowfall",
                "t={:.1}s cloud=({:.1}, {:.1}, {:.1}) resets={} throughput={:.0}/s",
                snowfall.simulation.elapsed_seconds(),
                snowfall.cloud.position.x,
                snowfall.cloud.position.y,
                snowfall.cloud.position.z,
                resets_this_second,
                stats.throughput()
            );
            resets_this_second = 0;
        }
    }

    tracing::info!(
        target: "snowfall",
        "Finished after {} ticks, {} instance bytes per frame",
        snowfall.simulation.ticks(),
        snowfall::snow::instance_bytes(&instances).len()
    );
    Ok(())
}
