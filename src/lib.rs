//! # Snowfall
//!
//! Falling snow particle simulation for real-time 3D engines.
//!
//! ## Features
//!
//! - **SoA Particle Store**: Contiguous per-field arrays for cache-friendly batch updates
//! - **Parallel Updates**: Fall and rotation kernels run over fixed-size chunks with rayon
//! - **Moving Cloud**: Particles recycle beneath the cloud's current position
//! - **Deterministic**: Seeded spawning and per-particle updates reproduce bit-identical runs
//! - **ECS Integration**: bevy_ecs resources and systems for hosting inside an engine loop
//! - **Renderer Hand-off**: GPU-ready instance data via bytemuck
//!
//! ## Architecture Design
//!
//! - **State**: `ParticleStore` and `CloudState` are plain data
//! - **Kernels**: `fall` and `rotate` are stateless per-particle functions
//! - **Driver**: `SnowfallSimulation::tick` takes the cloud by reference, so the
//!   shared cloud position is an explicit snapshot rather than a global
//!
//! ### Example
//!
//! ```
//! use snowfall::prelude::*;
//!
//! let config = SnowfallConfig::default().with_particle_count(1_000).with_seed(7);
//! let mut snowfall = Snowfall::new(&config).unwrap();
//!
//! for _ in 0..60 {
//!     snowfall.step(1.0 / 60.0, CloudInput::new(0.5, -0.25));
//! }
//!
//! let mut instances = Vec::new();
//! snowfall.simulation.write_instances(&mut instances);
//! assert_eq!(instances.len(), 1_000);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types, logging and shared macros
//! - [`config`]: TOML/JSON configuration with validation
//! - [`snow`]: Particle store, update kernels, cloud driver and simulation
//! - [`ecs`]: bevy_ecs resources, systems and schedule

/// Error types, logging initialization and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Snowfall particle simulation
pub mod snow;
/// Entity Component System integration
pub mod ecs;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ConfigError, SimulationConfig, SnowfallConfig};
    pub use crate::core::{SnowfallError, SnowfallResult};
    pub use crate::snow::{
        CloudInput, CloudState, ParticleStore, Snowfall, SnowfallSimulation, Snowflake,
        SnowflakeInstance, TickStats,
    };
}
