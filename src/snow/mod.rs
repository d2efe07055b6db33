//! 降雪粒子模块
//!
//! 在移动的云层下方生成成千上万片下落、自旋的雪花。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Snowfall Tick                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Cloud Driver                                         │
//! │     - 输入轴推动云层位置                                   │
//! │     - 读取一次位置快照                                     │
//! │                                                          │
//! │  2. Particle Update（按64个一组并行）                      │
//! │     - Fall: y -= speed * dt，落地后回到云层下方             │
//! │     - Rotation: 绕局部Z轴累积自旋                          │
//! │                                                          │
//! │  3. Hand-off                                             │
//! │     - 位置与朝向写入实例缓冲区，交给外部渲染器               │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cloud;
pub mod fall;
pub mod instance;
pub mod rotation;
pub mod sampling;
pub mod simulation;
pub mod store;


pub use cloud::{CloudInput, CloudState};
pub use fall::{fall, fall_batch, reset_position};
pub use instance::{instance_bytes, SnowflakeInstance};
pub use rotation::{rotate, rotate_batch};
pub use simulation::{Snowfall, SnowfallSimulation, TickStats};
pub use store::{ParticleStore, Snowflake, StoreSlicesMut};
