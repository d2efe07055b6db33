//! 云层驱动
//!
//! 云层是唯一的共享状态：每帧由输入轴推动，随后作为只读快照交给粒子更新。

use crate::config::SnowfallConfig;
use bevy_ecs::prelude::*;
use glam::Vec3;

/// 水平方向的控制输入，两个轴都归一化到`[-1, 1]`
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CloudInput {
    /// 左右（世界X轴）
    pub horizontal: f32,
    /// 前后（世界Z轴）
    pub vertical: f32,
}

impl CloudInput {
    /// 创建输入，超出范围的值被截断
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal: clamp_axis(horizontal),
            vertical: clamp_axis(vertical),
        }
    }

    /// 世界空间的方向向量（y恒为0）
    pub fn direction(&self) -> Vec3 {
        Vec3::new(clamp_axis(self.horizontal), 0.0, clamp_axis(self.vertical))
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// 云层状态
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CloudState {
    /// 当前位置（无边界）
    pub position: Vec3,
    /// 半径
    pub radius: f32,
    /// 移动速度
    pub speed: f32,
}

impl Default for CloudState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 100.0,
            speed: 100.0,
        }
    }
}

impl CloudState {
    pub fn new(position: Vec3, radius: f32, speed: f32) -> Self {
        Self {
            position,
            radius,
            speed,
        }
    }

    /// 按配置创建：位于`(0, cloud_height, 0)`
    pub fn from_config(config: &SnowfallConfig) -> Self {
        Self::new(
            Vec3::new(0.0, config.cloud_height, 0.0),
            config.cloud_radius,
            config.cloud_speed,
        )
    }

    /// 当前位置快照
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// 按输入推进一帧
    pub fn advance(&mut self, input: CloudInput, delta_time: f32) {
        self.position += input.direction() * self.speed * delta_time;
    }
}
