//! 生成阶段使用的随机采样函数

use glam::{EulerRot, Quat, Vec2};
use rand::Rng;

/// 初始俯仰角（度），雪花平面朝向地面
pub const INITIAL_PITCH_DEGREES: f32 = 90.0;

/// 在半径为`radius`的圆盘内均匀采样
///
/// 极坐标采样：`θ ~ U(0, 2π)`，`r = sqrt(U(0, 1)) * radius`。
/// 返回值的`x`/`y`分别对应世界坐标的`x`/`z`。
pub fn sample_disc<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let r = rng.gen::<f32>().sqrt() * radius;
    Vec2::new(r * angle.cos(), r * angle.sin())
}

/// 在`[base - jitter, base + jitter]`内均匀采样
pub fn sample_jittered<R: Rng + ?Sized>(rng: &mut R, base: f32, jitter: f32) -> f32 {
    base + rng.gen_range(-jitter..=jitter)
}

/// 在`[0, max]`内均匀采样
pub fn sample_height<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    rng.gen_range(0.0..=max)
}

/// 随机偏航角的初始朝向
///
/// 欧拉角顺序与引擎一致：先绕Y轴偏航，再绕X轴俯仰90度，不滚转。
pub fn sample_orientation<R: Rng + ?Sized>(rng: &mut R) -> Quat {
    let yaw = rng.gen_range(0.0..360.0f32);
    orientation_from_yaw(yaw)
}

/// 由偏航角（度）构造初始朝向
pub fn orientation_from_yaw(yaw_degrees: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw_degrees.to_radians(),
        INITIAL_PITCH_DEGREES.to_radians(),
        0.0,
    )
}
