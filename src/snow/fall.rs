//! 下落更新
//!
//! 雪花按自身速度下落，穿过地面（y < 0）后回到云层当前位置下方的固定水平偏移处。

use glam::Vec3;

/// 重置后的位置：水平偏移（y置0）加上云层位置
///
/// 累积的下落量被丢弃，重置高度就是云层当前高度。
#[inline]
pub fn reset_position(origin: Vec3, cloud_position: Vec3) -> Vec3 {
    Vec3::new(origin.x, 0.0, origin.z) + cloud_position
}

/// 更新单个雪花，返回是否发生了重置
#[inline]
pub fn fall(
    position: &mut Vec3,
    fall_speed: f32,
    origin: Vec3,
    cloud_position: Vec3,
    delta_time: f32,
) -> bool {
    position.y -= fall_speed * delta_time;
    if position.y < 0.0 {
        *position = reset_position(origin, cloud_position);
        true
    } else {
        false
    }
}

/// 批量更新一段连续的雪花，返回重置数量
///
/// 三个切片按索引一一对应，长度必须一致。
pub fn fall_batch(
    positions: &mut [Vec3],
    fall_speeds: &[f32],
    origins: &[Vec3],
    cloud_position: Vec3,
    delta_time: f32,
) -> usize {
    debug_assert_eq!(positions.len(), fall_speeds.len());
    debug_assert_eq!(positions.len(), origins.len());

    let mut resets = 0;
    for ((position, &speed), &origin) in positions.iter_mut().zip(fall_speeds).zip(origins) {
        if fall(position, speed, origin, cloud_position, delta_time) {
            resets += 1;
        }
    }
    resets
}
