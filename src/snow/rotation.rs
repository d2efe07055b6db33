//! 旋转更新：绕局部Z轴累积自旋

use glam::Quat;

/// 更新单个雪花的朝向
#[inline]
pub fn rotate(rotation: &mut Quat, angular_speed: f32, delta_time: f32) {
    *rotation = (*rotation * Quat::from_rotation_z(angular_speed * delta_time)).normalize();
}

/// 批量更新一段连续的雪花
pub fn rotate_batch(rotations: &mut [Quat], angular_speeds: &[f32], delta_time: f32) {
    debug_assert_eq!(rotations.len(), angular_speeds.len());

    for (rotation, &speed) in rotations.iter_mut().zip(angular_speeds) {
        rotate(rotation, speed, delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_from_identity() {
        let mut rotation = Quat::IDENTITY;
        rotate(&mut rotation, FRAC_PI_2, 1.0);
        assert!(rotation.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_2), 1e-6));
    }

    #[test]
    fn test_rotation_is_local() {
        // 右乘：旋转发生在已有朝向的局部坐标系里
        let initial = Quat::from_rotation_x(FRAC_PI_2);
        let mut rotation = initial;
        rotate(&mut rotation, 1.0, 0.25);
        let expected = initial * Quat::from_rotation_z(0.25);
        assert!(rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_zero_speed_keeps_rotation() {
        let initial = Quat::from_rotation_y(0.3);
        let mut rotations = vec![initial; 4];
        rotate_batch(&mut rotations, &[0.0; 4], 1.0);
        for rotation in rotations {
            assert!(rotation.abs_diff_eq(initial, 1e-6));
        }
    }
}
