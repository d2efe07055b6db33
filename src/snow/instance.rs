//! 渲染交接数据
//!
//! 渲染不在本库范围内；这里只提供可直接上传到GPU实例缓冲区的紧凑布局。

use glam::{Quat, Vec3};

/// GPU兼容的雪花实例数据
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SnowflakeInstance {
    /// 位置 (xyz)
    pub position: [f32; 3],
    /// 对齐填充
    pub _padding: f32,
    /// 朝向四元数 (xyzw)
    pub rotation: [f32; 4],
}

impl SnowflakeInstance {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position: position.to_array(),
            _padding: 0.0,
            rotation: rotation.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_array(self.rotation)
    }
}

/// 实例切片的字节视图
pub fn instance_bytes(instances: &[SnowflakeInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
