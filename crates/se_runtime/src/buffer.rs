// crates/se_runtime/src/buffer.rs

//! DeviceBuffer - 设备缓冲区抽象
//!
//! 提供统一的缓冲区接口，CPU 实现使用 `Vec<T>`。

use bytemuck::Pod;

/// 设备缓冲区 Trait
///
/// 抽象不同计算设备上的内存缓冲区。跨内存空间的数据移动只通过
/// `read_range` / `write_range` 完成，不做隐式指针别名。
pub trait DeviceBuffer<T: Pod + Send + Sync>: Clone + Send + Sync {
    /// 返回缓冲区长度
    fn len(&self) -> usize;

    /// 检查是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 获取只读切片（仅主机可见缓冲区有效）
    fn as_slice(&self) -> &[T];

    /// 获取可变切片（仅主机可见缓冲区有效）
    fn as_slice_mut(&mut self) -> &mut [T];

    /// 从 `offset` 开始读出 `dst.len()` 个值
    ///
    /// # Panics
    /// 范围越界时 panic
    fn read_range(&self, offset: usize, dst: &mut [T]) {
        dst.copy_from_slice(&self.as_slice()[offset..offset + dst.len()]);
    }

    /// 从 `offset` 开始写入 `src`
    ///
    /// # Panics
    /// 范围越界时 panic
    fn write_range(&mut self, offset: usize, src: &[T]) {
        self.as_slice_mut()[offset..offset + src.len()].copy_from_slice(src);
    }
}

// =============================================================================
// Vec<T> 实现
// =============================================================================

impl<T: Pod + Send + Sync> DeviceBuffer<T> for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        self.as_ref()
    }

    #[inline]
    fn as_slice_mut(&mut self) -> &mut [T] {
        self.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_buffer() {
        let mut buf: Vec<f64> = vec![0.0; 10];
        assert_eq!(DeviceBuffer::len(&buf), 10);
        assert!(!DeviceBuffer::is_empty(&buf));

        DeviceBuffer::as_slice_mut(&mut buf)[9] = 1.0;
        assert_eq!(DeviceBuffer::as_slice(&buf)[9], 1.0);
    }

    #[test]
    fn test_range_transfer() {
        let mut buf: Vec<f32> = vec![0.0; 6];
        buf.write_range(2, &[1.0, 2.0, 3.0]);
        assert_eq!(buf, vec![0.0, 0.0, 1.0, 2.0, 3.0, 0.0]);

        let mut out = [0.0f32; 2];
        buf.read_range(3, &mut out);
        assert_eq!(out, [2.0, 3.0]);
    }

    #[test]
    #[should_panic]
    fn test_range_out_of_bounds() {
        let mut buf: Vec<f64> = vec![0.0; 4];
        buf.write_range(3, &[1.0, 2.0]);
    }
}
