// crates/se_runtime/src/backend.rs

//! Backend - 计算后端抽象
//!
//! 统一内存分配与跨内存空间传输。示踪剂容器的存储放在后端缓冲区中，
//! 主机端的外部缓冲区只能通过 `upload` / `download` 与之交换数据，
//! 两者都在返回前完成（同步语义）。

use bytemuck::Pod;
use std::marker::PhantomData;

use crate::buffer::DeviceBuffer;
use crate::scalar::RuntimeScalar;

/// 内存位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLocation {
    /// 主机内存 (CPU)
    Host,
    /// 设备内存（设备编号）
    Device(usize),
}

impl MemoryLocation {
    /// 是否与主机共享地址空间
    #[inline]
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host)
    }
}

/// 计算后端 Trait
///
/// # 类型参数
///
/// - `Scalar`: 标量类型（f32 或 f64）
/// - `Buffer<T>`: 关联的缓冲区类型
pub trait Backend: Clone + Send + Sync + 'static {
    /// 标量类型
    type Scalar: RuntimeScalar;
    /// 缓冲区类型
    type Buffer<T: Pod + Send + Sync>: DeviceBuffer<T>;

    /// 后端名称
    fn name(&self) -> &'static str;

    /// 内存位置
    fn memory_location(&self) -> MemoryLocation;

    /// 分配零初始化缓冲区
    fn alloc<T: Pod + Default + Send + Sync>(&self, len: usize) -> Self::Buffer<T>;

    /// 主机 -> 设备：把 `src` 写到 `dst[offset..]`
    fn upload<T: Pod + Send + Sync>(&self, src: &[T], dst: &mut Self::Buffer<T>, offset: usize) {
        dst.write_range(offset, src);
    }

    /// 设备 -> 主机：把 `src[offset..]` 读到 `dst`
    fn download<T: Pod + Send + Sync>(&self, src: &Self::Buffer<T>, offset: usize, dst: &mut [T]) {
        src.read_range(offset, dst);
    }

    /// 同步操作（异步设备需要在此等待传输完成）
    fn synchronize(&self) {}
}

// =============================================================================
// CPU 后端
// =============================================================================

/// CPU 后端（零大小类型）
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend<S: RuntimeScalar> {
    _marker: PhantomData<S>,
}

impl<S: RuntimeScalar> CpuBackend<S> {
    /// 创建 CPU 后端
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

macro_rules! impl_cpu_backend {
    ($scalar:ty, $name:literal) => {
        impl Backend for CpuBackend<$scalar> {
            type Scalar = $scalar;
            type Buffer<T: Pod + Send + Sync> = Vec<T>;

            fn name(&self) -> &'static str {
                $name
            }

            fn memory_location(&self) -> MemoryLocation {
                MemoryLocation::Host
            }

            fn alloc<T: Pod + Default + Send + Sync>(&self, len: usize) -> Self::Buffer<T> {
                vec![T::default(); len]
            }
        }
    };
}

impl_cpu_backend!(f32, "CPU-f32");
impl_cpu_backend!(f64, "CPU-f64");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_backend_f64() {
        let backend = CpuBackend::<f64>::new();
        assert_eq!(backend.name(), "CPU-f64");
        assert_eq!(backend.memory_location(), MemoryLocation::Host);
        assert!(backend.memory_location().is_host());

        let x: Vec<f64> = backend.alloc(10);
        assert_eq!(x.len(), 10);
        assert!(x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_cpu_backend_f32() {
        let backend = CpuBackend::<f32>::new();
        assert_eq!(backend.name(), "CPU-f32");
    }

    #[test]
    fn test_upload_download() {
        let backend = CpuBackend::<f64>::new();
        let mut device: Vec<f64> = backend.alloc(8);
        backend.upload(&[1.0, 2.0, 3.0], &mut device, 4);
        backend.synchronize();

        let mut host = [0.0; 4];
        backend.download(&device, 3, &mut host);
        assert_eq!(host, [0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_device_location() {
        assert!(!MemoryLocation::Device(0).is_host());
    }
}
