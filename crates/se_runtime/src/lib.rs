// crates/se_runtime/src/lib.rs

//! SEDyn Runtime Layer (Layer 2)
//!
//! 运行时抽象层，提供计算后端、标量类型、设备缓冲区等核心抽象。
//!
//! # 模块概览
//!
//! - [`scalar`]: RuntimeScalar trait（密封，仅 f32/f64 可实现）
//! - [`backend`]: Backend trait 和 CpuBackend 实现
//! - [`buffer`]: DeviceBuffer trait 设备缓冲区抽象
//! - [`hash`]: 与顺序无关的位模式哈希
//! - [`random`]: 可定位的确定性随机流
//!
//! # 设计原则
//!
//! 1. **密封 Trait**: RuntimeScalar 只有 f32/f64 实现
//! 2. **显式传输**: 主机与设备之间只通过 upload/download 交换数据
//! 3. **结构性可复现**: 哈希合并满足交换律与结合律，随机流可按位置切分

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod buffer;
pub mod hash;
pub mod random;
pub mod scalar;

/// 层级标识
pub const LAYER: u8 = 2;

// 重导出核心类型
pub use backend::{Backend, CpuBackend, MemoryLocation};
pub use buffer::DeviceBuffer;
pub use hash::{BitHash, HashType};
pub use random::RandomStream;
pub use scalar::RuntimeScalar;

/// Prelude 模块
pub mod prelude {
    //! 常用类型预导入
    pub use crate::{Backend, BitHash, CpuBackend, DeviceBuffer, HashType, RandomStream, RuntimeScalar};
}
