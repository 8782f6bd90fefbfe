// crates/se_foundation/src/lib.rs

//! SEDyn Foundation Layer (Layer 1)
//!
//! 零依赖基础层，提供与外部模式共享的维度常量和数组布局。
//!
//! # 模块概览
//!
//! - [`dimension`]: 编译期维度常量与运行时维度
//! - [`layout`]: 主机/设备两侧的质量场布局与行主序偏移
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: se_cli        ─> 可复现性测试工具
//! Layer 4: se_config     ─> Precision, HarnessConfig
//! Layer 3: se_tracers    ─> Tracers<B: Backend>
//! Layer 2: se_runtime    ─> Backend, RuntimeScalar, DeviceBuffer, BitHash
//! Layer 1: se_foundation ─> 维度常量, 布局 (本层)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dimension;
pub mod layout;

/// 层级标识
pub const LAYER: u8 = 1;

// 重导出常用类型
pub use dimension::{
    TracerDims, GRID_EDGE, GRID_POINTS, MAX_TRACERS, MIN_WORKSPACE_SLOTS, NUM_LEV, PACKED_LEVELS,
    TIME_LEVELS, VECTOR_SIZE, VERTICAL_LEVELS,
};
pub use layout::{DeviceMassLayout, HostMassLayout, RowMajor};
