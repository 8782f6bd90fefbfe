// crates/se_tracers/src/lib.rs

//! SEDyn Tracers Layer (Layer 3)
//!
//! 谱元大气动力核心的示踪剂状态容器。
//!
//! # 层级结构
//!
//! ```text
//! Layer 1: se_foundation  (维度常量、布局)
//!     ↓
//! Layer 2: se_runtime     (后端、标量、哈希、随机流)
//!     ↓
//! Layer 3: se_tracers     ← 本 crate
//!     ↓
//! Layer 4: se_config
//!     ↓
//! Layer 5: se_cli
//! ```
//!
//! # 模块概览
//!
//! - [`state`]: `Tracers` 容器与五个场的分配
//! - [`field`]: 单元主序稠密场
//! - [`sync`]: 质量场主机/设备布局同步
//! - [`randomize`]: 确定性随机填充
//! - [`hash`]: 可复现性哈希
//! - [`error`]: 错误类型
//!
//! # 使用示例
//!
//! ```
//! use se_runtime::CpuBackend;
//! use se_tracers::CpuTracers;
//!
//! let mut tracers = CpuTracers::new(CpuBackend::new(), 4, 3).unwrap();
//! tracers.randomize(42, -1.0, 1.0).unwrap();
//! let h = tracers.hash(0).unwrap();
//! assert_eq!(tracers.hash_with_workers(0, 3).unwrap(), h);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod field;
pub mod hash;
pub mod randomize;
pub mod state;
pub mod sync;

/// 层级标识
pub const LAYER: u8 = 3;

pub use error::{TracerError, TracerResult};
pub use field::ElementField;
pub use state::{CpuTracers, CpuTracersF32, TracerFields, Tracers, BOUNDS_PAIR};
pub use sync::{host_mass_len, HostMassView, HostMassViewMut};

/// Prelude 模块
pub mod prelude {
    //! 常用类型预导入
    pub use crate::{CpuTracers, HostMassView, HostMassViewMut, TracerError, TracerResult, Tracers};
}
