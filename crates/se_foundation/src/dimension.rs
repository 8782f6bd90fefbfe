//! 编译期维度系统
//!
//! 与外部（上游模式组件）共享的固定维度常量，主机缓冲区两侧必须完全一致。
//!
//! # 用法
//!
//! ```
//! use se_foundation::dimension::{TracerDims, MAX_TRACERS, PACKED_LEVELS, VERTICAL_LEVELS};
//!
//! let dims = TracerDims::new(6, 2);
//! assert_eq!(dims.workspace_slots(), 4);
//! assert_eq!(dims.tracer_capacity(), MAX_TRACERS);
//! assert!(PACKED_LEVELS >= VERTICAL_LEVELS);
//! ```
//!
//! # 设计说明
//!
//! - 物理层数 `VERTICAL_LEVELS` 在内部按 `VECTOR_SIZE` 打包，尾部补齐到 `PACKED_LEVELS`
//! - 补齐层不参与同步与哈希
//! - 维度不匹配无法在本层检测，由集成层保证

/// 质量场存储的时间层数
pub const TIME_LEVELS: usize = 2;

/// 外部格式的示踪剂容量
pub const MAX_TRACERS: usize = 4;

/// 每列物理垂直层数
pub const VERTICAL_LEVELS: usize = 26;

/// 单元每条边上的格点数（单元内部为 GRID_EDGE × GRID_EDGE）
pub const GRID_EDGE: usize = 4;

/// 单元内格点总数
pub const GRID_POINTS: usize = GRID_EDGE * GRID_EDGE;

/// 内部垂直维度的 SIMD 打包宽度
pub const VECTOR_SIZE: usize = 8;

/// 每列的打包数
pub const NUM_LEV: usize = packs_for(VERTICAL_LEVELS, VECTOR_SIZE);

/// 内部（补齐后的）垂直层数
pub const PACKED_LEVELS: usize = NUM_LEV * VECTOR_SIZE;

/// 工作区最少槽位数
///
/// 输运算法把工作区复用为固定 4 个量的单元间通信缓冲区。
pub const MIN_WORKSPACE_SLOTS: usize = 4;

/// 容纳 `levels` 层所需的打包数
#[inline]
pub const fn packs_for(levels: usize, vector_size: usize) -> usize {
    (levels + vector_size - 1) / vector_size
}

/// 工作区的示踪剂维度：`max(4, num_tracers)`
#[inline]
pub const fn workspace_slots(num_tracers: usize) -> usize {
    if num_tracers > MIN_WORKSPACE_SLOTS {
        num_tracers
    } else {
        MIN_WORKSPACE_SLOTS
    }
}

/// 质量场与限制器边界的示踪剂容量：`max(num_tracers, MAX_TRACERS)`
#[inline]
pub const fn tracer_capacity(num_tracers: usize) -> usize {
    if num_tracers > MAX_TRACERS {
        num_tracers
    } else {
        MAX_TRACERS
    }
}

/// 运行时维度（初始化后不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TracerDims {
    /// 单元数
    pub num_elems: usize,
    /// 活跃示踪剂数
    pub num_tracers: usize,
}

impl TracerDims {
    /// 创建运行时维度
    pub const fn new(num_elems: usize, num_tracers: usize) -> Self {
        Self { num_elems, num_tracers }
    }

    /// 工作区示踪剂维度
    #[inline]
    pub const fn workspace_slots(&self) -> usize {
        workspace_slots(self.num_tracers)
    }

    /// 质量场示踪剂容量
    #[inline]
    pub const fn tracer_capacity(&self) -> usize {
        tracer_capacity(self.num_tracers)
    }

    /// 活跃示踪剂数是否超出外部格式容量
    #[inline]
    pub const fn exceeds_external_capacity(&self) -> bool {
        self.num_tracers > MAX_TRACERS
    }
}
