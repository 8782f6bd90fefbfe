//! 数组布局
//!
//! 描述质量场在两侧的维度顺序，并提供行主序偏移计算：
//!
//! ```text
//! 主机（外部固定格式）: [elem][tl][MAX_TRACERS][VERTICAL_LEVELS][GRID_EDGE][GRID_EDGE]
//! 设备（内部性能格式）: [elem][tl][capacity][GRID_EDGE][GRID_EDGE][PACKED_LEVELS]
//! ```
//!
//! 两种布局之间的转换是纯重排，不涉及任何算术。

use crate::dimension::{GRID_EDGE, GRID_POINTS, MAX_TRACERS, PACKED_LEVELS, TIME_LEVELS, VERTICAL_LEVELS};

/// 行主序（最外层到最内层）布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMajor {
    extents: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl RowMajor {
    /// 从各维长度创建布局
    ///
    /// 总长度溢出 `usize` 时返回 `None`。
    pub fn new(extents: &[usize]) -> Option<Self> {
        let mut strides = vec![0; extents.len()];
        let mut len = 1usize;
        for (dim, &extent) in extents.iter().enumerate().rev() {
            strides[dim] = len;
            len = len.checked_mul(extent)?;
        }
        Some(Self {
            extents: extents.to_vec(),
            strides,
            len,
        })
    }

    /// 各维长度
    #[inline]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// 各维步长
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// 维数
    #[inline]
    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    /// 元素总数
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 多维索引 -> 扁平偏移
    ///
    /// 越界只在 debug 模式下检查，越界访问由底层切片拦截。
    #[inline]
    pub fn offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.extents.len(), "索引维数不匹配");
        index
            .iter()
            .zip(self.extents.iter())
            .zip(self.strides.iter())
            .map(|((&i, &n), &s)| {
                debug_assert!(i < n, "索引 {} 超出维长 {}", i, n);
                i * s
            })
            .sum()
    }
}

/// 主机端质量场布局（外部固定格式）
#[derive(Debug, Clone, Copy, Default)]
pub struct HostMassLayout;

impl HostMassLayout {
    /// 单个单元的值个数
    pub const ELEM_LEN: usize = TIME_LEVELS * MAX_TRACERS * VERTICAL_LEVELS * GRID_POINTS;

    /// 单元内偏移：(tl, q, lev, i, j)
    #[inline]
    pub const fn offset(tl: usize, q: usize, lev: usize, i: usize, j: usize) -> usize {
        (((tl * MAX_TRACERS + q) * VERTICAL_LEVELS + lev) * GRID_EDGE + i) * GRID_EDGE + j
    }
}

/// 设备端质量场布局（内部格式，垂直层最内且补齐）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceMassLayout {
    tracer_capacity: usize,
}

impl DeviceMassLayout {
    /// 按示踪剂容量创建
    pub const fn new(tracer_capacity: usize) -> Self {
        Self { tracer_capacity }
    }

    /// 示踪剂容量
    #[inline]
    pub const fn tracer_capacity(&self) -> usize {
        self.tracer_capacity
    }

    /// 单个单元的值个数
    #[inline]
    pub const fn elem_len(&self) -> usize {
        TIME_LEVELS * self.tracer_capacity * GRID_POINTS * PACKED_LEVELS
    }

    /// 单元内偏移：(tl, q, i, j, lev)
    #[inline]
    pub const fn offset(&self, tl: usize, q: usize, i: usize, j: usize, lev: usize) -> usize {
        (((tl * self.tracer_capacity + q) * GRID_EDGE + i) * GRID_EDGE + j) * PACKED_LEVELS + lev
    }

    /// 某时间层在单元内的起止偏移
    #[inline]
    pub const fn time_level_range(&self, tl: usize) -> (usize, usize) {
        let per_level = self.tracer_capacity * GRID_POINTS * PACKED_LEVELS;
        (tl * per_level, (tl + 1) * per_level)
    }
}
