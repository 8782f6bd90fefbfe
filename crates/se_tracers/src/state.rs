// crates/se_tracers/src/state.rs

//! 示踪剂状态容器
//!
//! `Tracers` 独占五个单元主序场的存储：
//!
//! | 场 | 内部布局 |
//! |---|---|
//! | mass | `[elem][TIME_LEVELS][capacity][GRID_EDGE][GRID_EDGE][PACKED_LEVELS]` |
//! | workspace | `[elem][max(4, nt)][GRID_EDGE][GRID_EDGE][PACKED_LEVELS]` |
//! | bounds | `[elem][capacity][2][PACKED_LEVELS]` |
//! | concentration | `[elem][nt][GRID_EDGE][GRID_EDGE][PACKED_LEVELS]` |
//! | tendency | `[elem][nt][GRID_EDGE][GRID_EDGE][PACKED_LEVELS]` |
//!
//! 其中 `capacity = max(nt, MAX_TRACERS)`。工作区同时被输运算法当作
//! 固定 4 个量的通信缓冲区使用，所以示踪剂数少于 4 时仍保留 4 个槽位。
//!
//! # 生命周期
//!
//! ```text
//! uninit ──init──> 已初始化 ──init / pull / push / randomize / hash──> 已初始化
//! ```
//!
//! 重新 `init` 时先完整构建新的场集合，成功后才替换旧集合；
//! 失败时旧状态保持不变。

use se_foundation::{
    DeviceMassLayout, TracerDims, GRID_EDGE, MAX_TRACERS, PACKED_LEVELS, TIME_LEVELS,
};
use se_runtime::{Backend, CpuBackend};
use tracing::{debug, warn};

use crate::error::{TracerError, TracerResult};
use crate::field::ElementField;

/// 限制器边界每层的量数（最小值、最大值）
pub const BOUNDS_PAIR: usize = 2;

// ============================================================
// 场集合
// ============================================================

/// 已初始化容器持有的五个场
#[derive(Debug)]
pub struct TracerFields<B: Backend> {
    dims: TracerDims,
    mass: ElementField<B>,
    workspace: ElementField<B>,
    bounds: ElementField<B>,
    concentration: ElementField<B>,
    tendency: ElementField<B>,
}

impl<B: Backend> TracerFields<B> {
    fn allocate(backend: &B, dims: TracerDims) -> TracerResult<Self> {
        let ne = dims.num_elems;
        let nt = dims.num_tracers;
        let capacity = dims.tracer_capacity();

        Ok(Self {
            dims,
            mass: ElementField::alloc(
                backend,
                "tracers mass",
                &[ne, TIME_LEVELS, capacity, GRID_EDGE, GRID_EDGE, PACKED_LEVELS],
            )?,
            workspace: ElementField::alloc(
                backend,
                "qtens(_biharmonic)",
                &[ne, dims.workspace_slots(), GRID_EDGE, GRID_EDGE, PACKED_LEVELS],
            )?,
            bounds: ElementField::alloc(backend, "qlim", &[ne, capacity, BOUNDS_PAIR, PACKED_LEVELS])?,
            concentration: ElementField::alloc(
                backend,
                "tracers concentration",
                &[ne, nt, GRID_EDGE, GRID_EDGE, PACKED_LEVELS],
            )?,
            tendency: ElementField::alloc(backend, "fq", &[ne, nt, GRID_EDGE, GRID_EDGE, PACKED_LEVELS])?,
        })
    }

    /// 运行时维度
    #[inline]
    pub fn dims(&self) -> TracerDims {
        self.dims
    }

    /// 单元数
    #[inline]
    pub fn num_elems(&self) -> usize {
        self.dims.num_elems
    }

    /// 活跃示踪剂数
    #[inline]
    pub fn num_tracers(&self) -> usize {
        self.dims.num_tracers
    }

    /// 质量场/边界的示踪剂容量
    #[inline]
    pub fn tracer_capacity(&self) -> usize {
        self.dims.tracer_capacity()
    }

    /// 工作区槽位数
    #[inline]
    pub fn workspace_slots(&self) -> usize {
        self.dims.workspace_slots()
    }

    /// 质量场的设备布局
    #[inline]
    pub fn mass_layout(&self) -> DeviceMassLayout {
        DeviceMassLayout::new(self.tracer_capacity())
    }

    /// 质量场
    pub fn mass(&self) -> &ElementField<B> {
        &self.mass
    }

    /// 质量场（可变）
    pub fn mass_mut(&mut self) -> &mut ElementField<B> {
        &mut self.mass
    }

    /// 双调和/限制器工作区
    pub fn workspace(&self) -> &ElementField<B> {
        &self.workspace
    }

    /// 双调和/限制器工作区（可变）
    pub fn workspace_mut(&mut self) -> &mut ElementField<B> {
        &mut self.workspace
    }

    /// 限制器边界
    pub fn bounds(&self) -> &ElementField<B> {
        &self.bounds
    }

    /// 限制器边界（可变）
    pub fn bounds_mut(&mut self) -> &mut ElementField<B> {
        &mut self.bounds
    }

    /// 浓度场
    pub fn concentration(&self) -> &ElementField<B> {
        &self.concentration
    }

    /// 浓度场（可变）
    pub fn concentration_mut(&mut self) -> &mut ElementField<B> {
        &mut self.concentration
    }

    /// 浓度倾向
    pub fn tendency(&self) -> &ElementField<B> {
        &self.tendency
    }

    /// 浓度倾向（可变）
    pub fn tendency_mut(&mut self) -> &mut ElementField<B> {
        &mut self.tendency
    }

    /// 随机填充的固定访问顺序
    pub(crate) fn fill_order_mut(&mut self) -> [&mut ElementField<B>; 5] {
        [
            &mut self.mass,
            &mut self.workspace,
            &mut self.bounds,
            &mut self.tendency,
            &mut self.concentration,
        ]
    }

    /// 五个场占用的总字节数
    pub fn memory_bytes(&self) -> usize {
        [&self.mass, &self.workspace, &self.bounds, &self.concentration, &self.tendency]
            .iter()
            .map(|f| f.memory_bytes())
            .sum()
    }
}

// ============================================================
// 容器
// ============================================================

/// 示踪剂状态容器
///
/// # 示例
///
/// ```
/// use se_runtime::CpuBackend;
/// use se_tracers::CpuTracers;
///
/// let mut tracers = CpuTracers::uninit(CpuBackend::new());
/// assert!(!tracers.is_initialized());
///
/// tracers.init(2, 3).unwrap();
/// let fields = tracers.fields().unwrap();
/// assert_eq!(fields.workspace().extent(1), 4);
/// ```
#[derive(Debug)]
pub struct Tracers<B: Backend = CpuBackend<f64>> {
    backend: B,
    fields: Option<TracerFields<B>>,
}

/// CPU 双精度容器
pub type CpuTracers = Tracers<CpuBackend<f64>>;

/// CPU 单精度容器
pub type CpuTracersF32 = Tracers<CpuBackend<f32>>;

impl<B: Backend> Tracers<B> {
    /// 创建未初始化的容器
    pub fn uninit(backend: B) -> Self {
        Self { backend, fields: None }
    }

    /// 创建并立即初始化
    pub fn new(backend: B, num_elems: usize, num_tracers: usize) -> TracerResult<Self> {
        let mut tracers = Self::uninit(backend);
        tracers.init(num_elems, num_tracers)?;
        Ok(tracers)
    }

    /// 分配全部五个场
    ///
    /// 再次调用会整体替换旧存储。
    ///
    /// # 错误
    /// - `num_elems == 0` 或尺寸超出可寻址范围时返回 InvalidArgument，旧状态不变
    pub fn init(&mut self, num_elems: usize, num_tracers: usize) -> TracerResult<()> {
        if num_elems == 0 {
            return Err(TracerError::invalid_argument("init", "单元数必须为正"));
        }

        let dims = TracerDims::new(num_elems, num_tracers);
        if dims.exceeds_external_capacity() {
            warn!(
                num_tracers,
                max_tracers = MAX_TRACERS,
                "示踪剂数超出外部格式容量，质量同步只覆盖前 {} 个",
                MAX_TRACERS
            );
        }

        let fields = TracerFields::allocate(&self.backend, dims)?;
        debug!(
            backend = self.backend.name(),
            num_elems,
            num_tracers,
            workspace_slots = fields.workspace_slots(),
            bytes = fields.memory_bytes(),
            reinit = self.fields.is_some(),
            "示踪剂容器初始化"
        );
        self.fields = Some(fields);
        Ok(())
    }

    /// 计算后端
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 是否已初始化
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.fields.is_some()
    }

    /// 运行时维度（未初始化时为 None）
    #[inline]
    pub fn dims(&self) -> Option<TracerDims> {
        self.fields.as_ref().map(TracerFields::dims)
    }

    /// 场集合
    pub fn fields(&self) -> TracerResult<&TracerFields<B>> {
        self.require("fields")
    }

    /// 场集合（可变），供外部输运算法原地修改
    pub fn fields_mut(&mut self) -> TracerResult<&mut TracerFields<B>> {
        self.require_mut("fields_mut")
    }

    pub(crate) fn require(&self, operation: &'static str) -> TracerResult<&TracerFields<B>> {
        self.fields
            .as_ref()
            .ok_or_else(|| TracerError::not_initialized(operation))
    }

    pub(crate) fn require_mut(&mut self, operation: &'static str) -> TracerResult<&mut TracerFields<B>> {
        self.fields
            .as_mut()
            .ok_or_else(|| TracerError::not_initialized(operation))
    }
}

impl<B: Backend + Default> Default for Tracers<B> {
    fn default() -> Self {
        Self::uninit(B::default())
    }
}
