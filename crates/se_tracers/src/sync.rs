// crates/se_tracers/src/sync.rs

//! 质量场的主机/设备布局同步
//!
//! 外部模式提供的主机缓冲区按固定顺序排列：
//!
//! ```text
//! [elem][TIME_LEVELS][MAX_TRACERS][VERTICAL_LEVELS][GRID_EDGE][GRID_EDGE]
//! ```
//!
//! 内部质量场把垂直层放在最内层并补齐到 `PACKED_LEVELS`：
//!
//! ```text
//! [elem][TIME_LEVELS][capacity][GRID_EDGE][GRID_EDGE][PACKED_LEVELS]
//! ```
//!
//! `pull_mass` / `push_mass` 是纯粹的重排索引，没有算术，所以往返逐位一致。
//! 跨内存空间的移动经由主机镜像：下载覆盖的单元区间，在镜像上重排，
//! 再上传并同步，调用返回时传输已经完成。
//! 补齐层以及 `MAX_TRACERS` 之后的示踪剂槽位不参与同步，保持原值。

use rayon::prelude::*;
use se_foundation::{
    DeviceMassLayout, HostMassLayout, GRID_EDGE, MAX_TRACERS, TIME_LEVELS, VERTICAL_LEVELS,
};
use se_runtime::{Backend, RuntimeScalar};
use tracing::debug;

use crate::error::{TracerError, TracerResult};
use crate::state::Tracers;

/// `num_elems` 个单元的主机缓冲区长度
pub fn host_mass_len(num_elems: usize) -> Option<usize> {
    num_elems.checked_mul(HostMassLayout::ELEM_LEN)
}

fn check_host_len(operation: &'static str, len: usize, num_elems: usize) -> TracerResult<()> {
    let expected = host_mass_len(num_elems).ok_or_else(|| {
        TracerError::invalid_argument(operation, format!("单元数 {} 超出可寻址范围", num_elems))
    })?;
    if len != expected {
        return Err(TracerError::ShapeMismatch {
            operation,
            dimension: "主机缓冲区长度",
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// 主机质量缓冲区只读视图
#[derive(Debug, Clone, Copy)]
pub struct HostMassView<'a, S> {
    data: &'a [S],
    num_elems: usize,
}

impl<'a, S: RuntimeScalar> HostMassView<'a, S> {
    /// 由连续切片与单元数构造，长度必须恰为 `num_elems * HostMassLayout::ELEM_LEN`
    pub fn new(data: &'a [S], num_elems: usize) -> TracerResult<Self> {
        check_host_len("HostMassView::new", data.len(), num_elems)?;
        Ok(Self { data, num_elems })
    }

    /// 单元数
    #[inline]
    pub fn num_elems(&self) -> usize {
        self.num_elems
    }

    /// 底层数据
    #[inline]
    pub fn as_slice(&self) -> &'a [S] {
        self.data
    }
}

/// 主机质量缓冲区可写视图
#[derive(Debug)]
pub struct HostMassViewMut<'a, S> {
    data: &'a mut [S],
    num_elems: usize,
}

impl<'a, S: RuntimeScalar> HostMassViewMut<'a, S> {
    /// 由连续切片与单元数构造，长度要求同 [`HostMassView::new`]
    pub fn new(data: &'a mut [S], num_elems: usize) -> TracerResult<Self> {
        check_host_len("HostMassViewMut::new", data.len(), num_elems)?;
        Ok(Self { data, num_elems })
    }

    /// 单元数
    #[inline]
    pub fn num_elems(&self) -> usize {
        self.num_elems
    }

    /// 底层数据
    #[inline]
    pub fn as_slice(&self) -> &[S] {
        self.data
    }

    /// 底层数据（可变）
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        self.data
    }
}

/// 对单元内每个同步的 (主机偏移, 设备偏移) 对调用 `f`
#[inline]
fn for_each_synced_entry(layout: &DeviceMassLayout, mut f: impl FnMut(usize, usize)) {
    for tl in 0..TIME_LEVELS {
        for q in 0..MAX_TRACERS {
            for lev in 0..VERTICAL_LEVELS {
                for i in 0..GRID_EDGE {
                    for j in 0..GRID_EDGE {
                        f(HostMassLayout::offset(tl, q, lev, i, j), layout.offset(tl, q, i, j, lev));
                    }
                }
            }
        }
    }
}

fn check_elem_extent(operation: &'static str, host: usize, container: usize) -> TracerResult<()> {
    if host > container {
        return Err(TracerError::ShapeMismatch {
            operation,
            dimension: "单元数",
            expected: container,
            actual: host,
        });
    }
    Ok(())
}

impl<B: Backend> Tracers<B> {
    /// 主机缓冲区 -> 内部质量场
    ///
    /// 只覆盖前 `host.num_elems()` 个单元。
    ///
    /// # 错误
    /// - 未初始化时返回 NotInitialized
    /// - 主机单元数超过容器单元数时返回 ShapeMismatch
    pub fn pull_mass(&mut self, host: &HostMassView<'_, B::Scalar>) -> TracerResult<()> {
        let backend = self.backend().clone();
        let fields = self.require_mut("pull_mass")?;
        check_elem_extent("pull_mass", host.num_elems(), fields.num_elems())?;

        let layout = fields.mass_layout();
        let elem_len = layout.elem_len();
        let ne = host.num_elems();
        let mass = fields.mass_mut();

        let mut mirror = vec![B::Scalar::ZERO; ne * elem_len];
        backend.download(mass.buffer(), 0, &mut mirror);

        if elem_len > 0 {
            mirror
                .par_chunks_mut(elem_len)
                .zip(host.as_slice().par_chunks(HostMassLayout::ELEM_LEN))
                .for_each(|(dev, src)| {
                    for_each_synced_entry(&layout, |h, d| dev[d] = src[h]);
                });
        }

        backend.upload(&mirror, mass.buffer_mut(), 0);
        backend.synchronize();

        debug!(backend = backend.name(), num_elems = ne, "质量场已从主机缓冲区载入");
        Ok(())
    }

    /// 内部质量场 -> 主机缓冲区
    ///
    /// 写满 `host` 的每一项。错误约定同 [`Tracers::pull_mass`]。
    pub fn push_mass(&self, host: &mut HostMassViewMut<'_, B::Scalar>) -> TracerResult<()> {
        let fields = self.require("push_mass")?;
        check_elem_extent("push_mass", host.num_elems(), fields.num_elems())?;

        let backend = self.backend();
        let layout = fields.mass_layout();
        let elem_len = layout.elem_len();
        let ne = host.num_elems();

        let mut mirror = vec![B::Scalar::ZERO; ne * elem_len];
        backend.download(fields.mass().buffer(), 0, &mut mirror);
        backend.synchronize();

        if elem_len > 0 {
            host.as_mut_slice()
                .par_chunks_mut(HostMassLayout::ELEM_LEN)
                .zip(mirror.par_chunks(elem_len))
                .for_each(|(dst, dev)| {
                    for_each_synced_entry(&layout, |h, d| dst[h] = dev[d]);
                });
        }

        debug!(backend = backend.name(), num_elems = ne, "质量场已导出到主机缓冲区");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CpuTracers;
    use se_foundation::PACKED_LEVELS;
    use se_runtime::CpuBackend;

    fn sequence(ne: usize) -> Vec<f64> {
        (0..host_mass_len(ne).unwrap()).map(|k| k as f64).collect()
    }

    #[test]
    fn test_host_view_length_checked() {
        let data = vec![0.0f64; HostMassLayout::ELEM_LEN * 2];
        assert!(HostMassView::new(&data, 2).is_ok());
        assert!(HostMassView::new(&data, 3).unwrap_err().is_shape_mismatch());
        assert!(HostMassView::new(&data[1..], 2).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_scenario_sequence_round_trip() {
        let ne = 3;
        let input = sequence(ne);
        let mut tracers = CpuTracers::new(CpuBackend::new(), ne, 3).unwrap();
        tracers.pull_mass(&HostMassView::new(&input, ne).unwrap()).unwrap();

        let mut output = vec![0.0; input.len()];
        tracers
            .push_mass(&mut HostMassViewMut::new(&mut output, ne).unwrap())
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_pull_permutes_levels_innermost() {
        let input = sequence(1);
        let mut tracers = CpuTracers::new(CpuBackend::new(), 1, 2).unwrap();
        tracers.pull_mass(&HostMassView::new(&input, 1).unwrap()).unwrap();

        let mass = tracers.fields().unwrap().mass();
        let (tl, q, lev, i, j) = (1, 3, 17, 2, 1);
        let expected = HostMassLayout::offset(tl, q, lev, i, j) as f64;
        assert_eq!(mass.get(&[0, tl, q, i, j, lev]), expected);
        // 补齐层保持零
        assert_eq!(mass.get(&[0, tl, q, i, j, PACKED_LEVELS - 1]), 0.0);
    }

    #[test]
    fn test_pull_partial_elements() {
        let mut tracers = CpuTracers::new(CpuBackend::new(), 4, 1).unwrap();
        tracers
            .fields_mut()
            .unwrap()
            .mass_mut()
            .as_mut_slice()
            .fill(-1.0);

        let input = sequence(2);
        tracers.pull_mass(&HostMassView::new(&input, 2).unwrap()).unwrap();

        let mass = tracers.fields().unwrap().mass();
        assert_eq!(mass.get(&[1, 0, 0, 0, 0, 0]), HostMassLayout::ELEM_LEN as f64);
        assert!(mass.element(2).iter().all(|&v| v == -1.0));
        assert!(mass.element(3).iter().all(|&v| v == -1.0));
    }

    #[test]
    fn test_extra_tracer_slots_untouched() {
        let mut tracers = CpuTracers::new(CpuBackend::new(), 1, 6).unwrap();
        tracers.fields_mut().unwrap().mass_mut().set(&[0, 0, 5, 1, 1, 3], 9.0);

        let input = sequence(1);
        tracers.pull_mass(&HostMassView::new(&input, 1).unwrap()).unwrap();
        assert_eq!(tracers.fields().unwrap().mass().get(&[0, 0, 5, 1, 1, 3]), 9.0);

        let mut output = vec![0.0; input.len()];
        tracers
            .push_mass(&mut HostMassViewMut::new(&mut output, 1).unwrap())
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_too_many_host_elements() {
        let input = sequence(3);
        let mut tracers = CpuTracers::new(CpuBackend::new(), 2, 1).unwrap();
        let err = tracers
            .pull_mass(&HostMassView::new(&input, 3).unwrap())
            .unwrap_err();
        assert!(err.is_shape_mismatch());

        let mut output = vec![0.0; input.len()];
        let err = tracers
            .push_mass(&mut HostMassViewMut::new(&mut output, 3).unwrap())
            .unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(output.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sync_before_init() {
        let input = sequence(1);
        let mut tracers = CpuTracers::default();
        assert!(tracers
            .pull_mass(&HostMassView::new(&input, 1).unwrap())
            .unwrap_err()
            .is_not_initialized());

        let mut output = vec![0.0; input.len()];
        assert!(tracers
            .push_mass(&mut HostMassViewMut::new(&mut output, 1).unwrap())
            .unwrap_err()
            .is_not_initialized());
    }

    #[test]
    fn test_round_trip_f32() {
        let input: Vec<f32> = (0..HostMassLayout::ELEM_LEN).map(|k| k as f32 * 0.5 - 3.0).collect();
        let mut tracers = crate::state::CpuTracersF32::new(CpuBackend::new(), 1, 0).unwrap();
        tracers.pull_mass(&HostMassView::new(&input, 1).unwrap()).unwrap();

        let mut output = vec![0.0f32; input.len()];
        tracers
            .push_mass(&mut HostMassViewMut::new(&mut output, 1).unwrap())
            .unwrap();
        assert_eq!(output, input);
    }
}
