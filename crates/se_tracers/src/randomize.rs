// crates/se_tracers/src/randomize.rs

//! 确定性随机填充
//!
//! 一个种子生成一条随机序列，依次填满 mass、workspace、bounds、
//! tendency、concentration，每个场内部按存储顺序（含补齐层）消费。
//! 并行时每个单元从它在顺序遍历中的序号处开始取数，
//! 所以结果与线程数无关，和单线程顺序填充逐位相同。

use se_runtime::{Backend, RandomStream};
use tracing::debug;

use crate::error::{TracerError, TracerResult};
use crate::state::Tracers;

impl<B: Backend> Tracers<B> {
    /// 用 `[min, max]` 上的均匀随机数覆盖全部五个场
    ///
    /// # 错误
    /// - 未初始化时返回 NotInitialized
    /// - `min > max` 或边界非有限时返回 InvalidArgument
    ///
    /// 任意有限的 `min <= max` 都可接受，包括 `[-MAX, MAX]`。
    pub fn randomize(&mut self, seed: u64, min: B::Scalar, max: B::Scalar) -> TracerResult<()> {
        let fields = self.require_mut("randomize")?;
        let stream = RandomStream::new(seed, min, max).ok_or_else(|| {
            TracerError::invalid_argument("randomize", format!("无效的取值区间 [{}, {}]", min, max))
        })?;

        let mut position: u64 = 0;
        for field in fields.fill_order_mut() {
            let base = position;
            let elem_len = field.elem_len() as u64;
            field.par_for_each_element_mut(|ie, chunk| {
                stream.fill_at(base + ie as u64 * elem_len, chunk);
            });
            position += field.len() as u64;
        }

        debug!(seed, %min, %max, samples = position, "示踪剂场已随机填充");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CpuTracers, CpuTracersF32, TracerFields};
    use se_runtime::{CpuBackend, RuntimeScalar};

    fn snapshot<B: Backend>(fields: &TracerFields<B>) -> Vec<Vec<B::Scalar>> {
        [fields.mass(), fields.workspace(), fields.bounds(), fields.tendency(), fields.concentration()]
            .iter()
            .map(|f| f.as_slice().to_vec())
            .collect()
    }

    #[test]
    fn test_scenario_two_fills_identical() {
        let mut a = CpuTracers::new(CpuBackend::new(), 3, 2).unwrap();
        let mut b = CpuTracers::new(CpuBackend::new(), 3, 2).unwrap();
        a.randomize(42, -1.0, 1.0).unwrap();
        b.randomize(42, -1.0, 1.0).unwrap();

        let sa = snapshot(a.fields().unwrap());
        let sb = snapshot(b.fields().unwrap());
        for (x, y) in sa.iter().zip(&sb) {
            let xb: Vec<u64> = x.iter().map(|v| v.to_bits()).collect();
            let yb: Vec<u64> = y.iter().map(|v| v.to_bits()).collect();
            assert_eq!(xb, yb);
        }
    }

    /// 单线程从位置 0 顺序取出的整条序列
    fn sequential<S: RuntimeScalar>(seed: u64, min: S, max: S, n: usize) -> Vec<S> {
        let mut out = vec![S::ZERO; n];
        RandomStream::new(seed, min, max).unwrap().fill_at(0, &mut out);
        out
    }

    #[test]
    fn test_matches_sequential_stream() {
        let mut tracers = CpuTracers::new(CpuBackend::new(), 4, 5).unwrap();
        tracers.randomize(9, -2.0, 3.0).unwrap();

        let all: Vec<f64> = snapshot(tracers.fields().unwrap()).concat();
        assert_eq!(all, sequential(9, -2.0, 3.0, all.len()));
    }

    #[test]
    fn test_f32_matches_sequential_stream() {
        let mut tracers = CpuTracersF32::new(CpuBackend::new(), 2, 1).unwrap();
        tracers.randomize(5, 0.0, 1.0).unwrap();

        let all: Vec<f32> = snapshot(tracers.fields().unwrap()).concat();
        assert_eq!(all, sequential(5, 0.0f32, 1.0, all.len()));
    }

    #[test]
    fn test_extreme_finite_bounds() {
        let mut tracers = CpuTracers::new(CpuBackend::new(), 1, 1).unwrap();
        for (min, max) in [(-f64::MAX / 2.0, f64::MAX / 2.0), (-f64::MAX, f64::MAX)] {
            tracers.randomize(1, min, max).unwrap();
            for values in snapshot(tracers.fields().unwrap()) {
                assert!(values.iter().all(|&v| v.is_finite() && (min..=max).contains(&v)));
            }
        }

        let mut single = CpuTracersF32::new(CpuBackend::new(), 1, 1).unwrap();
        for (min, max) in [(-f32::MAX / 2.0, f32::MAX / 2.0), (-f32::MAX, f32::MAX)] {
            single.randomize(1, min, max).unwrap();
            for values in snapshot(single.fields().unwrap()) {
                assert!(values.iter().all(|&v| v.is_finite() && (min..=max).contains(&v)));
            }
        }
    }

    #[test]
    fn test_overwrites_everything_in_range() {
        let mut tracers = CpuTracers::new(CpuBackend::new(), 2, 3).unwrap();
        {
            let fields = tracers.fields_mut().unwrap();
            fields.mass_mut().as_mut_slice().fill(100.0);
            fields.bounds_mut().as_mut_slice().fill(-100.0);
        }
        tracers.randomize(1, 0.5, 0.75).unwrap();
        for values in snapshot(tracers.fields().unwrap()) {
            assert!(values.iter().all(|&v| (0.5..=0.75).contains(&v)));
        }
    }

    #[test]
    fn test_seed_changes_contents() {
        let mut a = CpuTracers::new(CpuBackend::new(), 1, 1).unwrap();
        let mut b = CpuTracers::new(CpuBackend::new(), 1, 1).unwrap();
        a.randomize(1, 0.0, 1.0).unwrap();
        b.randomize(2, 0.0, 1.0).unwrap();
        assert_ne!(snapshot(a.fields().unwrap()), snapshot(b.fields().unwrap()));
    }

    #[test]
    fn test_zero_tracers() {
        let mut tracers = CpuTracers::new(CpuBackend::new(), 5, 0).unwrap();
        tracers.randomize(42, -1.0, 1.0).unwrap();
        assert!(tracers.fields().unwrap().workspace().as_slice().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_fill_before_init() {
        let mut tracers = CpuTracers::default();
        let err = tracers.randomize(42, -1.0, 1.0).unwrap_err();
        assert!(err.is_not_initialized());
    }

    #[test]
    fn test_invalid_bounds_leave_state() {
        let mut tracers = CpuTracers::new(CpuBackend::new(), 1, 1).unwrap();
        tracers.randomize(3, 0.0, 1.0).unwrap();
        let before = snapshot(tracers.fields().unwrap());

        assert!(tracers.randomize(3, 1.0, 0.0).unwrap_err().is_invalid_argument());
        assert!(tracers.randomize(3, f64::NAN, 0.0).unwrap_err().is_invalid_argument());
        assert_eq!(snapshot(tracers.fields().unwrap()), before);
    }
}
