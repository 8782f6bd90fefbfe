// crates/se_runtime/src/random.rs

//! 可定位的确定性随机流
//!
//! 一个种子对应一条 ChaCha20 序列。序列中第 `n` 个样本的位置可以直接算出，
//! 因此多个工作线程可以各自从自己的起点开始填充不相交的区间，
//! 结果与单线程顺序填充逐位一致。

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::scalar::RuntimeScalar;

/// 均匀分布随机流
#[derive(Debug, Clone)]
pub struct RandomStream<S: RuntimeScalar> {
    base: ChaCha20Rng,
    low: S,
    high: S,
}

impl<S: RuntimeScalar> RandomStream<S> {
    /// 创建 `[low, high]` 上的均匀随机流
    ///
    /// 边界非有限或 `low > high` 时返回 `None`。
    /// 宽度超出 `S::MAX` 的区间（如 `[-MAX, MAX]`）同样可用。
    pub fn new(seed: u64, low: S, high: S) -> Option<Self> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return None;
        }
        Some(Self {
            base: ChaCha20Rng::seed_from_u64(seed),
            low,
            high,
        })
    }

    /// 从序列第 `position` 个样本开始填满 `out`
    pub fn fill_at(&self, position: u64, out: &mut [S]) {
        let mut rng = self.base.clone();
        rng.set_word_pos(u128::from(position) * S::RNG_WORDS_PER_SAMPLE);
        let unit: Uniform<S> = Uniform::new_inclusive(S::ZERO, S::ONE);
        for v in out.iter_mut() {
            *v = interpolate(self.low, self.high, unit.sample(&mut rng));
        }
    }
}

/// 把 `[0, 1]` 上的 `u` 映射到 `[low, high]`
///
/// 两端分别加权，不计算 `high - low`，舍入越界的结果截回区间。
#[inline]
fn interpolate<S: RuntimeScalar>(low: S, high: S, u: S) -> S {
    (low * (S::ONE - u) + high * u).max(low).min(high)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential<S: RuntimeScalar>(seed: u64, low: S, high: S, n: usize) -> Vec<S> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let unit: Uniform<S> = Uniform::new_inclusive(S::ZERO, S::ONE);
        (0..n).map(|_| interpolate(low, high, unit.sample(&mut rng))).collect()
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(RandomStream::new(1, 1.0f64, -1.0).is_none());
        assert!(RandomStream::new(1, f64::NEG_INFINITY, 0.0).is_none());
        assert!(RandomStream::new(1, 0.0f32, f32::NAN).is_none());
        assert!(RandomStream::new(1, 2.0f64, 2.0).is_some());
    }

    fn assert_wide_range<S: RuntimeScalar>(low: S, high: S) {
        let stream = RandomStream::new(11, low, high).unwrap();
        let mut out = vec![S::ZERO; 257];
        stream.fill_at(3, &mut out);
        assert!(out.iter().all(|&v| v.is_finite() && low <= v && v <= high));
        // 不应全部落在同一点
        assert!(out.iter().any(|&v| v != out[0]));
    }

    #[test]
    fn test_wide_range_f64() {
        assert_wide_range(-f64::MAX / 2.0, f64::MAX / 2.0);
        assert_wide_range(-f64::MAX, f64::MAX);
        assert_wide_range(0.0, f64::MAX);
    }

    #[test]
    fn test_wide_range_f32() {
        assert_wide_range(-f32::MAX / 2.0, f32::MAX / 2.0);
        assert_wide_range(-f32::MAX, f32::MAX);
        assert_wide_range(-f32::MAX, 0.0);
    }

    #[test]
    fn test_interpolate_endpoints() {
        assert_eq!(interpolate(-3.0f64, 5.0, 0.0), -3.0);
        assert_eq!(interpolate(-3.0f64, 5.0, 1.0), 5.0);
        assert_eq!(interpolate(-f32::MAX, f32::MAX, 1.0), f32::MAX);
        assert_eq!(interpolate(0.1f64, 0.1, 0.3), 0.1);
    }

    #[test]
    fn test_values_in_range() {
        let stream = RandomStream::new(42, -1.0f64, 1.0).unwrap();
        let mut out = vec![0.0; 500];
        stream.fill_at(0, &mut out);
        assert!(out.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_positioned_matches_sequential_f64() {
        let expected = sequential(42, -1.0f64, 1.0, 300);
        let stream = RandomStream::new(42, -1.0f64, 1.0).unwrap();

        // 切成奇数长度的片段，覆盖块边界之外的起点
        let mut out = vec![0.0; 300];
        let mut pos = 0usize;
        for len in [1usize, 7, 31, 33, 64, 100, 64] {
            stream.fill_at(pos as u64, &mut out[pos..pos + len]);
            pos += len;
        }
        assert_eq!(pos, 300);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_positioned_matches_sequential_f32() {
        let expected = sequential(7, 0.0f32, 10.0, 129);
        let stream = RandomStream::new(7, 0.0f32, 10.0).unwrap();

        let mut out = vec![0.0f32; 129];
        stream.fill_at(0, &mut out[..17]);
        stream.fill_at(17, &mut out[17..]);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_seed_changes_stream() {
        let a = RandomStream::new(1, 0.0f64, 1.0).unwrap();
        let b = RandomStream::new(2, 0.0f64, 1.0).unwrap();
        let mut va = vec![0.0; 16];
        let mut vb = vec![0.0; 16];
        a.fill_at(0, &mut va);
        b.fill_at(0, &mut vb);
        assert_ne!(va, vb);
    }

    #[test]
    fn test_degenerate_range() {
        let stream = RandomStream::new(3, 0.25f64, 0.25).unwrap();
        let mut out = vec![0.0; 8];
        stream.fill_at(5, &mut out);
        assert!(out.iter().all(|&v| v == 0.25));
    }
}
