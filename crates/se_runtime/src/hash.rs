// crates/se_runtime/src/hash.rs

//! 可复现性哈希
//!
//! 对原始位模式做与顺序无关的累加，用于校验两次执行（不同线程数、
//! 不同后端、代码改动前后）是否得到逐位相同的数值状态。
//!
//! 合并规则：
//!
//! ```text
//! acc = acc.wrapping_add(v & !TOP_BIT)
//! acc ^= v & TOP_BIT
//! ```
//!
//! 低 63 位做模 2^64 加法，最高位做异或。两种运算都可交换、可结合，
//! 进位只会流入最高位，而最高位的异或不影响低位，所以任意拆分与
//! 合并顺序都得到同一结果。部分累加器之间用同一规则合并。

use crate::scalar::RuntimeScalar;

/// 哈希值类型
pub type HashType = u64;

const TOP_BIT: u64 = 1 << 63;

/// 位模式累加器
///
/// # 示例
///
/// ```rust
/// use se_runtime::hash::BitHash;
///
/// let forward = BitHash::hash_iter([1.0f64, -2.0, 3.5]);
/// let backward = BitHash::hash_iter([3.5f64, -2.0, 1.0]);
/// assert_eq!(forward, backward);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BitHash {
    acc: HashType,
}

impl BitHash {
    /// 单位元（空累加器）
    pub const fn new() -> Self {
        Self { acc: 0 }
    }

    /// 累加一个原始位模式
    #[inline]
    pub fn push_bits(&mut self, v: u64) {
        self.acc = self.acc.wrapping_add(v & !TOP_BIT);
        self.acc ^= v & TOP_BIT;
    }

    /// 累加一个标量的位模式
    #[inline]
    pub fn push<S: RuntimeScalar>(&mut self, value: S) {
        self.push_bits(value.hash_bits());
    }

    /// 累加整个切片
    #[inline]
    pub fn push_slice<S: RuntimeScalar>(&mut self, values: &[S]) {
        for &v in values {
            self.push(v);
        }
    }

    /// 合并两个部分累加器
    #[inline]
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.push_bits(other.acc);
        self
    }

    /// 当前哈希值
    #[inline]
    pub fn value(&self) -> HashType {
        self.acc
    }

    /// 从迭代器计算哈希
    pub fn hash_iter<S: RuntimeScalar, I: IntoIterator<Item = S>>(iter: I) -> HashType {
        let mut hash = Self::new();
        for v in iter {
            hash.push(v);
        }
        hash.value()
    }
}
