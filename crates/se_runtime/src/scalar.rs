// crates/se_runtime/src/scalar.rs

//! RuntimeScalar - 密封的标量类型抽象
//!
//! 示踪剂场在 f32 与 f64 之间零成本切换的唯一接口。
//!
//! # 设计原则
//!
//! 1. **密封 Trait**: 只有 f32 和 f64 可以实现（通过 private::Sealed）
//! 2. **按位哈希**: `hash_bits` 返回原始位模式，而不是数值解释
//! 3. **随机流定位**: `RNG_WORDS_PER_SAMPLE` 给出每次均匀采样消耗的 32 位字数
//!
//! # 使用规范
//!
//! ```rust
//! use se_runtime::RuntimeScalar;
//!
//! fn mirror<S: RuntimeScalar>(x: S) -> S {
//!     -x
//! }
//! assert_eq!(mirror(1.5f64), -1.5);
//! assert_eq!((-0.0f64).hash_bits(), 1u64 << 63);
//! ```

use std::fmt::{Debug, Display};

use bytemuck::Pod;
use num_traits::{Float, FromPrimitive};
use rand::distributions::uniform::SampleUniform;

/// 密封模块，禁止外部实现
mod private {
    /// 密封 trait
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// 运行时标量类型（密封，仅 f32/f64 可实现）
///
/// # 实现类型
///
/// - `f32`: 单精度，内存占用减半
/// - `f64`: 双精度（默认），与外部模式的 `Real` 一致
pub trait RuntimeScalar:
    private::Sealed
    + Pod
    + Float
    + FromPrimitive
    + SampleUniform
    + Copy
    + Clone
    + Debug
    + Display
    + Send
    + Sync
    + Default
    + 'static
{
    /// 零值
    const ZERO: Self;
    /// 一
    const ONE: Self;
    /// 类型名（日志用）
    const TYPE_NAME: &'static str;
    /// 一次均匀采样消耗的随机字（32 位）数
    const RNG_WORDS_PER_SAMPLE: u128;

    /// 原始位模式（f32 零扩展到 64 位）
    fn hash_bits(self) -> u64;

    /// 从配置 f64 转换，非有限值返回 None
    #[inline]
    fn from_config(v: f64) -> Option<Self> {
        if v.is_finite() {
            Self::from_f64(v).filter(|x| x.is_finite())
        } else {
            None
        }
    }
}

// =============================================================================
// f32 实现
// =============================================================================

impl RuntimeScalar for f32 {
    const ZERO: f32 = 0.0;
    const ONE: f32 = 1.0;
    const TYPE_NAME: &'static str = "f32";
    const RNG_WORDS_PER_SAMPLE: u128 = 1;

    #[inline]
    fn hash_bits(self) -> u64 {
        u64::from(self.to_bits())
    }
}

// =============================================================================
// f64 实现
// =============================================================================

impl RuntimeScalar for f64 {
    const ZERO: f64 = 0.0;
    const ONE: f64 = 1.0;
    const TYPE_NAME: &'static str = "f64";
    const RNG_WORDS_PER_SAMPLE: u128 = 2;

    #[inline]
    fn hash_bits(self) -> u64 {
        self.to_bits()
    }
}
