// crates/se_config/src/precision.rs

//! 运行时精度选择
//!
//! 测试框架在启动时决定示踪剂场用 f32 还是 f64，
//! 由 `Precision` 在应用层分发到 `CpuBackend<f32>` / `CpuBackend<f64>`。
//! 配置里的数值一律是 f64，这里负责判断它们能否落到所选精度上，
//! 以及主机质量缓冲区按所选精度要占多少字节。

use se_foundation::HostMassLayout;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 运行时精度枚举
///
/// # 示例
///
/// ```rust
/// use se_config::Precision;
///
/// let precision: Precision = "single".parse().unwrap();
/// assert_eq!(precision, Precision::F32);
/// assert_eq!(precision.host_buffer_bytes(1), Some(3328 * 4));
/// assert!(!precision.can_represent(1e300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 单精度浮点 (f32)
    F32,
    /// 双精度浮点 (f64)，与外部模式的实数类型一致
    #[default]
    F64,
}

impl Precision {
    /// 精度名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// 每个标量占用的字节数
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// 配置中的 f64 值能否作为有限值落到该精度
    pub fn can_represent(&self, value: f64) -> bool {
        match self {
            Self::F32 => value.is_finite() && value.abs() <= f64::from(f32::MAX),
            Self::F64 => value.is_finite(),
        }
    }

    /// `num_elems` 个单元的主机质量缓冲区字节数，溢出时返回 `None`
    pub fn host_buffer_bytes(&self, num_elems: usize) -> Option<usize> {
        num_elems
            .checked_mul(HostMassLayout::ELEM_LEN)?
            .checked_mul(self.size_bytes())
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 精度解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionParseError(String);

impl FromStr for Precision {
    type Err = PrecisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f32" | "float" | "single" | "float32" => Ok(Self::F32),
            "f64" | "double" | "float64" | "real" => Ok(Self::F64),
            _ => Err(PrecisionParseError(s.to_string())),
        }
    }
}

impl fmt::Display for PrecisionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "无效的精度值: '{}', 期望 'f32' 或 'f64'", self.0)
    }
}

impl std::error::Error for PrecisionParseError {}
