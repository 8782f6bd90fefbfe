// crates/se_config/src/lib.rs

//! SEDyn Config Layer (Layer 4)
//!
//! 配置层，提供精度选择与测试框架配置。
//! 本层不含泛型，用 `Precision` 枚举在应用层做运行时精度分发。
//!
//! # 模块概览
//!
//! - [`precision`]: Precision 枚举（F32/F64）
//! - [`harness_config`]: HarnessConfig 测试框架配置（全 f64）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: se_cli        ─> uses HarnessConfig, Precision
//! Layer 4: se_config     ─> Precision, HarnessConfig (本层)
//! Layer 3: se_tracers    ─> Tracers<B>
//! Layer 2: se_runtime    ─> Backend, RuntimeScalar
//! Layer 1: se_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod harness_config;
pub mod precision;

/// 层级标识
pub const LAYER: u8 = 4;

// 重导出核心类型
pub use error::ConfigError;
pub use harness_config::{HarnessConfig, LayoutConfig, RandomizeConfig, VerifyConfig};
pub use precision::{Precision, PrecisionParseError};
