// crates/se_tracers/src/error.rs

//! 示踪剂容器错误类型
//!
//! 所有错误都在操作边界处检测，检测发生在任何写入之前，
//! 因此失败的调用不会留下部分修改的状态。

use thiserror::Error;

/// 示踪剂容器错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TracerError {
    /// 调用参数违反前置条件
    #[error("无效参数 '{operation}': {reason}")]
    InvalidArgument {
        /// 操作名
        operation: &'static str,
        /// 原因
        reason: String,
    },

    /// 容器尚未初始化
    #[error("'{operation}' 调用时示踪剂容器尚未初始化")]
    NotInitialized {
        /// 操作名
        operation: &'static str,
    },

    /// 主机缓冲区形状与容器不兼容
    #[error("形状不匹配 '{operation}': {dimension} 允许 {expected}, 实际 {actual}")]
    ShapeMismatch {
        /// 操作名
        operation: &'static str,
        /// 出错的维度
        dimension: &'static str,
        /// 允许值（精确值或上限）
        expected: usize,
        /// 实际值
        actual: usize,
    },
}

impl TracerError {
    /// 构造 InvalidArgument
    pub fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    /// 构造 NotInitialized
    pub fn not_initialized(operation: &'static str) -> Self {
        Self::NotInitialized { operation }
    }

    /// 是否为参数错误
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// 是否为未初始化错误
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized { .. })
    }

    /// 是否为形状错误
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}

/// 示踪剂容器结果类型
pub type TracerResult<T> = Result<T, TracerError>;
