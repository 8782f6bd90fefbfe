// crates/se_tracers/src/hash.rs

//! 可复现性哈希
//!
//! 覆盖三个来源：指定时间层的质量场、浓度场、浓度倾向，
//! 每个垂直列只取前 `VERTICAL_LEVELS` 层，补齐层不参与。
//! 按单元并行归约，部分结果用 [`BitHash::merge`] 合并。

use rayon::prelude::*;
use se_foundation::{PACKED_LEVELS, TIME_LEVELS, VERTICAL_LEVELS};
use se_runtime::{Backend, BitHash, HashType, RuntimeScalar};
use tracing::debug;

use crate::error::{TracerError, TracerResult};
use crate::state::{TracerFields, Tracers};

/// 累加一段按列排列（每列 `PACKED_LEVELS` 个值）的数据
#[inline]
fn push_columns<S: RuntimeScalar>(hash: &mut BitHash, values: &[S]) {
    for column in values.chunks_exact(PACKED_LEVELS) {
        hash.push_slice(&column[..VERTICAL_LEVELS]);
    }
}

/// 单个单元的部分哈希
fn element_hash<B: Backend>(fields: &TracerFields<B>, ie: usize, time_level: usize) -> BitHash {
    let mut hash = BitHash::new();
    let (start, end) = fields.mass_layout().time_level_range(time_level);
    push_columns(&mut hash, &fields.mass().element(ie)[start..end]);
    push_columns(&mut hash, fields.concentration().element(ie));
    push_columns(&mut hash, fields.tendency().element(ie));
    hash
}

fn check_time_level(operation: &'static str, time_level: usize) -> TracerResult<()> {
    if time_level >= TIME_LEVELS {
        return Err(TracerError::invalid_argument(
            operation,
            format!("时间层 {} 超出范围 [0, {})", time_level, TIME_LEVELS),
        ));
    }
    Ok(())
}

impl<B: Backend> Tracers<B> {
    /// 计算时间层 `time_level` 的可复现性哈希
    ///
    /// # 错误
    /// - 未初始化时返回 NotInitialized
    /// - `time_level >= TIME_LEVELS` 时返回 InvalidArgument
    pub fn hash(&self, time_level: usize) -> TracerResult<HashType> {
        let fields = self.require("hash")?;
        check_time_level("hash", time_level)?;

        let hash = (0..fields.num_elems())
            .into_par_iter()
            .map(|ie| element_hash(fields, ie, time_level))
            .reduce(BitHash::new, BitHash::merge);

        debug!(time_level, hash = hash.value(), "可复现性哈希");
        Ok(hash.value())
    }

    /// 把单元切成 `workers` 段连续区间分别归约再合并
    ///
    /// 结果对任何 `workers` 都与 [`Tracers::hash`] 相同。
    pub fn hash_with_workers(&self, time_level: usize, workers: usize) -> TracerResult<HashType> {
        let fields = self.require("hash_with_workers")?;
        check_time_level("hash_with_workers", time_level)?;
        if workers == 0 {
            return Err(TracerError::invalid_argument("hash_with_workers", "工作段数必须为正"));
        }

        let ne = fields.num_elems();
        let workers = workers.min(ne);
        let span = ne.div_ceil(workers);
        let partials: Vec<BitHash> = (0..workers)
            .into_par_iter()
            .map(|w| {
                let lo = (w * span).min(ne);
                let hi = ((w + 1) * span).min(ne);
                (lo..hi).fold(BitHash::new(), |acc, ie| acc.merge(element_hash(fields, ie, time_level)))
            })
            .collect();

        // 逆序合并
        let hash = partials.into_iter().rev().fold(BitHash::new(), BitHash::merge);
        Ok(hash.value())
    }
}
