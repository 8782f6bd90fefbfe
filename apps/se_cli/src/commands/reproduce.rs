// apps/se_cli/src/commands/reproduce.rs

//! 可复现性检查命令
//!
//! 在每个配置的线程数下用同一种子重新填充独立容器并计算哈希，
//! 任何一个哈希不同即判定失败。

use anyhow::{bail, Context, Result};
use clap::Args;
use rayon::ThreadPoolBuilder;
use se_config::{HarnessConfig, Precision};
use se_runtime::{Backend, CpuBackend, HashType, RuntimeScalar};
use se_tracers::Tracers;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

use super::HarnessArgs;

/// 可复现性检查参数
#[derive(Args)]
pub struct ReproduceArgs {
    #[command(flatten)]
    pub harness: HarnessArgs,

    /// 随机种子（覆盖配置文件）
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// 参与哈希的时间层（覆盖配置文件）
    #[arg(short, long)]
    pub time_level: Option<usize>,

    /// 线程数列表，逗号分隔（覆盖配置文件）
    #[arg(short, long, value_delimiter = ',')]
    pub workers: Vec<usize>,

    /// 把最终生效的配置写到文件
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

/// 单次哈希记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HashRecord {
    threads: usize,
    pooled: HashType,
    split: HashType,
}

/// 执行可复现性检查
pub fn execute(args: ReproduceArgs) -> Result<()> {
    info!("=== SEDyn 可复现性检查 ===");

    let mut config = args.harness.resolve()?;
    if let Some(seed) = args.seed {
        config.randomize.seed = seed;
    }
    if let Some(tl) = args.time_level {
        config.verify.time_level = tl;
    }
    if !args.workers.is_empty() {
        config.verify.workers = args.workers.clone();
    }
    config.validate().context("配置无效")?;

    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("无法写入配置文件 {}", path.display()))?;
        info!("配置已保存: {}", path.display());
    }

    let records = match config.precision {
        Precision::F32 => run::<f32>(&config)?,
        Precision::F64 => run::<f64>(&config)?,
    };

    println!("\n{:>8}  {:>18}  {:>18}", "线程数", "线程池哈希", "分段哈希");
    for r in &records {
        println!("{:>8}  {:#018x}  {:#018x}", r.threads, r.pooled, r.split);
    }

    let reference = records[0].pooled;
    let mismatches: Vec<&HashRecord> = records
        .iter()
        .filter(|r| r.pooled != reference || r.split != reference)
        .collect();

    if mismatches.is_empty() {
        println!("\n✓ 所有线程数下哈希一致: {:#018x}", reference);
        Ok(())
    } else {
        for r in &mismatches {
            error!("线程数 {} 的哈希与参考值 {:#018x} 不同", r.threads, reference);
        }
        bail!("可复现性检查失败：{} 个线程数的哈希不一致", mismatches.len())
    }
}

/// 在给定精度下执行检查，返回每个线程数的哈希
///
/// 第一条记录来自单独初始化并填充的参考容器。
fn run<S: RuntimeScalar>(config: &HarnessConfig) -> Result<Vec<HashRecord>>
where
    CpuBackend<S>: Backend<Scalar = S>,
{
    let r = &config.randomize;
    let min = S::from_config(r.min).context("下界无法表示为当前精度")?;
    let max = S::from_config(r.max).context("上界无法表示为当前精度")?;
    let tl = config.verify.time_level;
    let (ne, nt) = (config.layout.num_elems, config.layout.num_tracers);

    info!(
        "精度: {}, 单元数: {}, 示踪剂数: {}, 种子: {}, 区间: [{}, {}]",
        S::TYPE_NAME, ne, nt, r.seed, min, max
    );

    let start = Instant::now();
    let mut reference = Tracers::new(CpuBackend::<S>::new(), ne, nt)?;
    reference.randomize(r.seed, min, max)?;
    let reference_hash = single_threaded(|| reference.hash(tl))??;
    info!("参考容器填充并哈希完成: {:.3} s", start.elapsed().as_secs_f64());

    let mut records = vec![HashRecord {
        threads: 1,
        pooled: reference_hash,
        split: reference.hash_with_workers(tl, 1)?,
    }];

    for &threads in &config.verify.workers {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .with_context(|| format!("无法创建 {} 线程的线程池", threads))?;

        // 每个线程数都重新填充一个独立容器
        let tracers = pool.install(|| -> Result<Tracers<CpuBackend<S>>> {
            let mut t = Tracers::new(CpuBackend::<S>::new(), ne, nt)?;
            t.randomize(r.seed, min, max)?;
            Ok(t)
        })?;
        let pooled = pool.install(|| tracers.hash(tl))?;
        let split = tracers.hash_with_workers(tl, threads)?;

        info!("线程数 {}: {:#018x}", threads, pooled);
        records.push(HashRecord { threads, pooled, split });
    }

    Ok(records)
}

fn single_threaded<T: Send>(f: impl FnOnce() -> T + Send) -> Result<T> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .context("无法创建单线程线程池")?;
    Ok(pool.install(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> HarnessConfig {
        let mut config = HarnessConfig::default();
        config.layout.num_elems = 5;
        config.layout.num_tracers = 3;
        config.verify.workers = vec![1, 2, 3];
        config
    }

    #[test]
    fn test_run_consistent_f64() {
        let records = run::<f64>(&small_config()).unwrap();
        assert_eq!(records.len(), 4);
        let reference = records[0].pooled;
        assert!(records.iter().all(|r| r.pooled == reference && r.split == reference));
    }

    #[test]
    fn test_run_consistent_f32() {
        let records = run::<f32>(&small_config()).unwrap();
        let reference = records[0].pooled;
        assert!(records.iter().all(|r| r.pooled == reference && r.split == reference));
    }
}
