// apps/se_cli/src/commands/roundtrip.rs

//! 布局同步往返命令
//!
//! 用 0, 1, 2, … 填充主机缓冲区，载入容器后再导出到新缓冲区，
//! 逐位比较两者。

use anyhow::{bail, Context, Result};
use clap::Args;
use se_config::{HarnessConfig, Precision};
use se_runtime::{Backend, CpuBackend, RuntimeScalar};
use se_tracers::{host_mass_len, HostMassView, HostMassViewMut, Tracers};
use tracing::info;

use super::HarnessArgs;

/// 往返校验参数
#[derive(Args)]
pub struct RoundtripArgs {
    #[command(flatten)]
    pub harness: HarnessArgs,

    /// 主机缓冲区单元数（默认与容器相同）
    #[arg(long)]
    pub host_elems: Option<usize>,

    /// 载入前先随机填充容器（种子取自配置）
    #[arg(long)]
    pub randomize_first: bool,
}

/// 执行往返校验
pub fn execute(args: RoundtripArgs) -> Result<()> {
    info!("=== SEDyn 布局同步往返 ===");
    let config = args.harness.resolve()?;
    let host_elems = args.host_elems.unwrap_or(config.layout.num_elems);

    let mismatches = match config.precision {
        Precision::F32 => round_trip::<f32>(&config, host_elems, args.randomize_first)?,
        Precision::F64 => round_trip::<f64>(&config, host_elems, args.randomize_first)?,
    };

    if mismatches == 0 {
        println!("✓ 往返一致: {} 个单元", host_elems);
        Ok(())
    } else {
        bail!("往返失败: {} 个值不一致", mismatches)
    }
}

/// 执行一次往返，返回不一致的值个数
fn round_trip<S: RuntimeScalar>(config: &HarnessConfig, host_elems: usize, randomize_first: bool) -> Result<usize>
where
    CpuBackend<S>: Backend<Scalar = S>,
{
    let layout = &config.layout;
    let mut tracers = Tracers::new(CpuBackend::<S>::new(), layout.num_elems, layout.num_tracers)?;
    if randomize_first {
        let r = &config.randomize;
        let min = S::from_config(r.min).context("下界无法表示为当前精度")?;
        let max = S::from_config(r.max).context("上界无法表示为当前精度")?;
        tracers.randomize(r.seed, min, max)?;
    }

    let len = host_mass_len(host_elems).context("主机缓冲区尺寸溢出")?;
    let input: Vec<S> = (0..len)
        .map(S::from_usize)
        .collect::<Option<_>>()
        .context("序列值无法表示为当前精度")?;

    tracers.pull_mass(&HostMassView::new(&input, host_elems)?)?;
    let mut output = vec![S::ZERO; len];
    tracers.push_mass(&mut HostMassViewMut::new(&mut output, host_elems)?)?;

    let mismatches = input
        .iter()
        .zip(&output)
        .filter(|(a, b)| a.hash_bits() != b.hash_bits())
        .count();
    info!("{} 精度, {} 个值, {} 个不一致", S::TYPE_NAME, len, mismatches);
    Ok(mismatches)
}
