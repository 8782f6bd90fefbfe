// apps/se_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示维度常量、各场形状和内存占用。

use anyhow::{Context, Result};
use clap::Args;
use se_config::{HarnessConfig, Precision};
use se_foundation::{
    HostMassLayout, GRID_EDGE, MAX_TRACERS, NUM_LEV, PACKED_LEVELS, TIME_LEVELS, VECTOR_SIZE,
    VERTICAL_LEVELS,
};
use se_runtime::{Backend, CpuBackend, RuntimeScalar};
use se_tracers::{ElementField, Tracers};
use tracing::info;

use super::HarnessArgs;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub harness: HarnessArgs,

    /// 只显示维度常量
    #[arg(long)]
    pub constants: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== SEDyn 示踪剂信息 ===");
    print_constants();
    if args.constants {
        return Ok(());
    }

    let config = args.harness.resolve()?;
    println!();
    match config.precision {
        Precision::F32 => print_layout::<f32>(&config),
        Precision::F64 => print_layout::<f64>(&config),
    }
}

fn print_constants() {
    println!("=== 维度常量 ===");
    println!("TIME_LEVELS:     {}", TIME_LEVELS);
    println!("MAX_TRACERS:     {}", MAX_TRACERS);
    println!("VERTICAL_LEVELS: {}", VERTICAL_LEVELS);
    println!("GRID_EDGE:       {}", GRID_EDGE);
    println!("向量宽度:        {} (每列 {} 包, 补齐到 {} 层)", VECTOR_SIZE, NUM_LEV, PACKED_LEVELS);
    println!("主机缓冲区每单元: {} 个值", HostMassLayout::ELEM_LEN);
}

fn print_layout<S: RuntimeScalar>(config: &HarnessConfig) -> Result<()>
where
    CpuBackend<S>: Backend<Scalar = S>,
{
    let layout = &config.layout;
    let tracers = Tracers::new(CpuBackend::<S>::new(), layout.num_elems, layout.num_tracers)?;
    let fields = tracers.fields()?;

    println!("=== 场布局 ({}, {}) ===", tracers.backend().name(), S::TYPE_NAME);
    println!("单元数: {}, 示踪剂数: {}", fields.num_elems(), fields.num_tracers());
    println!(
        "示踪剂容量: {}, 工作区槽位: {}",
        fields.tracer_capacity(),
        fields.workspace_slots()
    );
    for field in [fields.mass(), fields.workspace(), fields.bounds(), fields.concentration(), fields.tendency()] {
        print_field(field);
    }
    println!("总计: {}", format_bytes(fields.memory_bytes()));

    let host_bytes = config
        .precision
        .host_buffer_bytes(layout.num_elems)
        .context("主机缓冲区尺寸溢出")?;
    println!("主机质量缓冲区: {}", format_bytes(host_bytes));
    Ok(())
}

fn print_field<B: Backend>(field: &ElementField<B>) {
    println!(
        "  {:<24} {:?}  {}",
        field.name(),
        field.extents(),
        format_bytes(field.memory_bytes())
    );
}

fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB * KIB {
        format!("{:.2} MiB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.2} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}
