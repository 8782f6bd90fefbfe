// apps/se_cli/src/main.rs

//! SEDyn 示踪剂状态测试工具
//!
//! 在命令行上检查示踪剂容器的布局、布局同步和可复现性。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 配置来自 `HarnessConfig`（JSON 文件 + 命令行覆盖）
//! - 通过 `Precision` 枚举在入口处分发到 f32/f64 容器

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// SEDyn 示踪剂状态测试工具
#[derive(Parser)]
#[command(name = "se_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SEDyn tracer-state layout and reproducibility harness", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 显示维度常量与场布局
    Info(commands::info::InfoArgs),
    /// 随机填充并在多个线程数下比较哈希
    Reproduce(commands::reproduce::ReproduceArgs),
    /// 主机缓冲区往返校验
    Roundtrip(commands::roundtrip::RoundtripArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Info(args) => commands::info::execute(args),
        Commands::Reproduce(args) => commands::reproduce::execute(args),
        Commands::Roundtrip(args) => commands::roundtrip::execute(args),
    }
}
