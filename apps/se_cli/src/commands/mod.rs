// apps/se_cli/src/commands/mod.rs

//! 子命令

pub mod info;
pub mod reproduce;
pub mod roundtrip;

use anyhow::{Context, Result};
use clap::Args;
use se_config::{HarnessConfig, Precision};
use std::path::PathBuf;
use tracing::info;

/// 各子命令共用的配置参数
#[derive(Args, Debug, Clone)]
pub struct HarnessArgs {
    /// 配置文件路径（JSON）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 单元数（覆盖配置文件）
    #[arg(short = 'e', long)]
    pub elems: Option<usize>,

    /// 示踪剂数（覆盖配置文件）
    #[arg(short = 'q', long)]
    pub tracers: Option<usize>,

    /// 计算精度 (f32, f64)
    #[arg(short, long)]
    pub precision: Option<Precision>,
}

impl HarnessArgs {
    /// 加载配置文件并应用命令行覆盖
    pub fn resolve(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("加载配置: {}", path.display());
                HarnessConfig::from_file(path)
                    .with_context(|| format!("无法加载配置文件 {}", path.display()))?
            }
            None => HarnessConfig::default(),
        };

        if let Some(ne) = self.elems {
            config.layout.num_elems = ne;
        }
        if let Some(nt) = self.tracers {
            config.layout.num_tracers = nt;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }

        config.validate().context("配置无效")?;
        Ok(config)
    }
}
