// crates/se_config/src/harness_config.rs

//! HarnessConfig - 示踪剂测试框架配置（全 f64）
//!
//! 描述一次可复现性检查：容器尺寸、随机填充参数和哈希校验方式。
//! 数值一律以 f64 存储，运行时按 `precision` 转换。

use serde::{Deserialize, Serialize};
use std::path::Path;

use se_foundation::TIME_LEVELS;

use crate::error::ConfigError;
use crate::precision::Precision;

/// 测试框架配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// 计算精度
    #[serde(default)]
    pub precision: Precision,

    /// 容器尺寸
    #[serde(default)]
    pub layout: LayoutConfig,

    /// 随机填充参数
    #[serde(default)]
    pub randomize: RandomizeConfig,

    /// 哈希校验参数
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// 容器尺寸
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// 单元数
    #[serde(default = "default_num_elems")]
    pub num_elems: usize,

    /// 示踪剂数
    #[serde(default = "default_num_tracers")]
    pub num_tracers: usize,
}

fn default_num_elems() -> usize { 16 }
fn default_num_tracers() -> usize { 4 }

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            num_elems: default_num_elems(),
            num_tracers: default_num_tracers(),
        }
    }
}

/// 随机填充参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomizeConfig {
    /// 种子
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// 下界
    #[serde(default = "default_min")]
    pub min: f64,

    /// 上界
    #[serde(default = "default_max")]
    pub max: f64,
}

fn default_seed() -> u64 { 42 }
fn default_min() -> f64 { -1.0 }
fn default_max() -> f64 { 1.0 }

impl Default for RandomizeConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            min: default_min(),
            max: default_max(),
        }
    }
}

/// 哈希校验参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// 参与哈希的时间层
    #[serde(default)]
    pub time_level: usize,

    /// 依次比较的线程数
    #[serde(default = "default_workers")]
    pub workers: Vec<usize>,
}

fn default_workers() -> Vec<usize> { vec![1, 2, 4, 8] }

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            time_level: 0,
            workers: default_workers(),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            layout: LayoutConfig::default(),
            randomize: RandomizeConfig::default(),
            verify: VerifyConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// 从 JSON 文件加载并校验
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: HarnessConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.num_elems == 0 {
            return Err(ConfigError::invalid("layout.num_elems", 0, "单元数必须为正"));
        }

        let r = &self.randomize;
        if !r.min.is_finite() || !r.max.is_finite() {
            return Err(ConfigError::invalid(
                "randomize",
                format!("[{}, {}]", r.min, r.max),
                "边界必须为有限值",
            ));
        }
        if r.min > r.max {
            return Err(ConfigError::invalid(
                "randomize.min",
                r.min,
                "下界不能大于上界",
            ));
        }
        if !self.precision.can_represent(r.min) || !self.precision.can_represent(r.max) {
            return Err(ConfigError::invalid(
                "randomize",
                format!("[{}, {}]", r.min, r.max),
                &format!("超出 {} 表示范围", self.precision),
            ));
        }

        if self.verify.time_level >= TIME_LEVELS {
            return Err(ConfigError::invalid(
                "verify.time_level",
                self.verify.time_level,
                "时间层越界",
            ));
        }
        if self.verify.workers.is_empty() {
            return Err(ConfigError::Missing("verify.workers".to_string()));
        }
        if self.verify.workers.contains(&0) {
            return Err(ConfigError::invalid("verify.workers", 0, "线程数必须为正"));
        }

        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
