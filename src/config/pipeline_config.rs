// ==========================================
// 供应链需求预测系统 - 管线配置
// ==========================================
// 职责: 配置加载、默认值、读取接口
// 存储: JSON 配置文件(缺省时使用编译期默认值)
// 红线: 只读接口,不包含业务逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// ConfigError - 配置错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件解析失败: {path}: {message}")]
    ParseError { path: String, message: String },
}

// ==========================================
// PipelineConfigReader Trait
// ==========================================
// 用途: 引擎所需的配置读取接口
// 实现者: PipelineConfig(文件或默认值);测试中的 MockConfig
pub trait PipelineConfigReader: Send + Sync {
    /// 单 SKU 最少历史天数(不足则排除并记失败)
    fn min_history_days(&self) -> usize;

    /// 产品构成推断的滚动窗口天数
    fn mix_window_days(&self) -> u32;

    /// 超储判定倍数(期末库存 > 倍数×安全库存)
    fn overstock_multiplier(&self) -> f64;

    /// 模型拟合最大迭代次数
    fn fit_max_iterations(&self) -> usize;

    /// 模型拟合收敛容差
    fn fit_tolerance(&self) -> f64;

    /// 预测批次致命失败率阈值(失败率达到该值即批次失败)
    fn fit_failure_fatal_ratio(&self) -> f64;
}

// ==========================================
// PipelineConfig - 管线配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub min_history_days: usize,
    pub mix_window_days: u32,
    pub overstock_multiplier: f64,
    pub fit_max_iterations: usize,
    pub fit_tolerance: f64,
    pub fit_failure_fatal_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_history_days: 30,
            mix_window_days: 30,
            overstock_multiplier: 1.5,
            fit_max_iterations: 500,
            fit_tolerance: 1e-8,
            fit_failure_fatal_ratio: 1.0,
        }
    }
}

impl PipelineConfig {
    /// 从 JSON 文件加载配置
    ///
    /// # 参数
    /// - `path`: 配置文件路径
    ///
    /// # 返回
    /// - Ok(PipelineConfig): 文件中缺省的键取默认值
    /// - Err(ConfigError): 读取或解析失败
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        info!(path = %path.display(), "配置文件已加载");
        Ok(config)
    }

    /// 加载默认位置的配置;文件不存在时回落到编译期默认值
    pub fn load_or_default() -> Self {
        let path = default_config_path();
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(%e, "配置文件加载失败,使用默认配置");
                }
            }
        } else {
            debug!(path = %path.display(), "配置文件不存在,使用默认配置");
        }
        Self::default()
    }
}

impl PipelineConfigReader for PipelineConfig {
    fn min_history_days(&self) -> usize {
        self.min_history_days
    }

    fn mix_window_days(&self) -> u32 {
        self.mix_window_days
    }

    fn overstock_multiplier(&self) -> f64 {
        self.overstock_multiplier
    }

    fn fit_max_iterations(&self) -> usize {
        self.fit_max_iterations
    }

    fn fit_tolerance(&self) -> f64 {
        self.fit_tolerance
    }

    fn fit_failure_fatal_ratio(&self) -> f64 {
        self.fit_failure_fatal_ratio
    }
}

// ==========================================
// 默认路径
// ==========================================

/// 默认配置文件路径: <用户配置目录>/supply-chain-forecast/pipeline_config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("supply-chain-forecast")
        .join("pipeline_config.json")
}

/// 默认数据集目录: <用户数据目录>/supply-chain-forecast/datasets
pub fn default_datasets_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("supply-chain-forecast")
        .join("datasets")
}
