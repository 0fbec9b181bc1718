// ==========================================
// 供应链需求预测系统 - 配置层
// ==========================================
// 职责: 管线配置管理(加载/默认值/读取接口)
// 存储: JSON 配置文件
// ==========================================

pub mod pipeline_config;

// 重导出核心配置类型
pub use pipeline_config::{
    default_config_path, default_datasets_dir, ConfigError, PipelineConfig, PipelineConfigReader,
};
