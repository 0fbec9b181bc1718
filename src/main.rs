// ==========================================
// 供应链需求预测系统 - 批处理主入口
// ==========================================
// 用法: supply-chain-forecast <datasets-dir> [stage]
// 省略 stage 时按依赖顺序运行全部九个阶段;
// 指定 stage 时独立运行单个阶段(读上游快照,写本阶段快照)
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;
use supply_chain_forecast::config::{default_datasets_dir, PipelineConfig};
use supply_chain_forecast::engine::{PipelineOrchestrator, PipelineStage};

fn main() {
    // 初始化日志系统
    supply_chain_forecast::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", supply_chain_forecast::APP_NAME);
    tracing::info!("系统版本: {}", supply_chain_forecast::VERSION);
    tracing::info!("==================================================");

    // 参数: <datasets-dir> [stage]
    let mut args = std::env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(default_datasets_dir);
    let stage_name = args.next();

    tracing::info!("数据集目录: {}", data_dir.display());
    if !data_dir.is_dir() {
        tracing::error!("数据集目录不存在: {}", data_dir.display());
        std::process::exit(1);
    }

    // 加载配置(默认位置,缺省时使用编译期默认值)
    let config = Arc::new(PipelineConfig::load_or_default());
    let orchestrator = PipelineOrchestrator::new(config);

    let result = match stage_name {
        Some(name) => match PipelineStage::parse(&name) {
            Some(stage) => orchestrator.run_stage_from_files(&data_dir, stage),
            None => {
                let known: Vec<&str> = PipelineStage::all().iter().map(|s| s.name()).collect();
                tracing::error!("未知阶段: {},可用阶段: {}", name, known.join(", "));
                std::process::exit(1);
            }
        },
        None => orchestrator.run_from_files(&data_dir),
    };

    if let Err(e) = result {
        tracing::error!("管线运行失败: {:#}", e);
        std::process::exit(1);
    }

    tracing::info!("运行完成");
}
