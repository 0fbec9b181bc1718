// ==========================================
// 供应链需求预测系统 - 引擎层
// ==========================================
// 职责: 九个批处理阶段的业务规则引擎 + 编排器
// 红线: 引擎是纯表变换(完整输入表 → 完整输出表),
//       不做流式/增量计算,不含文件访问逻辑
//       (文件交接由编排器经数据集层完成)
// ==========================================

pub mod bom_mapper;
pub mod disaggregation;
pub mod explosion;
pub mod forecast;
pub mod ledger;
pub mod normalization;
pub mod orchestrator;
pub mod product_mix;
pub mod reconciliation;
pub mod risk;
pub mod sarima;

// 重导出核心引擎
pub use bom_mapper::BomMapper;
pub use disaggregation::DemandDisaggregator;
pub use explosion::DemandExplosionEngine;
pub use forecast::{ForecastRunOutput, SkuForecastEngine, SkuForecastError};
pub use ledger::InventoryLedgerEngine;
pub use normalization::ProductNormalizer;
pub use orchestrator::{PipelineInputs, PipelineOrchestrator, PipelineResult, PipelineStage};
pub use product_mix::ProductMixEngine;
pub use reconciliation::ReconciliationEngine;
pub use risk::RiskEngine;
pub use sarima::{FittedSarima, SarimaError, SarimaModel, SarimaParams};

use thiserror::Error;

// ==========================================
// EngineError - 引擎层错误类型
// ==========================================
// 口径: 单行坏数据不在此层面失败(在数据集层按行丢弃计数);
//       只有输入整表为空或 100% 失败类条件才致命
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("必需输入表为空: {0}")]
    EmptyInput(String),

    #[error("预测批次失败: 全部 {0} 个 SKU 拟合失败,未产出预测")]
    AllForecastsFailed(usize),

    #[error("预测批次失败: 失败率 {ratio:.2} 达到致命阈值 {threshold:.2}")]
    FailureRatioExceeded { ratio: f64, threshold: f64 },
}
