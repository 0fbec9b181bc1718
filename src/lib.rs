// ==========================================
// 供应链需求预测系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV 快照
// 系统定位: 决策支持系统 (需求级联预测 + 库存对账)
// 流程: SKU 预测 → 产品拆解 → BOM 爆炸 → 原料需求 →
//       台账校验 → 供需对账 → 风险分类
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据集层 - 快照文件读写
pub mod dataset;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ForecastHorizon, RiskFlag};

// 领域实体
pub use domain::{
    BomEntry, BomExpandedRow, ForecastRunSummary, InventoryLedgerEntry, InventoryMovement,
    ProductDemand, RawMaterialDemand, ReconciliationRow, RiskRecord, SalesRecord, SkuForecast,
    SkuMasterEntry, SkuProductAllocation, SkuProductDemand,
};

// 引擎
pub use engine::{
    BomMapper, DemandDisaggregator, DemandExplosionEngine, EngineError, InventoryLedgerEngine,
    PipelineInputs, PipelineOrchestrator, PipelineResult, PipelineStage, ProductMixEngine,
    ProductNormalizer, ReconciliationEngine, RiskEngine, SkuForecastEngine,
};

// 配置
pub use config::{PipelineConfig, PipelineConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "供应链需求预测系统";
