// ==========================================
// 供应链需求预测系统 - 领域模型层
// ==========================================
// 职责: 定义各阶段快照表的行结构与核心枚举
// 红线: 不含文件访问逻辑,不含引擎逻辑;
//       每个阶段产出新表,任何实体不做原地修改
// ==========================================

pub mod allocation;
pub mod bom;
pub mod forecast;
pub mod inventory;
pub mod reconciliation;
pub mod sales;
pub mod types;

// 重导出核心类型
pub use allocation::{ProductDemand, SkuProductAllocation, SkuProductDemand};
pub use bom::{BomEntry, BomExpandedRow, RawMaterialDemand};
pub use forecast::{
    ForecastRunSummary, SkuForecast, SkuForecastFailure, StoreAllocationWeight,
};
pub use inventory::{InventoryLedgerEntry, InventoryMovement};
pub use reconciliation::{ReconciliationRow, RiskRecord};
pub use sales::{SalesRecord, SkuMasterEntry};
pub use types::{ForecastHorizon, RiskFlag};
