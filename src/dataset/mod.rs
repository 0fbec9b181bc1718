// ==========================================
// 供应链需求预测系统 - 数据集层
// ==========================================
// 职责: 快照文件读写(阶段间唯一通信通道)
// 支持: 输入表 Excel/CSV,快照输出统一 CSV
// 红线: 阶段边界做模式校验,缺列立即失败
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod reader;
pub mod writer;

// 重导出核心类型
pub use error::DatasetError;
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use reader::{parse_date_lenient, ReadSummary};

// ==========================================
// 快照文件名(对外契约,与下游消费方一致)
// ==========================================
pub mod files {
    // 输入表
    pub const SKU_DAILY_SALES: &str = "sku_daily_sales.csv";
    pub const SKU_MASTER: &str = "sku_master.csv";
    pub const PRODUCT_BOM: &str = "product_bom.csv";
    pub const RAW_MATERIAL_INVENTORY: &str = "raw_material_inventory.csv";

    // 阶段快照
    pub const SKU_DAILY_FORECAST_7DAY: &str = "sku_daily_forecast_7day.csv";
    pub const SKU_DAILY_FORECAST_30DAY: &str = "sku_daily_forecast_30day.csv";
    pub const SKU_DAILY_FORECAST: &str = "sku_daily_forecast.csv";
    pub const SKU_PRODUCT_ALLOCATION: &str = "sku_product_allocation.csv";
    pub const SKU_PRODUCT_DEMAND: &str = "sku_product_demand.csv";
    pub const PRODUCT_FORECAST: &str = "product_forecast.csv";
    pub const PRODUCT_BOM_EXPANDED: &str = "product_bom_expanded.csv";
    pub const RAW_MATERIAL_DEMAND: &str = "raw_material_demand.csv";
    pub const RAW_MATERIAL_INVENTORY_LEDGER: &str = "raw_material_inventory_ledger.csv";
    pub const RAW_MATERIAL_RECONCILIATION: &str = "raw_material_reconciliation.csv";
    pub const RAW_MATERIAL_RISK: &str = "raw_material_risk.csv";
}
