// ==========================================
// 供应链需求预测系统 - 快照写出器
// ==========================================
// 职责: 领域表 → CSV 快照,列名与列序为对外契约
// 红线: 重跑即原地覆盖,无增量更新;缺失值写空串,禁止写 0
// ==========================================

use crate::dataset::error::DatasetError;
use crate::domain::{
    BomEntry, BomExpandedRow, InventoryLedgerEntry, InventoryMovement, ProductDemand,
    RawMaterialDemand, ReconciliationRow, RiskRecord, SalesRecord, SkuForecast, SkuMasterEntry,
    SkuProductAllocation, SkuProductDemand,
};
use chrono::NaiveDate;
use csv::Writer;
use std::path::Path;

// 快照统一日期格式
const DATE_FORMAT: &str = "%Y-%m-%d";

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn fmt_opt_date(date: Option<NaiveDate>) -> String {
    date.map(fmt_date).unwrap_or_default()
}

fn fmt_opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn open_writer(path: &Path) -> Result<Writer<std::fs::File>, DatasetError> {
    Writer::from_path(path).map_err(|e| DatasetError::FileWriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn finish(mut writer: Writer<std::fs::File>, path: &Path) -> Result<(), DatasetError> {
    writer.flush().map_err(|e| DatasetError::FileWriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// ==========================================
// 输入表写出器(测试夹具与数据准备用)
// ==========================================

/// 写出日销售表
pub fn write_sales(path: &Path, rows: &[SalesRecord]) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record(["date", "sku_id", "store_id", "sales_channel", "actual_sales_units"])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.sku_id.clone(),
            row.store_id.clone(),
            row.sales_channel.clone(),
            row.actual_sales_units.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出 SKU→产品主数据
pub fn write_sku_master(path: &Path, rows: &[SkuMasterEntry]) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record(["sku_id", "product_id"])?;
    for row in rows {
        w.write_record([row.sku_id.clone(), row.product_id.clone()])?;
    }
    finish(w, path)
}

/// 写出物料清单
pub fn write_bom(path: &Path, rows: &[BomEntry]) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record(["product_id", "raw_material", "material_type", "consumption_per_unit"])?;
    for row in rows {
        w.write_record([
            row.product_id.clone(),
            row.raw_material.clone(),
            row.material_type.clone(),
            row.consumption_per_unit.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出库存流水
pub fn write_inventory_movements(
    path: &Path,
    rows: &[InventoryMovement],
) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record([
        "date",
        "raw_material",
        "opening_inventory",
        "inflow_quantity",
        "consumed_quantity",
        "closing_inventory",
        "safety_stock",
    ])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.raw_material.clone(),
            row.opening_inventory.to_string(),
            row.inflow_quantity.to_string(),
            row.consumed_quantity.to_string(),
            row.closing_inventory.to_string(),
            fmt_opt_f64(row.safety_stock),
        ])?;
    }
    finish(w, path)
}

// ==========================================
// 各表写出器
// ==========================================

/// 写出 SKU 日预测快照
pub fn write_sku_forecast(path: &Path, rows: &[SkuForecast]) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record(["date", "sku_id", "store_id", "forecast_horizon", "forecast_units"])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.sku_id.clone(),
            row.store_id.clone(),
            row.forecast_horizon.to_string(),
            row.forecast_units.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出分摊权重快照
pub fn write_allocations(
    path: &Path,
    rows: &[SkuProductAllocation],
) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record(["sku_id", "product_id", "allocation_weight", "window_days"])?;
    for row in rows {
        w.write_record([
            row.sku_id.clone(),
            row.product_id.clone(),
            row.allocation_weight.to_string(),
            row.window_days.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出 SKU→产品需求快照
pub fn write_sku_product_demand(
    path: &Path,
    rows: &[SkuProductDemand],
) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record([
        "date",
        "sku_id",
        "store_id",
        "product_id",
        "forecast_horizon",
        "product_units",
    ])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.sku_id.clone(),
            row.store_id.clone(),
            row.product_id.clone(),
            row.forecast_horizon.to_string(),
            row.product_units.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出产品日需求快照
pub fn write_product_demand(path: &Path, rows: &[ProductDemand]) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record(["date", "product_id", "forecast_horizon", "product_units"])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.product_id.clone(),
            row.forecast_horizon.to_string(),
            row.product_units.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出 BOM 展开快照
pub fn write_bom_expanded(path: &Path, rows: &[BomExpandedRow]) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record([
        "date",
        "product_id",
        "forecast_horizon",
        "product_units",
        "raw_material",
        "material_type",
        "consumption_per_unit",
    ])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.product_id.clone(),
            row.forecast_horizon.to_string(),
            row.product_units.to_string(),
            row.raw_material.clone(),
            row.material_type.clone(),
            row.consumption_per_unit.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出原料日需求快照
pub fn write_raw_material_demand(
    path: &Path,
    rows: &[RawMaterialDemand],
) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record([
        "date",
        "raw_material",
        "material_type",
        "forecast_horizon",
        "material_demand_units",
    ])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.raw_material.clone(),
            row.material_type.clone(),
            row.forecast_horizon.to_string(),
            row.material_demand_units.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出校验后台账快照
pub fn write_inventory_ledger(
    path: &Path,
    rows: &[InventoryLedgerEntry],
) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record([
        "date",
        "raw_material",
        "opening_inventory",
        "inflow_quantity",
        "consumed_quantity",
        "closing_inventory",
        "safety_stock",
        "calculated_closing_inventory",
        "inventory_validation_status",
    ])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.raw_material.clone(),
            row.opening_inventory.to_string(),
            row.inflow_quantity.to_string(),
            row.consumed_quantity.to_string(),
            row.closing_inventory.to_string(),
            fmt_opt_f64(row.safety_stock),
            row.calculated_closing_inventory.to_string(),
            row.inventory_validation_status.to_string(),
        ])?;
    }
    finish(w, path)
}

/// 写出对账快照
pub fn write_reconciliation(
    path: &Path,
    rows: &[ReconciliationRow],
) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record([
        "date",
        "raw_material",
        "material_type",
        "forecast_horizon",
        "material_demand_units",
        "inventory_date",
        "closing_inventory",
        "safety_stock",
        "inventory_gap_units",
        "cumulative_demand",
        "running_inventory_balance",
    ])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.raw_material.clone(),
            row.material_type.clone(),
            row.forecast_horizon.to_string(),
            row.material_demand_units.to_string(),
            fmt_opt_date(row.inventory_date),
            fmt_opt_f64(row.closing_inventory),
            fmt_opt_f64(row.safety_stock),
            fmt_opt_f64(row.inventory_gap_units),
            row.cumulative_demand.to_string(),
            fmt_opt_f64(row.running_inventory_balance),
        ])?;
    }
    finish(w, path)
}

/// 写出风险快照
pub fn write_risk(path: &Path, rows: &[RiskRecord]) -> Result<(), DatasetError> {
    let mut w = open_writer(path)?;
    w.write_record([
        "date",
        "raw_material",
        "material_type",
        "forecast_horizon",
        "material_demand_units",
        "inventory_date",
        "closing_inventory",
        "safety_stock",
        "inventory_gap_units",
        "cumulative_demand",
        "running_inventory_balance",
        "inventory_risk_flag",
    ])?;
    for row in rows {
        w.write_record([
            fmt_date(row.date),
            row.raw_material.clone(),
            row.material_type.clone(),
            row.forecast_horizon.to_string(),
            row.material_demand_units.to_string(),
            fmt_opt_date(row.inventory_date),
            fmt_opt_f64(row.closing_inventory),
            fmt_opt_f64(row.safety_stock),
            fmt_opt_f64(row.inventory_gap_units),
            row.cumulative_demand.to_string(),
            fmt_opt_f64(row.running_inventory_balance),
            row.inventory_risk_flag.to_string(),
        ])?;
    }
    finish(w, path)
}
