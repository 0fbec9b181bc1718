// ==========================================
// 供应链需求预测系统 - 类型化表读取器
// ==========================================
// 职责: 原始行 → 领域结构,阶段边界模式校验
// 红线: 必需列缺失立即失败;坏日期/坏数值按行丢弃并计数,
//       绝不产生以 NaN 填充的输出
// ==========================================

use crate::dataset::error::DatasetError;
use crate::dataset::file_parser::UniversalFileParser;
use crate::domain::{
    BomEntry, BomExpandedRow, InventoryLedgerEntry, InventoryMovement, ProductDemand,
    RawMaterialDemand, ReconciliationRow, SalesRecord, SkuForecast, SkuMasterEntry,
    SkuProductAllocation, SkuProductDemand,
};
use crate::domain::types::ForecastHorizon;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

type RawRow = HashMap<String, String>;

// ==========================================
// ReadSummary - 单表读取统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    pub loaded: usize,              // 成功读入行数
    pub dropped_invalid_date: usize, // 因日期不可解析丢弃的行数
    pub dropped_invalid_value: usize, // 因数值/枚举不可解析丢弃的行数
}

// ==========================================
// 宽松日期解析
// ==========================================
// 依次尝试快照格式与常见外部导出格式
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%Y%m%d"];

pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    // 带时间戳的导出(如 "2025-12-01 00:00:00")只取日期段
    let date_part = v.split_whitespace().next().unwrap_or(v);
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(d);
        }
    }
    None
}

// ==========================================
// 模式校验
// ==========================================

/// 校验必需列是否齐备(以首行键集为准)
///
/// # 返回
/// - Err(MissingColumn): 任一必需列缺失
/// - Err(EmptyTable): 表无数据行
fn require_columns(table: &str, rows: &[RawRow], columns: &[&str]) -> Result<(), DatasetError> {
    let first = rows
        .first()
        .ok_or_else(|| DatasetError::EmptyTable(table.to_string()))?;
    for col in columns {
        if !first.contains_key(*col) {
            return Err(DatasetError::MissingColumn {
                table: table.to_string(),
                column: (*col).to_string(),
            });
        }
    }
    Ok(())
}

// ==========================================
// 字段取值辅助
// ==========================================

fn get_string(row: &RawRow, field: &str) -> Option<String> {
    row.get(field)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_i64(row: &RawRow, field: &str) -> Option<i64> {
    let v = row.get(field)?.trim();
    if v.is_empty() {
        return None;
    }
    // 整数列可能以 "12.0" 形式出现在外部导出中
    v.parse::<i64>()
        .ok()
        .or_else(|| v.parse::<f64>().ok().map(|f| f.round() as i64))
}

fn get_f64(row: &RawRow, field: &str) -> Option<f64> {
    let v = row.get(field)?.trim();
    if v.is_empty() {
        return None;
    }
    v.parse::<f64>().ok()
}

fn get_bool(row: &RawRow, field: &str) -> Option<bool> {
    match row.get(field)?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn get_horizon(row: &RawRow, field: &str) -> Option<ForecastHorizon> {
    ForecastHorizon::parse(row.get(field)?)
}

// ==========================================
// 输入表读取器
// ==========================================

/// 读取日销售表 (sku_daily_sales)
pub fn read_sales(path: &Path) -> Result<(Vec<SalesRecord>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "sku_daily_sales",
        &rows,
        &["date", "sku_id", "store_id", "sales_channel", "actual_sales_units"],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        let (sku_id, store_id, units) = match (
            get_string(row, "sku_id"),
            get_string(row, "store_id"),
            get_i64(row, "actual_sales_units"),
        ) {
            (Some(s), Some(st), Some(u)) => (s, st, u),
            _ => {
                summary.dropped_invalid_value += 1;
                continue;
            }
        };
        out.push(SalesRecord {
            date,
            sku_id,
            store_id,
            sales_channel: get_string(row, "sales_channel").unwrap_or_default(),
            actual_sales_units: units,
        });
        summary.loaded += 1;
    }
    log_drops("sku_daily_sales", &summary);
    Ok((out, summary))
}

/// 读取 SKU→产品主数据 (sku_master)
pub fn read_sku_master(path: &Path) -> Result<(Vec<SkuMasterEntry>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns("sku_master", &rows, &["sku_id", "product_id"])?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        match (get_string(row, "sku_id"), get_string(row, "product_id")) {
            (Some(sku_id), Some(product_id)) => {
                out.push(SkuMasterEntry { sku_id, product_id });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("sku_master", &summary);
    Ok((out, summary))
}

/// 读取物料清单 (product_bom)
///
/// consumption_per_unit 必须 >0,非法行丢弃并计数
pub fn read_bom(path: &Path) -> Result<(Vec<BomEntry>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "product_bom",
        &rows,
        &["product_id", "raw_material", "material_type", "consumption_per_unit"],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let entry = match (
            get_string(row, "product_id"),
            get_string(row, "raw_material"),
            get_string(row, "material_type"),
            get_f64(row, "consumption_per_unit"),
        ) {
            (Some(product_id), Some(raw_material), Some(material_type), Some(rate))
                if rate > 0.0 =>
            {
                BomEntry {
                    product_id,
                    raw_material,
                    material_type,
                    consumption_per_unit: rate,
                }
            }
            _ => {
                summary.dropped_invalid_value += 1;
                continue;
            }
        };
        out.push(entry);
        summary.loaded += 1;
    }
    log_drops("product_bom", &summary);
    Ok((out, summary))
}

/// 读取库存流水 (raw_material_inventory)
pub fn read_inventory_movements(
    path: &Path,
) -> Result<(Vec<InventoryMovement>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "raw_material_inventory",
        &rows,
        &[
            "date",
            "raw_material",
            "opening_inventory",
            "inflow_quantity",
            "consumed_quantity",
            "closing_inventory",
            "safety_stock",
        ],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        let movement = match (
            get_string(row, "raw_material"),
            get_f64(row, "opening_inventory"),
            get_f64(row, "inflow_quantity"),
            get_f64(row, "consumed_quantity"),
            get_f64(row, "closing_inventory"),
        ) {
            (Some(raw_material), Some(opening), Some(inflow), Some(consumed), Some(closing)) => {
                InventoryMovement {
                    date,
                    raw_material,
                    opening_inventory: opening,
                    inflow_quantity: inflow,
                    consumed_quantity: consumed,
                    closing_inventory: closing,
                    // 安全库存允许缺失(规则不适用,而非错误)
                    safety_stock: get_f64(row, "safety_stock"),
                }
            }
            _ => {
                summary.dropped_invalid_value += 1;
                continue;
            }
        };
        out.push(movement);
        summary.loaded += 1;
    }
    log_drops("raw_material_inventory", &summary);
    Ok((out, summary))
}

// ==========================================
// 中间快照读取器(文件模式/独立运行阶段使用)
// ==========================================

/// 读取 SKU 日预测快照 (sku_daily_forecast)
pub fn read_sku_forecast(path: &Path) -> Result<(Vec<SkuForecast>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "sku_daily_forecast",
        &rows,
        &["date", "sku_id", "store_id", "forecast_horizon", "forecast_units"],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        match (
            get_string(row, "sku_id"),
            get_string(row, "store_id"),
            get_horizon(row, "forecast_horizon"),
            get_i64(row, "forecast_units"),
        ) {
            (Some(sku_id), Some(store_id), Some(horizon), Some(units)) => {
                out.push(SkuForecast {
                    date,
                    sku_id,
                    store_id,
                    forecast_horizon: horizon,
                    forecast_units: units,
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("sku_daily_forecast", &summary);
    Ok((out, summary))
}

/// 读取分摊权重快照 (sku_product_allocation)
pub fn read_allocations(
    path: &Path,
) -> Result<(Vec<SkuProductAllocation>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "sku_product_allocation",
        &rows,
        &["sku_id", "product_id", "allocation_weight", "window_days"],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        match (
            get_string(row, "sku_id"),
            get_string(row, "product_id"),
            get_f64(row, "allocation_weight"),
            get_i64(row, "window_days"),
        ) {
            (Some(sku_id), Some(product_id), Some(weight), Some(window)) => {
                out.push(SkuProductAllocation {
                    sku_id,
                    product_id,
                    allocation_weight: weight,
                    window_days: window as u32,
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("sku_product_allocation", &summary);
    Ok((out, summary))
}

/// 读取 SKU→产品需求快照 (sku_product_demand)
pub fn read_sku_product_demand(
    path: &Path,
) -> Result<(Vec<SkuProductDemand>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "sku_product_demand",
        &rows,
        &["date", "sku_id", "store_id", "product_id", "forecast_horizon", "product_units"],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        match (
            get_string(row, "sku_id"),
            get_string(row, "store_id"),
            get_string(row, "product_id"),
            get_horizon(row, "forecast_horizon"),
            get_i64(row, "product_units"),
        ) {
            (Some(sku_id), Some(store_id), Some(product_id), Some(horizon), Some(units)) => {
                out.push(SkuProductDemand {
                    date,
                    sku_id,
                    store_id,
                    product_id,
                    forecast_horizon: horizon,
                    product_units: units,
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("sku_product_demand", &summary);
    Ok((out, summary))
}

/// 读取产品日需求快照 (product_forecast)
pub fn read_product_demand(
    path: &Path,
) -> Result<(Vec<ProductDemand>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "product_forecast",
        &rows,
        &["date", "product_id", "forecast_horizon", "product_units"],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        match (
            get_string(row, "product_id"),
            get_horizon(row, "forecast_horizon"),
            get_i64(row, "product_units"),
        ) {
            (Some(product_id), Some(horizon), Some(units)) => {
                out.push(ProductDemand {
                    date,
                    product_id,
                    forecast_horizon: horizon,
                    product_units: units,
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("product_forecast", &summary);
    Ok((out, summary))
}

/// 读取 BOM 展开快照 (product_bom_expanded)
pub fn read_bom_expanded(
    path: &Path,
) -> Result<(Vec<BomExpandedRow>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "product_bom_expanded",
        &rows,
        &[
            "date",
            "product_id",
            "forecast_horizon",
            "product_units",
            "raw_material",
            "material_type",
            "consumption_per_unit",
        ],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        match (
            get_string(row, "product_id"),
            get_horizon(row, "forecast_horizon"),
            get_i64(row, "product_units"),
            get_string(row, "raw_material"),
            get_string(row, "material_type"),
            get_f64(row, "consumption_per_unit"),
        ) {
            (Some(product_id), Some(horizon), Some(units), Some(material), Some(mtype), Some(rate)) => {
                out.push(BomExpandedRow {
                    date,
                    product_id,
                    forecast_horizon: horizon,
                    product_units: units,
                    raw_material: material,
                    material_type: mtype,
                    consumption_per_unit: rate,
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("product_bom_expanded", &summary);
    Ok((out, summary))
}

/// 读取原料日需求快照 (raw_material_demand)
pub fn read_raw_material_demand(
    path: &Path,
) -> Result<(Vec<RawMaterialDemand>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "raw_material_demand",
        &rows,
        &["date", "raw_material", "material_type", "forecast_horizon", "material_demand_units"],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        match (
            get_string(row, "raw_material"),
            get_string(row, "material_type"),
            get_horizon(row, "forecast_horizon"),
            get_i64(row, "material_demand_units"),
        ) {
            (Some(material), Some(mtype), Some(horizon), Some(units)) => {
                out.push(RawMaterialDemand {
                    date,
                    raw_material: material,
                    material_type: mtype,
                    forecast_horizon: horizon,
                    material_demand_units: units,
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("raw_material_demand", &summary);
    Ok((out, summary))
}

/// 读取校验后台账快照 (raw_material_inventory_ledger)
pub fn read_inventory_ledger(
    path: &Path,
) -> Result<(Vec<InventoryLedgerEntry>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "raw_material_inventory_ledger",
        &rows,
        &[
            "date",
            "raw_material",
            "opening_inventory",
            "inflow_quantity",
            "consumed_quantity",
            "closing_inventory",
            "safety_stock",
            "calculated_closing_inventory",
            "inventory_validation_status",
        ],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        match (
            get_string(row, "raw_material"),
            get_f64(row, "opening_inventory"),
            get_f64(row, "inflow_quantity"),
            get_f64(row, "consumed_quantity"),
            get_f64(row, "closing_inventory"),
            get_f64(row, "calculated_closing_inventory"),
            get_bool(row, "inventory_validation_status"),
        ) {
            (
                Some(raw_material),
                Some(opening),
                Some(inflow),
                Some(consumed),
                Some(closing),
                Some(calculated),
                Some(status),
            ) => {
                out.push(InventoryLedgerEntry {
                    date,
                    raw_material,
                    opening_inventory: opening,
                    inflow_quantity: inflow,
                    consumed_quantity: consumed,
                    closing_inventory: closing,
                    safety_stock: get_f64(row, "safety_stock"),
                    calculated_closing_inventory: calculated,
                    inventory_validation_status: status,
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("raw_material_inventory_ledger", &summary);
    Ok((out, summary))
}

/// 读取对账快照 (raw_material_reconciliation)
pub fn read_reconciliation(
    path: &Path,
) -> Result<(Vec<ReconciliationRow>, ReadSummary), DatasetError> {
    let rows = UniversalFileParser.parse(path)?;
    require_columns(
        "raw_material_reconciliation",
        &rows,
        &[
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
        ],
    )?;

    let mut out = Vec::with_capacity(rows.len());
    let mut summary = ReadSummary::default();
    for row in &rows {
        let date = match parse_date_lenient(row.get("date").map(String::as_str).unwrap_or("")) {
            Some(d) => d,
            None => {
                summary.dropped_invalid_date += 1;
                continue;
            }
        };
        match (
            get_string(row, "raw_material"),
            get_string(row, "material_type"),
            get_horizon(row, "forecast_horizon"),
            get_i64(row, "material_demand_units"),
            get_i64(row, "cumulative_demand"),
        ) {
            (Some(material), Some(mtype), Some(horizon), Some(units), Some(cumulative)) => {
                out.push(ReconciliationRow {
                    date,
                    raw_material: material,
                    material_type: mtype,
                    forecast_horizon: horizon,
                    material_demand_units: units,
                    // 库存派生列: 空值即缺失(库存缺口的原料)
                    inventory_date: row
                        .get("inventory_date")
                        .and_then(|v| parse_date_lenient(v)),
                    closing_inventory: get_f64(row, "closing_inventory"),
                    safety_stock: get_f64(row, "safety_stock"),
                    inventory_gap_units: get_f64(row, "inventory_gap_units"),
                    cumulative_demand: cumulative,
                    running_inventory_balance: get_f64(row, "running_inventory_balance"),
                });
                summary.loaded += 1;
            }
            _ => summary.dropped_invalid_value += 1,
        }
    }
    log_drops("raw_material_reconciliation", &summary);
    Ok((out, summary))
}

// ==========================================
// 丢弃计数日志
// ==========================================
fn log_drops(table: &str, summary: &ReadSummary) {
    if summary.dropped_invalid_date > 0 {
        warn!(
            table,
            dropped = summary.dropped_invalid_date,
            "日期不可解析,按行丢弃"
        );
    }
    if summary.dropped_invalid_value > 0 {
        warn!(
            table,
            dropped = summary.dropped_invalid_value,
            "字段不可解析,按行丢弃"
        );
    }
}
