// ==========================================
// 供应链需求预测系统 - BOM 领域模型
// ==========================================
// 职责: 物料清单主数据 + BOM 展开行 + 原料需求行
// ==========================================

use crate::domain::types::ForecastHorizon;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// BomEntry - 物料清单条目
// ==========================================
// 静态主数据; 不变量: consumption_per_unit > 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomEntry {
    pub product_id: String,        // 产品标识
    pub raw_material: String,      // 原料名称
    pub material_type: String,     // 原料类别
    pub consumption_per_unit: f64, // 单件消耗量
}

// ==========================================
// BomExpandedRow - BOM 展开行(日级)
// ==========================================
// 口径: 产品日需求 × 该产品的每条 BOM = 一行
// 边界: 无 BOM 条目的产品不产生展开行(该产品需求静默消失,已知缺口)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomExpandedRow {
    pub date: NaiveDate,                   // 预测日期
    pub product_id: String,                // 产品标识
    pub forecast_horizon: ForecastHorizon, // 预测视野
    pub product_units: i64,                // 产品需求(件)
    pub raw_material: String,              // 原料名称
    pub material_type: String,             // 原料类别
    pub consumption_per_unit: f64,         // 单件消耗量
}

// ==========================================
// RawMaterialDemand - 原料日需求
// ==========================================
// 口径: Σ(product_units × consumption_per_unit) 聚合后一次性取整
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialDemand {
    pub date: NaiveDate,                   // 预测日期
    pub raw_material: String,              // 原料名称
    pub material_type: String,             // 原料类别
    pub forecast_horizon: ForecastHorizon, // 预测视野
    pub material_demand_units: i64,        // 原料需求(非负整数)
}
