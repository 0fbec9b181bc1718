// ==========================================
// 供应链需求预测系统 - 供需对账领域模型
// ==========================================
// 职责: 对账行与风险行
// 红线: 库存缺失的原料所有库存派生列保持缺失,禁止以零填充
// ==========================================

use crate::domain::types::{ForecastHorizon, RiskFlag};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ReconciliationRow - 供需对账行(日级)
// ==========================================
// 口径: inventory_date 为预测窗口起点之前最近的一次台账快照,
//       同一批次所有行引用同一快照(静态,不随预测日推进)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    pub date: NaiveDate,                       // 预测日期
    pub raw_material: String,                  // 原料名称
    pub material_type: String,                 // 原料类别
    pub forecast_horizon: ForecastHorizon,     // 预测视野
    pub material_demand_units: i64,            // 当日原料需求
    pub inventory_date: Option<NaiveDate>,     // 快照日期(缺库存时缺失)
    pub closing_inventory: Option<f64>,        // 快照期末库存
    pub safety_stock: Option<f64>,             // 安全库存
    pub inventory_gap_units: Option<f64>,      // 当日缺口 = 库存 - 当日需求
    pub cumulative_demand: i64,                // 累计需求(视野内按日累加)
    pub running_inventory_balance: Option<f64>, // 滚动余额 = 库存 - 累计需求
}

// ==========================================
// RiskRecord - 风险行
// ==========================================
// 口径: 对账行 + 唯一风险标签(纯函数,相同输入必得相同输出)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub date: NaiveDate,                       // 预测日期
    pub raw_material: String,                  // 原料名称
    pub material_type: String,                 // 原料类别
    pub forecast_horizon: ForecastHorizon,     // 预测视野
    pub material_demand_units: i64,            // 当日原料需求
    pub inventory_date: Option<NaiveDate>,     // 快照日期
    pub closing_inventory: Option<f64>,        // 快照期末库存
    pub safety_stock: Option<f64>,             // 安全库存
    pub inventory_gap_units: Option<f64>,      // 当日缺口
    pub cumulative_demand: i64,                // 累计需求
    pub running_inventory_balance: Option<f64>, // 滚动余额
    pub inventory_risk_flag: RiskFlag,         // 风险标签
}

impl RiskRecord {
    /// 由对账行与风险标签组装
    pub fn from_reconciliation(row: ReconciliationRow, flag: RiskFlag) -> Self {
        Self {
            date: row.date,
            raw_material: row.raw_material,
            material_type: row.material_type,
            forecast_horizon: row.forecast_horizon,
            material_demand_units: row.material_demand_units,
            inventory_date: row.inventory_date,
            closing_inventory: row.closing_inventory,
            safety_stock: row.safety_stock,
            inventory_gap_units: row.inventory_gap_units,
            cumulative_demand: row.cumulative_demand,
            running_inventory_balance: row.running_inventory_balance,
            inventory_risk_flag: flag,
        }
    }
}
