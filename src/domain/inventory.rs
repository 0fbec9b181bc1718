// ==========================================
// 供应链需求预测系统 - 库存领域模型
// ==========================================
// 职责: 原料库存流水与校验后台账
// 红线: 台账只标记不修正,存储值与重算值的取舍由调用方决定
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryMovement - 库存流水记录(输入)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub date: NaiveDate,             // 记账日期
    pub raw_material: String,        // 原料名称
    pub opening_inventory: f64,      // 期初库存
    pub inflow_quantity: f64,        // 入库量
    pub consumed_quantity: f64,      // 消耗量
    pub closing_inventory: f64,      // 期末库存(存储值)
    pub safety_stock: Option<f64>,   // 安全库存(可缺失)
}

// ==========================================
// InventoryLedgerEntry - 校验后台账行(输出)
// ==========================================
// 不变量(链式): 同一原料按时间排序后 opening[t] == closing[t-1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLedgerEntry {
    pub date: NaiveDate,                      // 记账日期
    pub raw_material: String,                 // 原料名称
    pub opening_inventory: f64,               // 期初库存
    pub inflow_quantity: f64,                 // 入库量
    pub consumed_quantity: f64,               // 消耗量
    pub closing_inventory: f64,               // 期末库存(存储值)
    pub safety_stock: Option<f64>,            // 安全库存
    pub calculated_closing_inventory: f64,    // 重算期末 = 期初 + 入库 - 消耗
    pub inventory_validation_status: bool,    // 存储值与重算值是否一致
}
