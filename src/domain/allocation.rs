// ==========================================
// 供应链需求预测系统 - 产品分摊领域模型
// ==========================================
// 职责: SKU→产品分摊权重与产品需求行
// ==========================================

use crate::domain::types::ForecastHorizon;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// SkuProductAllocation - SKU→产品分摊权重
// ==========================================
// 不变量: 同一 sku_id 的权重合计 ≈ 1.0(舍入误差内);
//         窗口内无销量的 SKU 权重记 0.0(除零保护,不产生 NaN)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuProductAllocation {
    pub sku_id: String,         // SKU 标识
    pub product_id: String,     // 产品标识
    pub allocation_weight: f64, // 分摊权重(3位小数)
    pub window_days: u32,       // 滚动窗口天数
}

// ==========================================
// SkuProductDemand - SKU→产品需求行(日级)
// ==========================================
// 口径: product_units = round(forecast_units × allocation_weight)
// 保留 store_id 便于追溯,归一化阶段才丢弃门店粒度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuProductDemand {
    pub date: NaiveDate,                   // 预测日期
    pub sku_id: String,                    // SKU 标识
    pub store_id: String,                  // 门店标识
    pub product_id: String,                // 产品标识
    pub forecast_horizon: ForecastHorizon, // 预测视野
    pub product_units: i64,                // 产品需求(件,非负整数)
}

// ==========================================
// ProductDemand - 产品日需求(归一化后)
// ==========================================
// 口径: 跨 SKU/门店合计,门店与 SKU 粒度在此永久丢失
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDemand {
    pub date: NaiveDate,                   // 预测日期
    pub product_id: String,                // 产品标识
    pub forecast_horizon: ForecastHorizon, // 预测视野
    pub product_units: i64,                // 产品需求合计(件)
}
