// ==========================================
// 供应链需求预测系统 - 预测领域模型
// ==========================================
// 职责: SKU 日预测行 + 门店分摊权重 + 预测批次汇总
// ==========================================

use crate::domain::types::ForecastHorizon;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// SkuForecast - SKU 日预测行
// ==========================================
// 不变量: forecast_units >= 0;
//         同一 (sku, store, horizon) 的日期连续且恰为视野天数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuForecast {
    pub date: NaiveDate,                   // 预测日期(历史最后一天的次日起)
    pub sku_id: String,                    // SKU 标识
    pub store_id: String,                  // 门店标识
    pub forecast_horizon: ForecastHorizon, // 预测视野
    pub forecast_units: i64,               // 预测销量(件,四舍五入)
}

// ==========================================
// StoreAllocationWeight - 门店分摊权重
// ==========================================
// 口径: 门店历史销量 / SKU 全历史总销量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreAllocationWeight {
    pub sku_id: String,     // SKU 标识
    pub store_id: String,   // 门店标识
    pub allocation_weight: f64, // 分摊权重(同一 SKU 合计 1.0)
}

// ==========================================
// SkuForecastFailure - 单 SKU 预测失败记录
// ==========================================
// 用途: 局部失败不中断批次,失败明细进入批次汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuForecastFailure {
    pub sku_id: String, // SKU 标识
    pub reason: String, // 失败原因(数据不足/拟合失败)
}

// ==========================================
// ForecastRunSummary - 预测批次汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRunSummary {
    pub run_id: String,                    // 批次 ID(UUID)
    pub history_end: NaiveDate,            // 历史数据截止日
    pub forecast_start: NaiveDate,         // 预测起始日(截止日次日)
    pub total_skus: usize,                 // 输入 SKU 总数
    pub processed: usize,                  // 成功拟合 SKU 数
    pub failed: usize,                     // 失败/跳过 SKU 数
    pub failures: Vec<SkuForecastFailure>, // 失败明细
}

impl ForecastRunSummary {
    /// 失败率(0.0 ~ 1.0);无 SKU 时记为 1.0
    pub fn failure_ratio(&self) -> f64 {
        if self.total_skus == 0 {
            return 1.0;
        }
        self.failed as f64 / self.total_skus as f64
    }
}
