// ==========================================
// 供应链需求预测系统 - SKU→产品需求拆解引擎
// ==========================================
// 职责: SKU 日预测 × 产品分摊权重 → 产品日需求(日级)
// 口径: product_units = round(forecast_units × allocation_weight)
// 红线: 无分摊数据的 SKU 预测行丢弃并告警计数,
//       不向下游传播空产品列
// ==========================================

use crate::domain::{SkuForecast, SkuProductAllocation, SkuProductDemand};
use crate::engine::EngineError;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

// ==========================================
// DemandDisaggregator - 需求拆解引擎
// ==========================================
pub struct DemandDisaggregator;

impl DemandDisaggregator {
    /// 构造引擎
    pub fn new() -> Self {
        Self
    }

    /// 拆解 SKU 预测为产品需求
    ///
    /// # 参数
    /// - `forecasts`: SKU 日预测行(两个视野合并)
    /// - `allocations`: SKU→产品分摊权重
    ///
    /// # 返回
    /// - Ok(Vec<SkuProductDemand>): 保留 store_id 与视野便于追溯
    /// - Err(EngineError): 预测输入为空
    pub fn run(
        &self,
        forecasts: &[SkuForecast],
        allocations: &[SkuProductAllocation],
    ) -> Result<Vec<SkuProductDemand>, EngineError> {
        if forecasts.is_empty() {
            return Err(EngineError::EmptyInput("sku_daily_forecast".to_string()));
        }

        // SKU → 分摊条目
        let mut allocations_by_sku: HashMap<&str, Vec<&SkuProductAllocation>> = HashMap::new();
        for allocation in allocations {
            allocations_by_sku
                .entry(allocation.sku_id.as_str())
                .or_default()
                .push(allocation);
        }

        let mut rows = Vec::new();
        let mut dropped_rows = 0usize;
        let mut missing_skus: BTreeSet<String> = BTreeSet::new();
        for forecast in forecasts {
            match allocations_by_sku.get(forecast.sku_id.as_str()) {
                Some(entries) => {
                    for allocation in entries {
                        let units =
                            (forecast.forecast_units as f64 * allocation.allocation_weight).round()
                                as i64;
                        rows.push(SkuProductDemand {
                            date: forecast.date,
                            sku_id: forecast.sku_id.clone(),
                            store_id: forecast.store_id.clone(),
                            product_id: allocation.product_id.clone(),
                            forecast_horizon: forecast.forecast_horizon,
                            product_units: units.max(0),
                        });
                    }
                }
                None => {
                    dropped_rows += 1;
                    missing_skus.insert(forecast.sku_id.clone());
                }
            }
        }

        // 预测有量却无分摊数据,生产环境应视为数据缺口并复核
        if dropped_rows > 0 {
            warn!(
                rows = dropped_rows,
                skus = missing_skus.len(),
                missing = ?missing_skus,
                "预测行缺少产品分摊数据,已丢弃"
            );
        }

        info!(input = forecasts.len(), output = rows.len(), "需求拆解完成");
        Ok(rows)
    }
}

impl Default for DemandDisaggregator {
    fn default() -> Self {
        Self::new()
    }
}
