// ==========================================
// 供应链需求预测系统 - 产品需求归一化引擎
// ==========================================
// 职责: 跨 SKU/门店合计,产出产品 × 日 × 视野的单一序列
// 红线: 门店与 SKU 粒度在此阶段永久丢失
// ==========================================

use crate::domain::types::ForecastHorizon;
use crate::domain::{ProductDemand, SkuProductDemand};
use crate::engine::EngineError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::info;

// ==========================================
// ProductNormalizer - 产品需求归一化引擎
// ==========================================
pub struct ProductNormalizer;

impl ProductNormalizer {
    /// 构造引擎
    pub fn new() -> Self {
        Self
    }

    /// 归一化产品需求
    ///
    /// # 参数
    /// - `demand`: SKU→产品需求行(日级)
    ///
    /// # 返回
    /// - Ok(Vec<ProductDemand>): 按 (视野, 日期, 产品) 排序
    /// - Err(EngineError): 输入为空
    pub fn run(&self, demand: &[SkuProductDemand]) -> Result<Vec<ProductDemand>, EngineError> {
        if demand.is_empty() {
            return Err(EngineError::EmptyInput("sku_product_demand".to_string()));
        }

        // (视野, 日期, 产品) → 合计;BTreeMap 键序即输出排序
        let mut grouped: BTreeMap<(ForecastHorizon, NaiveDate, String), i64> = BTreeMap::new();
        for row in demand {
            *grouped
                .entry((row.forecast_horizon, row.date, row.product_id.clone()))
                .or_insert(0) += row.product_units;
        }

        let rows: Vec<ProductDemand> = grouped
            .into_iter()
            .map(|((horizon, date, product_id), units)| ProductDemand {
                date,
                product_id,
                forecast_horizon: horizon,
                product_units: units,
            })
            .collect();

        info!(input = demand.len(), output = rows.len(), "产品需求归一化完成");
        Ok(rows)
    }
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
