// ==========================================
// 供应链需求预测系统 - 需求爆炸引擎
// ==========================================
// 职责: BOM 展开行 → 原料日需求
// 口径: material_demand = product_units × consumption_per_unit,
//       按 (日期, 原料, 类别, 视野) 聚合后一次性取整
// 红线: 禁止逐行取整后再求和(避免舍入误差累积)
// ==========================================

use crate::domain::types::ForecastHorizon;
use crate::domain::{BomExpandedRow, RawMaterialDemand};
use crate::engine::EngineError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::info;

// ==========================================
// DemandExplosionEngine - 需求爆炸引擎
// ==========================================
pub struct DemandExplosionEngine;

impl DemandExplosionEngine {
    /// 构造引擎
    pub fn new() -> Self {
        Self
    }

    /// 计算原料日需求
    ///
    /// # 参数
    /// - `expanded`: BOM 展开行
    ///
    /// # 返回
    /// - Ok(Vec<RawMaterialDemand>): 按 (视野, 日期, 原料) 排序
    /// - Err(EngineError): 输入为空
    pub fn run(&self, expanded: &[BomExpandedRow]) -> Result<Vec<RawMaterialDemand>, EngineError> {
        if expanded.is_empty() {
            return Err(EngineError::EmptyInput("product_bom_expanded".to_string()));
        }

        // (视野, 日期, 原料, 类别) → 需求合计(浮点,聚合后才取整)
        let mut grouped: BTreeMap<(ForecastHorizon, NaiveDate, String, String), f64> =
            BTreeMap::new();
        for row in expanded {
            let material_demand = row.product_units as f64 * row.consumption_per_unit;
            *grouped
                .entry((
                    row.forecast_horizon,
                    row.date,
                    row.raw_material.clone(),
                    row.material_type.clone(),
                ))
                .or_insert(0.0) += material_demand;
        }

        let rows: Vec<RawMaterialDemand> = grouped
            .into_iter()
            .map(|((horizon, date, material, mtype), units)| RawMaterialDemand {
                date,
                raw_material: material,
                material_type: mtype,
                forecast_horizon: horizon,
                material_demand_units: units.round() as i64,
            })
            .collect();

        info!(input = expanded.len(), output = rows.len(), "需求爆炸完成");
        Ok(rows)
    }
}

impl Default for DemandExplosionEngine {
    fn default() -> Self {
        Self::new()
    }
}
