// ==========================================
// 供应链需求预测系统 - BOM 映射引擎
// ==========================================
// 职责: 产品日需求 × 物料清单 → 原料展开行
// 边界: 无 BOM 条目的产品不产生展开行(该产品需求消失,
//       属兼容性保留的已知缺口),丢弃的产品需告警列出
// ==========================================

use crate::domain::{BomEntry, BomExpandedRow, ProductDemand};
use crate::engine::EngineError;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

// ==========================================
// BomMapper - BOM 映射引擎
// ==========================================
pub struct BomMapper;

impl BomMapper {
    /// 构造引擎
    pub fn new() -> Self {
        Self
    }

    /// 展开产品需求为原料行
    ///
    /// # 参数
    /// - `demand`: 产品日需求
    /// - `bom`: 物料清单主数据
    ///
    /// # 返回
    /// - Ok(Vec<BomExpandedRow>): 每个产品日行 × 该产品 BOM 条目一行,
    ///   按 (视野, 日期, 产品, 原料) 排序
    /// - Err(EngineError): 任一必需输入为空
    pub fn run(
        &self,
        demand: &[ProductDemand],
        bom: &[BomEntry],
    ) -> Result<Vec<BomExpandedRow>, EngineError> {
        if demand.is_empty() {
            return Err(EngineError::EmptyInput("product_forecast".to_string()));
        }
        if bom.is_empty() {
            return Err(EngineError::EmptyInput("product_bom".to_string()));
        }

        // 产品 → BOM 条目
        let mut bom_by_product: HashMap<&str, Vec<&BomEntry>> = HashMap::new();
        for entry in bom {
            bom_by_product
                .entry(entry.product_id.as_str())
                .or_default()
                .push(entry);
        }

        let mut rows = Vec::new();
        let mut missing_products: BTreeSet<String> = BTreeSet::new();
        for row in demand {
            match bom_by_product.get(row.product_id.as_str()) {
                Some(entries) => {
                    for entry in entries {
                        rows.push(BomExpandedRow {
                            date: row.date,
                            product_id: row.product_id.clone(),
                            forecast_horizon: row.forecast_horizon,
                            product_units: row.product_units,
                            raw_material: entry.raw_material.clone(),
                            material_type: entry.material_type.clone(),
                            consumption_per_unit: entry.consumption_per_unit,
                        });
                    }
                }
                None => {
                    missing_products.insert(row.product_id.clone());
                }
            }
        }

        // 无 BOM 的产品需求消失,留痕供复核
        if !missing_products.is_empty() {
            warn!(
                products = ?missing_products,
                "产品缺少 BOM 条目,其需求未进入原料展开"
            );
        }

        rows.sort_by(|a, b| {
            (a.forecast_horizon, a.date, &a.product_id, &a.raw_material).cmp(&(
                b.forecast_horizon,
                b.date,
                &b.product_id,
                &b.raw_material,
            ))
        });

        info!(input = demand.len(), output = rows.len(), "BOM 映射完成");
        Ok(rows)
    }
}

impl Default for BomMapper {
    fn default() -> Self {
        Self::new()
    }
}
