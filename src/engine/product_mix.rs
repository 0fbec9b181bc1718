// ==========================================
// 供应链需求预测系统 - 产品构成推断引擎
// ==========================================
// 职责: 滚动窗口内按 SKU 推断各产品贡献份额,
//       产出 SKU→产品分摊权重
// 口径: allocation_weight = 窗口内产品销量 / 窗口内 SKU 总销量
// 红线: 窗口内零销量的 SKU 权重记 0.0(除零保护,不产生 NaN)
// ==========================================

use crate::config::PipelineConfigReader;
use crate::domain::{SalesRecord, SkuMasterEntry, SkuProductAllocation};
use crate::engine::EngineError;
use chrono::Duration;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// ProductMixEngine - 产品构成推断引擎
// ==========================================
pub struct ProductMixEngine<C>
where
    C: PipelineConfigReader,
{
    config: Arc<C>,
}

impl<C> ProductMixEngine<C>
where
    C: PipelineConfigReader,
{
    /// 构造引擎
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 推断 SKU→产品分摊权重
    ///
    /// # 参数
    /// - `sales`: 日销售事实表
    /// - `master`: SKU→产品静态主数据
    ///
    /// # 返回
    /// - Ok(Vec<SkuProductAllocation>): 同一 SKU 权重合计 ≈ 1.0(3位小数舍入)
    /// - Err(EngineError): 任一必需输入为空
    ///
    /// # 流程
    /// 1. 销售表与主数据按 sku_id 连接(无映射的销售行丢弃并计数)
    /// 2. 截取滚动窗口(最新销售日向前 window_days 天)
    /// 3. SKU × 产品聚合
    /// 4. 份额计算 + 3 位小数舍入
    pub fn run(
        &self,
        sales: &[SalesRecord],
        master: &[SkuMasterEntry],
    ) -> Result<Vec<SkuProductAllocation>, EngineError> {
        let max_date = match sales.iter().map(|r| r.date).max() {
            Some(date) => date,
            None => return Err(EngineError::EmptyInput("sku_daily_sales".to_string())),
        };
        if master.is_empty() {
            return Err(EngineError::EmptyInput("sku_master".to_string()));
        }

        let window_days = self.config.mix_window_days();
        let window_start = max_date - Duration::days(window_days as i64);

        // SKU → 映射产品列表
        let mut products_by_sku: HashMap<&str, Vec<&str>> = HashMap::new();
        for entry in master {
            products_by_sku
                .entry(entry.sku_id.as_str())
                .or_default()
                .push(entry.product_id.as_str());
        }

        // === 窗口过滤 + 连接 + SKU × 产品聚合 ===
        let mut unmapped_rows = 0usize;
        let mut sku_product_units: BTreeMap<(String, String), i64> = BTreeMap::new();
        for record in sales {
            if record.date < window_start {
                continue;
            }
            match products_by_sku.get(record.sku_id.as_str()) {
                Some(products) => {
                    for product_id in products {
                        *sku_product_units
                            .entry((record.sku_id.clone(), (*product_id).to_string()))
                            .or_insert(0) += record.actual_sales_units;
                    }
                }
                None => unmapped_rows += 1,
            }
        }
        if unmapped_rows > 0 {
            warn!(
                rows = unmapped_rows,
                "窗口内存在无产品映射的销售行,已丢弃"
            );
        }

        // === SKU 总量 ===
        let mut sku_totals: BTreeMap<&str, i64> = BTreeMap::new();
        for ((sku_id, _), units) in &sku_product_units {
            *sku_totals.entry(sku_id.as_str()).or_insert(0) += units;
        }

        // === 份额计算 ===
        let mut allocations = Vec::with_capacity(sku_product_units.len());
        for ((sku_id, product_id), units) in &sku_product_units {
            let total = sku_totals.get(sku_id.as_str()).copied().unwrap_or(0);
            let weight = if total > 0 {
                *units as f64 / total as f64
            } else {
                0.0
            };
            allocations.push(SkuProductAllocation {
                sku_id: sku_id.clone(),
                product_id: product_id.clone(),
                allocation_weight: round3(weight),
                window_days,
            });
        }

        info!(
            skus = sku_totals.len(),
            allocations = allocations.len(),
            window_days,
            window_start = %window_start,
            "产品构成推断完成"
        );
        Ok(allocations)
    }
}

/// 3 位小数舍入
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
