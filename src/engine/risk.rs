// ==========================================
// 供应链需求预测系统 - 库存风险引擎
// ==========================================
// 职责: 对账行 → 风险标签
// 红线: 规则按声明顺序判定,首个命中即返回(条件有重叠,
//       顺序即语义);纯函数,相同输入必得相同输出;
//       安全库存缺失视为规则不适用,不是错误
// ==========================================

use crate::config::PipelineConfigReader;
use crate::domain::types::RiskFlag;
use crate::domain::{ReconciliationRow, RiskRecord};
use crate::engine::EngineError;
use std::sync::Arc;
use tracing::info;

// ==========================================
// RiskEngine - 库存风险引擎
// ==========================================
pub struct RiskEngine<C>
where
    C: PipelineConfigReader,
{
    config: Arc<C>,
}

impl<C> RiskEngine<C>
where
    C: PipelineConfigReader,
{
    /// 构造引擎
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 批量分类
    ///
    /// # 参数
    /// - `rows`: 对账行
    ///
    /// # 返回
    /// - Ok(Vec<RiskRecord>): 每行恰好一个标签(全函数)
    /// - Err(EngineError): 输入为空
    pub fn run(&self, rows: &[ReconciliationRow]) -> Result<Vec<RiskRecord>, EngineError> {
        if rows.is_empty() {
            return Err(EngineError::EmptyInput(
                "raw_material_reconciliation".to_string(),
            ));
        }

        let overstock_multiplier = self.config.overstock_multiplier();
        let records: Vec<RiskRecord> = rows
            .iter()
            .map(|row| {
                let flag = self.classify(row, overstock_multiplier);
                RiskRecord::from_reconciliation(row.clone(), flag)
            })
            .collect();

        let high_risk = records
            .iter()
            .filter(|r| r.inventory_risk_flag.is_high_risk())
            .count();
        info!(rows = records.len(), high_risk, "库存风险分类完成");
        Ok(records)
    }

    /// 单行分类
    ///
    /// # 规则(首个命中即返回)
    /// 1. 期末库存缺失          → NO_INVENTORY_DATA
    /// 2. 滚动余额 < 0          → STOCKOUT_RISK
    /// 3. 期末库存 <= 0         → STOCKOUT_RISK
    /// 4. 当日缺口 < 0          → DEMAND_SHORTFALL_RISK
    /// 5. 期末库存 < 安全库存   → LOW_STOCK_RISK
    /// 6. 滚动余额 < 安全库存   → LOW_STOCK_RISK
    /// 7. 安全库存 > 0 且期末库存 > 倍数×安全库存 → OVERSTOCK_RISK
    /// 8. 其余                  → NORMAL
    pub fn classify(&self, row: &ReconciliationRow, overstock_multiplier: f64) -> RiskFlag {
        // 规则 1: 无库存快照
        let closing = match row.closing_inventory {
            Some(value) => value,
            None => return RiskFlag::NoInventoryData,
        };

        // 规则 2: 累计需求超出库存
        if let Some(balance) = row.running_inventory_balance {
            if balance < 0.0 {
                return RiskFlag::StockoutRisk;
            }
        }

        // 规则 3: 库存归零
        if closing <= 0.0 {
            return RiskFlag::StockoutRisk;
        }

        // 规则 4: 当日需求超出库存
        if let Some(gap) = row.inventory_gap_units {
            if gap < 0.0 {
                return RiskFlag::DemandShortfallRisk;
            }
        }

        // 规则 5: 低于安全库存
        if let Some(safety) = row.safety_stock {
            if closing < safety {
                return RiskFlag::LowStockRisk;
            }
        }

        // 规则 6: 滚动余额低于安全库存
        if let (Some(balance), Some(safety)) = (row.running_inventory_balance, row.safety_stock) {
            if balance < safety {
                return RiskFlag::LowStockRisk;
            }
        }

        // 规则 7: 显著高于安全库存
        if let Some(safety) = row.safety_stock {
            if safety > 0.0 && closing > overstock_multiplier * safety {
                return RiskFlag::OverstockRisk;
            }
        }

        RiskFlag::Normal
    }
}
