// ==========================================
// 供应链需求预测系统 - 供需对账引擎
// ==========================================
// 职责: 原料日需求 × 台账快照 → 对账行
// 口径: 快照取预测窗口起点之前最近的一次台账(静态,
//       整个批次引用同一快照,不随预测日推进);
//       running_inventory_balance 是"总余量"指标,
//       不是逐日库存水平
// 红线: 需求中出现而台账缺失的原料,库存派生列保持缺失,
//       禁止以零填充(零会掩盖真实断料风险)
// ==========================================

use crate::domain::types::ForecastHorizon;
use crate::domain::{InventoryLedgerEntry, RawMaterialDemand, ReconciliationRow};
use crate::engine::EngineError;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

// ==========================================
// ReconciliationEngine - 供需对账引擎
// ==========================================
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// 构造引擎
    pub fn new() -> Self {
        Self
    }

    /// 对账
    ///
    /// # 参数
    /// - `demand`: 原料日需求(两个视野合并)
    /// - `ledger`: 校验后台账
    ///
    /// # 返回
    /// - Ok(Vec<ReconciliationRow>): 按 (视野, 原料, 日期) 排序,
    ///   带累计需求与滚动余额
    /// - Err(EngineError): 需求输入为空
    ///
    /// # 流程
    /// 1. 取最早预测日
    /// 2. 每个原料取 date <= 最早预测日 的最近台账行(单一静态快照)
    /// 3. 需求行左连快照(缺失原料保持缺失)
    /// 4. 当日缺口 = 期末库存 - 当日需求
    /// 5. 视野 × 原料分组内按日累计需求
    /// 6. 滚动余额 = 期末库存 - 累计需求
    pub fn run(
        &self,
        demand: &[RawMaterialDemand],
        ledger: &[InventoryLedgerEntry],
    ) -> Result<Vec<ReconciliationRow>, EngineError> {
        // === 步骤 1: 最早预测日 ===
        let min_forecast_date = match demand.iter().map(|r| r.date).min() {
            Some(date) => date,
            None => return Err(EngineError::EmptyInput("raw_material_demand".to_string())),
        };

        // === 步骤 2: 静态快照(每原料一行) ===
        let mut snapshot: HashMap<&str, &InventoryLedgerEntry> = HashMap::new();
        for entry in ledger {
            if entry.date > min_forecast_date {
                continue;
            }
            snapshot
                .entry(entry.raw_material.as_str())
                .and_modify(|current| {
                    if entry.date > current.date {
                        *current = entry;
                    }
                })
                .or_insert(entry);
        }

        // === 步骤 3-4: 左连 + 当日缺口 ===
        let mut rows: Vec<ReconciliationRow> = Vec::with_capacity(demand.len());
        let mut missing_materials: BTreeSet<String> = BTreeSet::new();
        for row in demand {
            let entry = snapshot.get(row.raw_material.as_str());
            if entry.is_none() {
                missing_materials.insert(row.raw_material.clone());
            }
            let closing = entry.map(|e| e.closing_inventory);
            rows.push(ReconciliationRow {
                date: row.date,
                raw_material: row.raw_material.clone(),
                material_type: row.material_type.clone(),
                forecast_horizon: row.forecast_horizon,
                material_demand_units: row.material_demand_units,
                inventory_date: entry.map(|e| e.date),
                closing_inventory: closing,
                safety_stock: entry.and_then(|e| e.safety_stock),
                inventory_gap_units: closing.map(|c| c - row.material_demand_units as f64),
                // 累计需求与滚动余额在排序后回填
                cumulative_demand: 0,
                running_inventory_balance: None,
            });
        }
        if !missing_materials.is_empty() {
            warn!(
                materials = ?missing_materials,
                "需求中存在无库存快照的原料,库存派生列保持缺失"
            );
        }

        // === 步骤 5-6: 排序 + 组内累计 ===
        rows.sort_by(|a, b| {
            (a.forecast_horizon, &a.raw_material, a.date).cmp(&(
                b.forecast_horizon,
                &b.raw_material,
                b.date,
            ))
        });

        let mut cumulative: HashMap<(ForecastHorizon, String), i64> = HashMap::new();
        for row in rows.iter_mut() {
            let key = (row.forecast_horizon, row.raw_material.clone());
            let total = cumulative.entry(key).or_insert(0);
            *total += row.material_demand_units;
            row.cumulative_demand = *total;
            row.running_inventory_balance =
                row.closing_inventory.map(|c| c - *total as f64);
        }

        info!(
            rows = rows.len(),
            snapshot_materials = snapshot.len(),
            min_forecast_date = %min_forecast_date,
            "供需对账完成"
        );
        Ok(rows)
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn demand(
        date: (i32, u32, u32),
        material: &str,
        horizon: ForecastHorizon,
        units: i64,
    ) -> RawMaterialDemand {
        RawMaterialDemand {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            raw_material: material.to_string(),
            material_type: "generic".to_string(),
            forecast_horizon: horizon,
            material_demand_units: units,
        }
    }

    fn ledger_entry(date: (i32, u32, u32), material: &str, closing: f64) -> InventoryLedgerEntry {
        InventoryLedgerEntry {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            raw_material: material.to_string(),
            opening_inventory: closing,
            inflow_quantity: 0.0,
            consumed_quantity: 0.0,
            closing_inventory: closing,
            safety_stock: Some(40.0),
            calculated_closing_inventory: closing,
            inventory_validation_status: true,
        }
    }

    #[test]
    fn test_snapshot_is_latest_at_or_before_first_forecast_date() {
        let demand_rows = vec![
            demand((2025, 12, 31), "Leather", ForecastHorizon::Day7, 10),
            demand((2026, 1, 1), "Leather", ForecastHorizon::Day7, 10),
        ];
        let ledger = vec![
            ledger_entry((2025, 12, 20), "Leather", 200.0),
            ledger_entry((2025, 12, 30), "Leather", 150.0),
            // 预测窗口内的台账行不得被选中
            ledger_entry((2026, 1, 1), "Leather", 120.0),
        ];

        let rows = ReconciliationEngine::new().run(&demand_rows, &ledger).unwrap();

        let expected_date = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        for row in &rows {
            assert_eq!(row.inventory_date, Some(expected_date));
            assert_eq!(row.closing_inventory, Some(150.0));
        }
    }

    #[test]
    fn test_snapshot_fixity_across_run() {
        // 30 天需求,快照日期全程不变
        let start = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let demand_rows: Vec<RawMaterialDemand> = (0..30)
            .map(|i| RawMaterialDemand {
                date: start + Duration::days(i),
                raw_material: "Leather".to_string(),
                material_type: "generic".to_string(),
                forecast_horizon: ForecastHorizon::Day30,
                material_demand_units: 5,
            })
            .collect();
        let ledger = vec![ledger_entry((2025, 12, 28), "Leather", 100.0)];

        let rows = ReconciliationEngine::new().run(&demand_rows, &ledger).unwrap();

        let dates: BTreeSet<_> = rows.iter().map(|r| r.inventory_date).collect();
        assert_eq!(dates.len(), 1);
    }

    #[test]
    fn test_cumulative_demand_and_running_balance() {
        let demand_rows = vec![
            demand((2025, 12, 31), "Leather", ForecastHorizon::Day7, 10),
            demand((2026, 1, 1), "Leather", ForecastHorizon::Day7, 20),
            demand((2026, 1, 2), "Leather", ForecastHorizon::Day7, 30),
        ];
        let ledger = vec![ledger_entry((2025, 12, 30), "Leather", 100.0)];

        let rows = ReconciliationEngine::new().run(&demand_rows, &ledger).unwrap();

        assert_eq!(rows[0].cumulative_demand, 10);
        assert_eq!(rows[1].cumulative_demand, 30);
        assert_eq!(rows[2].cumulative_demand, 60);
        assert_eq!(rows[0].running_inventory_balance, Some(90.0));
        assert_eq!(rows[1].running_inventory_balance, Some(70.0));
        assert_eq!(rows[2].running_inventory_balance, Some(40.0));
        // 当日缺口为非累计口径
        assert_eq!(rows[2].inventory_gap_units, Some(70.0));
    }

    #[test]
    fn test_horizons_accumulate_independently() {
        let demand_rows = vec![
            demand((2025, 12, 31), "Leather", ForecastHorizon::Day7, 10),
            demand((2025, 12, 31), "Leather", ForecastHorizon::Day30, 10),
            demand((2026, 1, 1), "Leather", ForecastHorizon::Day30, 10),
        ];
        let ledger = vec![ledger_entry((2025, 12, 30), "Leather", 100.0)];

        let rows = ReconciliationEngine::new().run(&demand_rows, &ledger).unwrap();

        let day7: Vec<_> = rows
            .iter()
            .filter(|r| r.forecast_horizon == ForecastHorizon::Day7)
            .collect();
        let day30: Vec<_> = rows
            .iter()
            .filter(|r| r.forecast_horizon == ForecastHorizon::Day30)
            .collect();
        assert_eq!(day7.last().unwrap().cumulative_demand, 10);
        assert_eq!(day30.last().unwrap().cumulative_demand, 20);
    }

    #[test]
    fn test_missing_material_propagates_missing_not_zero() {
        let demand_rows = vec![demand((2025, 12, 31), "Unknown", ForecastHorizon::Day7, 10)];
        let ledger = vec![ledger_entry((2025, 12, 30), "Leather", 100.0)];

        let rows = ReconciliationEngine::new().run(&demand_rows, &ledger).unwrap();

        assert_eq!(rows[0].inventory_date, None);
        assert_eq!(rows[0].closing_inventory, None);
        assert_eq!(rows[0].safety_stock, None);
        assert_eq!(rows[0].inventory_gap_units, None);
        assert_eq!(rows[0].running_inventory_balance, None);
        // 累计需求不依赖库存,照常累加
        assert_eq!(rows[0].cumulative_demand, 10);
    }

    #[test]
    fn test_empty_demand_fatal() {
        let err = ReconciliationEngine::new().run(&[], &[]).unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput(_)));
    }
}
