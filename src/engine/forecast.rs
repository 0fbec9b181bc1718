// ==========================================
// 供应链需求预测系统 - SKU 日预测引擎
// ==========================================
// 职责: 按 SKU 聚合日销量 → 季节性 ARIMA 拟合 →
//       最大视野一次外推 → 按门店历史份额分摊 → 各视野切片
// 红线: 单 SKU 失败只跳过该 SKU,不中断批次;
//       全部失败才算批次失败
// ==========================================

use crate::config::PipelineConfigReader;
use crate::domain::types::ForecastHorizon;
use crate::domain::{
    ForecastRunSummary, SalesRecord, SkuForecast, SkuForecastFailure, StoreAllocationWeight,
};
use crate::engine::sarima::SarimaModel;
use crate::engine::EngineError;
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// SkuForecastError - 单 SKU 失败原因
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkuForecastError {
    #[error("历史数据不足: 仅 {days} 个历史日,至少需要 {required} 个")]
    InsufficientHistory { days: usize, required: usize },

    #[error("模型拟合失败: {0}")]
    FitFailure(String),
}

// ==========================================
// ForecastRunOutput - 批次输出
// ==========================================
#[derive(Debug, Clone)]
pub struct ForecastRunOutput {
    pub forecasts: Vec<SkuForecast>,           // 全部视野合并(视野主序)
    pub store_weights: Vec<StoreAllocationWeight>, // 门店分摊权重(追溯用)
    pub summary: ForecastRunSummary,           // 批次汇总
}

impl ForecastRunOutput {
    /// 按视野过滤预测行
    pub fn horizon_rows(&self, horizon: ForecastHorizon) -> Vec<SkuForecast> {
        self.forecasts
            .iter()
            .filter(|r| r.forecast_horizon == horizon)
            .cloned()
            .collect()
    }
}

// ==========================================
// SkuForecastEngine - SKU 日预测引擎
// ==========================================
pub struct SkuForecastEngine<C>
where
    C: PipelineConfigReader,
{
    config: Arc<C>,
}

impl<C> SkuForecastEngine<C>
where
    C: PipelineConfigReader,
{
    /// 构造引擎
    ///
    /// # 参数
    /// - `config`: 配置读取器(最少历史天数/拟合控制参数)
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 运行预测批次
    ///
    /// # 参数
    /// - `sales`: 日销售事实表(全历史)
    ///
    /// # 返回
    /// - Ok(ForecastRunOutput): 各视野预测行 + 权重 + 批次汇总
    /// - Err(EngineError): 输入为空 / 全部 SKU 失败 / 失败率达到致命阈值
    ///
    /// # 流程
    /// 1. 确定预测窗口(历史最后一天的次日起)
    /// 2. SKU 日聚合(跨门店合计)
    /// 3. 门店份额权重(门店历史总量 / SKU 历史总量)
    /// 4. 最大视野一次拟合外推,负值截断为 0
    /// 5. 各视野切片 × 门店分摊 × 取整
    pub fn run(&self, sales: &[SalesRecord]) -> Result<ForecastRunOutput, EngineError> {
        let history_end = match sales.iter().map(|r| r.date).max() {
            Some(date) => date,
            None => return Err(EngineError::EmptyInput("sku_daily_sales".to_string())),
        };

        let run_id = Uuid::new_v4().to_string();
        let forecast_start = history_end + Duration::days(1);
        info!(
            run_id = %run_id,
            history_end = %history_end,
            forecast_start = %forecast_start,
            "预测批次开始"
        );

        // === 步骤 1: SKU 日聚合(跨门店) ===
        let sku_daily = aggregate_sku_daily(sales);
        let total_skus = sku_daily.len();

        // === 步骤 2: 门店份额权重 ===
        let store_weights = derive_store_weights(sales);

        // === 步骤 3: 最大视野拟合外推(SKU 间并行,失败隔离) ===
        let max_horizon = ForecastHorizon::all()
            .iter()
            .map(|h| h.days())
            .fold(0, usize::max);
        let min_history_days = self.config.min_history_days();
        let max_iterations = self.config.fit_max_iterations();
        let tolerance = self.config.fit_tolerance();

        let sku_series: Vec<(String, Vec<f64>)> = sku_daily
            .iter()
            .map(|(sku_id, by_date)| {
                // 按日期排序后的观测序列(缺日不补零,与事实表口径一致)
                let series: Vec<f64> = by_date.values().map(|v| *v as f64).collect();
                (sku_id.clone(), series)
            })
            .collect();

        let fit_results: Vec<(String, Result<Vec<f64>, SkuForecastError>)> = sku_series
            .par_iter()
            .map(|(sku_id, series)| {
                let result = forecast_single_sku(
                    series,
                    min_history_days,
                    max_horizon,
                    max_iterations,
                    tolerance,
                );
                (sku_id.clone(), result)
            })
            .collect();

        let mut sku_forecasts: Vec<(String, Vec<f64>)> = Vec::new();
        let mut failures: Vec<SkuForecastFailure> = Vec::new();
        for (sku_id, result) in fit_results {
            match result {
                Ok(values) => sku_forecasts.push((sku_id, values)),
                Err(err) => {
                    warn!(sku_id = %sku_id, %err, "SKU 预测失败,跳过");
                    failures.push(SkuForecastFailure {
                        sku_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let processed = sku_forecasts.len();
        let failed = failures.len();
        info!(processed, failed, total_skus, "SKU 拟合完成");

        if processed == 0 {
            return Err(EngineError::AllForecastsFailed(total_skus));
        }
        let summary = ForecastRunSummary {
            run_id,
            history_end,
            forecast_start,
            total_skus,
            processed,
            failed,
            failures,
        };
        let fatal_ratio = self.config.fit_failure_fatal_ratio();
        if summary.failure_ratio() >= fatal_ratio && failed > 0 {
            return Err(EngineError::FailureRatioExceeded {
                ratio: summary.failure_ratio(),
                threshold: fatal_ratio,
            });
        }

        // === 步骤 4: 各视野切片 × 门店分摊 ===
        let mut forecasts = Vec::new();
        for horizon in ForecastHorizon::all() {
            let rows = build_horizon_rows(&sku_forecasts, &store_weights, forecast_start, horizon);
            debug!(horizon = %horizon, rows = rows.len(), "视野切片完成");
            forecasts.extend(rows);
        }

        Ok(ForecastRunOutput {
            forecasts,
            store_weights: flatten_weights(&store_weights),
            summary,
        })
    }
}

// ==========================================
// 聚合与权重
// ==========================================

/// SKU × 日聚合(跨门店合计),BTreeMap 保证遍历顺序确定
fn aggregate_sku_daily(sales: &[SalesRecord]) -> BTreeMap<String, BTreeMap<NaiveDate, i64>> {
    let mut map: BTreeMap<String, BTreeMap<NaiveDate, i64>> = BTreeMap::new();
    for record in sales {
        *map.entry(record.sku_id.clone())
            .or_default()
            .entry(record.date)
            .or_insert(0) += record.actual_sales_units;
    }
    map
}

/// 门店份额权重: 门店历史总量 / SKU 历史总量
///
/// SKU 历史总量为 0 时全部权重记 0(除零保护)
fn derive_store_weights(sales: &[SalesRecord]) -> BTreeMap<String, Vec<(String, f64)>> {
    let mut store_totals: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for record in sales {
        *store_totals
            .entry(record.sku_id.clone())
            .or_default()
            .entry(record.store_id.clone())
            .or_insert(0) += record.actual_sales_units;
    }

    let mut weights = BTreeMap::new();
    for (sku_id, stores) in store_totals {
        let sku_total: i64 = stores.values().sum();
        let entries: Vec<(String, f64)> = stores
            .into_iter()
            .map(|(store_id, units)| {
                let weight = if sku_total > 0 {
                    units as f64 / sku_total as f64
                } else {
                    0.0
                };
                (store_id, weight)
            })
            .collect();
        weights.insert(sku_id, entries);
    }
    weights
}

fn flatten_weights(weights: &BTreeMap<String, Vec<(String, f64)>>) -> Vec<StoreAllocationWeight> {
    let mut out = Vec::new();
    for (sku_id, stores) in weights {
        for (store_id, weight) in stores {
            out.push(StoreAllocationWeight {
                sku_id: sku_id.clone(),
                store_id: store_id.clone(),
                allocation_weight: *weight,
            });
        }
    }
    out
}

// ==========================================
// 单 SKU 拟合外推
// ==========================================

/// 单 SKU: 数据充分性检查 → 拟合 → 最大视野外推 → 非负截断
fn forecast_single_sku(
    series: &[f64],
    min_history_days: usize,
    max_horizon: usize,
    max_iterations: usize,
    tolerance: f64,
) -> Result<Vec<f64>, SkuForecastError> {
    if series.len() < min_history_days {
        return Err(SkuForecastError::InsufficientHistory {
            days: series.len(),
            required: min_history_days,
        });
    }

    let fitted = SarimaModel::with_options(series.to_vec(), max_iterations, tolerance)
        .fit()
        .map_err(|e| SkuForecastError::FitFailure(e.to_string()))?;

    let forecast = fitted
        .forecast(max_horizon)
        .into_iter()
        .map(|v| v.max(0.0))
        .collect();
    Ok(forecast)
}

// ==========================================
// 视野切片与门店分摊
// ==========================================

/// 取最大视野外推的前 `horizon` 天,按门店权重分摊并取整
fn build_horizon_rows(
    sku_forecasts: &[(String, Vec<f64>)],
    store_weights: &BTreeMap<String, Vec<(String, f64)>>,
    forecast_start: NaiveDate,
    horizon: ForecastHorizon,
) -> Vec<SkuForecast> {
    let mut rows = Vec::new();
    for (sku_id, values) in sku_forecasts {
        let empty = Vec::new();
        let stores = store_weights.get(sku_id).unwrap_or(&empty);
        for (day_idx, daily_units) in values.iter().take(horizon.days()).enumerate() {
            let date = forecast_start + Duration::days(day_idx as i64);
            for (store_id, weight) in stores {
                let store_units = daily_units * weight;
                rows.push(SkuForecast {
                    date,
                    sku_id: sku_id.clone(),
                    store_id: store_id.clone(),
                    forecast_horizon: horizon,
                    forecast_units: store_units.round() as i64,
                });
            }
        }
    }
    rows
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn config() -> Arc<PipelineConfig> {
        Arc::new(PipelineConfig::default())
    }

    /// 构造单门店常数销量历史
    fn constant_sales(sku: &str, store: &str, days: usize, units: i64) -> Vec<SalesRecord> {
        let start = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        (0..days)
            .map(|i| SalesRecord {
                date: start + Duration::days(i as i64),
                sku_id: sku.to_string(),
                store_id: store.to_string(),
                sales_channel: "retail".to_string(),
                actual_sales_units: units,
            })
            .collect()
    }

    #[test]
    fn test_constant_series_single_store() {
        let sales = constant_sales("SKU-A", "ST01", 35, 10);
        let engine = SkuForecastEngine::new(config());
        let output = engine.run(&sales).unwrap();

        // SKU 纳入输出,7 天视野每天预测接近 10,全部分配给唯一门店
        let rows = output.horizon_rows(ForecastHorizon::Day7);
        assert_eq!(rows.len(), 7);
        for row in &rows {
            assert_eq!(row.sku_id, "SKU-A");
            assert_eq!(row.store_id, "ST01");
            assert_eq!(row.forecast_units, 10);
        }
        assert_eq!(output.summary.processed, 1);
        assert_eq!(output.summary.failed, 0);
    }

    #[test]
    fn test_horizon_completeness_and_contiguity() {
        let sales = constant_sales("SKU-A", "ST01", 40, 8);
        let history_end = sales.iter().map(|r| r.date).max().unwrap();
        let engine = SkuForecastEngine::new(config());
        let output = engine.run(&sales).unwrap();

        for horizon in ForecastHorizon::all() {
            let rows = output.horizon_rows(horizon);
            let mut dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
            dates.sort();
            dates.dedup();
            // 日期数恰为视野天数,且从历史次日起连续
            assert_eq!(dates.len(), horizon.days());
            for (i, date) in dates.iter().enumerate() {
                assert_eq!(*date, history_end + Duration::days(1 + i as i64));
            }
        }
    }

    #[test]
    fn test_forecast_non_negative() {
        // 递减序列会外推出负值,应被截断为 0
        let start = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
        let sales: Vec<SalesRecord> = (0..40)
            .map(|i| SalesRecord {
                date: start + Duration::days(i as i64),
                sku_id: "SKU-DOWN".to_string(),
                store_id: "ST01".to_string(),
                sales_channel: "retail".to_string(),
                actual_sales_units: (80 - 2 * i).max(0),
            })
            .collect();

        let engine = SkuForecastEngine::new(config());
        let output = engine.run(&sales).unwrap();
        for row in &output.forecasts {
            assert!(row.forecast_units >= 0);
        }
    }

    #[test]
    fn test_insufficient_history_excluded() {
        let mut sales = constant_sales("SKU-OK", "ST01", 35, 10);
        sales.extend(constant_sales("SKU-SHORT", "ST01", 10, 5));

        let engine = SkuForecastEngine::new(config());
        let output = engine.run(&sales).unwrap();

        assert_eq!(output.summary.processed, 1);
        assert_eq!(output.summary.failed, 1);
        assert_eq!(output.summary.failures[0].sku_id, "SKU-SHORT");
        assert!(output.forecasts.iter().all(|r| r.sku_id == "SKU-OK"));
    }

    #[test]
    fn test_store_allocation_weights() {
        // 两门店 3:1 的历史份额
        let mut sales = constant_sales("SKU-A", "ST01", 36, 30);
        sales.extend(constant_sales("SKU-A", "ST02", 36, 10));

        let engine = SkuForecastEngine::new(config());
        let output = engine.run(&sales).unwrap();

        let rows = output.horizon_rows(ForecastHorizon::Day7);
        let st01: i64 = rows
            .iter()
            .filter(|r| r.store_id == "ST01")
            .map(|r| r.forecast_units)
            .sum();
        let st02: i64 = rows
            .iter()
            .filter(|r| r.store_id == "ST02")
            .map(|r| r.forecast_units)
            .sum();
        // 常数序列日预测 40,按 0.75/0.25 分摊
        assert_eq!(st01, 7 * 30);
        assert_eq!(st02, 7 * 10);
    }

    #[test]
    fn test_all_skus_failed_is_fatal() {
        let sales = constant_sales("SKU-SHORT", "ST01", 5, 10);
        let engine = SkuForecastEngine::new(config());
        let err = engine.run(&sales).unwrap_err();
        assert!(matches!(err, EngineError::AllForecastsFailed(_)));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let engine = SkuForecastEngine::new(config());
        let err = engine.run(&[]).unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput(_)));
    }
}
