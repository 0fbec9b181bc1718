// ==========================================
// SkuForecastEngine 引擎集成测试
// ==========================================
// 测试目标: 配置阈值对批次行为的影响
// 覆盖范围: 历史天数阈值 / 致命失败率阈值 / 失败明细
// ==========================================

#[path = "helpers/mock_config.rs"]
mod mock_config;
#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use mock_config::MockConfig;
use std::sync::Arc;
use supply_chain_forecast::engine::{EngineError, SkuForecastEngine};
use test_data_builder::SalesSeriesBuilder;

#[test]
fn test_min_history_days_override() {
    // 默认阈值(30)下 25 天历史会被排除;放宽到 25 后纳入
    let sales = SalesSeriesBuilder::new("SKU-A").days(25).build();

    let strict = SkuForecastEngine::new(Arc::new(MockConfig::default()));
    let err = strict.run(&sales).unwrap_err();
    assert!(matches!(err, EngineError::AllForecastsFailed(1)));

    let relaxed = SkuForecastEngine::new(Arc::new(MockConfig {
        min_history_days: 25,
        ..MockConfig::default()
    }));
    let output = relaxed.run(&sales).unwrap();
    assert_eq!(output.summary.processed, 1);
}

#[test]
fn test_failure_ratio_threshold_fatal() {
    // 两个 SKU,一个历史不足: 失败率 0.5
    let mut sales = SalesSeriesBuilder::new("SKU-OK").days(35).build();
    sales.extend(SalesSeriesBuilder::new("SKU-SHORT").days(10).build());

    // 阈值 1.0: 批次存活,失败进入明细
    let tolerant = SkuForecastEngine::new(Arc::new(MockConfig::default()));
    let output = tolerant.run(&sales).unwrap();
    assert_eq!(output.summary.processed, 1);
    assert_eq!(output.summary.failed, 1);
    assert_eq!(output.summary.failures.len(), 1);
    assert_eq!(output.summary.failures[0].sku_id, "SKU-SHORT");

    // 阈值 0.5: 同样的输入变为批次致命
    let strict = SkuForecastEngine::new(Arc::new(MockConfig {
        fit_failure_fatal_ratio: 0.5,
        ..MockConfig::default()
    }));
    let err = strict.run(&sales).unwrap_err();
    assert!(matches!(err, EngineError::FailureRatioExceeded { .. }));
}

#[test]
fn test_failure_details_preserved_per_sku() {
    let mut sales = SalesSeriesBuilder::new("SKU-OK").days(40).build();
    sales.extend(SalesSeriesBuilder::new("SKU-SHORT-1").days(5).build());
    sales.extend(SalesSeriesBuilder::new("SKU-SHORT-2").days(8).build());

    let engine = SkuForecastEngine::new(Arc::new(MockConfig::default()));
    let output = engine.run(&sales).unwrap();

    assert_eq!(output.summary.total_skus, 3);
    assert_eq!(output.summary.failed, 2);
    let failed_skus: Vec<&str> = output
        .summary
        .failures
        .iter()
        .map(|f| f.sku_id.as_str())
        .collect();
    assert!(failed_skus.contains(&"SKU-SHORT-1"));
    assert!(failed_skus.contains(&"SKU-SHORT-2"));
    // 失败原因可读(进入日志与批次汇总)
    assert!(output.summary.failures.iter().all(|f| !f.reason.is_empty()));
}
