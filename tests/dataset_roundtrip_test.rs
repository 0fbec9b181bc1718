// ==========================================
// 文件模式 / 内存模式 一致性集成测试
// ==========================================
// 测试目标: 文件交接(写出快照→读回)与内存直传
//           必须产出逐行一致的结果
// ==========================================

#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use chrono::NaiveDate;
use std::sync::Arc;
use supply_chain_forecast::config::PipelineConfig;
use supply_chain_forecast::dataset::{files, reader, writer};
use supply_chain_forecast::engine::{PipelineInputs, PipelineOrchestrator};
use tempfile::tempdir;
use test_data_builder::{bom_entry, sku_master_entry, InventoryMovementBuilder, SalesSeriesBuilder};

fn build_inputs() -> PipelineInputs {
    let start = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
    let mut sales = SalesSeriesBuilder::new("SKU-A")
        .start(start)
        .days(42)
        .base_units(12)
        .weekly_amplitude(2)
        .build();
    sales.extend(
        SalesSeriesBuilder::new("SKU-A")
            .store("ST02")
            .start(start)
            .days(42)
            .base_units(6)
            .weekly_amplitude(1)
            .build(),
    );
    sales.extend(
        SalesSeriesBuilder::new("SKU-B")
            .start(start)
            .days(42)
            .base_units(20)
            .build(),
    );

    let sku_master = vec![
        sku_master_entry("SKU-A", "P-1"),
        sku_master_entry("SKU-A", "P-2"),
        sku_master_entry("SKU-B", "P-2"),
    ];

    let bom = vec![
        bom_entry("P-1", "Leather", "Hide", 1.5),
        bom_entry("P-1", "Glue", "Chemical", 0.25),
        bom_entry("P-2", "Rubber", "Polymer", 2.0),
    ];

    let snapshot_date = NaiveDate::from_ymd_opt(2025, 12, 28).unwrap();
    let inventory = vec![
        InventoryMovementBuilder::new("Leather", snapshot_date)
            .opening(800.0)
            .consumed(50.0)
            .safety_stock(200.0)
            .build(),
        InventoryMovementBuilder::new("Glue", snapshot_date)
            .opening(120.0)
            .inflow(30.0)
            .consumed(10.0)
            .safety_stock(40.0)
            .build(),
        InventoryMovementBuilder::new("Rubber", snapshot_date)
            .opening(300.0)
            .safety_stock(150.0)
            .build(),
    ];

    PipelineInputs {
        sales,
        sku_master,
        bom,
        inventory,
    }
}

#[test]
fn test_file_mode_matches_in_memory_mode() {
    supply_chain_forecast::logging::init_test();
    let inputs = build_inputs();
    let orchestrator = PipelineOrchestrator::new(Arc::new(PipelineConfig::default()));

    // 内存模式
    let in_memory = orchestrator.run_in_memory(&inputs).unwrap();

    // 文件模式: 写入输入表后全程经快照文件交接
    let dir = tempdir().unwrap();
    let data_dir = dir.path();
    writer::write_sales(&data_dir.join(files::SKU_DAILY_SALES), &inputs.sales).unwrap();
    writer::write_sku_master(&data_dir.join(files::SKU_MASTER), &inputs.sku_master).unwrap();
    writer::write_bom(&data_dir.join(files::PRODUCT_BOM), &inputs.bom).unwrap();
    writer::write_inventory_movements(
        &data_dir.join(files::RAW_MATERIAL_INVENTORY),
        &inputs.inventory,
    )
    .unwrap();

    orchestrator.run_from_files(data_dir).unwrap();

    // 逐表读回比对
    let (forecast, _) =
        reader::read_sku_forecast(&data_dir.join(files::SKU_DAILY_FORECAST)).unwrap();
    assert_eq!(forecast, in_memory.sku_forecast);

    let (allocations, _) =
        reader::read_allocations(&data_dir.join(files::SKU_PRODUCT_ALLOCATION)).unwrap();
    assert_eq!(allocations, in_memory.allocations);

    let (sku_product_demand, _) =
        reader::read_sku_product_demand(&data_dir.join(files::SKU_PRODUCT_DEMAND)).unwrap();
    assert_eq!(sku_product_demand, in_memory.sku_product_demand);

    let (product_demand, _) =
        reader::read_product_demand(&data_dir.join(files::PRODUCT_FORECAST)).unwrap();
    assert_eq!(product_demand, in_memory.product_demand);

    let (bom_expanded, _) =
        reader::read_bom_expanded(&data_dir.join(files::PRODUCT_BOM_EXPANDED)).unwrap();
    assert_eq!(bom_expanded, in_memory.bom_expanded);

    let (raw_material_demand, _) =
        reader::read_raw_material_demand(&data_dir.join(files::RAW_MATERIAL_DEMAND)).unwrap();
    assert_eq!(raw_material_demand, in_memory.raw_material_demand);

    let (ledger, _) =
        reader::read_inventory_ledger(&data_dir.join(files::RAW_MATERIAL_INVENTORY_LEDGER))
            .unwrap();
    assert_eq!(ledger, in_memory.inventory_ledger);

    let (reconciliation, _) =
        reader::read_reconciliation(&data_dir.join(files::RAW_MATERIAL_RECONCILIATION)).unwrap();
    assert_eq!(reconciliation, in_memory.reconciliation);

    // 风险快照为终端输出: 行数一致,标签列逐行一致
    use supply_chain_forecast::dataset::{FileParser, CsvParser};
    let risk_rows = CsvParser
        .parse_to_raw_records(&data_dir.join(files::RAW_MATERIAL_RISK))
        .unwrap();
    assert_eq!(risk_rows.len(), in_memory.risk.len());
    for (raw, record) in risk_rows.iter().zip(&in_memory.risk) {
        assert_eq!(
            raw.get("inventory_risk_flag"),
            Some(&record.inventory_risk_flag.to_string())
        );
    }
}

#[test]
fn test_per_horizon_forecast_snapshots_partition_combined() {
    let inputs = build_inputs();
    let orchestrator = PipelineOrchestrator::new(Arc::new(PipelineConfig::default()));

    let dir = tempdir().unwrap();
    let data_dir = dir.path();
    writer::write_sales(&data_dir.join(files::SKU_DAILY_SALES), &inputs.sales).unwrap();

    use supply_chain_forecast::engine::PipelineStage;
    orchestrator
        .run_stage_from_files(data_dir, PipelineStage::Forecast)
        .unwrap();

    let (day7, _) =
        reader::read_sku_forecast(&data_dir.join(files::SKU_DAILY_FORECAST_7DAY)).unwrap();
    let (day30, _) =
        reader::read_sku_forecast(&data_dir.join(files::SKU_DAILY_FORECAST_30DAY)).unwrap();
    let (combined, _) =
        reader::read_sku_forecast(&data_dir.join(files::SKU_DAILY_FORECAST)).unwrap();

    // 合并快照 = 7day 快照 + 30day 快照
    assert_eq!(combined.len(), day7.len() + day30.len());
    assert!(day7
        .iter()
        .all(|r| r.forecast_horizon == supply_chain_forecast::ForecastHorizon::Day7));
    assert!(day30
        .iter()
        .all(|r| r.forecast_horizon == supply_chain_forecast::ForecastHorizon::Day30));
}
