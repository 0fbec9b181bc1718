// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成管线四张输入表的 CSV 测试数据集
// 输出: tests/fixtures/datasets/*.csv(或命令行指定目录)
// 说明: 全部数据确定性生成(周末抬升的周模式),无随机源
// ==========================================

use chrono::{Duration, NaiveDate};
use std::path::PathBuf;
use supply_chain_forecast::dataset::{files, writer};
use supply_chain_forecast::domain::{BomEntry, InventoryMovement, SalesRecord, SkuMasterEntry};

// 历史窗口: 2025-11-01 起 60 天
const HISTORY_DAYS: usize = 60;

const SKUS: &[(&str, i64)] = &[("SKU-1001", 24), ("SKU-1002", 12), ("SKU-1003", 40)];
const STORES: &[(&str, i64)] = &[("ST-NORTH", 3), ("ST-SOUTH", 1)];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/datasets"));
    std::fs::create_dir_all(&out_dir)?;

    let start = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();

    // === 日销售表: 周模式 + 门店份额 ===
    let mut sales = Vec::new();
    for (sku_id, base) in SKUS {
        for (store_id, share) in STORES {
            for i in 0..HISTORY_DAYS {
                // 周内波动: 周末(第 5/6 日)抬升
                let weekday_lift = match i % 7 {
                    5 => 6,
                    6 => 4,
                    _ => 0,
                };
                let units = (base + weekday_lift) * share;
                sales.push(SalesRecord {
                    date: start + Duration::days(i as i64),
                    sku_id: (*sku_id).to_string(),
                    store_id: (*store_id).to_string(),
                    sales_channel: "retail".to_string(),
                    actual_sales_units: units,
                });
            }
        }
    }
    writer::write_sales(&out_dir.join(files::SKU_DAILY_SALES), &sales)?;

    // === SKU→产品主数据 ===
    let sku_master = vec![
        entry("SKU-1001", "P-BOOT"),
        entry("SKU-1002", "P-BOOT"),
        entry("SKU-1002", "P-SANDAL"),
        entry("SKU-1003", "P-SANDAL"),
    ];
    writer::write_sku_master(&out_dir.join(files::SKU_MASTER), &sku_master)?;

    // === 物料清单 ===
    let bom = vec![
        bom("P-BOOT", "Leather", "Hide", 2.5),
        bom("P-BOOT", "Rubber", "Polymer", 1.0),
        bom("P-BOOT", "Thread", "Textile", 4.0),
        bom("P-SANDAL", "Rubber", "Polymer", 1.5),
        bom("P-SANDAL", "Strap", "Textile", 2.0),
    ];
    writer::write_bom(&out_dir.join(files::PRODUCT_BOM), &bom)?;

    // === 库存流水: 每原料 10 天链式台账 ===
    let ledger_start = start + Duration::days((HISTORY_DAYS - 10) as i64);
    let mut inventory = Vec::new();
    for (material, opening0, inflow, consumed, safety) in [
        ("Leather", 4000.0, 120.0, 150.0, 1500.0),
        ("Rubber", 2500.0, 80.0, 90.0, 800.0),
        ("Thread", 6000.0, 0.0, 200.0, 2000.0),
        ("Strap", 900.0, 40.0, 60.0, 400.0),
    ] {
        let mut opening = opening0;
        for i in 0..10 {
            let closing = opening + inflow - consumed;
            inventory.push(InventoryMovement {
                date: ledger_start + Duration::days(i),
                raw_material: material.to_string(),
                opening_inventory: opening,
                inflow_quantity: inflow,
                consumed_quantity: consumed,
                closing_inventory: closing,
                safety_stock: Some(safety),
            });
            opening = closing;
        }
    }
    writer::write_inventory_movements(&out_dir.join(files::RAW_MATERIAL_INVENTORY), &inventory)?;

    println!("测试数据集已生成: {}", out_dir.display());
    println!("  销售行: {}", sales.len());
    println!("  主数据行: {}", sku_master.len());
    println!("  BOM 行: {}", bom.len());
    println!("  库存流水行: {}", inventory.len());
    Ok(())
}

fn entry(sku_id: &str, product_id: &str) -> SkuMasterEntry {
    SkuMasterEntry {
        sku_id: sku_id.to_string(),
        product_id: product_id.to_string(),
    }
}

fn bom(product_id: &str, raw_material: &str, material_type: &str, rate: f64) -> BomEntry {
    BomEntry {
        product_id: product_id.to_string(),
        raw_material: raw_material.to_string(),
        material_type: material_type.to_string(),
        consumption_per_unit: rate,
    }
}
