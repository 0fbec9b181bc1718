// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate};
use supply_chain_forecast::domain::{
    BomEntry, InventoryMovement, SalesRecord, SkuMasterEntry,
};

// ==========================================
// SalesRecord 构建器
// ==========================================

pub struct SalesSeriesBuilder {
    sku_id: String,
    store_id: String,
    sales_channel: String,
    start: NaiveDate,
    days: usize,
    base_units: i64,
    weekly_amplitude: i64,
}

impl SalesSeriesBuilder {
    pub fn new(sku_id: &str) -> Self {
        Self {
            sku_id: sku_id.to_string(),
            store_id: "ST01".to_string(),
            sales_channel: "retail".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            days: 35,
            base_units: 10,
            weekly_amplitude: 0,
        }
    }

    pub fn store(mut self, store_id: &str) -> Self {
        self.store_id = store_id.to_string();
        self
    }

    pub fn start(mut self, date: NaiveDate) -> Self {
        self.start = date;
        self
    }

    pub fn days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn base_units(mut self, units: i64) -> Self {
        self.base_units = units;
        self
    }

    /// 叠加确定性周模式(按星期序号线性增量)
    pub fn weekly_amplitude(mut self, amplitude: i64) -> Self {
        self.weekly_amplitude = amplitude;
        self
    }

    pub fn build(self) -> Vec<SalesRecord> {
        (0..self.days)
            .map(|i| SalesRecord {
                date: self.start + Duration::days(i as i64),
                sku_id: self.sku_id.clone(),
                store_id: self.store_id.clone(),
                sales_channel: self.sales_channel.clone(),
                actual_sales_units: self.base_units + self.weekly_amplitude * (i % 7) as i64,
            })
            .collect()
    }
}

// ==========================================
// 主数据构建辅助
// ==========================================

pub fn sku_master_entry(sku_id: &str, product_id: &str) -> SkuMasterEntry {
    SkuMasterEntry {
        sku_id: sku_id.to_string(),
        product_id: product_id.to_string(),
    }
}

pub fn bom_entry(product_id: &str, raw_material: &str, material_type: &str, rate: f64) -> BomEntry {
    BomEntry {
        product_id: product_id.to_string(),
        raw_material: raw_material.to_string(),
        material_type: material_type.to_string(),
        consumption_per_unit: rate,
    }
}

// ==========================================
// InventoryMovement 构建器
// ==========================================

pub struct InventoryMovementBuilder {
    date: NaiveDate,
    raw_material: String,
    opening_inventory: f64,
    inflow_quantity: f64,
    consumed_quantity: f64,
    closing_inventory: Option<f64>,
    safety_stock: Option<f64>,
}

impl InventoryMovementBuilder {
    pub fn new(raw_material: &str, date: NaiveDate) -> Self {
        Self {
            date,
            raw_material: raw_material.to_string(),
            opening_inventory: 0.0,
            inflow_quantity: 0.0,
            consumed_quantity: 0.0,
            closing_inventory: None,
            safety_stock: None,
        }
    }

    pub fn opening(mut self, units: f64) -> Self {
        self.opening_inventory = units;
        self
    }

    pub fn inflow(mut self, units: f64) -> Self {
        self.inflow_quantity = units;
        self
    }

    pub fn consumed(mut self, units: f64) -> Self {
        self.consumed_quantity = units;
        self
    }

    /// 显式给定存储期末(用于构造不一致行)
    pub fn closing(mut self, units: f64) -> Self {
        self.closing_inventory = Some(units);
        self
    }

    pub fn safety_stock(mut self, units: f64) -> Self {
        self.safety_stock = Some(units);
        self
    }

    pub fn build(self) -> InventoryMovement {
        let consistent_closing =
            self.opening_inventory + self.inflow_quantity - self.consumed_quantity;
        InventoryMovement {
            date: self.date,
            raw_material: self.raw_material,
            opening_inventory: self.opening_inventory,
            inflow_quantity: self.inflow_quantity,
            consumed_quantity: self.consumed_quantity,
            closing_inventory: self.closing_inventory.unwrap_or(consistent_closing),
            safety_stock: self.safety_stock,
        }
    }
}
