// ==========================================
// 供应链需求预测系统 - 库存台账引擎
// ==========================================
// 职责: 校验已有库存流水,产出带校验标记的台账
// 红线: 只标记不修正;存储值与重算值的取舍由调用方决定,
//       不一致不抛异常(属数据质量信号)
// ==========================================

use crate::domain::{InventoryLedgerEntry, InventoryMovement};
use crate::engine::EngineError;
use tracing::{info, warn};

// 期末库存一致性比较容差(CSV 文本往返的浮点安全边界)
const CLOSING_TOLERANCE: f64 = 1e-6;

// ==========================================
// InventoryLedgerEngine - 库存台账引擎
// ==========================================
pub struct InventoryLedgerEngine;

impl InventoryLedgerEngine {
    /// 构造引擎
    pub fn new() -> Self {
        Self
    }

    /// 构建校验后台账
    ///
    /// # 参数
    /// - `movements`: 库存流水(未排序)
    ///
    /// # 返回
    /// - Ok(Vec<InventoryLedgerEntry>): 按 (原料, 日期) 排序,
    ///   逐行带重算期末与校验标记
    /// - Err(EngineError): 输入为空
    ///
    /// # 说明
    /// 本引擎是读路径: 校验一份已完整的台账,
    /// 而非从种子期初余额链式推算
    pub fn run(
        &self,
        movements: &[InventoryMovement],
    ) -> Result<Vec<InventoryLedgerEntry>, EngineError> {
        if movements.is_empty() {
            return Err(EngineError::EmptyInput("raw_material_inventory".to_string()));
        }

        // === 步骤 1: 按原料、日期排序 ===
        let mut sorted: Vec<&InventoryMovement> = movements.iter().collect();
        sorted.sort_by(|a, b| (&a.raw_material, a.date).cmp(&(&b.raw_material, b.date)));

        // === 步骤 2: 重算期末 + 校验标记 ===
        let mut entries = Vec::with_capacity(sorted.len());
        let mut mismatches = 0usize;
        for movement in sorted {
            let calculated = movement.opening_inventory + movement.inflow_quantity
                - movement.consumed_quantity;
            let consistent =
                (movement.closing_inventory - calculated).abs() <= CLOSING_TOLERANCE;
            if !consistent {
                mismatches += 1;
            }
            entries.push(InventoryLedgerEntry {
                date: movement.date,
                raw_material: movement.raw_material.clone(),
                opening_inventory: movement.opening_inventory,
                inflow_quantity: movement.inflow_quantity,
                consumed_quantity: movement.consumed_quantity,
                closing_inventory: movement.closing_inventory,
                safety_stock: movement.safety_stock,
                calculated_closing_inventory: calculated,
                inventory_validation_status: consistent,
            });
        }

        if mismatches > 0 {
            warn!(mismatches, "台账存在期末库存不一致行,仅标记不修正");
        }
        info!(rows = entries.len(), mismatches, "库存台账校验完成");
        Ok(entries)
    }
}

impl Default for InventoryLedgerEngine {
    fn default() -> Self {
        Self::new()
    }
}
