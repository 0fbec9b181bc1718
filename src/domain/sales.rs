// ==========================================
// 供应链需求预测系统 - 销售领域模型
// ==========================================
// 职责: 历史销售事实表与 SKU 主数据
// 红线: 销售表为追加式事实来源,任何阶段不得回写
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// SalesRecord - 日销售记录
// ==========================================
// 用途: 预测与产品构成推断的唯一事实来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,          // 销售日期
    pub sku_id: String,           // SKU 标识
    pub store_id: String,         // 门店标识
    pub sales_channel: String,    // 销售渠道
    pub actual_sales_units: i64,  // 实际销量(件)
}

// ==========================================
// SkuMasterEntry - SKU→产品主数据
// ==========================================
// 用途: 产品构成推断的静态映射(一个 SKU 可对应多个产品)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuMasterEntry {
    pub sku_id: String,     // SKU 标识
    pub product_id: String, // 产品标识
}
