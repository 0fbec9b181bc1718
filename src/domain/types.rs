// ==========================================
// 供应链需求预测系统 - 领域类型定义
// ==========================================
// 职责: 预测视野/风险等级等核心枚举
// 序列化格式: 与快照文件列值保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 预测视野 (Forecast Horizon)
// ==========================================
// 红线: 标签 "7day"/"30day" 是对外契约,下游看板依赖该值
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ForecastHorizon {
    #[serde(rename = "7day")]
    Day7, // 短期视野(7天)
    #[serde(rename = "30day")]
    Day30, // 长期视野(30天)
}

impl ForecastHorizon {
    /// 视野天数
    pub fn days(&self) -> usize {
        match self {
            ForecastHorizon::Day7 => 7,
            ForecastHorizon::Day30 => 30,
        }
    }

    /// 全部视野(升序)
    pub fn all() -> [ForecastHorizon; 2] {
        [ForecastHorizon::Day7, ForecastHorizon::Day30]
    }

    /// 从快照标签解析
    pub fn parse(label: &str) -> Option<ForecastHorizon> {
        match label.trim() {
            "7day" => Some(ForecastHorizon::Day7),
            "30day" => Some(ForecastHorizon::Day30),
            _ => None,
        }
    }
}

impl fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastHorizon::Day7 => write!(f, "7day"),
            ForecastHorizon::Day30 => write!(f, "30day"),
        }
    }
}

// ==========================================
// 库存风险等级 (Inventory Risk Flag)
// ==========================================
// 红线: 规则按声明顺序判定,首个命中即返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    NoInventoryData,    // 无库存快照
    StockoutRisk,       // 断料风险(累计需求超出库存或库存归零)
    DemandShortfallRisk, // 单日需求超出库存
    LowStockRisk,       // 低于安全库存
    OverstockRisk,      // 超储(显著高于安全库存)
    Normal,             // 正常
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFlag::NoInventoryData => write!(f, "NO_INVENTORY_DATA"),
            RiskFlag::StockoutRisk => write!(f, "STOCKOUT_RISK"),
            RiskFlag::DemandShortfallRisk => write!(f, "DEMAND_SHORTFALL_RISK"),
            RiskFlag::LowStockRisk => write!(f, "LOW_STOCK_RISK"),
            RiskFlag::OverstockRisk => write!(f, "OVERSTOCK_RISK"),
            RiskFlag::Normal => write!(f, "NORMAL"),
        }
    }
}

impl RiskFlag {
    /// 从快照标签解析
    pub fn parse(label: &str) -> Option<RiskFlag> {
        match label.trim() {
            "NO_INVENTORY_DATA" => Some(RiskFlag::NoInventoryData),
            "STOCKOUT_RISK" => Some(RiskFlag::StockoutRisk),
            "DEMAND_SHORTFALL_RISK" => Some(RiskFlag::DemandShortfallRisk),
            "LOW_STOCK_RISK" => Some(RiskFlag::LowStockRisk),
            "OVERSTOCK_RISK" => Some(RiskFlag::OverstockRisk),
            "NORMAL" => Some(RiskFlag::Normal),
            _ => None,
        }
    }

    /// 是否高风险(断料/单日缺口)
    pub fn is_high_risk(&self) -> bool {
        matches!(self, RiskFlag::StockoutRisk | RiskFlag::DemandShortfallRisk)
    }
}
