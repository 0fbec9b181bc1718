// ==========================================
// 供应链需求预测系统 - 管线编排器
// ==========================================
// 职责: 按依赖顺序串联九个阶段
// 模式: 内存模式(表按引用传递)与文件模式(快照写出后
//       读回再交给下一阶段)必须产出一致结果
// ==========================================

use crate::config::PipelineConfigReader;
use crate::dataset::{files, reader, writer};
use crate::domain::types::ForecastHorizon;
use crate::domain::{
    BomEntry, BomExpandedRow, ForecastRunSummary, InventoryLedgerEntry, InventoryMovement,
    ProductDemand, RawMaterialDemand, ReconciliationRow, RiskRecord, SalesRecord, SkuForecast,
    SkuMasterEntry, SkuProductAllocation, SkuProductDemand,
};
use crate::engine::{
    BomMapper, DemandDisaggregator, DemandExplosionEngine, EngineError, InventoryLedgerEngine,
    ProductMixEngine, ProductNormalizer, ReconciliationEngine, RiskEngine, SkuForecastEngine,
};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

// ==========================================
// PipelineStage - 阶段标识
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Forecast,     // 1. SKU 日预测
    ProductMix,   // 2. 产品构成推断
    Disaggregate, // 3. SKU→产品需求拆解
    Normalize,    // 4. 产品需求归一化
    BomMap,       // 5. BOM 映射
    Explode,      // 6. 需求爆炸
    Ledger,       // 7. 库存台账校验
    Reconcile,    // 8. 供需对账
    Risk,         // 9. 风险分类
}

impl PipelineStage {
    /// 全部阶段(依赖顺序)
    pub fn all() -> [PipelineStage; 9] {
        [
            PipelineStage::Forecast,
            PipelineStage::ProductMix,
            PipelineStage::Disaggregate,
            PipelineStage::Normalize,
            PipelineStage::BomMap,
            PipelineStage::Explode,
            PipelineStage::Ledger,
            PipelineStage::Reconcile,
            PipelineStage::Risk,
        ]
    }

    /// 命令行阶段名
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Forecast => "forecast",
            PipelineStage::ProductMix => "product-mix",
            PipelineStage::Disaggregate => "disaggregate",
            PipelineStage::Normalize => "normalize",
            PipelineStage::BomMap => "bom-map",
            PipelineStage::Explode => "explode",
            PipelineStage::Ledger => "ledger",
            PipelineStage::Reconcile => "reconcile",
            PipelineStage::Risk => "risk",
        }
    }

    /// 从命令行阶段名解析
    pub fn parse(name: &str) -> Option<PipelineStage> {
        PipelineStage::all().into_iter().find(|s| s.name() == name)
    }
}

// ==========================================
// PipelineInputs - 管线输入表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub sales: Vec<SalesRecord>,
    pub sku_master: Vec<SkuMasterEntry>,
    pub bom: Vec<BomEntry>,
    pub inventory: Vec<InventoryMovement>,
}

// ==========================================
// PipelineResult - 管线全量输出
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub forecast_summary: ForecastRunSummary,
    pub sku_forecast: Vec<SkuForecast>,
    pub allocations: Vec<SkuProductAllocation>,
    pub sku_product_demand: Vec<SkuProductDemand>,
    pub product_demand: Vec<ProductDemand>,
    pub bom_expanded: Vec<BomExpandedRow>,
    pub raw_material_demand: Vec<RawMaterialDemand>,
    pub inventory_ledger: Vec<InventoryLedgerEntry>,
    pub reconciliation: Vec<ReconciliationRow>,
    pub risk: Vec<RiskRecord>,
}

// ==========================================
// PipelineOrchestrator - 管线编排器
// ==========================================
pub struct PipelineOrchestrator<C>
where
    C: PipelineConfigReader,
{
    forecaster: SkuForecastEngine<C>,
    mix: ProductMixEngine<C>,
    disaggregator: DemandDisaggregator,
    normalizer: ProductNormalizer,
    bom_mapper: BomMapper,
    explosion: DemandExplosionEngine,
    ledger: InventoryLedgerEngine,
    reconciliation: ReconciliationEngine,
    risk: RiskEngine<C>,
}

impl<C> PipelineOrchestrator<C>
where
    C: PipelineConfigReader,
{
    /// 构造编排器
    ///
    /// # 参数
    /// - `config`: 配置读取器(各引擎共享)
    pub fn new(config: Arc<C>) -> Self {
        Self {
            forecaster: SkuForecastEngine::new(config.clone()),
            mix: ProductMixEngine::new(config.clone()),
            disaggregator: DemandDisaggregator::new(),
            normalizer: ProductNormalizer::new(),
            bom_mapper: BomMapper::new(),
            explosion: DemandExplosionEngine::new(),
            ledger: InventoryLedgerEngine::new(),
            reconciliation: ReconciliationEngine::new(),
            risk: RiskEngine::new(config),
        }
    }

    // ==========================================
    // 内存模式
    // ==========================================

    /// 端到端运行(表按引用传递,不落盘)
    ///
    /// # 参数
    /// - `inputs`: 四张输入表
    ///
    /// # 返回
    /// - Ok(PipelineResult): 全部阶段快照
    /// - Err(EngineError): 任一阶段的致命条件
    pub fn run_in_memory(&self, inputs: &PipelineInputs) -> Result<PipelineResult, EngineError> {
        // === 阶段 1: SKU 日预测 ===
        let forecast_output = self.forecaster.run(&inputs.sales)?;

        // === 阶段 2: 产品构成推断 ===
        let allocations = self.mix.run(&inputs.sales, &inputs.sku_master)?;

        // === 阶段 3: SKU→产品需求拆解 ===
        let sku_product_demand = self
            .disaggregator
            .run(&forecast_output.forecasts, &allocations)?;

        // === 阶段 4: 产品需求归一化 ===
        let product_demand = self.normalizer.run(&sku_product_demand)?;

        // === 阶段 5: BOM 映射 ===
        let bom_expanded = self.bom_mapper.run(&product_demand, &inputs.bom)?;

        // === 阶段 6: 需求爆炸 ===
        let raw_material_demand = self.explosion.run(&bom_expanded)?;

        // === 阶段 7: 库存台账校验 ===
        let inventory_ledger = self.ledger.run(&inputs.inventory)?;

        // === 阶段 8: 供需对账 ===
        let reconciliation = self
            .reconciliation
            .run(&raw_material_demand, &inventory_ledger)?;

        // === 阶段 9: 风险分类 ===
        let risk = self.risk.run(&reconciliation)?;

        info!("管线端到端运行完成");
        Ok(PipelineResult {
            forecast_summary: forecast_output.summary.clone(),
            sku_forecast: forecast_output.forecasts,
            allocations,
            sku_product_demand,
            product_demand,
            bom_expanded,
            raw_material_demand,
            inventory_ledger,
            reconciliation,
            risk,
        })
    }

    // ==========================================
    // 文件模式
    // ==========================================

    /// 端到端运行(文件交接: 每阶段读上游快照,写本阶段快照)
    ///
    /// # 参数
    /// - `data_dir`: 数据集目录
    pub fn run_from_files(&self, data_dir: &Path) -> anyhow::Result<()> {
        for stage in PipelineStage::all() {
            self.run_stage_from_files(data_dir, stage)?;
        }
        info!(data_dir = %data_dir.display(), "管线文件模式运行完成");
        Ok(())
    }

    /// 独立运行单个阶段(读上游快照文件,写本阶段快照文件)
    ///
    /// # 参数
    /// - `data_dir`: 数据集目录
    /// - `stage`: 阶段标识
    pub fn run_stage_from_files(
        &self,
        data_dir: &Path,
        stage: PipelineStage,
    ) -> anyhow::Result<()> {
        info!(stage = stage.name(), "阶段开始");
        match stage {
            PipelineStage::Forecast => {
                let (sales, _) = reader::read_sales(&data_dir.join(files::SKU_DAILY_SALES))
                    .context("读取日销售表")?;
                let output = self.forecaster.run(&sales)?;
                // 按视野分别落盘 + 合并快照(下游消费合并快照)
                writer::write_sku_forecast(
                    &data_dir.join(files::SKU_DAILY_FORECAST_7DAY),
                    &output.horizon_rows(ForecastHorizon::Day7),
                )?;
                writer::write_sku_forecast(
                    &data_dir.join(files::SKU_DAILY_FORECAST_30DAY),
                    &output.horizon_rows(ForecastHorizon::Day30),
                )?;
                writer::write_sku_forecast(
                    &data_dir.join(files::SKU_DAILY_FORECAST),
                    &output.forecasts,
                )?;
            }
            PipelineStage::ProductMix => {
                let (sales, _) = reader::read_sales(&data_dir.join(files::SKU_DAILY_SALES))
                    .context("读取日销售表")?;
                let (master, _) = reader::read_sku_master(&data_dir.join(files::SKU_MASTER))
                    .context("读取 SKU 主数据")?;
                let allocations = self.mix.run(&sales, &master)?;
                writer::write_allocations(
                    &data_dir.join(files::SKU_PRODUCT_ALLOCATION),
                    &allocations,
                )?;
            }
            PipelineStage::Disaggregate => {
                let (forecasts, _) =
                    reader::read_sku_forecast(&data_dir.join(files::SKU_DAILY_FORECAST))
                        .context("读取 SKU 日预测快照")?;
                let (allocations, _) =
                    reader::read_allocations(&data_dir.join(files::SKU_PRODUCT_ALLOCATION))
                        .context("读取分摊权重快照")?;
                let rows = self.disaggregator.run(&forecasts, &allocations)?;
                writer::write_sku_product_demand(
                    &data_dir.join(files::SKU_PRODUCT_DEMAND),
                    &rows,
                )?;
            }
            PipelineStage::Normalize => {
                let (demand, _) =
                    reader::read_sku_product_demand(&data_dir.join(files::SKU_PRODUCT_DEMAND))
                        .context("读取 SKU→产品需求快照")?;
                let rows = self.normalizer.run(&demand)?;
                writer::write_product_demand(&data_dir.join(files::PRODUCT_FORECAST), &rows)?;
            }
            PipelineStage::BomMap => {
                let (demand, _) =
                    reader::read_product_demand(&data_dir.join(files::PRODUCT_FORECAST))
                        .context("读取产品日需求快照")?;
                let (bom, _) = reader::read_bom(&data_dir.join(files::PRODUCT_BOM))
                    .context("读取物料清单")?;
                let rows = self.bom_mapper.run(&demand, &bom)?;
                writer::write_bom_expanded(&data_dir.join(files::PRODUCT_BOM_EXPANDED), &rows)?;
            }
            PipelineStage::Explode => {
                let (expanded, _) =
                    reader::read_bom_expanded(&data_dir.join(files::PRODUCT_BOM_EXPANDED))
                        .context("读取 BOM 展开快照")?;
                let rows = self.explosion.run(&expanded)?;
                writer::write_raw_material_demand(
                    &data_dir.join(files::RAW_MATERIAL_DEMAND),
                    &rows,
                )?;
            }
            PipelineStage::Ledger => {
                let (movements, _) = reader::read_inventory_movements(
                    &data_dir.join(files::RAW_MATERIAL_INVENTORY),
                )
                .context("读取库存流水")?;
                let rows = self.ledger.run(&movements)?;
                writer::write_inventory_ledger(
                    &data_dir.join(files::RAW_MATERIAL_INVENTORY_LEDGER),
                    &rows,
                )?;
            }
            PipelineStage::Reconcile => {
                let (demand, _) =
                    reader::read_raw_material_demand(&data_dir.join(files::RAW_MATERIAL_DEMAND))
                        .context("读取原料日需求快照")?;
                let (ledger, _) = reader::read_inventory_ledger(
                    &data_dir.join(files::RAW_MATERIAL_INVENTORY_LEDGER),
                )
                .context("读取台账快照")?;
                let rows = self.reconciliation.run(&demand, &ledger)?;
                writer::write_reconciliation(
                    &data_dir.join(files::RAW_MATERIAL_RECONCILIATION),
                    &rows,
                )?;
            }
            PipelineStage::Risk => {
                let (rows, _) = reader::read_reconciliation(
                    &data_dir.join(files::RAW_MATERIAL_RECONCILIATION),
                )
                .context("读取对账快照")?;
                let records = self.risk.run(&rows)?;
                writer::write_risk(&data_dir.join(files::RAW_MATERIAL_RISK), &records)?;
            }
        }
        info!(stage = stage.name(), "阶段完成");
        Ok(())
    }
}
