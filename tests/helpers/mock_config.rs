// ==========================================
// 测试用配置 - 可逐项覆写的 Mock
// ==========================================

use supply_chain_forecast::config::PipelineConfigReader;

pub struct MockConfig {
    pub min_history_days: usize,
    pub mix_window_days: u32,
    pub overstock_multiplier: f64,
    pub fit_max_iterations: usize,
    pub fit_tolerance: f64,
    pub fit_failure_fatal_ratio: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            min_history_days: 30,
            mix_window_days: 30,
            overstock_multiplier: 1.5,
            fit_max_iterations: 500,
            fit_tolerance: 1e-8,
            fit_failure_fatal_ratio: 1.0,
        }
    }
}

impl PipelineConfigReader for MockConfig {
    fn min_history_days(&self) -> usize {
        self.min_history_days
    }

    fn mix_window_days(&self) -> u32 {
        self.mix_window_days
    }

    fn overstock_multiplier(&self) -> f64 {
        self.overstock_multiplier
    }

    fn fit_max_iterations(&self) -> usize {
        self.fit_max_iterations
    }

    fn fit_tolerance(&self) -> f64 {
        self.fit_tolerance
    }

    fn fit_failure_fatal_ratio(&self) -> f64 {
        self.fit_failure_fatal_ratio
    }
}
