// ==========================================
// 供应链需求预测系统 - 季节性 ARIMA 模型
// ==========================================
// 职责: (1,1,1)(1,1,1,7) 模型的拟合与外推
// 算法: 一阶差分 + 周季节差分 → ARMA 条件平方和(CSS) →
//       Nelder-Mead 单纯形优化 → 递推外推 + 差分还原
// 红线: 给定序列与阶数,结果完全确定(固定初始单纯形,无随机源);
//       不强制平稳性/可逆性约束
// ==========================================

use thiserror::Error;

// 周季节周期
const SEASONAL_PERIOD: usize = 7;

// 双重差分后的最短可拟合长度(两个完整季节周期)
const MIN_DIFFERENCED_LEN: usize = 2 * SEASONAL_PERIOD;

// 参数软边界: CSS 在此范围外直接记为不可行,
// 防止单纯形在爆炸区域游走
const PARAM_BOUND: f64 = 10.0;

// ==========================================
// SarimaError - 模型错误类型
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SarimaError {
    #[error("序列过短: 双重差分后 {len} 点,至少需要 {required} 点")]
    SeriesTooShort { len: usize, required: usize },

    #[error("目标函数不可行: 条件平方和非有限值")]
    NonFiniteObjective,
}

// ==========================================
// SarimaParams - ARMA 参数
// ==========================================
// (1-φB)(1-ΦB⁷)wₜ = (1+θB)(1+ΘB⁷)εₜ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarimaParams {
    pub phi: f64,    // 非季节 AR(1)
    pub theta: f64,  // 非季节 MA(1)
    pub sphi: f64,   // 季节 AR(1)
    pub stheta: f64, // 季节 MA(1)
}

impl SarimaParams {
    fn from_point(x: &[f64; 4]) -> Self {
        Self {
            phi: x[0],
            theta: x[1],
            sphi: x[2],
            stheta: x[3],
        }
    }
}

// ==========================================
// SarimaModel - 模型入口
// ==========================================
pub struct SarimaModel {
    series: Vec<f64>,
    max_iterations: usize,
    tolerance: f64,
}

impl SarimaModel {
    /// 以默认优化参数构造模型
    ///
    /// # 参数
    /// - `series`: 日级原始序列(未差分)
    pub fn new(series: Vec<f64>) -> Self {
        Self::with_options(series, 500, 1e-8)
    }

    /// 以显式优化参数构造模型
    ///
    /// # 参数
    /// - `series`: 日级原始序列
    /// - `max_iterations`: 单纯形最大迭代次数
    /// - `tolerance`: 收敛容差(目标函数相对变化)
    pub fn with_options(series: Vec<f64>, max_iterations: usize, tolerance: f64) -> Self {
        Self {
            series,
            max_iterations,
            tolerance,
        }
    }

    /// 拟合模型
    ///
    /// # 返回
    /// - Ok(FittedSarima): 可用于外推的拟合结果
    /// - Err(SarimaError): 序列过短或目标不可行
    ///
    /// # 说明
    /// 达到最大迭代数时返回当前最优点(与参考实现的
    /// 不强制收敛行为一致),只有不可行目标才视为失败
    pub fn fit(&self) -> Result<FittedSarima, SarimaError> {
        let w = seasonal_difference(&first_difference(&self.series), SEASONAL_PERIOD);

        if w.len() < MIN_DIFFERENCED_LEN {
            return Err(SarimaError::SeriesTooShort {
                len: w.len(),
                required: MIN_DIFFERENCED_LEN,
            });
        }

        let objective = |x: &[f64; 4]| css_objective(&w, &SarimaParams::from_point(x));

        let best = nelder_mead(objective, [0.1, 0.1, 0.1, 0.1], self.max_iterations, self.tolerance);

        if !best.value.is_finite() {
            return Err(SarimaError::NonFiniteObjective);
        }

        let params = SarimaParams::from_point(&best.point);
        let residuals =
            css_residuals(&w, &params).ok_or(SarimaError::NonFiniteObjective)?;

        Ok(FittedSarima {
            series: self.series.clone(),
            differenced: w,
            residuals,
            params,
            css: best.value,
        })
    }
}

// ==========================================
// FittedSarima - 拟合结果
// ==========================================
#[derive(Debug)]
pub struct FittedSarima {
    series: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    params: SarimaParams,
    css: f64,
}

impl FittedSarima {
    /// 拟合参数
    pub fn params(&self) -> SarimaParams {
        self.params
    }

    /// 条件平方和(拟合优度参考)
    pub fn css(&self) -> f64 {
        self.css
    }

    /// 外推 `steps` 步
    ///
    /// # 算法
    /// 1. 差分域递推: 未来扰动取 0
    /// 2. 还原季节差分: ẑ = ŵ + z[t-7]
    /// 3. 还原一阶差分: ŷ = y[t-1] + ẑ
    ///
    /// # 说明
    /// 返回值未截断,可能为负;需求语义的非负截断由调用方负责
    pub fn forecast(&self, steps: usize) -> Vec<f64> {
        let p = &self.params;
        let m = self.differenced.len();

        // 1. 差分域递推
        let mut w_ext = self.differenced.clone();
        let mut e_ext = self.residuals.clone();
        for k in 0..steps {
            let t = m + k;
            let mut pred = p.phi * w_ext[t - 1] + p.sphi * w_ext[t - SEASONAL_PERIOD]
                - p.phi * p.sphi * w_ext[t - SEASONAL_PERIOD - 1];
            pred += p.theta * e_ext[t - 1]
                + p.stheta * e_ext[t - SEASONAL_PERIOD]
                + p.theta * p.stheta * e_ext[t - SEASONAL_PERIOD - 1];
            w_ext.push(pred);
            e_ext.push(0.0);
        }

        // 2. 还原季节差分
        let mut z_ext = first_difference(&self.series);
        for k in 0..steps {
            let idx = z_ext.len();
            let value = w_ext[m + k] + z_ext[idx - SEASONAL_PERIOD];
            z_ext.push(value);
        }

        // 3. 还原一阶差分
        let n = self.series.len();
        let mut level = self.series[n - 1];
        let mut out = Vec::with_capacity(steps);
        for k in 0..steps {
            level += z_ext[n - 1 + k];
            out.push(level);
        }
        out
    }
}

// ==========================================
// 差分算子
// ==========================================

/// 一阶差分: z[i] = y[i+1] - y[i]
fn first_difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// 季节差分: w[j] = z[j+s] - z[j]
fn seasonal_difference(series: &[f64], period: usize) -> Vec<f64> {
    if series.len() <= period {
        return Vec::new();
    }
    (0..series.len() - period)
        .map(|j| series[j + period] - series[j])
        .collect()
}

// ==========================================
// 条件平方和
// ==========================================

/// 残差递推(样本前值取 0)
///
/// wₜ = φw₍ₜ₋₁₎ + Φw₍ₜ₋₇₎ - φΦw₍ₜ₋₈₎
///    + εₜ + θε₍ₜ₋₁₎ + Θε₍ₜ₋₇₎ + θΘε₍ₜ₋₈₎
fn css_residuals(w: &[f64], p: &SarimaParams) -> Option<Vec<f64>> {
    let s = SEASONAL_PERIOD;
    let mut e = vec![0.0; w.len()];
    for t in 0..w.len() {
        let mut pred = 0.0;
        if t >= 1 {
            pred += p.phi * w[t - 1] + p.theta * e[t - 1];
        }
        if t >= s {
            pred += p.sphi * w[t - s] + p.stheta * e[t - s];
        }
        if t >= s + 1 {
            pred += -p.phi * p.sphi * w[t - s - 1] + p.theta * p.stheta * e[t - s - 1];
        }
        e[t] = w[t] - pred;
        if !e[t].is_finite() {
            return None;
        }
    }
    Some(e)
}

fn css_objective(w: &[f64], p: &SarimaParams) -> f64 {
    // 软边界外直接不可行
    if [p.phi, p.theta, p.sphi, p.stheta]
        .iter()
        .any(|v| v.abs() >= PARAM_BOUND)
    {
        return f64::INFINITY;
    }
    match css_residuals(w, p) {
        Some(e) => {
            let css: f64 = e.iter().map(|v| v * v).sum();
            if css.is_finite() {
                css
            } else {
                f64::INFINITY
            }
        }
        None => f64::INFINITY,
    }
}

// ==========================================
// Nelder-Mead 单纯形优化(4 维)
// ==========================================

struct Optimum {
    point: [f64; 4],
    value: f64,
}

/// 标准 Nelder-Mead: 反射/扩张/收缩/整体收缩
///
/// 系数: α=1.0, γ=2.0, ρ=0.5, σ=0.5;初始步长 0.25
fn nelder_mead<F>(mut f: F, x0: [f64; 4], max_iterations: usize, tolerance: f64) -> Optimum
where
    F: FnMut(&[f64; 4]) -> f64,
{
    const ALPHA: f64 = 1.0;
    const GAMMA: f64 = 2.0;
    const RHO: f64 = 0.5;
    const SIGMA: f64 = 0.5;
    const STEP: f64 = 0.25;

    // 初始单纯形: x0 与沿各坐标轴偏移的 4 个点
    let mut simplex: Vec<([f64; 4], f64)> = Vec::with_capacity(5);
    simplex.push((x0, f(&x0)));
    for i in 0..4 {
        let mut x = x0;
        x[i] += STEP;
        simplex.push((x, f(&x)));
    }

    for _ in 0..max_iterations {
        // 按目标值升序
        simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let best = simplex[0].1;
        let worst = simplex[4].1;
        if (worst - best).abs() <= tolerance * (1.0 + best.abs()) {
            break;
        }

        // 除最差点外的质心
        let mut centroid = [0.0; 4];
        for (x, _) in simplex.iter().take(4) {
            for i in 0..4 {
                centroid[i] += x[i] / 4.0;
            }
        }

        // 反射
        let mut reflected = [0.0; 4];
        for i in 0..4 {
            reflected[i] = centroid[i] + ALPHA * (centroid[i] - simplex[4].0[i]);
        }
        let f_reflected = f(&reflected);

        if f_reflected < simplex[0].1 {
            // 扩张
            let mut expanded = [0.0; 4];
            for i in 0..4 {
                expanded[i] = centroid[i] + GAMMA * (reflected[i] - centroid[i]);
            }
            let f_expanded = f(&expanded);
            simplex[4] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
            continue;
        }

        if f_reflected < simplex[3].1 {
            simplex[4] = (reflected, f_reflected);
            continue;
        }

        // 收缩
        let mut contracted = [0.0; 4];
        for i in 0..4 {
            contracted[i] = centroid[i] + RHO * (simplex[4].0[i] - centroid[i]);
        }
        let f_contracted = f(&contracted);
        if f_contracted < simplex[4].1 {
            simplex[4] = (contracted, f_contracted);
            continue;
        }

        // 整体向最优点收缩
        let best_point = simplex[0].0;
        for entry in simplex.iter_mut().skip(1) {
            let mut x = [0.0; 4];
            for i in 0..4 {
                x[i] = best_point[i] + SIGMA * (entry.0[i] - best_point[i]);
            }
            *entry = (x, f(&x));
        }
    }

    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    Optimum {
        point: simplex[0].0,
        value: simplex[0].1,
    }
}
