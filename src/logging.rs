// ==========================================
// 供应链需求预测系统 - 日志系统
// ==========================================
// 职责: tracing 订阅器初始化
// 口径: 各阶段以 info 输出行数统计,以 warn 输出
//       丢弃/缺口计数,失败明细逐条 warn
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

// 默认过滤级别(RUST_LOG 未设置时)
const DEFAULT_FILTER: &str = "info";

/// 初始化批处理进程的日志系统
///
/// # 环境变量
/// - RUST_LOG: 级别过滤器,如 RUST_LOG=supply_chain_forecast=debug
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统(debug 级别,写入测试捕获器)
///
/// 重复调用安全: 后续调用为空操作
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
