// ==========================================
// 供应链需求预测系统 - 数据集层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 数据集层错误类型
#[derive(Error, Debug)]
pub enum DatasetError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("文件写入失败: {path}: {message}")]
    FileWriteError { path: String, message: String },

    // ===== 模式校验错误 =====
    #[error("必需列缺失: 表 {table} 缺少列 {column}")]
    MissingColumn { table: String, column: String },

    #[error("必需输入表为空: {0}")]
    EmptyTable(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
