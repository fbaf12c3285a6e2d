// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::NavigationError;
use thiserror::Error;

/// 页面提取错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// 标签与值的数量不一致
    #[error("标签与值数量不一致: {labels} 个标签, {values} 个值")]
    SchemaMisalignment { labels: usize, values: usize },
}

/// 表格导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 数据集查询错误类型
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("未知列: {0}")]
    UnknownColumn(String),

    #[error("数据集加载失败: {0}")]
    Load(#[from] ExportError),
}

/// 爬取运行错误类型
///
/// 任意一个未恢复的错误都会中止整个运行
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("导航失败 ({context}): {source}")]
    Navigation {
        context: String,
        #[source]
        source: NavigationError,
    },

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("配置无效: {0}")]
    InvalidConfig(String),
}
