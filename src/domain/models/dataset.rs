// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::QueryError;
use std::sync::Arc;

/// 导出表格的只读快照
///
/// 启动时加载一次，之后只通过查询函数读取。行数据以 `Arc` 共享，
/// 过滤得到的新快照不复制原始单元格。
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Arc<[String]>,
    rows: Vec<Arc<[String]>>,
}

impl Dataset {
    /// 由表头和行构建快照；短行以空字符串补齐，长行截断到表头宽度
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                Arc::from(row)
            })
            .collect();
        Self {
            columns: Arc::from(columns),
            rows,
        }
    }

    pub(crate) fn with_rows(&self, rows: Vec<Arc<[String]>>) -> Self {
        Self {
            columns: Arc::clone(&self.columns),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Arc<[String]>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列名对应的下标
    pub fn column_index(&self, column: &str) -> Result<usize, QueryError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| QueryError::UnknownColumn(column.to_string()))
    }
}
