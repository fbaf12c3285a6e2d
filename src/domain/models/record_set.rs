// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::program_record::{ProgramRecord, FIXED_COLUMNS};
use std::collections::HashSet;

/// 一次运行的全部记录
///
/// 只追加；列结构不在爬取过程中维护，导出时由 [`RecordSet::union_schema`] 计算。
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<ProgramRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ProgramRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ProgramRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[ProgramRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 所有记录中出现过的属性标签，按首次出现顺序去重
    pub fn union_schema(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut schema = Vec::new();
        for label in self.records.iter().flat_map(|r| r.attributes.labels()) {
            if seen.insert(label) {
                schema.push(label.to_string());
            }
        }
        schema
    }

    /// 固定列加上属性列的完整表头
    pub fn header(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.union_schema())
            .collect()
    }

    /// 按给定表头展开为字符串行，缺失的属性为空字符串
    pub fn rows<'a>(&'a self, header: &'a [String]) -> impl Iterator<Item = Vec<&'a str>> + 'a {
        self.records.iter().map(move |record| {
            header
                .iter()
                .map(|column| record.cell(column).unwrap_or(""))
                .collect()
        })
    }
}

impl FromIterator<ProgramRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = ProgramRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
