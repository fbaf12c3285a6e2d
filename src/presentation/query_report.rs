// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 看板报告
//!
//! 把数据集查询组合成一份报告：费用汇总、各大学平均费用、课程类型分布和最贵的课程。
//! 导出表中缺少费用或类型列时，对应部分为空而不是报错。

use crate::config::settings::DashboardSettings;
use crate::domain::models::dataset::Dataset;
use crate::domain::models::program_record::LINK_COLUMN;
use crate::domain::services::dataset_query::{self, GroupMean, NumericSummary, ValueCount};
use crate::utils::errors::QueryError;
use serde::Serialize;
use std::fmt;

/// 最贵课程
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProgram {
    pub university: String,
    pub program: Option<String>,
    pub campus: Option<String>,
    pub fee: String,
    pub link: Option<String>,
}

/// 一次查询的完整报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// 过滤后的行数
    pub rows: usize,
    pub universities: usize,
    pub fee_summary: Option<NumericSummary>,
    pub fee_by_university: Vec<GroupMean>,
    pub program_types: Vec<ValueCount>,
    pub most_expensive: Option<TopProgram>,
}

impl DashboardReport {
    /// 对已过滤的数据集生成报告
    pub fn build(dataset: &Dataset, columns: &DashboardSettings) -> Result<Self, QueryError> {
        let has = |column: &str| dataset.columns().iter().any(|c| c == column);
        let fee = columns.fee_column.as_str();
        let university = columns.university_column.as_str();

        let universities = dataset_query::distinct(dataset, university)?.len();

        let (fee_summary, fee_by_university, most_expensive) = if has(fee) {
            let top = dataset_query::max_by(dataset, fee)?;
            let cell = |row: &[String], column: &str| {
                dataset
                    .column_index(column)
                    .ok()
                    .map(|i| row[i].clone())
            };
            let most_expensive = top.map(|row| TopProgram {
                university: cell(&row[..], university).unwrap_or_default(),
                program: cell(&row[..], &columns.program_name_column),
                campus: cell(&row[..], &columns.campus_column),
                fee: cell(&row[..], fee).unwrap_or_default(),
                link: cell(&row[..], LINK_COLUMN),
            });
            (
                dataset_query::numeric_summary(dataset, fee)?,
                dataset_query::group_mean(dataset, university, fee)?,
                most_expensive,
            )
        } else {
            (None, Vec::new(), None)
        };

        let program_types = if has(&columns.program_type_column) {
            dataset_query::value_counts(dataset, &columns.program_type_column)?
        } else {
            Vec::new()
        };

        Ok(Self {
            rows: dataset.len(),
            universities,
            fee_summary,
            fee_by_university,
            program_types,
            most_expensive,
        })
    }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Programs: {}", self.rows)?;
        writeln!(f, "Universities: {}", self.universities)?;

        match &self.fee_summary {
            Some(s) => writeln!(
                f,
                "Fee per term: mean {:.2}, min {:.2}, max {:.2} ({} priced)",
                s.mean, s.min, s.max, s.count
            )?,
            None => writeln!(f, "Fee per term: no numeric values")?,
        }

        if !self.fee_by_university.is_empty() {
            writeln!(f, "\nAverage fee by university:")?;
            for g in &self.fee_by_university {
                writeln!(f, "  {:<50} {:>12.2} ({})", g.group, g.mean, g.count)?;
            }
        }

        if !self.program_types.is_empty() {
            writeln!(f, "\nProgram types:")?;
            for v in &self.program_types {
                writeln!(f, "  {:<50} {:>6}", v.value, v.count)?;
            }
        }

        if let Some(top) = &self.most_expensive {
            writeln!(
                f,
                "\nMost expensive: {} / {} / {} ({})",
                top.university,
                top.program.as_deref().unwrap_or("-"),
                top.campus.as_deref().unwrap_or("-"),
                top.fee
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;

    fn columns() -> DashboardSettings {
        Settings::from_defaults().unwrap().dashboard
    }

    fn dataset(with_fee: bool) -> Dataset {
        let mut header = vec![
            "keyword",
            "university",
            "link",
            "ชื่อหลักสูตร",
            "ประเภทหลักสูตร",
            "วิทยาเขต",
        ];
        if with_fee {
            header.push("ค่าใช้จ่ายต่อเทอม");
        }
        let rows = vec![
            vec!["A", "U1", "L1", "P1", "ภาษาไทย ปกติ", "บางเขน", "1,000"],
            vec!["A", "U2", "L2", "P2", "นานาชาติ", "พญาไท", "90,000"],
            vec!["B", "U1", "L3", "P3", "ภาษาไทย ปกติ", "กำแพงแสน", "2,000"],
        ];
        Dataset::new(
            header.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_report_from_full_table() {
        let report = DashboardReport::build(&dataset(true), &columns()).unwrap();

        assert_eq!(report.rows, 3);
        assert_eq!(report.universities, 2);
        assert_eq!(report.fee_summary.unwrap().max, 90_000.0);
        assert_eq!(report.fee_by_university[0].group, "U2");
        assert_eq!(report.program_types[0].count, 2);

        let text = report.to_string();
        let top = report.most_expensive.unwrap();
        assert_eq!(top.university, "U2");
        assert_eq!(top.program.as_deref(), Some("P2"));
        assert_eq!(top.campus.as_deref(), Some("พญาไท"));
        assert_eq!(top.link.as_deref(), Some("L2"));
        assert!(text.contains("Most expensive: U2 / P2 / พญาไท (90,000)"));
    }

    #[test]
    fn test_report_without_fee_column() {
        let report = DashboardReport::build(&dataset(false), &columns()).unwrap();

        assert!(report.fee_summary.is_none());
        assert!(report.fee_by_university.is_empty());
        assert!(report.most_expensive.is_none());
        assert_eq!(report.program_types.len(), 2);
        assert!(report.to_string().contains("no numeric values"));
    }
}
