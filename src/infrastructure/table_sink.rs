// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::dataset::Dataset;
use crate::domain::models::record_set::RecordSet;
use crate::utils::errors::ExportError;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// 表格输出
///
/// 把记录集写为带表头的 CSV 文件，目标文件总是被整体覆盖。
pub struct TableSink;

impl TableSink {
    /// 导出记录集
    ///
    /// 列为固定列加上所有记录属性标签的并集，缺失的单元格写空字符串。
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 写出的数据行数
    /// * `Err(ExportError)` - 写文件失败
    pub fn export(record_set: &RecordSet, destination: &Path) -> Result<usize, ExportError> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let header = record_set.header();
        let mut writer = csv::Writer::from_writer(File::create(destination)?);
        writer.write_record(&header)?;
        for row in record_set.rows(&header) {
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!(
            path = %destination.display(),
            rows = record_set.len(),
            columns = header.len(),
            "Table exported"
        );
        Ok(record_set.len())
    }

    /// 读回导出的文件，返回表头和所有行
    pub fn load_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), ExportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let header = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok((header, rows))
    }

    /// 读回导出的文件为只读数据集快照
    pub fn load_dataset(path: &Path) -> Result<Dataset, ExportError> {
        let (header, rows) = Self::load_rows(path)?;
        Ok(Dataset::new(header, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::program_record::{Attributes, LabelValuePair, ProgramRecord};

    fn record(keyword: &str, link: &str, pairs: &[(&str, &str)]) -> ProgramRecord {
        let attributes: Attributes = pairs
            .iter()
            .map(|(l, v)| LabelValuePair::new(*l, *v))
            .collect();
        ProgramRecord::new(keyword, Some("มหาวิทยาลัยเกษตรศาสตร์".into()), link, attributes)
    }

    #[test]
    fn test_export_then_reparse_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("programs.csv");

        let mut set = RecordSet::new();
        set.append(record("A", "https://x/programs/1", &[("fee", "21,000"), ("note", "line1\nline2")]));
        set.append(record("B", "https://x/programs/2", &[("campus", "บางเขน \"main\"")]));

        let written = TableSink::export(&set, &path).unwrap();
        assert_eq!(written, 2);

        let (header, rows) = TableSink::load_rows(&path).unwrap();
        assert_eq!(header, set.header());

        let expected: Vec<Vec<String>> = set
            .rows(&header)
            .map(|r| r.into_iter().map(String::from).collect())
            .collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_export_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("programs.csv");

        let mut big = RecordSet::new();
        big.append(record("A", "L1", &[("x", "1")]));
        big.append(record("A", "L2", &[("y", "2")]));
        TableSink::export(&big, &path).unwrap();

        let mut small = RecordSet::new();
        small.append(record("B", "L3", &[]));
        TableSink::export(&small, &path).unwrap();

        let (header, rows) = TableSink::load_rows(&path).unwrap();
        assert_eq!(header, vec!["keyword", "university", "link"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][2], "L3");
    }

    #[test]
    fn test_empty_record_set_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        TableSink::export(&RecordSet::new(), &path).unwrap();
        let dataset = TableSink::load_dataset(&path).unwrap();
        assert_eq!(dataset.columns(), &["keyword", "university", "link"]);
        assert!(dataset.is_empty());
    }
}
