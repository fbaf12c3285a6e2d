// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 数据集查询
//!
//! 面向看板的只读查询：等值过滤、数值汇总、按组均值、去重取值、计数和最大行。
//! 所有函数都是纯函数，快照显式传入，不存在共享的可变状态。

use crate::domain::models::dataset::Dataset;
use crate::utils::errors::QueryError;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// 数值列汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// 分组均值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    pub count: usize,
}

/// 取值计数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// 将单元格转换为数字；无法解析时返回 `None`
///
/// 去除首尾空白和千位分隔符 `,`，其余内容必须是合法的浮点数。
pub fn parse_numeric(cell: &str) -> Option<f64> {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 按一个或多个列做等值过滤，条件之间为“与”关系
pub fn filter(dataset: &Dataset, criteria: &[(&str, &str)]) -> Result<Dataset, QueryError> {
    let indexed = criteria
        .iter()
        .map(|(column, value)| Ok((dataset.column_index(column)?, *value)))
        .collect::<Result<Vec<_>, QueryError>>()?;

    let rows = dataset
        .rows()
        .iter()
        .filter(|row| indexed.iter().all(|(i, value)| row[*i] == *value))
        .map(Arc::clone)
        .collect();

    Ok(dataset.with_rows(rows))
}

/// 数值列的均值、最小值和最大值；没有可解析的值时返回 `None`
pub fn numeric_summary(dataset: &Dataset, column: &str) -> Result<Option<NumericSummary>, QueryError> {
    let index = dataset.column_index(column)?;
    let values: Vec<f64> = dataset
        .rows()
        .iter()
        .filter_map(|row| parse_numeric(&row[index]))
        .collect();

    if values.is_empty() {
        return Ok(None);
    }

    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(Some(NumericSummary {
        count: values.len(),
        mean: sum / values.len() as f64,
        min,
        max,
    }))
}

/// 按组计算数值列均值，按均值降序排列；没有数值的组不出现
pub fn group_mean(
    dataset: &Dataset,
    group_column: &str,
    value_column: &str,
) -> Result<Vec<GroupMean>, QueryError> {
    let group_index = dataset.column_index(group_column)?;
    let value_index = dataset.column_index(value_column)?;

    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();

    for row in dataset.rows() {
        let Some(value) = parse_numeric(&row[value_index]) else {
            continue;
        };
        let group = row[group_index].as_str();
        let entry = totals.entry(group).or_insert_with(|| {
            order.push(group);
            (0.0, 0)
        });
        entry.0 += value;
        entry.1 += 1;
    }

    let mut means: Vec<GroupMean> = order
        .into_iter()
        .map(|group| {
            let (sum, count) = totals[group];
            GroupMean {
                group: group.to_string(),
                mean: sum / count as f64,
                count,
            }
        })
        .collect();

    // Stable sort keeps first-seen order for equal means.
    means.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    Ok(means)
}

/// 列中的不同取值，按首次出现顺序
pub fn distinct(dataset: &Dataset, column: &str) -> Result<Vec<String>, QueryError> {
    Ok(value_counts_unsorted(dataset, column)?
        .into_iter()
        .map(|vc| vc.value)
        .collect())
}

/// 每个取值的出现次数，按次数降序，次数相同时按首次出现顺序
pub fn value_counts(dataset: &Dataset, column: &str) -> Result<Vec<ValueCount>, QueryError> {
    let mut counts = value_counts_unsorted(dataset, column)?;
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

fn value_counts_unsorted(dataset: &Dataset, column: &str) -> Result<Vec<ValueCount>, QueryError> {
    let index = dataset.column_index(column)?;
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for row in dataset.rows() {
        let value = row[index].as_str();
        match positions.get(value) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    Ok(counts)
}

/// 数值列最大的一行；多行并列时取第一行
pub fn max_by(dataset: &Dataset, column: &str) -> Result<Option<Arc<[String]>>, QueryError> {
    let index = dataset.column_index(column)?;
    let mut best: Option<(f64, &Arc<[String]>)> = None;

    for row in dataset.rows() {
        if let Some(value) = parse_numeric(&row[index]) {
            if best.map_or(true, |(current, _)| value > current) {
                best = Some((value, row));
            }
        }
    }

    Ok(best.map(|(_, row)| Arc::clone(row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let columns = ["keyword", "university", "link", "ประเภทหลักสูตร", "fee"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            vec!["A", "U1", "L1", "ภาษาไทย ปกติ", "1000"],
            vec!["A", "U2", "L2", "นานาชาติ", "3000"],
            vec!["B", "U1", "L3", "ภาษาไทย ปกติ", "2000"],
            vec!["B", "U3", "L4", "ภาษาไทย ปกติ", "n/a"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();
        Dataset::new(columns, rows)
    }

    #[test]
    fn test_mean_fee_is_exact() {
        let summary = numeric_summary(&dataset(), "fee").unwrap().unwrap();
        assert_eq!(summary.mean, 2000.0);
        assert_eq!(summary.min, 1000.0);
        assert_eq!(summary.max, 3000.0);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_filter_by_university_matches_manual_count() {
        let data = dataset();
        let filtered = filter(&data, &[("university", "U1")]).unwrap();

        let manual = data.rows().iter().filter(|r| r[1] == "U1").count();
        assert_eq!(filtered.len(), manual);
        assert!(filtered.rows().iter().all(|r| r[1] == "U1"));
    }

    #[test]
    fn test_filter_multiple_columns_and_unknown_column() {
        let data = dataset();
        let filtered = filter(&data, &[("university", "U1"), ("keyword", "B")]).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0][2], "L3");

        assert!(matches!(
            filter(&data, &[("campus", "x")]),
            Err(QueryError::UnknownColumn(c)) if c == "campus"
        ));
    }

    #[test]
    fn test_group_mean_sorted_descending() {
        let means = group_mean(&dataset(), "university", "fee").unwrap();
        let groups: Vec<&str> = means.iter().map(|m| m.group.as_str()).collect();
        assert_eq!(groups, vec!["U2", "U1"]);
        assert_eq!(means[1].mean, 1500.0);
        assert_eq!(means[1].count, 2);
    }

    #[test]
    fn test_distinct_and_value_counts() {
        let data = dataset();
        assert_eq!(distinct(&data, "university").unwrap(), vec!["U1", "U2", "U3"]);

        let counts = value_counts(&data, "ประเภทหลักสูตร").unwrap();
        assert_eq!(counts[0], ValueCount { value: "ภาษาไทย ปกติ".into(), count: 3 });
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_max_by_picks_largest_numeric() {
        let row = max_by(&dataset(), "fee").unwrap().unwrap();
        assert_eq!(row[2], "L2");
    }

    #[test]
    fn test_parse_numeric_coercion() {
        assert_eq!(parse_numeric(" 21,000 "), Some(21000.0));
        assert_eq!(parse_numeric("1.5"), Some(1.5));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("ไม่ระบุ"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn test_empty_numeric_column() {
        let data = filter(&dataset(), &[("university", "U3")]).unwrap();
        assert_eq!(numeric_summary(&data, "fee").unwrap(), None);
        assert!(group_mean(&data, "university", "fee").unwrap().is_empty());
        assert!(max_by(&data, "fee").unwrap().is_none());
    }
}
