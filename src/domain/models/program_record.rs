// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 关键词列名
pub const KEYWORD_COLUMN: &str = "keyword";
/// 大学列名
pub const UNIVERSITY_COLUMN: &str = "university";
/// 链接列名
pub const LINK_COLUMN: &str = "link";
/// 导出表格的固定列，按顺序位于所有属性列之前
pub const FIXED_COLUMNS: [&str; 3] = [KEYWORD_COLUMN, UNIVERSITY_COLUMN, LINK_COLUMN];

/// 找不到大学名称时使用的占位值
pub const UNIVERSITY_NOT_FOUND: &str = "ไม่พบชื่อมหาวิทยาลัย";

/// 详情页中提取出的一个标签/值对
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValuePair {
    pub label: String,
    pub value: String,
}

impl LabelValuePair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// 有序属性映射
///
/// 保持标签首次出现的顺序；重复标签原位覆盖其值。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    entries: Vec<LabelValuePair>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖一个属性
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|pair| pair.label == label) {
            Some(existing) => existing.value = value,
            None => self.entries.push(LabelValuePair { label, value }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|pair| pair.label == label)
            .map(|pair| pair.value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|pair| pair.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelValuePair> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<LabelValuePair> for Attributes {
    fn from_iter<I: IntoIterator<Item = LabelValuePair>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for pair in iter {
            attributes.insert(pair.label, pair.value);
        }
        attributes
    }
}

/// 课程记录实体
///
/// 一次爬取中为某个关键词的某个详情页生成的一行数据。固定字段之外的
/// 属性集合因页面而异，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    /// 产生该记录的搜索关键词
    pub keyword: String,
    /// 大学名称，缺失时为 [`UNIVERSITY_NOT_FOUND`]
    pub university: String,
    /// 详情页链接
    pub link: String,
    /// 页面上的属性，按出现顺序
    pub attributes: Attributes,
}

impl ProgramRecord {
    pub fn new(
        keyword: impl Into<String>,
        university: Option<String>,
        link: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        let university = university
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNIVERSITY_NOT_FOUND.to_string());
        Self {
            keyword: keyword.into(),
            university,
            link: link.into(),
            attributes,
        }
    }

    /// 按列名取值；固定列优先，缺失的属性返回 `None`
    pub fn cell(&self, column: &str) -> Option<&str> {
        match column {
            KEYWORD_COLUMN => Some(&self.keyword),
            UNIVERSITY_COLUMN => Some(&self.university),
            LINK_COLUMN => Some(&self.link),
            label => self.attributes.get(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_keep_first_position_on_overwrite() {
        let mut attributes = Attributes::new();
        attributes.insert("ชื่อหลักสูตร", "A");
        attributes.insert("วิทยาเขต", "B");
        attributes.insert("ชื่อหลักสูตร", "C");

        let labels: Vec<&str> = attributes.labels().collect();
        assert_eq!(labels, vec!["ชื่อหลักสูตร", "วิทยาเขต"]);
        assert_eq!(attributes.get("ชื่อหลักสูตร"), Some("C"));
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_missing_university_uses_sentinel() {
        let record = ProgramRecord::new("k", None, "https://x/programs/1", Attributes::new());
        assert_eq!(record.university, UNIVERSITY_NOT_FOUND);

        let blank = ProgramRecord::new("k", Some("  ".into()), "https://x/programs/1", Attributes::new());
        assert_eq!(blank.university, UNIVERSITY_NOT_FOUND);
    }

    #[test]
    fn test_cell_lookup() {
        let attributes: Attributes = vec![LabelValuePair::new("fee", "1000")].into_iter().collect();
        let record = ProgramRecord::new("k", Some("U".into()), "L", attributes);

        assert_eq!(record.cell(KEYWORD_COLUMN), Some("k"));
        assert_eq!(record.cell(UNIVERSITY_COLUMN), Some("U"));
        assert_eq!(record.cell(LINK_COLUMN), Some("L"));
        assert_eq!(record.cell("fee"), Some("1000"));
        assert_eq!(record.cell("campus"), None);
    }
}
