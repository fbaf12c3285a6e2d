// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::program_record::{
    Attributes, LabelValuePair, ProgramRecord, FIXED_COLUMNS,
};
use crate::utils::errors::ExtractionError;
use crate::utils::url_utils::{is_same_origin_with_prefix, resolve_url};
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

/// 单个详情页的提取结果
#[derive(Debug, Clone)]
pub struct Extraction {
    /// 生成的记录
    pub record: ProgramRecord,
    /// 标签与值数量不一致时的错误；此时只保留对齐的前缀
    pub misalignment: Option<ExtractionError>,
}

/// 详情页提取器
///
/// 从渲染后的详情页中读取大学名称和第一个 `<dl>` 中的标签/值对。
/// 缺失的可选元素不会导致错误。
pub struct PageExtractor {
    university_prefix: String,
    anchor: Selector,
    definition_list: Selector,
    term: Selector,
    description: Selector,
}

impl PageExtractor {
    pub fn new(university_prefix: impl Into<String>) -> Self {
        // Static selectors, parsing cannot fail.
        Self {
            university_prefix: university_prefix.into(),
            anchor: Selector::parse("a[href]").expect("static selector"),
            definition_list: Selector::parse("dl").expect("static selector"),
            term: Selector::parse("dt").expect("static selector"),
            description: Selector::parse("dd").expect("static selector"),
        }
    }

    /// 解析详情页并生成记录
    ///
    /// # 参数
    ///
    /// * `keyword` - 产生该链接的搜索关键词
    /// * `link` - 详情页URL
    /// * `html_content` - 渲染后的页面HTML
    pub fn extract(&self, keyword: &str, link: &str, html_content: &str) -> Extraction {
        let document = Html::parse_document(html_content);
        let page_url = Url::parse(link).ok();

        let university = self.extract_university(&document, page_url.as_ref());

        let (pairs, misalignment) = match document.select(&self.definition_list).next() {
            Some(block) => self.extract_pairs(block),
            None => (Vec::new(), None),
        };

        if let Some(err) = &misalignment {
            warn!(keyword, link, error = %err, "Definition list misaligned, unmatched tail skipped");
        }

        let attributes = pairs
            .into_iter()
            .filter(|pair| {
                let reserved = FIXED_COLUMNS.contains(&pair.label.as_str());
                if reserved {
                    warn!(keyword, link, label = %pair.label, "Attribute label shadows a fixed column, dropped");
                }
                !reserved
            })
            .collect::<Attributes>();

        Extraction {
            record: ProgramRecord::new(keyword, university, link, attributes),
            misalignment,
        }
    }

    /// 第一个指向大学页的链接文本
    fn extract_university(&self, document: &Html, page_url: Option<&Url>) -> Option<String> {
        document
            .select(&self.anchor)
            .find(|element| {
                let Some(href) = element.value().attr("href") else {
                    return false;
                };
                match page_url {
                    Some(base) => resolve_url(base, href.trim())
                        .map(|target| is_same_origin_with_prefix(base, &target, &self.university_prefix))
                        .unwrap_or(false),
                    None => href.starts_with(&self.university_prefix),
                }
            })
            .map(stripped_text)
            .filter(|name| !name.is_empty())
    }

    fn extract_pairs(&self, block: ElementRef<'_>) -> (Vec<LabelValuePair>, Option<ExtractionError>) {
        let labels: Vec<String> = block.select(&self.term).map(stripped_text).collect();
        let values: Vec<String> = block.select(&self.description).map(stripped_text).collect();

        match pair_labels_with_values(&labels, &values) {
            Ok(pairs) => (pairs, None),
            Err(err) => {
                let aligned = labels
                    .into_iter()
                    .zip(values)
                    .map(|(label, value)| LabelValuePair { label, value })
                    .collect();
                (aligned, Some(err))
            }
        }
    }
}

/// 按位置配对标签与值
///
/// 两个序列长度必须一致，否则返回 [`ExtractionError::SchemaMisalignment`]。
pub fn pair_labels_with_values(
    labels: &[String],
    values: &[String],
) -> Result<Vec<LabelValuePair>, ExtractionError> {
    if labels.len() != values.len() {
        return Err(ExtractionError::SchemaMisalignment {
            labels: labels.len(),
            values: values.len(),
        });
    }
    Ok(labels
        .iter()
        .zip(values)
        .map(|(label, value)| LabelValuePair::new(label.as_str(), value.as_str()))
        .collect())
}

/// 每个文本节点去除首尾空白后拼接，忽略空节点
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
