// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::url_utils::{is_same_origin_with_prefix, resolve_url};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// 链接收集器
///
/// 从搜索结果页中收集课程详情页链接。每个关键词单独调用，不保留跨关键词状态。
pub struct LinkCollector;

impl LinkCollector {
    /// 收集路径以 `prefix` 开头的同源链接
    ///
    /// 链接按页面上首次出现的顺序返回，按完整URL字符串去重。
    /// 没有分页处理，只收集当前渲染结果中的链接。
    ///
    /// # 参数
    ///
    /// * `html_content` - 渲染后的搜索结果页HTML
    /// * `page_url` - 页面URL，用于解析相对链接
    /// * `prefix` - 详情页路径前缀，例如 `/programs/`
    pub fn collect_program_links(html_content: &str, page_url: &Url, prefix: &str) -> Vec<String> {
        let document = Html::parse_document(html_content);
        let selector = match Selector::parse("a[href]") {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(resolved) = resolve_url(page_url, href.trim()) else {
                continue;
            };
            if !is_same_origin_with_prefix(page_url, &resolved, prefix) {
                continue;
            }

            let link = resolved.to_string();
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://course.mytcas.com/search?q=x").unwrap()
    }

    #[test]
    fn test_collects_in_first_seen_order_without_duplicates() {
        let html = r#"
            <html><body>
                <a href="/programs/2">P2</a>
                <a href="/programs/1">P1</a>
                <a href="/universities/9">U</a>
                <a href="/programs/2">P2 again</a>
                <a href="https://course.mytcas.com/programs/3">P3</a>
                <a href="https://elsewhere.example/programs/4">foreign</a>
                <a>no href</a>
            </body></html>
        "#;

        let links = LinkCollector::collect_program_links(html, &page_url(), "/programs/");
        assert_eq!(
            links,
            vec![
                "https://course.mytcas.com/programs/2",
                "https://course.mytcas.com/programs/1",
                "https://course.mytcas.com/programs/3",
            ]
        );
    }

    #[test]
    fn test_no_results_yields_empty() {
        let links = LinkCollector::collect_program_links(
            "<html><body><p>ไม่พบข้อมูล</p></body></html>",
            &page_url(),
            "/programs/",
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_never_returns_duplicates() {
        let html: String = (0..50)
            .map(|i| format!("<a href=\"/programs/{}\">x</a>", i % 7))
            .collect();

        let links = LinkCollector::collect_program_links(&html, &page_url(), "/programs/");
        let unique: HashSet<&String> = links.iter().collect();
        assert_eq!(links.len(), 7);
        assert_eq!(unique.len(), links.len());
    }
}
