// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::record_set::RecordSet;
use crate::domain::services::link_collector::LinkCollector;
use crate::domain::services::page_extractor::{Extraction, PageExtractor};
use crate::engines::traits::{NavigationError, NavigationSession, ReadyCondition};
use crate::infrastructure::table_sink::TableSink;
use crate::utils::errors::CrawlError;
use crate::utils::retry_policy::RetryPolicy;
use futures::{stream, StreamExt, TryStreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

/// 爬取计划
///
/// 一次运行所需的全部参数，通常由 [`Settings`] 生成。
#[derive(Debug, Clone)]
pub struct CrawlPlan {
    /// 搜索页URL
    pub search_url: String,
    /// 按顺序处理的关键词
    pub keywords: Vec<String>,
    /// 搜索输入框选择器
    pub input_selector: String,
    /// 详情页路径前缀
    pub program_prefix: String,
    /// 大学页路径前缀
    pub university_prefix: String,
    /// 搜索结果就绪条件
    pub results_ready: ReadyCondition,
    /// 详情页就绪条件
    pub detail_ready: ReadyCondition,
    /// 详情页并发上限
    pub concurrency: usize,
    /// 相邻两次详情页请求开始之间的最小间隔（跨所有并发槽位）
    pub politeness_delay: Duration,
    /// 导出路径
    pub destination: PathBuf,
    /// 每个关键词完成后写出检查点
    pub checkpoint_each_keyword: bool,
}

impl CrawlPlan {
    pub fn from_settings(settings: &Settings) -> Self {
        let crawl = &settings.crawl;
        let ready = ReadyCondition {
            selector: None,
            baseline: None,
            timeout: Duration::from_millis(crawl.ready_timeout_ms),
            initial_interval: Duration::from_millis(crawl.ready_poll_initial_ms),
            max_interval: Duration::from_millis(crawl.ready_poll_max_ms),
        };

        Self {
            search_url: crawl.base_url.clone(),
            keywords: crawl.keywords.clone(),
            input_selector: crawl.search_input_selector.clone(),
            program_prefix: crawl.program_path_prefix.clone(),
            university_prefix: crawl.university_path_prefix.clone(),
            results_ready: ready.clone().with_selector(crawl.results_ready_selector.clone()),
            detail_ready: ready.with_selector(crawl.detail_ready_selector.clone()),
            concurrency: crawl.concurrency.max(1),
            politeness_delay: crawl.politeness_delay(),
            destination: PathBuf::from(&settings.export.output_path),
            checkpoint_each_keyword: settings.export.checkpoint_each_keyword,
        }
    }
}

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// 已完成的关键词数
    pub keywords: usize,
    /// 收集到的链接总数（按关键词分别计数）
    pub links: usize,
    /// 生成的记录数
    pub records: usize,
    /// 标签/值数量不一致的页面数
    pub misaligned: usize,
}

/// 爬取用例
///
/// 依次处理每个关键词：提交搜索、收集链接、并发加载并提取详情页，
/// 按链接发现顺序追加记录，最后导出表格。
pub struct CrawlUseCase {
    session: Arc<dyn NavigationSession>,
    extractor: PageExtractor,
    retry: RetryPolicy,
    plan: CrawlPlan,
    /// 下一次详情页请求最早的开始时间
    next_request_at: Mutex<Option<Instant>>,
}

impl CrawlUseCase {
    pub fn new(session: Arc<dyn NavigationSession>, retry: RetryPolicy, plan: CrawlPlan) -> Self {
        Self {
            session,
            extractor: PageExtractor::new(plan.university_prefix.clone()),
            retry,
            plan,
            next_request_at: Mutex::new(None),
        }
    }

    pub fn plan(&self) -> &CrawlPlan {
        &self.plan
    }

    /// 执行完整的爬取并导出
    ///
    /// # 返回值
    ///
    /// * `Ok((RecordSet, CrawlReport))` - 全部记录及统计
    /// * `Err(CrawlError)` - 任一未恢复的导航失败或导出失败，运行中止
    pub async fn execute(&self) -> Result<(RecordSet, CrawlReport), CrawlError> {
        let mut record_set = RecordSet::new();
        let mut report = CrawlReport::default();

        info!(
            session = self.session.name(),
            keywords = self.plan.keywords.len(),
            concurrency = self.plan.concurrency,
            "Crawl started"
        );

        for keyword in &self.plan.keywords {
            let extractions = self.crawl_keyword(keyword).await?;

            report.keywords += 1;
            report.links += extractions.len();
            report.misaligned += extractions
                .iter()
                .filter(|e| e.misalignment.is_some())
                .count();
            record_set.extend(extractions.into_iter().map(|e| e.record));

            if self.plan.checkpoint_each_keyword {
                TableSink::export(&record_set, &self.plan.destination)?;
                info!(keyword = %keyword, records = record_set.len(), "Checkpoint written");
            }
        }

        if !self.plan.checkpoint_each_keyword {
            TableSink::export(&record_set, &self.plan.destination)?;
        }

        report.records = record_set.len();
        if report.misaligned > 0 {
            warn!(
                pages = report.misaligned,
                "Some pages had misaligned label/value blocks"
            );
        }
        info!(
            keywords = report.keywords,
            links = report.links,
            records = report.records,
            path = %self.plan.destination.display(),
            "Crawl finished"
        );

        Ok((record_set, report))
    }

    /// 处理一个关键词，结果按链接发现顺序返回
    async fn crawl_keyword(&self, keyword: &str) -> Result<Vec<Extraction>, CrawlError> {
        let results = self
            .retry
            .run(
                "search",
                || {
                    self.session.submit_search(
                        &self.plan.search_url,
                        &self.plan.input_selector,
                        keyword,
                        &self.plan.results_ready,
                    )
                },
                NavigationError::is_retryable,
            )
            .await
            .map_err(|source| CrawlError::Navigation {
                context: format!("search for '{}'", keyword),
                source,
            })?;

        let page_url = Url::parse(&results.url)
            .or_else(|_| Url::parse(&self.plan.search_url))
            .map_err(|e| CrawlError::InvalidConfig(format!("search url: {}", e)))?;

        let links =
            LinkCollector::collect_program_links(&results.html, &page_url, &self.plan.program_prefix);
        info!(keyword = %keyword, count = links.len(), "Program links collected");

        stream::iter(links)
            .map(|link| self.fetch_detail(keyword, link))
            .buffered(self.plan.concurrency)
            .try_collect()
            .await
    }

    /// 按礼貌间隔错开详情页请求的开始时间
    ///
    /// 持锁等待，因此并发槽位依次放行，而不是同时醒来。
    async fn pace(&self) {
        let delay = self.plan.politeness_delay;
        if delay.is_zero() {
            return;
        }
        let mut next = self.next_request_at.lock().await;
        if let Some(at) = *next {
            tokio::time::sleep_until(at).await;
        }
        *next = Some(Instant::now() + delay);
    }

    async fn fetch_detail(&self, keyword: &str, link: String) -> Result<Extraction, CrawlError> {
        self.pace().await;

        let page = self
            .retry
            .run(
                "detail",
                || self.session.load(&link, &self.plan.detail_ready),
                NavigationError::is_retryable,
            )
            .await
            .map_err(|source| CrawlError::Navigation {
                context: format!("detail page {}", link),
                source,
            })?;

        let extraction = self.extractor.extract(keyword, &link, &page.html);
        tracing::debug!(
            keyword = %keyword,
            link = %link,
            attributes = extraction.record.attributes.len(),
            "Detail page extracted"
        );
        Ok(extraction)
    }
}
