// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 导航错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// 页面上找不到目标元素
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 页面在限定时间内未就绪
    #[error("Page not ready after {waited_ms}ms: {url}")]
    ReadinessTimeout { url: String, waited_ms: u64 },
    /// 整个请求超时
    #[error("Timeout")]
    Timeout,
    /// 浏览器或传输层错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// URL无效
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl NavigationError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            NavigationError::Timeout
            | NavigationError::ReadinessTimeout { .. }
            | NavigationError::Browser(_) => true,
            NavigationError::ElementNotFound(_) | NavigationError::InvalidUrl(_) => false,
        }
    }
}

/// 页面在某一时刻的指纹，用于判断页面是否已经变化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFingerprint {
    pub url: String,
    pub content_length: usize,
}

/// 页面就绪条件
///
/// 满足条件需要：`document.readyState` 为 `complete`、可选选择器存在、
/// 连续两次探测的文档长度相同，并且（设置了基线时）页面已不同于基线。
#[derive(Debug, Clone)]
pub struct ReadyCondition {
    /// 必须存在的元素选择器
    pub selector: Option<String>,
    /// 操作之前的页面指纹；就绪的页面必须与之不同
    pub baseline: Option<PageFingerprint>,
    /// 轮询的总时限
    pub timeout: Duration,
    /// 初始轮询间隔
    pub initial_interval: Duration,
    /// 最大轮询间隔
    pub max_interval: Duration,
}

impl Default for ReadyCondition {
    fn default() -> Self {
        Self {
            selector: None,
            baseline: None,
            timeout: Duration::from_secs(10),
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(1),
        }
    }
}

impl ReadyCondition {
    pub fn with_selector(mut self, selector: Option<String>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_baseline(mut self, baseline: Option<PageFingerprint>) -> Self {
        self.baseline = baseline;
        self
    }
}

/// 渲染后的页面快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// 页面最终URL
    pub url: String,
    /// 渲染后的HTML
    pub html: String,
}

/// 导航会话特质
///
/// 持有一个浏览器实例，所有页面加载共用。实现必须允许并发调用 `load`。
#[async_trait]
pub trait NavigationSession: Send + Sync {
    /// 打开 `url` 并等待页面就绪
    async fn load(&self, url: &str, ready: &ReadyCondition) -> Result<RenderedPage, NavigationError>;

    /// 打开搜索页，清空搜索框，输入关键词并回车，等待结果就绪
    ///
    /// 找不到搜索框时返回 [`NavigationError::ElementNotFound`]。
    async fn submit_search(
        &self,
        search_url: &str,
        input_selector: &str,
        keyword: &str,
        ready: &ReadyCondition,
    ) -> Result<RenderedPage, NavigationError>;

    /// 会话名称
    fn name(&self) -> &'static str;
}
