// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::readiness::{poll_until_ready, ReadyProbe};
use crate::engines::traits::{NavigationError, NavigationSession, ReadyCondition, RenderedPage};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// 浏览器会话配置
#[derive(Debug, Clone)]
pub struct BrowserSessionConfig {
    /// 远程 Chrome 调试地址；为空时本地启动
    pub remote_debugging_url: Option<String>,
    /// 单次导航（含就绪等待）的超时
    pub request_timeout: Duration,
}

struct BrowserState {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// 基于 chromiumoxide 的导航会话
///
/// 浏览器在第一次使用时启动，之后所有页面加载复用同一个实例。
/// 每次加载都打开新标签页并在结束后关闭，因此可以并发调用。
pub struct BrowserSession {
    config: BrowserSessionConfig,
    state: Mutex<Option<BrowserState>>,
}

impl BrowserSession {
    pub fn new(config: BrowserSessionConfig) -> Self {
        Self {
            config,
            state: Mutex::new(None),
        }
    }

    async fn launch(&self) -> Result<BrowserState, NavigationError> {
        let remote_debugging_url = self
            .config
            .remote_debugging_url
            .clone()
            .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

        let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url).await.map_err(|e| {
                NavigationError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            let config = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(self.config.request_timeout)
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(NavigationError::Browser)?;

            tracing::info!("Launching local Chrome instance");
            Browser::launch(config)
                .await
                .map_err(|e| NavigationError::Browser(e.to_string()))?
        };

        // Drive browser events until the connection closes.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(BrowserState { browser, handler })
    }

    /// 在共享浏览器中打开一个空白标签页，必要时先启动浏览器
    async fn open_tab(&self) -> Result<Page, NavigationError> {
        let mut state = self.state.lock().await;
        if state.is_none() {
            *state = Some(self.launch().await?);
        }
        let Some(current) = state.as_ref() else {
            return Err(NavigationError::Browser("browser not available".to_string()));
        };
        current
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| NavigationError::Browser(e.to_string()))
    }

    /// 在新标签页中执行操作，超时控制在操作外层，结束后总是关闭标签页
    async fn with_tab<F, Fut>(&self, op: F) -> Result<RenderedPage, NavigationError>
    where
        F: FnOnce(Page) -> Fut,
        Fut: Future<Output = Result<RenderedPage, NavigationError>>,
    {
        let page = self.open_tab().await?;
        let result = tokio::time::timeout(self.config.request_timeout, op(page.clone()))
            .await
            .map_err(|_| NavigationError::Timeout)
            .and_then(|r| r);

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab: {}", e);
        }
        result
    }

    /// 关闭浏览器
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if let Some(mut current) = state.take() {
            if let Err(e) = current.browser.close().await {
                tracing::warn!("Failed to close browser cleanly: {}", e);
            }
            if let Err(e) = current.browser.wait().await {
                tracing::debug!("Failed to wait for browser exit: {}", e);
            }
            current.handler.abort();
        }
    }
}

async fn goto(page: &Page, url: &str) -> Result<(), NavigationError> {
    url::Url::parse(url).map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", url, e)))?;
    page.goto(url)
        .await
        .map_err(|e| NavigationError::Browser(format!("Navigation to {} failed: {}", url, e)))?;
    Ok(())
}

async fn probe(page: &Page, selector: Option<&str>) -> Result<ReadyProbe, NavigationError> {
    let selector_check = match selector {
        Some(sel) => {
            let literal = serde_json::to_string(sel)
                .map_err(|e| NavigationError::Browser(e.to_string()))?;
            format!("document.querySelector({}) !== null", literal)
        }
        None => "true".to_string(),
    };
    let script = format!(
        r#"(() => ({{
            complete: document.readyState === "complete",
            selector_found: {},
            content_length: document.documentElement ? document.documentElement.outerHTML.length : 0,
            url: window.location.href
        }}))()"#,
        selector_check
    );

    page.evaluate(script)
        .await
        .map_err(|e| NavigationError::Browser(format!("Readiness probe failed: {}", e)))?
        .into_value::<ReadyProbe>()
        .map_err(|e| NavigationError::Browser(format!("Readiness probe returned bad value: {}", e)))
}

async fn wait_ready(page: &Page, url: &str, ready: &ReadyCondition) -> Result<(), NavigationError> {
    let selector = ready.selector.as_deref();
    poll_until_ready(url, ready, || probe(page, selector)).await
}

async fn snapshot(page: &Page, fallback_url: &str) -> Result<RenderedPage, NavigationError> {
    let html = page
        .content()
        .await
        .map_err(|e| NavigationError::Browser(e.to_string()))?;
    let url = page
        .url()
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| fallback_url.to_string());
    Ok(RenderedPage { url, html })
}

#[async_trait]
impl NavigationSession for BrowserSession {
    async fn load(&self, url: &str, ready: &ReadyCondition) -> Result<RenderedPage, NavigationError> {
        self.with_tab(|page| async move {
            goto(&page, url).await?;
            wait_ready(&page, url, ready).await?;
            snapshot(&page, url).await
        })
        .await
    }

    async fn submit_search(
        &self,
        search_url: &str,
        input_selector: &str,
        keyword: &str,
        ready: &ReadyCondition,
    ) -> Result<RenderedPage, NavigationError> {
        self.with_tab(|page| async move {
            goto(&page, search_url).await?;

            // The input must be present before typing.
            let input_ready = ready.clone().with_selector(Some(input_selector.to_string()));
            match wait_ready(&page, search_url, &input_ready).await {
                Ok(()) => {}
                Err(NavigationError::ReadinessTimeout { .. }) => {
                    return Err(NavigationError::ElementNotFound(input_selector.to_string()))
                }
                Err(e) => return Err(e),
            }

            let input = page
                .find_element(input_selector)
                .await
                .map_err(|_| NavigationError::ElementNotFound(input_selector.to_string()))?;

            let literal = serde_json::to_string(input_selector)
                .map_err(|e| NavigationError::Browser(e.to_string()))?;
            page.evaluate(format!(
                "(() => {{ const el = document.querySelector({}); if (el) {{ el.value = ''; }} }})()",
                literal
            ))
            .await
            .map_err(|e| NavigationError::Browser(format!("Clearing search input failed: {}", e)))?;

            input
                .click()
                .await
                .map_err(|e| NavigationError::Browser(format!("Focusing search input failed: {}", e)))?
                .type_str(keyword)
                .await
                .map_err(|e| NavigationError::Browser(format!("Typing keyword failed: {}", e)))?;

            // Results must replace the page seen before submitting.
            let before = probe(&page, None).await?.fingerprint();
            input
                .press_key("Enter")
                .await
                .map_err(|e| NavigationError::Browser(format!("Submitting search failed: {}", e)))?;

            let results_ready = ready.clone().with_baseline(Some(before));
            wait_ready(&page, search_url, &results_ready).await?;
            snapshot(&page, search_url).await
        })
        .await
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}
