// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{NavigationError, PageFingerprint, ReadyCondition};
use serde::Deserialize;
use std::future::Future;
use tokio::time::{sleep, Instant};

/// 一次就绪探测的结果
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadyProbe {
    /// `document.readyState === "complete"`
    pub complete: bool,
    /// 就绪选择器是否命中（未配置选择器时为 true）
    pub selector_found: bool,
    /// 当前文档长度
    pub content_length: usize,
    /// 当前页面地址
    #[serde(default)]
    pub url: String,
}

impl ReadyProbe {
    pub fn fingerprint(&self) -> PageFingerprint {
        PageFingerprint {
            url: self.url.clone(),
            content_length: self.content_length,
        }
    }

    fn differs_from(&self, baseline: Option<&PageFingerprint>) -> bool {
        baseline.map_or(true, |b| b.url != self.url || b.content_length != self.content_length)
    }
}

/// 轮询直到页面就绪
///
/// 间隔从 `initial_interval` 开始按 2 倍增长，上限 `max_interval`。
/// 超过 `timeout` 仍未就绪时返回 [`NavigationError::ReadinessTimeout`]。
/// 探测时的浏览器错误（例如页面跳转导致执行上下文销毁）视为尚未就绪，
/// 其他错误直接返回。
pub async fn poll_until_ready<F, Fut>(
    url: &str,
    condition: &ReadyCondition,
    mut probe: F,
) -> Result<(), NavigationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ReadyProbe, NavigationError>>,
{
    let started = Instant::now();
    let deadline = started + condition.timeout;
    let mut interval = condition.initial_interval;
    let mut last_length: Option<usize> = None;

    loop {
        match probe().await {
            Ok(state) => {
                let stable = last_length == Some(state.content_length);
                if state.complete
                    && state.selector_found
                    && stable
                    && state.differs_from(condition.baseline.as_ref())
                {
                    tracing::debug!(
                        url,
                        waited_ms = started.elapsed().as_millis() as u64,
                        "Page ready"
                    );
                    return Ok(());
                }
                last_length = Some(state.content_length);
            }
            Err(NavigationError::Browser(reason)) => {
                tracing::debug!(url, reason = %reason, "Readiness check failed, page still changing");
                last_length = None;
            }
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(NavigationError::ReadinessTimeout {
                url: url.to_string(),
                waited_ms: started.elapsed().as_millis() as u64,
            });
        }

        sleep(interval.min(deadline - now)).await;
        interval = (interval * 2).min(condition.max_interval);
    }
}
