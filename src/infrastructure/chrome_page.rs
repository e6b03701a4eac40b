//! chromiumoxide 实现的页面能力
//!
//! 持有唯一的 Page 资源

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use tracing::{debug, warn};

use crate::error::BrowserError;
use crate::infrastructure::PageAdapter;

/// 轮询选择器的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 基于 chromiumoxide 的页面
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 `PageAdapter` 能力
/// - 不认识模块 / 题目
pub struct ChromePage {
    page: Page,
    selector_timeout: Duration,
}

impl ChromePage {
    pub fn new(page: Page, selector_timeout: Duration) -> Self {
        Self {
            page,
            selector_timeout,
        }
    }
}

#[async_trait]
impl PageAdapter for ChromePage {
    type Element = Element;

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>> {
        self.page
            .find_elements(selector)
            .await
            .with_context(|| format!("查找元素失败: {}", selector))
    }

    async fn find_all_in(&self, element: &Element, selector: &str) -> Result<Vec<Element>> {
        element
            .find_elements(selector)
            .await
            .with_context(|| format!("查找子元素失败: {}", selector))
    }

    async fn text_of(&self, element: &Element) -> Result<Option<String>> {
        let text = element.inner_text().await.context("读取元素文本失败")?;
        Ok(text.map(|t| t.trim().to_string()))
    }

    async fn click(&self, element: &Element) -> Result<()> {
        element.click().await.context("点击元素失败")?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str) -> Result<()> {
        poll_until_present(selector, self.selector_timeout, POLL_INTERVAL, move || async move {
            Ok::<bool, anyhow::Error>(!self.find_all(selector).await?.is_empty())
        })
        .await
    }

    async fn go_back(&self) -> Result<()> {
        // 页面随后开始跳转，返回值没有意义
        self.page
            .evaluate("history.back()")
            .await
            .context("浏览器后退失败")?;
        Ok(())
    }
}

/// 反复执行 `present` 直到返回 `true` 或超过 `timeout`
///
/// 页面跳转期间查询可能短暂失败，失败按“尚未出现”处理，继续轮询
pub(crate) async fn poll_until_present<F, Fut>(
    selector: &str,
    timeout: Duration,
    interval: Duration,
    mut present: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let started = Instant::now();
    let mut last_error = None;
    loop {
        match present().await {
            Ok(true) => {
                debug!("元素已出现: {} ({:?})", selector, started.elapsed());
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => {
                debug!("查询 {} 失败，继续等待: {:#}", selector, e);
                last_error = Some(e);
            }
        }
        if started.elapsed() >= timeout {
            if let Some(e) = last_error {
                warn!("等待 {} 超时，最后一次查询错误: {:#}", selector, e);
            }
            return Err(BrowserError::SelectorTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }
            .into());
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const SHORT: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn test_query_errors_keep_polling() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let result = poll_until_present(".questions-list", Duration::from_secs(5), SHORT, move || async move {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err(anyhow::anyhow!("Cannot find context with specified id")),
                2 => Ok::<bool, anyhow::Error>(false),
                _ => Ok(true),
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_persistent_errors_end_in_timeout() {
        let err = poll_until_present(".answer-tips", Duration::from_millis(20), SHORT, || async {
            Err::<bool, anyhow::Error>(anyhow::anyhow!("页面已关闭"))
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BrowserError>(),
            Some(BrowserError::SelectorTimeout { selector, timeout_ms: 20 }) if selector == ".answer-tips"
        ));
    }

    #[tokio::test]
    async fn test_present_immediately() {
        let result = poll_until_present(".stem", Duration::ZERO, SHORT, || async { Ok::<bool, anyhow::Error>(true) }).await;
        assert!(result.is_ok());
    }
}
