use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 启动浏览器并导航到指定 URL
///
/// 需要手动登录，所以默认带界面启动
pub async fn launch_browser(
    url: &str,
    headless: bool,
    chrome_executable: Option<&str>,
) -> Result<(Browser, Page)> {
    info!("🚀 启动浏览器 (无头: {})...", headless);
    debug!("目标 URL: {}", url);

    let mut builder = BrowserConfig::builder();
    if headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    if let Some(path) = chrome_executable {
        debug!("使用浏览器: {}", path);
        builder = builder.chrome_executable(path);
    }

    let config = builder
        .args(vec!["--disable-dev-shm-usage", "--no-first-run"])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            BrowserError::LaunchFailed(e)
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::LaunchFailed(e.to_string())
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("打开页面失败: {}", e);
        BrowserError::NavigationFailed {
            url: url.to_string(),
            source: e,
        }
    })?;

    info!("✅ 浏览器已导航到: {}", url);

    Ok((browser, page))
}
