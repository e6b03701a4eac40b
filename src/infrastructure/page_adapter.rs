//! 页面能力抽象
//!
//! 上层只依赖这个 trait，不关心背后是哪种浏览器自动化引擎

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// 页面操作能力
///
/// 约定：
/// - 元素句柄在页面跳转后可能失效，调用方不要跨越等待点持有它
/// - 查找不到元素不是错误，返回 `None` / 空列表
#[async_trait]
pub trait PageAdapter: Send + Sync {
    /// 元素句柄
    type Element: Send + Sync;

    /// 在整个页面中查找所有匹配的元素
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// 在整个页面中查找第一个匹配的元素
    async fn find(&self, selector: &str) -> Result<Option<Self::Element>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    /// 在某个元素内部查找所有匹配的元素
    async fn find_all_in(&self, element: &Self::Element, selector: &str) -> Result<Vec<Self::Element>>;

    /// 在某个元素内部查找第一个匹配的元素
    async fn find_in(&self, element: &Self::Element, selector: &str) -> Result<Option<Self::Element>> {
        Ok(self.find_all_in(element, selector).await?.into_iter().next())
    }

    /// 读取元素的文本内容（已去除首尾空白）
    async fn text_of(&self, element: &Self::Element) -> Result<Option<String>>;

    /// 点击元素
    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// 等待选择器出现
    async fn wait_for(&self, selector: &str) -> Result<()>;

    /// 浏览器后退
    async fn go_back(&self) -> Result<()>;

    /// 固定停顿，给页面渲染留时间
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
