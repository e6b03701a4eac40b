//! 基础设施层
//!
//! 持有唯一的 Page 资源，只暴露“读文本 / 点击 / 等待 / 返回”能力

pub mod chrome_page;
pub mod page_adapter;

pub use chrome_page::ChromePage;
pub use page_adapter::PageAdapter;
