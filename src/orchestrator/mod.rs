//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理浏览器资源和用户交互
//! - 组装课程页面和解析链
//!
//! ### `session` - 会话编排器
//! - 筛选起点，顺序处理模块列表（Vec<Module>）
//! - 输出统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (浏览器 + 交互)
//!     ↓
//! session (处理 Vec<Module>)
//!     ↓
//! workflow::ModuleRunner (处理单个 Module)
//!     ↓
//! services (能力层：题库 / LLM)
//!     ↓
//! infrastructure (基础设施：PageAdapter)
//! ```

pub mod app;
pub mod session;

pub use app::App;
pub use session::{select_from_prefix, Session, SessionSummary};
