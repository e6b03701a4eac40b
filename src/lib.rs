//! # Zhihuishu Quiz Runner
//!
//! 智慧树课程练习自动答题工具
//!
//! ## 架构设计
//!
//! 本系统采用分层架构，数据向下流动，结果向上返回：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageAdapter` - 读文本 / 点击 / 等待 / 后退
//! - `ChromePage` - chromiumoxide 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题
//! - `LookupResolver` - 题库查询，查不到降级为"无结果"
//! - `LlmResolver` - LLM 根据参考答案选出选项
//! - `ResolverChain` - 按顺序组合解析器
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个模块"的完整答题流程
//! - `CourseView` / `CoursePage` - 题目级页面操作
//! - `ModuleRunner` - 状态机（打开 → 练习 → 逐题作答 → 重做或完成）
//! - `ModuleAttemptState` - 按题干缓存正确答案
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 浏览器、交互
//! - `orchestrator/session` - 模块列表的顺序处理
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, Pacing};
pub use error::{AppError, AppResult, ResolutionError};
pub use infrastructure::{ChromePage, PageAdapter};
pub use models::{AnswerRecord, ChoiceSet, Module, Question, QuestionKind, Verdict};
pub use orchestrator::{select_from_prefix, App, Session, SessionSummary};
pub use services::{AnswerResolver, Resolution, ResolveOutcome, ResolvedAnswer, ResolverChain};
pub use workflow::{CoursePage, CourseView, ModuleEntry, ModuleOutcome, ModuleReport, ModuleRunner};
