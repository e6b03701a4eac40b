//! 课程页面的题目级操作
//!
//! 答题流程只依赖这个 trait；`CoursePage` 是基于选择器的实现

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChoiceSet, Module, Question, Verdict};

/// 打开模块后的页面状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleEntry {
    /// 有练习内容
    Practice,
    /// 没有练习内容
    Empty,
    /// 找不到这个标题的卡片
    NotFound,
}

#[async_trait]
pub trait CourseView: Send + Sync {
    /// 按页面顺序读取所有模块
    async fn list_modules(&self) -> Result<Vec<Module>>;

    /// 按标题重新定位卡片并点开
    async fn open_module(&self, title: &str) -> Result<ModuleEntry>;

    /// 进入练习，返回本次题目数量
    async fn enter_practice(&self) -> Result<usize>;

    /// 读取当前显示的题目
    async fn read_question(&self) -> Result<Question>;

    /// 依次点击选项（1 开始）
    async fn select_choices(&self, choices: &ChoiceSet) -> Result<()>;

    /// 提交当前题目
    async fn submit(&self) -> Result<()>;

    /// 读取提交后的判定
    async fn read_verdict(&self) -> Result<Verdict>;

    /// 前往下一题
    async fn next_question(&self) -> Result<()>;

    /// 离开当前视图（浏览器后退）
    async fn leave(&self) -> Result<()>;
}
