//! 模块处理上下文
//!
//! 封装“我正在处理第几个模块、叫什么”这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct ModuleCtx {
    /// 模块在本次会话中的序号（从1开始）
    pub module_index: usize,
    /// 本次会话的模块总数
    pub total: usize,
    pub title: String,
}

impl ModuleCtx {
    pub fn new(module_index: usize, total: usize, title: impl Into<String>) -> Self {
        Self {
            module_index,
            total,
            title: title.into(),
        }
    }
}

impl Display for ModuleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[模块 {}/{}]", self.module_index, self.total)
    }
}
