//! 会话编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **起点筛选**：按用户输入的标题前缀丢弃之前的模块
//! 2. **顺序调度**：逐个模块交给 `ModuleRunner`，从不并发
//! 3. **错误隔离**：单个模块出错只记录日志，继续下一个
//! 4. **统计汇总**：收集每个模块的结果

use std::time::Duration;

use tracing::{error, warn};

use crate::config::Config;
use crate::models::Module;
use crate::services::ResolverChain;
use crate::utils::logging::{log_module_start, log_modules_loaded};
use crate::workflow::{CourseView, ModuleCtx, ModuleReport, ModuleRunner};

/// 从第一个标题以 `prefix` 开头的模块开始
///
/// 空前缀从第一个模块开始；没有匹配时保留全部模块
pub fn select_from_prefix<'a>(modules: &'a [Module], prefix: &str) -> &'a [Module] {
    match modules.iter().position(|m| m.title.starts_with(prefix)) {
        Some(start) => &modules[start..],
        None => {
            warn!("⚠️ 没有标题以 '{}' 开头的模块，从第一个开始", prefix);
            modules
        }
    }
}

/// 会话统计
#[derive(Debug, Default)]
pub struct SessionSummary {
    pub reports: Vec<ModuleReport>,
    /// 出错的模块：(标题, 错误信息)
    pub failed: Vec<(String, String)>,
}

/// 会话编排器
///
/// 浏览器页面只有一个，所以模块之间严格顺序执行
pub struct Session<'a, V: CourseView> {
    view: &'a V,
    chain: &'a ResolverChain,
    max_module_attempts: usize,
    module_pause: Duration,
}

impl<'a, V: CourseView> Session<'a, V> {
    pub fn new(view: &'a V, chain: &'a ResolverChain, config: &Config) -> Self {
        Self {
            view,
            chain,
            max_module_attempts: config.max_module_attempts,
            module_pause: config.pacing.between_modules(),
        }
    }

    /// 处理 `modules` 中从 `prefix` 开始的所有模块
    pub async fn run(&self, modules: &[Module], prefix: &str) -> SessionSummary {
        let selected = select_from_prefix(modules, prefix);
        let pending = selected.iter().filter(|m| !m.is_complete()).count();
        log_modules_loaded(modules.len(), selected.len(), pending);

        let runner = ModuleRunner::new(self.view, self.chain, self.max_module_attempts);
        let mut summary = SessionSummary::default();

        for (index, module) in selected.iter().enumerate() {
            let ctx = ModuleCtx::new(index + 1, selected.len(), &module.title);

            if !module.is_complete() {
                log_module_start(ctx.module_index, ctx.total, &module.title);
                if !self.module_pause.is_zero() {
                    tokio::time::sleep(self.module_pause).await;
                }
            }

            match runner.run(module, &ctx).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    error!("{} ❌ 处理过程中发生错误: {:#}", ctx, e);
                    summary.failed.push((module.title.clone(), format!("{:#}", e)));
                }
            }
        }

        summary
    }
}
