/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::workflow::{ModuleOutcome, ModuleReport};

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 info，`verbose` 时为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能已经初始化过，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(model_name: &str, max_attempts: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 智慧树练习自动答题");
    info!("🤖 LLM 模型: {}", model_name);
    info!("🔁 单模块最多尝试: {} 轮", max_attempts);
    info!(
        "开始时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录模块列表
pub fn log_modules_loaded(total: usize, selected: usize, pending: usize) {
    info!("✓ 页面上共有 {} 个模块", total);
    info!("📋 本次处理 {} 个，其中未完成 {} 个\n", selected, pending);
}

/// 记录模块开始
pub fn log_module_start(index: usize, total: usize, title: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📦 [模块 {}/{}] {}", index, total, title);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(reports: &[ModuleReport], failed: usize) {
    let count = |outcome: ModuleOutcome| reports.iter().filter(|r| r.outcome == outcome).count();
    let attempts: usize = reports.iter().map(|r| r.attempts).sum();
    let wrong: usize = reports.iter().map(|r| r.stats.wrong).sum();

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 完成: {}", count(ModuleOutcome::Done));
    info!("⏭️ 已完成跳过: {}", count(ModuleOutcome::AlreadyComplete));
    info!("📭 无练习内容: {}", count(ModuleOutcome::Empty));
    info!("❓ 未找到: {}", count(ModuleOutcome::NotFound));
    info!("⚠️ 放弃: {}", count(ModuleOutcome::GaveUp));
    info!("❌ 出错: {}", failed);
    info!("🔁 总作答轮数: {}，累计答错: {}", attempts, wrong);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
