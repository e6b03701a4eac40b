//! 单个模块的答题流程 - 流程层
//!
//! 状态机：
//!
//! ```text
//! Opening → PracticeMode → ReviewCycle → AttemptComplete ─┬→ Done
//!    ↑                                                    │
//!    └──────────────────── Retry ←────────────────────────┘ (本轮有错题)
//! ```
//!
//! 每轮作答都会把判定过的题目放进缓存，下一轮直接复用，
//! 所以需要重新解析的题目只会越来越少

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::models::{Module, Question};
use crate::services::{ResolveOutcome, ResolverChain};
use crate::utils::logging::truncate_text;
use crate::workflow::attempt_state::{AttemptStats, Judged, ModuleAttemptState};
use crate::workflow::course_view::{CourseView, ModuleEntry};
use crate::workflow::module_ctx::ModuleCtx;

/// 状态机的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Opening,
    PracticeMode,
    ReviewCycle { question_count: usize },
    AttemptComplete,
    Retry,
    Done,
}

/// 模块的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// 已经 100%，没有打开
    AlreadyComplete,
    /// 没有练习内容
    Empty,
    /// 页面上找不到这个模块
    NotFound,
    /// 某一轮全部答对（或无需作答）
    Done,
    /// 达到最大尝试次数仍有错题
    GaveUp,
}

/// 单道题的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionOutcome {
    Replayed,
    Correct,
    Wrong,
    Unsupported,
    Unresolved,
}

#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub title: String,
    pub outcome: ModuleOutcome,
    pub attempts: usize,
    pub stats: AttemptStats,
}

impl ModuleReport {
    fn without_attempts(module: &Module, outcome: ModuleOutcome) -> Self {
        Self {
            title: module.title.clone(),
            outcome,
            attempts: 0,
            stats: AttemptStats::default(),
        }
    }
}

/// 模块答题器
///
/// - 独占本模块的 `ModuleAttemptState`
/// - 不持有页面元素，每轮都按标题重新定位
pub struct ModuleRunner<'a, V: CourseView> {
    view: &'a V,
    chain: &'a ResolverChain,
    max_attempts: usize,
}

impl<'a, V: CourseView> ModuleRunner<'a, V> {
    pub fn new(view: &'a V, chain: &'a ResolverChain, max_attempts: usize) -> Self {
        Self {
            view,
            chain,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn run(&self, module: &Module, ctx: &ModuleCtx) -> Result<ModuleReport> {
        if module.is_complete() {
            info!("{} ✓ 已完成，跳过: {}", ctx, module.title);
            return Ok(ModuleReport::without_attempts(module, ModuleOutcome::AlreadyComplete));
        }

        let mut state = ModuleAttemptState::new();
        let mut phase = RunnerState::Opening;

        let outcome = loop {
            debug!("{} 状态: {:?}", ctx, phase);
            phase = match phase {
                RunnerState::Opening => {
                    state.begin_attempt();
                    info!("{} 即将开始做：{} (第 {} 轮)", ctx, module.title, state.attempts());

                    match self.view.open_module(&module.title).await? {
                        ModuleEntry::Practice => RunnerState::PracticeMode,
                        ModuleEntry::Empty => {
                            info!("{} 没有练习内容，视为完成", ctx);
                            self.view.leave().await?;
                            return Ok(ModuleReport::without_attempts(module, ModuleOutcome::Empty));
                        }
                        ModuleEntry::NotFound => {
                            warn!("{} ⚠️ 页面上找不到模块: {}", ctx, module.title);
                            return Ok(ModuleReport::without_attempts(module, ModuleOutcome::NotFound));
                        }
                    }
                }
                RunnerState::PracticeMode => {
                    let question_count = self.view.enter_practice().await?;
                    info!("{} - 有 {} 道题目", ctx, question_count);
                    RunnerState::ReviewCycle { question_count }
                }
                RunnerState::ReviewCycle { question_count } => {
                    for index in 0..question_count {
                        info!("{} - 正在做第 {} 道", ctx, index + 1);
                        self.review_question(&mut state, ctx).await?;
                    }
                    RunnerState::AttemptComplete
                }
                RunnerState::AttemptComplete => {
                    self.view.leave().await?;
                    log_attempt(ctx, state.attempts(), &state.current_stats());
                    if state.had_wrong_answer() {
                        RunnerState::Retry
                    } else {
                        RunnerState::Done
                    }
                }
                RunnerState::Retry => {
                    if state.attempts() >= self.max_attempts {
                        error!(
                            "{} ❌ 已尝试 {} 轮仍有错题，放弃: {}",
                            ctx,
                            state.attempts(),
                            module.title
                        );
                        break ModuleOutcome::GaveUp;
                    }
                    info!("{} 本轮有错题，用缓存答案重做", ctx);
                    RunnerState::Opening
                }
                RunnerState::Done => break ModuleOutcome::Done,
            };
        };

        debug!("{} 缓存答案 {} 条", ctx, state.cache_len());
        for record in state.records() {
            debug!("{}   {} → {}", ctx, truncate_text(&record.stem, 30), record.choices);
        }

        Ok(ModuleReport {
            title: module.title.clone(),
            outcome,
            attempts: state.attempts(),
            stats: state.total_stats(),
        })
    }

    /// 处理当前显示的一道题
    pub async fn review_question(&self, state: &mut ModuleAttemptState, ctx: &ModuleCtx) -> Result<QuestionOutcome> {
        let question = self.view.read_question().await?;

        // 1. 缓存命中：直接重放，不调用解析器
        if let Some(choices) = state.cached(&question.stem).cloned() {
            info!("{}   - 使用缓存答案：{}", ctx, choices);
            self.view.select_choices(&choices).await?;
            self.view.submit().await?;
            self.view.next_question().await?;
            state.note_replayed();
            return Ok(QuestionOutcome::Replayed);
        }

        log_question(ctx, &question);

        // 2. 解析答案（非选择题在链内直接返回 Unsupported）
        let answer = match self.chain.resolve(&question).await {
            Ok(ResolveOutcome::Resolved(answer)) => answer,
            Ok(ResolveOutcome::Unsupported) => {
                info!("{}   - 题目类型：{}，不支持，自己做", ctx, question.kind);
                state.note_unsupported();
                self.view.next_question().await?;
                return Ok(QuestionOutcome::Unsupported);
            }
            Err(e) => {
                error!("{}   - 解析答案失败，跳过: {}", ctx, e);
                state.note_unresolved();
                self.view.next_question().await?;
                return Ok(QuestionOutcome::Unresolved);
            }
        };

        // 3. 作答并读取判定
        self.view.select_choices(&answer.choices).await?;
        self.view.submit().await?;
        let verdict = self.view.read_verdict().await?;

        let outcome = match state.record_judged(&question.stem, &answer.choices, &verdict) {
            Judged::Correct => {
                info!("{}   - ✓ 回答正确", ctx);
                QuestionOutcome::Correct
            }
            Judged::WrongCached(correct) => {
                warn!("{}   - ✗ 回答错误，正确答案：{}", ctx, correct);
                QuestionOutcome::Wrong
            }
            Judged::WrongUncached => {
                warn!("{}   - ✗ 回答错误，平台未给出正确答案，下一轮重新解析", ctx);
                QuestionOutcome::Wrong
            }
        };

        self.view.next_question().await?;
        Ok(outcome)
    }
}

// ========== 日志辅助函数 ==========

fn log_question(ctx: &ModuleCtx, question: &Question) {
    info!("{}   - 题目类型：{}", ctx, question.kind);
    info!("{}   - 题干：{}", ctx, truncate_text(&question.stem, 80));
    if !question.options.is_empty() {
        debug!("{}   - 选项：\n    - {}", ctx, question.options.join("\n    - "));
    }
}

fn log_attempt(ctx: &ModuleCtx, attempt: usize, stats: &AttemptStats) {
    info!(
        "{} 第 {} 轮结束: 新解析 {}, 缓存 {}, 答错 {}, 不支持 {}, 失败 {}",
        ctx, attempt, stats.resolved, stats.replayed, stats.wrong, stats.unsupported, stats.unresolved
    );
}
