//! 答案解析链 - 业务能力层
//!
//! 按顺序询问每个解析器：给出答案就结束，否则把参考信息交给下一个

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::ResolutionError;
use crate::models::{ChoiceSet, Question};
use crate::utils::logging::truncate_text;

/// 单个解析器的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 已确定答案
    Answered(ChoiceSet),
    /// 无法确定，附带给下一个解析器的参考答案
    Defer { reference: String },
}

/// 答案解析器
#[async_trait]
pub trait AnswerResolver: Send + Sync {
    /// 用于日志
    fn name(&self) -> &str;

    /// `hint` 是上一个解析器给出的参考答案，第一个解析器收到 `None`
    async fn resolve(&self, question: &Question, hint: Option<&str>) -> Result<Resolution, ResolutionError>;
}

/// 最终答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnswer {
    pub choices: ChoiceSet,
}

/// 解析链的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(ResolvedAnswer),
    /// 非选择题，没有调用任何解析器
    Unsupported,
}

/// 解析链
///
/// 不做任何重试：一次失败直接交给调用方，由调用方跳过这道题
pub struct ResolverChain {
    resolvers: Vec<Box<dyn AnswerResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// 追加一个解析器（越早加入越先询问）
    pub fn with(mut self, resolver: impl AnswerResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub async fn resolve(&self, question: &Question) -> Result<ResolveOutcome, ResolutionError> {
        if !question.kind.is_supported() {
            return Ok(ResolveOutcome::Unsupported);
        }
        if question.stem.is_empty() {
            return Err(ResolutionError::EmptyStem);
        }

        let mut hint: Option<String> = None;
        for resolver in &self.resolvers {
            debug!("询问解析器: {}", resolver.name());
            match resolver.resolve(question, hint.as_deref()).await? {
                Resolution::Answered(choices) => {
                    debug!("{} 给出答案: {}", resolver.name(), choices);
                    return Ok(ResolveOutcome::Resolved(ResolvedAnswer { choices }));
                }
                Resolution::Defer { reference } => {
                    info!("  - {} 参考答案：{}", resolver.name(), truncate_text(&reference, 80));
                    hint = Some(reference);
                }
            }
        }

        Err(ResolutionError::Exhausted)
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}
