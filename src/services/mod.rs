pub mod llm_service;
pub mod lookup_service;
pub mod resolver;

pub use llm_service::{ChatBackend, ChatRole, ChatTurn, LlmResolver, LlmService};
pub use lookup_service::{HttpQuestionBank, LookupResolver, LookupResponse, QuestionBank, NO_RESULT};
pub use resolver::{AnswerResolver, Resolution, ResolveOutcome, ResolvedAnswer, ResolverChain};

use crate::config::Config;

/// 按配置组装默认解析链：题库 → LLM
pub fn default_chain(config: &Config) -> ResolverChain {
    ResolverChain::new()
        .with(LookupResolver::new(HttpQuestionBank::new(&config.lookup_api_url)))
        .with(LlmResolver::new(LlmService::new(config)))
}
