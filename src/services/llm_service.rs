//! LLM 服务 - 业务能力层
//!
//! 只负责“根据参考答案选出选项”能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 OpenRouter, DeepSeek 等）

use std::sync::LazyLock;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ResolutionError;
use crate::models::{ChoiceSet, Question};
use crate::services::lookup_service::NO_RESULT;
use crate::services::resolver::{AnswerResolver, Resolution};

/// 系统提示词
pub const SYSTEM_PROMPT: &str = "你是一个解题助手，用户将给你题目类型、题干、选项、以及参考答案，\
你需要根据参考答案匹配对应的选项。如果参考答案为“无结果”，请简要分析题目后给出正确的答案，\
注意需要简要分析。答案使用 ## 包裹，例如：##A##、##CD##";

/// 示例问题（演示输出格式）
const EXAMPLE_QUESTION: &str = "【单选题】CPU地址线数量与下列哪项指标密切相关（  ）。\n\nA.内存容量\n\nB.存储数据位\n\nC.运算速度\n\nD.运算精确度\n\n参考答案：内存容量";

/// 示例回答
const EXAMPLE_ANSWER: &str = "##A##";

static ANSWER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##\s*([A-Za-z]+)\s*##").expect("valid answer regex"));

/// 对话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 一条对话消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// 对话补全能力
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// 返回模型的文本回复
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String>;
}

/// LLM 服务
///
/// 职责：
/// - 调用兼容 OpenAI 的对话接口
/// - 不关心题目和流程
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn build_message(turn: &ChatTurn) -> Result<ChatCompletionRequestMessage> {
        let message = match turn.role {
            ChatRole::System => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(turn.content.as_str())
                    .build()?,
            ),
            ChatRole::User => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.content.as_str())
                    .build()?,
            ),
            ChatRole::Assistant => ChatCompletionRequestMessage::Assistant(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.content.as_str())
                    .build()?,
            ),
        };
        Ok(message)
    }
}

#[async_trait]
impl ChatBackend for LlmService {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        debug!("调用 LLM API，模型: {}，消息数: {}", self.model_name, messages.len());

        let messages = messages
            .iter()
            .map(Self::build_message)
            .collect::<Result<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        // 空内容按空字符串返回，由调用方判定格式错误
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

/// 第二阶段：LLM 根据参考答案匹配选项
pub struct LlmResolver<C: ChatBackend> {
    backend: C,
}

impl<C: ChatBackend> LlmResolver<C> {
    pub fn new(backend: C) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<C: ChatBackend> AnswerResolver for LlmResolver<C> {
    fn name(&self) -> &str {
        "LLM"
    }

    async fn resolve(&self, question: &Question, hint: Option<&str>) -> Result<Resolution, ResolutionError> {
        let reference = hint.unwrap_or(NO_RESULT);
        let messages = build_messages(question, reference);

        let response = self
            .backend
            .complete(&messages)
            .await
            .map_err(|e| ResolutionError::backend(self.name(), e))?;

        debug!("LLM 原始响应: {}", response);

        let choices = parse_answer(&response, question.options.len())?;
        info!("  - 选择：{}", choices);
        Ok(Resolution::Answered(choices))
    }
}

/// 构建一次请求的全部消息：系统提示 + 示例 + 当前题目
pub fn build_messages(question: &Question, reference: &str) -> Vec<ChatTurn> {
    vec![
        ChatTurn::new(ChatRole::System, SYSTEM_PROMPT),
        ChatTurn::new(ChatRole::User, EXAMPLE_QUESTION),
        ChatTurn::new(ChatRole::Assistant, EXAMPLE_ANSWER),
        ChatTurn::new(ChatRole::User, format_question(question, reference)),
    ]
}

/// 题型 + 题干 + 选项 + 参考答案
pub fn format_question(question: &Question, reference: &str) -> String {
    format!(
        "{}{}\n\n{}\n\n参考答案：{}",
        question.kind.label(),
        question.stem,
        question.options.join("\n\n"),
        reference
    )
}

/// 从 LLM 响应中提取 `##字母##`
///
/// `option_count` 为 0 时不检查范围
pub fn parse_answer(response: &str, option_count: usize) -> Result<ChoiceSet, ResolutionError> {
    let malformed = || ResolutionError::MalformedResponse {
        response: response.to_string(),
    };

    let letters = ANSWER_TOKEN
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(malformed)?;

    let choices = ChoiceSet::from_letters(letters);
    if choices.is_empty() {
        return Err(malformed());
    }

    if option_count > 0 && choices.max().is_some_and(|max| max > option_count) {
        return Err(ResolutionError::ChoiceOutOfRange {
            letters: letters.to_uppercase(),
            option_count,
        });
    }

    Ok(choices)
}
