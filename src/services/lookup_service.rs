//! 题库查询 - 业务能力层
//!
//! 只负责“按题干查参考答案”，查不到或网络失败都降级为“无结果”

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{LookupError, ResolutionError};
use crate::models::Question;
use crate::services::resolver::{AnswerResolver, Resolution};

/// 题库没有结果时传给下一个解析器的参考答案
pub const NO_RESULT: &str = "无结果";

/// 题库返回 `code == 1` 表示命中
const MATCHED_CODE: i64 = 1;

/// 题库接口的原始响应
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    pub code: i64,
    #[serde(default)]
    pub data: JsonValue,
}

impl LookupResponse {
    /// 提取参考答案，没有命中时返回 `None`
    pub fn reference(&self) -> Option<String> {
        if self.code != MATCHED_CODE {
            return None;
        }
        let text = match &self.data {
            JsonValue::Null => return None,
            JsonValue::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// 题库
#[async_trait]
pub trait QuestionBank: Send + Sync {
    async fn search(&self, stem: &str) -> Result<LookupResponse, LookupError>;
}

/// HTTP 题库：表单提交 `question=<题干>`
pub struct HttpQuestionBank {
    client: reqwest::Client,
    url: String,
}

impl HttpQuestionBank {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl QuestionBank for HttpQuestionBank {
    async fn search(&self, stem: &str) -> Result<LookupResponse, LookupError> {
        debug!("题库搜索 - 题干长度: {} 字符", stem.len());

        let body = self
            .client
            .post(&self.url)
            .form(&[("question", stem)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!("题库返回: {}", body);

        serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))
    }
}

/// 第一阶段：题库查询
///
/// 永远返回 `Defer`，把参考答案交给 LLM 去匹配选项
pub struct LookupResolver<B: QuestionBank> {
    bank: B,
}

impl<B: QuestionBank> LookupResolver<B> {
    pub fn new(bank: B) -> Self {
        Self { bank }
    }

    /// 查询参考答案，任何失败都得到 `NO_RESULT`
    pub async fn reference_for(&self, stem: &str) -> String {
        match self.bank.search(stem).await {
            Ok(response) => response.reference().unwrap_or_else(|| {
                debug!("题库未命中 (code: {})", response.code);
                NO_RESULT.to_string()
            }),
            Err(e) => {
                warn!("题库查询失败，按无结果处理: {}", e);
                NO_RESULT.to_string()
            }
        }
    }
}

#[async_trait]
impl<B: QuestionBank> AnswerResolver for LookupResolver<B> {
    fn name(&self) -> &str {
        "题库"
    }

    async fn resolve(&self, question: &Question, _hint: Option<&str>) -> Result<Resolution, ResolutionError> {
        let reference = self.reference_for(&question.stem).await;
        Ok(Resolution::Defer { reference })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: JsonValue) -> LookupResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reference_when_matched() {
        let r = response(json!({"code": 1, "data": "  内存容量 "}));
        assert_eq!(r.reference().as_deref(), Some("内存容量"));
    }

    #[test]
    fn test_reference_non_string_payload() {
        let r = response(json!({"code": 1, "data": ["A", "B"]}));
        assert_eq!(r.reference().as_deref(), Some(r#"["A","B"]"#));
    }

    #[test]
    fn test_no_reference_for_other_codes() {
        assert_eq!(response(json!({"code": 0, "data": "x"})).reference(), None);
        assert_eq!(response(json!({"code": -1})).reference(), None);
        assert_eq!(response(json!({"code": 1, "data": ""})).reference(), None);
        assert_eq!(response(json!({"code": 1, "data": null})).reference(), None);
    }

    struct FailingBank;

    #[async_trait]
    impl QuestionBank for FailingBank {
        async fn search(&self, _stem: &str) -> Result<LookupResponse, LookupError> {
            Err(LookupError::Decode("not json".to_string()))
        }
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_no_result() {
        let resolver = LookupResolver::new(FailingBank);
        assert_eq!(resolver.reference_for("题干").await, NO_RESULT);
    }
}
