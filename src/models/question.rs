use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// 题目类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 【单选题】
    SingleChoice,
    /// 【多选题】
    MultipleChoice,
    /// 其他题型，保留页面上的原始标签
    Other(String),
}

impl QuestionKind {
    pub const SINGLE_LABEL: &'static str = "【单选题】";
    pub const MULTIPLE_LABEL: &'static str = "【多选题】";

    /// 根据页面上的题型标签识别
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            Self::SINGLE_LABEL => QuestionKind::SingleChoice,
            Self::MULTIPLE_LABEL => QuestionKind::MultipleChoice,
            other => QuestionKind::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            QuestionKind::SingleChoice => Self::SINGLE_LABEL,
            QuestionKind::MultipleChoice => Self::MULTIPLE_LABEL,
            QuestionKind::Other(label) => label,
        }
    }

    /// 只有选择题会交给解析器
    pub fn is_supported(&self) -> bool {
        matches!(self, QuestionKind::SingleChoice | QuestionKind::MultipleChoice)
    }
}

impl Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 一道题，只在当前作答过程中存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub kind: QuestionKind,
    /// 题干，同时是缓存的键
    pub stem: String,
    /// 选项文本，按页面顺序（第 1 个对应 A）
    pub options: Vec<String>,
}

impl Question {
    pub fn new(kind: QuestionKind, stem: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            kind,
            stem: stem.into().trim().to_string(),
            options,
        }
    }
}
