use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// 课程模块（一张知识点卡片）
///
/// 会话开始时从页面读取一次，之后不再变化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// 模块标题，会话内唯一，用来重新定位卡片
    pub title: String,
    /// 完成度 0-100
    pub completion_percent: u8,
}

impl Module {
    pub fn new(title: impl Into<String>, completion_percent: u8) -> Self {
        Self {
            title: title.into(),
            completion_percent: completion_percent.min(100),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completion_percent >= 100
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}%)", self.title, self.completion_percent)
    }
}

/// 解析卡片上的完成度文本，例如 `"85%"`
///
/// 小数向下取整（只有真正的 100% 才算完成），无法解析时返回 `None`，超过 100 的值截断为 100
pub fn parse_percent(text: &str) -> Option<u8> {
    let number = text.trim().trim_end_matches('%').trim();
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.min(100.0).floor() as u8)
}
