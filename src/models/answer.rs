use std::collections::BTreeSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// 选中的选项位置集合（从 1 开始，A=1、B=2 ...）
///
/// 内部有序且去重，点击时按升序进行
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceSet(BTreeSet<usize>);

impl ChoiceSet {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self(indices.into_iter().filter(|&i| i > 0).collect())
    }

    /// 字母串转选项位置，例如 `"CD"` → {3, 4}
    ///
    /// 小写按大写处理，非拉丁字母的字符被忽略
    pub fn from_letters(letters: &str) -> Self {
        Self(
            letters
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .map(|c| (c.to_ascii_uppercase() as u8 - b'A') as usize + 1)
                .collect(),
        )
    }

    /// 选项位置转字母串，按升序
    pub fn to_letters(&self) -> String {
        self.0
            .iter()
            .map(|&i| if i <= 26 { (b'A' + (i - 1) as u8) as char } else { '?' })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 最大的选项位置
    pub fn max(&self) -> Option<usize> {
        self.0.iter().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl Display for ChoiceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_letters())
    }
}

/// 已知答案的缓存记录，按题干索引
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub stem: String,
    pub choices: ChoiceSet,
}

/// 平台对一次提交的判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    /// 平台公布的正确答案（答错时才有意义）
    pub disclosed: Option<ChoiceSet>,
}

impl Verdict {
    pub const CORRECT_MARKER: &'static str = "回答正确";

    /// 根据判定提示文本和“正确答案”字段构造
    pub fn from_texts(tips: &str, right_answer: Option<&str>) -> Self {
        let correct = tips.contains(Self::CORRECT_MARKER);
        let disclosed = right_answer
            .map(ChoiceSet::from_letters)
            .filter(|choices| !choices.is_empty());
        Self { correct, disclosed }
    }
}
