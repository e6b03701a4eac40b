//! 单个模块的答题状态
//!
//! 缓存只增不减，模块结束时整体丢弃

use std::collections::HashMap;

use crate::models::{AnswerRecord, ChoiceSet, Verdict};

/// 单次作答的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttemptStats {
    /// 新解析并提交的题目
    pub resolved: usize,
    /// 使用缓存答案的题目
    pub replayed: usize,
    /// 答错的题目
    pub wrong: usize,
    /// 不支持的题型
    pub unsupported: usize,
    /// 解析失败被跳过的题目
    pub unresolved: usize,
}

impl AttemptStats {
    pub fn absorb(&mut self, other: &AttemptStats) {
        self.resolved += other.resolved;
        self.replayed += other.replayed;
        self.wrong += other.wrong;
        self.unsupported += other.unsupported;
        self.unresolved += other.unresolved;
    }
}

/// 判定后写入缓存的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judged {
    /// 答对，缓存了提交的答案
    Correct,
    /// 答错，缓存了平台公布的正确答案
    WrongCached(ChoiceSet),
    /// 答错且平台没有公布可用的答案，什么都没缓存
    WrongUncached,
}

#[derive(Debug, Default)]
pub struct ModuleAttemptState {
    answers: HashMap<String, ChoiceSet>,
    had_wrong_answer: bool,
    attempts: usize,
    current: AttemptStats,
    total: AttemptStats,
}

impl ModuleAttemptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新一轮作答：错题标记清零，缓存保留
    pub fn begin_attempt(&mut self) {
        self.total.absorb(&self.current);
        self.current = AttemptStats::default();
        self.had_wrong_answer = false;
        self.attempts += 1;
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn had_wrong_answer(&self) -> bool {
        self.had_wrong_answer
    }

    pub fn cached(&self, stem: &str) -> Option<&ChoiceSet> {
        self.answers.get(stem)
    }

    pub fn cache_len(&self) -> usize {
        self.answers.len()
    }

    pub fn records(&self) -> impl Iterator<Item = AnswerRecord> + '_ {
        self.answers.iter().map(|(stem, choices)| AnswerRecord {
            stem: stem.clone(),
            choices: choices.clone(),
        })
    }

    /// 根据判定写入缓存
    ///
    /// 缓存里只放正确答案：答对存提交的答案，答错存平台公布的答案
    pub fn record_judged(&mut self, stem: &str, submitted: &ChoiceSet, verdict: &Verdict) -> Judged {
        if verdict.correct {
            self.answers.insert(stem.to_string(), submitted.clone());
            self.current.resolved += 1;
            return Judged::Correct;
        }

        self.had_wrong_answer = true;
        self.current.resolved += 1;
        self.current.wrong += 1;
        match &verdict.disclosed {
            Some(correct) => {
                self.answers.insert(stem.to_string(), correct.clone());
                Judged::WrongCached(correct.clone())
            }
            None => Judged::WrongUncached,
        }
    }

    pub fn note_replayed(&mut self) {
        self.current.replayed += 1;
    }

    pub fn note_unsupported(&mut self) {
        self.current.unsupported += 1;
    }

    pub fn note_unresolved(&mut self) {
        self.current.unresolved += 1;
    }

    pub fn current_stats(&self) -> AttemptStats {
        self.current
    }

    /// 所有轮次累计的统计
    pub fn total_stats(&self) -> AttemptStats {
        let mut total = self.total;
        total.absorb(&self.current);
        total
    }
}
