//! 测试替身：脚本化的课程页面、解析器、题库和 LLM

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use zhihuishu_quiz_runner::error::{LookupError, ResolutionError};
use zhihuishu_quiz_runner::services::{ChatBackend, ChatTurn, LookupResponse, QuestionBank};
use zhihuishu_quiz_runner::{
    AnswerResolver, ChoiceSet, CourseView, Module, ModuleEntry, Question, QuestionKind, Resolution, Verdict,
};

pub fn single(stem: &str) -> Question {
    Question::new(
        QuestionKind::SingleChoice,
        stem,
        vec!["A.甲".to_string(), "B.乙".to_string(), "C.丙".to_string(), "D.丁".to_string()],
    )
}

pub fn other(stem: &str) -> Question {
    Question::new(QuestionKind::Other("【判断题】".to_string()), stem, vec![])
}

pub fn choices(letters: &str) -> ChoiceSet {
    ChoiceSet::from_letters(letters)
}

// ========== 课程页面 ==========

#[derive(Debug, Clone)]
pub struct FakeQuestion {
    pub question: Question,
    pub correct: ChoiceSet,
    /// 答错时平台是否公布正确答案
    pub disclose: bool,
}

#[derive(Debug, Clone)]
pub struct FakeModule {
    pub module: Module,
    pub empty: bool,
    pub questions: Vec<FakeQuestion>,
}

impl FakeModule {
    pub fn new(title: &str, percent: u8) -> Self {
        Self {
            module: Module::new(title, percent),
            empty: false,
            questions: Vec::new(),
        }
    }

    pub fn empty(mut self) -> Self {
        self.empty = true;
        self
    }

    pub fn question(mut self, question: Question, correct: &str) -> Self {
        self.questions.push(FakeQuestion {
            question,
            correct: choices(correct),
            disclose: true,
        });
        self
    }

    pub fn hidden_answer(mut self, question: Question, correct: &str) -> Self {
        self.questions.push(FakeQuestion {
            question,
            correct: choices(correct),
            disclose: false,
        });
        self
    }
}

/// 页面上发生过的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened(String),
    Practice(String),
    Selected { stem: String, choices: ChoiceSet },
    Graded { stem: String, correct: bool },
    Next,
    Left,
}

#[derive(Default)]
struct CourseState {
    module: Option<usize>,
    question: usize,
    selected: ChoiceSet,
    last_grade: Option<bool>,
    events: Vec<Event>,
}

/// 脚本化的课程页面
///
/// 评分是确定的：提交的选项等于 `correct` 即为正确
pub struct FakeCourse {
    modules: Vec<FakeModule>,
    fail_on_open: Option<String>,
    state: Mutex<CourseState>,
}

impl FakeCourse {
    pub fn new(modules: Vec<FakeModule>) -> Self {
        Self {
            modules,
            fail_on_open: None,
            state: Mutex::new(CourseState::default()),
        }
    }

    /// 打开指定模块时返回错误（模拟浏览器故障）
    pub fn failing_on(mut self, title: &str) -> Self {
        self.fail_on_open = Some(title.to_string());
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Opened(title) => Some(title),
                _ => None,
            })
            .collect()
    }

    /// 某道题每次被选中的选项
    pub fn selections_for(&self, stem: &str) -> Vec<ChoiceSet> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Selected { stem: s, choices } if s == stem => Some(choices),
                _ => None,
            })
            .collect()
    }

    pub fn graded(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Graded { stem, correct } => Some((stem, correct)),
                _ => None,
            })
            .collect()
    }

    pub fn modules_for_test(&self, index: usize) -> Module {
        self.modules[index].module.clone()
    }

    /// 打开模块并进入练习，用于单独驱动某道题
    pub async fn open_for_test(&self, title: &str) {
        self.open_module(title).await.unwrap();
        self.enter_practice().await.unwrap();
    }

    fn current(&self, state: &CourseState) -> Result<&FakeQuestion> {
        let module = state.module.ok_or_else(|| anyhow::anyhow!("没有打开模块"))?;
        self.modules[module]
            .questions
            .get(state.question)
            .ok_or_else(|| anyhow::anyhow!("题目越界"))
    }
}

#[async_trait]
impl CourseView for FakeCourse {
    async fn list_modules(&self) -> Result<Vec<Module>> {
        Ok(self.modules.iter().map(|m| m.module.clone()).collect())
    }

    async fn open_module(&self, title: &str) -> Result<ModuleEntry> {
        if self.fail_on_open.as_deref() == Some(title) {
            anyhow::bail!("模拟浏览器故障: {}", title);
        }
        let mut state = self.state.lock().unwrap();
        let Some(index) = self.modules.iter().position(|m| m.module.title == title) else {
            return Ok(ModuleEntry::NotFound);
        };
        state.events.push(Event::Opened(title.to_string()));
        state.module = Some(index);
        state.question = 0;
        if self.modules[index].empty {
            Ok(ModuleEntry::Empty)
        } else {
            Ok(ModuleEntry::Practice)
        }
    }

    async fn enter_practice(&self) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let index = state.module.ok_or_else(|| anyhow::anyhow!("没有打开模块"))?;
        let title = self.modules[index].module.title.clone();
        state.events.push(Event::Practice(title));
        Ok(self.modules[index].questions.len())
    }

    async fn read_question(&self) -> Result<Question> {
        let state = self.state.lock().unwrap();
        Ok(self.current(&state)?.question.clone())
    }

    async fn select_choices(&self, choices: &ChoiceSet) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let stem = self.current(&state)?.question.stem.clone();
        state.selected = choices.clone();
        state.events.push(Event::Selected {
            stem,
            choices: choices.clone(),
        });
        Ok(())
    }

    async fn submit(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let (stem, correct) = {
            let q = self.current(&state)?;
            (q.question.stem.clone(), q.correct == state.selected)
        };
        state.last_grade = Some(correct);
        state.events.push(Event::Graded { stem, correct });
        Ok(())
    }

    async fn read_verdict(&self) -> Result<Verdict> {
        let state = self.state.lock().unwrap();
        let q = self.current(&state)?;
        let correct = state.last_grade.ok_or_else(|| anyhow::anyhow!("还没有提交"))?;
        Ok(Verdict {
            correct,
            disclosed: (!correct && q.disclose).then(|| q.correct.clone()),
        })
    }

    async fn next_question(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.question += 1;
        state.selected = ChoiceSet::default();
        state.last_grade = None;
        state.events.push(Event::Next);
        Ok(())
    }

    async fn leave(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.module = None;
        state.events.push(Event::Left);
        Ok(())
    }
}

// ========== 解析器 ==========

/// 按题干给出预设答案的解析器
///
/// 同一题被多次询问时依次使用列表中的答案，用完后重复最后一个
#[derive(Clone, Default)]
pub struct ScriptedResolver {
    answers: HashMap<String, Vec<ChoiceSet>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, stem: &str, letters: &[&str]) -> Self {
        self.answers
            .insert(stem.to_string(), letters.iter().map(|l| choices(l)).collect());
        self
    }

    /// 调用记录（克隆后的解析器共享同一份）
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerResolver for ScriptedResolver {
    fn name(&self) -> &str {
        "脚本"
    }

    async fn resolve(&self, question: &Question, _hint: Option<&str>) -> Result<Resolution, ResolutionError> {
        let mut calls = self.calls.lock().unwrap();
        let asked = calls.iter().filter(|s| **s == question.stem).count();
        calls.push(question.stem.clone());

        let answers = self
            .answers
            .get(&question.stem)
            .ok_or_else(|| ResolutionError::MalformedResponse {
                response: String::new(),
            })?;
        let answer = answers
            .get(asked)
            .or_else(|| answers.last())
            .cloned()
            .ok_or(ResolutionError::Exhausted)?;
        Ok(Resolution::Answered(answer))
    }
}

/// 总是放弃、只传递参考答案的解析器
pub struct DeferringResolver {
    pub reference: String,
    pub seen_hints: Arc<Mutex<Vec<Option<String>>>>,
}

impl DeferringResolver {
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            seen_hints: Arc::default(),
        }
    }
}

#[async_trait]
impl AnswerResolver for DeferringResolver {
    fn name(&self) -> &str {
        "放弃"
    }

    async fn resolve(&self, _question: &Question, hint: Option<&str>) -> Result<Resolution, ResolutionError> {
        self.seen_hints.lock().unwrap().push(hint.map(str::to_string));
        Ok(Resolution::Defer {
            reference: self.reference.clone(),
        })
    }
}

// ========== 题库 / LLM ==========

pub struct FakeBank {
    response: std::result::Result<LookupResponse, String>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeBank {
    pub fn returning(code: i64, data: serde_json::Value) -> Self {
        Self {
            response: Ok(LookupResponse { code, data }),
            calls: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl QuestionBank for FakeBank {
    async fn search(&self, _stem: &str) -> std::result::Result<LookupResponse, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(LookupError::Decode)
    }
}

pub struct FakeChat {
    reply: std::result::Result<String, String>,
    pub requests: Arc<Mutex<Vec<Vec<ChatTurn>>>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            requests: Arc::default(),
        }
    }
}

#[async_trait]
impl ChatBackend for FakeChat {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }
}
