//! 基于选择器的课程页面
//!
//! 把 `PageAdapter` 的元素操作翻译成题目级操作。
//! 元素句柄只在单个方法内使用，方法返回后就丢弃

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Pacing;
use crate::error::BrowserError;
use crate::infrastructure::PageAdapter;
use crate::models::{parse_percent, ChoiceSet, Module, Question, QuestionKind, Verdict};
use crate::workflow::course_view::{CourseView, ModuleEntry};

/// 页面选择器
pub mod selectors {
    pub const MODULE_CARD: &str = ".card-item";
    pub const MODULE_TITLE: &str = ".point-title";
    pub const MODULE_PERCENT: &str = ".card-percent";
    pub const EMPTY_PRACTICE: &str = ".empty-text";
    pub const PRACTICE_HANDLE: &str = ".practice-handle";
    pub const QUESTION_LIST: &str = ".questions-list";
    pub const QUESTION_ITEM: &str = ".questions-item";
    pub const QUESTION_TYPE: &str = ".question-type";
    pub const QUESTION_STEM: &str = ".stem";
    pub const QUESTION_DETAIL: &str = ".question-detail-item.ques-detail";
    pub const OPTION_LABEL: &str = "label";
    pub const NEXT_BUTTON: &str = ".next-btns-box";
    pub const ANSWER_TIPS: &str = ".answer-tips";
    pub const RIGHT_ANSWER: &str = ".question-answer-right";
}

use selectors::*;

pub struct CoursePage<P: PageAdapter> {
    page: P,
    pacing: Pacing,
}

impl<P: PageAdapter> CoursePage<P> {
    pub fn new(page: P, pacing: Pacing) -> Self {
        Self { page, pacing }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    async fn text_in(&self, element: &P::Element, selector: &str) -> Result<Option<String>> {
        match self.page.find_in(element, selector).await? {
            Some(child) => self.page.text_of(&child).await,
            None => Ok(None),
        }
    }

    async fn required_text(&self, selector: &str) -> Result<String> {
        let element = self
            .page
            .find(selector)
            .await?
            .ok_or_else(|| BrowserError::MissingElement(selector.to_string()))?;
        Ok(self.page.text_of(&element).await?.unwrap_or_default())
    }

    async fn click_required(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find(selector)
            .await?
            .ok_or_else(|| BrowserError::MissingElement(selector.to_string()))?;
        self.page.click(&element).await
    }

    async fn click_next(&self) -> Result<()> {
        match self.page.find(NEXT_BUTTON).await? {
            Some(button) => self.page.click(&button).await?,
            None => warn!("  - 找不到下一题按钮"),
        }
        self.page.pause(self.pacing.after_click()).await;
        Ok(())
    }
}

#[async_trait]
impl<P: PageAdapter> CourseView for CoursePage<P> {
    async fn list_modules(&self) -> Result<Vec<Module>> {
        let mut modules = Vec::new();
        for card in self.page.find_all(MODULE_CARD).await? {
            let Some(title) = self.text_in(&card, MODULE_TITLE).await?.filter(|t| !t.is_empty()) else {
                warn!("跳过没有标题的模块卡片");
                continue;
            };
            let percent_text = self.text_in(&card, MODULE_PERCENT).await?.unwrap_or_default();
            let percent = parse_percent(&percent_text).unwrap_or_else(|| {
                warn!("无法解析完成度 '{}'，按 0% 处理: {}", percent_text, title);
                0
            });
            modules.push(Module::new(title, percent));
        }
        debug!("读取到 {} 个模块", modules.len());
        Ok(modules)
    }

    async fn open_module(&self, title: &str) -> Result<ModuleEntry> {
        self.page.pause(self.pacing.settle()).await;

        let mut target = None;
        for card in self.page.find_all(MODULE_CARD).await? {
            if self.text_in(&card, MODULE_TITLE).await?.as_deref() == Some(title) {
                target = Some(card);
                break;
            }
        }
        let Some(card) = target else {
            return Ok(ModuleEntry::NotFound);
        };

        self.page.click(&card).await?;
        self.page.pause(self.pacing.after_open()).await;

        if self.page.find(EMPTY_PRACTICE).await?.is_some() {
            return Ok(ModuleEntry::Empty);
        }
        Ok(ModuleEntry::Practice)
    }

    async fn enter_practice(&self) -> Result<usize> {
        self.click_required(PRACTICE_HANDLE).await?;
        self.page.wait_for(QUESTION_LIST).await?;

        let list = self
            .page
            .find(QUESTION_LIST)
            .await?
            .ok_or_else(|| BrowserError::MissingElement(QUESTION_LIST.to_string()))?;
        Ok(self.page.find_all_in(&list, QUESTION_ITEM).await?.len())
    }

    async fn read_question(&self) -> Result<Question> {
        self.page.pause(self.pacing.between_questions()).await;

        let kind = QuestionKind::from_label(&self.required_text(QUESTION_TYPE).await?);
        let stem = self.required_text(QUESTION_STEM).await?;

        let mut options = Vec::new();
        if let Some(detail) = self.page.find(QUESTION_DETAIL).await? {
            for label in self.page.find_all_in(&detail, OPTION_LABEL).await? {
                options.push(self.page.text_of(&label).await?.unwrap_or_default());
            }
        }

        Ok(Question::new(kind, stem, options))
    }

    async fn select_choices(&self, choices: &ChoiceSet) -> Result<()> {
        let detail = self
            .page
            .find(QUESTION_DETAIL)
            .await?
            .ok_or_else(|| BrowserError::MissingElement(QUESTION_DETAIL.to_string()))?;
        let labels = self.page.find_all_in(&detail, OPTION_LABEL).await?;

        for index in choices.iter() {
            match labels.get(index - 1) {
                Some(label) => self.page.click(label).await?,
                None => warn!("  - 选项 {} 不存在 (共 {} 个)", index, labels.len()),
            }
            self.page.pause(self.pacing.after_click()).await;
        }
        Ok(())
    }

    async fn submit(&self) -> Result<()> {
        self.click_next().await
    }

    async fn read_verdict(&self) -> Result<Verdict> {
        self.page.wait_for(ANSWER_TIPS).await?;
        let tips = self.required_text(ANSWER_TIPS).await?;
        if tips.contains(Verdict::CORRECT_MARKER) {
            return Ok(Verdict::from_texts(&tips, None));
        }

        let right = match self.page.find(RIGHT_ANSWER).await? {
            Some(element) => self.page.text_of(&element).await?,
            None => None,
        };
        Ok(Verdict::from_texts(&tips, right.as_deref()))
    }

    async fn next_question(&self) -> Result<()> {
        self.click_next().await
    }

    async fn leave(&self) -> Result<()> {
        self.page.pause(self.pacing.after_click()).await;
        self.page.go_back().await
    }
}
