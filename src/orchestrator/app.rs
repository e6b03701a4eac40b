//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：连接或启动浏览器，组装页面和解析链
//! 2. **用户确认**：等待用户登录并进入课程页
//! 3. **读取模块**：读取模块列表，询问起点
//! 4. **运行会话**：交给 `Session` 顺序处理
//! 5. **资源管理**：唯一持有 Browser 的模块

use anyhow::Result;
use chromiumoxide::Browser;
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::ChromePage;
use crate::orchestrator::session::Session;
use crate::services::{default_chain, ResolverChain};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::utils::prompt::{ask_text, confirm};
use crate::workflow::{CoursePage, CourseView};

/// 已打开的课程页地址里包含这一段
const COURSE_URL_HINT: &str = "ai.zhihuishu.com/AIstudent";

const READY_PROMPT: &str = "已经登录，并且点进需要完成的课程了吗？\n  此时地址栏应为：https://ai.zhihuishu.com/AIstudent/**/**\n ";

const START_PROMPT: &str = "从哪个开始做？\n  （输入标题开头，留空则从第一个开始）\n ";

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    course: CoursePage<ChromePage>,
    chain: ResolverChain,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        if config.llm_api_key.is_empty() {
            return Err(AppError::Config("未设置 LLM_API_KEY".to_string()).into());
        }

        log_startup(&config.llm_model_name, config.max_module_attempts);

        let (browser, page) = match config.browser_debug_port {
            Some(port) => {
                browser::connect_to_browser_and_page(port, &config.target_url, Some(COURSE_URL_HINT)).await?
            }
            None => {
                browser::launch_browser(&config.target_url, config.headless, config.chrome_executable.as_deref())
                    .await?
            }
        };

        let course = CoursePage::new(ChromePage::new(page, config.selector_timeout()), config.pacing);
        let chain = default_chain(&config);

        Ok(Self {
            config,
            browser,
            course,
            chain,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<()> {
        let mut stdin = BufReader::new(tokio::io::stdin());

        // 等待用户登录并进入课程
        loop {
            match confirm(&mut stdin, READY_PROMPT, true).await? {
                Some(true) => break,
                Some(false) => continue,
                None => {
                    info!("已取消，关闭浏览器");
                    self.close_browser().await;
                    return Ok(());
                }
            }
        }

        let modules = self.course.list_modules().await?;
        if modules.is_empty() {
            warn!("⚠️ 当前页面没有找到任何模块，程序结束");
            return Ok(());
        }

        let Some(prefix) = ask_text(&mut stdin, START_PROMPT).await? else {
            info!("已取消，关闭浏览器");
            self.close_browser().await;
            return Ok(());
        };

        let session = Session::new(&self.course, &self.chain, &self.config);
        let summary = session.run(&modules, &prefix).await;

        print_final_stats(&summary.reports, summary.failed.len());
        for (title, reason) in &summary.failed {
            warn!("  出错模块: {} ({})", title, reason);
        }

        Ok(())
    }

    async fn close_browser(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
    }
}
