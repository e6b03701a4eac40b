//! 程序配置
//!
//! 加载顺序：`Config::default()` → 可选的 TOML 文件 → 环境变量覆盖
//!
//! 环境变量可以写在当前目录的 `.env` 里，已经存在的变量优先

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// 默认读取的配置文件
const DEFAULT_CONFIG_FILE: &str = "quiz.toml";

/// 环境变量文件
const ENV_FILE: &str = ".env";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 平台入口URL
    pub target_url: String,
    /// 已打开浏览器的调试端口（为空时自行启动浏览器）
    pub browser_debug_port: Option<u16>,
    /// 自行启动浏览器时是否无头
    pub headless: bool,
    /// 浏览器可执行文件路径（为空时自动查找）
    pub chrome_executable: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 单个模块最多尝试次数
    pub max_module_attempts: usize,
    /// 等待选择器出现的上限（毫秒）
    pub selector_timeout_ms: u64,
    /// 页面操作之间的停顿
    pub pacing: Pacing,
    // --- 题库 API 配置 ---
    pub lookup_api_url: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://onlineweb.zhihuishu.com/".to_string(),
            browser_debug_port: None,
            headless: false,
            chrome_executable: None,
            verbose_logging: false,
            max_module_attempts: 10,
            selector_timeout_ms: 30_000,
            pacing: Pacing::default(),
            lookup_api_url: "http://cx.icodef.com/wyn-nb?v=4".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://openrouter.ai/api/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
        }
    }
}

impl Config {
    /// 读取配置文件（`QUIZ_CONFIG` 或 `quiz.toml`），再叠加环境变量
    pub fn load() -> Result<Self> {
        load_env_file(Path::new(ENV_FILE));

        let explicit = std::env::var("QUIZ_CONFIG").ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let base = if Path::new(path).exists() {
            debug!("读取配置文件: {}", path);
            Self::from_toml_file(path)?
        } else if explicit.is_some() {
            anyhow::bail!("配置文件不存在: {}", path);
        } else {
            Self::default()
        };

        Ok(base.with_env_overrides())
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("配置文件格式错误: {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn with_env_overrides(self) -> Self {
        let default = self;
        Self {
            target_url: std::env::var("QUIZ_TARGET_URL").unwrap_or(default.target_url),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).or(default.browser_debug_port),
            headless: std::env::var("QUIZ_HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            max_module_attempts: std::env::var("QUIZ_MAX_MODULE_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_module_attempts),
            selector_timeout_ms: std::env::var("QUIZ_SELECTOR_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.selector_timeout_ms),
            pacing: default.pacing,
            lookup_api_url: std::env::var("LOOKUP_API_URL").unwrap_or(default.lookup_api_url),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }
}

/// 把 `.env` 中的变量放进进程环境，不覆盖已有的变量
///
/// 文件不存在时什么都不做，返回是否读取了文件
fn load_env_file(path: &Path) -> bool {
    match dotenv::from_path(path) {
        Ok(()) => {
            debug!("已加载环境变量文件: {}", path.display());
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            warn!("环境变量文件 {} 无法解析，已忽略: {}", path.display(), e);
            false
        }
    }
}

/// 页面操作后的固定停顿（毫秒）
///
/// 只是给页面异步渲染留时间，不带失败语义
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Pacing {
    /// 每次打开模块前
    pub settle: u64,
    /// 点击模块卡片后
    pub after_open: u64,
    /// 读取每道题之前
    pub between_questions: u64,
    /// 每次点击选项 / 按钮后
    pub after_click: u64,
    /// 模块之间
    pub between_modules: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle: 2000,
            after_open: 1000,
            between_questions: 1000,
            after_click: 500,
            between_modules: 500,
        }
    }
}

impl Pacing {
    /// 不做任何停顿（测试用）
    pub fn none() -> Self {
        Self {
            settle: 0,
            after_open: 0,
            between_questions: 0,
            after_click: 0,
            between_modules: 0,
        }
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle)
    }

    pub fn after_open(&self) -> Duration {
        Duration::from_millis(self.after_open)
    }

    pub fn between_questions(&self) -> Duration {
        Duration::from_millis(self.between_questions)
    }

    pub fn after_click(&self) -> Duration {
        Duration::from_millis(self.after_click)
    }

    pub fn between_modules(&self) -> Duration {
        Duration::from_millis(self.between_modules)
    }
}
