use thiserror::Error;

/// 应用程序错误类型
///
/// 只用于胶水层（浏览器、配置、交互），答题主循环里的问题不会走到这里
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
    /// 用户交互错误
    #[error("交互错误: {0}")]
    Prompt(#[from] std::io::Error),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(String),
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 等待元素超时
    #[error("等待元素 {selector} 超时 ({timeout_ms} ms)")]
    SelectorTimeout { selector: String, timeout_ms: u64 },
    /// 页面上缺少必需的元素
    #[error("页面上找不到元素: {0}")]
    MissingElement(String),
}

/// 题库服务错误
///
/// 只在 `QuestionBank` 内部出现，解析器会把它降级为“无结果”
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("题库请求失败: {0}")]
    Request(#[from] reqwest::Error),
    #[error("题库返回无法解析: {0}")]
    Decode(String),
}

/// 答案解析错误
///
/// 调用方的处理方式一律是：跳过这道题，不记录、不选择
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// 题干为空
    #[error("题干为空")]
    EmptyStem,
    /// LLM 返回空内容或缺少 ##字母## 标记
    #[error("LLM 响应格式错误: {response:?}")]
    MalformedResponse { response: String },
    /// 选项字母超出选项数量
    #[error("选项 {letters} 超出范围 (共 {option_count} 个选项)")]
    ChoiceOutOfRange { letters: String, option_count: usize },
    /// LLM 接口调用失败
    #[error("{resolver} 调用失败: {message}")]
    Backend { resolver: String, message: String },
    /// 所有解析器都没有给出答案
    #[error("所有解析器都未能给出答案")]
    Exhausted,
}

impl ResolutionError {
    pub fn backend(resolver: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ResolutionError::Backend {
            resolver: resolver.into(),
            message: err.to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
