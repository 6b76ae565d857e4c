use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 提交数据校验失败（客户端错误）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 存储读写失败（服务端错误）
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 题目文件加载错误
    #[error("题目加载错误: {0}")]
    QuestionLoad(#[from] QuestionLoadError),
}

/// 提交数据校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 请求体不是合法的 JSON 或结构不符
    #[error("请求体无法解析: {0}")]
    MalformedBody(String),
    /// 缺少必填字段
    #[error("缺少字段: {field}")]
    MissingField { field: &'static str },
    /// 字段为空字符串
    #[error("字段为空: {field}")]
    EmptyField { field: &'static str },
    /// 用户名不能作为目录名
    #[error("用户名不合法: {username:?}")]
    UnsafeUsername { username: String },
    /// 答案数量与题目数量不一致
    #[error("答案数量 {actual} 与题目数量 {expected} 不一致")]
    AnswerCountMismatch { expected: usize, actual: usize },
}

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 创建用户目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 读取工作簿失败
    #[error("读取工作簿失败 ({path}): {message}")]
    ReadFailed { path: String, message: String },
    /// 写入工作簿失败
    #[error("写入工作簿失败 ({path}): {message}")]
    WriteFailed { path: String, message: String },
    /// 工作簿中缺少目标工作表
    #[error("工作簿 {path} 中不存在工作表 {sheet}")]
    SheetMissing { path: String, sheet: String },
    /// 后台写入任务异常退出
    #[error("写入任务异常: {0}")]
    TaskFailed(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 题目文件加载错误
#[derive(Debug, Error)]
pub enum QuestionLoadError {
    /// 文件读取失败
    #[error("无法读取题目文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("题目文件 JSON 解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 解析失败
    #[error("题目文件 TOML 解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 不支持的文件扩展名
    #[error("不支持的题目文件格式: {path}")]
    UnsupportedFormat { path: String },
    /// 题号重复
    #[error("题号 {number} 重复出现")]
    DuplicateNumber { number: u32 },
}

// ========== 便捷构造函数 ==========

impl StorageError {
    /// 创建工作簿读取错误
    pub fn read_failed(path: impl Into<String>, source: impl std::fmt::Display) -> Self {
        StorageError::ReadFailed {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// 创建工作簿写入错误
    pub fn write_failed(path: impl Into<String>, source: impl std::fmt::Display) -> Self {
        StorageError::WriteFailed {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

// ========== HTTP 响应映射 ==========

impl AppError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // 内部细节只写日志，不返回给客户端
        let body = if status == StatusCode::BAD_REQUEST {
            "Invalid request data"
        } else {
            "Internal server error"
        };
        (status, body).into_response()
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
