use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "SURVEY_CONFIG";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub bind_addr: SocketAddr,
    /// 题目文件（.json 或 .toml）
    pub questions_file: PathBuf,
    /// 静态前端目录
    pub static_dir: PathBuf,
    /// 数据目录，存放用户目录和结果表格
    pub data_dir: PathBuf,
    /// 结果表格文件名（位于 data_dir 下）
    pub results_file: String,
    /// 工作表名称
    pub sheet_name: String,
    // --- 表头配置 ---
    pub name_header: String,
    pub username_header: String,
    /// 前几个答案对应的语义列
    pub answer_headers: Vec<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            questions_file: PathBuf::from("q.json"),
            static_dir: PathBuf::from("templates"),
            data_dir: PathBuf::from("users"),
            results_file: "results.xlsx".to_string(),
            sheet_name: "Sheet1".to_string(),
            name_header: "Nume".to_string(),
            username_header: "Prenume".to_string(),
            answer_headers: vec![
                "Varsta".to_string(),
                "Culoare preferata".to_string(),
                "Mancare preferata".to_string(),
                "Locatie".to_string(),
                "Carte preferata".to_string(),
            ],
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// 用给定的查找函数覆盖配置（便于测试，不依赖进程环境）
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SURVEY_BIND_ADDR") {
            self.bind_addr = parse_var("SURVEY_BIND_ADDR", v, "socket address")?;
        }
        if let Some(v) = lookup("SURVEY_QUESTIONS_FILE") {
            self.questions_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("SURVEY_STATIC_DIR") {
            self.static_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SURVEY_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SURVEY_RESULTS_FILE") {
            self.results_file = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", v, "bool")?;
        }
        Ok(self)
    }

    /// 结果表格的完整路径
    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(&self.results_file)
    }

    /// 用户目录与结果文件同在 data_dir 下，结果文件路径的第一段不能作为用户名
    pub fn reserved_usernames(&self) -> Vec<String> {
        Path::new(&self.results_file)
            .components()
            .find_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .into_iter()
            .collect()
    }
}

fn parse_var<T: std::str::FromStr>(
    var_name: &str,
    value: String,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value,
        expected_type: expected_type.to_string(),
    })
}
