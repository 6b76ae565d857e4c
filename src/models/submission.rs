use crate::error::ValidationError;
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// 用户名只能是单一路径段
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/\\\x00]+$").expect("username pattern is valid"));

/// `POST /submit` 的请求体
///
/// 字段都是可选的，缺失与否由 [`SubmitRequest::validate`] 判断，
/// 这样缺字段和类型错误都能统一返回 400。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "userData")]
    pub user_data: Option<Vec<Answer>>,
}

/// 单个答案
///
/// 前端可能传字符串，也可能直接传数字或布尔值（例如年龄），统一存成文本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer(pub String);

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Visitor;
        use std::fmt;

        struct AnswerVisitor;

        impl<'de> Visitor<'de> for AnswerVisitor {
            type Value = Answer;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number or boolean answer")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Answer(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Answer(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Answer(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Answer(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Answer(value.to_string()))
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Answer(value.to_string()))
            }
        }

        deserializer.deserialize_any(AnswerVisitor)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer(value.to_string())
    }
}

/// 通过校验的提交
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub username: String,
    pub answers: Vec<String>,
}

impl SubmitRequest {
    /// 校验请求并转换为 [`Submission`]
    ///
    /// # 参数
    /// - `question_count`: 配置的题目数量，答案数量必须与之相等
    /// - `reserved_names`: 数据目录中已被占用的名字（例如结果文件），不能用作用户名
    pub fn validate(
        self,
        question_count: usize,
        reserved_names: &[String],
    ) -> Result<Submission, ValidationError> {
        let name = required_text(self.name, "name")?;
        let username = required_text(self.username, "username")?;
        let answers = self
            .user_data
            .ok_or(ValidationError::MissingField { field: "userData" })?;

        if !is_safe_username(&username) || reserved_names.iter().any(|r| *r == username) {
            return Err(ValidationError::UnsafeUsername { username });
        }

        if answers.len() != question_count {
            return Err(ValidationError::AnswerCountMismatch {
                expected: question_count,
                actual: answers.len(),
            });
        }

        Ok(Submission {
            name,
            username,
            answers: answers.into_iter().map(|a| a.0).collect(),
        })
    }

    /// 从 `application/x-www-form-urlencoded` 表单解析请求
    ///
    /// 答案支持 `userData=a&userData=b`、`userData[]=a` 和 `userData[0]=a` 三种写法；
    /// 带下标的按下标排序，排在不带下标的之前。
    pub fn from_form_pairs<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        let mut request = SubmitRequest::default();
        let mut indexed: BTreeMap<usize, Answer> = BTreeMap::new();
        let mut appended: Vec<Answer> = Vec::new();
        let mut has_answers = false;

        for (key, value) in pairs {
            match &*key {
                "name" => request.name = Some(value.into_owned()),
                "username" => request.username = Some(value.into_owned()),
                "userData" | "userData[]" => {
                    has_answers = true;
                    appended.push(Answer::from(&*value));
                }
                other => {
                    let Some(index) = other
                        .strip_prefix("userData[")
                        .and_then(|rest| rest.strip_suffix(']'))
                    else {
                        continue;
                    };
                    let index = index.parse().map_err(|_| {
                        ValidationError::MalformedBody(format!("无效的答案下标: {}", other))
                    })?;
                    has_answers = true;
                    indexed.insert(index, Answer::from(&*value));
                }
            }
        }

        if has_answers {
            let mut answers: Vec<Answer> = indexed.into_values().collect();
            answers.extend(appended);
            request.user_data = Some(answers);
        }
        Ok(request)
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField { field }),
        Some(v) if v.is_empty() => Err(ValidationError::EmptyField { field }),
        Some(v) => Ok(v),
    }
}

/// 用户名会被用作目录名，因此不能包含路径分隔符，也不能是 `.` 或 `..`
pub fn is_safe_username(username: &str) -> bool {
    username != "." && username != ".." && USERNAME_RE.is_match(username)
}
