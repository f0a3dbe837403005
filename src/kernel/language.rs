use serde::{Deserialize, Serialize};

/// 文件语言标签；未知扩展名落到 `PlainText`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Html,
    Css,
    Json,
    Markdown,
    Python,
    #[default]
    PlainText,
}

impl LanguageId {
    pub fn from_file_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Self::PlainText,
        };
        match ext.as_str() {
            "js" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "html" => Self::Html,
            "css" => Self::Css,
            "json" => Self::Json,
            "md" => Self::Markdown,
            "py" => Self::Python,
            _ => Self::PlainText,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim().to_ascii_lowercase();
        match v.as_str() {
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "html" => Some(Self::Html),
            "css" => Some(Self::Css),
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "python" | "py" => Some(Self::Python),
            "plaintext" | "text" | "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// 传给编辑器组件的语言标识
    pub fn language_id(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Python => "python",
            Self::PlainText => "plaintext",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Json => "JSON",
            Self::Markdown => "Markdown",
            Self::Python => "Python",
            Self::PlainText => "Plain Text",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;
