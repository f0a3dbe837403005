//! 界面文案：内置 en / zh-CN 目录，按点分路径取值并替换 `{{ name }}` 占位符

use std::fmt::{self, Display, Write as _};

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::kernel::services::ports::Locale;

const EN_CATALOG: &str = include_str!("../../locales/en.json");
const ZH_CN_CATALOG: &str = include_str!("../../locales/zh-CN.json");

pub struct Translator {
    locale: Locale,
    catalogs: FxHashMap<Locale, Value>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl Translator {
    pub fn builtin(locale: Locale) -> Self {
        let mut catalogs = FxHashMap::default();
        for (loc, raw) in [(Locale::En, EN_CATALOG), (Locale::ZhCn, ZH_CN_CATALOG)] {
            match serde_json::from_str::<Value>(raw) {
                Ok(catalog) => {
                    catalogs.insert(loc, catalog);
                }
                Err(e) => {
                    tracing::error!(locale = loc.as_str(), error = %e, "invalid built-in catalog");
                }
            }
        }
        Self { locale, catalogs }
    }

    pub fn with_catalogs(locale: Locale, catalogs: FxHashMap<Locale, Value>) -> Self {
        Self { locale, catalogs }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) -> bool {
        let changed = self.locale != locale;
        self.locale = locale;
        changed
    }

    /// 缺失的 key 原样返回
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &dyn Display)]) -> String {
        let catalog = self
            .catalogs
            .get(&self.locale)
            .or_else(|| self.catalogs.get(&Locale::En));
        let text = catalog.and_then(|c| lookup(c, key)).unwrap_or(key);
        interpolate(text, params)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::builtin(Locale::default())
    }
}

/// 逐段下钻；路径不存在或终点不是字符串时返回 `None`
pub fn lookup<'a>(catalog: &'a Value, path: &str) -> Option<&'a str> {
    let mut node = catalog;
    for segment in path.split('.') {
        node = node.as_object()?.get(segment)?;
    }
    node.as_str()
}

/// 替换 `{{name}}`（花括号内允许空白）；未提供的占位符保持原样
pub fn interpolate(text: &str, params: &[(&str, &dyn Display)]) -> String {
    if params.is_empty() || !text.contains("{{") {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = after_open[..close].trim();
        match params.iter().find(|(k, _)| *k == name) {
            Some((_, value)) => {
                let _ = write!(out, "{}", value);
            }
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/i18n.rs"]
mod tests;
