//! Localized user-facing messages
//!
//! All console text is looked up by a stable key in a per-language string
//! table. Lookup falls back from the current language to English and finally
//! to the key itself, so a missing translation never hides a message.
//!
//! Format strings use `%s`/`%d` for the next positional argument and
//! `%N$s` for an explicit one (translations may reorder arguments).

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Language -> (key -> format string)
pub type StringTable = HashMap<String, HashMap<String, String>>;

lazy_static::lazy_static! {
    static ref BUILTIN: Arc<StringTable> = Arc::new(
        serde_json::from_str(include_str!("strings.json")).unwrap_or_default()
    );

    static ref PLACEHOLDER: Regex = Regex::new(r"%(?:(\d+)\$)?([sd%])").unwrap();
}

/// Handle for looking up messages in one language.
#[derive(Debug, Clone)]
pub struct Messages {
    table: Arc<StringTable>,
    current: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self::with_table(Arc::clone(&BUILTIN), DEFAULT_LANGUAGE)
    }
}

impl Messages {
    /// Messages in `lang`, or in the system language when `None`.
    pub fn new(lang: Option<&str>) -> Self {
        let mut messages = Self::default();
        let wanted = lang.map(str::to_string).unwrap_or_else(system_language);
        messages.set_language(&wanted);
        messages
    }

    pub fn with_table(table: Arc<StringTable>, lang: &str) -> Self {
        Self {
            table,
            current: lang.to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.current
    }

    /// Switch language. Unsupported languages keep the current one.
    pub fn set_language(&mut self, lang: &str) {
        let key = lang_key(lang);
        if self.table.contains_key(&key) {
            self.current = key;
        } else {
            tracing::warn!(
                "{}",
                self.format("WARNING_LANG_NOT_SUPPORT_FMT", &[lang.to_string()])
            );
        }
    }

    /// Languages present in the table, sorted.
    pub fn available_languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.table.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }

    /// Raw format string for `key`.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        [self.current.as_str(), DEFAULT_LANGUAGE]
            .iter()
            .filter_map(|lang| self.table.get(*lang))
            .find_map(|strings| strings.get(key).filter(|s| !s.is_empty()))
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Look up `key` and fill in positional arguments.
    pub fn format(&self, key: &str, args: &[String]) -> String {
        fill(self.get(key), args)
    }
}

/// Fill `%s`, `%d` and `%N$s` placeholders. Missing arguments are left as-is.
pub fn fill(fmt: &str, args: &[String]) -> String {
    let mut next = 0;
    PLACEHOLDER
        .replace_all(fmt, |caps: &Captures| {
            if &caps[2] == "%" {
                return "%".to_string();
            }
            let index = match caps.get(1) {
                Some(n) => n.as_str().parse::<usize>().unwrap_or(0).wrapping_sub(1),
                None => {
                    next += 1;
                    next - 1
                }
            };
            args.get(index)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Map a locale name to a table key.
///
/// `zh` and `zh_CN` map to `zh`, other Chinese regions to `zh_tw`, and
/// everything else to its lowercased language part.
pub fn lang_key(locale: &str) -> String {
    let base = locale.split(['.', '@']).next().unwrap_or(locale);
    let mut parts = base.split(['_', '-']);
    let lang = parts.next().unwrap_or("").to_lowercase();
    let region = parts.next().map(str::to_lowercase);

    if lang == "zh" {
        match region.as_deref() {
            None | Some("cn") => "zh".to_string(),
            Some(_) => "zh_tw".to_string(),
        }
    } else if lang.is_empty() || lang == "c" || lang == "posix" {
        DEFAULT_LANGUAGE.to_string()
    } else {
        lang
    }
}

/// Language from `LC_ALL`, `LC_MESSAGES` or `LANG`, defaulting to English.
pub fn system_language() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty())
        .map(|v| lang_key(&v))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}
