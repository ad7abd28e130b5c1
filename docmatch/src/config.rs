// docmatch/src/config.rs
//
// Filter configuration for one comparison run.
//
// Callers resolve it from stored user settings (JSON, same field names the
// settings page writes) and optionally extend it from CLI flags. Once a run
// starts the config is immutable.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Built-in removal rules. Applied in the order the caller lists them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Gost,   // Russian/Kazakh bibliography section
    Apa,    // English bibliography section
    Tables, // table / figure captions
    Titles, // title-page boilerplate
    Quotes, // quoted spans
}

impl Rule {
    pub const ALL: [Rule; 5] = [Rule::Gost, Rule::Apa, Rule::Tables, Rule::Titles, Rule::Quotes];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gost => "gost",
            Self::Apa => "apa",
            Self::Tables => "tables",
            Self::Titles => "titles",
            Self::Quotes => "quotes",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Rule::ALL
            .iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown rule '{}'", s))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    pub active_rules:    Vec<Rule>,
    /// Raw lines; `//` starts a comment, lines shorter than 2 chars are ignored.
    pub custom_patterns: Vec<String>,
    pub exclude_quotes:  bool,
}

impl FilterConfig {
    /// Rules actually applied: caller order, duplicates dropped, `quotes`
    /// appended when `exclude_quotes` is set and it isn't listed.
    pub fn effective_rules(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = Vec::with_capacity(self.active_rules.len() + 1);
        for rule in &self.active_rules {
            if !rules.contains(rule) {
                rules.push(*rule);
            }
        }
        if self.exclude_quotes && !rules.contains(&Rule::Quotes) {
            rules.push(Rule::Quotes);
        }
        rules
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.active_rules.extend(rules);
        self
    }

    pub fn with_patterns<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.custom_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }
}

// ── Stored user settings ──────────────────────────────────────────────────────

/// Settings document as persisted per user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub active_rules:   Vec<String>,
    #[serde(default)]
    pub custom_regex:   String,
    #[serde(default)]
    pub exclude_quotes: bool,
}

impl UserSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Unknown rule names are ignored.
    pub fn to_filter_config(&self) -> FilterConfig {
        let active_rules = self
            .active_rules
            .iter()
            .filter_map(|name| match name.parse::<Rule>() {
                Ok(rule) => Some(rule),
                Err(e) => {
                    warn!("Ignoring settings rule: {}", e);
                    None
                }
            })
            .collect();

        FilterConfig {
            active_rules,
            custom_patterns: self.custom_regex.lines().map(str::to_string).collect(),
            exclude_quotes: self.exclude_quotes,
        }
    }
}
