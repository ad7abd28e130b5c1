// docmatch/src/engine/normalize.rs
//
// Text normalization before comparison.
//
// Pipeline (order matters):
//   1. Unicode NFKC               width/compatibility forms folded
//   2. Built-in rules             caller order, each deletes all matches
//   3. Custom removal patterns    one per line, bad lines skipped
//   4. Lower-case + whitespace collapse
//   5. Lemmatization              only when a lemmatizer is attached
//
// Rules run sequentially on the shrinking text, so `[titles, quotes]` and
// `[quotes, titles]` can disagree. Callers rely on this ordering; it is not
// normalized away.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::config::{FilterConfig, Rule};
use crate::error::PatternError;

const RULE_PATTERNS: &[(Rule, &str)] = &[
    (
        Rule::Gost,
        r"(?is)(?:\A|\n)(?:Список литературы|Библиография|Пайдаланылған әдебиеттер).*$",
    ),
    (Rule::Apa, r"(?is)(?:\A|\n)(?:References|Bibliography).*$"),
    (Rule::Tables, r"(?i)(?:Таблица|Table|Кесте|Схема|Рисунок)\s+\d+.*?\n"),
    (
        Rule::Titles,
        r"(?is)^.*?(?:Министерство|УДК|МРНТИ|Дипломная работа|Thesis|Work|Проект).*?\n\n",
    ),
    (Rule::Quotes, r#"["«'](.*?)["»']"#),
];

static RULE_REGEXES: OnceLock<Vec<(Rule, Regex)>> = OnceLock::new();

fn rule_regexes() -> &'static [(Rule, Regex)] {
    RULE_REGEXES.get_or_init(|| {
        RULE_PATTERNS
            .iter()
            .map(|(rule, pat)| (*rule, Regex::new(pat).expect("built-in rule regex")))
            .collect()
    })
}

fn rule_regex(rule: Rule) -> &'static Regex {
    rule_regexes()
        .iter()
        .find(|(r, _)| *r == rule)
        .map(|(_, re)| re)
        .expect("every rule has a pattern")
}

/// Optional lemmatization capability (e.g. a bilingual KK/RU model).
pub trait Lemmatizer: Send + Sync {
    /// `None` means "could not lemmatize"; the text is then left as is.
    fn lemmatize(&self, text: &str) -> Option<String>;
}

/// Compiled normalization settings for one run.
pub struct Normalizer {
    rules:      Vec<Rule>,
    custom:     Vec<Regex>,
    rejected:   Vec<PatternError>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
}

impl Normalizer {
    pub fn new(config: &FilterConfig) -> Self {
        let mut custom = Vec::new();
        let mut rejected = Vec::new();

        for pattern in custom_pattern_lines(&config.custom_patterns) {
            match Regex::new(pattern) {
                Ok(re) => custom.push(re),
                Err(e) => rejected.push(PatternError { pattern: pattern.to_string(), reason: e.to_string() }),
            }
        }

        let rules = config.effective_rules();
        debug!("normalizer rules={:?} custom={} rejected={}", rules, custom.len(), rejected.len());

        Self { rules, custom, rejected, lemmatizer: None }
    }

    pub fn with_lemmatizer(mut self, lemmatizer: Option<Arc<dyn Lemmatizer>>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    /// Custom patterns that failed to compile and are being skipped.
    pub fn rejected_patterns(&self) -> &[PatternError] {
        &self.rejected
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut text: String = text.nfkc().collect();

        for rule in &self.rules {
            text = rule_regex(*rule).replace_all(&text, "").into_owned();
        }
        for re in &self.custom {
            text = re.replace_all(&text, "").into_owned();
        }

        let mut text = collapse_whitespace(&text.to_lowercase());

        if let Some(lemmatizer) = &self.lemmatizer {
            if !text.is_empty() {
                if let Some(lemmas) = lemmatizer.lemmatize(&text) {
                    text = collapse_whitespace(&lemmas);
                }
            }
        }
        text
    }
}

/// Usable pattern bodies: comment after `//` stripped, trimmed, 2+ chars.
fn custom_pattern_lines(lines: &[String]) -> impl Iterator<Item = &str> {
    lines
        .iter()
        .flat_map(|block| block.lines())
        .map(|line| line.split("//").next().unwrap_or("").trim())
        .filter(|p| p.chars().count() > 1)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
