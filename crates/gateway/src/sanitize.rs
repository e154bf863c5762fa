//! Reply sanitization — strip upstream formatting artifacts before a reply
//! is stored or returned.
//!
//! Three rule families, applied in order:
//! - markdown markers: emphasis delimiters, `[n]` citation markers, heading
//!   prefixes, horizontal rules
//! - leading "process narration" sentences, matched against a configured
//!   denylist of sentence-start prefixes
//! - empty-output guard: a fixed fallback phrase when nothing survives
//!
//! `clean` is idempotent; every rule removes text that the rule itself can
//! no longer match.

use regex::Regex;

use pc_domain::config::SanitizerConfig;

pub struct ReplySanitizer {
    /// Lowercased sentence-start prefixes to delete.
    openers: Vec<String>,
    fallback: String,
    citation_re: Regex,
    heading_re: Regex,
    rule_re: Regex,
    underscore_re: Regex,
}

impl ReplySanitizer {
    pub fn from_config(cfg: &SanitizerConfig) -> Self {
        Self {
            openers: cfg
                .narration_openers
                .iter()
                .map(|o| o.trim().to_lowercase())
                .filter(|o| !o.is_empty())
                .collect(),
            fallback: cfg.empty_reply_fallback.clone(),
            citation_re: Regex::new(r"\[\d+\]").unwrap(),
            heading_re: Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").unwrap(),
            rule_re: Regex::new(r"(?m)^[ \t]*[-_]{3,}[ \t]*\n?").unwrap(),
            underscore_re: Regex::new(r"\b_([^_\n]+)_\b").unwrap(),
        }
    }

    /// Strip formatting artifacts and narration openers from a raw reply.
    pub fn clean(&self, raw: &str) -> String {
        let text = raw.replace("**", "").replace("__", "").replace('*', "");
        let text = self.underscore_re.replace_all(&text, "$1");
        let text = self.citation_re.replace_all(&text, "");
        let text = self.heading_re.replace_all(&text, "");
        let text = self.rule_re.replace_all(&text, "");
        let text = self.strip_narration(text.trim());

        if text.is_empty() {
            self.fallback.clone()
        } else {
            text.to_owned()
        }
    }

    /// Delete leading sentences that start with a denylisted prefix, each
    /// through its terminating punctuation (or line break).
    fn strip_narration<'a>(&self, mut text: &'a str) -> &'a str {
        'sentences: loop {
            let lower = text.to_lowercase();
            for opener in &self.openers {
                if !lower.starts_with(opener.as_str()) {
                    continue;
                }
                match text.find(['.', '!', '?', '\n']) {
                    Some(end) => {
                        text = text[end + 1..].trim_start();
                        continue 'sentences;
                    }
                    // Unterminated narration sentence: nothing of substance
                    // follows it.
                    None => return "",
                }
            }
            return text;
        }
    }
}
