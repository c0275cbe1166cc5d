//! Placeholder substitution
//!
//! Replaces `{{key}}` tokens with values, one run at a time. A token is
//! only found when it sits entirely inside one run's text; Word sometimes
//! splits what looks like a single token across several runs (after a
//! spell-check pass or a partial formatting change), and such tokens are
//! left as they are and reported in [`FillReport::split_tokens`].

use crate::body::{DocumentBody, Paragraph};
use crate::error::{FillError, TemplateError};
use crate::package::TemplateDocument;
use regex_lite::Regex;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;

/// Ordered `(token, value)` pairs applied to each run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from key/value pairs; each value is used in its `to_string` form
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let mut subs = Self::new();
        for (key, value) in pairs {
            subs.insert(key, value);
        }
        subs
    }

    /// Add a key, or replace the value of a key already present
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl ToString) {
        let token = Self::token(key.as_ref());
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(t, _)| *t == token) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((token, value)),
        }
    }

    /// The placeholder token for a key: `{{key}}`
    pub fn token(key: &str) -> String {
        format!("{{{{{}}}}}", key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let token = Self::token(key);
        self.pairs.iter().any(|(t, _)| *t == token)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replace every known token in `text`, key by key in insertion order.
    ///
    /// Returns the new text and the number of replacements, or `None` when
    /// no token occurs.
    pub fn apply(&self, text: &str) -> Option<(String, usize)> {
        let mut current: Option<String> = None;
        let mut count = 0;

        for (token, value) in &self.pairs {
            let source = current.as_deref().unwrap_or(text);
            let hits = source.matches(token.as_str()).count();
            if hits > 0 {
                count += hits;
                current = Some(source.replace(token.as_str(), value));
            }
        }

        current.map(|text| (text, count))
    }
}

/// What a fill pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Paragraphs visited (top-level and table-cell paragraphs)
    pub paragraphs: usize,
    /// Runs whose text ended up different from the template
    pub runs_rewritten: usize,
    /// Token occurrences replaced, including values identical to their token
    pub replacements: usize,
    /// Placeholder-shaped text still present inside single runs, sorted
    pub unresolved: Vec<String>,
    /// Placeholders that only appear when adjacent runs are joined, sorted
    pub split_tokens: Vec<String>,
}

impl FillReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty() && self.split_tokens.is_empty()
    }
}

/// A filled document held in memory
#[derive(Debug, Clone)]
pub struct FilledDocument {
    bytes: Vec<u8>,
    report: FillReport,
}

impl FilledDocument {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn report(&self) -> &FillReport {
        &self.report
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// A reader over the document, positioned at its first byte
    pub fn into_reader(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{[^{}]+\}\}").expect("placeholder pattern is valid"))
}

/// Substitute tokens in every reachable paragraph of an opened template
pub fn fill_document(template: &mut TemplateDocument, subs: &Substitutions) -> FillReport {
    let body = template.body_mut();
    let paragraphs: Vec<Paragraph> = body.reachable_paragraphs().into_iter().cloned().collect();
    let mut report = FillReport {
        paragraphs: paragraphs.len(),
        ..FillReport::default()
    };

    for paragraph in &paragraphs {
        replace_in_paragraph(body, paragraph, subs, &mut report);
    }

    let (unresolved, split) = scan_leftovers(body, &paragraphs);
    report.unresolved = unresolved;
    report.split_tokens = split;
    report
}

fn replace_in_paragraph(
    body: &mut DocumentBody,
    paragraph: &Paragraph,
    subs: &Substitutions,
    report: &mut FillReport,
) {
    for &run in paragraph.runs() {
        if body.is_locked(run) {
            continue;
        }
        let Some((text, count)) = subs.apply(body.run_text(run)) else {
            continue;
        };
        report.replacements += count;
        if text != body.run_text(run) {
            body.set_run_text(run, text);
            report.runs_rewritten += 1;
        }
    }
}

fn scan_leftovers(body: &DocumentBody, paragraphs: &[Paragraph]) -> (Vec<String>, Vec<String>) {
    let pattern = placeholder_pattern();
    let mut unresolved = BTreeSet::new();
    let mut split = BTreeSet::new();

    for paragraph in paragraphs {
        let mut in_runs = BTreeSet::new();
        for &run in paragraph.runs() {
            for m in pattern.find_iter(body.run_text(run)) {
                in_runs.insert(m.as_str().to_string());
            }
        }
        for m in pattern.find_iter(&body.paragraph_text(paragraph)) {
            if !in_runs.contains(m.as_str()) {
                split.insert(m.as_str().to_string());
            }
        }
        unresolved.extend(in_runs);
    }

    (unresolved.into_iter().collect(), split.into_iter().collect())
}

/// Fill the template at `template_path` and return the result in memory.
///
/// The template file is only read. On any failure nothing is returned.
pub fn fill_template(
    subs: &Substitutions,
    template_path: impl AsRef<Path>,
) -> Result<FilledDocument, FillError> {
    let path = template_path.as_ref();

    if !path.is_file() {
        return Err(FillError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut template = match TemplateDocument::open(path) {
        Ok(template) => template,
        Err(TemplateError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FillError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let report = fill_document(&mut template, subs);
    let bytes = template.to_bytes()?;

    for token in &report.split_tokens {
        let key = token.trim_start_matches("{{").trim_end_matches("}}");
        if subs.contains_key(key) {
            tracing::warn!(token = %token, "Placeholder is split across runs and was not replaced");
        }
    }
    tracing::debug!(
        paragraphs = report.paragraphs,
        runs = report.runs_rewritten,
        replacements = report.replacements,
        unresolved = report.unresolved.len(),
        "Filled template {}",
        path.display()
    );

    Ok(FilledDocument { bytes, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        assert_eq!(Substitutions::token("comprador_nome"), "{{comprador_nome}}");
    }

    #[test]
    fn test_apply_replaces_all_occurrences() {
        let subs = Substitutions::from_pairs([("a", "1"), ("b", "2")]);
        let (text, count) = subs.apply("{{a}}-{{b}}-{{a}}").unwrap();
        assert_eq!(text, "1-2-1");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_apply_without_tokens() {
        let subs = Substitutions::from_pairs([("a", "1")]);
        assert_eq!(subs.apply("plain {{other}} text"), None);
    }

    #[test]
    fn test_values_use_display_form() {
        let subs = Substitutions::from_pairs([("n", 420)]);
        assert_eq!(subs.apply("{{n}} meses").unwrap().0, "420 meses");
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut subs = Substitutions::new();
        subs.insert("k", "old");
        subs.insert("k", "new");
        assert_eq!(subs.len(), 1);
        assert_eq!(subs.apply("{{k}}").unwrap().0, "new");
    }

    #[test]
    fn test_empty_value_removes_token() {
        let subs = Substitutions::from_pairs([("k", "")]);
        assert_eq!(subs.apply("a{{k}}b").unwrap(), ("ab".to_string(), 1));
    }

    #[test]
    fn test_placeholder_pattern() {
        let found: Vec<&str> = placeholder_pattern()
            .find_iter("x {{a}} {b} {{ c }} {{}}")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["{{a}}", "{{ c }}"]);
    }

    #[test]
    fn test_missing_template_path() {
        let subs = Substitutions::new();
        let err = fill_template(&subs, "/nonexistent/path/contrato.docx").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_directory_is_not_a_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = fill_template(&Substitutions::new(), dir.path()).unwrap_err();
        assert!(err.is_not_found());
    }
}
