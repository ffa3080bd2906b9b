//! Bullet items under `## Name:` sections of markdown documents.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static NEXT_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n##\s").expect("heading pattern is valid"));

/// Bullet lines (`- ...`, trimmed) of the first `## <section>:` block.
///
/// The block runs to the next `## ` heading or the end of the text. Heading
/// match is case-insensitive. Returns an empty list when the section is absent.
pub fn extract_bullet_items(content: &str, section: &str) -> Vec<String> {
    let pattern = format!(r"##\s*{}\s*:\s*", regex::escape(section));
    let heading = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    let Some(found) = heading.find(content) else {
        return Vec::new();
    };

    let rest = &content[found.end()..];
    let block = match NEXT_HEADING_RE.find(rest) {
        Some(next) => &rest[..next.start()],
        None => rest,
    };

    block
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

/// Bullet items of `section` across documents, first occurrence wins.
pub fn collect_bullet_items<I, S>(documents: I, section: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items: Vec<String> = Vec::new();
    for document in documents {
        for item in extract_bullet_items(document.as_ref(), section) {
            if !items.contains(&item) {
                items.push(item);
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Shot list\n\n## Props:\n- lamp\n  - chair\nnot a bullet\n\n## Cast:\n- Ana\n";

    #[test]
    fn test_extracts_until_next_heading() {
        assert_eq!(extract_bullet_items(DOC, "Props"), vec!["- lamp", "- chair"]);
        assert_eq!(extract_bullet_items(DOC, "Cast"), vec!["- Ana"]);
    }

    #[test]
    fn test_heading_is_case_insensitive() {
        assert_eq!(extract_bullet_items(DOC, "props"), vec!["- lamp", "- chair"]);
    }

    #[test]
    fn test_missing_section() {
        assert!(extract_bullet_items(DOC, "Locations").is_empty());
    }

    #[test]
    fn test_section_name_is_literal() {
        let doc = "## a.b:\n- x\n";
        assert_eq!(extract_bullet_items(doc, "a.b"), vec!["- x"]);
        assert!(extract_bullet_items("## axb:\n- y\n", "a.b").is_empty());
    }

    #[test]
    fn test_collect_dedups_across_documents() {
        let docs = ["## Props:\n- lamp\n", "## Props:\n- lamp\n- rug\n"];
        assert_eq!(collect_bullet_items(docs, "Props"), vec!["- lamp", "- rug"]);
    }
}
