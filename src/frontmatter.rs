//! YAML Front-Matter Aggregator
//!
//! Extracts the `---`-delimited YAML block at the top of each markdown
//! document and deep-merges all of them into one mapping. Extraction problems
//! are recoverable: the document contributes nothing and a warning is kept.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

static FRONT_MATTER_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?ms)\A\x{FEFF}?---[ \t]*\r?\n(.*?)^---[ \t]*\r?$")
        .expect("front matter pattern is valid")
});

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("no YAML front matter found")]
    Missing,

    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter is a {0}, expected a mapping")]
    NotAMapping(&'static str),
}

/// Parse the front matter block at the very start of `text`.
pub fn extract_front_matter(text: &str) -> Result<Mapping, FrontMatterError> {
    let captures = FRONT_MATTER_RE
        .captures(text)
        .ok_or(FrontMatterError::Missing)?;
    let block = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    match serde_yaml::from_str::<Value>(block)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        Value::Sequence(_) => Err(FrontMatterError::NotAMapping("sequence")),
        Value::Tagged(_) => Err(FrontMatterError::NotAMapping("tagged value")),
        _ => Err(FrontMatterError::NotAMapping("scalar")),
    }
}

/// Merge `source` into `destination`.
///
/// Missing keys are inserted, mappings merge recursively, sequences gain the
/// source elements they do not already hold, anything else is overwritten.
pub fn deep_merge(destination: &mut Mapping, source: Mapping) {
    for (key, incoming) in source {
        match destination.get_mut(&key) {
            Some(Value::Mapping(existing)) if incoming.is_mapping() => {
                if let Value::Mapping(incoming) = incoming {
                    deep_merge(existing, incoming);
                }
            }
            Some(Value::Sequence(existing)) if incoming.is_sequence() => {
                if let Value::Sequence(incoming) = incoming {
                    for item in incoming {
                        if !existing.contains(&item) {
                            existing.push(item);
                        }
                    }
                }
            }
            Some(slot) => *slot = incoming,
            None => {
                destination.insert(key, incoming);
            }
        }
    }
}

/// A document whose front matter could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatterWarning {
    /// Position of the document in the aggregated input.
    pub index: usize,
    pub message: String,
}

/// Merged front matter of a document set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub config: Mapping,
    pub warnings: Vec<FrontMatterWarning>,
}

/// Fold [`deep_merge`] over the front matter of each document, in order.
pub fn aggregate<I, S>(documents: I) -> Aggregate
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = Aggregate::default();
    for (index, document) in documents.into_iter().enumerate() {
        match extract_front_matter(document.as_ref()) {
            Ok(mapping) => deep_merge(&mut result.config, mapping),
            Err(e) => {
                warn!(index, error = %e, "Skipping document front matter");
                result.warnings.push(FrontMatterWarning {
                    index,
                    message: e.to_string(),
                });
            }
        }
    }
    result
}
