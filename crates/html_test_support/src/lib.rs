//! Render-case fixtures shared by the markup tests and the `markup` binary.
//!
//! A fixture file is TOML with one `[[case]]` table per case:
//!
//! ```toml
//! [[case]]
//! name = "escaped_text"
//! segments = ["<p>", "</p>"]
//! values = [{ text = "<b>" }]
//! html = "<p>&lt;b&gt;</p>"
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse fixture {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("case {name:?} has {segments} segments for {values} values; expected one more segment than values")]
    Arity {
        name: String,
        segments: usize,
        values: usize,
    },
    #[error("duplicate case name {0:?}")]
    DuplicateName(String),
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default, rename = "case")]
    cases: Vec<RenderCase>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderCase {
    pub name: String,
    /// Literal template segments; always one more than `values`.
    pub segments: Vec<String>,
    #[serde(default)]
    pub values: Vec<CaseValue>,
    /// Expected serialized output, if the case checks it.
    pub html: Option<String>,
    /// Expected number of placeholders that cannot be substituted.
    #[serde(default)]
    pub missing: usize,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseValue {
    Text(String),
    Unsafe(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Element(ElementSpec),
    TextNode(String),
    Seq(Vec<CaseValue>),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
}

pub fn load_cases(path: &Path) -> Result<Vec<RenderCase>, FixtureError> {
    let content = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_cases(&content, path)
}

/// Parses fixture text; `path` is only used in error messages.
pub fn parse_cases(content: &str, path: &Path) -> Result<Vec<RenderCase>, FixtureError> {
    let file: FixtureFile = toml::from_str(content).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut seen = HashSet::new();
    for case in &file.cases {
        if case.segments.len() != case.values.len() + 1 {
            return Err(FixtureError::Arity {
                name: case.name.clone(),
                segments: case.segments.len(),
                values: case.values.len(),
            });
        }
        if !seen.insert(case.name.as_str()) {
            return Err(FixtureError::DuplicateName(case.name.clone()));
        }
    }
    Ok(file.cases)
}

#[cfg(feature = "markup")]
mod convert {
    use super::{CaseValue, ElementSpec, RenderCase};
    use markup::{NodeRef, Template, UnsafeMarkup, Value};

    impl RenderCase {
        /// Builds a template whose segments are spliced verbatim, as literals are.
        pub fn to_template(&self) -> Template {
            let mut segments = self.segments.iter();
            let mut template = Template::new("");
            if let Some(head) = segments.next() {
                template.push(UnsafeMarkup::trusted(head.clone()), "");
            }
            for (value, segment) in self.values.iter().zip(segments) {
                template.push(value.to_value(), "");
                template.push(UnsafeMarkup::trusted(segment.clone()), "");
            }
            template
        }
    }

    impl CaseValue {
        pub fn to_value(&self) -> Value {
            match self {
                CaseValue::Text(s) => Value::from(s),
                CaseValue::Unsafe(s) => Value::from(UnsafeMarkup::trusted(s.clone())),
                CaseValue::Int(n) => Value::from(*n),
                CaseValue::Float(n) => Value::from(*n),
                CaseValue::Bool(b) => Value::from(*b),
                CaseValue::Null => Value::null(),
                CaseValue::Element(spec) => Value::from(spec.build()),
                CaseValue::TextNode(s) => Value::from(NodeRef::text(s.clone())),
                CaseValue::Seq(items) => Value::seq(items.iter().map(CaseValue::to_value)),
            }
        }
    }

    impl ElementSpec {
        pub fn build(&self) -> NodeRef {
            let node = NodeRef::element(&self.tag);
            for (name, value) in &self.attrs {
                node.set_attribute(name, value);
            }
            if let Some(text) = &self.text {
                // A fresh text node always fits under a fresh element.
                let _ = node.append_child(&NodeRef::text(text.clone()));
            }
            node
        }
    }
}

/// Describes the first differing line of two line sequences with two lines of context.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    let max = expected.len().max(actual.len());
    let mut out = String::new();
    use std::fmt::Write;
    let missing = "<missing>";
    let mismatch = (0..max).find(|&i| {
        expected.get(i).map(String::as_str).unwrap_or(missing)
            != actual.get(i).map(String::as_str).unwrap_or(missing)
    });
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let left = expected
                .get(line_idx)
                .map(String::as_str)
                .unwrap_or(missing);
            let right = actual.get(line_idx).map(String::as_str).unwrap_or(missing);
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Splits serialized markup at tag boundaries so diffs point at the differing element.
pub fn markup_lines(markup: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for ch in markup.chars() {
        if ch == '<' && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[case]]
name = "one"
segments = ["<p>", "</p>"]
values = [{ text = "<b>" }]
html = "<p>&lt;b&gt;</p>"

[[case]]
name = "two"
segments = ["<ul>", "", "</ul>"]
values = [
  { element = { tag = "li", text = "a" } },
  { seq = [{ int = 1 }, "null", { bool = true }] },
]
missing = 0
"#;

    #[test]
    fn parses_cases_and_values() {
        let cases = parse_cases(SAMPLE, Path::new("sample.toml")).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].html.as_deref(), Some("<p>&lt;b&gt;</p>"));
        let CaseValue::Element(spec) = &cases[1].values[0] else {
            panic!("expected element value");
        };
        assert_eq!(spec.tag, "li");
        let CaseValue::Seq(items) = &cases[1].values[1] else {
            panic!("expected sequence value");
        };
        assert!(matches!(items[1], CaseValue::Null));
    }

    #[test]
    fn rejects_wrong_arity() {
        let src = "[[case]]\nname = \"bad\"\nsegments = [\"a\"]\nvalues = [{ int = 1 }]\n";
        let err = parse_cases(src, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, FixtureError::Arity { segments: 1, values: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let src = "[[case]]\nname = \"x\"\nsegments = [\"\"]\n[[case]]\nname = \"x\"\nsegments = [\"\"]\n";
        let err = parse_cases(src, Path::new("dup.toml")).unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateName(name) if name == "x"));
    }

    #[test]
    fn diff_points_at_first_mismatch() {
        let expected = markup_lines("<p>a</p><p>b</p>");
        let actual = markup_lines("<p>a</p><p>c</p>");
        let diff = diff_lines(&expected, &actual);
        assert!(diff.contains("first mismatch at line 3"), "{diff}");
        assert!(diff.contains("expected: <p>b"));
    }
}
