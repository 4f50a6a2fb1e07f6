use crate::entropy::{Entropy, SystemEntropy};
use crate::ids::{DEFAULT_ID_PREFIX, IdGenerator};
use html::DomError;
use std::borrow::Cow;
use std::fmt;

/// Token prefix and the shape of the marker element that stands in for a live node in
/// accumulated markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub id_prefix: Cow<'static, str>,
    pub marker_tag: Cow<'static, str>,
    pub marker_attribute: Cow<'static, str>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            id_prefix: Cow::Borrowed(DEFAULT_ID_PREFIX),
            marker_tag: Cow::Borrowed("div"),
            marker_attribute: Cow::Borrowed("id"),
        }
    }
}

/// Non-fatal problems found while substituting live nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// No marker with this token survived parsing, e.g. because it was written inside
    /// `<style>`, `<textarea>` or an attribute value. The node was not inserted.
    MissingPlaceholder { token: String, tag: Option<String> },
    /// The marker was found but the node could not be put in its place.
    SubstitutionFailed { token: String, error: DomError },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingPlaceholder { token, tag } => {
                write!(f, "placeholder {token} not found in parsed output")?;
                if let Some(tag) = tag {
                    write!(f, "; <{tag}> element was not inserted")?;
                }
                Ok(())
            }
            Diagnostic::SubstitutionFailed { token, error } => {
                write!(f, "placeholder {token} could not be replaced: {error}")
            }
        }
    }
}

/// Per-caller rendering state: id source, marker shape and collected diagnostics.
#[derive(Debug)]
pub struct RenderContext<E = SystemEntropy> {
    pub(crate) ids: IdGenerator<E>,
    pub(crate) config: RenderConfig,
    diagnostics: Vec<Diagnostic>,
}

impl Default for RenderContext<SystemEntropy> {
    fn default() -> Self {
        Self::new(RenderConfig::default(), SystemEntropy)
    }
}

impl<E: Entropy> RenderContext<E> {
    pub fn new(config: RenderConfig, entropy: E) -> Self {
        Self {
            ids: IdGenerator::new(entropy).with_prefix(config.id_prefix.clone()),
            config,
            diagnostics: Vec::new(),
        }
    }

    /// Default configuration with the given entropy source.
    pub fn with_entropy(entropy: E) -> Self {
        Self::new(RenderConfig::default(), entropy)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn ids(&self) -> &IdGenerator<E> {
        &self.ids
    }

    pub fn id_prefix(&self) -> &str {
        self.ids.prefix()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!(target: "markup.render", "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_display_and_drain() {
        let mut cx: RenderContext = RenderContext::default();
        assert_eq!(cx.id_prefix(), DEFAULT_ID_PREFIX);
        cx.report(Diagnostic::MissingPlaceholder {
            token: "sym_1".to_string(),
            tag: Some("b".to_string()),
        });
        assert_eq!(
            cx.diagnostics()[0].to_string(),
            "placeholder sym_1 not found in parsed output; <b> element was not inserted"
        );
        assert_eq!(cx.take_diagnostics().len(), 1);
        assert!(cx.diagnostics().is_empty());
    }

    #[test]
    fn prefix_is_configurable() {
        let config = RenderConfig {
            id_prefix: "tpl-".into(),
            ..RenderConfig::default()
        };
        let cx = RenderContext::new(config, SystemEntropy);
        assert_eq!(cx.id_prefix(), "tpl-");
        assert_eq!(cx.config().marker_tag, "div");
    }
}
