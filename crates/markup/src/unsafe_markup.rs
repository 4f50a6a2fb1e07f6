use std::borrow::Cow;
use std::fmt;

/// Markup that is spliced into a template verbatim.
///
/// Built with [`unsafe_html!`](crate::unsafe_html): literal segments and interpolated
/// values are concatenated without escaping. Only the construction site decides that
/// the content is trusted; nothing here checks it. The wrapped text is only read back
/// when a template splices it.
#[derive(Clone, Debug, Default)]
pub struct UnsafeMarkup {
    raw: String,
}

impl UnsafeMarkup {
    pub fn new(head: &'static str) -> Self {
        Self {
            raw: head.to_string(),
        }
    }

    /// Wraps a dynamic string the caller has already vetted.
    pub fn trusted(raw: impl Into<Cow<'static, str>>) -> Self {
        Self {
            raw: raw.into().into_owned(),
        }
    }

    /// Appends `value`'s display form unescaped, then the next literal segment.
    pub fn then<D: fmt::Display + ?Sized>(mut self, value: &D, segment: &'static str) -> Self {
        use std::fmt::Write;
        let _ = write!(self.raw, "{value}");
        self.raw.push_str(segment);
        self
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.raw
    }
}
