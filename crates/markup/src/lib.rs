//! Safe markup templates.
//!
//! Literal template segments are trusted markup. Interpolated strings and scalars are
//! HTML-escaped, [`UnsafeMarkup`] is spliced verbatim, and live [`NodeRef`] elements are
//! inserted by identity, so their listeners and state survive rendering.
//!
//! ```ignore
//! let user = "<script>";
//! let button = NodeRef::element("button");
//! let frag = html!("<p>hi ", user, "</p>", button, "");
//! ```

mod context;
mod entropy;
mod fragment;
mod ids;
mod process;
mod render;
mod unsafe_markup;
mod value;

pub use crate::context::{Diagnostic, RenderConfig, RenderContext};
pub use crate::entropy::{
    Entropy, EntropyError, IdTier, PSEUDO_RANDOM_RANGE, SeededEntropy, SystemEntropy,
};
pub use crate::fragment::Fragment;
pub use crate::ids::{DEFAULT_ID_PREFIX, IdGenerator, generate_id};
pub use crate::process::{Accumulator, Placeholder, process};
pub use crate::render::Template;
pub use crate::unsafe_markup::UnsafeMarkup;
pub use crate::value::{Scalar, Value};

pub use html::{NodeRef, escape_html as escape};

/// Builds a [`Template`] from a literal head followed by `value, segment` pairs.
///
/// Segments must be string literals; only they are treated as markup.
#[macro_export]
macro_rules! template {
    ($head:literal $(, $value:expr, $segment:literal)*) => {
        $crate::Template::new($head)$(.then($value, $segment))*
    };
}

/// Renders a template to a [`Fragment`] with system entropy.
#[macro_export]
macro_rules! html {
    ($($args:tt)*) => {
        $crate::template!($($args)*).render()
    };
}

/// Builds [`UnsafeMarkup`]: values are formatted with `Display` and not escaped.
#[macro_export]
macro_rules! unsafe_html {
    ($head:literal $(, $value:expr, $segment:literal)*) => {
        $crate::UnsafeMarkup::new($head)$(.then(&$value, $segment))*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_is_reexported() {
        assert_eq!(escape("<&>\"'"), "&lt;&amp;&gt;&quot;&#39;");
    }

    #[test]
    fn macros_build_templates() {
        let name = "Ada";
        let t = template!("<p>", name, "</p>");
        assert_eq!(t.segments().count(), 2);
        let frag = html!("<p>", name, " & ", 3, "</p>");
        assert_eq!(frag.to_html(), "<p>Ada &amp; 3</p>");
        let raw = unsafe_html!("<b>", name, "</b>");
        assert_eq!(raw.as_str(), "<b>Ada</b>");
    }

    #[test]
    fn head_only_template() {
        assert_eq!(html!("<br>").to_html(), "<br>");
    }
}
