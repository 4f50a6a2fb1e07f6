//! Simplified HTML tokenizer with a constrained, practical tag-name character set.
//!
//! Supported tag/attribute name characters (ASCII only): `[A-Za-z0-9:_-]`.
//!
//! Known limitations:
//! - Not a full HTML5 state machine (no HTML5 parse-error recovery).
//! - `<` or `</` not followed by a name character is plain text.
//! - RAWTEXT (`script`, `style`) and RCDATA (`textarea`, `title`) close-tag scanning accepts
//!   only ASCII whitespace before `>`.
use crate::entities::decode_entities;
use crate::types::{AtomId, AtomTable, Token, TokenStream};
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TextMode {
    /// Content is literal text up to the close tag.
    RawText,
    /// Like RawText, but character references are decoded.
    RcData,
}

fn text_mode(name: &str) -> Option<(TextMode, &'static [u8])> {
    match name {
        "script" => Some((TextMode::RawText, b"</script")),
        "style" => Some((TextMode::RawText, b"</style")),
        "textarea" => Some((TextMode::RcData, b"</textarea")),
        "title" => Some((TextMode::RcData, b"</title")),
        _ => None,
    }
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack
        .get(start..start + needle.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(needle))
}

/// Finds `close_tag` (e.g. `</script`) followed by optional ASCII whitespace and `>`.
/// Returns `(start_of_close_tag, end_after_gt)` relative to `haystack`.
fn find_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    debug_assert!(close_tag.starts_with(b"</") && close_tag.is_ascii());
    let bytes = haystack.as_bytes();
    let n = close_tag.len();
    let mut i = 0;
    // Matches only start at ASCII '<', which never occurs inside a UTF-8 sequence.
    while i + n <= bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        if starts_with_ignore_ascii_case_at(bytes, i, close_tag) {
            let mut k = i + n;
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if bytes.get(k) == Some(&b'>') {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Byte cursor over the input. Slices are only cut at ASCII structural bytes, so every
/// slice endpoint is a UTF-8 char boundary.
pub struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    atoms: AtomTable,
    out: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            atoms: AtomTable::new(),
            out: Vec::new(),
        }
    }

    pub fn run(mut self) -> TokenStream {
        let mut text_start = 0;
        while let Some(rel) = memchr(b'<', &self.bytes[self.pos..]) {
            let lt = self.pos + rel;
            if !self.starts_markup(lt) {
                self.pos = lt + 1;
                continue;
            }
            self.flush_text(text_start, lt);
            self.pos = lt;
            self.markup();
            text_start = self.pos;
            if self.pos >= self.bytes.len() {
                break;
            }
        }
        self.flush_text(text_start, self.bytes.len());
        log::trace!(target: "html.tokenizer", "{} tokens", self.out.len());
        TokenStream::new(self.out, self.atoms)
    }

    fn flush_text(&mut self, start: usize, end: usize) {
        if start < end {
            let decoded = decode_entities(&self.input[start..end]);
            if !decoded.is_empty() {
                self.out.push(Token::Text(decoded));
            }
        }
    }

    /// Whether the `<` at `lt` opens a construct; otherwise it is literal text.
    fn starts_markup(&self, lt: usize) -> bool {
        let bytes = self.bytes;
        if self.input[lt..].starts_with(COMMENT_START) {
            return true;
        }
        if starts_with_ignore_ascii_case_at(bytes, lt, b"<!doctype") {
            return memchr(b'>', &bytes[lt..]).is_some();
        }
        match bytes.get(lt + 1) {
            Some(b'/') => bytes.get(lt + 2).copied().is_some_and(is_name_char),
            Some(&b) => is_name_char(b),
            None => false,
        }
    }

    /// Consumes the construct at `self.pos`, which `starts_markup` accepted.
    fn markup(&mut self) {
        if self.input[self.pos..].starts_with(COMMENT_START) {
            self.comment();
        } else if starts_with_ignore_ascii_case_at(self.bytes, self.pos, b"<!doctype") {
            self.doctype();
        } else if self.bytes[self.pos + 1] == b'/' {
            self.end_tag();
        } else {
            self.start_tag();
        }
    }

    fn comment(&mut self) {
        let body_start = self.pos + COMMENT_START.len();
        match self.input[body_start..].find(COMMENT_END) {
            Some(len) => {
                self.out
                    .push(Token::Comment(self.input[body_start..body_start + len].to_string()));
                self.pos = body_start + len + COMMENT_END.len();
            }
            None => {
                self.out.push(Token::Comment(self.input[body_start..].to_string()));
                self.pos = self.bytes.len();
            }
        }
    }

    fn doctype(&mut self) {
        let rest = &self.input[self.pos + 2..];
        let end = rest.find('>').unwrap_or(rest.len());
        self.out.push(Token::Doctype(rest[..end].trim().to_string()));
        self.pos = (self.pos + 2 + end + 1).min(self.bytes.len());
    }

    fn scan_name(&self, start: usize) -> usize {
        let mut j = start;
        while j < self.bytes.len() && is_name_char(self.bytes[j]) {
            j += 1;
        }
        j
    }

    fn end_tag(&mut self) {
        let start = self.pos + 2;
        let end = self.scan_name(start);
        let name = self.atoms.intern_ascii_lowercase(&self.input[start..end]);
        let mut j = end;
        while j < self.bytes.len() && self.bytes[j] != b'>' {
            j += 1;
        }
        self.pos = (j + 1).min(self.bytes.len());
        self.out.push(Token::EndTag(name));
    }

    fn start_tag(&mut self) {
        let start = self.pos + 1;
        let end = self.scan_name(start);
        let name = self.atoms.intern_ascii_lowercase(&self.input[start..end]);
        self.pos = end;
        let (attributes, mut self_closing) = self.attributes();
        let name_str = self.atoms.resolve(name);
        if is_void_element(name_str) {
            self_closing = true;
        }
        let mode = if self_closing { None } else { text_mode(name_str) };

        self.out.push(Token::StartTag {
            name,
            attributes,
            self_closing,
        });
        if let Some((mode, close_tag)) = mode {
            self.text_content(name, mode, close_tag);
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Parses attributes up to and including the closing `>`.
    fn attributes(&mut self) -> (Vec<(AtomId, Option<String>)>, bool) {
        let mut attributes = Vec::new();
        let len = self.bytes.len();
        loop {
            self.skip_whitespace();
            if self.pos >= len {
                return (attributes, false);
            }
            match self.bytes[self.pos] {
                b'>' => {
                    self.pos += 1;
                    return (attributes, false);
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    return (attributes, true);
                }
                _ => {}
            }
            let name_start = self.pos;
            let name_end = self.scan_name(name_start);
            if name_end == name_start {
                // Stray byte such as a lone `/` or a quote; skip it.
                self.pos += 1;
                continue;
            }
            let attr = self
                .atoms
                .intern_ascii_lowercase(&self.input[name_start..name_end]);
            self.pos = name_end;
            self.skip_whitespace();
            let value = if self.bytes.get(self.pos) == Some(&b'=') {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.attribute_value())
            } else {
                None
            };
            attributes.push((attr, value));
        }
    }

    fn attribute_value(&mut self) -> String {
        let len = self.bytes.len();
        if let Some(&quote @ (b'"' | b'\'')) = self.bytes.get(self.pos) {
            let start = self.pos + 1;
            let end = memchr(quote, &self.bytes[start..]).map_or(len, |rel| start + rel);
            self.pos = (end + 1).min(len);
            return decode_entities(&self.input[start..end]);
        }
        let start = self.pos;
        while self.pos < len {
            let b = self.bytes[self.pos];
            if b.is_ascii_whitespace() || b == b'>' {
                break;
            }
            if b == b'/' && self.bytes.get(self.pos + 1) == Some(&b'>') {
                break;
            }
            self.pos += 1;
        }
        decode_entities(&self.input[start..self.pos])
    }

    /// Emits the body of a RAWTEXT/RCDATA element and its end tag. A missing close tag
    /// turns the rest of the input into the body.
    fn text_content(&mut self, name: AtomId, mode: TextMode, close_tag: &[u8]) {
        let body_start = self.pos;
        let (body_end, resume) = match find_close_tag(&self.input[body_start..], close_tag) {
            Some((rel_start, rel_end)) => (body_start + rel_start, body_start + rel_end),
            None => (self.bytes.len(), self.bytes.len()),
        };
        let raw = &self.input[body_start..body_end];
        if !raw.is_empty() {
            let text = match mode {
                TextMode::RawText => raw.to_string(),
                TextMode::RcData => decode_entities(raw),
            };
            self.out.push(Token::Text(text));
        }
        self.out.push(Token::EndTag(name));
        self.pos = resume;
    }
}

/// Tokenizes into a token stream with interned tag/attribute names.
pub fn tokenize(input: &str) -> TokenStream {
    Tokenizer::new(input).run()
}
