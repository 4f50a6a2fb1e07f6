//! Character reference handling in both directions.
//!
//! [`escape_html`] is the single escaping routine used by the template engine and the
//! serializer. [`decode_entities`] is the deliberately narrow decoder used by the tokenizer.

/// Neutralizes the five HTML metacharacters `& < > " '`.
///
/// Single left-to-right pass: replacement text is never rescanned, so `&` is never
/// double-escaped.
pub fn escape_html(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut copy_start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        let replacement = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        // All matched bytes are ASCII, so `i` is a char boundary.
        out.push_str(&text[copy_start..i]);
        out.push_str(replacement);
        copy_start = i + 1;
    }
    out.push_str(&text[copy_start..]);
    out
}

const NAMED: &[(&[u8], char)] = &[
    (b"&amp;", '&'),
    (b"&lt;", '<'),
    (b"&gt;", '>'),
    (b"&quot;", '"'),
    (b"&apos;", '\''),
    (b"&nbsp;", '\u{00A0}'),
];

const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

/// Decodes a minimal subset of character references.
///
/// - Named: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
/// - Numeric, only when well-formed and `;`-terminated: `&#123;`, `&#x1F4A9;`.
/// - Anything else (unknown names, missing `;`, invalid scalars, overlong digit runs) is
///   left unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut copy_start = 0;
    let mut i = 0;

    while let Some(rel) = memchr::memchr(b'&', &bytes[i..]) {
        i += rel;
        out.push_str(&s[copy_start..i]);

        let decoded = decode_named(&bytes[i..]).or_else(|| decode_numeric(&bytes[i..]));
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                i += consumed;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
        copy_start = i;
    }

    out.push_str(&s[copy_start..]);
    out
}

fn decode_named(rest: &[u8]) -> Option<(char, usize)> {
    NAMED
        .iter()
        .find(|(name, _)| rest.starts_with(name))
        .map(|(name, ch)| (*ch, name.len()))
}

fn decode_numeric(rest: &[u8]) -> Option<(char, usize)> {
    let (digits_start, radix, max_digits) = match rest {
        [b'&', b'#', b'x' | b'X', ..] => (3, 16, MAX_HEX_DIGITS),
        [b'&', b'#', ..] => (2, 10, MAX_DEC_DIGITS),
        _ => return None,
    };
    let digits = &rest[digits_start..];
    let len = digits
        .iter()
        .take(max_digits + 1)
        .take_while(|b| (**b as char).is_digit(radix))
        .count();
    if len == 0 || len > max_digits || digits.get(len) != Some(&b';') {
        return None;
    }
    // Digits are ASCII, so the slice is valid UTF-8.
    let text = std::str::from_utf8(&digits[..len]).ok()?;
    let ch = u32::from_str_radix(text, radix).ok().and_then(char::from_u32)?;
    Some((ch, digits_start + len + 1))
}
