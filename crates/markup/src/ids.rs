//! Placeholder token generation.

use crate::entropy::{Entropy, IdTier, SystemEntropy};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Write;

pub const DEFAULT_ID_PREFIX: &str = "sym_";

const RANDOM_BYTES: usize = 16;

/// Issues placeholder tokens, trying the strongest available tier first.
///
/// Tokens are unique among those issued since the last [`IdGenerator::begin_render`];
/// a weak-tier collision is resolved with a numeric suffix.
#[derive(Debug)]
pub struct IdGenerator<E = SystemEntropy> {
    entropy: E,
    prefix: Cow<'static, str>,
    issued: HashSet<String>,
    last_tier: Option<IdTier>,
}

impl Default for IdGenerator<SystemEntropy> {
    fn default() -> Self {
        Self::new(SystemEntropy)
    }
}

impl<E: Entropy> IdGenerator<E> {
    pub fn new(entropy: E) -> Self {
        Self {
            entropy,
            prefix: Cow::Borrowed(DEFAULT_ID_PREFIX),
            issued: HashSet::new(),
            last_tier: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Tier that produced the most recent token.
    pub fn last_tier(&self) -> Option<IdTier> {
        self.last_tier
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    /// Forgets previously issued tokens.
    pub fn begin_render(&mut self) {
        self.issued.clear();
    }

    pub fn next_id(&mut self) -> String {
        let (mut token, tier) = generate_id(&mut self.entropy, &self.prefix);
        if self.last_tier != Some(tier) {
            log::debug!(target: "markup.ids", "issuing placeholder ids from tier {tier:?}");
        }
        self.last_tier = Some(tier);

        if self.issued.contains(&token) {
            log::debug!(target: "markup.ids", "id collision on {token}; adding suffix");
            let base = token;
            let mut n = 1usize;
            loop {
                token = format!("{base}_{n}");
                if !self.issued.contains(&token) {
                    break;
                }
                n += 1;
            }
        }
        self.issued.insert(token.clone());
        token
    }
}

/// One token from the strongest tier `entropy` supports.
pub fn generate_id<E: Entropy + ?Sized>(entropy: &mut E, prefix: &str) -> (String, IdTier) {
    if let Some(uuid) = entropy.random_uuid() {
        return (format!("{prefix}{}", uuid.hyphenated()), IdTier::Uuid);
    }

    let mut bytes = [0u8; RANDOM_BYTES];
    if entropy.random_bytes(&mut bytes).is_ok() {
        let mut token = String::with_capacity(prefix.len() + RANDOM_BYTES * 2);
        token.push_str(prefix);
        for byte in bytes {
            let _ = write!(token, "{byte:02x}");
        }
        return (token, IdTier::RandomBytes);
    }

    let mut token = String::from(prefix);
    push_base36(&mut token, entropy.now_millis());
    push_base36(&mut token, entropy.pseudo_random());
    (token, IdTier::Clock)
}

fn push_base36(out: &mut String, mut n: u64) {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
        if n == 0 {
            break;
        }
    }
    for &b in &buf[i..] {
        out.push(b as char);
    }
}
