use std::borrow::Cow;

use once_cell::sync::Lazy;

// Reserved literals become single control characters, so a router that decodes
// `%2F` before splitting still sees one segment.
const RESERVED: &[(char, char)] = &[
    ('/', '\u{1}'),
    ('\\', '\u{2}'),
    ('?', '\u{3}'),
    ('#', '\u{4}'),
    ('&', '\u{5}'),
    ('=', '\u{6}'),
    ('+', '\u{7}'),
    ('%', '\u{8}'),
];

const UNDERSCORE_PLACEHOLDER: char = '\u{E}';

static RESERVED_TABLE: Lazy<EscapeTokenTable> = Lazy::new(|| EscapeTokenTable {
    pairs: RESERVED.to_vec(),
});

/// Ordered `(literal, placeholder)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeTokenTable {
    pairs: Vec<(char, char)>,
}

impl EscapeTokenTable {
    pub fn reserved() -> &'static EscapeTokenTable {
        &RESERVED_TABLE
    }

    pub fn pairs(&self) -> &[(char, char)] {
        &self.pairs
    }

    /// Placeholders are control characters, pairwise distinct, and never a literal.
    pub fn is_unambiguous(&self) -> bool {
        let mut seen: Vec<char> = Vec::with_capacity(self.pairs.len() + 1);
        seen.push(UNDERSCORE_PLACEHOLDER);
        for (literal, placeholder) in &self.pairs {
            if !placeholder.is_control() || seen.contains(placeholder) {
                return false;
            }
            if self.pairs.iter().any(|(l, _)| l == placeholder) || literal == placeholder {
                return false;
            }
            seen.push(*placeholder);
        }
        true
    }

    fn placeholder_for(&self, c: char) -> Option<char> {
        self.pairs.iter().find(|(l, _)| *l == c).map(|(_, p)| *p)
    }

    fn literal_for(&self, c: char) -> Option<char> {
        self.pairs.iter().find(|(_, p)| *p == c).map(|(l, _)| *l)
    }

    fn is_placeholder(&self, c: char) -> bool {
        c == UNDERSCORE_PLACEHOLDER || self.literal_for(c).is_some()
    }

    /// Route-field encoding: placeholders, then percent-encoding. Spaces become `%20`.
    pub fn encode_field(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if self.is_placeholder(c) {
                continue;
            }
            out.push(self.placeholder_for(c).unwrap_or(c));
        }
        urlencoding::encode(&out).into_owned()
    }

    /// Inverse of [`Self::encode_field`]. Undecodable input comes back unchanged.
    pub fn decode_field(&self, raw: &str) -> String {
        match urlencoding::decode(raw) {
            Ok(decoded) => decoded
                .chars()
                .map(|c| self.literal_for(c).unwrap_or(c))
                .collect(),
            Err(err) => {
                tracing::debug!(raw, %err, "undecodable route field, keeping raw text");
                raw.to_string()
            }
        }
    }

    /// Slug escaping: placeholders, spaces to `_`, then percent-encoding.
    pub fn escape_segment(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                c if self.is_placeholder(c) => {}
                '_' => out.push(UNDERSCORE_PLACEHOLDER),
                ' ' => out.push('_'),
                c => out.push(self.placeholder_for(c).unwrap_or(c)),
            }
        }
        urlencoding::encode(&out).into_owned()
    }

    /// Inverse of [`Self::escape_segment`].
    ///
    /// A malformed escape yields the raw content with `_` shown as spaces.
    pub fn unescape_segment(&self, raw: &str) -> String {
        let decoded: Cow<'_, str> = match urlencoding::decode(raw) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::debug!(raw, %err, "undecodable segment, showing raw text");
                return raw.replace('_', " ");
            }
        };
        decoded
            .chars()
            .map(|c| match c {
                '_' => ' ',
                UNDERSCORE_PLACEHOLDER => '_',
                c => self.literal_for(c).unwrap_or(c),
            })
            .collect()
    }
}

pub fn escape_segment(text: &str) -> String {
    EscapeTokenTable::reserved().escape_segment(text)
}

pub fn unescape_segment(raw: &str) -> String {
    EscapeTokenTable::reserved().unescape_segment(raw)
}

pub fn encode_field(text: &str) -> String {
    EscapeTokenTable::reserved().encode_field(text)
}

pub fn decode_field(raw: &str) -> String {
    EscapeTokenTable::reserved().decode_field(raw)
}

/// Match titles routinely contain `/` ("Giải vô địch / Chung kết").
pub fn build_match_title_segment(title: &str) -> String {
    encode_field(title)
}

pub fn parse_match_title_segment(raw: &str) -> String {
    decode_field(raw)
}
