use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;

use crate::error::{RouteError, RouteResult};

// Kit colors people actually type into the match form, English and Vietnamese,
// with and without diacritics.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("red", "#FF0000"),
    ("đỏ", "#FF0000"),
    ("do", "#FF0000"),
    ("dark_red", "#8B0000"),
    ("maroon", "#800000"),
    ("đỏ_đô", "#800000"),
    ("do_do", "#800000"),
    ("blue", "#0000FF"),
    ("xanh_dương", "#0000FF"),
    ("xanh_duong", "#0000FF"),
    ("navy", "#000080"),
    ("xanh_đậm", "#000080"),
    ("xanh_dam", "#000080"),
    ("sky_blue", "#87CEEB"),
    ("xanh_da_trời", "#87CEEB"),
    ("xanh_da_troi", "#87CEEB"),
    ("green", "#008000"),
    ("xanh_lá", "#008000"),
    ("xanh_la", "#008000"),
    ("lime", "#00FF00"),
    ("yellow", "#FFFF00"),
    ("vàng", "#FFFF00"),
    ("vang", "#FFFF00"),
    ("gold", "#FFD700"),
    ("orange", "#FFA500"),
    ("cam", "#FFA500"),
    ("purple", "#800080"),
    ("tím", "#800080"),
    ("tim", "#800080"),
    ("pink", "#FFC0CB"),
    ("hồng", "#FFC0CB"),
    ("hong", "#FFC0CB"),
    ("white", "#FFFFFF"),
    ("trắng", "#FFFFFF"),
    ("trang", "#FFFFFF"),
    ("black", "#000000"),
    ("đen", "#000000"),
    ("den", "#000000"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("xám", "#808080"),
    ("xam", "#808080"),
    ("silver", "#C0C0C0"),
    ("bạc", "#C0C0C0"),
    ("brown", "#A52A2A"),
    ("nâu", "#A52A2A"),
    ("nau", "#A52A2A"),
];

static BUILTIN: Lazy<ColorAliasTable> = Lazy::new(|| ColorAliasTable {
    entries: BUILTIN_ALIASES
        .iter()
        .map(|(alias, hex)| ((*alias).to_string(), (*hex).to_string()))
        .collect(),
});

static DEFAULT_RESOLVER: Lazy<ColorResolver> = Lazy::new(ColorResolver::default);

/// Normalized alias -> `#RRGGBB`. Every value is a valid 6-digit hex color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAliasTable {
    entries: HashMap<String, String>,
}

impl ColorAliasTable {
    pub fn builtin() -> &'static ColorAliasTable {
        &BUILTIN
    }

    pub fn new<I, K, V>(entries: I) -> RouteResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::default();
        table.extend(entries)?;
        Ok(table)
    }

    /// Adds (or overrides) aliases. Keys are normalized the same way lookups are.
    pub fn extend<I, K, V>(&mut self, entries: I) -> RouteResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (alias, hex) in entries {
            let (alias, hex) = (alias.as_ref(), hex.as_ref());
            if !is_canonical_hex(hex) {
                return Err(RouteError::config(format!(
                    "color alias {alias:?} maps to {hex:?}, expected #RRGGBB"
                )));
            }
            let key = collapse_whitespace(&alias.trim().to_lowercase());
            self.entries.insert(key, hex.to_ascii_uppercase());
        }
        Ok(())
    }

    /// Reads a JSON object of `alias -> #RRGGBB` and layers it over this table.
    pub fn extend_from_json_file(&mut self, path: &Path) -> RouteResult<()> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read color table {}", path.display()))?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).context("invalid color table json")?;
        self.extend(entries)
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ColorResolver {
    table: ColorAliasTable,
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::new(ColorAliasTable::builtin().clone())
    }
}

impl ColorResolver {
    pub fn new(table: ColorAliasTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ColorAliasTable {
        &self.table
    }

    /// Resolves a hex code or a color alias to `#RRGGBB`.
    ///
    /// Returns `None` when nothing matches; the caller picks the fallback.
    pub fn resolve(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        let decoded = match urlencoding::decode(trimmed) {
            Ok(decoded) => decoded.trim().to_lowercase(),
            Err(_) => trimmed.to_lowercase(),
        };
        if decoded.is_empty() {
            return None;
        }

        let digits = decoded.strip_prefix('#').unwrap_or(&decoded);
        if is_hex_digits(digits, 6) {
            return Some(format!("#{}", digits.to_ascii_uppercase()));
        }

        if let Some(hex) = self.table.get(&collapse_whitespace(&decoded)) {
            return Some(hex.to_string());
        }
        let squashed: String = decoded.chars().filter(|c| !c.is_whitespace()).collect();
        self.table.get(&squashed).map(str::to_string)
    }
}

/// [`ColorResolver::resolve`] against the built-in alias table.
pub fn resolve_color(input: &str) -> Option<String> {
    DEFAULT_RESOLVER.resolve(input)
}

pub(crate) fn is_hex_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_canonical_hex(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|d| is_hex_digits(d, 6))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}
