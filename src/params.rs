use serde::{Deserialize, Serialize};

use crate::color::{ColorResolver, is_hex_digits};
use crate::text_escape::decode_field;

pub const DEFAULT_LOCATION: &str = "stadium";
pub const DEFAULT_MATCH_TITLE: &str = "match";
pub const DEFAULT_LIVE_TEXT: &str = "live";
pub const DEFAULT_TEAM_A_LOGO_CODE: &str = "TEAMA";
pub const DEFAULT_TEAM_B_LOGO_CODE: &str = "TEAMB";
pub const DEFAULT_TEAM_A_NAME: &str = "TEAM_A";
pub const DEFAULT_TEAM_B_NAME: &str = "TEAM_B";
pub const DEFAULT_TEAM_A_KIT_COLOR: &str = "FF0000";
pub const DEFAULT_TEAM_B_KIT_COLOR: &str = "0000FF";
pub const FALLBACK_COLOR: &str = "#000000";

/// Display state of one match as carried by a share link.
///
/// Everything except `access_code` is optional on the way in; missing fields
/// take the build-time defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRouteParams {
    pub access_code: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub match_title: Option<String>,
    #[serde(default)]
    pub live_text: Option<String>,
    #[serde(default, rename = "teamALogoCode")]
    pub team_a_logo_code: Option<String>,
    #[serde(default, rename = "teamBLogoCode")]
    pub team_b_logo_code: Option<String>,
    #[serde(default, rename = "teamAName")]
    pub team_a_name: Option<String>,
    #[serde(default, rename = "teamBName")]
    pub team_b_name: Option<String>,
    #[serde(default, rename = "teamAKitColor")]
    pub team_a_kit_color: Option<String>,
    #[serde(default, rename = "teamBKitColor")]
    pub team_b_kit_color: Option<String>,
    #[serde(default, rename = "teamAScore")]
    pub team_a_score: Option<u32>,
    #[serde(default, rename = "teamBScore")]
    pub team_b_score: Option<u32>,
    /// Localized view slug, e.g. `tisoduoi`.
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub match_time: Option<String>,
}

impl MatchRouteParams {
    pub fn new(access_code: impl Into<String>) -> Self {
        Self {
            access_code: access_code.into(),
            ..Self::default()
        }
    }
}

/// Decoded team name, or the side-specific `default` when empty.
pub fn parse_team_name(raw: Option<&str>, default: &str) -> String {
    let name = parse_text_param(raw);
    if name.trim().is_empty() {
        default.to_string()
    } else {
        name
    }
}

pub fn parse_text_param(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => decode_field(raw),
        _ => String::new(),
    }
}

/// Leading-integer parse: `"12.5"` and `"12abc"` give 12, `"1e3"` gives 1.
/// No leading digit (including a minus sign) gives `default`.
pub fn parse_number_param(raw: Option<&str>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    let decoded = decode_field(raw);
    let trimmed = decoded.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..end];
    if digits.is_empty() {
        return default;
    }
    // All digits, so the only failure left is overflow.
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Strict 3- or 6-digit hex check; anything else is `#000000`. No alias lookup.
pub fn parse_color_param(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return FALLBACK_COLOR.to_string();
    };
    let decoded = decode_field(raw);
    let trimmed = decoded.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if is_hex_digits(digits, 6) || is_hex_digits(digits, 3) {
        format!("#{}", digits.to_ascii_uppercase())
    } else {
        FALLBACK_COLOR.to_string()
    }
}

/// Kit color as shown on screen: alias or 6-digit hex first, then the strict
/// hex check (which also accepts 3 digits), then `#000000`.
pub fn resolve_kit_color(raw: Option<&str>, resolver: &ColorResolver) -> String {
    if let Some(hex) = raw.and_then(|r| resolver.resolve(r)) {
        return hex;
    }
    let color = parse_color_param(raw);
    if color == FALLBACK_COLOR && raw.is_some_and(|r| !r.is_empty()) {
        tracing::debug!(raw = raw.unwrap_or_default(), "unrecognized kit color, using fallback");
    }
    color
}
