use serde::{Deserialize, Serialize};
use url::Url;

use crate::color::ColorResolver;
use crate::config::CodecConfig;
use crate::error::{RouteError, RouteResult};
use crate::logo_lookup::{
    AssetUrlResolver, CancelToken, DefaultLogos, HttpLogoLookup, LogoLookup, TeamLogos,
    resolve_team_logos,
};
use crate::params::{
    DEFAULT_LIVE_TEXT, DEFAULT_LOCATION, DEFAULT_MATCH_TITLE, DEFAULT_TEAM_A_KIT_COLOR,
    DEFAULT_TEAM_A_LOGO_CODE, DEFAULT_TEAM_A_NAME, DEFAULT_TEAM_B_KIT_COLOR,
    DEFAULT_TEAM_B_LOGO_CODE, DEFAULT_TEAM_B_NAME, MatchRouteParams, parse_number_param,
    parse_team_name, parse_text_param, resolve_kit_color,
};
use crate::text_escape::{build_match_title_segment, encode_field, parse_match_title_segment};
use crate::view_name::{DEFAULT_VIEW, ViewNameMapper};

/// accessCode through teamBScore.
pub const MIN_SEGMENTS: usize = 12;
/// Plus view and matchTime.
pub const MAX_SEGMENTS: usize = 14;

mod seg {
    pub const ACCESS_CODE: usize = 0;
    pub const LOCATION: usize = 1;
    pub const MATCH_TITLE: usize = 2;
    pub const LIVE_TEXT: usize = 3;
    pub const TEAM_A_LOGO_CODE: usize = 4;
    pub const TEAM_B_LOGO_CODE: usize = 5;
    pub const TEAM_A_NAME: usize = 6;
    pub const TEAM_B_NAME: usize = 7;
    pub const TEAM_A_KIT_COLOR: usize = 8;
    pub const TEAM_B_KIT_COLOR: usize = 9;
    pub const TEAM_A_SCORE: usize = 10;
    pub const TEAM_B_SCORE: usize = 11;
    pub const VIEW: usize = 12;
    pub const MATCH_TIME: usize = 13;
}

/// A decoded share link, ready for the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRoute {
    pub access_code: String,
    pub location: String,
    pub match_title: String,
    pub live_text: String,
    #[serde(rename = "teamALogoCode")]
    pub team_a_logo_code: String,
    #[serde(rename = "teamBLogoCode")]
    pub team_b_logo_code: String,
    #[serde(rename = "teamAName")]
    pub team_a_name: String,
    #[serde(rename = "teamBName")]
    pub team_b_name: String,
    /// `#RRGGBB` (or `#RGB`).
    #[serde(rename = "teamAKitColor")]
    pub team_a_kit_color: String,
    #[serde(rename = "teamBKitColor")]
    pub team_b_kit_color: String,
    #[serde(rename = "teamAScore")]
    pub team_a_score: u32,
    #[serde(rename = "teamBScore")]
    pub team_b_score: u32,
    /// Internal view id, not the localized slug.
    pub view: String,
    pub match_time: Option<String>,
    /// `None` until the logo codes have been looked up.
    pub logos: Option<TeamLogos>,
}

impl MatchRoute {
    /// Back to builder input, e.g. to re-share after a score change.
    pub fn to_params(&self, views: &ViewNameMapper) -> MatchRouteParams {
        let view = if self.view == DEFAULT_VIEW && self.match_time.is_none() {
            None
        } else {
            Some(views.internal_to_url_slug(&self.view))
        };
        MatchRouteParams {
            access_code: self.access_code.clone(),
            location: Some(self.location.clone()),
            match_title: Some(self.match_title.clone()),
            live_text: Some(self.live_text.clone()),
            team_a_logo_code: Some(self.team_a_logo_code.clone()),
            team_b_logo_code: Some(self.team_b_logo_code.clone()),
            team_a_name: Some(self.team_a_name.clone()),
            team_b_name: Some(self.team_b_name.clone()),
            team_a_kit_color: Some(self.team_a_kit_color.clone()),
            team_b_kit_color: Some(self.team_b_kit_color.clone()),
            team_a_score: Some(self.team_a_score),
            team_b_score: Some(self.team_b_score),
            view,
            match_time: self.match_time.clone(),
        }
    }
}

pub struct RouteCodec<L> {
    colors: ColorResolver,
    views: ViewNameMapper,
    team_a_fallback: String,
    team_b_fallback: String,
    default_logos: DefaultLogos,
    assets: AssetUrlResolver,
    lookup: L,
}

impl RouteCodec<HttpLogoLookup> {
    /// Codec backed by the match backend's logo search.
    pub fn from_config(config: CodecConfig) -> RouteResult<Self> {
        let lookup = HttpLogoLookup::new(&config.api_base, config.request_timeout)?;
        Ok(Self::new(config, lookup))
    }
}

impl<L: LogoLookup> RouteCodec<L> {
    pub fn new(config: CodecConfig, lookup: L) -> Self {
        Self {
            colors: ColorResolver::new(config.colors),
            views: ViewNameMapper::new(config.views),
            team_a_fallback: config.team_a_fallback,
            team_b_fallback: config.team_b_fallback,
            default_logos: config.default_logos,
            assets: AssetUrlResolver::new(&config.asset_base),
            lookup,
        }
    }

    pub fn views(&self) -> &ViewNameMapper {
        &self.views
    }

    pub fn colors(&self) -> &ColorResolver {
        &self.colors
    }

    pub fn build_route(&self, params: &MatchRouteParams) -> RouteResult<String> {
        build_route(params)
    }

    /// Decodes every field without touching the network. `logos` stays `None`.
    pub fn decode_route(&self, path: &str) -> RouteResult<MatchRoute> {
        let segments = split_segments(path);
        if segments.len() < MIN_SEGMENTS {
            return Err(RouteError::MalformedRoute {
                segments: segments.len(),
                minimum: MIN_SEGMENTS,
            });
        }
        if segments.len() > MAX_SEGMENTS {
            tracing::debug!(
                extra = segments.len() - MAX_SEGMENTS,
                "ignoring trailing route segments"
            );
        }
        let get = |i: usize| segments.get(i).copied();

        let access_code = parse_text_param(get(seg::ACCESS_CODE));
        if access_code.trim().is_empty() {
            return Err(RouteError::MissingField("accessCode"));
        }

        let match_time = Some(parse_text_param(get(seg::MATCH_TIME))).filter(|t| !t.is_empty());

        Ok(MatchRoute {
            access_code,
            location: parse_text_param(get(seg::LOCATION)),
            match_title: get(seg::MATCH_TITLE)
                .map(parse_match_title_segment)
                .unwrap_or_default(),
            live_text: parse_text_param(get(seg::LIVE_TEXT)),
            team_a_logo_code: parse_text_param(get(seg::TEAM_A_LOGO_CODE)),
            team_b_logo_code: parse_text_param(get(seg::TEAM_B_LOGO_CODE)),
            team_a_name: parse_team_name(get(seg::TEAM_A_NAME), &self.team_a_fallback),
            team_b_name: parse_team_name(get(seg::TEAM_B_NAME), &self.team_b_fallback),
            team_a_kit_color: resolve_kit_color(get(seg::TEAM_A_KIT_COLOR), &self.colors),
            team_b_kit_color: resolve_kit_color(get(seg::TEAM_B_KIT_COLOR), &self.colors),
            team_a_score: parse_number_param(get(seg::TEAM_A_SCORE), 0),
            team_b_score: parse_number_param(get(seg::TEAM_B_SCORE), 0),
            view: self
                .views
                .url_slug_to_internal(&parse_text_param(get(seg::VIEW))),
            match_time,
            logos: None,
        })
    }

    /// Full decode including logo lookup. Lookup failures never fail the parse.
    pub fn parse_route(&self, path: &str) -> RouteResult<MatchRoute> {
        let mut route = self.decode_route(path)?;
        route.logos = self.resolve_logos(&route, None);
        Ok(route)
    }

    /// Like [`Self::parse_route`], but yields `Ok(None)` if `cancel` fired
    /// before the logos came back, so a stale result is never applied.
    pub fn parse_route_cancellable(
        &self,
        path: &str,
        cancel: &CancelToken,
    ) -> RouteResult<Option<MatchRoute>> {
        let mut route = self.decode_route(path)?;
        if cancel.is_cancelled() {
            return Ok(None);
        }
        let Some(logos) = self.resolve_logos(&route, Some(cancel)) else {
            return Ok(None);
        };
        route.logos = Some(logos);
        Ok(Some(route))
    }

    pub fn resolve_logos(
        &self,
        route: &MatchRoute,
        cancel: Option<&CancelToken>,
    ) -> Option<TeamLogos> {
        resolve_team_logos(
            &self.lookup,
            (
                route.team_a_logo_code.as_str(),
                route.team_b_logo_code.as_str(),
            ),
            &self.default_logos,
            &self.assets,
            cancel,
        )
    }

    /// Absolute link: `origin` followed by the built path.
    pub fn share_url(&self, origin: &str, params: &MatchRouteParams) -> RouteResult<String> {
        let origin =
            Url::parse(origin).map_err(|err| RouteError::InvalidUrl(format!("{origin}: {err}")))?;
        let path = build_route(params)?;
        Ok(format!("{}{}", origin.as_str().trim_end_matches('/'), path))
    }

    /// Parses the path of a full share link; query and fragment are ignored.
    pub fn parse_share_url(&self, link: &str) -> RouteResult<MatchRoute> {
        let url =
            Url::parse(link).map_err(|err| RouteError::InvalidUrl(format!("{link}: {err}")))?;
        self.parse_route(url.path())
    }
}

/// Builds the share path. Only `access_code` is required.
pub fn build_route(params: &MatchRouteParams) -> RouteResult<String> {
    if params.access_code.trim().is_empty() {
        return Err(RouteError::MissingField("accessCode"));
    }
    let text = |value: &Option<String>, default: &str| encode_field(or_default(value, default));
    let color = |value: &Option<String>, default: &str| {
        let raw = or_default(value, default).trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw).trim();
        encode_field(if raw.is_empty() { default } else { raw })
    };

    let mut segments = vec![
        encode_field(&params.access_code),
        text(&params.location, DEFAULT_LOCATION),
        build_match_title_segment(or_default(&params.match_title, DEFAULT_MATCH_TITLE)),
        text(&params.live_text, DEFAULT_LIVE_TEXT),
        text(&params.team_a_logo_code, DEFAULT_TEAM_A_LOGO_CODE),
        text(&params.team_b_logo_code, DEFAULT_TEAM_B_LOGO_CODE),
        text(&params.team_a_name, DEFAULT_TEAM_A_NAME),
        text(&params.team_b_name, DEFAULT_TEAM_B_NAME),
        color(&params.team_a_kit_color, DEFAULT_TEAM_A_KIT_COLOR),
        color(&params.team_b_kit_color, DEFAULT_TEAM_B_KIT_COLOR),
        params.team_a_score.unwrap_or(0).to_string(),
        params.team_b_score.unwrap_or(0).to_string(),
    ];

    let match_time = params
        .match_time
        .as_deref()
        .filter(|t| !t.trim().is_empty());
    let view = params
        .view
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());
    // matchTime is positional, so it drags the default view in with it.
    if view.is_some() || match_time.is_some() {
        segments.push(encode_field(view.unwrap_or(DEFAULT_VIEW)));
    }
    if let Some(time) = match_time {
        segments.push(encode_field(time));
    }

    Ok(format!("/{}", segments.join("/")))
}

/// Decode with the built-in tables and the given logo lookup.
pub fn parse_route<L: LogoLookup>(path: &str, lookup: L) -> RouteResult<MatchRoute> {
    RouteCodec::new(CodecConfig::default(), lookup).parse_route(path)
}

/// Blank counts as missing; anything else is kept as typed, edge whitespace included.
fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut segments: Vec<&str> = path.split('/').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_codec() -> RouteCodec<impl LogoLookup> {
        RouteCodec::new(CodecConfig::default(), |_: &str| -> anyhow::Result<Option<String>> {
            Ok(None)
        })
    }

    fn full_params() -> MatchRouteParams {
        MatchRouteParams {
            access_code: "ABC123".into(),
            location: Some("My Dinh Stadium".into()),
            match_title: Some("V League 2024".into()),
            live_text: Some("LIVE STREAMING".into()),
            team_a_logo_code: Some("HN".into()),
            team_b_logo_code: Some("TPHCM".into()),
            team_a_name: Some("Ha Noi FC".into()),
            team_b_name: Some("Ho Chi Minh City".into()),
            team_a_kit_color: Some("#FF0000".into()),
            team_b_kit_color: Some("#0000FF".into()),
            team_a_score: Some(2),
            team_b_score: Some(1),
            view: None,
            match_time: None,
        }
    }

    #[test]
    fn full_build_matches_wire_format() {
        let path = build_route(&full_params()).expect("access code present");
        assert_eq!(
            path,
            "/ABC123/My%20Dinh%20Stadium/V%20League%202024/LIVE%20STREAMING/HN/TPHCM/Ha%20Noi%20FC/Ho%20Chi%20Minh%20City/FF0000/0000FF/2/1"
        );
    }

    #[test]
    fn minimal_build_fills_defaults() {
        let path = build_route(&MatchRouteParams::new("ABC123")).expect("access code present");
        assert_eq!(
            path,
            "/ABC123/stadium/match/live/TEAMA/TEAMB/TEAM_A/TEAM_B/FF0000/0000FF/0/0"
        );
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let mut params = MatchRouteParams::new("ABC123");
        params.location = Some("  ".into());
        params.team_a_kit_color = Some("#".into());
        let path = build_route(&params).expect("access code present");
        assert!(path.starts_with("/ABC123/stadium/"));
        assert!(path.contains("/FF0000/0000FF/"));
    }

    #[test]
    fn edge_whitespace_survives_the_link() {
        let mut params = MatchRouteParams::new(" ABC123 ");
        params.location = Some("  Mỹ Đình ".into());
        params.team_a_name = Some(" Hà Nội".into());
        params.match_time = Some(" 45:00 ".into());
        let path = build_route(&params).expect("access code present");

        let route = offline_codec().decode_route(&path).expect("well shaped");
        assert_eq!(route.access_code, " ABC123 ");
        assert_eq!(route.location, "  Mỹ Đình ");
        assert_eq!(route.team_a_name, " Hà Nội");
        assert_eq!(route.match_time.as_deref(), Some(" 45:00 "));
    }

    #[test]
    fn build_requires_access_code() {
        let err = build_route(&MatchRouteParams::new(" ")).unwrap_err();
        assert!(matches!(err, RouteError::MissingField("accessCode")));
    }

    #[test]
    fn match_time_brings_default_view() {
        let mut params = MatchRouteParams::new("ABC123");
        params.match_time = Some("45:00".into());
        let path = build_route(&params).expect("access code present");
        assert!(path.ends_with("/0/0/poster/45%3A00"), "{path}");

        params.view = Some("tisoduoi".into());
        let path = build_route(&params).expect("access code present");
        assert!(path.ends_with("/0/0/tisoduoi/45%3A00"), "{path}");
    }

    #[test]
    fn colors_are_passed_through_unresolved() {
        let mut params = MatchRouteParams::new("ABC123");
        params.team_a_kit_color = Some("đỏ".into());
        params.team_b_kit_color = Some("#abc".into());
        let path = build_route(&params).expect("access code present");
        assert!(path.contains("/%C4%91%E1%BB%8F/abc/"), "{path}");
    }

    #[test]
    fn short_path_is_structural_error() {
        let codec = offline_codec();
        let err = codec
            .decode_route("/ABC123/stadium/match/live/TEAMA/TEAMB/TEAM_A/TEAM_B/FF0000/0000FF/0")
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::MalformedRoute {
                segments: 11,
                minimum: 12
            }
        ));
        assert!(codec.decode_route("").unwrap_err().is_malformed());
    }

    #[test]
    fn empty_access_code_is_structural_error() {
        let codec = offline_codec();
        let err = codec
            .decode_route("//stadium/match/live/TEAMA/TEAMB/TEAM_A/TEAM_B/FF0000/0000FF/0/0")
            .unwrap_err();
        assert!(matches!(err, RouteError::MissingField("accessCode")));
    }

    #[test]
    fn bad_fields_fall_back_without_failing() {
        let codec = offline_codec();
        let route = codec
            .decode_route("/ABC123/%FF/match/live//TEAMB///GGGGGG/xanh%20duong/abc/1.9/tisoduoi")
            .expect("well shaped");
        assert_eq!(route.location, "%FF");
        assert_eq!(route.team_a_logo_code, "");
        assert_eq!(route.team_a_name, "TEAM_A");
        assert_eq!(route.team_b_name, "TEAM_B");
        assert_eq!(route.team_a_kit_color, "#000000");
        assert_eq!(route.team_b_kit_color, "#0000FF");
        assert_eq!(route.team_a_score, 0);
        assert_eq!(route.team_b_score, 1);
        assert_eq!(route.view, "scoreboard_below");
        assert_eq!(route.match_time, None);
    }

    #[test]
    fn trailing_slash_and_query_are_tolerated() {
        let codec = offline_codec();
        let route = codec
            .decode_route("/ABC123/stadium/match/live/TEAMA/TEAMB/TEAM_A/TEAM_B/FF0000/0000FF/3/4/?utm=x")
            .expect("well shaped");
        assert_eq!(route.team_a_score, 3);
        assert_eq!(route.team_b_score, 4);
        assert_eq!(route.view, DEFAULT_VIEW);
    }

    #[test]
    fn share_url_joins_origin() {
        let codec = offline_codec();
        let link = codec
            .share_url("https://live.example.com/", &MatchRouteParams::new("ABC123"))
            .expect("valid origin");
        assert_eq!(
            link,
            "https://live.example.com/ABC123/stadium/match/live/TEAMA/TEAMB/TEAM_A/TEAM_B/FF0000/0000FF/0/0"
        );
        let route = codec.parse_share_url(&link).expect("valid link");
        assert_eq!(route.access_code, "ABC123");
        assert!(route.logos.is_some());
    }
}
