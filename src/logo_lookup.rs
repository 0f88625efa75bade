use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RouteError, RouteResult};
use crate::http_client::get_json_body;

const LOGO_SEARCH_PATH: &str = "api/logos/search";
pub const DEFAULT_TEAM_A_LOGO: &str = "/images/logo-team-a.png";
pub const DEFAULT_TEAM_B_LOGO: &str = "/images/logo-team-b.png";

/// Finds the image path registered for a team logo code.
///
/// `Ok(None)` means the backend knows no logo for the code.
pub trait LogoLookup: Sync {
    fn find_logo_path(&self, code: &str) -> Result<Option<String>>;
}

impl<F> LogoLookup for F
where
    F: Fn(&str) -> Result<Option<String>> + Sync,
{
    fn find_logo_path(&self, code: &str) -> Result<Option<String>> {
        self(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn label(self) -> &'static str {
        match self {
            TeamSide::A => "team_a",
            TeamSide::B => "team_b",
        }
    }
}

/// Logo search over the match backend: `GET {base}/api/logos/search?code=..`.
#[derive(Debug, Clone)]
pub struct HttpLogoLookup {
    search_url: Url,
    timeout: Duration,
}

impl HttpLogoLookup {
    pub fn new(api_base: &Url, timeout: Duration) -> RouteResult<Self> {
        let search_url = with_trailing_slash(api_base)
            .join(LOGO_SEARCH_PATH)
            .map_err(|err| RouteError::InvalidUrl(format!("{api_base}: {err}")))?;
        Ok(Self {
            search_url,
            timeout,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

impl LogoLookup for HttpLogoLookup {
    fn find_logo_path(&self, code: &str) -> Result<Option<String>> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("code", code);
        let body = get_json_body(url, self.timeout).context("logo search request failed")?;
        parse_logo_search_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct LogoRecord {
    #[serde(
        default,
        alias = "logo_url",
        alias = "logoUrl",
        alias = "file_path",
        alias = "path"
    )]
    url_logo: Option<String>,
}

/// First match's image path from a logo search response (a JSON array).
pub fn parse_logo_search_json(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let records: Vec<LogoRecord> =
        serde_json::from_str(trimmed).context("invalid logo search json")?;
    Ok(records
        .into_iter()
        .next()
        .and_then(|r| r.url_logo)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty()))
}

/// Turns relative asset paths from the backend into absolute URLs.
#[derive(Debug, Clone)]
pub struct AssetUrlResolver {
    base: Url,
}

impl AssetUrlResolver {
    pub fn new(base: &Url) -> Self {
        Self {
            base: with_trailing_slash(base),
        }
    }

    pub fn resolve(&self, path: &str) -> String {
        let path = path.trim();
        if let Ok(url) = Url::parse(path) {
            if matches!(url.scheme(), "http" | "https" | "data") {
                return path.to_string();
            }
        }
        match self.base.join(path) {
            Ok(url) => url.to_string(),
            Err(err) => {
                tracing::warn!(path, %err, "could not resolve asset path");
                path.to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultLogos {
    pub team_a: String,
    pub team_b: String,
}

impl Default for DefaultLogos {
    fn default() -> Self {
        Self {
            team_a: DEFAULT_TEAM_A_LOGO.to_string(),
            team_b: DEFAULT_TEAM_B_LOGO.to_string(),
        }
    }
}

impl DefaultLogos {
    fn for_side(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }
}

/// Absolute logo URLs for both teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLogos {
    #[serde(rename = "teamALogo")]
    pub team_a: String,
    #[serde(rename = "teamBLogo")]
    pub team_b: String,
}

/// Set by the consumer when it no longer wants the result (view unmounted,
/// navigation). Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Looks up both logos concurrently. Every failure lands on the side's default.
///
/// Returns `None` when `cancel` fired before the lookups finished.
pub fn resolve_team_logos<L>(
    lookup: &L,
    codes: (&str, &str),
    defaults: &DefaultLogos,
    assets: &AssetUrlResolver,
    cancel: Option<&CancelToken>,
) -> Option<TeamLogos>
where
    L: LogoLookup + ?Sized,
{
    let (team_a, team_b) = rayon::join(
        || lookup_side(lookup, codes.0, TeamSide::A, defaults, assets),
        || lookup_side(lookup, codes.1, TeamSide::B, defaults, assets),
    );
    if cancel.is_some_and(CancelToken::is_cancelled) {
        tracing::debug!("logo resolution cancelled, discarding result");
        return None;
    }
    Some(TeamLogos { team_a, team_b })
}

fn lookup_side<L>(
    lookup: &L,
    code: &str,
    side: TeamSide,
    defaults: &DefaultLogos,
    assets: &AssetUrlResolver,
) -> String
where
    L: LogoLookup + ?Sized,
{
    let fallback = defaults.for_side(side);
    let code = code.trim();
    if code.is_empty() {
        return assets.resolve(fallback);
    }
    match lookup.find_logo_path(code) {
        Ok(Some(path)) => assets.resolve(&path),
        Ok(None) => {
            tracing::debug!(side = side.label(), code, "no logo for code, using default");
            assets.resolve(fallback)
        }
        Err(err) => {
            tracing::warn!(
                side = side.label(),
                code,
                error = %format!("{err:#}"),
                "logo lookup failed, using default"
            );
            assets.resolve(fallback)
        }
    }
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
