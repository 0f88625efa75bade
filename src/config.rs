use std::env;
use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

use crate::color::ColorAliasTable;
use crate::error::{RouteError, RouteResult};
use crate::http_client::REQUEST_TIMEOUT_SECS;
use crate::logo_lookup::DefaultLogos;
use crate::params::{DEFAULT_TEAM_A_NAME, DEFAULT_TEAM_B_NAME};
use crate::view_name::ViewAliasTable;

const DEFAULT_API_BASE: &str = "http://localhost:8000";

static DEFAULT_API_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(DEFAULT_API_BASE).expect("default api base is a valid url"));

/// Static tables and collaborator settings injected into the codec.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    pub colors: ColorAliasTable,
    pub views: ViewAliasTable,
    pub default_logos: DefaultLogos,
    pub team_a_fallback: String,
    pub team_b_fallback: String,
    pub api_base: Url,
    pub asset_base: Url,
    pub request_timeout: Duration,
}

impl Default for CodecConfig {
    fn default() -> Self {
        let api_base = DEFAULT_API_URL.clone();
        Self {
            colors: ColorAliasTable::builtin().clone(),
            views: ViewAliasTable::builtin().clone(),
            default_logos: DefaultLogos::default(),
            team_a_fallback: DEFAULT_TEAM_A_NAME.to_string(),
            team_b_fallback: DEFAULT_TEAM_B_NAME.to_string(),
            asset_base: api_base.clone(),
            api_base,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl CodecConfig {
    /// Loads `.env.local` then `.env` if present. Existing variables win.
    pub fn load_dotenv() {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
    }

    pub fn from_env() -> RouteResult<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading `MATCH_ROUTE_*` keys through `var`.
    pub fn from_vars<F>(var: F) -> RouteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = non_empty("MATCH_ROUTE_API_BASE") {
            config.api_base = parse_base_url(&raw)?;
            config.asset_base = config.api_base.clone();
        }
        if let Some(raw) = non_empty("MATCH_ROUTE_ASSET_BASE") {
            config.asset_base = parse_base_url(&raw)?;
        }
        let timeout = non_empty("MATCH_ROUTE_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(REQUEST_TIMEOUT_SECS)
            .clamp(1, 60);
        config.request_timeout = Duration::from_secs(timeout);

        if let Some(path) = non_empty("MATCH_ROUTE_COLOR_TABLE") {
            config.colors.extend_from_json_file(&PathBuf::from(path))?;
        }
        if let Some(path) = non_empty("MATCH_ROUTE_VIEW_TABLE") {
            config.views.merge_json_file(&PathBuf::from(path))?;
        }
        if let Some(name) = non_empty("MATCH_ROUTE_TEAM_A_FALLBACK") {
            config.team_a_fallback = name;
        }
        if let Some(name) = non_empty("MATCH_ROUTE_TEAM_B_FALLBACK") {
            config.team_b_fallback = name;
        }

        tracing::debug!(
            api_base = %config.api_base,
            asset_base = %config.asset_base,
            timeout_secs = timeout,
            "loaded codec config"
        );
        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> RouteResult<Url> {
    Url::parse(raw).map_err(|err| RouteError::InvalidUrl(format!("{raw}: {err}")))
}
