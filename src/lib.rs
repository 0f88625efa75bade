pub mod color;
pub mod config;
pub mod error;
pub mod http_client;
pub mod logo_lookup;
pub mod params;
pub mod route;
pub mod text_escape;
pub mod view_name;

pub use color::{ColorAliasTable, ColorResolver, resolve_color};
pub use config::CodecConfig;
pub use error::{RouteError, RouteResult};
pub use logo_lookup::{
    AssetUrlResolver, CancelToken, DefaultLogos, HttpLogoLookup, LogoLookup, TeamLogos,
};
pub use params::{
    MatchRouteParams, parse_color_param, parse_number_param, parse_team_name, parse_text_param,
    resolve_kit_color,
};
pub use route::{MatchRoute, RouteCodec, build_route, parse_route};
pub use text_escape::{
    EscapeTokenTable, build_match_title_segment, escape_segment, parse_match_title_segment,
    unescape_segment,
};
pub use view_name::{DEFAULT_VIEW, ViewAliasTable, ViewNameMapper};
