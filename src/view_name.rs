use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{RouteError, RouteResult};

/// View shown when the route carries no view segment.
pub const DEFAULT_VIEW: &str = "poster";

// (internal id, shareable slug)
const CANONICAL_VIEWS: &[(&str, &str)] = &[
    ("poster", "poster"),
    ("intro", "gioithieu"),
    ("halftime", "nghigiuatran"),
    ("scoreboard", "tiso"),
    ("scoreboard_below", "tisoduoi"),
    ("penalty", "luanluu"),
    ("lineup", "doihinh"),
    ("stats", "thongke"),
    ("ending", "ketthuc"),
];

// Slugs from older share links; they still open the right view.
const LEGACY_SLUGS: &[(&str, &str)] = &[
    ("tisotren", "scoreboard"),
    ("ti-so", "scoreboard"),
    ("ti-so-duoi", "scoreboard_below"),
    ("gioi-thieu", "intro"),
    ("nghi-giua-tran", "halftime"),
    ("luan-luu", "penalty"),
    ("doi-hinh", "lineup"),
];

static BUILTIN: Lazy<ViewAliasTable> = Lazy::new(|| {
    let mut table = ViewAliasTable::default();
    for (internal, slug) in CANONICAL_VIEWS {
        table.canonical.insert((*internal).to_string(), (*slug).to_string());
        table.slugs.insert((*slug).to_string(), (*internal).to_string());
    }
    for (slug, internal) in LEGACY_SLUGS {
        table.slugs.insert((*slug).to_string(), (*internal).to_string());
    }
    table
});

/// Slug -> internal id (many-to-one allowed) and internal id -> slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAliasTable {
    #[serde(default)]
    slugs: HashMap<String, String>,
    #[serde(default)]
    canonical: HashMap<String, String>,
}

impl ViewAliasTable {
    pub fn builtin() -> &'static ViewAliasTable {
        &BUILTIN
    }

    /// Layers `other` over this table and re-checks the round trip.
    pub fn merge(&mut self, other: ViewAliasTable) -> RouteResult<()> {
        for (slug, internal) in other.slugs {
            self.slugs.insert(normalize(&slug), normalize(&internal));
        }
        for (internal, slug) in other.canonical {
            let (internal, slug) = (normalize(&internal), normalize(&slug));
            // Keep the canonical slug reachable even when the file only lists the reverse side.
            self.slugs.insert(slug.clone(), internal.clone());
            self.canonical.insert(internal, slug);
        }
        self.validate()
    }

    pub fn merge_json_file(&mut self, path: &Path) -> RouteResult<()> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read view table {}", path.display()))?;
        let other: ViewAliasTable =
            serde_json::from_str(&raw).context("invalid view table json")?;
        self.merge(other)
    }

    /// Every canonical internal id must come back to itself through its slug.
    pub fn validate(&self) -> RouteResult<()> {
        for (internal, slug) in &self.canonical {
            match self.slugs.get(slug) {
                Some(back) if back == internal => {}
                other => {
                    return Err(RouteError::config(format!(
                        "view {internal:?} -> {slug:?} -> {other:?} does not round trip"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn internal_ids(&self) -> impl Iterator<Item = &str> {
        self.canonical.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct ViewNameMapper {
    table: ViewAliasTable,
}

impl Default for ViewNameMapper {
    fn default() -> Self {
        Self::new(ViewAliasTable::builtin().clone())
    }
}

impl ViewNameMapper {
    pub fn new(table: ViewAliasTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ViewAliasTable {
        &self.table
    }

    /// Unknown slugs pass through normalized so newer views still reach the renderer.
    pub fn url_slug_to_internal(&self, slug: &str) -> String {
        let slug = match normalize(slug) {
            s if s.is_empty() => DEFAULT_VIEW.to_string(),
            s => s,
        };
        match self.table.slugs.get(&slug) {
            Some(internal) => internal.clone(),
            None => {
                tracing::debug!(slug = %slug, "unknown view slug, passing through");
                slug
            }
        }
    }

    pub fn internal_to_url_slug(&self, view: &str) -> String {
        let view = normalize(view);
        self.table.canonical.get(&view).cloned().unwrap_or(view)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_slug_maps_both_ways() {
        let mapper = ViewNameMapper::default();
        assert_eq!(mapper.url_slug_to_internal("tisoduoi"), "scoreboard_below");
        assert_eq!(mapper.internal_to_url_slug("scoreboard_below"), "tisoduoi");
        assert_eq!(mapper.url_slug_to_internal(" TiSoDuoi "), "scoreboard_below");
    }

    #[test]
    fn every_canonical_entry_round_trips() {
        let mapper = ViewNameMapper::default();
        let ids: Vec<String> = mapper.table().internal_ids().map(str::to_string).collect();
        assert_eq!(ids.len(), CANONICAL_VIEWS.len());
        for id in ids {
            let slug = mapper.internal_to_url_slug(&id);
            assert_eq!(mapper.url_slug_to_internal(&slug), id);
        }
    }

    #[test]
    fn legacy_slugs_alias_to_one_id() {
        let mapper = ViewNameMapper::default();
        assert_eq!(mapper.url_slug_to_internal("tisotren"), "scoreboard");
        assert_eq!(mapper.url_slug_to_internal("ti-so"), "scoreboard");
        assert_eq!(mapper.internal_to_url_slug("scoreboard"), "tiso");
    }

    #[test]
    fn empty_slug_is_default_view() {
        let mapper = ViewNameMapper::default();
        assert_eq!(mapper.url_slug_to_internal(""), DEFAULT_VIEW);
        assert_eq!(mapper.url_slug_to_internal("   "), DEFAULT_VIEW);
    }

    #[test]
    fn unknown_values_pass_through_normalized() {
        let mapper = ViewNameMapper::default();
        assert_eq!(mapper.url_slug_to_internal(" Replay "), "replay");
        assert_eq!(mapper.internal_to_url_slug("Replay"), "replay");
    }

    #[test]
    fn merge_rejects_broken_round_trip() {
        let mut table = ViewAliasTable::builtin().clone();
        let mut other = ViewAliasTable::default();
        other.canonical.insert("replay".into(), "phatlai".into());
        table.merge(other).expect("consistent addition");
        assert_eq!(ViewNameMapper::new(table.clone()).url_slug_to_internal("phatlai"), "replay");

        table.slugs.insert("phatlai".into(), "poster".into());
        assert!(matches!(table.validate(), Err(RouteError::Config(_))));
    }
}
