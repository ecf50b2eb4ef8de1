//! Static route-to-stage mapping.
//!
//! The routing layer resolves a path to its stage once, through this table,
//! instead of each page declaring its own stage. Several routes may map to
//! the same stage (logbook and assessment are both `IN_PROGRESS`).
//!
//! Paths are matched by segment prefix, so nested pages such as
//! `/student/internship/logbook/12` resolve to the stage of their parent route.

use std::collections::BTreeMap;

use crate::stage::Stage;

/// Root of the timeline-gated route subtree.
pub const DEFAULT_BASE_PATH: &str = "/student/internship";

/// Built-in routes, relative to [`DEFAULT_BASE_PATH`].
const DEFAULT_ROUTES: &[(&str, Stage)] = &[
    ("team", Stage::TeamFormation),
    ("cover-letter", Stage::CoverLetter),
    ("logbook", Stage::InProgress),
    ("assessment", Stage::InProgress),
    ("submission", Stage::Submission),
    ("evaluation", Stage::PostInternship),
    ("response-letter", Stage::ResponseLetter),
    ("hearing", Stage::Hearing),
];

/// Mapping from route path to stage, plus the base path of the gated subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    base_path: String,
    routes: BTreeMap<String, Stage>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_BASE_PATH)
    }
}

impl RouteTable {
    /// An empty table rooted at `base_path`.
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: normalize_path(base_path),
            routes: BTreeMap::new(),
        }
    }

    /// The built-in routes, re-rooted under `base_path`.
    pub fn with_defaults(base_path: &str) -> Self {
        let mut table = Self::new(base_path);
        for (suffix, stage) in DEFAULT_ROUTES {
            let route = join_path(&table.base_path, suffix);
            table.routes.insert(route, *stage);
        }
        table
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Add or replace a route. Returns the stage it previously mapped to.
    pub fn insert(&mut self, route: &str, stage: Stage) -> Option<Stage> {
        self.routes.insert(normalize_path(route), stage)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Stage)> {
        self.routes.iter().map(|(r, s)| (r.as_str(), *s))
    }

    /// All routes mapped to `stage`.
    pub fn routes_for(&self, stage: Stage) -> Vec<&str> {
        self.iter()
            .filter(|(_, s)| *s == stage)
            .map(|(r, _)| r)
            .collect()
    }

    /// Whether `path` lies inside the timeline subtree.
    pub fn is_gated(&self, path: &str) -> bool {
        is_segment_prefix(&self.base_path, &normalize_path(path))
    }

    /// Resolve a path to the longest registered route covering it.
    pub fn resolve(&self, path: &str) -> Option<(&str, Stage)> {
        let path = normalize_path(path);
        self.routes
            .iter()
            .filter(|(route, _)| is_segment_prefix(route, &path))
            .max_by_key(|(route, _)| route.len())
            .map(|(route, stage)| (route.as_str(), *stage))
    }

    /// Warnings for stages without any route and routes outside the base path.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for stage in Stage::ALL {
            if self.routes_for(stage).is_empty() {
                warnings.push(format!("No route is mapped to stage {}", stage));
            }
        }

        for route in self.routes.keys() {
            if !is_segment_prefix(&self.base_path, route) {
                warnings.push(format!(
                    "Route '{}' is outside the timeline base path '{}' and will never be reached",
                    route, self.base_path
                ));
            }
        }

        warnings
    }
}

/// Canonical form of a route path.
///
/// Drops the query string and fragment, collapses repeated slashes, forces a
/// leading slash and removes a trailing one.
pub fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn join_path(base: &str, suffix: &str) -> String {
    normalize_path(&format!("{}/{}", base, suffix))
}

/// `prefix` equals `path` or is followed in `path` by a `/` boundary.
fn is_segment_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
