//! Route table with access requirements per path.

use serde::{Deserialize, Serialize};

/// Access requirements attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Route is only reachable with a credential.
    #[serde(default)]
    pub requires_auth: bool,
    /// Route is only reachable by an admin.
    #[serde(default)]
    pub requires_admin: bool,
}

impl RouteMeta {
    /// Route open to everyone.
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
    };

    /// Route reserved for authenticated admins.
    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_admin: true,
    };

    /// Combines parent and child requirements.
    #[must_use]
    pub const fn inherit(self, child: Self) -> Self {
        Self {
            requires_auth: self.requires_auth || child.requires_auth,
            requires_admin: self.requires_admin || child.requires_admin,
        }
    }
}

/// A navigable route. Children paths are relative to the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Unique route name.
    pub name: String,
    /// Path pattern; `:name` segments capture a parameter.
    pub path: String,
    /// Requirements declared on this route.
    #[serde(flatten)]
    pub meta: RouteMeta,
    /// Nested routes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDefinition>,
}

impl RouteDefinition {
    /// Creates a public route.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            meta: RouteMeta::PUBLIC,
            children: Vec::new(),
        }
    }

    /// Sets access requirements.
    #[must_use]
    pub const fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }
}

/// Result of matching a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Matched route name.
    pub name: String,
    /// Full path pattern of the match.
    pub path: String,
    /// Captured parameters in path order.
    pub params: Vec<(String, String)>,
    /// Effective requirements including inherited ones.
    pub meta: RouteMeta,
}

impl ResolvedRoute {
    /// Returns a captured `:param` value.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Route table plus the designated login and home paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Redirect target for unauthenticated access.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Redirect target for non-admin access.
    #[serde(default = "default_home_path")]
    pub home_path: String,
    /// Top-level routes.
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteDefinition>,
}

fn default_login_path() -> String {
    "/admin/login".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

/// The storefront's routes.
fn default_routes() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::new("home", "/"),
        RouteDefinition::new("products", "/products"),
        RouteDefinition::new("product-detail", "/products/:id"),
        RouteDefinition::new("dashboard", "/dashboard"),
        RouteDefinition::new("contact", "/contact"),
        RouteDefinition::new("admin-login", "/admin/login"),
        RouteDefinition::new("admin", "/admin")
            .with_meta(RouteMeta::ADMIN)
            .with_children(vec![
                RouteDefinition::new("admin-dashboard", "dashboard"),
                RouteDefinition::new("admin-profile", "profile"),
                RouteDefinition::new("admin-products", "products"),
            ]),
    ]
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            home_path: default_home_path(),
            routes: default_routes(),
        }
    }
}

impl RouteTable {
    /// Matches a path, ignoring query string, fragment and trailing slash.
    ///
    /// Segments are percent-decoded and static segments compare without regard
    /// to ASCII case. Children are tried before their parent so the most
    /// specific route wins; siblings are tried in declaration order.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let segments: Vec<String> = split_segments(strip_suffixes(path))
            .into_iter()
            .map(percent_decode)
            .collect();
        self.routes
            .iter()
            .find_map(|route| resolve_in(route, &[], RouteMeta::PUBLIC, &segments))
    }

    /// Returns every route as `(name, full path, effective meta)`, depth first.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String, RouteMeta)> {
        fn walk(
            route: &RouteDefinition,
            parent: &[String],
            meta: RouteMeta,
            out: &mut Vec<(String, String, RouteMeta)>,
        ) {
            let pattern = join_pattern(parent, &route.path);
            let meta = meta.inherit(route.meta);
            out.push((route.name.clone(), format_path(&pattern), meta));
            for child in &route.children {
                walk(child, &pattern, meta, out);
            }
        }

        let mut out = Vec::new();
        for route in &self.routes {
            walk(route, &[], RouteMeta::PUBLIC, &mut out);
        }
        out
    }
}

fn resolve_in(
    route: &RouteDefinition,
    parent: &[String],
    parent_meta: RouteMeta,
    segments: &[String],
) -> Option<ResolvedRoute> {
    let pattern = join_pattern(parent, &route.path);
    let meta = parent_meta.inherit(route.meta);

    if let Some(found) = route
        .children
        .iter()
        .find_map(|child| resolve_in(child, &pattern, meta, segments))
    {
        return Some(found);
    }

    let params = match_pattern(&pattern, segments)?;
    Some(ResolvedRoute {
        name: route.name.clone(),
        path: format_path(&pattern),
        params,
        meta,
    })
}

fn strip_suffixes(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn join_pattern(parent: &[String], path: &str) -> Vec<String> {
    let own = split_segments(path).into_iter().map(str::to_string);
    if path.starts_with('/') {
        own.collect()
    } else {
        parent.iter().cloned().chain(own).collect()
    }
}

fn format_path(pattern: &[String]) -> String {
    format!("/{}", pattern.join("/"))
}

fn match_pattern(pattern: &[String], segments: &[String]) -> Option<Vec<(String, String)>> {
    if pattern.len() != segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern.iter().zip(segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_string(), actual.clone()));
        } else if !expected.eq_ignore_ascii_case(actual) {
            return None;
        }
    }
    Some(params)
}

/// Decodes `%XX` escapes in one path segment. Malformed escapes are kept as-is.
fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(byte) = hex {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
