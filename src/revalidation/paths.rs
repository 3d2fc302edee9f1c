use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Locale codes every page is served under, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Locales(Vec<String>);

impl Locales {
    /// Parse a comma separated list, lowercasing and dropping blanks, duplicates
    /// and anything that would not form a single path segment.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locales: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim().to_ascii_lowercase();
            if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                if !code.is_empty() {
                    tracing::warn!("Ignoring invalid locale code '{}'", code);
                }
                continue;
            }
            if !locales.contains(&code) {
                locales.push(code);
            }
        }
        Self(locales)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for Locales {
    fn default() -> Self {
        Self::new(["en", "nl", "de", "fr"])
    }
}

/// Ordered, duplicate-free list of absolute site paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathSet(Vec<String>);

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path unless it is already present.
    pub fn push(&mut self, path: impl Into<String>) {
        let path = path.into();
        debug_assert!(path.starts_with('/'), "path must be absolute: {}", path);
        if !self.0.contains(&path) {
            self.0.push(path);
        }
    }

    /// Append `path` and its locale-prefixed variants.
    pub fn push_localized(&mut self, path: &str, locales: &Locales) {
        self.push(path);
        for locale in locales.iter() {
            self.push(locale_path(locale, path));
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Page routes a table's rows are rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRoutes {
    /// Index page listing every row of the table.
    pub listing: Option<&'static str>,
    /// Per-row page; `{slug}` is replaced with the row slug.
    pub detail: Option<&'static str>,
    /// Rows may be featured on the homepage.
    pub featured: bool,
}

impl TableRoutes {
    /// Used for any table without its own entry: only the homepage is touched.
    pub const FALLBACK: TableRoutes = TableRoutes {
        listing: None,
        detail: None,
        featured: true,
    };

    pub fn for_table(table: &str) -> &'static TableRoutes {
        TABLE_ROUTES.get(table).unwrap_or(&Self::FALLBACK)
    }
}

static TABLE_ROUTES: Lazy<HashMap<&'static str, TableRoutes>> = Lazy::new(|| {
    HashMap::from([
        (
            "products",
            TableRoutes {
                listing: Some("/products"),
                detail: Some("/products/{slug}"),
                featured: true,
            },
        ),
        (
            "categories",
            TableRoutes {
                listing: Some("/categories"),
                detail: Some("/categories/{slug}"),
                featured: false,
            },
        ),
        (
            "blog_posts",
            TableRoutes {
                listing: Some("/blog"),
                detail: Some("/blog/{slug}"),
                featured: true,
            },
        ),
        (
            "blog_categories",
            TableRoutes {
                listing: Some("/blog"),
                detail: Some("/blog/category/{slug}"),
                featured: false,
            },
        ),
    ])
});

/// Names of every table with dedicated routes, sorted.
pub fn known_tables() -> Vec<&'static str> {
    let mut tables: Vec<&'static str> = TABLE_ROUTES.keys().copied().collect();
    tables.sort_unstable();
    tables
}

/// Compute every path that renders a row of `table` with the given slug.
///
/// Order: listing, localized listings, detail, localized details, homepage,
/// localized homepages. Unknown tables yield only the homepage variants. An
/// absent or malformed slug just omits the detail paths.
pub fn build_paths(table: &str, slug: Option<&str>, locales: &Locales) -> PathSet {
    let routes = TableRoutes::for_table(table);
    let mut paths = PathSet::new();

    if let Some(listing) = routes.listing {
        paths.push_localized(listing, locales);
    }

    if let (Some(template), Some(slug)) = (routes.detail, slug.and_then(clean_slug)) {
        paths.push_localized(&template.replace("{slug}", slug), locales);
    }

    if routes.featured {
        paths.push_localized("/", locales);
    }

    paths
}

/// Expand each path with its locale variants, preserving input order.
pub fn localize<I, S>(paths: I, locales: &Locales) -> PathSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = PathSet::new();
    for path in paths {
        set.push_localized(path.as_ref(), locales);
    }
    set
}

fn locale_path(locale: &str, path: &str) -> String {
    if path == "/" {
        format!("/{}", locale)
    } else {
        format!("/{}{}", locale, path)
    }
}

/// Trimmed slug, or `None` if it cannot form a single path segment.
pub fn clean_slug(slug: &str) -> Option<&str> {
    let slug = slug.trim();
    if slug.is_empty() {
        return None;
    }
    let malformed = slug == "."
        || slug == ".."
        || slug
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace() || c.is_control());
    if malformed {
        tracing::warn!("Ignoring malformed slug '{}'", slug.escape_debug());
        return None;
    }
    Some(slug)
}
