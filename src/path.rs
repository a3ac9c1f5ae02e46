//! Route patterns parsed into literal and parameter segments.
//!
//! A pattern such as `/users/:userId` is split on `/` into segments. Segments starting with `:`
//! are parameters and accept any text at their position, every other segment must match
//! byte for byte. There are no optional segments and no wildcards, so a pattern only ever
//! matches paths with exactly as many segments as it has.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};
use crate::route::Params;

/// Reserved segment marking "the not-found route at this nesting level".
pub const NOT_FOUND_SEGMENT: &str = "__switchboard__404";

/// One `/` delimited piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal text.
    Static(String),
    /// A named parameter, `:name` in pattern syntax.
    Param(String),
}

impl Segment {
    /// Classify a single piece of pattern text.
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Static(text.to_string()),
        }
    }

    /// Whether this segment accepts the given piece of a concrete path.
    pub fn accepts(&self, part: &str) -> bool {
        match self {
            Segment::Static(text) => text == part,
            Segment::Param(_) => true,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Static(text) => write!(f, "{}", text),
            Segment::Param(name) => write!(f, ":{}", name),
        }
    }
}

/// Strip exactly one leading and one trailing `/`.
pub fn normalize_path(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

/// Split a concrete path into its segments. The root path has none.
pub fn split_path(path: &str) -> Vec<&str> {
    match normalize_path(path) {
        "" => vec![],
        path => path.split('/').collect(),
    }
}

/// Join paths with `/`, normalizing each piece. Returns a normalized path string.
///
/// ```
/// use switchboard::path::concat_paths;
///
/// assert_eq!(concat_paths("/docs/", &["/guide", "intro/"]), "docs/guide/intro");
/// assert_eq!(concat_paths("/", &["404"]), "404");
/// ```
pub fn concat_paths(base: &str, rest: &[&str]) -> String {
    std::iter::once(base)
        .chain(rest.iter().copied())
        .map(normalize_path)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// A parsed pattern.
///
/// Not-found paths are their own variant: they live in a separate pool of the registry and are
/// never considered by normal lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutePath {
    /// A pattern for regular pages.
    Page(Vec<Segment>),
    /// A pattern for a not-found route, always ending in [`NOT_FOUND_SEGMENT`].
    ///
    /// [`NOT_FOUND_SEGMENT`]: constant.NOT_FOUND_SEGMENT.html
    NotFound(Vec<Segment>),
}

impl RoutePath {
    /// Parse pattern text.
    ///
    /// `/` and the empty string both produce the root pattern with zero segments.
    pub fn from_string(text: &str, is_not_found: bool) -> Self {
        let segments = split_path(text).into_iter().map(Segment::parse).collect();
        if is_not_found {
            RoutePath::NotFound(segments)
        } else {
            RoutePath::Page(segments)
        }
    }

    /// Build a page pattern from segments composed elsewhere.
    pub fn from_parts(segments: Vec<Segment>) -> Self {
        RoutePath::Page(segments)
    }

    /// The not-found pattern scoped under `prefix`.
    ///
    /// `/` gives the root not-found pattern, `/docs` one that takes over for unmatched paths
    /// below `/docs`.
    pub fn not_found_at(prefix: &str) -> Self {
        RoutePath::from_string(&concat_paths(prefix, &[NOT_FOUND_SEGMENT]), true)
    }

    /// The segments of this pattern.
    pub fn segments(&self) -> &[Segment] {
        match self {
            RoutePath::Page(segments) | RoutePath::NotFound(segments) => segments,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RoutePath::NotFound(_))
    }

    /// Whether a page pattern uses the segment reserved for not-found routes.
    pub fn has_reserved_segment(&self) -> bool {
        !self.is_not_found()
            && self
                .segments()
                .iter()
                .any(|segment| matches!(segment, Segment::Static(text) if text == NOT_FOUND_SEGMENT))
    }

    pub fn is_root(&self) -> bool {
        !self.is_not_found() && self.segments().is_empty()
    }

    /// Check a concrete path against this pattern.
    ///
    /// The segment counts must be equal and every literal must match exactly.
    pub fn matches(&self, path: &str) -> bool {
        let parts = split_path(path);
        let segments = self.segments();

        parts.len() == segments.len()
            && segments.iter().zip(parts).all(|(segment, part)| segment.accepts(part))
    }

    /// Names of the parameters declared by this pattern, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments().iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.param_names().any(|n| n == name)
    }

    /// Extract parameter values from a concrete path.
    ///
    /// Values are percent-decoded. Not-found patterns never yield parameters. The path is
    /// assumed to match; parameters past the end of a shorter path are skipped.
    pub fn params(&self, path: &str) -> Params {
        if self.is_not_found() {
            return Params::new();
        }

        self.segments()
            .iter()
            .zip(split_path(path))
            .filter_map(|(segment, part)| match segment {
                Segment::Param(name) => Some((name.clone(), decode(part))),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Build a concrete path by filling in parameter values.
    ///
    /// ```
    /// use switchboard::path::RoutePath;
    /// use switchboard::Params;
    ///
    /// let path = RoutePath::from_string("/users/:userId/posts", false);
    /// let mut params = Params::new();
    /// params.insert("userId".to_string(), "ada lovelace".to_string());
    /// assert_eq!(path.format(&params).unwrap(), "/users/ada%20lovelace/posts");
    /// ```
    pub fn format(&self, params: &Params) -> Result<String> {
        let parts = self
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Static(text) => Ok(Cow::Borrowed(text.as_str())),
                Segment::Param(name) => params
                    .get(name)
                    .map(|value| urlencoding::encode(value))
                    .ok_or_else(|| Error::MissingRouteParam {
                        name: name.clone(),
                        pattern: self.to_string(),
                    }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!("/{}", parts.join("/")))
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.segments().is_empty() {
            return write!(f, "/");
        }
        for segment in self.segments() {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

fn decode(part: &str) -> String {
    urlencoding::decode(part)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_one_slash_each_side() {
        assert_eq!(normalize_path("/users/"), "users");
        assert_eq!(normalize_path("users"), "users");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("//a//"), "/a/");
    }

    #[test]
    fn root_has_no_segments() {
        assert!(RoutePath::from_string("/", false).segments().is_empty());
        assert!(RoutePath::from_string("", false).segments().is_empty());
        assert!(RoutePath::from_string("/", false).is_root());
        assert!(!RoutePath::from_string("/", true).is_root());
    }

    #[test]
    fn parse_segments() {
        let path = RoutePath::from_string("/users/:userId/posts", false);
        assert_eq!(
            path.segments(),
            &[
                Segment::Static("users".to_string()),
                Segment::Param("userId".to_string()),
                Segment::Static("posts".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "/users/:userId/posts");
    }

    #[test]
    fn from_parts_equals_parsed() {
        let parts = vec![
            Segment::Static("users".to_string()),
            Segment::Param("userId".to_string()),
        ];
        assert_eq!(
            RoutePath::from_parts(parts),
            RoutePath::from_string("users/:userId", false)
        );
    }

    #[test]
    fn not_found_is_a_distinct_variant() {
        let page = RoutePath::from_string("/a", false);
        let not_found = RoutePath::from_string("/a", true);
        assert_ne!(page, not_found);
        assert!(not_found.is_not_found());
        assert!(!page.is_not_found());
    }

    #[test]
    fn pattern_matches_itself() {
        for text in &["", "a", "a/b", "users/:id", "a/:b/c/:d"] {
            assert!(RoutePath::from_string(text, false).matches(text), "{}", text);
        }
    }

    #[test]
    fn segment_count_must_be_equal() {
        let path = RoutePath::from_string("/users/:id", false);
        assert!(path.matches("/users/42"));
        assert!(path.matches("users/42/"));
        assert!(!path.matches("/users"));
        assert!(!path.matches("/users/42/edit"));
        assert!(!path.matches("/"));
    }

    #[test]
    fn literals_are_case_sensitive() {
        let path = RoutePath::from_string("/About", false);
        assert!(path.matches("/About"));
        assert!(!path.matches("/about"));
    }

    #[test]
    fn root_matches_only_root() {
        let root = RoutePath::from_string("/", false);
        assert!(root.matches("/"));
        assert!(root.matches(""));
        assert!(!root.matches("/a"));
        assert!(!RoutePath::from_string("/:any", false).matches("/"));
    }

    #[test]
    fn concat_skips_empty_pieces() {
        assert_eq!(concat_paths("", &["a"]), "a");
        assert_eq!(concat_paths("/", &["/", "a"]), "a");
        assert_eq!(concat_paths("a/b", &[]), "a/b");
        assert_eq!(concat_paths("/docs", &[NOT_FOUND_SEGMENT]), format!("docs/{}", NOT_FOUND_SEGMENT));
    }

    #[test]
    fn not_found_at_prefix() {
        let path = RoutePath::not_found_at("/docs");
        assert!(path.is_not_found());
        assert!(path.matches(&format!("/docs/{}", NOT_FOUND_SEGMENT)));
        assert_eq!(RoutePath::not_found_at("/").segments().len(), 1);
    }

    #[test]
    fn reserved_segment_in_page_pattern() {
        let reserved = format!("/a/{}/b", NOT_FOUND_SEGMENT);
        assert!(RoutePath::from_string(&reserved, false).has_reserved_segment());
        assert!(!RoutePath::not_found_at("/a").has_reserved_segment());
        assert!(!RoutePath::from_string("/a/:b", false).has_reserved_segment());
    }

    #[test]
    fn params_are_extracted_and_decoded() {
        let path = RoutePath::from_string("/users/:userId/files/:name", false);
        let params = path.params("/users/42/files/my%20file.txt");
        assert_eq!(params.get("userId").map(String::as_str), Some("42"));
        assert_eq!(params.get("name").map(String::as_str), Some("my file.txt"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn not_found_paths_have_no_params() {
        let path = RoutePath::from_string("/users/:id", true);
        assert!(path.params("/users/42").is_empty());
    }

    #[test]
    fn format_requires_every_param() {
        let path = RoutePath::from_string("/users/:userId", false);
        let err = path.format(&Params::new()).unwrap_err();
        assert_eq!(
            err,
            Error::MissingRouteParam {
                name: "userId".to_string(),
                pattern: "/users/:userId".to_string(),
            }
        );
        assert_eq!(RoutePath::from_string("/", false).format(&Params::new()).unwrap(), "/");
    }
}
