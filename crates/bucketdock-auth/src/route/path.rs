//! Route parsing.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped in a generated route path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'?')
    .add(b'<')
    .add(b'>');

/// Characters escaped in the search query value.
const QUERY: &AsciiSet = &SEGMENT.add(b'&').add(b'+').add(b'=').add(b'/');

/// A client-side route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/login`
    Login,
    /// `/update-password`
    UpdatePassword,
    /// `/`
    Home,
    /// `/bucket/:name/*`; the tail is the folder prefix.
    Bucket {
        /// Bucket name.
        name: String,
        /// Folder prefix, empty for the bucket root, else ending in `/`.
        prefix: String,
    },
    /// `/search?q=`
    Search {
        /// The search query.
        query: String,
    },
    /// `/admin`
    Admin,
    /// Anything else.
    NotFound(String),
}

impl Route {
    /// Parse a path such as `/bucket/photos/2024/`.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/update-password" => Self::UpdatePassword,
            "/admin" => Self::Admin,
            "/search" => Self::Search {
                query: query.and_then(search_param).unwrap_or_default(),
            },
            _ => match path.strip_prefix("/bucket/") {
                Some(rest) => {
                    Self::bucket_from(rest).unwrap_or_else(|| Self::NotFound(input.to_string()))
                }
                None => Self::NotFound(input.to_string()),
            },
        }
    }

    fn bucket_from(rest: &str) -> Option<Self> {
        let (name, tail) = match rest.split_once('/') {
            Some((name, tail)) => (name, tail),
            None => (rest, ""),
        };
        if name.is_empty() {
            return None;
        }
        let name = decode(name);
        let mut prefix = decode(tail);
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Some(Self::Bucket { name, prefix })
    }

    /// Route for a bucket folder.
    pub fn bucket(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Bucket {
            name: name.into(),
            prefix: prefix.into(),
        }
    }

    /// Canonical path of the route.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::UpdatePassword => "/update-password".to_string(),
            Self::Home => "/".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::Search { query } => {
                format!("/search?q={}", utf8_percent_encode(query, QUERY))
            }
            Self::Bucket { name, prefix } => {
                let mut path = format!("/bucket/{}/", utf8_percent_encode(name, SEGMENT));
                path.push_str(&utf8_percent_encode(prefix, SEGMENT).to_string());
                path
            }
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Whether the route needs a signed-in session regardless of other state.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::UpdatePassword | Self::Home | Self::Search { .. } | Self::Admin
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

fn search_param(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == "q").then(|| decode(&value.replace('+', " ")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/update-password"), Route::UpdatePassword);
        assert_eq!(Route::parse("/admin/"), Route::Admin);
        assert_eq!(
            Route::parse("/nowhere"),
            Route::NotFound("/nowhere".to_string())
        );
    }

    #[test]
    fn test_parse_bucket_with_prefix() {
        assert_eq!(Route::parse("/bucket/photos"), Route::bucket("photos", ""));
        assert_eq!(
            Route::parse("/bucket/photos/2024/summer"),
            Route::bucket("photos", "2024/summer/")
        );
        assert_eq!(
            Route::parse("/bucket/photos/my%20trip/"),
            Route::bucket("photos", "my trip/")
        );
        assert!(matches!(Route::parse("/bucket/"), Route::NotFound(_)));
    }

    #[test]
    fn test_parse_search() {
        assert_eq!(
            Route::parse("/search?q=report+2024"),
            Route::Search {
                query: "report 2024".into()
            }
        );
        assert_eq!(
            Route::parse("/search"),
            Route::Search {
                query: String::new()
            }
        );
    }

    #[test]
    fn test_path_reparses() {
        let route = Route::bucket("photos", "my trip/");
        assert_eq!(route.path(), "/bucket/photos/my%20trip/");
        assert_eq!(Route::parse(&route.path()), route);
    }
}
