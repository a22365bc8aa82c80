//! Route-string to axum path conversion.
//!
//! # Responsibilities
//! - Prefix the route string with `/` (no other normalization)
//! - Rewrite `:name` segments to `{name}` and `*name` to `{*name}`
//! - Reject segments axum would refuse at registration time
//! - Reject Express forms with no axum equivalent: placeholders inside a
//!   segment (`file.:ext`) and modifiers (`:id?`, `:id+`, `:id(\\d+)`)
//!
//! # Design Decisions
//! - Manifests keep the `:param` syntax; the rewrite is purely lexical
//! - Segments already in `{name}` form pass through untouched

use std::fmt;

/// A route string that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPath {
    pub path: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid route path {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for InvalidPath {}

/// Build the axum path for a declared route string.
pub fn to_axum_path(route: &str) -> Result<String, InvalidPath> {
    let path = format!("/{route}");
    let converted = path
        .split('/')
        .map(convert_segment)
        .collect::<Vec<_>>()
        .join("/");

    validate(&converted).map_err(|reason| InvalidPath {
        path: path.clone(),
        reason,
    })?;
    Ok(converted)
}

fn convert_segment(segment: &str) -> String {
    if let Some(name) = segment.strip_prefix(':').filter(|n| !n.is_empty()) {
        format!("{{{name}}}")
    } else if let Some(name) = segment.strip_prefix('*').filter(|n| !n.is_empty()) {
        format!("{{*{name}}}")
    } else {
        segment.to_string()
    }
}

fn validate(path: &str) -> Result<(), &'static str> {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;

    for (index, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err("parameter segment without a name");
        }
        // `file.:ext` style placeholders are not supported by axum.
        if segment.contains(':') {
            return Err("placeholder must start a segment");
        }
        if !segment.contains(['{', '}']) {
            continue;
        }

        let inner = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or("parameter must span the whole segment")?;
        let (catch_all, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        if name.is_empty() {
            return Err("parameter segment without a name");
        }
        // Optional (`:id?`), repeated (`:id+`) and regex (`:id(\d+)`) forms.
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err("unsupported parameter modifier");
        }
        if catch_all && index != last {
            return Err("catch-all must be the final segment");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_routes_are_prefixed_only() {
        assert_eq!(to_axum_path("api/keys").unwrap(), "/api/keys");
        assert_eq!(to_axum_path("modules").unwrap(), "/modules");
    }

    #[test]
    fn test_placeholders_are_rewritten() {
        assert_eq!(
            to_axum_path("api/keys/update/:type/:handle").unwrap(),
            "/api/keys/update/{type}/{handle}"
        );
        assert_eq!(to_axum_path("files/*rest").unwrap(), "/files/{*rest}");
        assert_eq!(to_axum_path("api/suppliers/{handle}").unwrap(), "/api/suppliers/{handle}");
    }

    #[test]
    fn test_concatenation_is_literal() {
        assert_eq!(to_axum_path("/api").unwrap(), "//api");
    }

    #[test]
    fn test_unregistrable_segments_are_rejected() {
        assert!(to_axum_path("api/:").is_err());
        assert!(to_axum_path("api/{open").is_err());
        assert!(to_axum_path("api/close}").is_err());
        assert!(to_axum_path("api/{}").is_err());
        assert!(to_axum_path("api/{a}{b}").is_err());
    }

    #[test]
    fn test_catch_all_must_be_last() {
        let err = to_axum_path("files/*rest/more").unwrap_err();
        assert_eq!(err.reason, "catch-all must be the final segment");
        assert!(to_axum_path("files/{*rest}/more").is_err());
    }

    #[test]
    fn test_express_only_forms_are_rejected() {
        assert_eq!(
            to_axum_path("download/file.:ext").unwrap_err().reason,
            "placeholder must start a segment"
        );
        assert_eq!(
            to_axum_path("api/items/:id?").unwrap_err().reason,
            "unsupported parameter modifier"
        );
        assert!(to_axum_path("api/items/:id(\\d+)").is_err());
    }
}
