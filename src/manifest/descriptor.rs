//! Module descriptor: the declarative unit of a namespace.
//!
//! A descriptor names a module, points at its root and its controller, and
//! declares up to one route per HTTP verb. Route strings carry no leading
//! slash; the dispatcher prefixes one when it builds the route table.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// HTTP verbs a module can declare a route for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// All verbs in declaration order.
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Put, Verb::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether a module shows up in the module listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Explicitly listed.
    Visible,
    /// Explicitly excluded from the listing.
    Hidden,
    /// No preference declared; listed.
    #[default]
    DefaultVisible,
}

impl Visibility {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Visibility::Hidden)
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Visibility::DefaultVisible)
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Visibility::Hidden => serializer.serialize_str("false"),
            Visibility::Visible | Visibility::DefaultVisible => serializer.serialize_str("true"),
        }
    }
}

// Manifests written for the old loader use "true"/"false" strings; newer ones
// use booleans. Only an explicit false hides a module.
impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VisibilityVisitor;

        impl de::Visitor<'_> for VisibilityVisitor {
            type Value = Visibility;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or the string \"true\"/\"false\"")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Visibility, E> {
                Ok(if v { Visibility::Visible } else { Visibility::Hidden })
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Visibility, E> {
                Ok(if v == "false" { Visibility::Hidden } else { Visibility::Visible })
            }
        }

        deserializer.deserialize_any(VisibilityVisitor)
    }
}

/// Declarative description of one module.
///
/// Serialized in camelCase because it is echoed back to callers as
/// `module_info` in diagnostic responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    /// Human-readable label.
    pub module_name: String,

    /// Location of the module's root. Opaque to the dispatcher.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub module_path: String,

    /// Key of the controller in the controller registry. Required when any
    /// route is declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_route: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_route: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_route: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_route: Option<String>,

    #[serde(skip_serializing_if = "Visibility::is_default")]
    pub display_in_modules: Visibility,
}

impl ModuleDescriptor {
    /// Start a descriptor with the given display name and nothing else.
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = module_path.into();
        self
    }

    pub fn controller(mut self, controller_path: impl Into<String>) -> Self {
        self.controller_path = Some(controller_path.into());
        self
    }

    pub fn get(self, route: impl Into<String>) -> Self {
        self.with_route(Verb::Get, route)
    }

    pub fn post(self, route: impl Into<String>) -> Self {
        self.with_route(Verb::Post, route)
    }

    pub fn put(self, route: impl Into<String>) -> Self {
        self.with_route(Verb::Put, route)
    }

    pub fn delete(self, route: impl Into<String>) -> Self {
        self.with_route(Verb::Delete, route)
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.display_in_modules = visibility;
        self
    }

    pub fn hidden(self) -> Self {
        self.visibility(Visibility::Hidden)
    }

    /// Set the route for a verb.
    pub fn with_route(mut self, verb: Verb, route: impl Into<String>) -> Self {
        *self.route_slot(verb) = Some(route.into());
        self
    }

    fn route_slot(&mut self, verb: Verb) -> &mut Option<String> {
        match verb {
            Verb::Get => &mut self.get_route,
            Verb::Post => &mut self.post_route,
            Verb::Put => &mut self.put_route,
            Verb::Delete => &mut self.delete_route,
        }
    }

    /// The declared route for `verb`, if present and non-empty.
    pub fn route(&self, verb: Verb) -> Option<&str> {
        let slot = match verb {
            Verb::Get => &self.get_route,
            Verb::Post => &self.post_route,
            Verb::Put => &self.put_route,
            Verb::Delete => &self.delete_route,
        };
        slot.as_deref().filter(|route| !route.is_empty())
    }

    /// Declared `(verb, route)` pairs in GET, POST, PUT, DELETE order.
    pub fn routes(&self) -> impl Iterator<Item = (Verb, &str)> + '_ {
        Verb::ALL
            .into_iter()
            .filter_map(move |verb| self.route(verb).map(|route| (verb, route)))
    }

    /// True when the module declares no route at all.
    pub fn is_inert(&self) -> bool {
        self.routes().next().is_none()
    }
}
