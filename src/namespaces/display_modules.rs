//! The module listing, served as a module of its own.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::controller::{Controller, ControllerError, ControllerReply, ControllerRequest, ResponseContext};
use crate::listing::{enumerate_modules, ModuleListing};
use crate::manifest::{ModuleDescriptor, NamespaceRegistry};
use crate::namespace::Aggregator;

pub const NAMESPACE: &str = "DisplayModules";
pub const CONTROLLER: &str = "display_modules::listing";

pub fn registration() -> NamespaceRegistry {
    NamespaceRegistry::new(NAMESPACE).module(
        "DisplayModules",
        ModuleDescriptor::new("Modules")
            .at("namespaces/DisplayModules")
            .controller(CONTROLLER)
            .get("modules"),
    )
}

/// Lists every visible module, as HTML or JSON.
pub struct ListingController {
    aggregator: Arc<dyn Aggregator>,
    display_module: String,
}

impl ListingController {
    pub fn new(aggregator: Arc<dyn Aggregator>, display_module: impl Into<String>) -> Self {
        Self {
            aggregator,
            display_module: display_module.into(),
        }
    }
}

#[async_trait]
impl Controller for ListingController {
    async fn handle(
        &self,
        request: ControllerRequest,
        _response: &mut ResponseContext,
    ) -> Result<ControllerReply, ControllerError> {
        let listing = enumerate_modules(self.aggregator.as_ref(), &self.display_module);
        if request.wants_json() {
            Ok(ControllerReply::from(json!({ "modules": listing })))
        } else {
            Ok(ControllerReply::html(render(&listing)))
        }
    }
}

fn render(listing: &ModuleListing) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Modules</title></head>\n<body>\n<h1>Modules</h1>\n",
    );
    if listing.is_empty() {
        page.push_str("<p>No modules available.</p>\n");
    } else {
        page.push_str("<ul>\n");
        for entry in listing.values() {
            let _ = writeln!(
                page,
                "<li><a href=\"/{}\">{}</a></li>",
                escape(&entry.route),
                escape(&entry.name)
            );
        }
        page.push_str("</ul>\n");
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::StaticAggregator;
    use crate::namespaces::rest_api;
    use axum::http::{Method, Uri};

    fn controller() -> ListingController {
        let aggregator = StaticAggregator::from_registrations(&[registration, rest_api::registration]);
        ListingController::new(Arc::new(aggregator), NAMESPACE)
    }

    #[tokio::test]
    async fn test_json_listing_excludes_itself_and_hidden_modules() {
        let request = ControllerRequest::new(Method::GET, Uri::from_static("/modules?format=json"));
        let reply = controller().handle(request, &mut ResponseContext::new()).await.unwrap();

        let ControllerReply::Json { data } = reply else {
            panic!("expected json reply");
        };
        let modules = data["modules"].as_object().unwrap();
        let keys: Vec<&String> = modules.keys().collect();
        assert_eq!(keys, vec!["ApiKeyManagement"]);
        assert_eq!(modules["ApiKeyManagement"]["route"], "api/keys");
    }

    #[tokio::test]
    async fn test_html_listing_links_routes() {
        let request = ControllerRequest::new(Method::GET, Uri::from_static("/modules"));
        let reply = controller().handle(request, &mut ResponseContext::new()).await.unwrap();

        let ControllerReply::Html { content } = reply else {
            panic!("expected html reply");
        };
        assert!(content.contains("<a href=\"/api/keys\">ApiKeyManagement</a>"));
        assert!(!content.contains("Suppliers"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
