//! Sample REST namespace.
//!
//! The controllers only echo what they receive; they show each reply shape
//! the dispatcher understands.

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::controller::{
    controller_fn, Controller, ControllerError, ControllerRegistry, ControllerReply, ControllerRequest,
    ResponseContext,
};
use crate::manifest::{ModuleDescriptor, NamespaceRegistry, Visibility};

pub const NAMESPACE: &str = "RestAPI";

pub const KEYS_CONTROLLER: &str = "rest_api::keys";
pub const KEY_UPDATES_CONTROLLER: &str = "rest_api::key_updates";
pub const SUPPLIERS_CONTROLLER: &str = "rest_api::suppliers";

pub fn registration() -> NamespaceRegistry {
    NamespaceRegistry::new(NAMESPACE)
        .module(
            "ApiKeyManagement",
            ModuleDescriptor::new("Api Key Management")
                .at("namespaces/RestAPI/ApiKeyManagement")
                .controller(KEYS_CONTROLLER)
                .get("api/keys")
                .visibility(Visibility::Visible),
        )
        .module(
            "KeyUpdates",
            ModuleDescriptor::new("KeyUpdates")
                .at("namespaces/RestAPI/KeyUpdates")
                .controller(KEY_UPDATES_CONTROLLER)
                .get("")
                .post("api/keys/update/:type/:handle")
                .hidden(),
        )
        .module(
            "Suppliers",
            ModuleDescriptor::new("Suppliers")
                .at("namespaces/RestAPI/Suppliers")
                .controller(SUPPLIERS_CONTROLLER)
                .get("api/suppliers/:handle")
                .post("api/suppliers")
                .put("api/suppliers/:handle")
                .delete("api/suppliers/:handle")
                .hidden(),
        )
}

/// Echoes supplier requests; deletes answer 204 directly.
pub struct SuppliersController;

#[async_trait]
impl Controller for SuppliersController {
    async fn handle(
        &self,
        request: ControllerRequest,
        response: &mut ResponseContext,
    ) -> Result<ControllerReply, ControllerError> {
        let handle = request.param("handle").map(str::to_string);
        match request.method {
            Method::GET => Ok(ControllerReply::from(json!({ "handle": handle }))),
            Method::POST => match request.body {
                Some(body) => Ok(ControllerReply::from(json!({ "created": body }))),
                None => Ok(ControllerReply::with_error("missing supplier payload")),
            },
            Method::PUT => Ok(ControllerReply::from(json!({ "handle": handle, "updated": request.body }))),
            Method::DELETE => {
                response.status(StatusCode::NO_CONTENT)?;
                Ok(ControllerReply::HandledDirectly)
            }
            _ => Ok(ControllerReply::none()),
        }
    }
}

pub fn register_controllers(registry: &mut ControllerRegistry) {
    registry
        .register(
            KEYS_CONTROLLER,
            controller_fn(|_| async { Ok(ControllerReply::from(json!({ "keys": [] }))) }),
        )
        .register(
            KEY_UPDATES_CONTROLLER,
            controller_fn(|request| async move {
                let Some(update) = request.body.clone() else {
                    return Ok(ControllerReply::with_error("missing update payload"));
                };
                Ok(ControllerReply::from(json!({
                    "type": request.param("type"),
                    "handle": request.param("handle"),
                    "update": update,
                })))
            }),
        )
        .register(SUPPLIERS_CONTROLLER, SuppliersController);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_delete_commits_no_content() {
        let request = ControllerRequest::new(Method::DELETE, Uri::from_static("/api/suppliers/acme"))
            .with_params(HashMap::from([("handle".to_string(), "acme".to_string())]));
        let mut response = ResponseContext::new();

        let reply = SuppliersController.handle(request, &mut response).await.unwrap();

        assert_eq!(reply, ControllerReply::HandledDirectly);
        assert_eq!(response.take().unwrap().status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_post_without_body_declines() {
        let request = ControllerRequest::new(Method::POST, Uri::from_static("/api/suppliers"));
        let reply = SuppliersController
            .handle(request, &mut ResponseContext::new())
            .await
            .unwrap();
        assert_eq!(reply, ControllerReply::with_error("missing supplier payload"));
    }

    #[test]
    fn test_registration_matches_declared_routes() {
        let registry = registration();
        let keys: Vec<&str> = registry.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["ApiKeyManagement", "KeyUpdates", "Suppliers"]);
        assert_eq!(registry.get("Suppliers").unwrap().routes().count(), 4);
    }
}
