//! Capability surface: every Help Center operation routed through one dispatcher.
//!
//! The surface is built once from the static [`registry`] for the resource
//! kinds the transport supports and is immutable afterwards.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), helpdocs_zendesk::ZendeskError> {
//! use std::path::Path;
//! use helpdocs_zendesk::{Auth, HelpCenter, HttpTransport, RequestBuilder, Resource};
//! use serde_json::json;
//!
//! let requests = RequestBuilder::new(
//!     "https://acme.zendesk.com/api/v2/help_center",
//!     Auth::Bearer("token".to_owned()),
//! );
//! let help_center = HelpCenter::builder()
//!     .transport(HttpTransport::new(requests))
//!     .build()?;
//!
//! let categories = help_center.resource(Resource::Categories)?.call("list", &[]).await?;
//! let article = help_center
//!     .resource(Resource::Articles)?
//!     .call("show", &[json!(42)])
//!     .await?;
//! let record = help_center
//!     .attachments()?
//!     .create(42, Path::new("diagram.png"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod attachments;
pub mod registry;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use attachments::Attachments;
pub use registry::OperationSpec;

use crate::dispatch::{Dispatcher, MAX_CONCURRENT, MAX_RETRIES, WorkQueue};
use crate::error::ZendeskError;
use crate::transport::Transport;

/// Remote entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    /// Articles.
    Articles,
    /// Files attached to articles.
    ArticleAttachments,
    /// Sections.
    Sections,
    /// Section access policies.
    AccessPolicies,
    /// Categories.
    Categories,
    /// Translations of articles, sections and categories.
    Translations,
}

impl Resource {
    /// All resource kinds in registry order.
    pub const ALL: [Self; 6] = [
        Self::Articles,
        Self::ArticleAttachments,
        Self::Sections,
        Self::AccessPolicies,
        Self::Categories,
        Self::Translations,
    ];

    /// Resource name as used by the surface.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Articles => "articles",
            Self::ArticleAttachments => "articleattachments",
            Self::Sections => "sections",
            Self::AccessPolicies => "accesspolicies",
            Self::Categories => "categories",
            Self::Translations => "translations",
        }
    }

    /// Operations implemented by hand rather than from the registry.
    fn hand_authored(self) -> &'static [&'static str] {
        match self {
            Self::ArticleAttachments => &["create"],
            _ => &[],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

type OperationTable = BTreeMap<&'static str, &'static OperationSpec>;

/// Zendesk Help Center client with bounded concurrency and retries.
///
/// Cloning is cheap; clones share the dispatcher and its queue.
pub struct HelpCenter<T> {
    dispatcher: Arc<Dispatcher<T>>,
    surface: Arc<BTreeMap<Resource, OperationTable>>,
}

impl<T> Clone for HelpCenter<T> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            surface: Arc::clone(&self.surface),
        }
    }
}

impl<T: Transport> HelpCenter<T> {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> HelpCenterBuilder<T> {
        HelpCenterBuilder::default()
    }

    /// The dispatcher all operations go through.
    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Resource kinds available on this client.
    pub fn resources(&self) -> impl Iterator<Item = Resource> + '_ {
        self.surface.keys().copied()
    }

    /// Operation names available for `resource`, sorted; empty if unsupported.
    #[must_use]
    pub fn operations(&self, resource: Resource) -> Vec<&'static str> {
        let Some(table) = self.surface.get(&resource) else {
            return Vec::new();
        };
        let mut names: Vec<_> = table
            .keys()
            .copied()
            .chain(resource.hand_authored().iter().copied())
            .collect();
        names.sort_unstable();
        names
    }

    /// Operations of one resource kind.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::UnsupportedResource`] if the transport does not
    /// offer `resource`.
    pub fn resource(&self, resource: Resource) -> Result<Operations<'_, T>, ZendeskError> {
        let table = self
            .surface
            .get(&resource)
            .ok_or(ZendeskError::UnsupportedResource(resource))?;
        Ok(Operations {
            resource,
            table,
            dispatcher: &self.dispatcher,
        })
    }

    /// Article attachment operations, including multipart upload.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::UnsupportedResource`] if the transport does not
    /// offer article attachments.
    pub fn attachments(&self) -> Result<Attachments<'_, T>, ZendeskError> {
        Ok(Attachments::new(self.resource(Resource::ArticleAttachments)?))
    }
}

/// Operations of one resource kind.
pub struct Operations<'a, T> {
    resource: Resource,
    table: &'a OperationTable,
    dispatcher: &'a Dispatcher<T>,
}

impl<T: Transport> Operations<'_, T> {
    /// Resource kind.
    #[must_use]
    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Call `operation` with positional `args` (path parameters, then body).
    ///
    /// Resolves to the parsed JSON body (`null` for empty responses).
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::UnknownOperation`] or
    /// [`ZendeskError::InvalidArguments`] without calling the API, or the
    /// dispatcher's final error.
    pub async fn call(&self, operation: &str, args: &[Value]) -> Result<Value, ZendeskError> {
        if self.resource == Resource::ArticleAttachments && operation == "create" {
            return Attachments::new(self.reborrow()).create_from_args(args).await;
        }

        let spec = self
            .table
            .get(operation)
            .ok_or_else(|| ZendeskError::UnknownOperation {
                resource: self.resource,
                operation: operation.to_owned(),
            })?;
        let request = spec.request(self.resource, args)?;
        self.dispatcher.dispatch(request).await?.json()
    }

    fn reborrow(&self) -> Operations<'_, T> {
        Operations {
            resource: self.resource,
            table: self.table,
            dispatcher: self.dispatcher,
        }
    }
}

/// Builder for [`HelpCenter`].
pub struct HelpCenterBuilder<T> {
    transport: Option<T>,
    max_concurrent: usize,
    max_retries: u32,
}

impl<T> Default for HelpCenterBuilder<T> {
    fn default() -> Self {
        Self {
            transport: None,
            max_concurrent: MAX_CONCURRENT,
            max_retries: MAX_RETRIES,
        }
    }
}

impl<T: Transport> HelpCenterBuilder<T> {
    /// Transport used for every call. Required.
    #[must_use]
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Maximum number of calls in flight.
    #[must_use]
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Maximum number of retries per call.
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Build the client and its capability surface.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::MissingTransport`] if no transport was set, or
    /// [`ZendeskError::Config`] for a zero concurrency limit.
    pub fn build(self) -> Result<HelpCenter<T>, ZendeskError> {
        let transport = self.transport.ok_or(ZendeskError::MissingTransport)?;
        let queue = WorkQueue::new(self.max_concurrent)?;

        let surface = Resource::ALL
            .into_iter()
            .filter(|resource| transport.supports(*resource))
            .map(|resource| {
                let table = registry::operations(resource)
                    .iter()
                    .map(|spec| (spec.name, spec))
                    .collect();
                (resource, table)
            })
            .collect();

        Ok(HelpCenter {
            dispatcher: Arc::new(Dispatcher::new(transport, queue, self.max_retries)),
            surface: Arc::new(surface),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::MockTransport;
    use crate::transport::{Method, Payload, RawOutcome, Response};

    fn help_center(transport: MockTransport) -> HelpCenter<MockTransport> {
        HelpCenter::builder().transport(transport).build().unwrap()
    }

    #[test]
    fn test_build_without_transport_fails() {
        let result = HelpCenter::<MockTransport>::builder().build();
        assert!(matches!(result, Err(ZendeskError::MissingTransport)));
    }

    #[test]
    fn test_build_with_zero_concurrency_fails() {
        let result = HelpCenter::builder()
            .transport(MockTransport::new())
            .max_concurrent(0)
            .build();
        assert!(matches!(result, Err(ZendeskError::Config(_))));
    }

    #[test]
    fn test_surface_covers_supported_resources() {
        let hc = help_center(MockTransport::new().without(Resource::Translations));

        let resources: Vec<_> = hc.resources().collect();
        assert_eq!(
            resources,
            vec![
                Resource::Articles,
                Resource::ArticleAttachments,
                Resource::Sections,
                Resource::AccessPolicies,
                Resource::Categories,
            ]
        );
        assert!(hc.operations(Resource::Translations).is_empty());
        assert!(matches!(
            hc.resource(Resource::Translations),
            Err(ZendeskError::UnsupportedResource(Resource::Translations))
        ));
    }

    #[test]
    fn test_operations_include_hand_authored_create() {
        let hc = help_center(MockTransport::new());
        assert_eq!(
            hc.operations(Resource::ArticleAttachments),
            vec!["create", "delete", "list", "show"]
        );
        assert_eq!(
            hc.operations(Resource::AccessPolicies),
            vec!["show", "update"]
        );
    }

    #[tokio::test]
    async fn test_call_routes_through_dispatcher() {
        let transport = MockTransport::new();
        transport.respond(|_| {
            RawOutcome::response(Response::new(201, r#"{"category":{"id":7,"name":"Guides"}}"#))
        });
        let hc = help_center(transport);

        let body = json!({"category": {"name": "Guides"}});
        let result = hc
            .resource(Resource::Categories)
            .unwrap()
            .call("create", &[body.clone()])
            .await
            .unwrap();

        assert_eq!(result["category"]["id"], 7);
        let requests = hc.dispatcher().transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].endpoint, "/categories.json");
        assert_eq!(requests[0].payload, Some(Payload::Json(body)));
    }

    #[tokio::test]
    async fn test_empty_response_is_null() {
        let transport = MockTransport::new();
        transport.respond(|_| RawOutcome::response(Response::new(204, "")));
        let hc = help_center(transport);

        let result = hc
            .resource(Resource::Articles)
            .unwrap()
            .call("delete", &[json!(5)])
            .await
            .unwrap();

        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_operation_makes_no_call() {
        let hc = help_center(MockTransport::new());

        let err = hc
            .resource(Resource::Sections)
            .unwrap()
            .call("archive", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ZendeskError::UnknownOperation { .. }));
        assert_eq!(hc.dispatcher().transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_arguments_make_no_call() {
        let hc = help_center(MockTransport::new());

        let err = hc
            .resource(Resource::AccessPolicies)
            .unwrap()
            .call("update", &[json!(1)])
            .await
            .unwrap_err();

        assert!(matches!(err, ZendeskError::InvalidArguments { .. }));
        assert_eq!(hc.dispatcher().transport().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_one_queue() {
        let hc = help_center(MockTransport::new());
        let clone = hc.clone();

        clone
            .resource(Resource::Categories)
            .unwrap()
            .call("list", &[])
            .await
            .unwrap();

        assert_eq!(hc.dispatcher().transport().calls(), 1);
        assert_eq!(hc.dispatcher().queue().capacity(), MAX_CONCURRENT);
    }
}
