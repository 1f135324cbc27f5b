//! Zendesk Help Center client with bounded concurrency and automatic retries,
//! plus a publisher for Markdown documentation trees.
//!
//! Every API call goes through one [`Dispatcher`]: at most
//! [`MAX_CONCURRENT`] calls are in flight, and transient failures (HTTP 5xx
//! or a `Retry-After` hint) are retried up to [`MAX_RETRIES`] times with
//! exponential backoff while the call keeps its slot.
//!
//! # Modules
//!
//! - [`surface`]: per-resource operations built from a static registry
//! - [`dispatch`]: queue, classifier, backoff and retry loop
//! - [`transport`]: the [`Transport`] seam and its `ureq` implementation
//! - [`publisher`]: document tree reader, renderer and publisher

mod auth;
pub mod dispatch;
mod error;
pub mod publisher;
pub mod surface;
#[cfg(test)]
mod testing;
pub mod transport;
pub mod types;

pub use auth::{Auth, RequestBuilder, RequestParams};
pub use dispatch::{Dispatcher, MAX_CONCURRENT, MAX_RETRIES, WorkQueue};
pub use error::ZendeskError;
pub use publisher::{
    PublishError, PublishOptions, PublishPlan, PublishReport, Publisher, plan, read_tree,
};
pub use surface::{Attachments, HelpCenter, HelpCenterBuilder, Operations, Resource};
pub use transport::{ApiRequest, HttpTransport, Method, Payload, RawOutcome, Response, Transport};
