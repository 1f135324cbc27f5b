//! `ureq`-backed transport for the Help Center REST API.

use std::time::Duration;

use tracing::info;
use ureq::Agent;
use ureq::typestate::WithBody;

use helpdocs_config::ZendeskConfig;

use super::{ApiRequest, Method, Payload, RawOutcome, Response, Transport};
use crate::auth::{RequestBuilder, RequestParams};
use crate::error::ZendeskError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Help Center transport over blocking HTTP.
///
/// Each exchange runs on the runtime's blocking pool so the caller's task
/// only suspends while waiting for it.
pub struct HttpTransport {
    agent: Agent,
    requests: RequestBuilder,
}

impl HttpTransport {
    /// Create a transport using the given request builder.
    #[must_use]
    pub fn new(requests: RequestBuilder) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent, requests }
    }

    /// Create a transport from the `[zendesk]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::Config`] if no credential is configured.
    pub fn from_config(config: &ZendeskConfig) -> Result<Self, ZendeskError> {
        Ok(Self::new(RequestBuilder::from_config(config)?))
    }
}

impl Transport for HttpTransport {
    async fn call(&self, request: &ApiRequest) -> RawOutcome {
        let params = self.requests.build(&request.endpoint);
        let agent = self.agent.clone();
        let method = request.method;
        let payload = request.payload.clone();

        info!(
            "{} {} ({}.{})",
            method, request.endpoint, request.resource, request.operation
        );

        match tokio::task::spawn_blocking(move || execute(&agent, &params, method, payload.as_ref()))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => RawOutcome::failed(ZendeskError::Task(e.to_string())),
        }
    }
}

/// Perform one blocking exchange.
fn execute(
    agent: &Agent,
    params: &RequestParams,
    method: Method,
    payload: Option<&Payload>,
) -> RawOutcome {
    let auth_header = params.auth.header_value();

    let result = match method {
        Method::Get => agent
            .get(&params.url)
            .header("Authorization", &auth_header)
            .header("Accept", "application/json")
            .call(),
        Method::Delete => agent
            .delete(&params.url)
            .header("Authorization", &auth_header)
            .header("Accept", "application/json")
            .call(),
        Method::Post => send(
            agent
                .post(&params.url)
                .header("Authorization", &auth_header)
                .header("Accept", "application/json"),
            payload,
        ),
        Method::Put => send(
            agent
                .put(&params.url)
                .header("Authorization", &auth_header)
                .header("Accept", "application/json"),
            payload,
        ),
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => return RawOutcome::failed(e.into()),
    };

    let (parts, mut body_reader) = response.into_parts();
    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_owned(), v.to_owned()))
        })
        .collect();
    let status = parts.status.as_u16();

    match body_reader.read_to_string() {
        Ok(body) => RawOutcome::response(Response {
            status,
            headers,
            body,
        }),
        // Keep the status and headers so a rate-limit hint is not lost.
        Err(e) => RawOutcome {
            error: Some(e.into()),
            response: Some(Response {
                status,
                headers,
                body: String::new(),
            }),
        },
    }
}

fn send(
    request: ureq::RequestBuilder<WithBody>,
    payload: Option<&Payload>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match payload {
        None => request.send_empty(),
        Some(Payload::Json(value)) => request.send_json(value),
        Some(Payload::Multipart(form)) => {
            let encoded = form.encode()?;
            request
                .header("Content-Type", &encoded.content_type)
                .send(&encoded.body[..])
        }
    }
}
