//! Scripted transport for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::surface::Resource;
use crate::transport::{ApiRequest, RawOutcome, Response, Transport};

type Responder = Box<dyn Fn(usize, &ApiRequest) -> RawOutcome + Send + Sync>;

/// Transport answering each call from a closure keyed on the call index or
/// on the request itself.
///
/// Without a responder every call returns `200 {}`.
pub(crate) struct MockTransport {
    responder: Mutex<Option<Responder>>,
    requests: Mutex<Vec<ApiRequest>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    latency: Option<Duration>,
    unsupported: Vec<Resource>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            responder: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            latency: None,
            unsupported: Vec::new(),
        }
    }

    /// Simulated duration of every call.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Report `resource` as unsupported.
    pub(crate) fn without(mut self, resource: Resource) -> Self {
        self.unsupported.push(resource);
        self
    }

    /// Answer by call index.
    pub(crate) fn respond<F>(&self, responder: F)
    where
        F: Fn(usize) -> RawOutcome + Send + Sync + 'static,
    {
        let responder: Responder = Box::new(move |index: usize, _: &ApiRequest| responder(index));
        *self.responder.lock().unwrap() = Some(responder);
    }

    /// Answer by request.
    pub(crate) fn route<F>(&self, responder: F)
    where
        F: Fn(&ApiRequest) -> RawOutcome + Send + Sync + 'static,
    {
        let responder: Responder =
            Box::new(move |_: usize, request: &ApiRequest| responder(request));
        *self.responder.lock().unwrap() = Some(responder);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn supports(&self, resource: Resource) -> bool {
        !self.unsupported.contains(&resource)
    }

    async fn call(&self, request: &ApiRequest) -> RawOutcome {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responder.lock().unwrap().as_ref() {
            Some(responder) => responder(index, request),
            None => RawOutcome::response(Response::new(200, "{}")),
        }
    }
}
