//! In-memory transport for exercising the client and the resource modules.

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};

use super::client::REFRESH_PATH;
use super::transport::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

struct Route {
    method: HttpMethod,
    path: String,
    public: bool,
    response: HttpResponse,
}

/// Accepts exactly one bearer token; anything else gets a 401.
pub(crate) struct ScriptedTransport {
    valid_token: String,
    log: RefCell<Vec<HttpRequest>>,
    routes: RefCell<Vec<Route>>,
    refresh_calls: Cell<usize>,
    refresh_gate: RefCell<Option<oneshot::Receiver<()>>>,
    gate_release: RefCell<Option<oneshot::Sender<()>>>,
    refresh_rejection: RefCell<Option<String>>,
    rotated_refresh: RefCell<Option<String>>,
    always_unauthorized: RefCell<Vec<String>>,
    held: RefCell<Vec<(String, oneshot::Receiver<()>)>>,
    held_release: RefCell<Vec<(String, oneshot::Sender<()>)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(valid_token: &str) -> Self {
        Self {
            valid_token: valid_token.to_string(),
            log: RefCell::new(Vec::new()),
            routes: RefCell::new(Vec::new()),
            refresh_calls: Cell::new(0),
            refresh_gate: RefCell::new(None),
            gate_release: RefCell::new(None),
            refresh_rejection: RefCell::new(None),
            rotated_refresh: RefCell::new(None),
            always_unauthorized: RefCell::new(Vec::new()),
            held: RefCell::new(Vec::new()),
            held_release: RefCell::new(Vec::new()),
        }
    }

    /// Canned response for an authenticated route
    pub(crate) fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.add_route(method, path, false, status, body);
    }

    /// Canned response that does not require a bearer token
    pub(crate) fn respond_public(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.add_route(method, path, true, status, body);
    }

    fn add_route(&self, method: HttpMethod, path: &str, public: bool, status: u16, body: &str) {
        self.routes.borrow_mut().push(Route {
            method,
            path: path.to_string(),
            public,
            response: HttpResponse::new(status, body),
        });
    }

    /// Refresh calls block until [`Self::release_refresh`]
    pub(crate) fn hold_refresh(&self) {
        let (tx, rx) = oneshot::channel();
        *self.refresh_gate.borrow_mut() = Some(rx);
        *self.gate_release.borrow_mut() = Some(tx);
    }

    pub(crate) fn release_refresh(&self) {
        if let Some(tx) = self.gate_release.borrow_mut().take() {
            let _ = tx.send(());
        }
    }

    /// The next request to `path` is answered only after
    /// [`Self::release_route`]; the answer still reflects the bearer it was
    /// sent with.
    pub(crate) fn hold_route(&self, path: &str) {
        let (tx, rx) = oneshot::channel();
        self.held.borrow_mut().push((path.to_string(), rx));
        self.held_release.borrow_mut().push((path.to_string(), tx));
    }

    pub(crate) fn release_route(&self, path: &str) {
        let mut releases = self.held_release.borrow_mut();
        if let Some(pos) = releases.iter().position(|(p, _)| p == path) {
            let (_, tx) = releases.remove(pos);
            let _ = tx.send(());
        }
    }

    pub(crate) fn reject_refresh(&self, body: &str) {
        *self.refresh_rejection.borrow_mut() = Some(body.to_string());
    }

    pub(crate) fn rotate_refresh_token(&self, token: &str) {
        *self.rotated_refresh.borrow_mut() = Some(token.to_string());
    }

    pub(crate) fn always_unauthorized(&self, path: &str) {
        self.always_unauthorized.borrow_mut().push(path.to_string());
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.refresh_calls.get()
    }

    pub(crate) fn last_refresh_body(&self) -> Option<String> {
        self.last_request(REFRESH_PATH).and_then(|r| r.body)
    }

    pub(crate) fn last_request(&self, path: &str) -> Option<HttpRequest> {
        self.log
            .borrow()
            .iter()
            .rev()
            .find(|r| r.path == path)
            .cloned()
    }

    pub(crate) fn seen_bearers(&self, path: &str) -> Vec<Option<String>> {
        self.log
            .borrow()
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.bearer().map(str::to_string))
            .collect()
    }

    async fn refresh(&self) -> HttpResponse {
        self.refresh_calls.set(self.refresh_calls.get() + 1);
        let gate = self.refresh_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(body) = self.refresh_rejection.borrow().clone() {
            return HttpResponse::new(401, body);
        }
        let body = serde_json::json!({
            "accessToken": self.valid_token,
            "refreshToken": self.rotated_refresh.borrow().clone(),
        });
        HttpResponse::new(200, body.to_string())
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.log.borrow_mut().push(request.clone());
        if request.path == REFRESH_PATH {
            return Ok(self.refresh().await);
        }

        let gate = {
            let mut held = self.held.borrow_mut();
            held.iter()
                .position(|(p, _)| *p == request.path)
                .map(|pos| held.remove(pos).1)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let canned = self
            .routes
            .borrow()
            .iter()
            .rev()
            .find(|r| r.method == request.method && r.path == request.path)
            .map(|r| (r.public, r.response.clone()));
        let authorized = request.bearer() == Some(self.valid_token.as_str())
            && !self.always_unauthorized.borrow().contains(&request.path);

        match canned {
            Some((true, response)) => Ok(response),
            _ if !authorized => Ok(HttpResponse::new(401, r#"{"message":"Unauthorized"}"#)),
            Some((false, response)) => Ok(response),
            None => Ok(HttpResponse::new(200, "{}")),
        }
    }
}
