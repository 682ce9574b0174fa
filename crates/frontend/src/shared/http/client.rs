use contracts::system::auth::{RefreshRequest, RefreshResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

use super::error::ApiError;
use super::single_flight::{RefreshCoordinator, RefreshTicket};
use super::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::system::auth::token_store::TokenStore;

pub const REFRESH_PATH: &str = "/auth/refresh";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

type AuthFailureHandler = Rc<dyn Fn(&str)>;

struct ClientInner {
    transport: Rc<dyn Transport>,
    tokens: TokenStore,
    refresh: RefreshCoordinator,
    on_auth_failure: RefCell<Option<AuthFailureHandler>>,
}

/// HTTP client that attaches the bearer token and recovers from an expired
/// access token by refreshing once and replaying the request.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<ClientInner>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>, tokens: TokenStore) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                transport,
                tokens,
                refresh: RefreshCoordinator::new(),
                on_auth_failure: RefCell::new(None),
            }),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Called when the session cannot be recovered (typically: go to sign-in)
    pub fn on_auth_failure(&self, handler: impl Fn(&str) + 'static) {
        *self.inner.on_auth_failure.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    /// Sends a request through the auth interceptors. Non-2xx responses come
    /// back as classified [`ApiError`]s.
    ///
    /// A 401 for a token that has since been replaced is replayed with the
    /// current token; one whose session was cleared meanwhile fails quietly.
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let sent_with = self.inner.tokens.access_token();
        if let Some(token) = &sent_with {
            request.set_bearer(token);
        }

        let response = self.inner.transport.send(&request).await?;
        if response.status != 401 || request.retried {
            return Self::check(response);
        }

        request.retried = true;
        let original = ApiError::from_response(&response);
        let token = match (sent_with, self.inner.tokens.access_token()) {
            (Some(sent), Some(current)) if sent != current => {
                log::debug!("401 for a superseded access token, replaying with the current one");
                current
            }
            (Some(_), None) if self.inner.tokens.refresh_token().is_none() => {
                log::debug!("401 arrived after the session was cleared");
                return Err(original);
            }
            _ => self.recover_access_token(original).await?,
        };
        request.set_bearer(&token);

        let response = self.inner.transport.send(&request).await?;
        Self::check(response)
    }

    /// Sends without attaching credentials or refreshing (login, register, ...)
    pub async fn send_anonymous(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.inner.transport.send(&request).await?;
        Self::check(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(HttpRequest::get(path)).await?;
        Self::decode(&response)
    }

    pub async fn send_json<B, T>(&self, method: HttpMethod, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = HttpRequest::new(method, path).json(body)?;
        let response = self.send(request).await?;
        Self::decode(&response)
    }

    /// Like [`Self::send_json`] for endpoints whose response body is ignored
    pub async fn send_unit<B>(&self, method: HttpMethod, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = HttpRequest::new(method, path).json(body)?;
        self.send(request).await.map(|_| ())
    }

    pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn check(response: HttpResponse) -> Result<HttpResponse, ApiError> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(&response))
        }
    }

    /// Produces a fresh access token after a 401, joining an in-flight
    /// refresh when there is one.
    async fn recover_access_token(&self, original: ApiError) -> Result<String, ApiError> {
        let Some(refresh_token) = self.inner.tokens.refresh_token() else {
            log::warn!("Access token rejected and no refresh token stored");
            self.inner.tokens.clear();
            self.notify_auth_failure(SESSION_EXPIRED_MESSAGE);
            return Err(original);
        };

        match self.inner.refresh.join() {
            RefreshTicket::Waiter(receiver) => match receiver.await.ok().flatten() {
                Some(token) => Ok(token),
                None => {
                    self.inner.tokens.clear();
                    Err(original)
                }
            },
            RefreshTicket::Leader(lease) => match self.refresh_access_token(refresh_token).await {
                Ok(token) => {
                    let replayed = lease.complete(Some(token.clone()));
                    log::debug!("Access token refreshed, {} queued request(s) resumed", replayed);
                    Ok(token)
                }
                Err(err) => {
                    self.inner.tokens.clear();
                    lease.complete(None);
                    log::warn!("Token refresh failed: {}", err);
                    self.notify_auth_failure(&err.to_string());
                    Err(err)
                }
            },
        }
    }

    /// Calls the refresh endpoint on the bare transport so the interceptors
    /// above never recurse into themselves.
    async fn refresh_access_token(&self, refresh_token: String) -> Result<String, ApiError> {
        let request = HttpRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh_token })?;
        let response = self
            .inner
            .transport
            .send(&request)
            .await
            .map_err(|e| ApiError::RefreshFailed {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            let message = match ApiError::from_response(&response) {
                ApiError::Server { status, .. } if status >= 500 => SESSION_EXPIRED_MESSAGE.to_string(),
                other => other.to_string(),
            };
            return Err(ApiError::RefreshFailed { message });
        }

        let body: RefreshResponse =
            Self::decode(&response).map_err(|e| ApiError::RefreshFailed {
                message: e.to_string(),
            })?;
        match &body.refresh_token {
            Some(rotated) => self.inner.tokens.set_tokens(&body.access_token, rotated),
            None => self.inner.tokens.set_access_token(&body.access_token),
        }
        Ok(body.access_token)
    }

    fn notify_auth_failure(&self, message: &str) {
        let handler = self.inner.on_auth_failure.borrow().clone();
        if let Some(handler) = handler {
            handler(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::ScriptedTransport;
    use crate::shared::storage::{KeyValueStorage, MemoryStorage};
    use crate::system::auth::token_store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;

    struct Fixture {
        transport: Rc<ScriptedTransport>,
        storage: MemoryStorage,
        client: ApiClient,
        failures: Rc<RefCell<Vec<String>>>,
    }

    fn fixture(access: Option<&str>, refresh: Option<&str>) -> Fixture {
        let storage = MemoryStorage::new();
        if let Some(token) = access {
            storage.set(ACCESS_TOKEN_KEY, token).unwrap();
        }
        if let Some(token) = refresh {
            storage.set(REFRESH_TOKEN_KEY, token).unwrap();
        }
        let transport = Rc::new(ScriptedTransport::new("fresh"));
        let tokens = TokenStore::init(Rc::new(storage.clone()));
        let client = ApiClient::new(transport.clone(), tokens);
        let failures = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&failures);
        client.on_auth_failure(move |message| sink.borrow_mut().push(message.to_string()));
        Fixture {
            transport,
            storage,
            client,
            failures,
        }
    }

    #[test]
    fn attaches_bearer_token() {
        let f = fixture(Some("fresh"), Some("r1"));
        let response = block_on(f.client.send(HttpRequest::get("/companies"))).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(f.transport.seen_bearers("/companies"), vec![Some("fresh".to_string())]);
        assert_eq!(f.transport.refresh_calls(), 0);
    }

    #[test]
    fn concurrent_401s_share_one_refresh() {
        let f = fixture(Some("stale"), Some("r1"));
        f.transport.hold_refresh();

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let completed = Rc::new(Cell::new(0));
        for i in 0..5 {
            let client = f.client.clone();
            let completed = Rc::clone(&completed);
            spawner
                .spawn_local(async move {
                    let response = client
                        .send(HttpRequest::get(format!("/companies/{}", i)))
                        .await
                        .unwrap();
                    assert_eq!(response.status, 200);
                    completed.set(completed.get() + 1);
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert_eq!(f.transport.refresh_calls(), 1);
        assert!(f.client.is_refreshing());
        assert_eq!(completed.get(), 0);

        f.transport.release_refresh();
        pool.run_until_stalled();

        assert_eq!(completed.get(), 5);
        assert_eq!(f.transport.refresh_calls(), 1);
        assert!(!f.client.is_refreshing());
        for i in 0..5 {
            assert_eq!(
                f.transport.seen_bearers(&format!("/companies/{}", i)),
                vec![Some("stale".to_string()), Some("fresh".to_string())]
            );
        }
        assert_eq!(f.storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("fresh"));
        assert!(f.failures.borrow().is_empty());
    }

    #[test]
    fn failed_refresh_fails_every_waiter_and_reports_once() {
        let f = fixture(Some("stale"), Some("revoked"));
        f.transport.hold_refresh();
        f.transport.reject_refresh(r#"{"message":"Refresh token revoked"}"#);

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let errors = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let client = f.client.clone();
            let errors = Rc::clone(&errors);
            spawner
                .spawn_local(async move {
                    let err = client
                        .send(HttpRequest::get(format!("/sites/{}", i)))
                        .await
                        .unwrap_err();
                    errors.borrow_mut().push(err);
                })
                .unwrap();
        }

        pool.run_until_stalled();
        f.transport.release_refresh();
        pool.run_until_stalled();

        assert_eq!(f.transport.refresh_calls(), 1);
        let errors = errors.borrow();
        assert_eq!(errors.len(), 3);
        let refresh_failures = errors
            .iter()
            .filter(|e| matches!(e, ApiError::RefreshFailed { .. }))
            .count();
        let unauthorized = errors
            .iter()
            .filter(|e| matches!(e, ApiError::Unauthorized { .. }))
            .count();
        // the leader reports the refresh error, waiters the original 401
        assert_eq!(refresh_failures, 1);
        assert_eq!(unauthorized, 2);
        assert_eq!(*f.failures.borrow(), vec!["Refresh token revoked".to_string()]);
        assert_eq!(f.storage.get(ACCESS_TOKEN_KEY), None);
        assert_eq!(f.storage.get(REFRESH_TOKEN_KEY), None);
    }

    /// `/slow` leaves with the stale token, `/fast` refreshes before `/slow`
    /// gets its 401 back.
    fn interleave_slow_401(f: &Fixture) -> Rc<RefCell<Option<Result<HttpResponse, ApiError>>>> {
        f.transport.hold_route("/slow");
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let slow = Rc::new(RefCell::new(None));

        let client = f.client.clone();
        let slot = Rc::clone(&slow);
        spawner
            .spawn_local(async move {
                *slot.borrow_mut() = Some(client.send(HttpRequest::get("/slow")).await);
            })
            .unwrap();
        let client = f.client.clone();
        spawner
            .spawn_local(async move {
                let _ = client.send(HttpRequest::get("/fast")).await;
            })
            .unwrap();

        pool.run_until_stalled();
        assert!(slow.borrow().is_none());
        assert_eq!(f.transport.refresh_calls(), 1);

        f.transport.release_route("/slow");
        pool.run_until_stalled();
        slow
    }

    #[test]
    fn late_401_after_a_finished_refresh_replays_with_the_new_token() {
        let f = fixture(Some("stale"), Some("r1"));
        let slow = interleave_slow_401(&f);

        let response = slow.borrow_mut().take().unwrap().unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(f.transport.refresh_calls(), 1);
        assert_eq!(
            f.transport.seen_bearers("/slow"),
            vec![Some("stale".to_string()), Some("fresh".to_string())]
        );
        assert!(f.failures.borrow().is_empty());
    }

    #[test]
    fn late_401_after_a_failed_refresh_reports_the_failure_once() {
        let f = fixture(Some("stale"), Some("revoked"));
        f.transport.reject_refresh(r#"{"message":"Refresh token revoked"}"#);
        let slow = interleave_slow_401(&f);

        let err = slow.borrow_mut().take().unwrap().unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(f.transport.refresh_calls(), 1);
        assert_eq!(f.transport.seen_bearers("/slow").len(), 1);
        assert_eq!(*f.failures.borrow(), vec!["Refresh token revoked".to_string()]);
    }

    #[test]
    fn missing_refresh_token_fails_without_calling_refresh() {
        let f = fixture(Some("stale"), None);
        let err = block_on(f.client.send(HttpRequest::get("/companies"))).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(f.transport.refresh_calls(), 0);
        assert_eq!(f.client.tokens().access_token(), None);
        assert_eq!(*f.failures.borrow(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
    }

    #[test]
    fn retried_request_never_refreshes_again() {
        let f = fixture(Some("stale"), Some("r1"));
        f.transport.always_unauthorized("/companies");

        let err = block_on(f.client.send(HttpRequest::get("/companies"))).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(f.transport.refresh_calls(), 1);
        assert_eq!(f.transport.seen_bearers("/companies").len(), 2);

        let mut already_retried = HttpRequest::get("/companies");
        already_retried.retried = true;
        let err = block_on(f.client.send(already_retried)).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(f.transport.refresh_calls(), 1);
        assert!(f.failures.borrow().is_empty());
    }

    #[test]
    fn rotated_refresh_token_is_stored() {
        let f = fixture(Some("stale"), Some("r1"));
        f.transport.rotate_refresh_token("r2");
        block_on(f.client.send(HttpRequest::get("/companies"))).unwrap();
        assert_eq!(f.storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("r2"));
        assert_eq!(f.transport.last_refresh_body().as_deref(), Some(r#"{"refreshToken":"r1"}"#));
    }

    #[test]
    fn anonymous_requests_skip_the_interceptors() {
        let f = fixture(Some("stale"), Some("r1"));
        let err = block_on(f.client.send_anonymous(HttpRequest::post("/auth/login"))).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(f.transport.seen_bearers("/auth/login"), vec![None]);
        assert_eq!(f.transport.refresh_calls(), 0);
        assert_eq!(f.client.tokens().access_token().as_deref(), Some("stale"));
    }
}
