use contracts::system::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, SessionInfo,
};

use crate::shared::http::{ApiClient, ApiError, HttpRequest};

/// Login with email and password
pub async fn login(client: &ApiClient, email: String, password: String) -> Result<LoginResponse, ApiError> {
    let request = HttpRequest::post("/auth/login").json(&LoginRequest { email, password })?;
    let response = client.send_anonymous(request).await?;
    ApiClient::decode(&response)
}

/// Create an account (and its company) and sign in
pub async fn register(client: &ApiClient, dto: &RegisterRequest) -> Result<LoginResponse, ApiError> {
    let request = HttpRequest::post("/auth/register").json(dto)?;
    let response = client.send_anonymous(request).await?;
    ApiClient::decode(&response)
}

/// Logout (revoke refresh token)
pub async fn logout(client: &ApiClient, refresh_token: String) -> Result<(), ApiError> {
    let request = HttpRequest::post("/auth/logout").json(&RefreshRequest { refresh_token })?;
    client.send_anonymous(request).await.map(|_| ())
}

pub async fn forgot_password(client: &ApiClient, email: String) -> Result<(), ApiError> {
    let request = HttpRequest::post("/auth/forgot").json(&ForgotPasswordRequest { email })?;
    client.send_anonymous(request).await.map(|_| ())
}

pub async fn reset_password(client: &ApiClient, token: String, password: String) -> Result<(), ApiError> {
    let request = HttpRequest::post("/auth/reset").json(&ResetPasswordRequest { token, password })?;
    client.send_anonymous(request).await.map(|_| ())
}

/// Lightweight authenticated request used to validate a restored session
pub async fn current_session(client: &ApiClient) -> Result<SessionInfo, ApiError> {
    client.get_json("/auth/me").await
}
