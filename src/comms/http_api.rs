use anyhow::{Context, Result};
use axum::{
    extract::rejection::JsonRejection,
    extract::{DefaultBodyLimit, FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::directory::error::{CAUSE_SIGNUP_REQUIRED, CAUSE_UPDATE_REQUIRED};
use crate::directory::{
    AccountDirectory, AccountPatch, AccountProfile, CreatedAccount, DirectoryError, Operation,
    SignupRequest, UpdatedProfile,
};
use crate::security::audit_log::AuditLogger;
use crate::security::auth::AuthenticatedUser;

pub type SharedState = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub directory: AccountDirectory,
    pub config: Arc<Config>,
    pub audit: AuditLogger,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_directory(config, AccountDirectory::new())
    }

    pub fn with_directory(config: Arc<Config>, directory: AccountDirectory) -> Self {
        Self {
            directory,
            config,
            audit: AuditLogger::new(),
        }
    }
}

impl FromRef<SharedState> for AccountDirectory {
    fn from_ref(state: &SharedState) -> Self {
        state.directory.clone()
    }
}

impl FromRef<SharedState> for AuditLogger {
    fn from_ref(state: &SharedState) -> Self {
        state.audit.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserResponse<T> {
    pub message: &'static str,
    pub user: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<&'static str>,
}

impl DirectoryError {
    pub fn status(&self) -> StatusCode {
        match self {
            DirectoryError::Validation { .. } | DirectoryError::DuplicateUser => {
                StatusCode::BAD_REQUEST
            }
            DirectoryError::AuthFailure => StatusCode::UNAUTHORIZED,
            DirectoryError::NotFound => StatusCode::NOT_FOUND,
            DirectoryError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.message(),
            cause: self.cause(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Handler error: a directory failure, or a body the server refused to buffer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("request body too large")]
    PayloadTooLarge,
}

impl ApiError {
    /// Unreadable or mistyped JSON counts as missing input for the operation.
    fn from_body(op: Operation, rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        debug!(error = %rejection.body_text(), "rejected request body");
        let cause = match op {
            Operation::Signup => CAUSE_SIGNUP_REQUIRED,
            Operation::Update => CAUSE_UPDATE_REQUIRED,
        };
        ApiError::Directory(DirectoryError::Validation { op, cause })
    }

    /// Rule violated, as recorded in the audit log.
    pub fn cause(&self) -> &'static str {
        match self {
            ApiError::Directory(e) => e.cause().unwrap_or_else(|| e.message()),
            ApiError::PayloadTooLarge => "Request body too large",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Directory(e) => e.into_response(),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({"message": "Request body too large"})),
            )
                .into_response(),
        }
    }
}

// Health check
async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn signup(
    State(state): State<SharedState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<UserResponse<CreatedAccount>>, ApiError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let err = ApiError::from_body(Operation::Signup, rejection);
            state.audit.signup_rejected(None, err.cause());
            return Err(err);
        }
    };

    let requested = req.user_id.clone();
    let created = match state.directory.validator().validate_signup(req) {
        Ok(new) => state.directory.signup(new).await,
        Err(e) => Err(e),
    };

    match created {
        Ok(user) => {
            state.audit.account_created(&user.user_id);
            Ok(Json(UserResponse {
                message: "Account successfully created",
                user,
            }))
        }
        Err(e) => {
            state
                .audit
                .signup_rejected(requested.as_deref(), e.cause().unwrap_or_default());
            Err(e.into())
        }
    }
}

async fn get_user(
    State(state): State<SharedState>,
    _caller: AuthenticatedUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse<AccountProfile>>, ApiError> {
    let user = state.directory.get(&user_id).await?;
    Ok(Json(UserResponse {
        message: "User details by user_id",
        user,
    }))
}

async fn update_user(
    State(state): State<SharedState>,
    caller: AuthenticatedUser,
    Path(user_id): Path<String>,
    body: Result<Json<AccountPatch>, JsonRejection>,
) -> Result<Json<UserResponse<UpdatedProfile>>, ApiError> {
    // Body shape is rejected before the target is looked up.
    let Json(patch) = body.map_err(|rejection| ApiError::from_body(Operation::Update, rejection))?;

    match state.directory.update(caller.user_id(), &user_id, &patch).await {
        Ok(user) => {
            state.audit.account_updated(&user_id);
            Ok(Json(UserResponse {
                message: "User successfully updated",
                user,
            }))
        }
        Err(DirectoryError::Forbidden) => {
            state.audit.permission_denied(caller.user_id(), &user_id);
            Err(DirectoryError::Forbidden.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn close_account(
    State(state): State<SharedState>,
    caller: AuthenticatedUser,
) -> Json<MessageResponse> {
    let existed = state.directory.close(caller.user_id()).await;
    state.audit.account_closed(caller.user_id(), existed);
    Json(MessageResponse {
        message: "Account and user successfully deleted",
    })
}

pub fn create_router(state: SharedState) -> Router {
    let body_limit = state.config.body_limit_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup))
        .route("/users/{user_id}", get(get_user).patch(update_user))
        .route("/close", post(close_account))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping HTTP server");
}

pub async fn serve(config: Config) -> Result<()> {
    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::new(Arc::new(config)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}
