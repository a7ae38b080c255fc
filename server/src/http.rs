use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{FromRef, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use products_hr::{HrError, Repository, Session};
use serde::{Deserialize, Serialize};
use time::Duration as TimeDuration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    graphql::{SchemaType, SharedHr},
};

const SESSION_COOKIE: &str = "__Host-sd_session";

#[derive(Clone)]
pub struct AppState {
    pub hr: SharedHr,
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "staffdesk server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    let cors = CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin);
    // Credentials cannot be combined with a wildcard origin.
    if origins.is_empty() {
        cors
    } else {
        cors.allow_credentials(true)
    }
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/graphql", post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    employee_id: String,
}

async fn login_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(body): Json<LoginRequest>,
) -> HttpResult<(PrivateCookieJar, Json<Session>)> {
    let session = state
        .hr
        .read()
        .await
        .login(&body.employee_id)
        .map_err(HttpError::from)?;
    let cookie = Cookie::build((SESSION_COOKIE, session.employee_id.clone()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::days(state.config.session_ttl_days))
        .build();
    Ok((jar.add(cookie), Json(session)))
}

async fn logout_handler(jar: PrivateCookieJar) -> (PrivateCookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, StatusCode::NO_CONTENT)
}

async fn graphql_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    request: GraphQLRequest,
) -> HttpResult<GraphQLResponse> {
    let session = load_session(&state, &jar).await?;
    let req = request.into_inner().data(session);
    let response = state.schema.execute(req).await;
    Ok(GraphQLResponse::from(response))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let employees = state.hr.read().await.repository().employees().len();
    Json(HealthResponse {
        ok: employees > 0,
        employees,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    employees: usize,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

/// Re-resolves the cookie's employee so role changes apply on the next request.
async fn load_session(state: &AppState, jar: &PrivateCookieJar) -> HttpResult<Session> {
    let cookie = jar
        .get(SESSION_COOKIE)
        .ok_or_else(|| HttpError::new(StatusCode::UNAUTHORIZED, "missing session"))?;
    state
        .hr
        .read()
        .await
        .session(cookie.value())
        .map_err(HttpError::from)
}

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }
}

impl From<HrError> for HttpError {
    fn from(err: HrError) -> Self {
        let status = match err {
            HrError::UnknownEmployee(_) => StatusCode::UNAUTHORIZED,
            HrError::NotFound { .. } => StatusCode::NOT_FOUND,
            HrError::Forbidden(_) => StatusCode::FORBIDDEN,
            HrError::InvalidInput(_) | HrError::NoAttendanceToday => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
