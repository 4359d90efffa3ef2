//! HTTP surface of the server.
//!
//! This module routes:
//! - POST /graphql - GraphQL queries and mutations
//! - GET /graphql - GraphiQL playground
//! - POST /login - Exchange credentials for an access token
//! - GET /health - Health check

use async_graphql::http::GraphiQLSource;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    errors: Vec<ErrorMessage>,
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    message: String,
}

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

fn full<T: Into<Bytes>>(chunk: T) -> BoxBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<BoxBody> {
    let mut response = Response::new(full(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<BoxBody> {
    match serde_json::to_vec(data) {
        Ok(body) => respond(status, "application/json", body),
        Err(e) => {
            warn!("Failed to serialize response: {}", e);
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "application/json",
                r#"{"errors":[{"message":"Internal server error"}]}"#,
            )
        }
    }
}

/// Error body in the GraphQL response shape, so clients surface the message.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response<BoxBody> {
    json_response(
        status,
        &ErrorBody {
            errors: vec![ErrorMessage {
                message: message.into(),
            }],
        },
    )
}

fn preflight_response() -> Response<BoxBody> {
    let mut response = respond(StatusCode::NO_CONTENT, "text/plain", "");
    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

async fn handle_graphql(
    authorization: Option<&str>,
    body_bytes: Bytes,
    state: &AppState,
) -> Response<BoxBody> {
    let user = match state.tokens.authenticate(authorization, &state.store).await {
        Ok(user) => user,
        Err(e) => {
            debug!("Rejected credentials: {}", e);
            return error_response(StatusCode::UNAUTHORIZED, e.to_string());
        }
    };

    let mut request: async_graphql::Request = match serde_json::from_slice(&body_bytes) {
        Ok(req) => req,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e));
        }
    };

    debug!(
        operation = request.operation_name.as_deref().unwrap_or("<anonymous>"),
        authenticated = user.is_some(),
        "Executing query: {}",
        request.query.chars().take(100).collect::<String>()
    );

    if let Some(user) = user {
        request = request.data(user);
    }

    let response = state.schema.execute(request).await;
    json_response(StatusCode::OK, &response)
}

async fn handle_login(body_bytes: Bytes, state: &AppState) -> Response<BoxBody> {
    let login: LoginRequest = match serde_json::from_slice(&body_bytes) {
        Ok(req) => req,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", e));
        }
    };

    let user = match state.store.users.find_by_email(&login.email).await {
        Some(user) if user.password_matches(&login.password) => user,
        _ => {
            info!(email = %login.email, "Login failed");
            return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
    };

    match state.tokens.issue(&user.id) {
        Ok(token) => {
            info!(user_id = %user.id.0, "Login succeeded");
            json_response(StatusCode::OK, &LoginResponse { token })
        }
        Err(e) => {
            warn!("Failed to issue token: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token")
        }
    }
}

pub(crate) fn health_response() -> &'static str {
    r#"{"status":"healthy"}"#
}

async fn route(req: Request<Incoming>, state: &AppState) -> Response<BoxBody> {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();

    match (&parts.method, path) {
        (&Method::GET, "/health") => {
            respond(StatusCode::OK, "application/json", health_response())
        }

        (&Method::POST, ServerConfig::GRAPHQL_PATH) | (&Method::POST, ServerConfig::LOGIN_PATH) => {
            let body_bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read body: {}", e),
                    );
                }
            };

            if path == ServerConfig::LOGIN_PATH {
                return handle_login(body_bytes, state).await;
            }

            let authorization = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            handle_graphql(authorization, body_bytes, state).await
        }

        (&Method::GET, ServerConfig::GRAPHQL_PATH) if state.config.playground => respond(
            StatusCode::OK,
            "text/html; charset=utf-8",
            GraphiQLSource::build()
                .endpoint(ServerConfig::GRAPHQL_PATH)
                .finish(),
        ),

        (&Method::OPTIONS, ServerConfig::GRAPHQL_PATH)
        | (&Method::OPTIONS, ServerConfig::LOGIN_PATH) => preflight_response(),

        _ => respond(
            StatusCode::NOT_FOUND,
            "application/json",
            r#"{"error":"Not Found"}"#,
        ),
    }
}

/// Accepts connections until the listener fails, serving each on its own task.
pub(crate) async fn run_server(listener: TcpListener, state: Arc<AppState>) -> ServerResult<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
        if state.config.playground {
            info!("Playground: http://{}{}", addr, ServerConfig::GRAPHQL_PATH);
        }
    }

    loop {
        let (stream, peer) = listener.accept().await.map_err(ServerError::Accept)?;

        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let state = state.clone();
                async move { Ok::<_, Infallible>(route(req, &state).await) }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                if !err.is_incomplete_message() {
                    debug!("Connection error from {}: {:?}", peer, err);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_is_json() {
        let value: serde_json::Value = serde_json::from_str(health_response()).unwrap();
        assert_eq!(value["status"], "healthy");
    }

    #[test]
    fn test_error_response_shape() {
        let response = error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_preflight_allows_authorization_header() {
        let response = preflight_response();
        let allowed = response
            .headers()
            .get("Access-Control-Allow-Headers")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(allowed.contains("Authorization"));
    }
}
