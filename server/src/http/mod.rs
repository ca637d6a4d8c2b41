mod employees;
mod error;
mod extract;

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue, Method, header},
    response::IntoResponse,
    routing::get,
};
use products_hr::EmployeeService;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;

const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub config: Arc<AppConfig>,
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

    info!(%config.addr, "ems server listening");
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
    CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .merge(employees::routes())
        .nest(API_PREFIX, employees::routes())
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.employees.ready().await;
    Json(HealthResponse {
        ok: store_ok,
        store_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    store_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use products_hr::InMemoryEmployeeStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router() -> Router {
        router_with(AppConfig::default())
    }

    fn router_with(config: AppConfig) -> Router {
        build_router(AppState {
            employees: EmployeeService::new(Arc::new(InMemoryEmployeeStore::new())),
            config: Arc::new(config),
        })
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(router, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ada() -> Value {
        json!({"fullName": "Ada Lovelace", "email": "ada@x.com"})
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let router = router();
        let (status, created) =
            send_json(&router, json_request(Method::POST, "/employees", ada())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            created,
            json!({"id": 1, "fullName": "Ada Lovelace", "email": "ada@x.com"})
        );

        let (status, found) = send_json(&router, empty_request(Method::GET, "/employees/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let router = router();
        send(&router, json_request(Method::POST, "/employees", ada())).await;
        let (status, body) =
            send_json(&router, json_request(Method::POST, "/employees", ada())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], 409);
        assert_eq!(body["message"], "ada@x.com is already exists!");
        assert_eq!(body["details"], "uri=/employees");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let router = router();
        let (status, body) =
            send_json(&router, empty_request(Method::GET, "/employees/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No Employee found with given id: 999");
        assert_eq!(body["details"], "uri=/employees/999");

        let (status, _) = send_json(
            &router,
            json_request(Method::PUT, "/employees/999", ada()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_keeps_the_path_id() {
        let router = router();
        send(&router, json_request(Method::POST, "/employees", ada())).await;
        let (status, updated) = send_json(
            &router,
            json_request(
                Method::PUT,
                "/employees/1",
                json!({"id": 5, "fullName": "A. Lovelace", "email": "new@x.com"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            updated,
            json!({"id": 1, "fullName": "A. Lovelace", "email": "new@x.com"})
        );
    }

    #[tokio::test]
    async fn delete_confirms_even_for_absent_ids() {
        let router = router();
        send(&router, json_request(Method::POST, "/employees", ada())).await;
        for uri in ["/employees/1", "/employees/1", "/employees/42"] {
            let (status, body) = send(&router, empty_request(Method::DELETE, uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, employees::DELETED_MESSAGE.as_bytes());
        }
        let (_, list) = send_json(&router, empty_request(Method::GET, "/employees")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn list_returns_every_employee_in_id_order() {
        let router = router();
        let (_, empty) = send_json(&router, empty_request(Method::GET, "/employees")).await;
        assert_eq!(empty, json!([]));

        send(&router, json_request(Method::POST, "/employees", ada())).await;
        send(
            &router,
            json_request(
                Method::POST,
                "/employees",
                json!({"fullName": "Grace Hopper", "email": "grace@x.com"}),
            ),
        )
        .await;

        let (status, list) = send_json(&router, empty_request(Method::GET, "/employees")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            list,
            json!([
                {"id": 1, "fullName": "Ada Lovelace", "email": "ada@x.com"},
                {"id": 2, "fullName": "Grace Hopper", "email": "grace@x.com"},
            ])
        );
    }

    #[tokio::test]
    async fn versioned_prefix_serves_the_same_routes() {
        let router = router();
        let (status, created) =
            send_json(&router, json_request(Method::POST, "/api/v1/employees", ada())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, found) = send_json(&router, empty_request(Method::GET, "/employees/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, created);

        let (status, body) =
            send_json(&router, empty_request(Method::GET, "/api/v1/employees/9")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"], "uri=/api/v1/employees/9");
    }

    #[tokio::test]
    async fn health_reports_store_and_version() {
        let router = router();
        let (status, body) = send_json(&router, empty_request(Method::GET, "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["store_ok"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn any_origin_is_allowed_by_default() {
        let router = router();
        let request = Request::builder()
            .uri("/employees")
            .header(header::ORIGIN, "https://somewhere.example")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn configured_origins_are_echoed() {
        let router = router_with(AppConfig {
            cors_allowed_origins: vec!["https://ems.example.com".into()],
        });
        let request = Request::builder()
            .uri("/employees")
            .header(header::ORIGIN, "https://ems.example.com")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://ems.example.com"
        );
    }

    fn raw_request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn assert_enveloped_failure(status: StatusCode, body: &Value, uri: &str) {
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert_eq!(body["error"], "INTERNAL");
        assert_eq!(body["details"], format!("uri={uri}"));
        assert!(body["timestamp"].is_string());
        assert!(!body["message"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_gets_the_error_envelope() {
        let router = router();
        let (status, body) = send_json(
            &router,
            raw_request(Method::POST, "/employees", "{fullName: oops"),
        )
        .await;
        assert_enveloped_failure(status, &body, "/employees");

        let (_, list) = send_json(&router, empty_request(Method::GET, "/employees")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn body_missing_a_field_gets_the_error_envelope() {
        let router = router();
        let (status, body) = send_json(
            &router,
            json_request(Method::POST, "/employees", json!({"email": "ada@x.com"})),
        )
        .await;
        assert_enveloped_failure(status, &body, "/employees");
        assert!(body["message"].as_str().unwrap().contains("fullName"));
    }

    #[tokio::test]
    async fn non_integer_id_gets_the_error_envelope() {
        let router = router();
        let (status, body) =
            send_json(&router, empty_request(Method::GET, "/employees/abc")).await;
        assert_enveloped_failure(status, &body, "/employees/abc");

        let (status, body) = send_json(
            &router,
            json_request(Method::PUT, "/api/v1/employees/abc", ada()),
        )
        .await;
        assert_enveloped_failure(status, &body, "/api/v1/employees/abc");

        let (status, body) =
            send_json(&router, empty_request(Method::DELETE, "/employees/1.5")).await;
        assert_enveloped_failure(status, &body, "/employees/1.5");
    }
}
