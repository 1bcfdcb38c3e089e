//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{LineId, StationId};
use crate::service::{EditRequest, ErrorKind, ServiceError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations).post(create_station))
        .route("/stations/:id", delete(delete_station))
        .route("/lines", get(list_lines).post(create_line))
        .route(
            "/lines/:id",
            get(find_line).put(update_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(add_section).delete(remove_section),
        )
        .route("/paths", get(find_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<CreateStationRequest>,
) -> Result<(StatusCode, Json<StationResponse>), AppError> {
    let station = state.service.create_station(&req.name)?;
    Ok((StatusCode::CREATED, Json(StationResponse::from(&station))))
}

async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let stations = state.service.list_stations()?;
    Ok(Json(stations.iter().map(StationResponse::from).collect()))
}

async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_station(StationId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_line(
    State(state): State<AppState>,
    Json(req): Json<CreateLineRequest>,
) -> Result<(StatusCode, Json<LineResponse>), AppError> {
    let map = state.service.create_line(req.into())?;
    Ok((StatusCode::CREATED, Json(LineResponse::from(&map))))
}

async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let lines = state.service.list_lines()?;
    Ok(Json(lines.iter().map(LineResponse::from).collect()))
}

async fn find_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<LineResponse>, AppError> {
    let map = state.service.find_line(LineId(id))?;
    Ok(Json(LineResponse::from(&map)))
}

async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateLineRequest>,
) -> Result<Json<LineResponse>, AppError> {
    state.service.update_line(LineId(id), req.into())?;
    let map = state.service.find_line(LineId(id))?;
    Ok(Json(LineResponse::from(&map)))
}

async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_line(LineId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Insert a section, extending or splitting the line.
async fn add_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SectionRequest>,
) -> Result<Json<DiffResponse>, AppError> {
    let diff = state.service.edit_topology(LineId(id), req.into())?;
    Ok(Json(DiffResponse::from(&diff)))
}

/// Remove a station from a line, merging its neighbouring sections.
async fn remove_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<RemoveSectionQuery>,
) -> Result<Json<DiffResponse>, AppError> {
    let request = EditRequest::Delete {
        station_id: StationId(query.station_id),
    };
    let diff = state.service.edit_topology(LineId(id), request)?;
    Ok(Json(DiffResponse::from(&diff)))
}

/// Shortest path between two stations, priced for the rider's age.
async fn find_path(
    State(state): State<AppState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<PathResponse>, AppError> {
    let summary = state.service.compute_shortest_path(
        StationId(query.source),
        StationId(query.target),
        query.age,
    )?;
    Ok(Json(PathResponse::from(summary)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e.kind() {
            ErrorKind::NotFound => AppError::NotFound { message },
            ErrorKind::Invalid => AppError::BadRequest { message },
            ErrorKind::Conflict => AppError::Conflict { message },
            ErrorKind::Internal => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::DomainError;
    use crate::service::fixtures::network;
    use crate::store::StoreError;

    fn app() -> Router {
        create_router(AppState::new(network()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    fn station_ids(value: &Value) -> Vec<u64> {
        value["stations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("ok".to_string()));
    }

    #[tokio::test]
    async fn path_is_priced() {
        let (status, body) = send(&app(), Method::GET, "/paths?source=2&target=3&age=30", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(station_ids(&body), vec![2, 4, 5, 3]);
        assert_eq!(body["distance"], 10);
        assert_eq!(body["fare"], 2150);
    }

    #[tokio::test]
    async fn path_errors_map_to_statuses() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/paths?source=2&target=2&age=30", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("same station"));

        let (status, _) = send(&app, Method::GET, "/paths?source=2&target=99&age=30", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/paths?source=2&target=3&age=200", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn station_lifecycle() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/stations", Some(json!({"name": "Jamsil"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Jamsil");
        let id = body["id"].as_u64().unwrap();

        let (status, _) = send(&app, Method::POST, "/stations", Some(json!({"name": "Jamsil"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/stations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 7);

        let (status, _) = send(&app, Method::DELETE, "/stations/4", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::DELETE, &format!("/stations/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn line_lifecycle() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/lines",
            Some(json!({
                "name": "Line 4",
                "color": "sky",
                "up_station_id": 6,
                "down_station_id": 1,
                "distance": 7
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["extra_fare"], 0);
        assert_eq!(station_ids(&body), vec![6, 1]);
        let id = body["id"].as_u64().unwrap();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/lines/{id}"),
            Some(json!({"name": "Line 4", "color": "navy", "extra_fare": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["color"], "navy");
        assert_eq!(station_ids(&body), vec![6, 1]);

        let (status, body) = send(&app, Method::GET, "/lines", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);

        let (status, _) = send(&app, Method::DELETE, &format!("/lines/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/lines/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sections_split_and_merge() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/stations", Some(json!({"name": "Middle"}))).await;
        assert_eq!(status, StatusCode::CREATED);

        // Line 1 runs 1 -> 2 -> 3 -> 6; split 2 -> 3 (100) at station 7
        let (status, body) = send(
            &app,
            Method::POST,
            "/lines/1/sections",
            Some(json!({"up_station_id": 2, "down_station_id": 7, "distance": 40})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["removed"],
            json!([{"up_station_id": 2, "down_station_id": 3, "distance": 100}])
        );
        assert_eq!(body["added"].as_array().unwrap().len(), 2);

        let (_, line) = send(&app, Method::GET, "/lines/1", None).await;
        assert_eq!(station_ids(&line), vec![1, 2, 7, 3, 6]);

        let (status, body) = send(&app, Method::DELETE, "/lines/1/sections?station_id=7", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["added"],
            json!([{"up_station_id": 2, "down_station_id": 3, "distance": 100}])
        );
    }

    #[tokio::test]
    async fn rejected_sections() {
        let app = app();
        // Both stations already on line 1
        let (status, _) = send(
            &app,
            Method::POST,
            "/lines/1/sections",
            Some(json!({"up_station_id": 1, "down_station_id": 6, "distance": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Neither station on line 2
        let (status, _) = send(
            &app,
            Method::POST,
            "/lines/2/sections",
            Some(json!({"up_station_id": 1, "down_station_id": 6, "distance": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/lines/99/sections?station_id=1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_statuses() {
        let cases = [
            (
                ServiceError::from(StoreError::Conflict(LineId(1))),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::from(DomainError::DisconnectedTopology),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::from(DomainError::SingleSegmentRemoval),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::from(StoreError::StationNotFound(StationId(3))),
                StatusCode::NOT_FOUND,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(AppError::from(error).into_response().status(), status);
        }
    }
}
