use axum::{
    Json, Router,
    extract::{OriginalUri, State},
    routing::get,
};
use platform_api::ApiResult;
use products_hr::EmployeeDto;

use super::{
    AppState,
    error::reject,
    extract::{ApiJson, ApiPath},
};

pub const DELETED_MESSAGE: &str = "Employee deleted successfully!";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

async fn create_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(dto): ApiJson<EmployeeDto>,
) -> ApiResult<Json<EmployeeDto>> {
    let created = state
        .employees
        .create_employee(dto)
        .await
        .map_err(|err| reject(err, &uri))?;
    Ok(Json(created))
}

async fn get_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<EmployeeDto>> {
    let found = state
        .employees
        .get_an_employee(id)
        .await
        .map_err(|err| reject(err, &uri))?;
    Ok(Json(found))
}

async fn update_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<EmployeeDto>,
) -> ApiResult<Json<EmployeeDto>> {
    let updated = state
        .employees
        .update_an_employee(id, dto)
        .await
        .map_err(|err| reject(err, &uri))?;
    Ok(Json(updated))
}

async fn delete_employee(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<&'static str> {
    state
        .employees
        .delete_an_employee_by_id(id)
        .await
        .map_err(|err| reject(err, &uri))?;
    Ok(DELETED_MESSAGE)
}

async fn list_employees(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<EmployeeDto>>> {
    let employees = state
        .employees
        .get_all_employees()
        .await
        .map_err(|err| reject(err, &uri))?;
    Ok(Json(employees))
}
