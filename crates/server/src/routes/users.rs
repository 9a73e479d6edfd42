use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use models::user;
use service::user_record::domain::{CreateUserInput, UpdateUserInput, UserRoleView};
use service::user_record::repository::UserRecordRepository;
use service::UserRecordService;

use crate::errors::JsonApiError;
use crate::observability;

#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserRecordService<dyn UserRecordRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn UserRecordRepository>) -> Self {
        Self { users: Arc::new(UserRecordService::new(repo)) }
    }
}

#[utoipa::path(post, path = "/users", tag = "users", request_body = crate::openapi::CreateUserRequest, responses((status = 201, description = "Created", body = crate::openapi::UserRecordDoc), (status = 400, description = "Validation error or identifier already taken", body = crate::openapi::ErrorBody)))]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateUserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<user::Model>), JsonApiError> {
    let Json(input) = payload?;
    let result = state.users.create(input).await;
    observability::record("create", &result);
    Ok((StatusCode::CREATED, Json(result?)))
}

#[utoipa::path(get, path = "/users", tag = "users", responses((status = 200, description = "All records", body = [crate::openapi::UserRecordDoc])))]
pub async fn find_all(State(state): State<ServerState>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    let result = state.users.find_all().await;
    observability::record("find_all", &result);
    Ok(Json(result?))
}

#[utoipa::path(get, path = "/users/role/{role}", tag = "users", params(("role" = String, Path, description = "DISTRIBUTOR, MAKER or DEALER")), responses((status = 200, description = "Records of the role with their products", body = [crate::openapi::UserRoleViewDoc]), (status = 400, description = "Unknown role", body = crate::openapi::ErrorBody)))]
pub async fn find_all_by_role(
    State(state): State<ServerState>,
    role: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<UserRoleView>>, JsonApiError> {
    let Path(role) = role?;
    let result = state.users.find_all_by_role(&role).await;
    observability::record("find_all_by_role", &result);
    Ok(Json(result?))
}

#[utoipa::path(get, path = "/users/{id}", tag = "users", params(("id" = i32, Path, description = "Record id")), responses((status = 200, description = "Found", body = crate::openapi::UserRecordDoc), (status = 404, description = "Not found", body = crate::openapi::ErrorBody)))]
pub async fn find_one(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<user::Model>, JsonApiError> {
    let Path(id) = id?;
    let result = state.users.find_one(id).await;
    observability::record("find_one", &result);
    Ok(Json(result?))
}

#[utoipa::path(patch, path = "/users/{id}", tag = "users", params(("id" = i32, Path, description = "Record id")), request_body = crate::openapi::UpdateUserRequest, responses((status = 200, description = "Updated", body = crate::openapi::UserRecordDoc), (status = 400, description = "Validation error or identifier already taken", body = crate::openapi::ErrorBody), (status = 404, description = "Not found", body = crate::openapi::ErrorBody)))]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateUserInput>, JsonRejection>,
) -> Result<Json<user::Model>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let result = state.users.update(id, input).await;
    observability::record("update", &result);
    Ok(Json(result?))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "users", params(("id" = i32, Path, description = "Record id")), responses((status = 200, description = "Deleted record", body = crate::openapi::UserRecordDoc), (status = 404, description = "Not found", body = crate::openapi::ErrorBody)))]
pub async fn remove(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<user::Model>, JsonApiError> {
    let Path(id) = id?;
    let result = state.users.remove(id).await;
    observability::record("remove", &result);
    Ok(Json(result?))
}
