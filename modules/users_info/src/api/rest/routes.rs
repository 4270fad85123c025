use std::sync::Arc;

use axum::{
    routing::get,
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
    ),
    components(schemas(
        dto::UserDto,
        dto::UserListDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        problem::Problem,
    )),
    tags((name = "users", description = "User records"))
)]
pub struct UsersApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(UsersApiDoc::openapi())
}

/// JSON API under `/api`.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/api/openapi.json", get(openapi_json))
        .layer(Extension(service))
}
