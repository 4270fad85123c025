use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};

use crate::api::web::handlers::{self, WebState};

/// HTML pages and form endpoints.
pub fn register_routes(router: Router, state: Arc<WebState>, max_upload_bytes: usize) -> Router {
    router
        .route("/", get(handlers::all_users))
        .route(
            "/addUser",
            get(handlers::add_user_form).post(handlers::add_user),
        )
        .route("/user/{user_id}", get(handlers::user_details))
        .route(
            "/editUser/{user_id}",
            get(handlers::edit_user_form).post(handlers::edit_user),
        )
        .route("/deleteUser/{user_id}", post(handlers::delete_user))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(Extension(state))
}
