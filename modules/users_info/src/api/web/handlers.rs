use std::sync::Arc;

use axum::{
    extract::{Multipart, Path},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use tracing::{error, info, warn};

use crate::api::rest::error::{bad_upload, from_parts, map_domain_error};
use crate::api::rest::problem::ProblemResponse;
use crate::api::web::form::UserForm;
use crate::api::web::views::Views;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Shared state of the HTML pages.
pub struct WebState {
    pub service: Arc<Service>,
    pub views: Views,
}

/// Multipart file field of the add-user form.
pub const ADD_UPLOAD_FIELD: &str = "uploadImage";
/// Multipart file field of the edit-user form.
pub const EDIT_UPLOAD_FIELD: &str = "image";

fn render_failed(e: minijinja::Error, instance: &str) -> ProblemResponse {
    error!(error = %e, "Template rendering failed");
    from_parts(
        StatusCode::INTERNAL_SERVER_ERROR,
        "USERS_RENDER",
        "Internal error",
        "The page could not be rendered",
        instance,
    )
}

/// `UserNotFound` becomes a 404 page; everything else a problem response.
fn failure(state: &WebState, e: DomainError, instance: &str) -> Response {
    match &e {
        DomainError::UserNotFound { id } => {
            info!(user_id = %id, "User not found");
            match state.views.not_found(id) {
                Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
                Err(render) => render_failed(render, instance).into_response(),
            }
        }
        _ => map_domain_error(&e, instance).into_response(),
    }
}

async fn read_form(multipart: Multipart, file_field: &str, instance: &str) -> Result<UserForm, Response> {
    UserForm::read(multipart, file_field).await.map_err(|e| {
        warn!(error = %e, "Rejected multipart body");
        bad_upload(e.status(), e.body_text(), instance).into_response()
    })
}

pub async fn all_users(Extension(state): Extension<Arc<WebState>>, uri: Uri) -> Response {
    let users = state.service.list_users().await;
    match state.views.all_users(&users) {
        Ok(page) => Html(page).into_response(),
        Err(e) => render_failed(e, uri.path()).into_response(),
    }
}

pub async fn add_user_form(Extension(state): Extension<Arc<WebState>>, uri: Uri) -> Response {
    match state.views.add_user() {
        Ok(page) => Html(page).into_response(),
        Err(e) => render_failed(e, uri.path()).into_response(),
    }
}

pub async fn add_user(
    Extension(state): Extension<Arc<WebState>>,
    uri: Uri,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart, ADD_UPLOAD_FIELD, uri.path()).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let new_user = form.to_new_user();
    match state.service.create_user(new_user, form.upload).await {
        Ok(user) => {
            info!(user_id = %user.id, "User added via form");
            Redirect::to("/").into_response()
        }
        Err(e) => failure(&state, e, uri.path()),
    }
}

pub async fn user_details(
    Extension(state): Extension<Arc<WebState>>,
    Path(user_id): Path<String>,
    uri: Uri,
) -> Response {
    match state.service.get_user(&user_id).await {
        Ok(user) => match state.views.user(&user) {
            Ok(page) => Html(page).into_response(),
            Err(e) => render_failed(e, uri.path()).into_response(),
        },
        Err(e) => failure(&state, e, uri.path()),
    }
}

pub async fn edit_user_form(
    Extension(state): Extension<Arc<WebState>>,
    Path(user_id): Path<String>,
    uri: Uri,
) -> Response {
    match state.service.get_user(&user_id).await {
        Ok(user) => match state.views.update_user(&user) {
            Ok(page) => Html(page).into_response(),
            Err(e) => render_failed(e, uri.path()).into_response(),
        },
        Err(e) => failure(&state, e, uri.path()),
    }
}

pub async fn edit_user(
    Extension(state): Extension<Arc<WebState>>,
    Path(user_id): Path<String>,
    uri: Uri,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart, EDIT_UPLOAD_FIELD, uri.path()).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };

    let patch = form.to_patch();
    match state.service.update_user(&user_id, patch, form.upload).await {
        Ok(user) => Redirect::to(&format!("/user/{}", user.id)).into_response(),
        Err(e) => failure(&state, e, uri.path()),
    }
}

pub async fn delete_user(
    Extension(state): Extension<Arc<WebState>>,
    Path(user_id): Path<String>,
    uri: Uri,
) -> Response {
    match state.service.delete_user(&user_id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => failure(&state, e, uri.path()),
    }
}
