//! End-to-end behaviour of the users module against a real temp directory:
//! JSON record store and image directory on disk, service, local client and
//! the JSON API router.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use common::Fixture;
use users_info::api::rest::dto::{UserDto, UserListDto};
use users_info::contract::error::UsersInfoError;
use users_info::contract::model::{ImageUpload, NewUser, UserPatch};

fn ana() -> NewUser {
    NewUser {
        name: "Ana".into(),
        age: "30".into(),
        city: "Lima".into(),
        image: None,
    }
}

fn png(name: &str) -> Option<ImageUpload> {
    Some(ImageUpload {
        bytes: b"\x89PNG fake".to_vec(),
        file_name: name.into(),
    })
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_without_image_persists_default_and_empty_history() {
    let fx = Fixture::new();
    let svc = fx.module.service();

    let created = svc.create_user(ana(), None).await.unwrap();
    let fetched = svc.get_user(&created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.image_path, "default-image.jpg");
    assert!(fetched.updated_at.is_empty());

    let doc = fx.read_store();
    assert_eq!(doc[0]["user_id"], created.id.as_str());
    assert_eq!(doc[0]["name"], "Ana");
    assert_eq!(doc[0]["img_path"], "default-image.jpg");
    assert_eq!(doc[0]["updated_at"], serde_json::json!([]));
}

#[tokio::test]
async fn updating_photo_never_deletes_default_image() {
    let fx = Fixture::new();
    let default_file = fx.install_default_image();
    let svc = fx.module.service();

    let user = svc.create_user(ana(), None).await.unwrap();
    let updated = svc
        .update_user(&user.id, UserPatch::default(), png("Me.PNG"))
        .await
        .unwrap();

    assert!(default_file.exists(), "shared default image must survive");
    assert_ne!(updated.image_path, "default-image.jpg");
    assert!(updated.image_path.ends_with(".png"));
    assert!(fx.image_file(&updated.image_path).exists());
    assert_eq!(updated.updated_at.len(), 1);
    assert_eq!(updated.created_at, user.created_at);
}

#[tokio::test]
async fn replacing_uploaded_photo_removes_the_old_file() {
    let fx = Fixture::new();
    let svc = fx.module.service();

    let user = svc.create_user(ana(), png("a.jpg")).await.unwrap();
    let old_file = fx.image_file(&user.image_path);
    assert!(old_file.exists());

    let updated = svc
        .update_user(&user.id, UserPatch::default(), png("b.jpg"))
        .await
        .unwrap();

    assert!(!old_file.exists());
    assert!(fx.image_file(&updated.image_path).exists());
}

#[tokio::test]
async fn repeated_updates_grow_history_and_keep_created_at() {
    let fx = Fixture::new();
    let svc = fx.module.service();
    let user = svc.create_user(ana(), None).await.unwrap();

    let mut last = user.clone();
    for i in 1..=3 {
        let patch = UserPatch {
            age: Some(format!("{}", 30 + i)),
            ..Default::default()
        };
        last = svc.update_user(&user.id, patch, None).await.unwrap();
        assert_eq!(last.updated_at.len(), i);
    }

    let reloaded = svc.get_user(&user.id).await.unwrap();
    assert_eq!(reloaded.age, "33");
    assert_eq!(reloaded.created_at, user.created_at);
    assert_eq!(reloaded.updated_at, last.updated_at);
    assert!(reloaded.updated_at.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn delete_removes_record_and_uploaded_image() {
    let fx = Fixture::new();
    let svc = fx.module.service();

    let user = svc.create_user(ana(), png("a.gif")).await.unwrap();
    let file = fx.image_file(&user.image_path);
    assert!(file.exists());

    svc.delete_user(&user.id).await.unwrap();

    assert!(svc.list_users().await.is_empty());
    assert!(!file.exists());
    assert_eq!(fx.read_store(), serde_json::json!([]));
}

#[tokio::test]
async fn delete_keeps_default_image() {
    let fx = Fixture::new();
    let default_file = fx.install_default_image();
    let svc = fx.module.service();

    let user = svc.create_user(ana(), None).await.unwrap();
    svc.delete_user(&user.id).await.unwrap();

    assert!(default_file.exists());
}

#[tokio::test]
async fn delete_of_unknown_id_leaves_store_untouched() {
    let fx = Fixture::new();
    let svc = fx.module.service();
    svc.create_user(ana(), None).await.unwrap();
    let before = std::fs::read(fx.module.data_file()).unwrap();

    let err = svc.delete_user("does-not-exist").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(std::fs::read(fx.module.data_file()).unwrap(), before);
}

#[tokio::test]
async fn external_image_path_is_stored_verbatim() {
    let fx = Fixture::new();
    let svc = fx.module.service();

    let user = svc
        .create_user(
            NewUser {
                image: Some("https://cdn.example.com/ana.jpg".into()),
                ..ana()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(user.image_path, "https://cdn.example.com/ana.jpg");

    // Deleting must not try to touch anything on disk for it.
    svc.delete_user(&user.id).await.unwrap();
}

#[tokio::test]
async fn list_is_newest_first() {
    let fx = Fixture::new();
    let svc = fx.module.service();

    let first = svc.create_user(ana(), None).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = svc
        .create_user(
            NewUser {
                name: "Bo".into(),
                ..ana()
            },
            None,
        )
        .await
        .unwrap();

    let ids: Vec<String> = svc.list_users().await.into_iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn legacy_document_is_readable_and_rewritten_consistently() {
    let fx = Fixture::new();
    std::fs::write(
        fx.module.data_file(),
        r#"[
  {
    "user_id": "1717171717171",
    "name": "Old",
    "age": "41",
    "city": "Quito",
    "img_path": "1717171717171.jpg",
    "created_at": "05/31/2024, 03:08:37 PM",
    "updated_at": ["06/01/2024, 09:00:00 AM"]
  }
]"#,
    )
    .unwrap();
    let svc = fx.module.service();

    let old = svc.get_user("1717171717171").await.unwrap();
    assert_eq!(old.image_path, "1717171717171.jpg");
    assert_eq!(old.updated_at.len(), 1);

    let updated = svc
        .update_user(
            &old.id,
            UserPatch {
                city: Some("Cuenca".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.created_at, old.created_at);
    assert_eq!(updated.updated_at.len(), 2);

    let doc = fx.read_store();
    assert_eq!(doc[0]["created_at"], "2024-05-31T15:08:37.000Z");
    assert_eq!(doc[0]["city"], "Cuenca");
}

#[tokio::test]
async fn corrupt_document_reads_empty_and_is_replaced_on_next_write() {
    let fx = Fixture::new();
    std::fs::write(fx.module.data_file(), "{ definitely not json").unwrap();
    let svc = fx.module.service();

    assert!(svc.list_users().await.is_empty());

    let user = svc.create_user(ana(), None).await.unwrap();
    let doc = fx.read_store();
    assert_eq!(doc.as_array().map(Vec::len), Some(1));
    assert_eq!(doc[0]["user_id"], user.id.as_str());
}

#[tokio::test]
async fn local_client_maps_errors_to_contract() {
    let fx = Fixture::new();
    let client = fx.module.client();

    let user = client.create_user(ana(), None).await.unwrap();
    assert_eq!(client.list_users().await.unwrap().len(), 1);
    assert_eq!(client.get_user(&user.id).await.unwrap().name, "Ana");

    let err = client.get_user("nope").await.unwrap_err();
    assert_eq!(err, UsersInfoError::not_found("nope"));

    let err = client
        .update_user("nope", UserPatch::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, UsersInfoError::NotFound { .. }));

    client.delete_user(&user.id).await.unwrap();
    assert!(client.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_api_crud_roundtrip() {
    let fx = Fixture::new();
    let app = fx.module.router().unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::post("/api/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Ana","age":"30","city":"Lima"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: UserDto = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(created.image_path, "default-image.jpg");
    assert!(created.updated_at.is_empty());

    let resp = app
        .clone()
        .oneshot(
            Request::put(format!("/api/users/{}", created.id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"city":"Cusco"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: UserDto = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(updated.city, "Cusco");
    assert_eq!(updated.name, "Ana");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.updated_at.len(), 1);

    let resp = app
        .clone()
        .oneshot(Request::get("/api/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: UserListDto = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(list.total, 1);

    let resp = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/users/{}", created.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(
            Request::get(format!("/api/users/{}", created.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let problem = body_json(resp).await;
    assert_eq!(problem["code"], "USERS_NOT_FOUND");
    assert_eq!(problem["status"], 404);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let fx = Fixture::new();
    let resp = fx
        .module
        .router()
        .unwrap()
        .oneshot(Request::get("/api/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert!(doc.pointer("/components/schemas/UserDto").is_some());
}

#[tokio::test]
async fn stored_images_are_served_statically() {
    let fx = Fixture::new();
    let user = fx
        .module
        .service()
        .create_user(ana(), png("face.png"))
        .await
        .unwrap();

    let resp = fx
        .module
        .router()
        .unwrap()
        .oneshot(
            Request::get(format!("/images/{}", user.image_path))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"\x89PNG fake");
}
