mod mock_backend;

use std::io::Cursor;
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use mock_backend::MockBackend;
use serde_json::json;
use sharedvisions_db::models::group::NewGroup;
use sharedvisions_db::models::user_photo::UserPhoto;
use sharedvisions_db::StorageError;
use sharedvisions_events::types::{APP_ERROR, PHOTO_PRIMARY_CHANGED};
use sharedvisions_events::EventBus;
use sharedvisions_pipeline::{AuthError, AuthService, GroupService, PipelineError, ProfileService};
use uuid::Uuid;

const USER: Uuid = Uuid::from_u128(7);
const GROUP: Uuid = Uuid::from_u128(70);

fn group_row(code: &str) -> serde_json::Value {
    json!({ "id": GROUP, "name": "Us", "invite_code": code, "created_by": Uuid::from_u128(1) })
}

fn member_row(user: Uuid, role: &str) -> serde_json::Value {
    json!({ "id": Uuid::new_v4(), "group_id": GROUP, "user_id": user, "role": role })
}

async fn groups(mock: &MockBackend) -> (GroupService, Arc<EventBus>) {
    let client = Arc::new(mock.spawn().await);
    let bus = Arc::new(EventBus::default());
    (GroupService::new(client, Arc::clone(&bus)), bus)
}

fn png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

// ---- groups ----

#[tokio::test]
async fn join_normalizes_the_code_and_adds_a_member() {
    let mock = MockBackend::default();
    mock.respond(Method::GET, "/rest/v1/groups", StatusCode::OK, json!([group_row("ABCDEF")]));
    mock.respond(Method::GET, "/rest/v1/group_members", StatusCode::OK, json!([]));
    mock.respond(
        Method::POST,
        "/rest/v1/group_members",
        StatusCode::CREATED,
        json!([member_row(USER, "member")]),
    );
    let (service, _bus) = groups(&mock).await;

    let group = service.join_group("  abcdef ", USER).await.unwrap();

    assert_eq!(group.id, GROUP);
    let lookup = &mock.hits_to(Method::GET, "/rest/v1/groups")[0];
    assert!(lookup.query.contains("invite_code=eq.ABCDEF"));
    let insert = &mock.hits_to(Method::POST, "/rest/v1/group_members")[0];
    let body: serde_json::Value = serde_json::from_str(&insert.body).unwrap();
    assert_eq!(body["role"], "member");
    assert_eq!(body["user_id"], USER.to_string());
}

#[tokio::test]
async fn malformed_code_fails_without_a_request() {
    let mock = MockBackend::default();
    let (service, bus) = groups(&mock).await;
    let mut rx = bus.subscribe();

    let result = service.join_group("nope", USER).await;

    assert_matches!(result, Err(PipelineError::InvalidInviteCode));
    assert!(mock.hits().is_empty());
    let event = rx.try_recv().unwrap();
    assert_eq!(event.event_type, APP_ERROR);
    assert_eq!(event.payload["message"], "Invalid invite code or group not found");
}

#[tokio::test]
async fn unknown_code_is_invalid() {
    let mock = MockBackend::default();
    mock.respond(Method::GET, "/rest/v1/groups", StatusCode::OK, json!([]));
    let (service, _bus) = groups(&mock).await;

    let result = service.join_group("ZZZZZZ", USER).await;

    assert_matches!(result, Err(PipelineError::InvalidInviteCode));
    assert!(mock.hits_to(Method::POST, "/rest/v1/group_members").is_empty());
}

#[tokio::test]
async fn existing_member_cannot_join_twice() {
    let mock = MockBackend::default();
    mock.respond(Method::GET, "/rest/v1/groups", StatusCode::OK, json!([group_row("ABCDEF")]));
    mock.respond(
        Method::GET,
        "/rest/v1/group_members",
        StatusCode::OK,
        json!([member_row(USER, "member")]),
    );
    let (service, _bus) = groups(&mock).await;

    let result = service.join_group("ABCDEF", USER).await;

    assert_matches!(result, Err(PipelineError::AlreadyMember));
    assert!(mock.hits_to(Method::POST, "/rest/v1/group_members").is_empty());
}

#[tokio::test]
async fn creator_becomes_owner_of_a_new_group() {
    let mock = MockBackend::default();
    mock.respond(Method::POST, "/rest/v1/groups", StatusCode::CREATED, json!([group_row("QWERTY")]));
    mock.respond(
        Method::POST,
        "/rest/v1/group_members",
        StatusCode::CREATED,
        json!([member_row(USER, "owner")]),
    );
    let (service, _bus) = groups(&mock).await;

    let group = service
        .create_group(NewGroup {
            name: "  Us  ".into(),
            created_by: USER,
        })
        .await
        .unwrap();

    assert_eq!(group.id, GROUP);
    let sent: serde_json::Value =
        serde_json::from_str(&mock.hits_to(Method::POST, "/rest/v1/groups")[0].body).unwrap();
    assert_eq!(sent["name"], "Us");
    assert_eq!(sent["invite_code"].as_str().unwrap().len(), 6);
    let member: serde_json::Value =
        serde_json::from_str(&mock.hits_to(Method::POST, "/rest/v1/group_members")[0].body).unwrap();
    assert_eq!(member["role"], "owner");
}

#[tokio::test]
async fn blank_group_name_is_rejected_locally() {
    let mock = MockBackend::default();
    let (service, _bus) = groups(&mock).await;

    let result = service
        .create_group(NewGroup {
            name: String::new(),
            created_by: USER,
        })
        .await;

    assert_matches!(result, Err(PipelineError::Core(_)));
    assert!(mock.hits().is_empty());
}

#[tokio::test]
async fn whitespace_group_name_is_rejected_locally() {
    let mock = MockBackend::default();
    let (service, _bus) = groups(&mock).await;

    let result = service
        .create_group(NewGroup {
            name: "   ".into(),
            created_by: USER,
        })
        .await;

    assert_matches!(result, Err(PipelineError::Core(_)));
    assert!(mock.hits().is_empty());
}

// ---- photos ----

#[tokio::test]
async fn primary_upload_reencodes_and_clears_other_primaries() {
    let mock = MockBackend::default();
    mock.respond(Method::POST, "/storage/v1/object/user-photos/", StatusCode::OK, json!({ "Key": "x" }));
    mock.respond(Method::PATCH, "/rest/v1/user_photos", StatusCode::OK, json!(null));
    mock.respond(
        Method::POST,
        "/rest/v1/user_photos",
        StatusCode::CREATED,
        json!([{ "id": Uuid::from_u128(5), "user_id": USER, "photo_url": "u", "is_primary": true }]),
    );
    let client = Arc::new(mock.spawn().await);
    let service = ProfileService::new(client, Arc::new(EventBus::default()));

    let photo = service.upload_photo(USER, &png(), true).await.unwrap();

    assert!(photo.is_primary);
    let upload = &mock.hits_to(Method::POST, "/storage/v1/object/user-photos/")[0];
    assert!(upload.path.starts_with(&format!("/storage/v1/object/user-photos/{USER}/")));
    assert!(upload.path.ends_with(".jpg"));
    assert_eq!(&upload.raw[..2], &[0xFF, 0xD8]);

    let clear = &mock.hits_to(Method::PATCH, "/rest/v1/user_photos")[0];
    assert!(clear.query.contains(&format!("user_id=eq.{USER}")));
    assert_eq!(clear.body, r#"{"is_primary":false}"#);

    let insert: serde_json::Value =
        serde_json::from_str(&mock.hits_to(Method::POST, "/rest/v1/user_photos")[0].body).unwrap();
    assert!(insert["photo_url"]
        .as_str()
        .unwrap()
        .contains("/storage/v1/object/public/user-photos/"));
}

#[tokio::test]
async fn failed_row_insert_removes_the_uploaded_object() {
    let mock = MockBackend::default();
    mock.respond(Method::POST, "/storage/v1/object/user-photos/", StatusCode::OK, json!({ "Key": "x" }));
    mock.respond(Method::DELETE, "/storage/v1/object/user-photos", StatusCode::OK, json!([]));
    mock.respond(
        Method::POST,
        "/rest/v1/user_photos",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "insert failed" }),
    );
    let client = Arc::new(mock.spawn().await);
    let service = ProfileService::new(client, Arc::new(EventBus::default()));

    let result = service.upload_photo(USER, &png(), false).await;

    assert_matches!(result, Err(PipelineError::Db(_)));
    let upload = &mock.hits_to(Method::POST, "/storage/v1/object/user-photos/")[0];
    let key = upload
        .path
        .trim_start_matches("/storage/v1/object/user-photos/")
        .to_string();
    let removal = &mock.hits_to(Method::DELETE, "/storage/v1/object/user-photos")[0];
    let removed: serde_json::Value = serde_json::from_str(&removal.body).unwrap();
    assert_eq!(removed["prefixes"][0], key);
}

#[tokio::test]
async fn setting_primary_publishes_an_event() {
    let mock = MockBackend::default();
    mock.respond(Method::PATCH, "/rest/v1/user_photos", StatusCode::OK, json!(null));
    let client = Arc::new(mock.spawn().await);
    let bus = Arc::new(EventBus::default());
    let service = ProfileService::new(client, Arc::clone(&bus));
    let mut rx = bus.subscribe();

    let photo = UserPhoto {
        id: Uuid::from_u128(5),
        user_id: USER,
        photo_url: "https://cdn.test/5.jpg".into(),
        is_primary: false,
        created_at: None,
    };
    let updated = service.set_primary_photo(&photo).await.unwrap();

    assert!(updated.is_primary);
    assert_eq!(mock.hits_to(Method::PATCH, "/rest/v1/user_photos").len(), 2);
    let event = rx.try_recv().unwrap();
    assert_eq!(event.event_type, PHOTO_PRIMARY_CHANGED);
    assert_eq!(event.source_entity_id, Some(photo.id));
}

#[tokio::test]
async fn undecodable_photo_never_reaches_storage() {
    let mock = MockBackend::default();
    let client = Arc::new(mock.spawn().await);
    let service = ProfileService::new(client, Arc::new(EventBus::default()));

    let result = service.upload_photo(USER, b"not an image", false).await;

    assert_matches!(result, Err(PipelineError::Storage(_)));
    assert!(mock.hits().is_empty());
}

#[tokio::test]
async fn deleting_a_photo_removes_object_then_row() {
    let mock = MockBackend::default();
    mock.respond(Method::DELETE, "/storage/v1/object/user-photos", StatusCode::OK, json!([]));
    mock.respond(Method::DELETE, "/rest/v1/user_photos", StatusCode::OK, json!(null));
    let client = Arc::new(mock.spawn().await);
    let base = client.base_url().to_string();
    let service = ProfileService::new(client, Arc::new(EventBus::default()));

    let photo = UserPhoto {
        id: Uuid::from_u128(5),
        user_id: USER,
        photo_url: format!("{base}/storage/v1/object/public/user-photos/{USER}/a.jpg"),
        is_primary: false,
        created_at: None,
    };
    service.delete_photo(&photo).await.unwrap();

    let hits = mock.hits();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].path, "/storage/v1/object/user-photos");
    let removed: serde_json::Value = serde_json::from_str(&hits[0].body).unwrap();
    assert_eq!(removed["prefixes"][0], format!("{USER}/a.jpg"));
    assert_eq!(hits[1].path, "/rest/v1/user_photos");
}

#[tokio::test]
async fn reference_photo_becomes_the_avatar() {
    let mock = MockBackend::default();
    mock.respond_raw(Method::GET, "/photos/5.png", StatusCode::OK, png());
    mock.respond(Method::POST, "/storage/v1/object/avatars/", StatusCode::OK, json!({ "Key": "x" }));
    mock.respond(Method::PATCH, "/rest/v1/profiles", StatusCode::OK, json!(null));
    let client = Arc::new(mock.spawn().await);
    let base = client.base_url().to_string();
    let service = ProfileService::new(client, Arc::new(EventBus::default()));

    let photo = UserPhoto {
        id: Uuid::from_u128(5),
        user_id: USER,
        photo_url: format!("{base}/photos/5.png"),
        is_primary: true,
        created_at: None,
    };
    let url = service.use_photo_as_avatar(&photo).await.unwrap();

    assert!(url.ends_with(&format!("/storage/v1/object/public/avatars/{USER}.jpg")));
    let upload = &mock.hits_to(Method::POST, "/storage/v1/object/avatars/")[0];
    assert_eq!(&upload.raw[..2], &[0xFF, 0xD8]);
    let patch: serde_json::Value =
        serde_json::from_str(&mock.hits_to(Method::PATCH, "/rest/v1/profiles")[0].body).unwrap();
    assert_eq!(patch["avatar_url"], url);
}

#[tokio::test]
async fn missing_reference_photo_is_a_download_failure() {
    let mock = MockBackend::default();
    let client = Arc::new(mock.spawn().await);
    let base = client.base_url().to_string();
    let service = ProfileService::new(client, Arc::new(EventBus::default()));

    let photo = UserPhoto {
        id: Uuid::from_u128(5),
        user_id: USER,
        photo_url: format!("{base}/photos/gone.png"),
        is_primary: false,
        created_at: None,
    };
    let result = service.use_photo_as_avatar(&photo).await;

    assert_matches!(result, Err(PipelineError::Storage(StorageError::DownloadFailed(_))));
    assert!(mock.hits_to(Method::POST, "/storage/v1/object/avatars/").is_empty());
}

// ---- auth ----

#[tokio::test]
async fn rejected_credentials_are_sign_in_failures() {
    let mock = MockBackend::default();
    mock.respond(
        Method::POST,
        "/auth/v1/token",
        StatusCode::BAD_REQUEST,
        json!({ "error": "invalid_grant" }),
    );
    let client = Arc::new(mock.spawn().await);
    let service = AuthService::new(Arc::clone(&client), Arc::new(EventBus::default()));

    let result = service.sign_in("a@b.c", "wrong-password").await;

    assert_matches!(result, Err(PipelineError::Auth(AuthError::SignInFailed(_))));
    assert!(!service.has_session().await);
}

#[tokio::test]
async fn sign_in_keeps_the_session() {
    let mock = MockBackend::default();
    mock.respond(
        Method::POST,
        "/auth/v1/token",
        StatusCode::OK,
        json!({
            "access_token": "tok",
            "refresh_token": "ref",
            "user": { "id": USER, "email": "a@b.c", "user_metadata": { "full_name": "Alex Kim" } }
        }),
    );
    mock.respond(Method::POST, "/rest/v1/profiles", StatusCode::CREATED, json!(null));
    let client = Arc::new(mock.spawn().await);
    let service = AuthService::new(Arc::clone(&client), Arc::new(EventBus::default()));

    let user = service.sign_in("a@b.c", "correct-horse").await.unwrap();

    assert_eq!(user.id, USER);
    assert!(service.has_session().await);
    assert_eq!(client.session().await.unwrap().access_token, "tok");
}

#[tokio::test]
async fn current_user_is_confirmed_with_the_auth_server() {
    let mock = MockBackend::default();
    mock.respond(
        Method::POST,
        "/auth/v1/token",
        StatusCode::OK,
        json!({ "access_token": "tok", "user": { "id": USER } }),
    );
    mock.respond(Method::POST, "/rest/v1/profiles", StatusCode::CREATED, json!(null));
    mock.respond(Method::GET, "/auth/v1/user", StatusCode::OK, json!({ "id": USER }));
    mock.respond(
        Method::GET,
        "/rest/v1/profiles",
        StatusCode::OK,
        json!([{ "id": USER, "full_name": "Alex Kim" }]),
    );
    let client = Arc::new(mock.spawn().await);
    let service = AuthService::new(client, Arc::new(EventBus::default()));
    service.sign_in("a@b.c", "correct-horse").await.unwrap();

    let actor = service.current_actor().await.unwrap();

    assert_eq!(actor.user_id, USER);
    assert_eq!(actor.display_name, "Alex Kim");
    let lookup = &mock.hits_to(Method::GET, "/rest/v1/profiles")[0];
    assert!(lookup.query.contains(&format!("id=eq.{USER}")));
}

#[tokio::test]
async fn expired_session_is_not_authenticated() {
    let mock = MockBackend::default();
    mock.respond(
        Method::POST,
        "/auth/v1/token",
        StatusCode::OK,
        json!({ "access_token": "tok", "user": { "id": USER } }),
    );
    mock.respond(Method::POST, "/rest/v1/profiles", StatusCode::CREATED, json!(null));
    mock.respond(Method::GET, "/auth/v1/user", StatusCode::UNAUTHORIZED, json!({ "msg": "expired" }));
    let client = Arc::new(mock.spawn().await);
    let service = AuthService::new(client, Arc::new(EventBus::default()));
    service.sign_in("a@b.c", "correct-horse").await.unwrap();

    let result = service.current_user().await;

    assert_matches!(result, Err(PipelineError::Auth(AuthError::NotAuthenticated)));
    assert!(mock.hits_to(Method::GET, "/rest/v1/profiles").is_empty());
}

#[tokio::test]
async fn current_user_without_session_makes_no_request() {
    let mock = MockBackend::default();
    let client = Arc::new(mock.spawn().await);
    let service = AuthService::new(client, Arc::new(EventBus::default()));

    let result = service.current_user().await;

    assert_matches!(result, Err(PipelineError::Auth(AuthError::NotAuthenticated)));
    assert!(mock.hits().is_empty());
}
