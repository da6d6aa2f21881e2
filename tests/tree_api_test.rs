mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{create_person, error_code, get_person, id_of, send, test_app};

#[tokio::test]
async fn empty_tree_lists_endpoints() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/tree", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());
    assert_eq!(body["message"], "No family tree exists yet");
    assert!(!body["availableEndpoints"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn initialize_with_two_founders() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/tree/initialize",
        Some(json!({ "parents": [
            { "firstName": "John", "lastName": "Smith" },
            { "firstName": "Mary", "lastName": "Smith" },
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Family tree initialized successfully");

    let tree = &body["data"];
    assert_eq!(tree["name"], "John Smith & Mary Smith's Family Tree");
    assert!(tree["id"].as_str().unwrap().starts_with("tree-"));
    assert_eq!(tree["rootPersonIds"].as_array().unwrap().len(), 2);

    let john = &tree["persons"][0];
    let mary = &tree["persons"][1];
    assert_eq!(john["spouseId"], mary["id"]);
    assert_eq!(mary["spouseId"], john["id"]);

    let (_, body) = send(&app, "GET", "/api/tree", None).await;
    assert_eq!(body["data"]["persons"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn initialize_with_one_founder() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/tree/initialize",
        Some(json!({ "parents": [{ "firstName": "Solo", "lastName": "Han" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Solo Han's Family Tree");
    assert!(body["data"]["persons"][0].get("spouseId").is_none());
}

#[tokio::test]
async fn initialize_twice_is_rejected() {
    let app = test_app();
    let payload = json!({ "parents": [{ "firstName": "A", "lastName": "B" }] });
    send(&app, "POST", "/api/tree/initialize", Some(payload.clone())).await;

    let (status, body) = send(&app, "POST", "/api/tree/initialize", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "TREE_ALREADY_EXISTS");
}

#[tokio::test]
async fn initialize_validates_founder_count() {
    let app = test_app();
    let (status, body) =
        send(&app, "POST", "/api/tree/initialize", Some(json!({ "parents": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let three = json!({ "parents": [
        { "firstName": "A", "lastName": "X" },
        { "firstName": "B", "lastName": "X" },
        { "firstName": "C", "lastName": "X" },
    ]});
    let (status, _) = send(&app, "POST", "/api/tree/initialize", Some(three)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/api/tree", None).await;
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn deleting_a_founder_prunes_root_ids() {
    let app = test_app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/tree/initialize",
        Some(json!({ "parents": [
            { "firstName": "A", "lastName": "X" },
            { "firstName": "B", "lastName": "X" },
        ]})),
    )
    .await;
    let a = id_of(&body["data"]["persons"][0]);
    let b = id_of(&body["data"]["persons"][1]);

    send(&app, "DELETE", &format!("/api/persons/{a}"), None).await;

    let (_, body) = send(&app, "GET", "/api/tree", None).await;
    assert_eq!(body["data"]["rootPersonIds"], json!([b]));
}

#[tokio::test]
async fn delete_tree_removes_everything() {
    let app = test_app();
    send(
        &app,
        "POST",
        "/api/tree/initialize",
        Some(json!({ "parents": [{ "firstName": "A", "lastName": "X" }] })),
    )
    .await;
    create_person(&app, "Loose", "Record", &[]).await;

    let (status, body) = send(&app, "DELETE", "/api/tree", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedPersons"], 2);

    let (_, body) = send(&app, "GET", "/api/persons", None).await;
    assert_eq!(body["count"], 0);
    let (_, body) = send(&app, "GET", "/api/tree", None).await;
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn integrity_of_empty_store_is_valid() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/tree/integrity", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "isValid": true, "errors": [] }));
}

#[tokio::test]
async fn founders_can_have_children_added() {
    let app = test_app();
    let (_, body) = send(
        &app,
        "POST",
        "/api/tree/initialize",
        Some(json!({ "parents": [
            { "firstName": "A", "lastName": "X" },
            { "firstName": "B", "lastName": "X" },
        ]})),
    )
    .await;
    let a = id_of(&body["data"]["persons"][0]);
    let b = id_of(&body["data"]["persons"][1]);

    let kid = create_person(&app, "K", "X", &[&a, &b]).await;
    assert_eq!(get_person(&app, &a).await["childrenIds"], json!([id_of(&kid)]));
}
