mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use helpers::{create_person, error_code, get_person, id_of, ids, send, send_raw, test_app};

const MISSING_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = test_app();
    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn create_and_fetch_person() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "dateOfBirth": "1815-12-10",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Person created successfully");

    let created = &body["data"];
    assert_eq!(created["fullName"], "Ada Lovelace");
    assert_eq!(created["childrenIds"], json!([]));
    assert_eq!(created["parentIds"], json!([]));
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let fetched = get_person(&app, &id_of(created)).await;
    assert_eq!(&fetched, created);

    let (status, list) = send(&app, "GET", "/api/persons", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn create_with_parents_links_both_sides() {
    let app = test_app();
    let mom = create_person(&app, "Mary", "Smith", &[]).await;
    let dad = create_person(&app, "John", "Smith", &[]).await;
    let (mom_id, dad_id) = (id_of(&mom), id_of(&dad));

    let kid = create_person(&app, "Amy", "Smith", &[&mom_id, &dad_id]).await;
    let kid_id = id_of(&kid);
    assert_eq!(ids(&kid, "parentIds"), vec![mom_id.clone(), dad_id.clone()]);

    assert_eq!(ids(&get_person(&app, &mom_id).await, "childrenIds"), vec![kid_id.clone()]);
    assert_eq!(ids(&get_person(&app, &dad_id).await, "childrenIds"), vec![kid_id]);
}

#[tokio::test]
async fn create_with_unknown_parent_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({ "firstName": "A", "lastName": "B", "parentIds": [MISSING_ID] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "PARENT_NOT_FOUND");
    assert_eq!(
        body["error"]["message"],
        format!("Parent with ID {MISSING_ID} not found")
    );

    let (_, list) = send(&app, "GET", "/api/persons", None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn create_rejects_bad_payloads() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({ "firstName": "", "lastName": "B", "phoneNumber": "555-1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    let fields: Vec<_> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["firstName", "phoneNumber"]);

    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({ "firstName": "A", "lastName": "B", "nickname": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (status, body) = send_raw(&app, "POST", "/api/persons", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_with_three_parents_is_rejected() {
    let app = test_app();
    let a = id_of(&create_person(&app, "A", "One", &[]).await);
    let b = id_of(&create_person(&app, "B", "Two", &[]).await);
    let c = id_of(&create_person(&app, "C", "Three", &[]).await);

    let (status, body) = send(
        &app,
        "POST",
        "/api/persons",
        Some(json!({ "firstName": "D", "lastName": "Four", "parentIds": [a, b, c] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn get_person_errors() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/persons/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (status, body) = send(&app, "GET", &format!("/api/persons/{MISSING_ID}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "PERSON_NOT_FOUND");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn update_recomputes_full_name() {
    let app = test_app();
    let person = create_person(&app, "Jane", "Doe", &[]).await;
    let id = id_of(&person);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/persons/{id}"),
        Some(json!({ "lastName": "Roe", "notes": "married" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"];
    assert_eq!(updated["fullName"], "Jane Roe");
    assert_eq!(updated["notes"], "married");
    assert_eq!(updated["createdAt"], person["createdAt"]);
    assert_eq!(updated["id"], person["id"]);
}

#[tokio::test]
async fn update_cannot_touch_relationships() {
    let app = test_app();
    let id = id_of(&create_person(&app, "Jane", "Doe", &[]).await);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/persons/{id}"),
        Some(json!({ "parentIds": [MISSING_ID] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/persons/{MISSING_ID}"),
        Some(json!({ "notes": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "PERSON_NOT_FOUND");
}

#[tokio::test]
async fn ancestors_and_descendants_follow_the_chain() {
    let app = test_app();
    let g = id_of(&create_person(&app, "Grand", "Pa", &[]).await);
    let p = id_of(&create_person(&app, "Pa", "Pa", &[&g]).await);
    let c = id_of(&create_person(&app, "Kid", "Pa", &[&p]).await);

    let (status, body) = send(&app, "GET", &format!("/api/persons/{c}/ancestors"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(id_of(&body["data"][0]), p);
    assert_eq!(id_of(&body["data"][1]), g);

    let (_, body) = send(&app, "GET", &format!("/api/persons/{g}/descendants"), None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(id_of(&body["data"][0]), p);
    assert_eq!(id_of(&body["data"][1]), c);

    let (_, body) = send(&app, "GET", &format!("/api/persons/{c}/descendants"), None).await;
    assert_eq!(body["count"], 0);

    let (status, body) =
        send(&app, "GET", &format!("/api/persons/{MISSING_ID}/ancestors"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "PERSON_NOT_FOUND");
}

#[tokio::test]
async fn diamond_descendants_are_listed_once() {
    let app = test_app();
    let root = id_of(&create_person(&app, "Root", "X", &[]).await);
    let a = id_of(&create_person(&app, "A", "X", &[&root]).await);
    let b = id_of(&create_person(&app, "B", "X", &[&root]).await);
    create_person(&app, "D", "X", &[&a, &b]).await;

    let (_, body) = send(&app, "GET", &format!("/api/persons/{root}/descendants"), None).await;
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
    assert_eq!(body["error"]["message"], "API endpoint /api/nowhere not found");
}
