mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use attendance::{api::rest::dto::UserDto, Attendance, AttendanceConfig};

use common::{get, post_empty, post_json, seeded_memory_module, send};

#[tokio::test]
async fn enter_records_state_and_log_then_rejects_repeat() {
    let router = seeded_memory_module().await.router();

    let (status, body) = send(
        &router,
        post_json("/api/users/U001/enter", json!({ "comment": "meeting" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "入室が記録されました");
    assert_eq!(body["user"]["userID"], "U001");
    assert_eq!(body["user"]["isInRoom"], true);
    let stamped = body["user"]["lastUpdate"].clone();
    assert!(stamped.as_str().is_some_and(|s| s.ends_with('Z')));

    let (_, logs) = send(&router, get("/api/logs")).await;
    let head = &logs[0];
    assert_eq!(head["userID"], "U001");
    assert_eq!(head["userName"], "田中さん");
    assert_eq!(head["action"], "enter");
    assert_eq!(head["comment"], "meeting");
    assert_eq!(head["timestamp"], stamped);
    let count = logs.as_array().unwrap().len();

    let (status, body) = send(
        &router,
        post_json("/api/users/U001/enter", json!({ "comment": "meeting" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "既に入室中です" }));

    let (_, logs) = send(&router, get("/api/logs")).await;
    assert_eq!(logs.as_array().unwrap().len(), count);
}

#[tokio::test]
async fn exit_on_out_of_room_user_is_rejected() {
    let router = seeded_memory_module().await.router();

    let (status, body) = send(&router, post_empty("/api/users/U001/exit")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "既に退室中です" }));
}

#[tokio::test]
async fn exit_without_body_succeeds() {
    let router = seeded_memory_module().await.router();

    // U002 is seeded in the room
    let (status, body) = send(&router, post_empty("/api/users/U002/exit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "退室が記録されました");
    assert_eq!(body["user"]["isInRoom"], false);

    let (_, logs) = send(&router, get("/api/logs?limit=1")).await;
    assert_eq!(logs[0]["action"], "exit");
    assert_eq!(logs[0]["comment"], serde_json::Value::Null);
}

#[tokio::test]
async fn user_name_in_body_renames_the_user() {
    let router = seeded_memory_module().await.router();

    let (status, body) = send(
        &router,
        post_json(
            "/api/users/U003/enter",
            json!({ "userName": "Yamada", "comment": "" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["userName"], "Yamada");

    let (_, user) = send(&router, get("/api/users/U003")).await;
    assert_eq!(user["userName"], "Yamada");
    let (_, logs) = send(&router, get("/api/logs?limit=1")).await;
    assert_eq!(logs[0]["userName"], "Yamada");
    assert_eq!(logs[0]["comment"], serde_json::Value::Null);
}

#[tokio::test]
async fn unknown_user_is_404() {
    let router = seeded_memory_module().await.router();

    let (status, body) = send(&router, get("/api/users/U404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "ユーザーが見つかりません" }));

    let (status, body) = send(&router, post_empty("/api/users/U404/enter")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "error": "ユーザーが見つかりません" })
    );

    // no auto-provisioning
    let (_, users) = send(&router, get("/api/users")).await;
    assert_eq!(users.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn malformed_body_is_400() {
    let router = seeded_memory_module().await.router();

    let request = Request::builder()
        .method("POST")
        .uri("/api/users/U001/enter")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (_, user) = send(&router, get("/api/users/U001")).await;
    assert_eq!(user["isInRoom"], false);
}

#[tokio::test]
async fn over_long_comment_is_400() {
    let router = seeded_memory_module().await.router();

    let (status, body) = send(
        &router,
        post_json("/api/users/U001/enter", json!({ "comment": "x".repeat(501) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn list_users_returns_seed_in_order() {
    let router = seeded_memory_module().await.router();

    let (status, body) = send(&router, get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);

    let users: Vec<UserDto> = serde_json::from_value(body).unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(
        ids,
        ["U001", "U002", "U003", "U004", "U005", "U006", "U007", "U008", "U009"]
    );
    let in_room: Vec<&str> = users
        .iter()
        .filter(|u| u.is_in_room)
        .map(|u| u.user_id.as_str())
        .collect();
    assert_eq!(in_room, ["U002", "U004", "U006", "U007"]);
}

#[tokio::test]
async fn logs_limit_query() {
    let router = seeded_memory_module().await.router();

    let (status, body) = send(&router, get("/api/logs?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["timestamp"], "2025-08-10T05:30:00.000Z");

    let (_, body) = send(&router, get("/api/logs")).await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_logs_limit_is_json_400() {
    let router = seeded_memory_module().await.router();

    for uri in ["/api/logs?limit=abc", "/api/logs?limit=-1"] {
        let response = router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json",
            "{uri}"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "リクエストパラメータが正しくありません" }));
    }
}

#[tokio::test]
async fn reset_restores_seed_over_http() {
    let router = seeded_memory_module().await.router();
    let (_, users_before) = send(&router, get("/api/users")).await;
    let (_, logs_before) = send(&router, get("/api/logs")).await;

    send(&router, post_empty("/api/users/U001/enter")).await;
    send(&router, post_empty("/api/users/U002/exit")).await;

    let (status, body) = send(&router, post_empty("/api/reset")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "データをリセットしました" }));

    assert_eq!(send(&router, get("/api/users")).await.1, users_before);
    assert_eq!(send(&router, get("/api/logs")).await.1, logs_before);
}

#[tokio::test]
async fn reset_route_can_be_disabled() {
    let cfg = AttendanceConfig {
        enable_reset: false,
        ..Default::default()
    };
    let module = Attendance::in_memory(cfg).unwrap();
    module.init().await.unwrap();

    let (status, _) = send(&module.router(), post_empty("/api/reset")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!module.openapi().paths.paths.contains_key("/api/reset"));
}

#[tokio::test]
async fn openapi_lists_the_endpoints() {
    let module = seeded_memory_module().await;
    let doc = module.openapi();

    for path in [
        "/api/users",
        "/api/users/{user_id}",
        "/api/users/{user_id}/enter",
        "/api/users/{user_id}/exit",
        "/api/logs",
        "/api/reset",
    ] {
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
