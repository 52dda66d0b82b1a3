#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc)]
use dm_server::domain::repository::ChatRepository;
use reqwest::StatusCode;
use serde_json::{Value, json};

mod common;

#[tokio::test]
async fn test_send_message_creates_room_and_message() {
    let app = common::TestApp::spawn().await;

    let resp = app.send_message(&json!({"senderId": "alice", "receiverId": "bob", "content": "hi"})).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"message": "Message sent successfully"}));

    let room = app.repo.find_room_by_member_pair("alice", "bob").await.unwrap().unwrap();
    assert_eq!(room.member1_id, "alice");
    assert_eq!(room.member2_id, "bob");

    let messages = app.repo.find_messages_by_room(room.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hi");
    assert_eq!(messages[0].sender_id, "alice");
}

#[tokio::test]
async fn test_reply_in_either_direction_reuses_room() {
    let app = common::TestApp::spawn().await;

    for (sender, receiver) in [("alice", "bob"), ("bob", "alice"), ("alice", "bob")] {
        let resp = app.send_message(&json!({"senderId": sender, "receiverId": receiver, "content": "yo"})).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(app.repo.room_count().await, 1);
    assert_eq!(app.repo.message_count().await, 3);
}

#[tokio::test]
async fn test_missing_parameters() {
    let app = common::TestApp::spawn().await;

    let bodies = [
        json!({}),
        json!({"receiverId": "bob", "content": "hi"}),
        json!({"senderId": "alice", "content": "hi"}),
        json!({"senderId": "alice", "receiverId": "bob"}),
        json!({"senderId": "alice", "receiverId": "bob", "content": ""}),
    ];

    for body in bodies {
        let resp = app.send_message(&body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error["error"], "Missing required parameters");
    }
}

#[tokio::test]
async fn test_self_message_rejected() {
    let app = common::TestApp::spawn().await;

    let resp = app.send_message(&json!({"senderId": "alice", "receiverId": "alice", "content": "note"})).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["error"], "Cannot send a message to oneself");
    assert_eq!(app.repo.room_count().await, 0);
}

#[tokio::test]
async fn test_self_message_rejected_even_for_unknown_user() {
    let app = common::TestApp::spawn().await;

    let resp = app.send_message(&json!({"senderId": "ghost", "receiverId": "ghost", "content": "x"})).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_sender_or_receiver() {
    let app = common::TestApp::spawn().await;

    for (sender, receiver) in [("ghost", "bob"), ("alice", "ghost"), ("ghost", "phantom")] {
        let resp = app.send_message(&json!({"senderId": sender, "receiverId": receiver, "content": "hi"})).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let error: Value = resp.json().await.unwrap();
        assert_eq!(error["error"], "Sender or receiver not found");
    }

    assert_eq!(app.repo.room_count().await, 0);
}

#[tokio::test]
async fn test_malformed_body() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/send-message", app.server_url))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["error"], "Invalid request body");

    let resp = app.send_message(&json!({"senderId": 1, "receiverId": "bob", "content": "hi"})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bodiless_request_reports_missing_parameters() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.post(format!("{}/send-message", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["error"], "Missing required parameters");

    let resp = app
        .client
        .post(format!("{}/send-message", app.server_url))
        .header("Content-Type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["error"], "Missing required parameters");

    let resp = app
        .client
        .post(format!("{}/send-message", app.server_url))
        .header("Content-Type", "text/plain")
        .body("senderId=alice")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["error"], "Missing required parameters");
    assert_eq!(app.repo.message_count().await, 0);
}

#[tokio::test]
async fn test_form_encoded_body_is_accepted() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/send-message", app.server_url))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("senderId=alice&receiverId=bob&content=hi%20there")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let room = app.repo.find_room_by_member_pair("alice", "bob").await.unwrap().unwrap();
    let messages = app.repo.find_messages_by_room(room.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hi there");

    let resp = app
        .client
        .post(format!("{}/send-message", app.server_url))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("senderId=alice&receiverId=")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error["error"], "Missing required parameters");
}

#[tokio::test]
async fn test_storage_failure_is_opaque() {
    let app = common::TestApp::spawn().await;
    app.repo.set_unavailable(true);

    let resp = app.send_message(&json!({"senderId": "alice", "receiverId": "bob", "content": "hi"})).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = resp.json().await.unwrap();
    assert_eq!(error, json!({"error": "An error occurred while sending the message"}));
}

#[tokio::test]
async fn test_concurrent_first_contact_creates_single_room() {
    let app = common::TestApp::spawn().await;

    let sends = (0..10).map(|i| {
        let (sender, receiver) = if i % 2 == 0 { ("carol", "dave") } else { ("dave", "carol") };
        app.send_message_owned(json!({"senderId": sender, "receiverId": receiver, "content": format!("m{i}")}))
    });
    let responses = futures::future::join_all(sends).await;

    assert!(responses.iter().all(|r| r.status() == StatusCode::OK));
    assert_eq!(app.repo.room_count().await, 1);
    assert_eq!(app.repo.message_count().await, 10);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/send-message", app.server_url))
        .header("x-request-id", "trace-me")
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["x-request-id"], "trace-me");

    let resp = app.get("/chatrooms/alice").await;
    assert!(resp.headers().contains_key("x-request-id"));
}
