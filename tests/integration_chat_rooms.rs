#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc)]
use reqwest::StatusCode;
use serde_json::{Value, json};

mod common;

async fn send(app: &common::TestApp, sender: &str, receiver: &str, content: &str) {
    let resp = app.send_message(&json!({"senderId": sender, "receiverId": receiver, "content": content})).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

fn room_ids(body: &Value) -> Vec<i64> {
    body["chatRooms"].as_array().unwrap().iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn test_list_chat_rooms_for_member() {
    let app = common::TestApp::spawn().await;
    send(&app, "alice", "bob", "a").await;
    send(&app, "carol", "alice", "b").await;
    send(&app, "carol", "dave", "c").await;

    let resp = app.get("/chatrooms/alice").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();

    let rooms = body["chatRooms"].as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    for room in rooms {
        let members = [room["member1Id"].as_str().unwrap(), room["member2Id"].as_str().unwrap()];
        assert!(members.contains(&"alice"), "room {room} does not include alice");
        assert!(room["createdAt"].is_string());
    }

    let body: Value = app.get("/chatrooms/dave").await.json().await.unwrap();
    assert_eq!(room_ids(&body).len(), 1);
}

#[tokio::test]
async fn test_list_chat_rooms_empty_for_user_without_rooms() {
    let app = common::TestApp::spawn().await;

    let resp = app.get("/chatrooms/bob").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"chatRooms": []}));
}

#[tokio::test]
async fn test_list_chat_rooms_unknown_user() {
    let app = common::TestApp::spawn().await;

    let resp = app.get("/chatrooms/ghost").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_list_chat_rooms_storage_failure() {
    let app = common::TestApp::spawn().await;
    app.repo.set_unavailable(true);

    let resp = app.get("/chatrooms/alice").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "An error occurred while getting chatrooms");
}

#[tokio::test]
async fn test_list_messages_in_insertion_order() {
    let app = common::TestApp::spawn().await;
    send(&app, "alice", "bob", "first").await;
    send(&app, "alice", "carol", "unrelated").await;
    send(&app, "bob", "alice", "second").await;
    send(&app, "alice", "bob", "third").await;

    let rooms: Value = app.get("/chatrooms/bob").await.json().await.unwrap();
    let room_id = room_ids(&rooms)[0];

    let resp = app.get(&format!("/chatroom-messages/{room_id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();

    let messages = body["messages"].as_array().unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);

    let senders: Vec<&str> = messages.iter().map(|m| m["senderId"].as_str().unwrap()).collect();
    assert_eq!(senders, vec!["alice", "bob", "alice"]);
    assert!(messages.iter().all(|m| m["chatRoomId"].as_i64() == Some(room_id)));
}

#[tokio::test]
async fn test_list_messages_invalid_id() {
    let app = common::TestApp::spawn().await;

    for path in ["/chatroom-messages/abc", "/chatroom-messages/1.5", "/chatroom-messages/12abc"] {
        let resp = app.get(path).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "path: {path}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"error": "Invalid chat room ID"}));
    }
}

#[tokio::test]
async fn test_list_messages_unknown_room() {
    let app = common::TestApp::spawn().await;

    let resp = app.get("/chatroom-messages/4242").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Chat room not found");
}

#[tokio::test]
async fn test_list_messages_storage_failure() {
    let app = common::TestApp::spawn().await;
    send(&app, "alice", "bob", "hi").await;
    app.repo.set_unavailable(true);

    let resp = app.get("/chatroom-messages/1").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "An error occurred while getting messages");
}
