#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]
use dm_server::adapters::memory::InMemoryChatRepository;
use dm_server::api;
use dm_server::config::HealthConfig;
use std::sync::{Arc, Once};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("dm_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub repo: InMemoryChatRepository,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_users(&["alice", "bob", "carol", "dave"]).await
    }

    pub async fn spawn_with_users(users: &[&str]) -> Self {
        setup_tracing();
        let repo = InMemoryChatRepository::with_users(users);

        let (app_state, mgmt_state) =
            dm_server::build_states(Arc::new(repo.clone()), HealthConfig { db_timeout_ms: 500 });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        let app = api::app_router(app_state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());
        let mgmt_app = api::mgmt_router(mgmt_state);
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_app).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), repo }
    }

    pub async fn send_message(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client.post(format!("{}/send-message", self.server_url)).json(body).send().await.unwrap()
    }

    pub async fn send_message_owned(&self, body: serde_json::Value) -> reqwest::Response {
        self.send_message(&body).await
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(format!("{}{}", self.server_url, path)).send().await.unwrap()
    }
}
