use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use showmark::clients::MetadataProvider;
use showmark::config::Config;
use showmark::models::episode::EpisodeInput;
use showmark::models::show::{ShowInput, ShowSearchHit, ShowSearchResults};
use showmark::state::SharedState;
use tower::ServiceExt;

const PASSWORD: &str = "correct horse battery";

/// Serves one known show with two seasons.
struct StubProvider;

#[async_trait::async_trait]
impl MetadataProvider for StubProvider {
    async fn search_shows(&self, query: &str) -> anyhow::Result<ShowSearchResults> {
        Ok(ShowSearchResults {
            total_results: 1,
            total_pages: 1,
            shows: vec![ShowSearchHit {
                id: 1399,
                tmdb_id: 1399,
                name: format!("{query} (stub)"),
                overview: None,
                image: None,
            }],
        })
    }

    async fn get_show(&self, tmdb_id: i32) -> anyhow::Result<Option<ShowInput>> {
        if tmdb_id != 1399 {
            return Ok(None);
        }
        Ok(Some(ShowInput {
            tmdb_id,
            name: "Stub Show".to_string(),
            nb_seasons: Some(2),
            nb_episodes: Some(5),
            origin_country: vec!["US".to_string()],
            ..Default::default()
        }))
    }

    async fn get_season(&self, tmdb_id: i32, season_nb: i32) -> anyhow::Result<Vec<EpisodeInput>> {
        let count = if season_nb == 1 { 3 } else { 2 };
        Ok((1..=count)
            .map(|episode_nb| EpisodeInput {
                tmdb_id: tmdb_id * 100 + season_nb * 10 + episode_nb,
                season_nb,
                episode_nb,
                name: Some(format!("Episode {season_nb}x{episode_nb}")),
                ..Default::default()
            })
            .collect())
    }
}

struct TestApp {
    router: Router,
    api_key: String,
}

async fn spawn_app() -> TestApp {
    let path = std::env::temp_dir().join(format!("showmark-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.server.secure_cookies = false;
    config.tmdb.pause_millis = 0;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let security = config.security.clone();
    let shared = SharedState::with_provider(config, Arc::new(StubProvider))
        .await
        .expect("Failed to create shared state");

    let user = shared
        .store
        .create_user("alice", PASSWORD, &security)
        .await
        .expect("Failed to create user");

    let state = showmark::api::create_app_state(Arc::new(shared), None);
    TestApp {
        router: showmark::api::router(state).await,
        api_key: user.api_key,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .header("X-Api-Key", &self.api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("X-Api-Key", &self.api_key)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Adds the stub show and returns its internal id.
    async fn add_show(&self) -> i64 {
        let (status, body) = self.json("POST", "/api/shows", json!({"tmdb_id": 1399})).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn episodes(&self, show_id: i64) -> Vec<Value> {
        let (status, body) = self.get(&format!("/api/shows/{show_id}")).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["show"]["episodes"].as_array().unwrap().clone()
    }
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/session")
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from(
            json!({"username": username, "password": password}).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_requires_authentication() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(Request::builder().uri("/api/shows").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/shows")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/shows")
                .header(header::AUTHORIZATION, format!("Bearer {}", app.api_key))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_session_flow() {
    let app = spawn_app().await;

    let (status, _) = app.send(login_request("alice", "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(login_request("", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = app
        .router
        .clone()
        .oneshot(login_request("alice", PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert_eq!(body["data"]["user"]["darkTheme"], false);

    let with_cookie = |method: &str, uri: &str, body: Option<Value>| {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, &cookie);
        match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    };

    let (status, _) = app.send(with_cookie("GET", "/api/shows", None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(with_cookie(
            "PATCH",
            "/api/settings/theme",
            Some(json!({"darkTheme": true})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app.send(with_cookie("GET", "/api/session", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["darkTheme"], true);

    let (status, _) = app.send(with_cookie("DELETE", "/api/session", None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(with_cookie("GET", "/api/shows", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_and_list_shows() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/shows/search/stub").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_results"], 1);
    assert_eq!(body["data"]["shows"][0]["tmdb_id"], 1399);

    let id = app.add_show().await;

    let (status, _) = app.json("POST", "/api/shows", json!({"tmdb_id": 1399})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.json("POST", "/api/shows", json!({"tmdb_id": 42})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/shows").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shows"][0]["id"], id);
    assert_eq!(body["data"]["shows"][0]["name"], "Stub Show");
    assert_eq!(body["data"]["userFlags"]["flag_1"], "");

    let episodes = app.episodes(id).await;
    assert_eq!(episodes.len(), 5);
    let first = episodes[0].as_object().unwrap();
    for n in 1..=8 {
        assert_eq!(
            first.get(&format!("flag_{n}")),
            Some(&Value::Null),
            "unwritten flag_{n} is sent as null"
        );
    }
}

#[tokio::test]
async fn test_show_not_found() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/shows/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = app.get("/api/shows/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_episode_flag_updates() {
    let app = spawn_app().await;
    let show_id = app.add_show().await;
    let episode_id = app.episodes(show_id).await[0]["id"].as_i64().unwrap();
    let uri = format!("/api/episodes/{episode_id}/flag");

    let (status, body) = app
        .json("PATCH", &uri, json!({"flag": "flag_9", "value": true}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .json("PATCH", &uri, json!({"flag": "flag_1", "value": true}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .json("PATCH", &uri, json!({"flag": "flag_1", "value": true}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let episode = app.episodes(show_id).await[0].clone();
    assert_eq!(episode["flag_1"], true);
    assert_eq!(episode.get("flag_2"), Some(&Value::Null));

    let (status, _) = app
        .json(
            "PATCH",
            "/api/episodes/99999/flag",
            json!({"flag": "flag_1", "value": true}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_season_flag_updates() {
    let app = spawn_app().await;
    let show_id = app.add_show().await;
    let uri = format!("/api/shows/{show_id}/season/flag");

    let (status, body) = app
        .json("PATCH", &uri, json!({"season_nb": 1, "flag": "flag_2", "value": true}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    for episode in app.episodes(show_id).await {
        let expected = if episode["season_nb"] == 1 {
            Value::Bool(true)
        } else {
            Value::Null
        };
        assert_eq!(episode["flag_2"], expected);
    }

    let (status, body) = app
        .json("PATCH", &uri, json!({"season_nb": 7, "flag": "flag_2", "value": true}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app
        .json("PATCH", &uri, json!({"season_nb": -1, "flag": "flag_2", "value": true}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_settings_labels() {
    let app = spawn_app().await;

    let (status, _) = app
        .json("PATCH", "/api/settings", json!({"flag_1": "Watched"}))
        .await;
    assert!(status.is_client_error());

    let labels = json!({
        "flag_1": "Watched",
        "flag_2": "Owned",
        "flag_3": "",
        "flag_4": "",
        "flag_5": "",
        "flag_6": "",
        "flag_7": "",
        "flag_8": "Favourite",
    });
    let (status, body) = app.json("PATCH", "/api/settings", labels.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = app.get("/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], labels);
}

#[tokio::test]
async fn test_security_headers() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");
    assert!(response.headers().contains_key("x-request-id"));
}
