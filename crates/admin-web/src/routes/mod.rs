//! Route handlers for the admin web interface.

pub mod auth;
pub mod calls;
pub mod health;
pub mod preferences;
pub mod prompts;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Sessions
        .route("/api/auth/sign-up", post(auth::sign_up))
        .route("/api/auth/sign-in", post(auth::sign_in))
        .route("/api/auth/sign-out", post(auth::sign_out))
        // Preferences
        .route(
            "/api/preferences/ai",
            get(preferences::get_ai).put(preferences::put_ai),
        )
        .route(
            "/api/preferences/story",
            get(preferences::get_story).put(preferences::put_story),
        )
        .route("/api/voices", get(preferences::list_voices))
        // Prompts
        .route("/api/prompts", get(prompts::list_prompts))
        .route(
            "/api/prompts/:skeleton_id",
            get(prompts::get_prompt).put(prompts::put_prompt),
        )
        // Call history
        .route("/api/calls", get(calls::list_calls))
        .route("/api/calls/:user_id/:call_id", get(calls::get_call))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agent_provider::{ProviderCall, ProviderVoice, RecordingProvider};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use database::{
        call, category, skeleton, user_mirror, AgentSkeleton, CallRecord, Category, Database,
        UserAgent,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    struct TestApp {
        app: Router,
        db: Database,
        provider: RecordingProvider,
    }

    async fn test_app() -> TestApp {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let provider = RecordingProvider::with_voices(vec![ProviderVoice {
            voice_id: "11labs-Myra".to_string(),
            voice_name: "Myra".to_string(),
            provider: "elevenlabs".to_string(),
            accent: None,
            gender: Some("female".to_string()),
            age: None,
            preview_audio_url: None,
        }]);
        let state = AppState::new(db.clone(), Arc::new(provider.clone()));
        TestApp {
            app: router().with_state(state),
            db,
            provider,
        }
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn sign_up(app: &Router) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/auth/sign-up",
            None,
            Some(json!({
                "name": "Ada",
                "email": "Ada@Example.com",
                "password": "correct horse battery",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    fn agent(id: &str, category_id: &str) -> UserAgent {
        UserAgent {
            agent_id: format!("agent_{}", id),
            llm_id: format!("llm_{}", id),
            category_id: category_id.to_string(),
        }
    }

    async fn seed_users(db: &Database) {
        let pool = db.pool();
        user_mirror::create_user(
            pool,
            "u1",
            "ana@example.com",
            "Ana",
            &[agent("1", "childhood"), agent("2", "career")],
        )
        .await
        .unwrap();
        user_mirror::create_user(pool, "u2", "ben@example.com", "Ben", &[agent("3", "childhood")])
            .await
            .unwrap();
        user_mirror::create_user(pool, "u3", "cy@example.com", "Cy", &[])
            .await
            .unwrap();
    }

    async fn seed_prompt(db: &Database) {
        let pool = db.pool();
        category::create_category(
            pool,
            &Category {
                id: "childhood".to_string(),
                title: "Childhood".to_string(),
                description: "Early memories".to_string(),
                emoji: "🧸".to_string(),
            },
        )
        .await
        .unwrap();
        skeleton::create_skeleton(
            pool,
            &AgentSkeleton {
                id: "sk-childhood".to_string(),
                category_id: "childhood".to_string(),
                language: "en-US".to_string(),
                interruption_sensitivity: 1.0,
                model: "gpt-4o".to_string(),
                prompt: "Ask about early memories.".to_string(),
                updated_at: String::new(),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_health() {
        let t = test_app().await;
        let (status, body) = send(&t.app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        let t = test_app().await;
        for uri in ["/api/preferences/ai", "/api/prompts", "/api/calls", "/api/voices"] {
            let (status, body) = send(&t.app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["error"], "Please sign in to continue.");
        }

        let (status, _) = send(&t.app, "GET", "/api/calls", Some("made-up"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sign_up_sign_in_sign_out() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;

        // Same address in a different case is a duplicate.
        let (status, body) = send(
            &t.app,
            "POST",
            "/api/auth/sign-up",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "another password" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "An account with this email already exists.");

        let (status, body) = send(
            &t.app,
            "POST",
            "/api/auth/sign-up",
            None,
            Some(json!({ "name": "Bo", "email": "bo@example.com", "password": "short" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Password must be at least 8 characters.");

        let (status, body) = send(
            &t.app,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password.");

        let (status, body) = send(
            &t.app,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(json!({ "email": "ada@example.com", "password": "correct horse battery" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["admin"].get("password_hash").is_none());

        let (status, body) = send(&t.app, "POST", "/api/auth/sign-out", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signed_out"], true);

        let (status, body) = send(&t.app, "GET", "/api/preferences/story", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Your session is no longer valid. Please sign in again.");

        let (status, body) =
            send(&t.app, "GET", "/api/preferences/story", Some("never-issued"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Your session is no longer valid. Please sign in again.");
    }

    #[tokio::test]
    async fn test_ai_view_defaults_and_catalog() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;

        let (status, body) = send(&t.app, "GET", "/api/preferences/ai", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "ready");
        assert_eq!(body["data"]["saved"], false);
        assert_eq!(body["data"]["preferences"]["voice"]["voice_id"], "11labs-Adrian");
        assert_eq!(body["data"]["preferences"]["follow_up_intensity"], "medium");
        assert_eq!(body["data"]["voices"][0]["voice_id"], "11labs-Myra");

        t.provider.fail_catalog().await;
        let (status, body) = send(&t.app, "GET", "/api/preferences/ai", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "ready");
        assert_eq!(body["data"]["voices"], json!([]));
        assert_eq!(body["notice"]["level"], "error");

        let (status, _) = send(&t.app, "GET", "/api/voices", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_ai_save_broadcasts_and_reports_partial_failure() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;
        seed_users(&t.db).await;
        t.provider.fail_resource("agent_2").await;

        let (status, body) = send(
            &t.app,
            "PUT",
            "/api/preferences/ai",
            Some(&token),
            Some(json!({
                "voice": {
                    "voice_id": "11labs-Myra",
                    "voice_name": "Myra",
                    "provider": "elevenlabs",
                },
                "follow_up_intensity": "high",
                "conversation_style": "empathetic",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "ready");
        assert_eq!(body["data"]["saved"], true);
        assert_eq!(body["notice"]["level"], "success");
        assert_eq!(body["notice"]["warning"], "Some updates may not have propagated.");

        // Three agents across three users, one of them failing.
        assert_eq!(t.provider.update_count().await, 3);

        for id in ["u1", "u2", "u3"] {
            let user = user_mirror::get_user(t.db.pool(), id).await.unwrap();
            let prefs = user.ai_preferences.unwrap();
            assert_eq!(prefs.voice.voice_id, "11labs-Myra");
        }

        let (_, body) = send(&t.app, "GET", "/api/preferences/ai", Some(&token), None).await;
        assert_eq!(body["data"]["preferences"]["conversation_style"], "empathetic");
    }

    #[tokio::test]
    async fn test_ai_save_skips_the_voice_catalog() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;
        seed_users(&t.db).await;
        t.provider.fail_catalog().await;

        let (status, body) = send(
            &t.app,
            "PUT",
            "/api/preferences/ai",
            Some(&token),
            Some(json!({
                "voice": {
                    "voice_id": "11labs-Myra",
                    "voice_name": "Myra",
                    "provider": "elevenlabs",
                },
                "follow_up_intensity": "low",
                "conversation_style": "professional",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["saved"], true);
        assert_eq!(body["notice"]["level"], "success");
        assert!(body["data"].get("voices").is_none());

        let calls = t.provider.calls().await;
        assert!(!calls.iter().any(|call| matches!(call, ProviderCall::ListVoices)));
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn test_story_save_touches_no_agents() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;
        seed_users(&t.db).await;

        let (status, body) = send(
            &t.app,
            "PUT",
            "/api/preferences/story",
            Some(&token),
            Some(json!({
                "narrative_style": "third_person",
                "length": "long",
                "detail": "rich",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notice"]["message"], "Story preferences saved.");
        assert!(body["notice"].get("warning").is_none());
        assert_eq!(t.provider.update_count().await, 0);

        let user = user_mirror::get_user(t.db.pool(), "u3").await.unwrap();
        assert_eq!(
            serde_json::to_value(user.story_preferences.unwrap()).unwrap()["length"],
            "long"
        );
    }

    #[tokio::test]
    async fn test_prompt_save_updates_matching_category() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;
        seed_users(&t.db).await;
        seed_prompt(&t.db).await;

        let (status, body) = send(&t.app, "GET", "/api/prompts", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["category"]["title"], "Childhood");

        let (status, body) = send(
            &t.app,
            "PUT",
            "/api/prompts/sk-childhood",
            Some(&token),
            Some(json!({
                "language": "es-ES",
                "interruption_sensitivity": 0.4,
                "model": "gpt-4o-mini",
                "prompt": "Pregunta por sus primeros recuerdos.",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "ready");
        assert_eq!(body["data"]["skeleton"]["language"], "es-ES");
        assert_eq!(body["notice"]["message"], "Prompt saved.");

        // agent_1 and agent_3 are childhood agents; agent_2 is not.
        let calls = t.provider.calls().await;
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|call| match call {
            ProviderCall::UpdateAgent { agent_id, .. } => agent_id != "agent_2",
            ProviderCall::UpdateLlm { llm_id, .. } => llm_id != "llm_2",
            ProviderCall::ListVoices => false,
        }));
    }

    #[tokio::test]
    async fn test_prompt_validation_and_missing_skeleton() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;

        let (status, _) = send(
            &t.app,
            "PUT",
            "/api/prompts/sk-childhood",
            Some(&token),
            Some(json!({
                "language": "en-US",
                "interruption_sensitivity": 2.0,
                "model": "gpt-4o",
                "prompt": "Hi",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&t.app, "GET", "/api/prompts/nope", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["state"], "error");
        assert_eq!(body["retry"], "/api/prompts/nope");
    }

    fn call_record(i: usize) -> CallRecord {
        CallRecord {
            id: format!("call-{:02}", i),
            user_id: if i % 2 == 0 { "u1" } else { "u2" }.to_string(),
            category_id: Some("childhood".to_string()),
            started_at: format!("2026-03-01 09:{:02}:00", i),
            ended_at: None,
            updated_at: format!("2026-03-01 09:{:02}:00", i),
            transcript: format!("transcript {}", i),
            turns: Vec::new(),
            recording_url: None,
            video_url: None,
            session_id: None,
            story_id: None,
        }
    }

    #[tokio::test]
    async fn test_call_history_pages_and_viewer() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;
        seed_users(&t.db).await;

        for i in 0..12 {
            call::insert_call(t.db.pool(), &call_record(i)).await.unwrap();
        }

        let (status, body) = send(&t.app, "GET", "/api/calls", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calls"].as_array().unwrap().len(), 10);
        assert_eq!(body["calls"][0]["id"], "call-11");
        assert_eq!(body["calls"][0]["user_email"], "ben@example.com");
        assert_eq!(body["has_more"], true);

        let (_, body) = send(&t.app, "GET", "/api/calls?pages=2", Some(&token), None).await;
        assert_eq!(body["calls"].as_array().unwrap().len(), 12);
        assert_eq!(body["total"], 12);
        assert_eq!(body["has_more"], false);

        let (status, body) = send(&t.app, "GET", "/api/calls/u1/call-04", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transcript"], "transcript 4");
        assert_eq!(body["user_email"], "ana@example.com");

        let (status, _) = send(&t.app, "GET", "/api/calls/u2/call-04", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_load_more_extends_the_window_already_shown() {
        let t = test_app().await;
        let token = sign_up(&t.app).await;
        seed_users(&t.db).await;
        for i in 0..12 {
            call::insert_call(t.db.pool(), &call_record(i)).await.unwrap();
        }

        let (_, first) = send(&t.app, "GET", "/api/calls", Some(&token), None).await;
        let first_ids: Vec<Value> = first["calls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].clone())
            .collect();
        assert_eq!(first_ids.len(), 10);

        // A newer call lands while the first page is on screen.
        call::insert_call(t.db.pool(), &call_record(30)).await.unwrap();

        let (status, grown) = send(&t.app, "GET", "/api/calls?pages=2", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let grown_ids: Vec<Value> = grown["calls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].clone())
            .collect();
        assert_eq!(grown_ids[..10], first_ids[..]);
        assert_eq!(grown_ids.len(), 12);
        assert!(!grown_ids.contains(&json!("call-30")));
        assert_eq!(grown["total"], 12);
        assert_eq!(grown["has_more"], false);

        // Another session starts from a fresh read.
        let (_, other) = send(
            &t.app,
            "POST",
            "/api/auth/sign-in",
            None,
            Some(json!({ "email": "ada@example.com", "password": "correct horse battery" })),
        )
        .await;
        let other_token = other["token"].as_str().unwrap().to_string();
        let (_, other) = send(&t.app, "GET", "/api/calls?pages=2", Some(&other_token), None).await;
        assert_eq!(other["total"], 13);
        assert_eq!(other["calls"][0]["id"], "call-30");

        // Going back to the first page re-reads the collection.
        let (_, reloaded) = send(&t.app, "GET", "/api/calls", Some(&token), None).await;
        assert_eq!(reloaded["total"], 13);
        assert_eq!(reloaded["calls"][0]["id"], "call-30");
    }
}
