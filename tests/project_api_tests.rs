
use test_utils::{sample_project, TestApp};
use uuid::Uuid;

async fn create_project(
    app: &TestApp,
    token: &str,
    payload: &serde_json::Value,
) -> serde_json::Value {
    let res = app
        .client
        .post(format!("{}/projects", app.address))
        .bearer_auth(token)
        .json(payload)
        .send()
        .await
        .expect("create request failed");

    assert_eq!(res.status(), 201, "create should return 201 Created");
    res.json().await.unwrap()
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let token = app.admin_token().await;

    let payload = sample_project(&format!("Round trip {}", Uuid::new_v4()));
    let created = create_project(&app, &token, &payload).await;

    assert!(created["id"].is_string());
    assert_eq!(created["title"], payload["title"]);
    assert_eq!(created["demoUrl"], payload["demoUrl"]);
    assert_eq!(created["category"], "web");
    assert!(created["createdAt"].is_string());

    let fetched: serde_json::Value = app
        .client
        .get(format!("{}/projects/{}", app.address, created["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_is_ordered_most_recent_first() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let token = app.admin_token().await;

    let first_title = format!("Older {}", Uuid::new_v4());
    let second_title = format!("Newer {}", Uuid::new_v4());
    create_project(&app, &token, &sample_project(&first_title)).await;
    create_project(&app, &token, &sample_project(&second_title)).await;

    let res = app
        .client
        .get(format!("{}/projects", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let projects: Vec<serde_json::Value> = res.json().await.unwrap();
    let position = |title: &str| {
        projects
            .iter()
            .position(|p| p["title"] == title)
            .unwrap_or_else(|| panic!("project {title} missing from list"))
    };

    assert!(
        position(&second_title) < position(&first_title),
        "later creations must come first"
    );
}

#[tokio::test]
async fn update_preserves_identity_and_advances_timestamp() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let token = app.admin_token().await;

    let created = create_project(
        &app,
        &token,
        &sample_project(&format!("Updatable {}", Uuid::new_v4())),
    )
    .await;

    let res = app
        .client
        .put(format!("{}/projects/{}", app.address, created["id"].as_str().unwrap()))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "description": "A refreshed description for the project",
            "featured": true,
            "demoUrl": null
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["title"], created["title"], "unspecified fields stay put");
    assert_eq!(updated["description"], "A refreshed description for the project");
    assert_eq!(updated["featured"], true);
    assert!(updated["demoUrl"].is_null(), "explicit null clears the field");
    let parse = |v: &serde_json::Value| {
        chrono::DateTime::parse_from_rfc3339(v.as_str().unwrap()).unwrap()
    };
    assert!(
        parse(&updated["updatedAt"]) >= parse(&created["updatedAt"]),
        "update timestamp must advance"
    );
}

#[tokio::test]
async fn delete_then_fetch_returns_not_found() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let token = app.admin_token().await;

    let created = create_project(
        &app,
        &token,
        &sample_project(&format!("Disposable {}", Uuid::new_v4())),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let res = app
        .client
        .delete(format!("{}/projects/{}", app.address, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"success": true}));

    let res = app
        .client
        .get(format!("{}/projects/{}", app.address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn invalid_payload_is_rejected_and_not_persisted() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let token = app.admin_token().await;

    let marker = format!("Invalid {}", Uuid::new_v4());
    let mut payload = sample_project(&marker);
    payload["title"] = serde_json::json!("");
    payload["imageUrl"] = serde_json::json!("not a url");

    let res = app
        .client
        .post(format!("{}/projects", app.address))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(body["details"].is_array(), "field errors are listed");

    let projects: Vec<serde_json::Value> = app
        .client
        .get(format!("{}/projects", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        projects.iter().all(|p| p["title"] != marker.as_str()),
        "rejected payload must not be persisted"
    );
}

#[tokio::test]
async fn empty_optional_urls_are_stored_as_absent() {
    let Some(app) = TestApp::try_spawn().await else { return };
    let token = app.admin_token().await;

    let mut payload = sample_project(&format!("Blank URLs {}", Uuid::new_v4()));
    payload["demoUrl"] = serde_json::json!("");
    payload["repoUrl"] = serde_json::json!("");

    let created = create_project(&app, &token, &payload).await;
    assert!(created["demoUrl"].is_null());
    assert!(created["repoUrl"].is_null());
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let Some(app) = TestApp::try_spawn().await else { return };

    let res = app
        .client
        .get(format!("{}/projects/not-a-uuid", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn mutations_require_a_valid_token() {
    let Some(app) = TestApp::try_spawn().await else { return };

    let marker = format!("Unauthorized {}", Uuid::new_v4());
    let res = app
        .client
        .post(format!("{}/projects", app.address))
        .json(&sample_project(&marker))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "missing token");

    let res = app
        .client
        .put(format!("{}/projects/{}", app.address, Uuid::new_v4()))
        .bearer_auth("garbage-token")
        .json(&serde_json::json!({"title": "Nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "invalid token");

    let res = app
        .client
        .delete(format!("{}/projects/{}", app.address, Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "missing token on delete");

    let projects: Vec<serde_json::Value> = app
        .client
        .get(format!("{}/projects", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        projects.iter().all(|p| p["title"] != marker.as_str()),
        "unauthorized create must not persist anything"
    );
}
