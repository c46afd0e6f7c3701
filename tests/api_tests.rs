//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo test -- --ignored`

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Unique suffix for fixtures so reruns do not collide on unique columns
fn unique() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{}-{}", nanos, COUNTER.fetch_add(1, Ordering::Relaxed))
}

async fn login(client: &Client, login: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "login": login, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success(), "login failed for {}", login);
    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to get an authenticated admin client token
async fn get_admin_token(client: &Client) -> String {
    login(client, "admin", "admin").await
}

async fn create_user(client: &Client, token: &str, role: &str, team_id: Option<i64>) -> (i64, String) {
    let user_login = format!("{}-{}", role, unique());
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "login": user_login,
            "password": "secret123",
            "role": role,
            "team_id": team_id,
        }))
        .send()
        .await
        .expect("Failed to send create user request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse user response");
    (body["id"].as_i64().unwrap(), user_login)
}

async fn create_team(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/teams", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": format!("Team {}", unique()),
            "specialization": "Mechanical",
        }))
        .send()
        .await
        .expect("Failed to send create team request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse team response");
    body["id"].as_i64().unwrap()
}

async fn create_equipment(client: &Client, token: &str, team_id: i64, technician_id: i64) -> i64 {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Lathe",
            "serial_number": format!("SN-{}", unique()),
            "category": "Machining",
            "location": "Hall B",
            "ownership_type": "department",
            "department": "Production",
            "maintenance_team_id": team_id,
            "default_technician_id": technician_id,
        }))
        .send()
        .await
        .expect("Failed to send create equipment request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse equipment response");
    body["id"].as_i64().unwrap()
}

async fn create_request(client: &Client, token: &str, equipment_id: i64) -> Value {
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "subject": "Spindle vibration",
            "description": "Excessive vibration at high RPM",
            "equipment_id": equipment_id,
            "request_type": "corrective",
            "priority": "high",
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse request response")
}

async fn set_stage(client: &Client, token: &str, request_id: i64, stage: &str, confirm: bool) -> reqwest::Response {
    client
        .put(format!("{}/requests/{}/stage", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "stage": stage, "confirm": confirm }))
        .send()
        .await
        .expect("Failed to send stage update")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "login": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["login"], "admin");
    assert_eq!(body["role"], "admin");
}

/// Scenario A: a new request is auto-filled from its equipment
#[tokio::test]
#[ignore]
async fn test_request_auto_fill_from_equipment() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;

    let request = create_request(&client, &admin, equipment_id).await;
    assert_eq!(request["stage"], "new");
    assert_eq!(request["assigned_technician_id"].as_i64().unwrap(), tech_id);
    assert_eq!(request["maintenance_team_id"].as_i64().unwrap(), team_id);
    assert_eq!(request["equipment_category"], "Machining");
}

/// Scenario B: a manager can walk the forward path
#[tokio::test]
#[ignore]
async fn test_manager_can_start_progress() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let (_, manager_login) = create_user(&client, &admin, "manager", None).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;
    let request = create_request(&client, &admin, equipment_id).await;
    let request_id = request["id"].as_i64().unwrap();

    let manager = login(&client, &manager_login, "secret123").await;
    let response = set_stage(&client, &manager, request_id, "in_progress", false).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["stage"], "in_progress");
}

/// Scenario C: the workflow rejects backward transitions
#[tokio::test]
#[ignore]
async fn test_backward_transition_rejected() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;
    let request = create_request(&client, &admin, equipment_id).await;
    let request_id = request["id"].as_i64().unwrap();

    assert!(set_stage(&client, &admin, request_id, "in_progress", false).await.status().is_success());
    assert!(set_stage(&client, &admin, request_id, "repaired", false).await.status().is_success());

    let response = set_stage(&client, &admin, request_id, "new", false).await;
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("repaired") && message.contains("new"));
}

/// Same-stage write is a no-op, not an error
#[tokio::test]
#[ignore]
async fn test_same_stage_is_noop() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;
    let request = create_request(&client, &admin, equipment_id).await;
    let request_id = request["id"].as_i64().unwrap();

    let response = set_stage(&client, &admin, request_id, "new", false).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["stage"], "new");
}

/// Scenario D: the assigned technician scraps a request, the equipment is
/// deactivated, and new requests against it are refused
#[tokio::test]
#[ignore]
async fn test_scrap_cascade_deactivates_equipment() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, tech_login) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;
    let request = create_request(&client, &admin, equipment_id).await;
    let request_id = request["id"].as_i64().unwrap();

    let technician = login(&client, &tech_login, "secret123").await;

    // Unconfirmed scrap is refused before the workflow runs
    let response = set_stage(&client, &technician, request_id, "scrap", false).await;
    assert_eq!(response.status(), 400);

    let response = set_stage(&client, &technician, request_id, "scrap", true).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["stage"], "scrap");

    // The cascade deactivated the equipment
    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, equipment_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    let equipment: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(equipment["is_active"], false);

    // And inactive equipment refuses new requests
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "subject": "One more try",
            "description": "Should be refused",
            "equipment_id": equipment_id,
            "request_type": "corrective",
            "priority": "low",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

/// A basic user may not move requests regardless of transition validity
#[tokio::test]
#[ignore]
async fn test_basic_user_cannot_transition() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let (_, user_login) = create_user(&client, &admin, "user", None).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;
    let request = create_request(&client, &admin, equipment_id).await;
    let request_id = request["id"].as_i64().unwrap();

    let user = login(&client, &user_login, "secret123").await;
    let response = set_stage(&client, &user, request_id, "in_progress", false).await;
    assert_eq!(response.status(), 403);
}

/// Scenario E: a basic user sees only requests they created
#[tokio::test]
#[ignore]
async fn test_basic_user_visibility() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let (_, creator_login) = create_user(&client, &admin, "user", None).await;
    let (_, other_login) = create_user(&client, &admin, "user", None).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;

    let creator = login(&client, &creator_login, "secret123").await;
    let request = create_request(&client, &creator, equipment_id).await;
    let request_id = request["id"].as_i64().unwrap();

    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", creator))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let other = login(&client, &other_login, "secret123").await;
    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header("Authorization", format!("Bearer {}", other))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

/// Preventive requests must carry a scheduled date, and the validation error
/// names every violated field
#[tokio::test]
#[ignore]
async fn test_preventive_requires_scheduled_date() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;
    let equipment_id = create_equipment(&client, &admin, team_id, tech_id).await;

    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "subject": "",
            "description": "Quarterly lubrication",
            "equipment_id": equipment_id,
            "request_type": "preventive",
            "priority": "medium",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("scheduled_date"));
    assert!(message.contains("subject"));
}

/// Equipment ownership invariant: exactly one of department / employee
#[tokio::test]
#[ignore]
async fn test_equipment_ownership_invariant() {
    let client = Client::new();
    let admin = get_admin_token(&client).await;

    let team_id = create_team(&client, &admin).await;
    let (tech_id, _) = create_user(&client, &admin, "technician", Some(team_id)).await;

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "name": "Forklift",
            "serial_number": format!("SN-{}", unique()),
            "category": "Transport",
            "ownership_type": "department",
            // department missing
            "maintenance_team_id": team_id,
            "default_technician_id": tech_id,
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("department"));
}
