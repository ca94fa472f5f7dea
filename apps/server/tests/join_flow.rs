use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use giveaway_core::campaigns::CampaignLimits;
use giveaway_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        limits: CampaignLimits::default(),
        rng_seed: Some(7),
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (u16, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/users",
        Some(json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) })),
    )
    .await;
    assert_eq!(status, 201, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn create_campaign(app: &Router, payload: Value) -> String {
    let (status, body) = send(app, Method::POST, "/api/v1/campaigns", Some(payload)).await;
    assert_eq!(status, 201, "{body}");
    body["id"].as_str().unwrap().to_string()
}

fn join_body(user_id: &str) -> Value {
    json!({
        "userId": user_id,
        "fullName": "Ada Obi",
        "phoneNumber": "+2348030000000",
        "bankName": "First Bank",
        "accountNumber": "0123456789",
        "accountName": "Ada Obi",
        "hasFollowed": true
    })
}

async fn join(app: &Router, campaign_id: &str, user_id: &str) -> (u16, Value) {
    send(
        app,
        Method::POST,
        &format!("/api/v1/campaigns/{}/participants", campaign_id),
        Some(join_body(user_id)),
    )
    .await
}

async fn balance(app: &Router, user_id: &str) -> i64 {
    let (status, body) = send(app, Method::GET, &format!("/api/v1/users/{}", user_id), None).await;
    assert_eq!(status, 200);
    body["balance"].as_i64().unwrap()
}

fn equal_campaign() -> Value {
    json!({
        "title": "Weekend airtime",
        "creatorId": "creator-1",
        "creatorName": "Creator",
        "totalAmount": 2000,
        "distributionRule": "equal",
        "maxParticipants": 2
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn healthz_works() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test(flavor = "multi_thread")]
async fn equal_campaign_settles_on_the_last_join() {
    let (app, _tmp) = build_test_router().await;
    let campaign_id = create_campaign(&app, equal_campaign()).await;
    let a = register(&app, "Ada").await;
    let b = register(&app, "Bola").await;

    let (status, first) = join(&app, &campaign_id, &a).await;
    assert_eq!(status, 200, "{first}");
    assert_eq!(first["success"], true);
    assert_eq!(first["currentParticipants"], 1);
    assert_eq!(first["remainingParticipants"], 1);
    assert_eq!(first["settlement"]["state"], "notTriggered");

    let (status, second) = join(&app, &campaign_id, &b).await;
    assert_eq!(status, 200, "{second}");
    assert_eq!(second["remainingParticipants"], 0);
    assert_eq!(second["settlement"]["state"], "completed");
    assert_eq!(second["settlement"]["amountPerWinner"], 1000);

    let (_, status_view) = send(
        &app,
        Method::GET,
        &format!("/api/v1/campaigns/{}/status", campaign_id),
        None,
    )
    .await;
    assert_eq!(status_view["status"], "completed");
    assert_eq!(status_view["currentParticipants"], 2);
    assert_eq!(balance(&app, &a).await, 1000);
    assert_eq!(balance(&app, &b).await, 1000);

    // A third user arrives after completion.
    let c = register(&app, "Chidi").await;
    let (status, rejected) = join(&app, &campaign_id, &c).await;
    assert_eq!(status, 409);
    assert_eq!(rejected["kind"], "campaignNotActive");
    assert_eq!(balance(&app, &c).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn order_campaign_pays_the_first_joiners() {
    let (app, _tmp) = build_test_router().await;
    let campaign_id = create_campaign(
        &app,
        json!({
            "title": "First two win",
            "creatorId": "creator-1",
            "creatorName": "Creator",
            "totalAmount": 4000,
            "distributionRule": "order",
            "beneficiaries": 2,
            "maxParticipants": 4
        }),
    )
    .await;

    let mut users = Vec::new();
    for name in ["Ada", "Bola", "Chidi", "Dayo"] {
        let id = register(&app, name).await;
        let (status, body) = join(&app, &campaign_id, &id).await;
        assert_eq!(status, 200, "{body}");
        users.push(id);
    }

    let balances = [
        balance(&app, &users[0]).await,
        balance(&app, &users[1]).await,
        balance(&app, &users[2]).await,
        balance(&app, &users[3]).await,
    ];
    assert_eq!(balances, [2000, 2000, 0, 0]);

    let (status, settlement) = send(
        &app,
        Method::GET,
        &format!("/api/v1/campaigns/{}/settlement", campaign_id),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(settlement["winnerCount"], 2);
    assert_eq!(settlement["winners"][0]["userId"], users[0].as_str());
    assert_eq!(settlement["winners"][1]["userId"], users[1].as_str());
}

#[tokio::test(flavor = "multi_thread")]
async fn second_join_by_the_same_user_is_rejected() {
    let (app, _tmp) = build_test_router().await;
    let campaign_id = create_campaign(&app, equal_campaign()).await;
    let a = register(&app, "Ada").await;

    let (status, _) = join(&app, &campaign_id, &a).await;
    assert_eq!(status, 200);
    let (status, body) = join(&app, &campaign_id, &a).await;
    assert_eq!(status, 409);
    assert_eq!(body["kind"], "duplicateJoin");

    let (_, participants) = send(
        &app,
        Method::GET,
        &format!("/api/v1/campaigns/{}/participants", campaign_id),
        None,
    )
    .await;
    assert_eq!(participants.as_array().unwrap().len(), 1);
    assert_eq!(balance(&app, &a).await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_joins_for_the_last_slot_settle_once() {
    let (app, _tmp) = build_test_router().await;
    let campaign_id = create_campaign(&app, equal_campaign()).await;
    let first = register(&app, "Ada").await;
    let (status, _) = join(&app, &campaign_id, &first).await;
    assert_eq!(status, 200);

    let b = register(&app, "Bola").await;
    let c = register(&app, "Chidi").await;
    let racers = [b.clone(), c.clone()].map(|user_id| {
        let app = app.clone();
        let campaign_id = campaign_id.clone();
        tokio::spawn(async move { join(&app, &campaign_id, &user_id).await })
    });

    let mut statuses = Vec::new();
    for racer in racers {
        let (status, body) = racer.await.unwrap();
        if status == 200 {
            assert_eq!(body["settlement"]["state"], "completed");
        } else {
            assert_eq!(body["kind"], "campaignNotActive");
        }
        statuses.push(status);
    }
    statuses.sort();
    assert_eq!(statuses, vec![200, 409]);

    let credited = balance(&app, &first).await + balance(&app, &b).await + balance(&app, &c).await;
    assert_eq!(credited, 2000);
    assert_eq!(balance(&app, &first).await, 1000);

    let (status, retry) = send(
        &app,
        Method::POST,
        &format!("/api/v1/campaigns/{}/settle", campaign_id),
        None,
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(retry["kind"], "alreadySettled");
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_requests_are_reported_as_validation_errors() {
    let (app, _tmp) = build_test_router().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/campaigns",
        Some(json!({
            "title": "Timed",
            "creatorId": "creator-1",
            "creatorName": "Creator",
            "totalAmount": 2000,
            "distributionRule": "time",
            "maxParticipants": 2
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["kind"], "validation");

    let campaign_id = create_campaign(&app, equal_campaign()).await;
    let a = register(&app, "Ada").await;
    let mut payload = join_body(&a);
    payload["hasFollowed"] = json!(false);
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/campaigns/{}/participants", campaign_id),
        Some(payload),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["kind"], "validation");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_campaign_is_not_found() {
    let (app, _tmp) = build_test_router().await;
    let a = register(&app, "Ada").await;

    let (status, body) = join(&app, "missing", &a).await;
    assert_eq!(status, 404);
    assert_eq!(body["kind"], "notFound");

    let (status, _) = send(&app, Method::GET, "/api/v1/campaigns/missing/status", None).await;
    assert_eq!(status, 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_campaign_rejects_joins_and_lists_by_creator() {
    let (app, _tmp) = build_test_router().await;
    let campaign_id = create_campaign(&app, equal_campaign()).await;
    let mut other = equal_campaign();
    other["creatorId"] = json!("creator-2");
    create_campaign(&app, other).await;

    let (status, cancelled) = send(
        &app,
        Method::POST,
        &format!("/api/v1/campaigns/{}/cancel", campaign_id),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(cancelled["status"], "cancelled");

    let a = register(&app, "Ada").await;
    let (status, body) = join(&app, &campaign_id, &a).await;
    assert_eq!(status, 409);
    assert_eq!(body["kind"], "campaignNotActive");

    let (status, listed) =
        send(&app, Method::GET, "/api/v1/campaigns?creatorId=creator-1", None).await;
    assert_eq!(status, 200);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], campaign_id.as_str());
    assert_eq!(listed[0]["currentParticipants"], 0);
}
