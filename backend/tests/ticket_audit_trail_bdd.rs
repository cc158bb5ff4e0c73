//! Behaviour coverage for the ticket audit trail.

use std::future::Future;
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use ticketrax::inbound::http::health::HealthState;
use ticketrax::inbound::http::routes::build_app;
use ticketrax::outbound::memory::InMemoryStore;
use ticketrax::test_support::{MutableClock, memory_state, seed_user};

#[derive(Debug)]
struct Snapshot {
    status: u16,
    body: Option<Value>,
}

struct World {
    store: Arc<InMemoryStore>,
    clock: Arc<MutableClock>,
    token: Option<String>,
    ticket_id: Option<String>,
    last: Option<Snapshot>,
}

fn run_async<T>(future: impl Future<Output = T>) -> T {
    tokio::runtime::Runtime::new()
        .expect("runtime")
        .block_on(future)
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}

fn parse_json_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(bytes).expect("json body"))
    }
}

async fn execute(world: &World, req: actix_test::TestRequest) -> Snapshot {
    let app = actix_test::init_service(build_app(
        web::Data::new(memory_state(&world.store, world.clock.clone())),
        web::Data::new(HealthState::new()),
    ))
    .await;
    execute_on(&app, req).await
}

async fn execute_on<S>(app: &S, req: actix_test::TestRequest) -> Snapshot
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = actix_test::call_service(app, req.to_request()).await;
    Snapshot {
        status: res.status().as_u16(),
        body: parse_json_body(actix_test::read_body(res).await.as_ref()),
    }
}

impl World {
    fn ticket_uri(&self) -> String {
        let id = self.ticket_id.as_deref().expect("a ticket was reported");
        format!("/api/v1/tickets/{id}")
    }

    fn with_token(&self, req: actix_test::TestRequest) -> actix_test::TestRequest {
        match &self.token {
            Some(token) => req.insert_header(("Authorization", format!("Token {token}"))),
            None => req,
        }
    }

    fn record(&mut self, kind: &str, message: &str) {
        self.clock.advance_seconds(1);
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/activities")
            .set_json(json!({
                "ticket": self.ticket_id,
                "type": kind,
                "message": message,
                "created_by": "Support desk"
            }));
        let req = self.with_token(req);
        self.last = Some(run_async(execute(self, req)));
    }

    fn ticket_activities(&self) -> Vec<Value> {
        let uri = format!("{}/activities", self.ticket_uri());
        let snapshot = run_async(execute(self, actix_test::TestRequest::get().uri(&uri)));
        assert_eq!(snapshot.status, 200);
        snapshot
            .body
            .and_then(|body| body.as_array().cloned())
            .expect("activity list")
    }
}

#[fixture]
fn world() -> World {
    World {
        store: Arc::new(InMemoryStore::new()),
        clock: Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        )),
        token: None,
        ticket_id: None,
        last: None,
    }
}

#[given("an empty ticket desk")]
fn an_empty_ticket_desk(world: &mut World) {
    assert_eq!(run_async(world.store.activity_count()), 0);
}

#[given("a signed-in agent")]
fn a_signed_in_agent(world: &mut World) {
    let agent = run_async(seed_user(&world.store, "ada", "ada@example.com", "pa55word"));
    let snapshot = run_async(execute(
        world,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth")
            .set_json(json!({ "email": agent.profile.email, "password": agent.password })),
    ));
    assert_eq!(snapshot.status, 200);
    let token = snapshot
        .body
        .as_ref()
        .and_then(|body| body.get("token"))
        .and_then(Value::as_str)
        .expect("token");
    world.token = Some(token.to_owned());
}

#[when("an anonymous caller reports {title}")]
fn an_anonymous_caller_reports(world: &mut World, title: String) {
    let snapshot = run_async(execute(
        world,
        actix_test::TestRequest::post()
            .uri("/api/v1/tickets")
            .set_json(json!({
                "title": unquote(&title),
                "description": "Reported at the front desk",
                "created_by_name": "Kim Lee",
                "created_by_email": "kim@example.com"
            })),
    ));
    world.ticket_id = snapshot
        .body
        .as_ref()
        .and_then(|body| body.get("id"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    world.last = Some(snapshot);
}

#[when("the agent records a {kind} saying {message}")]
fn the_agent_records(world: &mut World, kind: String, message: String) {
    assert!(world.token.is_some(), "agent must be signed in");
    world.record(kind.trim(), unquote(&message));
}

#[when("an anonymous caller records a {kind} saying {message}")]
fn an_anonymous_caller_records(world: &mut World, kind: String, message: String) {
    world.token = None;
    world.record(kind.trim(), unquote(&message));
}

#[when("the agent deletes the ticket")]
fn the_agent_deletes_the_ticket(world: &mut World) {
    let req = world.with_token(actix_test::TestRequest::delete().uri(&world.ticket_uri()));
    world.last = Some(run_async(execute(world, req)));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &mut World, status: u16) {
    let last = world.last.as_ref().expect("a request was made");
    assert_eq!(last.status, status, "{:?}", last.body);
}

#[then("the ticket is new with medium priority")]
fn the_ticket_is_new_with_medium_priority(world: &mut World) {
    let body = world
        .last
        .as_ref()
        .and_then(|last| last.body.as_ref())
        .expect("ticket body");
    assert_eq!(body["status"], "new");
    assert_eq!(body["priority"], "medium");
}

#[then("the ticket has {count} activities")]
fn the_ticket_has_activities(world: &mut World, count: usize) {
    assert_eq!(world.ticket_activities().len(), count);
}

#[then("the latest activity is a {kind} saying {message}")]
fn the_latest_activity_is(world: &mut World, kind: String, message: String) {
    let activities = world.ticket_activities();
    let latest = activities.last().expect("at least one activity");
    assert_eq!(latest["type"], kind.trim());
    assert_eq!(latest["message"], unquote(&message));
    assert_eq!(latest["created_by"], "Kim Lee");
}

#[then("the ticket activities are in chronological order")]
fn the_ticket_activities_are_in_chronological_order(world: &mut World) {
    let stamps: Vec<String> = world
        .ticket_activities()
        .iter()
        .filter_map(|activity| activity["created_at"].as_str().map(ToOwned::to_owned))
        .collect();
    let mut sorted = stamps.clone();
    sorted.sort_unstable();
    assert_eq!(stamps, sorted);
    assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
}

#[then("no activities remain")]
fn no_activities_remain(world: &mut World) {
    assert_eq!(run_async(world.store.activity_count()), 0);
    let snapshot = run_async(execute(
        world,
        actix_test::TestRequest::get().uri(&world.ticket_uri()),
    ));
    assert_eq!(snapshot.status, 404);
}

#[scenario(
    path = "tests/features/ticket_audit_trail.feature",
    name = "Anonymous ticket creation seeds the audit trail"
)]
fn anonymous_ticket_creation_seeds_the_audit_trail(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/ticket_audit_trail.feature",
    name = "Signed-in agents append activities in order"
)]
fn signed_in_agents_append_activities_in_order(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/ticket_audit_trail.feature",
    name = "Anonymous callers cannot append activities"
)]
fn anonymous_callers_cannot_append_activities(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/ticket_audit_trail.feature",
    name = "Deleting a ticket removes its audit trail"
)]
fn deleting_a_ticket_removes_its_audit_trail(world: World) {
    drop(world);
}
