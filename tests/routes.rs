use std::sync::Arc;

use actix_identity::{Identity, IdentityMiddleware};
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, test, web};
use enoteca_backoffice::models::auth::AuthenticatedUser;
use enoteca_backoffice::models::config::ServerConfig;
use enoteca_backoffice::notifications::mailer::{Mailer, RecordingMailer};
use enoteca_backoffice::repository::DieselRepository;
use enoteca_backoffice::routes;
use serde_json::{Value, json};

mod common;

const SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-0000";

fn server_config(database_url: &str) -> ServerConfig {
    ServerConfig {
        domain: "localhost".into(),
        address: "127.0.0.1".into(),
        port: 8080,
        database_url: database_url.into(),
        zmq_emailer_pub: "inproc://unused".into(),
        secret: SECRET.into(),
        auth_service_url: "http://localhost:8000".into(),
        venue_name: "Enoteca Decanter Santos".into(),
    }
}

fn bearer(user: &AuthenticatedUser) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", user.to_jwt(SECRET).unwrap()))
}

/// Stands in for the auth service: stores the posted token as the session identity.
async fn login(req: HttpRequest, token: String) -> HttpResponse {
    match Identity::login(&req.extensions(), token) {
        Ok(_) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

macro_rules! test_app {
    ($test_db:expr, $mailer:expr) => {{
        let mailer: Arc<dyn Mailer> = $mailer;
        test::init_service(
            App::new()
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(
                        CookieSessionStore::default(),
                        Key::from(SECRET.as_bytes()),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .app_data(web::Data::new(DieselRepository::new($test_db.pool())))
                .app_data(web::Data::new(server_config("unused.db")))
                .app_data(web::Data::from(mailer))
                .route("/login", web::post().to(login))
                .service(web::scope("/api").configure(routes::configure)),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_requests_without_token_are_rejected() {
    let test_db = common::TestDb::new("test_routes_unauthenticated.db");
    let app = test_app!(test_db, Arc::new(RecordingMailer::new()));

    let req = test::TestRequest::get().uri("/api/clients").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/clients")
        .insert_header((AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_session_identity_is_accepted() {
    let test_db = common::TestDb::new("test_routes_session.db");
    let app = test_app!(test_db, Arc::new(RecordingMailer::new()));
    let token = common::operator().to_jwt(SECRET).unwrap();

    let req = test::TestRequest::post()
        .uri("/login")
        .set_payload(token)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "id")
        .unwrap()
        .into_owned();

    let req = test::TestRequest::get()
        .uri("/api/clients")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let clients: Value = test::read_body_json(resp).await;
    assert_eq!(clients, json!([]));
}

#[actix_web::test]
async fn test_booking_flow_over_http() {
    let test_db = common::TestDb::new("test_routes_booking.db");
    let app = test_app!(test_db, Arc::new(RecordingMailer::new()));
    let operator = common::operator();

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .insert_header(bearer(&operator))
        .set_json(json!({
            "full_name": "Ana Souza",
            "phone": "11999990000",
            "email": "ana@example.com"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let client: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .insert_header(bearer(&operator))
        .set_json(json!({ "full_name": "Outra Ana", "phone": "11999990000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/menus")
        .insert_header(bearer(&operator))
        .set_json(json!({ "name": "Degustação", "price_per_person": 8500 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let menu: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/dishes")
        .insert_header(bearer(&operator))
        .set_json(json!({
            "menu_id": menu["id"],
            "name": "Risoto de funghi",
            "course": "main"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let booking = json!({
        "client_id": client["id"],
        "menu_id": menu["id"],
        "event_type": "Casamento",
        "venue": "hall_a",
        "headcount": 50,
        "event_date": "2025-03-15",
        "event_time": "14:00",
        "price_per_person": 8500,
        "drinks_package": true
    });
    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(bearer(&operator))
        .set_json(&booking)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event: Value = test::read_body_json(resp).await;
    assert_eq!(event["total"], 742500);
    assert_eq!(event["status"], "under_review");
    let event_id = event["id"].as_i64().unwrap();

    let mut clash = booking.clone();
    clash["event_time"] = json!("17:30");
    let req = test::TestRequest::post()
        .uri("/api/events")
        .insert_header(bearer(&operator))
        .set_json(&clash)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Conflito de agenda"));

    let req = test::TestRequest::get()
        .uri("/api/events?date_from=2025-03-01&date_to=2025-03-31&venue=hall_a")
        .insert_header(bearer(&operator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{event_id}/details"))
        .insert_header(bearer(&operator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let details: Value = test::read_body_json(resp).await;
    assert_eq!(details["dishes"][0]["name"], "Risoto de funghi");
    assert_eq!(details["client"]["full_name"], "Ana Souza");

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{event_id}/proposal.pdf"))
        .insert_header(bearer(&operator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/pdf");
    let disposition = resp
        .headers()
        .get(CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("proposta-evento-{event_id}.pdf")));
    let pdf = test::read_body(resp).await;
    assert!(pdf.starts_with(b"%PDF"));

    let req = test::TestRequest::get()
        .uri("/api/reports/events?status=under_review")
        .insert_header(bearer(&operator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let report: Value = test::read_body_json(resp).await;
    assert_eq!(report["summary"]["under_review"], 1);

    let req = test::TestRequest::get()
        .uri("/api/reports/events.csv")
        .insert_header(bearer(&operator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "text/csv");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/events/{event_id}"))
        .insert_header(bearer(&operator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/events/{event_id}"))
        .insert_header(bearer(&operator))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_admin_only_operations() {
    let test_db = common::TestDb::new("test_routes_admin.db");
    let mailer = Arc::new(RecordingMailer::new());
    let app = test_app!(test_db, mailer.clone());

    let req = test::TestRequest::put()
        .uri("/api/settings/agenda_recipients")
        .insert_header(bearer(&common::operator()))
        .set_json(json!({ "value": "ops@enoteca.test" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri("/api/settings/agenda_recipients")
        .insert_header(bearer(&common::admin()))
        .set_json(json!({ "value": "ops@enoteca.test" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/settings/agenda_recipients")
        .insert_header(bearer(&common::operator()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let setting: Value = test::read_body_json(resp).await;
    assert_eq!(setting["value"], "ops@enoteca.test");

    let req = test::TestRequest::post()
        .uri("/api/agenda/send")
        .insert_header(bearer(&common::admin()))
        .set_json(json!({ "date": "2025-03-15" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let dispatch: Value = test::read_body_json(resp).await;
    assert_eq!(dispatch["total_events"], 0);
    assert_eq!(dispatch["recipients"], json!(["ops@enoteca.test"]));
    assert_eq!(mailer.sent().len(), 1);

    let req = test::TestRequest::post()
        .uri("/api/reminders/send")
        .insert_header(bearer(&common::admin()))
        .set_json(json!({ "today": "2025-03-08" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["sent"], 0);
}
