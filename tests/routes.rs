use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use chrono::Utc;
use curiosidade_crm::configure;
use curiosidade_crm::domain::profile::{NewProfile, hash_password};
use curiosidade_crm::domain::types::{ProfileEmail, ProfileId, ProfileName, Role};
use curiosidade_crm::models::config::ServerConfig;
use curiosidade_crm::domain::query::PageQuery;
use curiosidade_crm::repository::{CustomerReader, CustomerWriter, DieselRepository, ProfileWriter};
use curiosidade_crm::routes::alert_level_to_str;
use tera::Tera;

mod common;

const SECRET: &str = "test-secret-test-secret-test-secret-test-secret-test-secret-0001";

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        database_url: String::new(),
        templates_dir: "templates/**/*".to_string(),
        secret: SECRET.to_string(),
        session_hours: 1,
        bootstrap_admin: None,
    }
}

fn add_profile(repo: &DieselRepository, email: &str, role: Role) -> ProfileId {
    let id = ProfileId::new();
    repo.create_profile(&NewProfile {
        id,
        name: ProfileName::new("Staff").unwrap(),
        email: ProfileEmail::new(email).unwrap(),
        role,
        password_hash: hash_password("segredo").unwrap(),
        created_at: Utc::now().naive_utc(),
    })
    .unwrap();
    id
}

macro_rules! app {
    ($repo:expr) => {{
        let key = Key::from(SECRET.as_bytes());
        let message_store = CookieMessageStore::builder(key.clone()).build();
        let tera = Tera::new("templates/**/*").unwrap();

        test::init_service(
            App::new()
                .wrap(FlashMessagesFramework::builder(message_store).build())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .configure(configure)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new($repo))
                .app_data(web::Data::new(server_config())),
        )
        .await
    }};
}

/// Signs in with the shared test password and returns the session cookies.
macro_rules! sign_in {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_form([("email", $email), ("password", "segredo")])
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");
        cookies(&resp)
    }};
}

fn cookies(resp: &ServiceResponse) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .map(|cookie| cookie.into_owned())
        .collect()
}

/// Replaces the cookies of `jar` that `resp` set again.
fn update_cookies(jar: &mut Vec<Cookie<'static>>, resp: &ServiceResponse) {
    for cookie in cookies(resp) {
        jar.retain(|kept| kept.name() != cookie.name());
        jar.push(cookie);
    }
}

fn with_cookies(mut req: test::TestRequest, cookies: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in cookies {
        req = req.cookie(cookie.clone());
    }
    req
}

#[core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn pages_redirect_anonymous_visitors_to_login() {
    let test_db = common::TestDb::new("test_anonymous_pages.db");
    let app = app!(DieselRepository::new(test_db.pool()));

    for uri in ["/dashboard", "/customers", "/reports", "/management"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/customers").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wrong_password_returns_to_login() {
    let test_db = common::TestDb::new("test_wrong_password.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    let app = app!(repo);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_form([("email", "ana@example.com"), ("password", "errada")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_web::test]
async fn signed_in_staff_sees_the_dashboard() {
    let test_db = common::TestDb::new("test_dashboard.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    repo.create_customer(&common::customer(
        "Maria Oliveira",
        "maria@example.com",
        Utc::now().naive_utc(),
    ))
    .unwrap();
    let app = app!(repo);

    let cookies = sign_in!(app, "ana@example.com");
    let req = with_cookies(test::TestRequest::get().uri("/dashboard"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Total de cadastros"));
    assert!(body.contains("Maria Oliveira"));
}

#[actix_web::test]
async fn collaborators_are_sent_away_from_management() {
    let test_db = common::TestDb::new("test_management_guard.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    add_profile(&repo, "root@example.com", Role::Administrator);
    let app = app!(repo);

    let cookies = sign_in!(app, "ana@example.com");
    let req = with_cookies(test::TestRequest::get().uri("/management"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");

    let cookies = sign_in!(app, "root@example.com");
    let req = with_cookies(test::TestRequest::get().uri("/management"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn api_pages_customers_in_camel_case() {
    let test_db = common::TestDb::new("test_api_customers.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    for i in 0..3 {
        repo.create_customer(&common::customer(
            &format!("Cliente {i}"),
            &format!("cliente{i}@example.com"),
            Utc::now().naive_utc(),
        ))
        .unwrap();
    }
    let app = app!(repo);
    let cookies = sign_in!(app, "ana@example.com");

    let req = with_cookies(
        test::TestRequest::get()
            .uri("/api/v1/customers?pageNumber=2&pageSize=2&sortBy=nome&sortDirection=asc"),
        &cookies,
    )
    .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["name"], "Cliente 2");

    let req = with_cookies(
        test::TestRequest::get().uri("/api/v1/customers?filterType=ontem"),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = with_cookies(test::TestRequest::get().uri("/api/v1/dashboard"), &cookies)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["pending_count"], 3);
}

#[actix_web::test]
async fn table_intents_are_stored_then_redirected() {
    let test_db = common::TestDb::new("test_table_intents.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    let app = app!(repo);
    let cookies = sign_in!(app, "ana@example.com");

    let req = with_cookies(
        test::TestRequest::get().uri("/customers?filter=pending"),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/customers");
}

#[actix_web::test]
async fn demoted_administrator_loses_management_on_next_request() {
    let test_db = common::TestDb::new("test_demotion.db");
    let repo = DieselRepository::new(test_db.pool());
    let admin_id = add_profile(&repo, "root@example.com", Role::Administrator);
    let app = app!(repo);

    let cookies = sign_in!(app, "root@example.com");
    let req = with_cookies(test::TestRequest::get().uri("/management"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    DieselRepository::new(test_db.pool())
        .update_profile_role(admin_id, Role::Collaborator)
        .unwrap();

    let req = with_cookies(test::TestRequest::get().uri("/management"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[actix_web::test]
async fn created_customer_is_stored_without_markup() {
    let test_db = common::TestDb::new("test_markup_round_trip.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    let app = app!(repo);
    let cookies = sign_in!(app, "ana@example.com");

    let req = with_cookies(test::TestRequest::post().uri("/customers/add"), &cookies)
        .set_form([
            ("name", "<b>Joana</b> Prado"),
            ("email", "joana@example.com"),
            ("phone", "11988887777"),
            ("address", "&lt;script&gt;alert(1)&lt;/script&gt;Rua A"),
            ("age", "41"),
            ("other_info", "&lt;img src=x onerror=alert(1)&gt;Cliente antiga"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/customers");

    let stored = DieselRepository::new(test_db.pool())
        .list_customers(&PageQuery::new(1, 10), Utc::now().naive_utc())
        .unwrap();
    assert_eq!(stored.total_count, 1);
    let customer = &stored.items[0];
    assert_eq!(customer.name, "Joana Prado");
    assert_eq!(customer.address, "Rua A");
    assert_eq!(customer.other_info.as_deref(), Some("Cliente antiga"));

    let req = with_cookies(
        test::TestRequest::get().uri(&format!("/customers/modal/{}", customer.id)),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(r#"value="Rua A""#));
    assert!(!body.contains("script&gt;"));
    assert!(!body.contains("&lt;script"));
    assert!(!body.contains("onerror"));
}

#[actix_web::test]
async fn customer_names_stay_out_of_inline_scripts() {
    let test_db = common::TestDb::new("test_delete_confirmation.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    repo.create_customer(&common::customer(
        "x');alert(document.cookie);//",
        "x@example.com",
        Utc::now().naive_utc(),
    ))
    .unwrap();
    let app = app!(repo);
    let cookies = sign_in!(app, "ana@example.com");

    let req = with_cookies(test::TestRequest::get().uri("/customers"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    assert!(!body.contains("onsubmit"));
    assert!(body.contains(r#"data-name="x&#x27;);alert(document.cookie);&#x2F;&#x2F;""#));
}

#[actix_web::test]
async fn empty_registry_shows_the_empty_row() {
    let test_db = common::TestDb::new("test_empty_state.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    let app = app!(repo);
    let cookies = sign_in!(app, "ana@example.com");

    for uri in ["/customers", "/dashboard", "/reports"] {
        let req = with_cookies(test::TestRequest::get().uri(uri), &cookies).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Nenhum cliente encontrado"), "{uri}");
        assert!(body.contains("0 registro(s)"), "{uri}");
        assert!(!body.contains("Paginação"), "{uri}");
    }
}

#[actix_web::test]
async fn huge_page_numbers_are_answered_without_panicking() {
    let test_db = common::TestDb::new("test_huge_pages.db");
    let repo = DieselRepository::new(test_db.pool());
    add_profile(&repo, "ana@example.com", Role::Collaborator);
    for i in 0..12 {
        repo.create_customer(&common::customer(
            &format!("Cliente {i:02}"),
            &format!("cliente{i:02}@example.com"),
            Utc::now().naive_utc(),
        ))
        .unwrap();
    }
    let app = app!(repo);
    let mut cookies = sign_in!(app, "ana@example.com");

    let req = with_cookies(
        test::TestRequest::get().uri(&format!("/customers?page={}", usize::MAX)),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    update_cookies(&mut cookies, &resp);

    let req = with_cookies(test::TestRequest::get().uri("/customers"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Nenhum cliente encontrado"));
    assert!(body.contains("12 registro(s)"));
    assert!(body.contains(r#"?page=2">Anterior"#));

    let req = with_cookies(
        test::TestRequest::get().uri(&format!("/api/v1/customers?pageNumber={}", usize::MAX)),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = with_cookies(
        test::TestRequest::get().uri("/api/v1/customers?pageNumber=100000&pageSize=10"),
        &cookies,
    )
    .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalCount"], 12);
    assert!(body["items"].as_array().unwrap().is_empty());
}
