//! Customer registry admin panel.
//!
//! The `data` feature builds the storage and coordination layers; `server`
//! adds the Actix-web application on top.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

pub mod coordinator;
pub mod db;
pub mod domain;
pub mod dto;
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod settings;

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

/// Registers every handler on `cfg`. Page handlers sit behind
/// [`middleware::RedirectUnauthorized`]; the JSON API answers 401 instead.
#[cfg(feature = "server")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    use crate::routes::{api, auth, customers, dashboard, management, reports, settings};

    cfg.service(
        web::scope("/api")
            .service(api::api_v1_customers)
            .service(api::api_v1_dashboard),
    )
    .service(
        web::scope("")
            .wrap(crate::middleware::RedirectUnauthorized)
            .service(auth::login_page)
            .service(auth::login)
            .service(auth::logout)
            .service(dashboard::show_dashboard)
            .service(customers::show_customers)
            .service(customers::new_customer_modal)
            .service(customers::customer_modal)
            .service(customers::add_customer)
            .service(customers::save_customer)
            .service(customers::delete_customer)
            .service(reports::show_reports)
            .service(reports::print_report)
            .service(reports::export_report)
            .service(management::show_management)
            .service(management::add_user)
            .service(management::change_role)
            .service(settings::toggle_theme),
    );
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    if let Some(admin) = &server_config.bootstrap_admin {
        services::management::ensure_bootstrap_admin(&repo, admin, chrono::Utc::now().naive_utc())
            .map_err(|e| std::io::Error::other(format!("Failed to create the administrator: {e}")))?;
    }

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid secret: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
