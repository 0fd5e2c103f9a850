use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{TableParams, base_context, now, redirect, render_template, table_state};
use crate::services::{customers as customers_service, dashboard as dashboard_service};
use crate::settings::{SessionSettings, TableKey};

#[get("/dashboard")]
pub async fn show_dashboard(
    params: web::Query<TableParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = table_state(&session, TableKey::Dashboard, &params);
    if !params.is_empty() {
        return redirect("/dashboard");
    }

    let view = SessionSettings::new(&session).view();
    let now = now();
    let mut context = base_context(&flash_messages, &user, "dashboard", &view);

    match dashboard_service::load_dashboard(repo.get_ref(), view.filter, now) {
        Ok(data) => context.insert("cards", &data.cards),
        Err(err) => {
            log::error!("Failed to load dashboard cards: {err}");
            context.insert("cards_failed", &true);
        }
    }

    let table = customers_service::load_table(repo.get_ref(), query, now);
    context.insert("table", &table);
    context.insert("table_url", "/dashboard");
    context.insert("with_actions", &false);

    render_template(&tera, "dashboard/index.html", &context)
}
