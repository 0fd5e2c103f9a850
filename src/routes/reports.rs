use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{TableParams, base_context, now, redirect, render_template, table_state};
use crate::services::{customers as customers_service, reports as reports_service};
use crate::settings::{SessionSettings, TableKey};

#[get("/reports")]
pub async fn show_reports(
    params: web::Query<TableParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = table_state(&session, TableKey::Reports, &params);
    if !params.is_empty() {
        return redirect("/reports");
    }

    let view = SessionSettings::new(&session).view();
    let table = customers_service::load_table(repo.get_ref(), query, now());

    let mut context = base_context(&flash_messages, &user, "reports", &view);
    context.insert("table", &table);
    context.insert("table_url", "/reports");
    context.insert("with_actions", &false);

    render_template(&tera, "reports/index.html", &context)
}

#[get("/reports/print")]
pub async fn print_report(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let settings = SessionSettings::new(&session);
    let query = settings.table(TableKey::Reports);

    match reports_service::load_report(repo.get_ref(), &query, now()) {
        Ok(report) => {
            let mut context = base_context(&flash_messages, &user, "reports", &settings.view());
            context.insert("report", &report);
            render_template(&tera, "reports/print.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the printable report: {err}");
            FlashMessage::error("Erro ao carregar dados para impressão.").send();
            redirect("/reports")
        }
    }
}

#[get("/reports/export.csv")]
pub async fn export_report(
    _user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = SessionSettings::new(&session).table(TableKey::Reports);

    let csv = reports_service::load_report(repo.get_ref(), &query, now())
        .and_then(|report| reports_service::export_csv(&report));

    match csv {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"relatorio-cadastros.csv\"",
            ))
            .body(body),
        Err(err) => {
            log::error!("Failed to export the report: {err}");
            FlashMessage::error("Erro ao preparar dados para impressão.").send();
            redirect("/reports")
        }
    }
}
