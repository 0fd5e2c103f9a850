use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::domain::types::CustomerId;
use crate::dto::customers::CustomerModalData;
use crate::forms::customer::{CustomerForm, FieldErrors, WriteAction};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{
    TableParams, base_context, now, redirect, render_template, table_state,
};
use crate::services::{ServiceError, customers as customers_service};
use crate::settings::{SessionSettings, TableKey};

#[get("/customers")]
pub async fn show_customers(
    params: web::Query<TableParams>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = table_state(&session, TableKey::Customers, &params);
    if !params.is_empty() {
        return redirect("/customers");
    }

    let view = SessionSettings::new(&session).view();
    let table = customers_service::load_table(repo.get_ref(), query, now());

    let mut context = base_context(&flash_messages, &user, "customers", &view);
    context.insert("table", &table);
    context.insert("table_url", "/customers");
    context.insert("with_actions", &true);

    render_template(&tera, "customers/index.html", &context)
}

fn render_modal(tera: &Tera, data: &CustomerModalData) -> HttpResponse {
    let mut context = Context::new();
    context.insert("modal", data);
    render_template(tera, "customers/modal_body.html", &context)
}

#[get("/customers/modal")]
pub async fn new_customer_modal(_user: AuthenticatedUser, tera: web::Data<Tera>) -> impl Responder {
    render_modal(&tera, &CustomerModalData::create())
}

#[get("/customers/modal/{customer_id}")]
pub async fn customer_modal(
    customer_id: web::Path<i32>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match customers_service::load_modal(repo.get_ref(), Some(customer_id.into_inner())) {
        Ok(data) => render_modal(&tera, &data),
        Err(ServiceError::NotFound | ServiceError::TypeConstraint(_)) => {
            HttpResponse::NotFound().finish()
        }
        Err(err) => {
            log::error!("Failed to load customer modal: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Re-renders the submitted form with its errors, or falls back to a toast
/// when no field can be blamed.
#[allow(clippy::too_many_arguments)]
fn rejected(
    tera: &Tera,
    session: &Session,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    customer_id: Option<i32>,
    form: CustomerForm,
    errors: FieldErrors,
    action: WriteAction,
) -> HttpResponse {
    if errors.fields.is_empty() {
        let message = errors
            .generic
            .unwrap_or_else(|| action.failure_message().to_string());
        FlashMessage::error(message).send();
        return redirect("/customers");
    }

    let modal = CustomerModalData {
        customer_id: customer_id.and_then(|id| CustomerId::new(id).ok()),
        form,
        errors,
    };
    let view = SessionSettings::new(session).view();
    let mut context = base_context(flash_messages, user, "customers", &view);
    context.insert("modal", &modal);

    let mut response = render_template(tera, "customers/form.html", &context);
    if response.status().is_success() {
        *response.status_mut() = StatusCode::UNPROCESSABLE_ENTITY;
    }
    response
}

#[post("/customers/add")]
pub async fn add_customer(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CustomerForm>,
) -> impl Responder {
    match customers_service::create_customer(repo.get_ref(), &user, form.clone(), now()) {
        Ok(_) => {
            FlashMessage::success("Cliente criado com sucesso").send();
            redirect("/customers")
        }
        Err(ServiceError::Fields(errors)) => rejected(
            &tera,
            &session,
            &user,
            &flash_messages,
            None,
            form,
            errors,
            WriteAction::Create,
        ),
        Err(err) => {
            log::error!("Failed to create customer: {err}");
            FlashMessage::error(WriteAction::Create.failure_message()).send();
            redirect("/customers")
        }
    }
}

#[post("/customers/save/{customer_id}")]
pub async fn save_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CustomerForm>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();
    match customers_service::update_customer(repo.get_ref(), &user, customer_id, form.clone()) {
        Ok(_) => {
            FlashMessage::success("Cliente atualizado com sucesso").send();
            redirect("/customers")
        }
        Err(ServiceError::Fields(errors)) => rejected(
            &tera,
            &session,
            &user,
            &flash_messages,
            Some(customer_id),
            form,
            errors,
            WriteAction::Update,
        ),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Cliente não encontrado").send();
            redirect("/customers")
        }
        Err(err) => {
            log::error!("Failed to update customer: {err}");
            FlashMessage::error(WriteAction::Update.failure_message()).send();
            redirect("/customers")
        }
    }
}

#[post("/customers/delete/{customer_id}")]
pub async fn delete_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match customers_service::delete_customer(repo.get_ref(), &user, customer_id.into_inner()) {
        Ok(()) => FlashMessage::success("Cliente deletado com sucesso").send(),
        Err(ServiceError::NotFound) => FlashMessage::error("Cliente não encontrado").send(),
        Err(err) => {
            log::error!("Failed to delete customer: {err}");
            FlashMessage::error(WriteAction::Delete.failure_message()).send();
        }
    }
    redirect("/customers")
}
