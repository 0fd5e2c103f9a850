use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::management::{NewUserForm, RoleForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, now, redirect, render_template};
use crate::services::{ServiceError, management as management_service};
use crate::settings::SessionSettings;

#[get("/management")]
pub async fn show_management(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match management_service::list_profiles(repo.get_ref(), &user) {
        Ok(data) => {
            let view = SessionSettings::new(&session).view();
            let mut context = base_context(&flash_messages, &user, "management", &view);
            context.insert("profiles", &data.profiles);
            context.insert("roles", &data.roles);

            render_template(&tera, "management/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/dashboard"),
        Err(err) => {
            log::error!("Failed to list profiles: {err}");
            FlashMessage::error("Erro ao carregar usuários").send();
            redirect("/dashboard")
        }
    }
}

#[post("/management/users")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<NewUserForm>,
) -> impl Responder {
    match management_service::create_user(repo.get_ref(), &user, form, now()) {
        Ok(_) => {
            FlashMessage::success("Usuário criado com sucesso").send();
            redirect("/management")
        }
        Err(ServiceError::Unauthorized) => redirect("/dashboard"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/management")
        }
        Err(err) => {
            log::error!("Failed to create user: {err}");
            FlashMessage::error("Erro ao criar usuário").send();
            redirect("/management")
        }
    }
}

#[post("/management/role")]
pub async fn change_role(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RoleForm>,
) -> impl Responder {
    match management_service::change_role(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Papel do usuário atualizado com sucesso").send();
            redirect("/management")
        }
        Err(ServiceError::Unauthorized) => redirect("/dashboard"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/management")
        }
        Err(err) => {
            log::error!("Failed to change role: {err}");
            FlashMessage::error("Erro ao atualizar papel do usuário").send();
            redirect("/management")
        }
    }
}
