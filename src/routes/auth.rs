use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::forms::auth::LoginForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[get("/")]
pub async fn login_page(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/dashboard");
    }

    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);

    render_template(&tera, "auth/login.html", &context)
}

#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let profile = match auth_service::login(repo.get_ref(), form) {
        Ok(profile) => profile,
        Err(ServiceError::InvalidCredentials) => {
            FlashMessage::error("Invalid email or password").send();
            return redirect("/");
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error("Erro ao entrar").send();
            return redirect("/");
        }
    };

    let user = AuthenticatedUser::from_profile(&profile, server_config.session_hours);
    let token = match user.to_jwt(&server_config.secret) {
        Ok(token) => token,
        Err(err) => {
            log::error!("Failed to sign the identity token: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(err) = Identity::login(&request.extensions(), token) {
        log::error!("Failed to attach the identity: {err}");
        return HttpResponse::InternalServerError().finish();
    }

    redirect("/dashboard")
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    FlashMessage::success("Logout realizado com sucesso").send();
    redirect("/")
}
