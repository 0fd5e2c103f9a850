use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpRequest, Responder, post};

use crate::models::auth::AuthenticatedUser;
use crate::routes::redirect;
use crate::settings::SessionSettings;

/// Flips dark mode and returns to the page the toggle was clicked on.
#[post("/settings/theme")]
pub async fn toggle_theme(
    request: HttpRequest,
    _user: AuthenticatedUser,
    session: Session,
) -> impl Responder {
    if let Err(err) = SessionSettings::new(&session).toggle_dark_mode() {
        log::error!("Failed to store the theme: {err}");
    }

    let back = request
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| referer.find("://").map(|at| &referer[at + 3..]))
        .and_then(|rest| rest.find('/').map(|at| &rest[at..]))
        .unwrap_or("/dashboard");

    redirect(back)
}
