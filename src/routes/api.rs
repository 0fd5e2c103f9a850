use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::api::CustomersQuery;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::now;
use crate::services::{ServiceError, api as api_service};

#[get("/v1/customers")]
pub async fn api_v1_customers(
    params: web::Query<CustomersQuery>,
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::list_customers(repo.get_ref(), &params, now()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to list customers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/dashboard")]
pub async fn api_v1_dashboard(
    _user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::dashboard(repo.get_ref(), now()) {
        Ok(aggregate) => HttpResponse::Ok().json(aggregate),
        Err(err) => {
            log::error!("Failed to load dashboard aggregate: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
