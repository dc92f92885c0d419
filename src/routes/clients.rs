use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};
use serde::Deserialize;

use crate::forms::clients::{CreateClientForm, UpdateClientForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::clients as clients_service;

#[derive(Debug, Default, Deserialize)]
pub struct ClientsQuery {
    pub search: Option<String>,
}

#[get("/clients")]
pub async fn list_clients(
    params: web::Query<ClientsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::list_clients(params.into_inner().search, &user, repo.get_ref()) {
        Ok(clients) => HttpResponse::Ok().json(clients),
        Err(err) => error_response(err),
    }
}

#[get("/clients/{client_id}")]
pub async fn get_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::get_client(client_id.into_inner(), &user, repo.get_ref()) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => error_response(err),
    }
}

#[post("/clients")]
pub async fn create_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateClientForm>,
) -> impl Responder {
    match clients_service::create_client(form, &user, repo.get_ref()) {
        Ok(client) => HttpResponse::Created().json(client),
        Err(err) => error_response(err),
    }
}

#[patch("/clients/{client_id}")]
pub async fn update_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateClientForm>,
) -> impl Responder {
    match clients_service::update_client(client_id.into_inner(), form, &user, repo.get_ref()) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => error_response(err),
    }
}

#[delete("/clients/{client_id}")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::delete_client(client_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
