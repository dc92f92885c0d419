use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};

use crate::forms::events::{CreateEventForm, EventFilterForm, UpdateEventForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{DieselRepository, EventListQuery};
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::events as events_service;

#[get("/events")]
pub async fn list_events(
    params: web::Query<EventFilterForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match EventListQuery::try_from(params.into_inner()) {
        Ok(query) => query,
        Err(err) => return error_response(ServiceError::from(err)),
    };

    match events_service::list_events(query, &user, repo.get_ref()) {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(err) => error_response(err),
    }
}

#[get("/events/{event_id}")]
pub async fn get_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match events_service::get_event(event_id.into_inner(), &user, repo.get_ref()) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(err) => error_response(err),
    }
}

#[get("/events/{event_id}/details")]
pub async fn get_event_details(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match events_service::get_event_details(event_id.into_inner(), &user, repo.get_ref()) {
        Ok(details) => HttpResponse::Ok().json(details),
        Err(err) => error_response(err),
    }
}

#[post("/events")]
pub async fn create_event(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateEventForm>,
) -> impl Responder {
    match events_service::create_event(form, &user, repo.get_ref()) {
        Ok(event) => HttpResponse::Created().json(event),
        Err(err) => error_response(err),
    }
}

#[patch("/events/{event_id}")]
pub async fn update_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateEventForm>,
) -> impl Responder {
    match events_service::update_event(event_id.into_inner(), form, &user, repo.get_ref()) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(err) => error_response(err),
    }
}

#[delete("/events/{event_id}")]
pub async fn delete_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match events_service::delete_event(event_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[post("/events/{event_id}/duplicate")]
pub async fn duplicate_event(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match events_service::duplicate_event(event_id.into_inner(), &user, repo.get_ref()) {
        Ok(event) => HttpResponse::Created().json(event),
        Err(err) => error_response(err),
    }
}

#[get("/events/{event_id}/dishes")]
pub async fn list_event_dishes(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match events_service::list_event_dishes(event_id.into_inner(), &user, repo.get_ref()) {
        Ok(dishes) => HttpResponse::Ok().json(dishes),
        Err(err) => error_response(err),
    }
}

#[get("/events/{event_id}/emails")]
pub async fn list_event_emails(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match events_service::list_event_emails(event_id.into_inner(), &user, repo.get_ref()) {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(err) => error_response(err),
    }
}
