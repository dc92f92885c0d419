use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;

use crate::forms::events::EventFilterForm;
use crate::models::auth::AuthenticatedUser;
use crate::notifications::mailer::Attachment;
use crate::repository::{DieselRepository, EventListQuery};
use crate::routes::error_response;
use crate::routes::notifications::download;
use crate::services::ServiceError;
use crate::services::reports as reports_service;

#[get("/reports/events")]
pub async fn event_report(
    params: web::Query<EventFilterForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match EventListQuery::try_from(params.into_inner()) {
        Ok(query) => query,
        Err(err) => return error_response(ServiceError::from(err)),
    };

    match reports_service::event_report(query, &user, repo.get_ref()) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => error_response(err),
    }
}

#[get("/reports/events.csv")]
pub async fn event_report_csv(
    params: web::Query<EventFilterForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match EventListQuery::try_from(params.into_inner()) {
        Ok(query) => query,
        Err(err) => return error_response(ServiceError::from(err)),
    };

    match reports_service::event_report_csv(query, &user, repo.get_ref()) {
        Ok(content) => {
            let filename = format!("eventos-{}.csv", Utc::now().format("%d-%m-%Y"));
            download(Attachment::csv(filename, content))
        }
        Err(err) => error_response(err),
    }
}
