use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use chrono::Utc;

use crate::forms::notifications::{SendAgendaForm, SendEventEmailForm, SendRemindersForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::notifications::mailer::{Attachment, Mailer};
use crate::repository::DieselRepository;
use crate::routes::{error_response, mail_context};
use crate::services::notifications as notifications_service;

/// Serves a generated document as a download.
pub(crate) fn download(attachment: Attachment) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(attachment.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(attachment.filename)],
        })
        .body(attachment.content)
}

#[get("/events/{event_id}/proposal.pdf")]
pub async fn proposal_pdf(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match notifications_service::proposal_document(
        event_id.into_inner(),
        &server_config.venue_name,
        &user,
        repo.get_ref(),
    ) {
        Ok(document) => download(document),
        Err(err) => error_response(err),
    }
}

#[post("/events/{event_id}/proposal")]
pub async fn send_proposal(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    mailer: web::Data<dyn Mailer>,
    form: Option<web::Json<SendEventEmailForm>>,
) -> impl Responder {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    let ctx = mail_context(&mailer, &server_config);

    match notifications_service::send_proposal(
        event_id.into_inner(),
        form,
        &user,
        repo.get_ref(),
        ctx,
    ) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(err),
    }
}

#[post("/events/{event_id}/update-notice")]
pub async fn send_update(
    event_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    mailer: web::Data<dyn Mailer>,
    form: Option<web::Json<SendEventEmailForm>>,
) -> impl Responder {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    let ctx = mail_context(&mailer, &server_config);

    match notifications_service::send_update(event_id.into_inner(), form, &user, repo.get_ref(), ctx)
    {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(err) => error_response(err),
    }
}

#[post("/agenda/send")]
pub async fn send_agenda(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    mailer: web::Data<dyn Mailer>,
    web::Json(form): web::Json<SendAgendaForm>,
) -> impl Responder {
    let ctx = mail_context(&mailer, &server_config);

    match notifications_service::trigger_daily_agenda(form, &user, repo.get_ref(), ctx) {
        Ok(dispatch) => HttpResponse::Ok().json(dispatch),
        Err(err) => error_response(err),
    }
}

#[post("/reminders/send")]
pub async fn send_reminders(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    mailer: web::Data<dyn Mailer>,
    form: Option<web::Json<SendRemindersForm>>,
) -> impl Responder {
    let today = form
        .and_then(|form| form.into_inner().today)
        .unwrap_or_else(|| Utc::now().date_naive());
    let ctx = mail_context(&mailer, &server_config);

    match notifications_service::trigger_reminders(today, &user, repo.get_ref(), ctx) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => error_response(err),
    }
}
