//! JSON handlers mounted under `/api`.

use actix_web::HttpResponse;
use actix_web::web;
use serde_json::json;

use crate::models::config::ServerConfig;
use crate::notifications::mailer::Mailer;
use crate::services::ServiceError;
use crate::services::notifications::MailContext;

pub mod clients;
pub mod events;
pub mod menus;
pub mod notifications;
pub mod reports;
pub mod settings;

/// Maps a service failure to its HTTP status with an `{"error": ...}` body.
pub fn error_response(err: ServiceError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        ServiceError::Validation(_) => HttpResponse::BadRequest().json(body),
        ServiceError::Duplicate(_) | ServiceError::ScheduleConflict(_) => {
            HttpResponse::Conflict().json(body)
        }
        ServiceError::NotFound(_) => HttpResponse::NotFound().json(body),
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json(body),
        ServiceError::Downstream(_) => {
            log::warn!("Downstream failure: {err}");
            HttpResponse::BadGateway().json(body)
        }
        ServiceError::Repository(_) => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
        }
    }
}

pub(crate) fn mail_context<'a>(
    mailer: &'a web::Data<dyn Mailer>,
    config: &'a ServerConfig,
) -> MailContext<'a> {
    MailContext {
        mailer: mailer.get_ref(),
        venue_name: &config.venue_name,
    }
}

/// Registers every handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(clients::list_clients)
        .service(clients::get_client)
        .service(clients::create_client)
        .service(clients::update_client)
        .service(clients::delete_client)
        .service(menus::list_menus)
        .service(menus::get_menu)
        .service(menus::create_menu)
        .service(menus::update_menu)
        .service(menus::delete_menu)
        .service(menus::list_dishes)
        .service(menus::get_dish)
        .service(menus::create_dish)
        .service(menus::update_dish)
        .service(menus::delete_dish)
        .service(events::list_events)
        .service(events::get_event)
        .service(events::get_event_details)
        .service(events::create_event)
        .service(events::update_event)
        .service(events::delete_event)
        .service(events::duplicate_event)
        .service(events::list_event_dishes)
        .service(events::list_event_emails)
        .service(notifications::proposal_pdf)
        .service(notifications::send_proposal)
        .service(notifications::send_update)
        .service(notifications::send_agenda)
        .service(notifications::send_reminders)
        .service(settings::list_settings)
        .service(settings::get_setting)
        .service(settings::save_setting)
        .service(settings::save_settings)
        .service(reports::event_report_csv)
        .service(reports::event_report);
}
