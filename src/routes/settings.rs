use actix_web::{HttpResponse, Responder, get, put, web};
use serde_json::json;

use crate::forms::settings::{SaveSettingForm, SaveSettingsForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::settings as settings_service;

#[get("/settings")]
pub async fn list_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match settings_service::list_settings(&user, repo.get_ref()) {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(err) => error_response(err),
    }
}

#[get("/settings/{key}")]
pub async fn get_setting(
    key: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match settings_service::get_setting(&key, &user, repo.get_ref()) {
        Ok(setting) => HttpResponse::Ok().json(setting),
        Err(err) => error_response(err),
    }
}

#[put("/settings/{key}")]
pub async fn save_setting(
    key: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveSettingForm>,
) -> impl Responder {
    match settings_service::save_setting(&key, form, &user, repo.get_ref()) {
        Ok(setting) => HttpResponse::Ok().json(setting),
        Err(err) => error_response(err),
    }
}

/// Saves several settings at once from a `{key: value}` object.
#[put("/settings")]
pub async fn save_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SaveSettingsForm>,
) -> impl Responder {
    match settings_service::save_settings(form, &user, repo.get_ref()) {
        Ok(saved) => HttpResponse::Ok().json(json!({ "saved": saved })),
        Err(err) => error_response(err),
    }
}
