use actix_web::{HttpResponse, Responder, delete, get, patch, post, web};
use serde::Deserialize;

use crate::forms::menus::{CreateDishForm, CreateMenuForm, UpdateDishForm, UpdateMenuForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::menus as menus_service;

#[derive(Debug, Default, Deserialize)]
pub struct MenusQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[get("/menus")]
pub async fn list_menus(
    params: web::Query<MenusQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match menus_service::list_menus(params.active_only, &user, repo.get_ref()) {
        Ok(menus) => HttpResponse::Ok().json(menus),
        Err(err) => error_response(err),
    }
}

#[get("/menus/{menu_id}")]
pub async fn get_menu(
    menu_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match menus_service::get_menu(menu_id.into_inner(), &user, repo.get_ref()) {
        Ok(menu) => HttpResponse::Ok().json(menu),
        Err(err) => error_response(err),
    }
}

#[post("/menus")]
pub async fn create_menu(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateMenuForm>,
) -> impl Responder {
    match menus_service::create_menu(form, &user, repo.get_ref()) {
        Ok(menu) => HttpResponse::Created().json(menu),
        Err(err) => error_response(err),
    }
}

#[patch("/menus/{menu_id}")]
pub async fn update_menu(
    menu_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateMenuForm>,
) -> impl Responder {
    match menus_service::update_menu(menu_id.into_inner(), form, &user, repo.get_ref()) {
        Ok(menu) => HttpResponse::Ok().json(menu),
        Err(err) => error_response(err),
    }
}

#[delete("/menus/{menu_id}")]
pub async fn delete_menu(
    menu_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match menus_service::delete_menu(menu_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[get("/menus/{menu_id}/dishes")]
pub async fn list_dishes(
    menu_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match menus_service::list_dishes(menu_id.into_inner(), &user, repo.get_ref()) {
        Ok(dishes) => HttpResponse::Ok().json(dishes),
        Err(err) => error_response(err),
    }
}

#[get("/dishes/{dish_id}")]
pub async fn get_dish(
    dish_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match menus_service::get_dish(dish_id.into_inner(), &user, repo.get_ref()) {
        Ok(dish) => HttpResponse::Ok().json(dish),
        Err(err) => error_response(err),
    }
}

#[post("/dishes")]
pub async fn create_dish(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CreateDishForm>,
) -> impl Responder {
    match menus_service::create_dish(form, &user, repo.get_ref()) {
        Ok(dish) => HttpResponse::Created().json(dish),
        Err(err) => error_response(err),
    }
}

#[patch("/dishes/{dish_id}")]
pub async fn update_dish(
    dish_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateDishForm>,
) -> impl Responder {
    match menus_service::update_dish(dish_id.into_inner(), form, &user, repo.get_ref()) {
        Ok(dish) => HttpResponse::Ok().json(dish),
        Err(err) => error_response(err),
    }
}

#[delete("/dishes/{dish_id}")]
pub async fn delete_dish(
    dish_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match menus_service::delete_dish(dish_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
