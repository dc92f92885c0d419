//! Menus and their dishes.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::menu::{Dish, DishPatch, Menu, MenuPatch, MenuWithDishes, NewDish, NewMenu};
use crate::domain::types::{DishId, MenuId};
use crate::forms::menus::{CreateDishForm, CreateMenuForm, UpdateDishForm, UpdateMenuForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{EventListQuery, EventReader, MenuReader, MenuWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

pub fn list_menus<R>(
    active_only: bool,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<MenuWithDishes>>
where
    R: MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let menus = repo.list_menus(active_only).map_err(|err| {
        log::error!("Failed to list menus: {err}");
        err
    })?;
    Ok(menus)
}

pub(crate) fn load_menu<R>(repo: &R, menu_id: MenuId) -> ServiceResult<Menu>
where
    R: MenuReader + ?Sized,
{
    repo.get_menu_by_id(menu_id)
        .map_err(|err| {
            log::error!("Failed to load menu {menu_id}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound("menu not found".into()))
}

/// Dishes of a menu in serving order.
pub(crate) fn load_dishes<R>(repo: &R, menu_id: MenuId) -> ServiceResult<Vec<Dish>>
where
    R: MenuReader + ?Sized,
{
    let dishes = repo.list_dishes(menu_id).map_err(|err| {
        log::error!("Failed to list dishes of menu {menu_id}: {err}");
        err
    })?;
    Ok(dishes)
}

/// Returns the menu together with its dishes.
pub fn get_menu<R>(menu_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<MenuWithDishes>
where
    R: MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let menu = load_menu(repo, MenuId::new(menu_id)?)?;
    let dishes = load_dishes(repo, menu.id)?;
    Ok(MenuWithDishes { menu, dishes })
}

pub fn create_menu<R>(form: CreateMenuForm, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Menu>
where
    R: MenuWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let new_menu = NewMenu::try_from(form)?;
    let menu = repo.create_menu(&new_menu).map_err(|err| {
        log::error!("Failed to create menu: {err}");
        err
    })?;
    Ok(menu)
}

pub fn update_menu<R>(
    menu_id: i32,
    form: UpdateMenuForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Menu>
where
    R: MenuReader + MenuWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let current = load_menu(repo, MenuId::new(menu_id)?)?;
    let updates = MenuPatch::try_from(form)?.apply(&current)?;

    let menu = repo.update_menu(current.id, &updates).map_err(|err| {
        log::error!("Failed to update menu {}: {err}", current.id);
        err
    })?;
    Ok(menu)
}

/// Deletes a menu and its dishes unless an event still references it.
///
/// Events keep their own dish snapshot, but the menu id stays on the event,
/// so retiring a menu in use is done with `active: false` instead.
pub fn delete_menu<R>(menu_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: MenuWriter + EventReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let menu_id = MenuId::new(menu_id)?;
    let events = repo
        .list_events(EventListQuery::new().menu(menu_id))
        .map_err(|err| {
            log::error!("Failed to list events of menu {menu_id}: {err}");
            err
        })?;
    if !events.is_empty() {
        return Err(ServiceError::Validation(format!(
            "menu is used by {} event(s) and cannot be deleted",
            events.len()
        )));
    }

    repo.delete_menu(menu_id).map_err(|err| {
        log::error!("Failed to delete menu {menu_id}: {err}");
        err
    })?;
    Ok(())
}

pub fn list_dishes<R>(menu_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<Dish>>
where
    R: MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let menu = load_menu(repo, MenuId::new(menu_id)?)?;
    load_dishes(repo, menu.id)
}

fn load_dish<R>(repo: &R, dish_id: DishId) -> ServiceResult<Dish>
where
    R: MenuReader + ?Sized,
{
    repo.get_dish_by_id(dish_id)
        .map_err(|err| {
            log::error!("Failed to load dish {dish_id}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound("dish not found".into()))
}

pub fn get_dish<R>(dish_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Dish>
where
    R: MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    load_dish(repo, DishId::new(dish_id)?)
}

pub fn create_dish<R>(form: CreateDishForm, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Dish>
where
    R: MenuReader + MenuWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let new_dish = NewDish::try_from(form)?;
    load_menu(repo, new_dish.menu_id)?;

    let dish = repo.create_dish(&new_dish).map_err(|err| {
        log::error!("Failed to create dish: {err}");
        err
    })?;
    Ok(dish)
}

pub fn update_dish<R>(
    dish_id: i32,
    form: UpdateDishForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Dish>
where
    R: MenuReader + MenuWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let current = load_dish(repo, DishId::new(dish_id)?)?;
    let updates = DishPatch::try_from(form)?.apply(&current)?;

    let dish = repo.update_dish(current.id, &updates).map_err(|err| {
        log::error!("Failed to update dish {}: {err}", current.id);
        err
    })?;
    Ok(dish)
}

/// Removes a dish from its menu. Event snapshots are not affected.
pub fn delete_dish<R>(dish_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: MenuWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let dish_id = DishId::new(dish_id)?;
    repo.delete_dish(dish_id).map_err(|err| {
        log::error!("Failed to delete dish {dish_id}: {err}");
        err
    })?;
    Ok(())
}
