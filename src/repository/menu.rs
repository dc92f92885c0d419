//! Repository implementation for menus and their dishes.

use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        menu::{Dish, Menu, MenuWithDishes, NewDish, NewMenu, UpdateDish, UpdateMenu, sort_dishes},
        types::{DishId, MenuId},
    },
    models::menu::{
        Dish as DbDish, Menu as DbMenu, NewDish as DbNewDish, NewMenu as DbNewMenu,
        UpdateDish as DbUpdateDish, UpdateMenu as DbUpdateMenu,
    },
    repository::{
        DieselRepository, MenuReader, MenuWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn dishes_into_domain(rows: Vec<DbDish>) -> RepositoryResult<Vec<Dish>> {
    let mut dishes = rows
        .into_iter()
        .map(|row| Dish::try_from(row).map_err(RepositoryError::from))
        .collect::<RepositoryResult<Vec<Dish>>>()?;
    sort_dishes(&mut dishes);
    Ok(dishes)
}

impl MenuReader for DieselRepository {
    fn get_menu_by_id(&self, id: MenuId) -> RepositoryResult<Option<Menu>> {
        use crate::schema::menus;

        let mut conn = self.conn()?;
        let db_menu = menus::table
            .find(id.get())
            .select(DbMenu::as_select())
            .first(&mut conn)
            .optional()?;

        db_menu
            .map(|m| Menu::try_from(m).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_menus(&self, active_only: bool) -> RepositoryResult<Vec<MenuWithDishes>> {
        use crate::schema::{dishes, menus};

        let mut conn = self.conn()?;
        let mut query = menus::table.into_boxed();
        if active_only {
            query = query.filter(menus::active.eq(true));
        }
        let db_menus = query
            .order((menus::name.asc(), menus::id.asc()))
            .select(DbMenu::as_select())
            .load(&mut conn)?;

        let menu_ids = db_menus.iter().map(|m| m.id).collect::<Vec<i32>>();
        let db_dishes = dishes::table
            .filter(dishes::menu_id.eq_any(&menu_ids))
            .select(DbDish::as_select())
            .load(&mut conn)?;

        let mut grouped: HashMap<i32, Vec<DbDish>> = HashMap::new();
        for dish in db_dishes {
            grouped.entry(dish.menu_id).or_default().push(dish);
        }

        db_menus
            .into_iter()
            .map(|db_menu| {
                let dishes = dishes_into_domain(grouped.remove(&db_menu.id).unwrap_or_default())?;
                let menu = Menu::try_from(db_menu).map_err(RepositoryError::from)?;
                Ok(MenuWithDishes { menu, dishes })
            })
            .collect()
    }

    fn list_dishes(&self, menu_id: MenuId) -> RepositoryResult<Vec<Dish>> {
        use crate::schema::dishes;

        let mut conn = self.conn()?;
        let rows = dishes::table
            .filter(dishes::menu_id.eq(menu_id.get()))
            .select(DbDish::as_select())
            .load(&mut conn)?;

        dishes_into_domain(rows)
    }

    fn get_dish_by_id(&self, id: DishId) -> RepositoryResult<Option<Dish>> {
        use crate::schema::dishes;

        let mut conn = self.conn()?;
        let db_dish = dishes::table
            .find(id.get())
            .select(DbDish::as_select())
            .first(&mut conn)
            .optional()?;

        db_dish
            .map(|d| Dish::try_from(d).map_err(RepositoryError::from))
            .transpose()
    }
}

impl MenuWriter for DieselRepository {
    fn create_menu(&self, new_menu: &NewMenu) -> RepositoryResult<Menu> {
        use crate::schema::menus;

        let mut conn = self.conn()?;
        let row = DbNewMenu::from_domain(new_menu, Utc::now().naive_utc());
        let created = diesel::insert_into(menus::table)
            .values(&row)
            .returning(DbMenu::as_returning())
            .get_result(&mut conn)?;

        Menu::try_from(created).map_err(RepositoryError::from)
    }

    fn update_menu(&self, menu_id: MenuId, updates: &UpdateMenu) -> RepositoryResult<Menu> {
        use crate::schema::menus;

        let mut conn = self.conn()?;
        let changes = DbUpdateMenu::from_domain(updates, Utc::now().naive_utc());
        let updated = diesel::update(menus::table.find(menu_id.get()))
            .set(&changes)
            .returning(DbMenu::as_returning())
            .get_result(&mut conn)?;

        Menu::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_menu(&self, menu_id: MenuId) -> RepositoryResult<()> {
        use crate::schema::{dishes, menus};

        let mut conn = self.conn()?;
        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(dishes::table.filter(dishes::menu_id.eq(menu_id.get())))
                .execute(conn)?;
            let deleted = diesel::delete(menus::table.find(menu_id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }

    fn create_dish(&self, new_dish: &NewDish) -> RepositoryResult<Dish> {
        use crate::schema::dishes;

        let mut conn = self.conn()?;
        let row = DbNewDish::from_domain(new_dish, Utc::now().naive_utc());
        let created = diesel::insert_into(dishes::table)
            .values(&row)
            .returning(DbDish::as_returning())
            .get_result(&mut conn)?;

        Dish::try_from(created).map_err(RepositoryError::from)
    }

    fn update_dish(&self, dish_id: DishId, updates: &UpdateDish) -> RepositoryResult<Dish> {
        use crate::schema::dishes;

        let mut conn = self.conn()?;
        let changes = DbUpdateDish::from_domain(updates, Utc::now().naive_utc());
        let updated = diesel::update(dishes::table.find(dish_id.get()))
            .set(&changes)
            .returning(DbDish::as_returning())
            .get_result(&mut conn)?;

        Dish::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_dish(&self, dish_id: DishId) -> RepositoryResult<()> {
        use crate::schema::dishes;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(dishes::table.find(dish_id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
