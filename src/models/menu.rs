use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::menu::{
    Dish as DomainDish, Menu as DomainMenu, NewDish as DomainNewDish, NewMenu as DomainNewMenu,
    UpdateDish as DomainUpdateDish,
};
use crate::domain::money::Money;
use crate::domain::types::{DishId, DishName, MenuId, MenuName, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::menus)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::menu::Menu`].
pub struct Menu {
    pub id: i32,
    pub name: String,
    pub price_per_person: i64,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::menus)]
pub struct NewMenu<'a> {
    pub name: &'a str,
    pub price_per_person: i64,
    pub description: Option<&'a str>,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::menus)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateMenu<'a> {
    pub name: &'a str,
    pub price_per_person: i64,
    pub description: Option<&'a str>,
    pub active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::dishes)]
#[diesel(belongs_to(Menu, foreign_key = menu_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::menu::Dish`].
pub struct Dish {
    pub id: i32,
    pub menu_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub course: String,
    pub position: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::dishes)]
pub struct NewDish<'a> {
    pub menu_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub course: &'a str,
    pub position: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::dishes)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateDish<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub course: &'a str,
    pub position: i32,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Menu> for DomainMenu {
    type Error = TypeConstraintError;

    fn try_from(menu: Menu) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MenuId::new(menu.id)?,
            name: MenuName::new(menu.name)?,
            price_per_person: Money::from_cents(menu.price_per_person),
            description: menu.description,
            active: menu.active,
            created_at: menu.created_at,
            updated_at: menu.updated_at,
        })
    }
}

impl TryFrom<Dish> for DomainDish {
    type Error = TypeConstraintError;

    fn try_from(dish: Dish) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DishId::new(dish.id)?,
            menu_id: MenuId::new(dish.menu_id)?,
            name: DishName::new(dish.name)?,
            description: dish.description,
            course: dish.course.parse()?,
            position: dish.position,
            created_at: dish.created_at,
            updated_at: dish.updated_at,
        })
    }
}

impl<'a> NewMenu<'a> {
    pub fn from_domain(menu: &'a DomainNewMenu, now: NaiveDateTime) -> Self {
        Self {
            name: menu.name.as_str(),
            price_per_person: menu.price_per_person.cents(),
            description: menu.description.as_deref(),
            active: menu.active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateMenu<'a> {
    pub fn from_domain(menu: &'a DomainNewMenu, now: NaiveDateTime) -> Self {
        Self {
            name: menu.name.as_str(),
            price_per_person: menu.price_per_person.cents(),
            description: menu.description.as_deref(),
            active: menu.active,
            updated_at: now,
        }
    }
}

impl<'a> NewDish<'a> {
    pub fn from_domain(dish: &'a DomainNewDish, now: NaiveDateTime) -> Self {
        Self {
            menu_id: dish.menu_id.get(),
            name: dish.name.as_str(),
            description: dish.description.as_deref(),
            course: dish.course.as_str(),
            position: dish.position,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateDish<'a> {
    pub fn from_domain(dish: &'a DomainUpdateDish, now: NaiveDateTime) -> Self {
        Self {
            name: dish.name.as_str(),
            description: dish.description.as_deref(),
            course: dish.course.as_str(),
            position: dish.position,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::CourseStage;
    use chrono::Utc;

    #[test]
    fn dish_row_parses_course() {
        let now = Utc::now().naive_utc();
        let row = Dish {
            id: 2,
            menu_id: 1,
            name: "Risoto".into(),
            description: None,
            course: "main".into(),
            position: 0,
            created_at: now,
            updated_at: now,
        };
        let dish = DomainDish::try_from(row.clone()).unwrap();
        assert_eq!(dish.course, CourseStage::Main);

        let bad = Dish {
            course: "soup".into(),
            ..row
        };
        assert!(DomainDish::try_from(bad).is_err());
    }

    #[test]
    fn new_dish_stores_course_text() {
        let domain = DomainNewDish::try_new(
            MenuId::new(4).unwrap(),
            "Pudim",
            None,
            CourseStage::Dessert,
            1,
        )
        .unwrap();
        let now = Utc::now().naive_utc();
        let row = NewDish::from_domain(&domain, now);
        assert_eq!(row.menu_id, 4);
        assert_eq!(row.course, "dessert");
    }

    #[test]
    fn menu_row_into_domain() {
        let now = Utc::now().naive_utc();
        let menu = DomainMenu::try_from(Menu {
            id: 1,
            name: "Jantar".into(),
            price_per_person: 8500,
            description: None,
            active: true,
            created_at: now,
            updated_at: now,
        })
        .unwrap();
        assert_eq!(menu.price_per_person.cents(), 8500);
        assert!(menu.active);
    }
}
