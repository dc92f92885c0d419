use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::types::{
    DishId, DishName, MenuId, MenuName, TypeConstraintError, sanitize_optional_text, text_enum,
};

text_enum!(
    /// Course a dish belongs to; menus are ordered by course, then position.
    CourseStage, "course stage", {
        Starter => "starter",
        Appetizer => "appetizer",
        Main => "main",
        Dessert => "dessert",
    }
);

impl CourseStage {
    /// Position of the course in a served meal.
    pub const fn rank(self) -> u8 {
        match self {
            CourseStage::Starter => 0,
            CourseStage::Appetizer => 1,
            CourseStage::Main => 2,
            CourseStage::Dessert => 3,
        }
    }

    /// Label printed on proposals.
    pub const fn label(self) -> &'static str {
        match self {
            CourseStage::Starter => "Couvert",
            CourseStage::Appetizer => "Entrada",
            CourseStage::Main => "Prato Principal",
            CourseStage::Dessert => "Sobremesa",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Menu {
    pub id: MenuId,
    pub name: MenuName,
    pub price_per_person: Money,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: DishId,
    pub menu_id: MenuId,
    pub name: DishName,
    pub description: Option<String>,
    pub course: CourseStage,
    pub position: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Menu together with its dishes in serving order.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MenuWithDishes {
    #[serde(flatten)]
    pub menu: Menu,
    pub dishes: Vec<Dish>,
}

/// Sorts dishes by course, then position, then id.
pub fn sort_dishes(dishes: &mut [Dish]) {
    dishes.sort_by_key(|d| (d.course.rank(), d.position, d.id));
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMenu {
    pub name: MenuName,
    pub price_per_person: Money,
    pub description: Option<String>,
    pub active: bool,
}

impl NewMenu {
    pub fn try_new(
        name: impl Into<String>,
        price_per_person: i64,
        description: Option<String>,
        active: bool,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            name: MenuName::new(name)?,
            price_per_person: Money::positive(price_per_person, "price per person")?
                .at_most(Money::MAX_UNIT_PRICE, "price per person")?,
            description: sanitize_optional_text(description),
            active,
        })
    }
}

pub type UpdateMenu = NewMenu;

/// Partial menu update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuPatch {
    pub name: Option<String>,
    pub price_per_person: Option<i64>,
    pub description: Option<Option<String>>,
    pub active: Option<bool>,
}

impl MenuPatch {
    pub fn apply(self, current: &Menu) -> Result<UpdateMenu, TypeConstraintError> {
        NewMenu::try_new(
            self.name
                .unwrap_or_else(|| current.name.as_str().to_string()),
            self.price_per_person
                .unwrap_or(current.price_per_person.cents()),
            self.description
                .unwrap_or_else(|| current.description.clone()),
            self.active.unwrap_or(current.active),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDish {
    pub menu_id: MenuId,
    pub name: DishName,
    pub description: Option<String>,
    pub course: CourseStage,
    pub position: i32,
}

impl NewDish {
    pub fn try_new(
        menu_id: MenuId,
        name: impl Into<String>,
        description: Option<String>,
        course: CourseStage,
        position: i32,
    ) -> Result<Self, TypeConstraintError> {
        if position < 0 {
            return Err(TypeConstraintError::NegativeValue("position"));
        }
        Ok(Self {
            menu_id,
            name: DishName::new(name)?,
            description: sanitize_optional_text(description),
            course,
            position,
        })
    }
}

/// Replacement values for an existing dish. A dish never moves between menus.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateDish {
    pub name: DishName,
    pub description: Option<String>,
    pub course: CourseStage,
    pub position: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DishPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub course: Option<CourseStage>,
    pub position: Option<i32>,
}

impl DishPatch {
    pub fn apply(self, current: &Dish) -> Result<UpdateDish, TypeConstraintError> {
        let merged = NewDish::try_new(
            current.menu_id,
            self.name
                .unwrap_or_else(|| current.name.as_str().to_string()),
            self.description
                .unwrap_or_else(|| current.description.clone()),
            self.course.unwrap_or(current.course),
            self.position.unwrap_or(current.position),
        )?;
        Ok(UpdateDish {
            name: merged.name,
            description: merged.description,
            course: merged.course,
            position: merged.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dish(id: i32, course: CourseStage, position: i32) -> Dish {
        let now = Utc::now().naive_utc();
        Dish {
            id: DishId::new(id).unwrap(),
            menu_id: MenuId::new(1).unwrap(),
            name: DishName::new(format!("dish {id}")).unwrap(),
            description: None,
            course,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn course_stage_round_trips_through_text() {
        for stage in CourseStage::ALL {
            assert_eq!(stage.as_str().parse::<CourseStage>().unwrap(), *stage);
        }
        assert!("soup".parse::<CourseStage>().is_err());
        assert_eq!(
            serde_json::to_string(&CourseStage::Main).unwrap(),
            "\"main\""
        );
    }

    #[test]
    fn dishes_sort_by_course_then_position() {
        let mut dishes = vec![
            dish(1, CourseStage::Dessert, 0),
            dish(2, CourseStage::Main, 1),
            dish(3, CourseStage::Starter, 5),
            dish(4, CourseStage::Main, 0),
        ];
        sort_dishes(&mut dishes);
        let ids: Vec<i32> = dishes.iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, vec![3, 4, 2, 1]);
    }

    #[test]
    fn menu_requires_positive_price() {
        assert_eq!(
            NewMenu::try_new("Jantar", 0, None, true).unwrap_err(),
            TypeConstraintError::NonPositiveValue("price per person")
        );
        let menu = NewMenu::try_new(" Jantar ", 8500, Some(" <b>Menu</b> ".into()), true).unwrap();
        assert_eq!(menu.name.as_str(), "Jantar");
        assert_eq!(menu.description.as_deref(), Some("<b>Menu</b>"));
    }

    #[test]
    fn dish_patch_keeps_menu() {
        let current = dish(9, CourseStage::Starter, 0);
        let update = DishPatch {
            course: Some(CourseStage::Dessert),
            description: Some(Some("Com calda".into())),
            ..Default::default()
        }
        .apply(&current)
        .unwrap();
        assert_eq!(update.course, CourseStage::Dessert);
        assert_eq!(update.name.as_str(), "dish 9");
        assert_eq!(update.description.as_deref(), Some("Com calda"));
    }
}
