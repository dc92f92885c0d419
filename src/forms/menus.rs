use serde::Deserialize;
use validator::Validate;

use crate::domain::menu::{CourseStage, DishPatch, MenuPatch, NewDish, NewMenu};
use crate::domain::types::MenuId;
use crate::forms::{FormError, double_option};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenuForm {
    #[validate(length(max = 255))]
    pub name: String,
    /// Cents.
    #[validate(range(max = 100000000))]
    pub price_per_person: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl TryFrom<CreateMenuForm> for NewMenu {
    type Error = FormError;

    fn try_from(form: CreateMenuForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewMenu::try_new(
            form.name,
            form.price_per_person,
            form.description,
            form.active,
        )?)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMenuForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(range(max = 100000000))]
    pub price_per_person: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl TryFrom<UpdateMenuForm> for MenuPatch {
    type Error = FormError;

    fn try_from(form: UpdateMenuForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(MenuPatch {
            name: form.name,
            price_per_person: form.price_per_person,
            description: form.description,
            active: form.active,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDishForm {
    pub menu_id: i32,
    #[validate(length(max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub course: CourseStage,
    #[serde(default)]
    pub position: i32,
}

impl TryFrom<CreateDishForm> for NewDish {
    type Error = FormError;

    fn try_from(form: CreateDishForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewDish::try_new(
            MenuId::new(form.menu_id)?,
            form.name,
            form.description,
            form.course,
            form.position,
        )?)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDishForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub course: Option<CourseStage>,
    #[serde(default)]
    pub position: Option<i32>,
}

impl TryFrom<UpdateDishForm> for DishPatch {
    type Error = FormError;

    fn try_from(form: UpdateDishForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(DishPatch {
            name: form.name,
            description: form.description,
            course: form.course,
            position: form.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_defaults_to_active() {
        let form: CreateMenuForm =
            serde_json::from_str(r#"{"name": "Degustação", "price_per_person": 8500}"#).unwrap();
        let menu = NewMenu::try_from(form).unwrap();
        assert!(menu.active);
        assert_eq!(menu.price_per_person.cents(), 8500);
    }

    #[test]
    fn menu_price_must_be_positive() {
        let form = CreateMenuForm {
            name: "Degustação".into(),
            price_per_person: 0,
            description: None,
            active: true,
        };
        assert_eq!(
            NewMenu::try_from(form).unwrap_err().to_string(),
            "price per person must be greater than zero"
        );
    }

    #[test]
    fn dish_course_is_parsed_from_snake_case() {
        let form: CreateDishForm = serde_json::from_str(
            r#"{"menu_id": 3, "name": "Burrata", "course": "appetizer", "position": 2}"#,
        )
        .unwrap();
        let dish = NewDish::try_from(form).unwrap();
        assert_eq!(dish.course, CourseStage::Appetizer);
        assert_eq!(dish.menu_id.get(), 3);

        assert!(
            serde_json::from_str::<CreateDishForm>(
                r#"{"menu_id": 3, "name": "Burrata", "course": "soup"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn dish_requires_menu() {
        let form = CreateDishForm {
            menu_id: 0,
            name: "Burrata".into(),
            description: None,
            course: CourseStage::Starter,
            position: 0,
        };
        assert!(NewDish::try_from(form).is_err());
    }
}
