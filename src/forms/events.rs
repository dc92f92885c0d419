//! Event payloads: create, partial update and list filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::event::{
    DEFAULT_DRINKS_PRICE_PER_PERSON, EventFields, EventInput, EventPatch, EventStatus,
    NewWineLine, Venue,
};
use crate::domain::types::{ClientId, MenuId};
use crate::forms::{FormError, double_option};
use crate::repository::EventListQuery;

fn default_drinks_price() -> i64 {
    DEFAULT_DRINKS_PRICE_PER_PERSON.cents()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct WineLineForm {
    #[validate(length(max = 255))]
    pub wine_name: String,
    #[validate(range(max = 10000))]
    pub quantity: i32,
    /// Cents.
    #[validate(range(max = 100000000))]
    pub bottle_price: i64,
}

impl TryFrom<WineLineForm> for NewWineLine {
    type Error = FormError;

    fn try_from(form: WineLineForm) -> Result<Self, Self::Error> {
        Ok(NewWineLine::try_new(
            form.wine_name,
            form.quantity,
            form.bottle_price,
        )?)
    }
}

fn wine_lines(forms: Vec<WineLineForm>) -> Result<Vec<NewWineLine>, FormError> {
    forms.into_iter().map(NewWineLine::try_from).collect()
}

#[derive(Debug, Clone, Deserialize, Validate)]
/// Payload for booking a new event.
pub struct CreateEventForm {
    pub client_id: i32,
    pub menu_id: i32,
    #[validate(length(max = 100))]
    pub event_type: String,
    pub venue: Venue,
    #[validate(range(max = 10000))]
    pub headcount: i32,
    pub event_date: NaiveDate,
    pub event_time: String,
    #[serde(default)]
    pub status: EventStatus,
    #[validate(range(max = 100000000))]
    pub price_per_person: i64,
    #[serde(default)]
    pub drinks_package: bool,
    #[serde(default = "default_drinks_price")]
    #[validate(range(max = 100000000))]
    pub drinks_price_per_person: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub reminder_enabled: bool,
    #[serde(default)]
    #[validate(length(max = 100), nested)]
    pub wines: Vec<WineLineForm>,
}

/// Validated event fields with the wine lines submitted alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub fields: EventFields,
    pub wines: Vec<NewWineLine>,
}

impl TryFrom<CreateEventForm> for EventDraft {
    type Error = FormError;

    fn try_from(form: CreateEventForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let fields = EventFields::try_from(EventInput {
            client_id: form.client_id,
            menu_id: form.menu_id,
            event_type: form.event_type,
            venue: form.venue,
            headcount: form.headcount,
            event_date: form.event_date,
            event_time: form.event_time,
            status: form.status,
            price_per_person: form.price_per_person,
            drinks_package: form.drinks_package,
            drinks_price_per_person: form.drinks_price_per_person,
            notes: form.notes,
            reminder_enabled: form.reminder_enabled,
        })?;
        Ok(EventDraft {
            fields,
            wines: wine_lines(form.wines)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
/// Partial event update. Absent fields keep their stored values.
pub struct UpdateEventForm {
    #[serde(default)]
    pub client_id: Option<i32>,
    #[serde(default)]
    pub menu_id: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub event_type: Option<String>,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    #[validate(range(max = 10000))]
    pub headcount: Option<i32>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    #[validate(range(max = 100000000))]
    pub price_per_person: Option<i64>,
    #[serde(default)]
    pub drinks_package: Option<bool>,
    #[serde(default)]
    #[validate(range(max = 100000000))]
    pub drinks_price_per_person: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub reminder_enabled: Option<bool>,
    /// Rebuild the dish snapshot from `menu_id`; ignored without a menu id.
    #[serde(default)]
    pub regenerate_snapshot: bool,
    /// Replaces every wine line when present, `[]` removes them all.
    #[serde(default)]
    #[validate(length(max = 100), nested)]
    pub wines: Option<Vec<WineLineForm>>,
}

/// Parsed form of [`UpdateEventForm`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub patch: EventPatch,
    pub wines: Option<Vec<NewWineLine>>,
    pub regenerate_snapshot: bool,
}

impl TryFrom<UpdateEventForm> for EventUpdate {
    type Error = FormError;

    fn try_from(form: UpdateEventForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let wines = form.wines.map(wine_lines).transpose()?;
        Ok(EventUpdate {
            patch: EventPatch {
                client_id: form.client_id,
                menu_id: form.menu_id,
                event_type: form.event_type,
                venue: form.venue,
                headcount: form.headcount,
                event_date: form.event_date,
                event_time: form.event_time,
                status: form.status,
                price_per_person: form.price_per_person,
                drinks_package: form.drinks_package,
                drinks_price_per_person: form.drinks_price_per_person,
                notes: form.notes,
                reminder_enabled: form.reminder_enabled,
            },
            wines,
            regenerate_snapshot: form.regenerate_snapshot,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Query string filters shared by the event list and reports.
pub struct EventFilterForm {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<EventStatus>,
    pub venue: Option<Venue>,
    pub client_id: Option<i32>,
    pub menu_id: Option<i32>,
}

impl TryFrom<EventFilterForm> for EventListQuery {
    type Error = FormError;

    fn try_from(form: EventFilterForm) -> Result<Self, Self::Error> {
        let mut query = EventListQuery::new();
        if let Some(date) = form.date_from {
            query = query.date_from(date);
        }
        if let Some(date) = form.date_to {
            query = query.date_to(date);
        }
        if let Some(status) = form.status {
            query = query.status(status);
        }
        if let Some(venue) = form.venue {
            query = query.venue(venue);
        }
        if let Some(client_id) = form.client_id {
            query = query.client(ClientId::new(client_id)?);
        }
        if let Some(menu_id) = form.menu_id {
            query = query.menu(MenuId::new(menu_id)?);
        }
        Ok(query)
    }
}
