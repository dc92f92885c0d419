//! Scheduled events, their wine lines and dish snapshots.
//!
//! The pure parts of the event lifecycle live here: validation of the
//! operator-controlled fields, merging partial updates and the
//! scheduling-conflict rule. Persistence and orchestration are handled by the
//! repository and service layers.
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::menu::{CourseStage, Dish};
use crate::domain::money::Money;
use crate::domain::pricing::{PricingBreakdown, WineCharge, compute_pricing};
use crate::domain::types::{
    ClientId, EventId, EventType, MenuId, SnapshotDishId, TimeOfDay, TypeConstraintError,
    WineLineId, WineName, sanitize_optional_text, text_enum,
};

/// Half-width of the exclusion window around an event, in minutes.
pub const CONFLICT_WINDOW_MINUTES: i32 = 240;

/// Drinks package price used when the operator does not provide one.
pub const DEFAULT_DRINKS_PRICE_PER_PERSON: Money = Money::from_cents(5000);

/// Largest headcount accepted for one event.
pub const MAX_HEADCOUNT: i32 = 10_000;

/// Largest bottle quantity accepted on one wine line.
pub const MAX_WINE_QUANTITY: i32 = 10_000;

text_enum!(
    /// Physical event space.
    Venue, "venue", {
        HallA => "hall_a",
        HallB => "hall_b",
    }
);

impl Venue {
    pub const fn label(self) -> &'static str {
        match self {
            Venue::HallA => "Salão de Eventos",
            Venue::HallB => "Salão Principal",
        }
    }
}

text_enum!(
    /// Lifecycle status of an event.
    #[derive(Default)]
    EventStatus, "event status", {
        #[default]
        UnderReview => "under_review",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
    }
);

impl EventStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EventStatus::UnderReview => "Em Análise",
            EventStatus::Confirmed => "Confirmado",
            EventStatus::Cancelled => "Cancelado",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub client_id: ClientId,
    pub menu_id: MenuId,
    pub event_type: EventType,
    pub venue: Venue,
    pub headcount: i32,
    pub event_date: NaiveDate,
    pub event_time: TimeOfDay,
    pub status: EventStatus,
    pub price_per_person: Money,
    pub drinks_package: bool,
    pub drinks_price_per_person: Money,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
    #[serde(flatten)]
    pub pricing: PricingBreakdown,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Event {
    pub fn slot(&self) -> ScheduleSlot {
        ScheduleSlot {
            event_date: self.event_date,
            event_time: self.event_time,
            venue: self.venue,
        }
    }

    /// Operator-controlled fields of the event.
    pub fn fields(&self) -> EventFields {
        EventFields {
            client_id: self.client_id,
            menu_id: self.menu_id,
            event_type: self.event_type.clone(),
            venue: self.venue,
            headcount: self.headcount,
            event_date: self.event_date,
            event_time: self.event_time,
            status: self.status,
            price_per_person: self.price_per_person,
            drinks_package: self.drinks_package,
            drinks_price_per_person: self.drinks_price_per_person,
            notes: self.notes.clone(),
            reminder_enabled: self.reminder_enabled,
        }
    }
}

/// Raw event input as submitted by the operator.
#[derive(Clone, Debug, PartialEq)]
pub struct EventInput {
    pub client_id: i32,
    pub menu_id: i32,
    pub event_type: String,
    pub venue: Venue,
    pub headcount: i32,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub status: EventStatus,
    pub price_per_person: i64,
    pub drinks_package: bool,
    pub drinks_price_per_person: i64,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
}

/// Validated operator-controlled fields of an event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventFields {
    pub client_id: ClientId,
    pub menu_id: MenuId,
    pub event_type: EventType,
    pub venue: Venue,
    pub headcount: i32,
    pub event_date: NaiveDate,
    pub event_time: TimeOfDay,
    pub status: EventStatus,
    pub price_per_person: Money,
    pub drinks_package: bool,
    pub drinks_price_per_person: Money,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
}

impl TryFrom<EventInput> for EventFields {
    type Error = TypeConstraintError;

    fn try_from(input: EventInput) -> Result<Self, Self::Error> {
        let client_id =
            ClientId::new(input.client_id).map_err(|_| TypeConstraintError::MissingField("client"))?;
        let menu_id =
            MenuId::new(input.menu_id).map_err(|_| TypeConstraintError::MissingField("menu"))?;
        let event_type = EventType::new(input.event_type)?;
        let event_time = TimeOfDay::parse(&input.event_time)?;
        if input.headcount <= 0 {
            return Err(TypeConstraintError::NonPositiveValue("headcount"));
        }
        if input.headcount > MAX_HEADCOUNT {
            return Err(TypeConstraintError::ValueTooLarge("headcount"));
        }
        let price_per_person = Money::positive(input.price_per_person, "price per person")?
            .at_most(Money::MAX_UNIT_PRICE, "price per person")?;
        let drinks_price_per_person = if input.drinks_package {
            Money::positive(input.drinks_price_per_person, "drinks price per person")?
        } else {
            Money::non_negative(input.drinks_price_per_person, "drinks price per person")?
        }
        .at_most(Money::MAX_UNIT_PRICE, "drinks price per person")?;

        Ok(Self {
            client_id,
            menu_id,
            event_type,
            venue: input.venue,
            headcount: input.headcount,
            event_date: input.event_date,
            event_time,
            status: input.status,
            price_per_person,
            drinks_package: input.drinks_package,
            drinks_price_per_person,
            notes: sanitize_optional_text(input.notes),
            reminder_enabled: input.reminder_enabled,
        })
    }
}

impl EventFields {
    pub fn slot(&self) -> ScheduleSlot {
        ScheduleSlot {
            event_date: self.event_date,
            event_time: self.event_time,
            venue: self.venue,
        }
    }

    fn into_input(self) -> EventInput {
        EventInput {
            client_id: self.client_id.get(),
            menu_id: self.menu_id.get(),
            event_type: self.event_type.into_inner(),
            venue: self.venue,
            headcount: self.headcount,
            event_date: self.event_date,
            event_time: self.event_time.to_string(),
            status: self.status,
            price_per_person: self.price_per_person.cents(),
            drinks_package: self.drinks_package,
            drinks_price_per_person: self.drinks_price_per_person.cents(),
            notes: self.notes,
            reminder_enabled: self.reminder_enabled,
        }
    }
}

/// Partial event update. `None` keeps the stored value; `notes: Some(None)`
/// clears the notes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventPatch {
    pub client_id: Option<i32>,
    pub menu_id: Option<i32>,
    pub event_type: Option<String>,
    pub venue: Option<Venue>,
    pub headcount: Option<i32>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub status: Option<EventStatus>,
    pub price_per_person: Option<i64>,
    pub drinks_package: Option<bool>,
    pub drinks_price_per_person: Option<i64>,
    pub notes: Option<Option<String>>,
    pub reminder_enabled: Option<bool>,
}

impl EventPatch {
    /// Merges the patch over the stored event and validates the merged record.
    pub fn apply(self, current: &Event) -> Result<EventFields, TypeConstraintError> {
        let base = current.fields().into_input();
        EventFields::try_from(EventInput {
            client_id: self.client_id.unwrap_or(base.client_id),
            menu_id: self.menu_id.unwrap_or(base.menu_id),
            event_type: self.event_type.unwrap_or(base.event_type),
            venue: self.venue.unwrap_or(base.venue),
            headcount: self.headcount.unwrap_or(base.headcount),
            event_date: self.event_date.unwrap_or(base.event_date),
            event_time: self.event_time.unwrap_or(base.event_time),
            status: self.status.unwrap_or(base.status),
            price_per_person: self.price_per_person.unwrap_or(base.price_per_person),
            drinks_package: self.drinks_package.unwrap_or(base.drinks_package),
            drinks_price_per_person: self
                .drinks_price_per_person
                .unwrap_or(base.drinks_price_per_person),
            notes: self.notes.unwrap_or(base.notes),
            reminder_enabled: self.reminder_enabled.unwrap_or(base.reminder_enabled),
        })
    }
}

/// Event fields together with the pricing derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub fields: EventFields,
    pub pricing: PricingBreakdown,
}

impl NewEvent {
    /// Runs the pricing calculator over the fields and the given wine lines.
    pub fn priced(
        fields: EventFields,
        wines: &[WineCharge],
    ) -> Result<Self, TypeConstraintError> {
        let pricing = compute_pricing(
            fields.headcount,
            fields.price_per_person,
            fields.drinks_package,
            fields.drinks_price_per_person,
            wines,
        )?;
        Ok(Self { fields, pricing })
    }
}

/// Everything a single event update writes.
#[derive(Clone, Debug, PartialEq)]
pub struct EventChanges {
    pub event: NewEvent,
    /// Replacement wine lines; `None` keeps the stored ones.
    pub wines: Option<Vec<NewWineLine>>,
    /// Replacement dish snapshot; `None` keeps the stored one.
    pub snapshot: Option<Vec<NewSnapshotDish>>,
}

/// Venue/day/time a booking occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub event_date: NaiveDate,
    pub event_time: TimeOfDay,
    pub venue: Venue,
}

/// Finds the booking that collides with `slot`.
///
/// Only non-cancelled events at the same venue on the same day, other than
/// `exclude`, whose time lies within the inclusive ±4h window are considered.
/// When several collide the earliest one (then the lowest id) is returned.
pub fn find_conflict<'a>(
    slot: &ScheduleSlot,
    existing: &'a [Event],
    exclude: Option<EventId>,
) -> Option<&'a Event> {
    existing
        .iter()
        .filter(|event| Some(event.id) != exclude)
        .filter(|event| event.status != EventStatus::Cancelled)
        .filter(|event| event.venue == slot.venue && event.event_date == slot.event_date)
        .filter(|event| {
            (event.event_time.minutes() - slot.event_time.minutes()).abs()
                <= CONFLICT_WINDOW_MINUTES
        })
        .min_by_key(|event| (event.event_time, event.id))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WineLine {
    pub id: WineLineId,
    pub event_id: EventId,
    pub wine_name: WineName,
    pub quantity: i32,
    pub bottle_price: Money,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WineLine {
    pub fn charge(&self) -> WineCharge {
        WineCharge {
            quantity: self.quantity,
            bottle_price: self.bottle_price,
        }
    }

    pub fn subtotal(&self) -> Money {
        self.bottle_price * i64::from(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewWineLine {
    pub wine_name: WineName,
    pub quantity: i32,
    pub bottle_price: Money,
}

impl NewWineLine {
    pub fn try_new(
        wine_name: impl Into<String>,
        quantity: i32,
        bottle_price: i64,
    ) -> Result<Self, TypeConstraintError> {
        let wine_name = WineName::new(wine_name)?;
        if quantity <= 0 {
            return Err(TypeConstraintError::NonPositiveValue("wine quantity"));
        }
        if quantity > MAX_WINE_QUANTITY {
            return Err(TypeConstraintError::ValueTooLarge("wine quantity"));
        }
        Ok(Self {
            wine_name,
            quantity,
            bottle_price: Money::positive(bottle_price, "wine bottle price")?
                .at_most(Money::MAX_UNIT_PRICE, "wine bottle price")?,
        })
    }

    pub fn charge(&self) -> WineCharge {
        WineCharge {
            quantity: self.quantity,
            bottle_price: self.bottle_price,
        }
    }
}

impl From<&WineLine> for NewWineLine {
    fn from(line: &WineLine) -> Self {
        Self {
            wine_name: line.wine_name.clone(),
            quantity: line.quantity,
            bottle_price: line.bottle_price,
        }
    }
}

/// Dish frozen on an event at snapshot time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SnapshotDish {
    pub id: SnapshotDishId,
    pub event_id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub course: CourseStage,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

/// Values copied from a menu dish into an event snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct NewSnapshotDish {
    pub name: String,
    pub description: Option<String>,
    pub course: CourseStage,
    pub position: i32,
}

impl From<&Dish> for NewSnapshotDish {
    fn from(dish: &Dish) -> Self {
        Self {
            name: dish.name.as_str().to_string(),
            description: dish.description.clone(),
            course: dish.course,
            position: dish.position,
        }
    }
}

/// Status counts and revenue of a set of events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub total_events: usize,
    pub under_review: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    /// Sum of totals of every event that is not cancelled.
    pub revenue: Money,
}

impl EventSummary {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        events
            .into_iter()
            .fold(EventSummary::default(), |mut summary, event| {
                summary.total_events += 1;
                match event.status {
                    EventStatus::UnderReview => summary.under_review += 1,
                    EventStatus::Confirmed => summary.confirmed += 1,
                    EventStatus::Cancelled => summary.cancelled += 1,
                }
                if event.status != EventStatus::Cancelled {
                    summary.revenue = summary.revenue + event.pricing.total;
                }
                summary
            })
    }
}
