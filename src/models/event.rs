use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::event::{
    Event as DomainEvent, NewEvent as DomainNewEvent, NewSnapshotDish, NewWineLine as DomainNewWineLine,
    SnapshotDish, WineLine as DomainWineLine,
};
use crate::domain::money::Money;
use crate::domain::pricing::PricingBreakdown;
use crate::domain::types::{
    ClientId, EventId, EventType, MenuId, SnapshotDishId, TimeOfDay, TypeConstraintError,
    WineLineId, WineName,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::event::Event`].
pub struct Event {
    pub id: i32,
    pub client_id: i32,
    pub menu_id: i32,
    pub event_type: String,
    pub venue: String,
    pub headcount: i32,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub status: String,
    pub price_per_person: i64,
    pub drinks_package: bool,
    pub drinks_price_per_person: i64,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
    pub menu_subtotal: i64,
    pub drinks_subtotal: i64,
    pub wine_subtotal: i64,
    pub service_charge: i64,
    pub total: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Column values written on insert and on update.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::events)]
#[diesel(treat_none_as_null = true)]
pub struct EventValues<'a> {
    pub client_id: i32,
    pub menu_id: i32,
    pub event_type: &'a str,
    pub venue: &'a str,
    pub headcount: i32,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub status: &'a str,
    pub price_per_person: i64,
    pub drinks_package: bool,
    pub drinks_price_per_person: i64,
    pub notes: Option<&'a str>,
    pub reminder_enabled: bool,
    pub menu_subtotal: i64,
    pub drinks_subtotal: i64,
    pub wine_subtotal: i64,
    pub service_charge: i64,
    pub total: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::event_wines)]
#[diesel(belongs_to(Event, foreign_key = event_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WineLine {
    pub id: i32,
    pub event_id: i32,
    pub wine_name: String,
    pub quantity: i32,
    pub bottle_price: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::event_wines)]
pub struct NewWineLine<'a> {
    pub event_id: i32,
    pub wine_name: &'a str,
    pub quantity: i32,
    pub bottle_price: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::event_dishes)]
#[diesel(belongs_to(Event, foreign_key = event_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Snapshot row of a dish frozen on an event.
pub struct EventDish {
    pub id: i32,
    pub event_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub course: String,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::event_dishes)]
pub struct NewEventDish<'a> {
    pub event_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub course: &'a str,
    pub position: i32,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Event> for DomainEvent {
    type Error = TypeConstraintError;

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EventId::new(event.id)?,
            client_id: ClientId::new(event.client_id)?,
            menu_id: MenuId::new(event.menu_id)?,
            event_type: EventType::new(event.event_type)?,
            venue: event.venue.parse()?,
            headcount: event.headcount,
            event_date: event.event_date,
            event_time: TimeOfDay::parse(&event.event_time)?,
            status: event.status.parse()?,
            price_per_person: Money::from_cents(event.price_per_person),
            drinks_package: event.drinks_package,
            drinks_price_per_person: Money::from_cents(event.drinks_price_per_person),
            notes: event.notes,
            reminder_enabled: event.reminder_enabled,
            pricing: PricingBreakdown {
                menu_subtotal: Money::from_cents(event.menu_subtotal),
                drinks_subtotal: Money::from_cents(event.drinks_subtotal),
                wine_subtotal: Money::from_cents(event.wine_subtotal),
                service_charge: Money::from_cents(event.service_charge),
                total: Money::from_cents(event.total),
            },
            created_at: event.created_at,
            updated_at: event.updated_at,
        })
    }
}

impl<'a> EventValues<'a> {
    pub fn from_domain(event: &'a DomainNewEvent, now: NaiveDateTime) -> Self {
        let fields = &event.fields;
        let pricing = &event.pricing;
        Self {
            client_id: fields.client_id.get(),
            menu_id: fields.menu_id.get(),
            event_type: fields.event_type.as_str(),
            venue: fields.venue.as_str(),
            headcount: fields.headcount,
            event_date: fields.event_date,
            event_time: fields.event_time.to_string(),
            status: fields.status.as_str(),
            price_per_person: fields.price_per_person.cents(),
            drinks_package: fields.drinks_package,
            drinks_price_per_person: fields.drinks_price_per_person.cents(),
            notes: fields.notes.as_deref(),
            reminder_enabled: fields.reminder_enabled,
            menu_subtotal: pricing.menu_subtotal.cents(),
            drinks_subtotal: pricing.drinks_subtotal.cents(),
            wine_subtotal: pricing.wine_subtotal.cents(),
            service_charge: pricing.service_charge.cents(),
            total: pricing.total.cents(),
            updated_at: now,
        }
    }
}

impl TryFrom<WineLine> for DomainWineLine {
    type Error = TypeConstraintError;

    fn try_from(line: WineLine) -> Result<Self, Self::Error> {
        Ok(Self {
            id: WineLineId::new(line.id)?,
            event_id: EventId::new(line.event_id)?,
            wine_name: WineName::new(line.wine_name)?,
            quantity: line.quantity,
            bottle_price: Money::from_cents(line.bottle_price),
            created_at: line.created_at,
            updated_at: line.updated_at,
        })
    }
}

impl<'a> NewWineLine<'a> {
    pub fn from_domain(event_id: i32, line: &'a DomainNewWineLine, now: NaiveDateTime) -> Self {
        Self {
            event_id,
            wine_name: line.wine_name.as_str(),
            quantity: line.quantity,
            bottle_price: line.bottle_price.cents(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<EventDish> for SnapshotDish {
    type Error = TypeConstraintError;

    fn try_from(dish: EventDish) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SnapshotDishId::new(dish.id)?,
            event_id: EventId::new(dish.event_id)?,
            name: dish.name,
            description: dish.description,
            course: dish.course.parse()?,
            position: dish.position,
            created_at: dish.created_at,
        })
    }
}

impl<'a> NewEventDish<'a> {
    pub fn from_domain(event_id: i32, dish: &'a NewSnapshotDish, now: NaiveDateTime) -> Self {
        Self {
            event_id,
            name: dish.name.as_str(),
            description: dish.description.as_deref(),
            course: dish.course.as_str(),
            position: dish.position,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{EventStatus, Venue};
    use chrono::Utc;

    fn row() -> Event {
        let now = Utc::now().naive_utc();
        Event {
            id: 1,
            client_id: 2,
            menu_id: 3,
            event_type: "Aniversário".into(),
            venue: "hall_b".into(),
            headcount: 40,
            event_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            event_time: "19:30".into(),
            status: "confirmed".into(),
            price_per_person: 9000,
            drinks_package: false,
            drinks_price_per_person: 5000,
            notes: None,
            reminder_enabled: true,
            menu_subtotal: 360000,
            drinks_subtotal: 0,
            wine_subtotal: 0,
            service_charge: 36000,
            total: 396000,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn event_row_into_domain() {
        let event = DomainEvent::try_from(row()).unwrap();
        assert_eq!(event.venue, Venue::HallB);
        assert_eq!(event.status, EventStatus::Confirmed);
        assert_eq!(event.event_time.to_string(), "19:30");
        assert_eq!(event.pricing.total.cents(), 396000);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let bad = Event {
            status: "archived".into(),
            ..row()
        };
        assert_eq!(
            DomainEvent::try_from(bad).unwrap_err().to_string(),
            "unknown event status: archived"
        );
    }

    #[test]
    fn values_carry_pricing() {
        let domain = DomainEvent::try_from(row()).unwrap();
        let new_event = DomainNewEvent::priced(domain.fields(), &[]).unwrap();
        let now = Utc::now().naive_utc();
        let values = EventValues::from_domain(&new_event, now);
        assert_eq!(values.venue, "hall_b");
        assert_eq!(values.status, "confirmed");
        assert_eq!(values.event_time, "19:30");
        assert_eq!(values.total, 396000);
    }
}
