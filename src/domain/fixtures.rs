//! Sample aggregates shared by unit tests.

use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::domain::client::Client;
use crate::domain::event::{Event, EventFields, EventInput, EventStatus, NewEvent, Venue};
use crate::domain::menu::{CourseStage, Dish, Menu};
use crate::domain::money::Money;
use crate::domain::types::{
    ClientEmail, ClientId, ClientName, DishId, DishName, EventId, MenuId, MenuName, PhoneNumber,
};

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn client(id: i32, name: &str, phone: &str, email: Option<&str>) -> Client {
    Client {
        id: ClientId::new(id).unwrap(),
        full_name: ClientName::new(name).unwrap(),
        phone: PhoneNumber::new(phone).unwrap(),
        email: email.map(|e| ClientEmail::new(e).unwrap()),
        address: None,
        company: None,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn menu(id: i32, name: &str, price_per_person: i64) -> Menu {
    Menu {
        id: MenuId::new(id).unwrap(),
        name: MenuName::new(name).unwrap(),
        price_per_person: Money::from_cents(price_per_person),
        description: None,
        active: true,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn dish(id: i32, menu_id: i32, name: &str, course: CourseStage, position: i32) -> Dish {
    Dish {
        id: DishId::new(id).unwrap(),
        menu_id: MenuId::new(menu_id).unwrap(),
        name: DishName::new(name).unwrap(),
        description: None,
        course,
        position,
        created_at: now(),
        updated_at: now(),
    }
}

/// Raw input for a 50 guest wedding with the drinks package.
pub fn event_input() -> EventInput {
    EventInput {
        client_id: 1,
        menu_id: 1,
        event_type: "Casamento".into(),
        venue: Venue::HallA,
        headcount: 50,
        event_date: date(2025, 3, 15),
        event_time: "14:00".into(),
        status: EventStatus::UnderReview,
        price_per_person: 8500,
        drinks_package: true,
        drinks_price_per_person: 5000,
        notes: None,
        reminder_enabled: true,
    }
}

/// Stored event built from `input` with pricing applied.
pub fn stored_event(id: i32, input: EventInput) -> Event {
    let priced = NewEvent::priced(EventFields::try_from(input).unwrap(), &[]).unwrap();
    let f = priced.fields;
    Event {
        id: EventId::new(id).unwrap(),
        client_id: f.client_id,
        menu_id: f.menu_id,
        event_type: f.event_type,
        venue: f.venue,
        headcount: f.headcount,
        event_date: f.event_date,
        event_time: f.event_time,
        status: f.status,
        price_per_person: f.price_per_person,
        drinks_package: f.drinks_package,
        drinks_price_per_person: f.drinks_price_per_person,
        notes: f.notes,
        reminder_enabled: f.reminder_enabled,
        pricing: priced.pricing,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn event_at(id: i32, time: &str, venue: Venue, status: EventStatus) -> Event {
    stored_event(
        id,
        EventInput {
            event_time: time.into(),
            venue,
            status,
            ..event_input()
        },
    )
}
