use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::email_history::{EmailRecord, NewEmailRecord};
use crate::domain::event::{
    Event, EventChanges, EventStatus, NewEvent, NewSnapshotDish, NewWineLine, SnapshotDish, Venue,
    WineLine,
};
use crate::domain::menu::{Dish, Menu, MenuWithDishes, NewDish, NewMenu, UpdateDish, UpdateMenu};
use crate::domain::settings::{NewSetting, Setting};
use crate::domain::types::{ClientId, DishId, EventId, MenuId};
use crate::repository::errors::RepositoryResult;

pub mod client;
pub mod errors;
pub mod event;
pub mod menu;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod settings;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring over name, phone, email and company.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventListQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<EventStatus>,
    pub venue: Option<Venue>,
    pub client_id: Option<ClientId>,
    pub menu_id: Option<MenuId>,
    pub reminder_enabled: Option<bool>,
}

impl EventListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to a single calendar day.
    pub fn on(self, date: NaiveDate) -> Self {
        self.date_from(date).date_to(date)
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn venue(mut self, venue: Venue) -> Self {
        self.venue = Some(venue);
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn menu(mut self, menu_id: MenuId) -> Self {
        self.menu_id = Some(menu_id);
        self
    }

    pub fn reminder_enabled(mut self, enabled: bool) -> Self {
        self.reminder_enabled = Some(enabled);
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<Vec<Client>>;
    /// Clients whose trimmed, lower-cased phone or email equals the given values.
    fn list_contact_matches<'a>(
        &self,
        phone: &str,
        email: Option<&'a str>,
    ) -> RepositoryResult<Vec<Client>>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, client_id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
}

pub trait MenuReader {
    fn get_menu_by_id(&self, id: MenuId) -> RepositoryResult<Option<Menu>>;
    fn list_menus(&self, active_only: bool) -> RepositoryResult<Vec<MenuWithDishes>>;
    /// Dishes of a menu in serving order.
    fn list_dishes(&self, menu_id: MenuId) -> RepositoryResult<Vec<Dish>>;
    fn get_dish_by_id(&self, id: DishId) -> RepositoryResult<Option<Dish>>;
}

pub trait MenuWriter {
    fn create_menu(&self, new_menu: &NewMenu) -> RepositoryResult<Menu>;
    fn update_menu(&self, menu_id: MenuId, updates: &UpdateMenu) -> RepositoryResult<Menu>;
    /// Removes the menu and its dishes.
    fn delete_menu(&self, menu_id: MenuId) -> RepositoryResult<()>;
    fn create_dish(&self, new_dish: &NewDish) -> RepositoryResult<Dish>;
    fn update_dish(&self, dish_id: DishId, updates: &UpdateDish) -> RepositoryResult<Dish>;
    fn delete_dish(&self, dish_id: DishId) -> RepositoryResult<()>;
}

pub trait EventReader {
    fn get_event_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>>;
    /// Matching events ordered by date, time and id.
    fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<Event>>;
    fn list_wine_lines(&self, event_id: EventId) -> RepositoryResult<Vec<WineLine>>;
    fn list_snapshot_dishes(&self, event_id: EventId) -> RepositoryResult<Vec<SnapshotDish>>;
    /// Send history, newest first.
    fn list_email_history(&self, event_id: EventId) -> RepositoryResult<Vec<EmailRecord>>;
}

pub trait EventWriter {
    /// Inserts the event, its wine lines and its dish snapshot atomically.
    fn create_event(
        &self,
        new_event: &NewEvent,
        wines: &[NewWineLine],
        snapshot: &[NewSnapshotDish],
    ) -> RepositoryResult<Event>;
    /// Rewrites the event row and, when present, replaces wine lines and
    /// snapshot wholesale, atomically.
    fn update_event(&self, event_id: EventId, changes: &EventChanges) -> RepositoryResult<Event>;
    /// Removes the event together with its wine lines, snapshot and send history.
    fn delete_event(&self, event_id: EventId) -> RepositoryResult<()>;
    fn record_email(&self, record: &NewEmailRecord) -> RepositoryResult<EmailRecord>;
}

pub trait SettingsReader {
    fn get_setting(&self, key: &str) -> RepositoryResult<Option<Setting>>;
    fn list_settings(&self) -> RepositoryResult<Vec<Setting>>;
}

pub trait SettingsWriter {
    /// Inserts or replaces a setting. A missing description keeps the stored one.
    fn save_setting(&self, setting: &NewSetting) -> RepositoryResult<Setting>;
    fn save_settings(&self, settings: &[NewSetting]) -> RepositoryResult<usize>;
}
