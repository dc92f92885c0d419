//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::email_history::{EmailRecord, NewEmailRecord};
use crate::domain::event::{
    Event, EventChanges, NewEvent, NewSnapshotDish, NewWineLine, SnapshotDish, WineLine,
};
use crate::domain::menu::{Dish, Menu, MenuWithDishes, NewDish, NewMenu, UpdateDish, UpdateMenu};
use crate::domain::settings::{NewSetting, Setting};
use crate::domain::types::{ClientId, DishId, EventId, MenuId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, EventListQuery, EventReader, EventWriter,
    MenuReader, MenuWriter, SettingsReader, SettingsWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<Vec<Client>>;
        fn list_contact_matches<'a>(
            &self,
            phone: &str,
            email: Option<&'a str>,
        ) -> RepositoryResult<Vec<Client>>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(
            &self,
            client_id: ClientId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
    }

    impl MenuReader for Repository {
        fn get_menu_by_id(&self, id: MenuId) -> RepositoryResult<Option<Menu>>;
        fn list_menus(&self, active_only: bool) -> RepositoryResult<Vec<MenuWithDishes>>;
        fn list_dishes(&self, menu_id: MenuId) -> RepositoryResult<Vec<Dish>>;
        fn get_dish_by_id(&self, id: DishId) -> RepositoryResult<Option<Dish>>;
    }

    impl MenuWriter for Repository {
        fn create_menu(&self, new_menu: &NewMenu) -> RepositoryResult<Menu>;
        fn update_menu(&self, menu_id: MenuId, updates: &UpdateMenu) -> RepositoryResult<Menu>;
        fn delete_menu(&self, menu_id: MenuId) -> RepositoryResult<()>;
        fn create_dish(&self, new_dish: &NewDish) -> RepositoryResult<Dish>;
        fn update_dish(&self, dish_id: DishId, updates: &UpdateDish) -> RepositoryResult<Dish>;
        fn delete_dish(&self, dish_id: DishId) -> RepositoryResult<()>;
    }

    impl EventReader for Repository {
        fn get_event_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>>;
        fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<Event>>;
        fn list_wine_lines(&self, event_id: EventId) -> RepositoryResult<Vec<WineLine>>;
        fn list_snapshot_dishes(&self, event_id: EventId) -> RepositoryResult<Vec<SnapshotDish>>;
        fn list_email_history(&self, event_id: EventId) -> RepositoryResult<Vec<EmailRecord>>;
    }

    impl EventWriter for Repository {
        fn create_event(
            &self,
            new_event: &NewEvent,
            wines: &[NewWineLine],
            snapshot: &[NewSnapshotDish],
        ) -> RepositoryResult<Event>;
        fn update_event(&self, event_id: EventId, changes: &EventChanges) -> RepositoryResult<Event>;
        fn delete_event(&self, event_id: EventId) -> RepositoryResult<()>;
        fn record_email(&self, record: &NewEmailRecord) -> RepositoryResult<EmailRecord>;
    }

    impl SettingsReader for Repository {
        fn get_setting(&self, key: &str) -> RepositoryResult<Option<Setting>>;
        fn list_settings(&self) -> RepositoryResult<Vec<Setting>>;
    }

    impl SettingsWriter for Repository {
        fn save_setting(&self, setting: &NewSetting) -> RepositoryResult<Setting>;
        fn save_settings(&self, settings: &[NewSetting]) -> RepositoryResult<usize>;
    }
}
