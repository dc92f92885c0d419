use chrono::NaiveDate;
use diesel::dsl::count_star;
use diesel::prelude::*;
use enoteca_backoffice::domain::client::NewClient;
use enoteca_backoffice::domain::email_history::{EmailKind, NewEmailRecord};
use enoteca_backoffice::domain::event::{
    EventChanges, EventFields, EventInput, EventStatus, NewEvent, NewSnapshotDish, NewWineLine,
    Venue,
};
use enoteca_backoffice::domain::menu::{CourseStage, NewDish, NewMenu};
use enoteca_backoffice::domain::settings::NewSetting;
use enoteca_backoffice::domain::types::{ClientId, MenuId};
use enoteca_backoffice::repository::errors::RepositoryError;
use enoteca_backoffice::repository::{
    ClientListQuery, ClientReader, ClientWriter, DieselRepository, EventListQuery, EventReader,
    EventWriter, MenuReader, MenuWriter, SettingsReader, SettingsWriter,
};
use enoteca_backoffice::schema::{email_history, event_dishes, event_wines};

mod common;

fn new_client(name: &str, phone: &str, email: Option<&str>) -> NewClient {
    NewClient::try_new(name, phone, email.map(str::to_string), None, None).unwrap()
}

fn fields(client_id: ClientId, menu_id: MenuId, date: NaiveDate, time: &str) -> EventFields {
    EventFields::try_from(EventInput {
        client_id: client_id.get(),
        menu_id: menu_id.get(),
        event_type: "Casamento".into(),
        venue: Venue::HallA,
        headcount: 50,
        event_date: date,
        event_time: time.into(),
        status: EventStatus::Confirmed,
        price_per_person: 8500,
        drinks_package: true,
        drinks_price_per_person: 5000,
        notes: None,
        reminder_enabled: true,
    })
    .unwrap()
}

fn seed(repo: &DieselRepository) -> (ClientId, MenuId) {
    let client = repo
        .create_client(&new_client("Ana Souza", "11999990000", Some("ana@example.com")))
        .unwrap();
    let menu = repo
        .create_menu(&NewMenu::try_new("Degustação", 8500, None, true).unwrap())
        .unwrap();
    (client.id, menu.id)
}

#[test]
fn test_client_repository_crud() {
    let test_db = common::TestDb::new("test_client_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let bruno = repo
        .create_client(&new_client("Bruno Lima", "11988887777", None))
        .unwrap();
    let ana = repo
        .create_client(&new_client("Ana Souza", "11999990000", Some("Ana@Example.com")))
        .unwrap();
    assert_eq!(ana.email.as_ref().unwrap().as_str(), "ana@example.com");

    let all = repo.list_clients(ClientListQuery::new()).unwrap();
    let names: Vec<_> = all.iter().map(|c| c.full_name.as_str()).collect();
    assert_eq!(names, ["Ana Souza", "Bruno Lima"]);

    let found = repo
        .list_clients(ClientListQuery::new().search("bruno"))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, bruno.id);

    let updated = repo
        .update_client(
            bruno.id,
            &new_client("Bruno Lima", "11988887777", Some("bruno@example.com")),
        )
        .unwrap();
    assert_eq!(updated.email.unwrap().as_str(), "bruno@example.com");

    repo.delete_client(ana.id).unwrap();
    assert!(repo.get_client_by_id(ana.id).unwrap().is_none());
}

#[test]
fn test_contact_matches_by_phone_or_email() {
    let test_db = common::TestDb::new("test_contact_matches.db");
    let repo = DieselRepository::new(test_db.pool());

    repo.create_client(&new_client("Ana Souza", "11999990000", Some("ana@example.com")))
        .unwrap();
    repo.create_client(&new_client("Bruno Lima", "11988887777", None))
        .unwrap();

    let by_phone = repo.list_contact_matches("11988887777", None).unwrap();
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].full_name.as_str(), "Bruno Lima");

    let by_email = repo
        .list_contact_matches("11900000000", Some("ANA@example.com"))
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].full_name.as_str(), "Ana Souza");

    assert!(repo.list_contact_matches("11900000000", None).unwrap().is_empty());
}

#[test]
fn test_menu_dishes_in_serving_order() {
    let test_db = common::TestDb::new("test_menu_dishes.db");
    let repo = DieselRepository::new(test_db.pool());

    let menu = repo
        .create_menu(&NewMenu::try_new("Degustação", 8500, None, true).unwrap())
        .unwrap();
    repo.create_menu(&NewMenu::try_new("Antigo", 6000, None, false).unwrap())
        .unwrap();

    for (name, course, position) in [
        ("Tiramisù", CourseStage::Dessert, 0),
        ("Risoto de funghi", CourseStage::Main, 1),
        ("Pão de fermentação natural", CourseStage::Starter, 0),
        ("Filé ao molho de vinho", CourseStage::Main, 0),
    ] {
        repo.create_dish(&NewDish::try_new(menu.id, name, None, course, position).unwrap())
            .unwrap();
    }

    let dishes = repo.list_dishes(menu.id).unwrap();
    let names: Vec<_> = dishes.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Pão de fermentação natural",
            "Filé ao molho de vinho",
            "Risoto de funghi",
            "Tiramisù",
        ]
    );

    let active = repo.list_menus(true).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].dishes.len(), 4);
    assert_eq!(repo.list_menus(false).unwrap().len(), 2);

    repo.delete_menu(menu.id).unwrap();
    assert!(repo.get_menu_by_id(menu.id).unwrap().is_none());
    assert!(repo.list_dishes(menu.id).unwrap().is_empty());
}

#[test]
fn test_dangling_references_are_reported() {
    let test_db = common::TestDb::new("test_dangling_references.db");
    let repo = DieselRepository::new(test_db.pool());

    let orphan = NewDish::try_new(MenuId::new(999).unwrap(), "Pão", None, CourseStage::Starter, 0)
        .unwrap();
    let err = repo.create_dish(&orphan).unwrap_err();
    assert!(matches!(err, RepositoryError::Reference(_)), "{err:?}");

    let (client_id, menu_id) = seed(&repo);
    let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    let event = NewEvent::priced(fields(client_id, menu_id, date, "14:00"), &[]).unwrap();
    repo.create_event(&event, &[], &[]).unwrap();

    let err = repo.delete_client(client_id).unwrap_err();
    assert!(matches!(err, RepositoryError::Reference(_)), "{err:?}");
    assert!(repo.get_client_by_id(client_id).unwrap().is_some());
}

#[test]
fn test_event_create_update_and_cascade_delete() {
    let test_db = common::TestDb::new("test_event_lifecycle.db");
    let repo = DieselRepository::new(test_db.pool());
    let (client_id, menu_id) = seed(&repo);
    let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

    let wines = vec![NewWineLine::try_new("Malbec Reserva", 2, 10000).unwrap()];
    let snapshot = vec![NewSnapshotDish {
        name: "Risoto de funghi".into(),
        description: None,
        course: CourseStage::Main,
        position: 0,
    }];
    let charges: Vec<_> = wines.iter().map(NewWineLine::charge).collect();
    let new_event =
        NewEvent::priced(fields(client_id, menu_id, date, "14:00"), &charges).unwrap();

    let event = repo.create_event(&new_event, &wines, &snapshot).unwrap();
    assert_eq!(event.pricing.total.cents(), 764500);
    assert_eq!(repo.list_wine_lines(event.id).unwrap().len(), 1);
    assert_eq!(repo.list_snapshot_dishes(event.id).unwrap().len(), 1);

    // Rescheduled without wines; snapshot replaced with two dishes.
    let changes = EventChanges {
        event: NewEvent::priced(fields(client_id, menu_id, date, "19:00"), &[]).unwrap(),
        wines: Some(vec![]),
        snapshot: Some(vec![
            NewSnapshotDish {
                name: "Pão de fermentação natural".into(),
                description: None,
                course: CourseStage::Starter,
                position: 0,
            },
            NewSnapshotDish {
                name: "Tiramisù".into(),
                description: None,
                course: CourseStage::Dessert,
                position: 0,
            },
        ]),
    };
    let updated = repo.update_event(event.id, &changes).unwrap();
    assert_eq!(updated.event_time.to_string(), "19:00");
    assert_eq!(updated.pricing.total.cents(), 742500);
    assert!(repo.list_wine_lines(event.id).unwrap().is_empty());
    assert_eq!(repo.list_snapshot_dishes(event.id).unwrap().len(), 2);

    repo.record_email(&NewEmailRecord::sent(
        event.id,
        EmailKind::Proposal,
        "ana@example.com",
        "Proposta",
        "Olá",
    ))
    .unwrap();
    assert_eq!(repo.list_email_history(event.id).unwrap().len(), 1);

    repo.delete_event(event.id).unwrap();
    assert!(repo.get_event_by_id(event.id).unwrap().is_none());

    let mut conn = test_db.pool().get().unwrap();
    let wines_left: i64 = event_wines::table.select(count_star()).first(&mut conn).unwrap();
    let dishes_left: i64 = event_dishes::table.select(count_star()).first(&mut conn).unwrap();
    let history_left: i64 = email_history::table
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    assert_eq!((wines_left, dishes_left, history_left), (0, 0, 0));
}

#[test]
fn test_event_list_filters_and_order() {
    let test_db = common::TestDb::new("test_event_list.db");
    let repo = DieselRepository::new(test_db.pool());
    let (client_id, menu_id) = seed(&repo);
    let day = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    let next_day = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();

    for (date, time, venue) in [
        (next_day, "12:00", Venue::HallA),
        (day, "19:00", Venue::HallA),
        (day, "10:00", Venue::HallB),
    ] {
        let mut f = fields(client_id, menu_id, date, time);
        f.venue = venue;
        repo.create_event(&NewEvent::priced(f, &[]).unwrap(), &[], &[])
            .unwrap();
    }

    let all = repo.list_events(EventListQuery::new()).unwrap();
    let slots: Vec<_> = all
        .iter()
        .map(|e| (e.event_date, e.event_time.to_string()))
        .collect();
    assert_eq!(
        slots,
        [
            (day, "10:00".to_string()),
            (day, "19:00".to_string()),
            (next_day, "12:00".to_string()),
        ]
    );

    let hall_a_today = repo
        .list_events(EventListQuery::new().on(day).venue(Venue::HallA))
        .unwrap();
    assert_eq!(hall_a_today.len(), 1);
    assert_eq!(hall_a_today[0].event_time.to_string(), "19:00");

    let by_menu = repo
        .list_events(EventListQuery::new().menu(menu_id).status(EventStatus::Cancelled))
        .unwrap();
    assert!(by_menu.is_empty());
}

#[test]
fn test_settings_upsert() {
    let test_db = common::TestDb::new("test_settings_upsert.db");
    let repo = DieselRepository::new(test_db.pool());

    let saved = repo
        .save_setting(
            &NewSetting::try_new(
                "agenda_recipients",
                "ops@enoteca.test",
                Some("Destinatários da agenda".into()),
            )
            .unwrap(),
        )
        .unwrap();
    assert_eq!(saved.value, "ops@enoteca.test");

    let replaced = repo
        .save_setting(
            &NewSetting::try_new("agenda_recipients", "ops@enoteca.test, chef@enoteca.test", None)
                .unwrap(),
        )
        .unwrap();
    assert_eq!(replaced.value, "ops@enoteca.test, chef@enoteca.test");
    assert_eq!(
        replaced.description.as_deref(),
        Some("Destinatários da agenda")
    );

    let batch = vec![
        NewSetting::try_new("agenda_time", "07:00", None).unwrap(),
        NewSetting::try_new("agenda_subject", "Agenda do dia", None).unwrap(),
    ];
    assert_eq!(repo.save_settings(&batch).unwrap(), 2);

    let keys: Vec<_> = repo
        .list_settings()
        .unwrap()
        .into_iter()
        .map(|s| s.key)
        .collect();
    assert_eq!(keys.len(), 3);
    assert!(repo.get_setting("agenda_time").unwrap().is_some());
    assert!(repo.get_setting("missing").unwrap().is_none());
}
