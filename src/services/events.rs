//! Event lifecycle: booking, rescheduling, duplication and removal.
//!
//! Every write runs the same pipeline: validate the submitted fields, make
//! sure the referenced client and menu exist, reject bookings that collide
//! with another event at the venue, price the event and hand everything to
//! the repository, which persists it in one transaction.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::email_history::EmailRecord;
use crate::domain::event::{
    Event, EventChanges, EventStatus, NewEvent, NewSnapshotDish, NewWineLine, ScheduleSlot,
    SnapshotDish, WineLine, find_conflict,
};
use crate::domain::pricing::WineCharge;
use crate::domain::types::{EventId, MenuId};
use crate::dto::events::EventDetails;
use crate::forms::events::{CreateEventForm, EventDraft, EventUpdate, UpdateEventForm};
use crate::models::auth::AuthenticatedUser;
use crate::notifications::format_date;
use crate::repository::{ClientReader, EventListQuery, EventReader, EventWriter, MenuReader};
use crate::services::clients::load_client;
use crate::services::menus::{load_dishes, load_menu};
use crate::services::{ServiceError, ServiceResult, ensure_role};

pub fn list_events<R>(
    query: EventListQuery,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Event>>
where
    R: EventReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let events = repo.list_events(query).map_err(|err| {
        log::error!("Failed to list events: {err}");
        err
    })?;
    Ok(events)
}

pub(crate) fn load_event<R>(repo: &R, event_id: EventId) -> ServiceResult<Event>
where
    R: EventReader + ?Sized,
{
    repo.get_event_by_id(event_id)
        .map_err(|err| {
            log::error!("Failed to load event {event_id}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound("event not found".into()))
}

pub(crate) fn load_wine_lines<R>(repo: &R, event_id: EventId) -> ServiceResult<Vec<WineLine>>
where
    R: EventReader + ?Sized,
{
    let wines = repo.list_wine_lines(event_id).map_err(|err| {
        log::error!("Failed to list wine lines of event {event_id}: {err}");
        err
    })?;
    Ok(wines)
}

pub(crate) fn load_snapshot<R>(repo: &R, event_id: EventId) -> ServiceResult<Vec<SnapshotDish>>
where
    R: EventReader + ?Sized,
{
    let dishes = repo.list_snapshot_dishes(event_id).map_err(|err| {
        log::error!("Failed to list dish snapshot of event {event_id}: {err}");
        err
    })?;
    Ok(dishes)
}

pub fn get_event<R>(event_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Event>
where
    R: EventReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    load_event(repo, EventId::new(event_id)?)
}

/// Event with its client, menu, wine lines, dish snapshot and send history.
pub fn get_event_details<R>(
    event_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<EventDetails>
where
    R: EventReader + ClientReader + MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let event = load_event(repo, EventId::new(event_id)?)?;
    let client = repo.get_client_by_id(event.client_id).map_err(|err| {
        log::error!("Failed to load client of event {}: {err}", event.id);
        err
    })?;
    let menu = repo.get_menu_by_id(event.menu_id).map_err(|err| {
        log::error!("Failed to load menu of event {}: {err}", event.id);
        err
    })?;
    let wines = load_wine_lines(repo, event.id)?;
    let dishes = load_snapshot(repo, event.id)?;
    let email_history = repo.list_email_history(event.id).map_err(|err| {
        log::error!("Failed to list send history of event {}: {err}", event.id);
        err
    })?;

    Ok(EventDetails {
        event,
        client,
        menu,
        wines,
        dishes,
        email_history,
    })
}

pub fn list_event_dishes<R>(
    event_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<SnapshotDish>>
where
    R: EventReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let event = load_event(repo, EventId::new(event_id)?)?;
    load_snapshot(repo, event.id)
}

/// Send history of an event, newest first.
pub fn list_event_emails<R>(
    event_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<EmailRecord>>
where
    R: EventReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let event = load_event(repo, EventId::new(event_id)?)?;
    let history = repo.list_email_history(event.id).map_err(|err| {
        log::error!("Failed to list send history of event {}: {err}", event.id);
        err
    })?;
    Ok(history)
}

/// Fails with [`ServiceError::ScheduleConflict`] when another live event at
/// the same venue starts within four hours of `slot`.
pub(crate) fn ensure_slot_free<R>(
    repo: &R,
    slot: &ScheduleSlot,
    exclude: Option<EventId>,
) -> ServiceResult<()>
where
    R: EventReader + ClientReader + ?Sized,
{
    let same_day = repo
        .list_events(EventListQuery::new().on(slot.event_date).venue(slot.venue))
        .map_err(|err| {
            log::error!("Failed to load events for the conflict check: {err}");
            err
        })?;

    let Some(conflict) = find_conflict(slot, &same_day, exclude) else {
        return Ok(());
    };

    let client_name = repo
        .get_client_by_id(conflict.client_id)
        .map_err(|err| {
            log::error!("Failed to load client {}: {err}", conflict.client_id);
            err
        })?
        .map(|client| client.full_name.into_inner())
        .unwrap_or_else(|| "cliente desconhecido".to_string());

    log::info!(
        "Rejected booking at {} {} {}: event {} is too close",
        slot.event_date,
        slot.event_time,
        slot.venue,
        conflict.id
    );

    Err(ServiceError::ScheduleConflict(format!(
        "Conflito de agenda: já existe um evento de {client_name} em {} às {} no {}",
        format_date(conflict.event_date),
        conflict.event_time,
        conflict.venue.label()
    )))
}

fn snapshot_of<R>(repo: &R, menu_id: MenuId) -> ServiceResult<Vec<NewSnapshotDish>>
where
    R: MenuReader + ?Sized,
{
    Ok(load_dishes(repo, menu_id)?
        .iter()
        .map(NewSnapshotDish::from)
        .collect())
}

/// Books a new event, freezing the current dishes of its menu.
pub fn create_event<R>(
    form: CreateEventForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Event>
where
    R: EventReader + EventWriter + ClientReader + MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let EventDraft { fields, wines } = EventDraft::try_from(form)?;
    load_client(repo, fields.client_id)?;
    load_menu(repo, fields.menu_id)?;
    ensure_slot_free(repo, &fields.slot(), None)?;

    let snapshot = snapshot_of(repo, fields.menu_id)?;
    let charges: Vec<WineCharge> = wines.iter().map(NewWineLine::charge).collect();
    let new_event = NewEvent::priced(fields, &charges)?;

    let event = repo
        .create_event(&new_event, &wines, &snapshot)
        .map_err(|err| {
            log::error!("Failed to create event: {err}");
            err
        })?;
    log::info!(
        "Booked event {} on {} {} at {}",
        event.id,
        event.event_date,
        event.event_time,
        event.venue
    );
    Ok(event)
}

/// Applies a partial update and reprices the event.
///
/// The conflict check runs only when the date, time or venue changed. Wine
/// lines are replaced when submitted; otherwise the stored ones are priced
/// again. The dish snapshot is rebuilt only on request and only when a menu
/// id was submitted.
pub fn update_event<R>(
    event_id: i32,
    form: UpdateEventForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Event>
where
    R: EventReader + EventWriter + ClientReader + MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let current = load_event(repo, EventId::new(event_id)?)?;
    let EventUpdate {
        patch,
        wines,
        regenerate_snapshot,
    } = EventUpdate::try_from(form)?;
    let submitted_menu = patch.menu_id.is_some();
    let fields = patch.apply(&current)?;

    if fields.client_id != current.client_id {
        load_client(repo, fields.client_id)?;
    }
    if fields.menu_id != current.menu_id {
        load_menu(repo, fields.menu_id)?;
    }
    if fields.slot() != current.slot() {
        ensure_slot_free(repo, &fields.slot(), Some(current.id))?;
    }

    let charges: Vec<WineCharge> = match &wines {
        Some(lines) => lines.iter().map(NewWineLine::charge).collect(),
        None => load_wine_lines(repo, current.id)?
            .iter()
            .map(WineLine::charge)
            .collect(),
    };
    let snapshot = if regenerate_snapshot && submitted_menu {
        Some(snapshot_of(repo, fields.menu_id)?)
    } else {
        None
    };

    let changes = EventChanges {
        event: NewEvent::priced(fields, &charges)?,
        wines,
        snapshot,
    };
    let event = repo.update_event(current.id, &changes).map_err(|err| {
        log::error!("Failed to update event {}: {err}", current.id);
        err
    })?;
    Ok(event)
}

/// Removes the event with its wine lines, dish snapshot and send history.
pub fn delete_event<R>(event_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: EventWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let event_id = EventId::new(event_id)?;
    repo.delete_event(event_id).map_err(|err| {
        log::error!("Failed to delete event {event_id}: {err}");
        err
    })?;
    log::info!("Deleted event {event_id}");
    Ok(())
}

/// Copies an event as a new draft under review.
///
/// The copy keeps the slot of the original, so no conflict check is made.
/// Wine lines are copied and the dishes are frozen again from the menu.
pub fn duplicate_event<R>(event_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Event>
where
    R: EventReader + EventWriter + MenuReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let original = load_event(repo, EventId::new(event_id)?)?;
    let wines: Vec<NewWineLine> = load_wine_lines(repo, original.id)?
        .iter()
        .map(NewWineLine::from)
        .collect();
    let snapshot = snapshot_of(repo, original.menu_id)?;

    let mut fields = original.fields();
    fields.status = EventStatus::UnderReview;
    let charges: Vec<WineCharge> = wines.iter().map(NewWineLine::charge).collect();
    let new_event = NewEvent::priced(fields, &charges)?;

    let copy = repo
        .create_event(&new_event, &wines, &snapshot)
        .map_err(|err| {
            log::error!("Failed to duplicate event {}: {err}", original.id);
            err
        })?;
    log::info!("Duplicated event {} as {}", original.id, copy.id);
    Ok(copy)
}
