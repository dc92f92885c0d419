//! Event reports over arbitrary filters.

use std::collections::HashMap;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::client::Client;
use crate::domain::event::{Event, EventSummary};
use crate::domain::types::ClientId;
use crate::dto::reports::EventReport;
use crate::models::auth::AuthenticatedUser;
use crate::notifications::AgendaEntry;
use crate::notifications::spreadsheet::render_report_csv;
use crate::repository::{ClientReader, EventListQuery, EventReader};
use crate::services::ServiceResult;
use crate::services::ensure_role;

/// Pairs each event with its client, keeping the event order.
///
/// Events whose client cannot be found are left out and logged.
pub(crate) fn with_clients<R>(repo: &R, events: Vec<Event>) -> ServiceResult<Vec<AgendaEntry>>
where
    R: ClientReader + ?Sized,
{
    let mut clients: HashMap<ClientId, Option<Client>> = HashMap::new();
    let mut entries = Vec::with_capacity(events.len());

    for event in events {
        if !clients.contains_key(&event.client_id) {
            let client = repo.get_client_by_id(event.client_id).map_err(|err| {
                log::error!("Failed to load client {}: {err}", event.client_id);
                err
            })?;
            clients.insert(event.client_id, client);
        }
        match clients.get(&event.client_id).cloned().flatten() {
            Some(client) => entries.push(AgendaEntry { event, client }),
            None => log::warn!("Event {} references missing client {}", event.id, event.client_id),
        }
    }

    Ok(entries)
}

fn load_events<R>(repo: &R, query: EventListQuery) -> ServiceResult<Vec<Event>>
where
    R: EventReader + ?Sized,
{
    let events = repo.list_events(query).map_err(|err| {
        log::error!("Failed to list events for report: {err}");
        err
    })?;
    Ok(events)
}

/// Matching events with status counts and the revenue of non-cancelled ones.
pub fn event_report<R>(
    query: EventListQuery,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<EventReport>
where
    R: EventReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let events = load_events(repo, query)?;
    let summary = EventSummary::from_events(&events);
    Ok(EventReport { events, summary })
}

/// Same report as CSV, one line per event.
pub fn event_report_csv<R>(
    query: EventListQuery,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<u8>>
where
    R: EventReader + ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let events = load_events(repo, query)?;
    let entries = with_clients(repo, events)?;
    Ok(render_report_csv(&entries)?)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::event::{EventStatus, Venue};
    use crate::domain::fixtures::{client, event_at};
    use crate::repository::mock::MockRepository;
    use crate::services::test_users::operator_user;

    #[test]
    fn report_summarizes_filtered_events() {
        let mut repo = MockRepository::new();
        repo.expect_list_events()
            .withf(|query| query.status.is_none())
            .times(1)
            .returning(|_| {
                Ok(vec![
                    event_at(1, "12:00", Venue::HallA, EventStatus::Confirmed),
                    event_at(2, "19:00", Venue::HallB, EventStatus::Cancelled),
                ])
            });

        let report = event_report(EventListQuery::new(), &operator_user(), &repo).unwrap();

        assert_eq!(report.events.len(), 2);
        assert_eq!(report.summary.confirmed, 1);
        assert_eq!(report.summary.cancelled, 1);
        assert_eq!(report.summary.revenue.cents(), 742500);
    }

    #[test]
    fn clients_are_loaded_once_and_missing_ones_skipped() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .withf(|id| id.get() == 1)
            .times(1)
            .returning(|_| Ok(Some(client(1, "Ana Souza", "11999990000", None))));

        let mut orphan = event_at(3, "20:00", Venue::HallA, EventStatus::Confirmed);
        orphan.client_id = ClientId::new(2).unwrap();
        repo.expect_get_client_by_id()
            .withf(|id| id.get() == 2)
            .times(1)
            .returning(|_| Ok(None));

        let events = vec![
            event_at(1, "12:00", Venue::HallA, EventStatus::Confirmed),
            event_at(2, "16:00", Venue::HallB, EventStatus::Confirmed),
            orphan,
        ];
        let entries = with_clients(&repo, events).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].event.id.get(), 2);
    }
}
