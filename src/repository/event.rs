//! Repository implementation for events, their wine lines, dish snapshots and
//! send history.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::{
        email_history::{EmailRecord, NewEmailRecord},
        event::{Event, EventChanges, NewEvent, NewSnapshotDish, NewWineLine, SnapshotDish, WineLine},
        types::EventId,
    },
    models::{
        email_history::{EmailRecord as DbEmailRecord, NewEmailRecord as DbNewEmailRecord},
        event::{
            Event as DbEvent, EventDish as DbEventDish, EventValues, NewEventDish as DbNewEventDish,
            NewWineLine as DbNewWineLine, WineLine as DbWineLine,
        },
    },
    repository::{
        DieselRepository, EventListQuery, EventReader, EventWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn replace_wines(
    conn: &mut SqliteConnection,
    event_id: i32,
    wines: &[NewWineLine],
) -> Result<(), RepositoryError> {
    use crate::schema::event_wines;

    diesel::delete(event_wines::table.filter(event_wines::event_id.eq(event_id))).execute(conn)?;
    if wines.is_empty() {
        return Ok(());
    }

    let now = Utc::now().naive_utc();
    let rows = wines
        .iter()
        .map(|line| DbNewWineLine::from_domain(event_id, line, now))
        .collect::<Vec<_>>();
    diesel::insert_into(event_wines::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn replace_snapshot(
    conn: &mut SqliteConnection,
    event_id: i32,
    snapshot: &[NewSnapshotDish],
) -> Result<(), RepositoryError> {
    use crate::schema::event_dishes;

    diesel::delete(event_dishes::table.filter(event_dishes::event_id.eq(event_id)))
        .execute(conn)?;
    if snapshot.is_empty() {
        return Ok(());
    }

    let now = Utc::now().naive_utc();
    let rows = snapshot
        .iter()
        .map(|dish| DbNewEventDish::from_domain(event_id, dish, now))
        .collect::<Vec<_>>();
    diesel::insert_into(event_dishes::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

impl EventReader for DieselRepository {
    fn get_event_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let db_event = events::table
            .find(id.get())
            .select(DbEvent::as_select())
            .first(&mut conn)
            .optional()?;

        db_event
            .map(|e| Event::try_from(e).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_events(&self, query: EventListQuery) -> RepositoryResult<Vec<Event>> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let mut items = events::table.into_boxed();

        if let Some(from) = query.date_from {
            items = items.filter(events::event_date.ge(from));
        }
        if let Some(to) = query.date_to {
            items = items.filter(events::event_date.le(to));
        }
        if let Some(status) = query.status {
            items = items.filter(events::status.eq(status.as_str()));
        }
        if let Some(venue) = query.venue {
            items = items.filter(events::venue.eq(venue.as_str()));
        }
        if let Some(client_id) = query.client_id {
            items = items.filter(events::client_id.eq(client_id.get()));
        }
        if let Some(menu_id) = query.menu_id {
            items = items.filter(events::menu_id.eq(menu_id.get()));
        }
        if let Some(enabled) = query.reminder_enabled {
            items = items.filter(events::reminder_enabled.eq(enabled));
        }

        // HH:MM strings sort chronologically
        let rows = items
            .order((
                events::event_date.asc(),
                events::event_time.asc(),
                events::id.asc(),
            ))
            .select(DbEvent::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| Event::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_wine_lines(&self, event_id: EventId) -> RepositoryResult<Vec<WineLine>> {
        use crate::schema::event_wines;

        let mut conn = self.conn()?;
        let rows = event_wines::table
            .filter(event_wines::event_id.eq(event_id.get()))
            .order(event_wines::id.asc())
            .select(DbWineLine::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| WineLine::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_snapshot_dishes(&self, event_id: EventId) -> RepositoryResult<Vec<SnapshotDish>> {
        use crate::schema::event_dishes;

        let mut conn = self.conn()?;
        let rows = event_dishes::table
            .filter(event_dishes::event_id.eq(event_id.get()))
            .order(event_dishes::id.asc())
            .select(DbEventDish::as_select())
            .load(&mut conn)?;

        let mut dishes = rows
            .into_iter()
            .map(|row| SnapshotDish::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<SnapshotDish>>>()?;
        dishes.sort_by_key(|dish| (dish.course.rank(), dish.position, dish.id));
        Ok(dishes)
    }

    fn list_email_history(&self, event_id: EventId) -> RepositoryResult<Vec<EmailRecord>> {
        use crate::schema::email_history;

        let mut conn = self.conn()?;
        let rows = email_history::table
            .filter(email_history::event_id.eq(event_id.get()))
            .order((email_history::sent_at.desc(), email_history::id.desc()))
            .select(DbEmailRecord::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| EmailRecord::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl EventWriter for DieselRepository {
    fn create_event(
        &self,
        new_event: &NewEvent,
        wines: &[NewWineLine],
        snapshot: &[NewSnapshotDish],
    ) -> RepositoryResult<Event> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let values = EventValues::from_domain(new_event, now);

        let created = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(events::table)
                .values((&values, events::created_at.eq(now)))
                .returning(DbEvent::as_returning())
                .get_result(conn)?;

            replace_wines(conn, created.id, wines)?;
            replace_snapshot(conn, created.id, snapshot)?;
            Ok(created)
        })?;

        Event::try_from(created).map_err(RepositoryError::from)
    }

    fn update_event(&self, event_id: EventId, changes: &EventChanges) -> RepositoryResult<Event> {
        use crate::schema::events;

        let mut conn = self.conn()?;
        let values = EventValues::from_domain(&changes.event, Utc::now().naive_utc());

        let updated = conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(events::table.find(event_id.get()))
                .set(&values)
                .returning(DbEvent::as_returning())
                .get_result(conn)?;

            if let Some(wines) = &changes.wines {
                replace_wines(conn, updated.id, wines)?;
            }
            if let Some(snapshot) = &changes.snapshot {
                replace_snapshot(conn, updated.id, snapshot)?;
            }
            Ok(updated)
        })?;

        Event::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_event(&self, event_id: EventId) -> RepositoryResult<()> {
        use crate::schema::{email_history, event_dishes, event_wines, events};

        let mut conn = self.conn()?;
        let id = event_id.get();

        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(event_wines::table.filter(event_wines::event_id.eq(id)))
                .execute(conn)?;
            diesel::delete(event_dishes::table.filter(event_dishes::event_id.eq(id)))
                .execute(conn)?;
            diesel::delete(email_history::table.filter(email_history::event_id.eq(id)))
                .execute(conn)?;

            let deleted = diesel::delete(events::table.find(id)).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }

    fn record_email(&self, record: &NewEmailRecord) -> RepositoryResult<EmailRecord> {
        use crate::schema::email_history;

        let mut conn = self.conn()?;
        let row = DbNewEmailRecord::from_domain(record, Utc::now().naive_utc());
        let created = diesel::insert_into(email_history::table)
            .values(&row)
            .returning(DbEmailRecord::as_returning())
            .get_result(&mut conn)?;

        EmailRecord::try_from(created).map_err(RepositoryError::from)
    }
}
