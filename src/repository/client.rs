//! Repository implementation for clients.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Text;

use crate::{
    domain::{
        client::{Client, NewClient, UpdateClient},
        types::ClientId,
    },
    models::client::{
        Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
    },
    repository::{
        ClientListQuery, ClientReader, ClientWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

define_sql_function! {
    /// SQLite `lower()`.
    fn lower(x: Text) -> Text;
}

fn into_domain(rows: Vec<DbClient>) -> RepositoryResult<Vec<Client>> {
    rows.into_iter()
        .map(|row| Client::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_client = clients::table
            .find(id.get())
            .select(DbClient::as_select())
            .first(&mut conn)
            .optional()?;

        db_client
            .map(|c| Client::try_from(c).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<Vec<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let mut items = clients::table.into_boxed();

        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            items = items.filter(
                clients::full_name
                    .like(pattern.clone())
                    .or(clients::phone.like(pattern.clone()))
                    .or(clients::email.like(pattern.clone()))
                    .or(clients::company.like(pattern)),
            );
        }

        let rows = items
            .order((clients::full_name.asc(), clients::id.asc()))
            .select(DbClient::as_select())
            .load(&mut conn)?;

        into_domain(rows)
    }

    fn list_contact_matches<'a>(
        &self,
        phone: &str,
        email: Option<&'a str>,
    ) -> RepositoryResult<Vec<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let phone = phone.trim().to_lowercase();

        let mut rows = clients::table
            .filter(lower(clients::phone).eq(phone.as_str()))
            .select(DbClient::as_select())
            .load(&mut conn)?;

        // emails are stored lower-cased
        if let Some(email) = email {
            let by_email = clients::table
                .filter(clients::email.eq(email.trim().to_lowercase()))
                .filter(lower(clients::phone).ne(phone.as_str()))
                .select(DbClient::as_select())
                .load(&mut conn)?;
            rows.extend(by_email);
        }

        into_domain(rows)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let row = DbNewClient::from_domain(new_client, Utc::now().naive_utc());

        let created = diesel::insert_into(clients::table)
            .values(&row)
            .returning(DbClient::as_returning())
            .get_result(&mut conn)?;

        Client::try_from(created).map_err(RepositoryError::from)
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let changes = DbUpdateClient::from_domain(updates, Utc::now().naive_utc());

        let updated = diesel::update(clients::table.find(client_id.get()))
            .set(&changes)
            .returning(DbClient::as_returning())
            .get_result(&mut conn)?;

        Client::try_from(updated).map_err(RepositoryError::from)
    }

    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(clients::table.find(client_id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
