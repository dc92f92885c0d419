//! Client registry guarded by the duplicate-contact check.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::client::{Client, ClientPatch, NewClient, find_duplicates};
use crate::domain::types::ClientId;
use crate::forms::clients::{CreateClientForm, UpdateClientForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter, EventListQuery, EventReader};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Lists clients ordered by name, optionally filtered by a search term.
pub fn list_clients<R>(
    search: Option<String>,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<Client>>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut query = ClientListQuery::new();
    if let Some(term) = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        query = query.search(term);
    }

    let clients = repo.list_clients(query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        err
    })?;
    Ok(clients)
}

pub(crate) fn load_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(client_id)
        .map_err(|err| {
            log::error!("Failed to load client {client_id}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound("client not found".into()))
}

pub fn get_client<R>(client_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    load_client(repo, ClientId::new(client_id)?)
}

/// Refuses the write when phone, email or name and phone already belong to
/// another client.
fn ensure_unique_contact<R>(
    repo: &R,
    candidate: &NewClient,
    exclude: Option<ClientId>,
) -> ServiceResult<()>
where
    R: ClientReader + ?Sized,
{
    let probe = candidate.probe();
    let matches = repo
        .list_contact_matches(&probe.phone, probe.email.as_deref())
        .map_err(|err| {
            log::error!("Failed to look up client contacts: {err}");
            err
        })?;

    match find_duplicates(&probe, &matches, exclude) {
        Some(fields) => {
            log::info!("Rejected duplicate client contact: {fields}");
            Err(ServiceError::Duplicate(fields))
        }
        None => Ok(()),
    }
}

pub fn create_client<R>(
    form: CreateClientForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let new_client = NewClient::try_from(form)?;
    ensure_unique_contact(repo, &new_client, None)?;

    let client = repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to create client: {err}");
        err
    })?;
    Ok(client)
}

/// Applies a partial update; the duplicate check ignores the client itself.
pub fn update_client<R>(
    client_id: i32,
    form: UpdateClientForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let current = load_client(repo, ClientId::new(client_id)?)?;
    let updates = ClientPatch::try_from(form)?.apply(&current)?;
    ensure_unique_contact(repo, &updates, Some(current.id))?;

    let client = repo.update_client(current.id, &updates).map_err(|err| {
        log::error!("Failed to update client {}: {err}", current.id);
        err
    })?;
    Ok(client)
}

/// Deletes a client that has no events booked.
pub fn delete_client<R>(client_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: ClientWriter + EventReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let client_id = ClientId::new(client_id)?;
    let events = repo
        .list_events(EventListQuery::new().client(client_id))
        .map_err(|err| {
            log::error!("Failed to list events of client {client_id}: {err}");
            err
        })?;
    if !events.is_empty() {
        return Err(ServiceError::Validation(format!(
            "client has {} event(s) and cannot be deleted",
            events.len()
        )));
    }

    repo.delete_client(client_id).map_err(|err| {
        log::error!("Failed to delete client {client_id}: {err}");
        err
    })?;
    Ok(())
}
