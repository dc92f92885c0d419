use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{Client as DomainClient, NewClient as DomainNewClient};
use crate::domain::types::{ClientEmail, ClientId, ClientName, PhoneNumber, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub full_name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub company: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub full_name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub company: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::new(client.id)?,
            full_name: ClientName::new(client.full_name)?,
            phone: PhoneNumber::new(client.phone)?,
            email: client.email.map(ClientEmail::new).transpose()?,
            address: client.address,
            company: client.company,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> NewClient<'a> {
    pub fn from_domain(client: &'a DomainNewClient, now: NaiveDateTime) -> Self {
        Self {
            full_name: client.full_name.as_str(),
            phone: client.phone.as_str(),
            email: client.email.as_ref().map(ClientEmail::as_str),
            address: client.address.as_deref(),
            company: client.company.as_deref(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateClient<'a> {
    pub fn from_domain(client: &'a DomainNewClient, now: NaiveDateTime) -> Self {
        Self {
            full_name: client.full_name.as_str(),
            phone: client.phone.as_str(),
            email: client.email.as_ref().map(ClientEmail::as_str),
            address: client.address.as_deref(),
            company: client.company.as_deref(),
            updated_at: now,
        }
    }
}
