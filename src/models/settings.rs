use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::settings::{NewSetting as DomainNewSetting, Setting as DomainSetting};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::settings)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::settings)]
pub struct NewSetting<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Setting> for DomainSetting {
    fn from(setting: Setting) -> Self {
        Self {
            key: setting.key,
            value: setting.value,
            description: setting.description,
            updated_at: setting.updated_at,
        }
    }
}

impl<'a> NewSetting<'a> {
    pub fn from_domain(setting: &'a DomainNewSetting, now: NaiveDateTime) -> Self {
        Self {
            key: setting.key.as_str(),
            value: setting.value.as_str(),
            description: setting.description.as_deref(),
            updated_at: now,
        }
    }
}
