use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::settings::{NewSetting, Setting},
    models::settings::{NewSetting as DbNewSetting, Setting as DbSetting},
    repository::{
        DieselRepository, SettingsReader, SettingsWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn upsert(conn: &mut SqliteConnection, setting: &NewSetting) -> QueryResult<usize> {
    use crate::schema::settings;

    let row = DbNewSetting::from_domain(setting, Utc::now().naive_utc());
    diesel::insert_into(settings::table)
        .values(&row)
        .on_conflict(settings::key)
        .do_update()
        .set(&row)
        .execute(conn)
}

impl SettingsReader for DieselRepository {
    fn get_setting(&self, key: &str) -> RepositoryResult<Option<Setting>> {
        use crate::schema::settings;

        let mut conn = self.conn()?;
        let setting = settings::table
            .find(key)
            .select(DbSetting::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(setting.map(Setting::from))
    }

    fn list_settings(&self) -> RepositoryResult<Vec<Setting>> {
        use crate::schema::settings;

        let mut conn = self.conn()?;
        let rows = settings::table
            .order(settings::key.asc())
            .select(DbSetting::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Setting::from).collect())
    }
}

impl SettingsWriter for DieselRepository {
    fn save_setting(&self, setting: &NewSetting) -> RepositoryResult<Setting> {
        use crate::schema::settings;

        let mut conn = self.conn()?;
        upsert(&mut conn, setting)?;

        let stored = settings::table
            .find(setting.key.as_str())
            .select(DbSetting::as_select())
            .first(&mut conn)?;

        Ok(Setting::from(stored))
    }

    fn save_settings(&self, settings: &[NewSetting]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            for setting in settings {
                upsert(conn, setting)?;
            }
            Ok(settings.len())
        })
    }
}
