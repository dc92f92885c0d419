//! Operational settings: agenda recipients and email template overrides.

use crate::domain::settings::{NewSetting, Setting};
use crate::forms::settings::{SaveSettingForm, SaveSettingsForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{SettingsReader, SettingsWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

pub fn list_settings<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<Setting>>
where
    R: SettingsReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let settings = repo.list_settings().map_err(|err| {
        log::error!("Failed to list settings: {err}");
        err
    })?;
    Ok(settings)
}

pub fn get_setting<R>(key: &str, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Setting>
where
    R: SettingsReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.get_setting(key.trim())
        .map_err(|err| {
            log::error!("Failed to load setting {key}: {err}");
            err
        })?
        .ok_or_else(|| ServiceError::NotFound(format!("setting {key} not found")))
}

/// Stored value of `key`, `None` when missing or blank.
pub(crate) fn setting_value<R>(repo: &R, key: &str) -> ServiceResult<Option<String>>
where
    R: SettingsReader + ?Sized,
{
    let setting = repo.get_setting(key).map_err(|err| {
        log::error!("Failed to load setting {key}: {err}");
        err
    })?;
    Ok(setting
        .map(|s| s.value)
        .filter(|value| !value.trim().is_empty()))
}

pub fn save_setting<R>(
    key: &str,
    form: SaveSettingForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Setting>
where
    R: SettingsWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let setting = form.into_setting(key)?;
    let saved = repo.save_setting(&setting).map_err(|err| {
        log::error!("Failed to save setting {}: {err}", setting.key);
        err
    })?;
    Ok(saved)
}

/// Upserts every pair of the form in one transaction.
pub fn save_settings<R>(
    form: SaveSettingsForm,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<usize>
where
    R: SettingsWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let settings = Vec::<NewSetting>::try_from(form)?;
    let saved = repo.save_settings(&settings).map_err(|err| {
        log::error!("Failed to save settings: {err}");
        err
    })?;
    Ok(saved)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::fixtures::now;
    use crate::services::test_users::{admin_user, operator_user};
    use crate::repository::mock::MockRepository;

    fn stored(key: &str, value: &str) -> Setting {
        Setting {
            key: key.to_string(),
            value: value.to_string(),
            description: None,
            updated_at: now(),
        }
    }

    #[test]
    fn operators_can_read_but_not_write() {
        let mut repo = MockRepository::new();
        repo.expect_list_settings()
            .times(1)
            .returning(|| Ok(vec![stored("agenda_time", "07:00")]));
        repo.expect_save_setting().times(0);

        assert_eq!(list_settings(&operator_user(), &repo).unwrap().len(), 1);

        let form = SaveSettingForm {
            value: "08:00".into(),
            description: None,
        };
        assert!(matches!(
            save_setting("agenda_time", form, &operator_user(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn missing_setting_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_setting().returning(|_| Ok(None));

        assert!(matches!(
            get_setting("agenda_time", &operator_user(), &repo),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn blank_values_read_as_unset() {
        let mut repo = MockRepository::new();
        repo.expect_get_setting()
            .withf(|key| key == "agenda_subject")
            .returning(|key| Ok(Some(stored(key, "  "))));

        assert_eq!(setting_value(&repo, "agenda_subject").unwrap(), None);
    }

    #[test]
    fn admin_saves_all_pairs() {
        let mut repo = MockRepository::new();
        repo.expect_save_settings()
            .withf(|settings| settings.len() == 2 && settings[0].key == "agenda_recipients")
            .times(1)
            .returning(|settings| Ok(settings.len()));

        let form = SaveSettingsForm(BTreeMap::from([
            ("agenda_time".to_string(), "07:00".to_string()),
            ("agenda_recipients".to_string(), "ops@enoteca.test".to_string()),
        ]));

        assert_eq!(save_settings(form, &admin_user(), &repo).unwrap(), 2);
    }
}
