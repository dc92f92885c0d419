use std::collections::BTreeMap;

use serde::Deserialize;
use validator::Validate;

use crate::domain::settings::NewSetting;
use crate::forms::FormError;

#[derive(Debug, Clone, Deserialize, Validate)]
/// Body of `PUT /settings/{key}`.
pub struct SaveSettingForm {
    #[validate(length(max = 10000))]
    pub value: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: Option<String>,
}

impl SaveSettingForm {
    pub fn into_setting(self, key: &str) -> Result<NewSetting, FormError> {
        self.validate()?;
        Ok(NewSetting::try_new(key, self.value, self.description)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
/// Body of `PUT /settings`: a flat key to value object.
pub struct SaveSettingsForm(pub BTreeMap<String, String>);

impl TryFrom<SaveSettingsForm> for Vec<NewSetting> {
    type Error = FormError;

    fn try_from(form: SaveSettingsForm) -> Result<Self, Self::Error> {
        form.0
            .into_iter()
            .map(|(key, value)| NewSetting::try_new(key, value, None).map_err(FormError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_form_reads_a_flat_object() {
        let form: SaveSettingsForm = serde_json::from_str(
            r#"{"agenda_time": "07:00", "agenda_recipients": "a@x.com,b@x.com"}"#,
        )
        .unwrap();
        let settings = Vec::<NewSetting>::try_from(form).unwrap();

        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].key, "agenda_recipients");
        assert_eq!(settings[1].value, "07:00");
    }

    #[test]
    fn blank_keys_are_rejected() {
        let form = SaveSettingsForm(BTreeMap::from([(" ".to_string(), "x".to_string())]));
        assert!(Vec::<NewSetting>::try_from(form).is_err());

        let single = SaveSettingForm {
            value: "x".into(),
            description: None,
        };
        assert!(single.into_setting("").is_err());
    }
}
