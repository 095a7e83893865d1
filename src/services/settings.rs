use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::setting::{OrderDefaults, SystemSetting};
use crate::forms::settings::SaveSettingForm;
use crate::repository::{SettingReader, SettingWriter};
use crate::services::{ServiceError, ServiceResult, ensure_manager};

/// Data required to render the settings template.
pub struct SettingsPageData {
    pub settings: Vec<SystemSetting>,
    /// Values the order form will fall back on.
    pub order_defaults: OrderDefaults,
}

pub fn load_settings<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SettingsPageData>
where
    R: SettingReader + ?Sized,
{
    ensure_manager(user)?;

    let settings = repo
        .list_settings(user.hub_id)
        .map_err(ServiceError::from)?;
    let order_defaults = OrderDefaults::from_settings(&settings);

    Ok(SettingsPageData {
        settings,
        order_defaults,
    })
}

/// Creates the setting or replaces the value stored under the same key.
pub fn save_setting<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SaveSettingForm,
) -> ServiceResult<SystemSetting>
where
    R: SettingWriter + ?Sized,
{
    ensure_manager(user)?;

    let new_setting = form
        .into_new_setting(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let setting = repo
        .upsert_setting(&new_setting)
        .map_err(ServiceError::from)?;
    log::info!(
        "setting {} set to `{}` by {}",
        setting.key,
        setting.value,
        user.email
    );
    Ok(setting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::setting::{DEFAULT_ORDER_AMOUNT, DEFAULT_ORDER_DURATION_KEY};
    use crate::repository::mock::{MockSettingReader, MockSettingWriter};
    use crate::services::test_support::{fixed_datetime, user_with_roles};
    use crate::{MANAGER_ROLE, SERVICE_ACCESS_ROLE};

    fn manager() -> AuthenticatedUser {
        user_with_roles(&[SERVICE_ACCESS_ROLE, MANAGER_ROLE])
    }

    #[test]
    fn settings_resolve_order_defaults() {
        let mut repo = MockSettingReader::new();
        repo.expect_list_settings()
            .withf(|hub| *hub == 7)
            .returning(|hub_id| {
                Ok(vec![SystemSetting {
                    id: 1,
                    hub_id,
                    key: DEFAULT_ORDER_DURATION_KEY.to_string(),
                    value: "21".to_string(),
                    description: None,
                    updated_at: fixed_datetime(),
                }])
            });

        let data = load_settings(&repo, &manager()).expect("settings load");

        assert_eq!(data.settings.len(), 1);
        assert_eq!(data.order_defaults.duration_days, 21);
        assert_eq!(data.order_defaults.amount, DEFAULT_ORDER_AMOUNT);
    }

    #[test]
    fn settings_are_manager_only() {
        let repo = MockSettingReader::new();

        let result = load_settings(&repo, &user_with_roles(&[SERVICE_ACCESS_ROLE]));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn save_setting_upserts_by_key() {
        let mut repo = MockSettingWriter::new();
        repo.expect_upsert_setting()
            .withf(|setting| setting.hub_id == 7 && setting.key == "shop_name")
            .returning(|setting| {
                Ok(SystemSetting {
                    id: 4,
                    hub_id: setting.hub_id,
                    key: setting.key.clone(),
                    value: setting.value.clone(),
                    description: setting.description.clone(),
                    updated_at: fixed_datetime(),
                })
            });

        let form = SaveSettingForm {
            key: "shop_name".to_string(),
            value: "Atelier".to_string(),
            description: None,
        };
        let setting = save_setting(&repo, &manager(), form).expect("setting saved");

        assert_eq!(setting.value, "Atelier");
    }

    #[test]
    fn save_setting_rejects_bad_numbers() {
        let mut repo = MockSettingWriter::new();
        repo.expect_upsert_setting().never();

        let form = SaveSettingForm {
            key: DEFAULT_ORDER_DURATION_KEY.to_string(),
            value: "soon".to_string(),
            description: None,
        };
        let result = save_setting(&repo, &manager(), form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
