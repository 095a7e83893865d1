use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::setting::{
        NewSystemSetting as DomainNewSystemSetting, SystemSetting as DomainSystemSetting,
    },
    models::setting::{NewSystemSetting as DbNewSystemSetting, SystemSetting as DbSystemSetting},
    repository::{DieselRepository, SettingReader, SettingWriter},
    schema::system_settings,
};

impl SettingReader for DieselRepository {
    fn list_settings(&self, hub_id: i32) -> RepositoryResult<Vec<DomainSystemSetting>> {
        let mut conn = self.conn()?;
        let settings = system_settings::table
            .filter(system_settings::hub_id.eq(hub_id))
            .order(system_settings::key.asc())
            .load::<DbSystemSetting>(&mut conn)?;

        Ok(settings.into_iter().map(Into::into).collect())
    }
}

impl SettingWriter for DieselRepository {
    fn upsert_setting(
        &self,
        setting: &DomainNewSystemSetting,
    ) -> RepositoryResult<DomainSystemSetting> {
        let mut conn = self.conn()?;
        let now = Local::now().naive_utc();

        conn.transaction::<DomainSystemSetting, RepositoryError, _>(|conn| {
            let existing = system_settings::table
                .filter(system_settings::hub_id.eq(setting.hub_id))
                .filter(system_settings::key.eq(&setting.key))
                .select(system_settings::id)
                .first::<i32>(conn)
                .optional()?;

            let stored = match existing {
                Some(id) => {
                    let target = system_settings::table.find(id);
                    match setting.description.as_deref() {
                        Some(description) => diesel::update(target)
                            .set((
                                system_settings::value.eq(&setting.value),
                                system_settings::description.eq(description),
                                system_settings::updated_at.eq(now),
                            ))
                            .get_result::<DbSystemSetting>(conn)?,
                        None => diesel::update(target)
                            .set((
                                system_settings::value.eq(&setting.value),
                                system_settings::updated_at.eq(now),
                            ))
                            .get_result::<DbSystemSetting>(conn)?,
                    }
                }
                None => diesel::insert_into(system_settings::table)
                    .values(&DbNewSystemSetting::from_domain(setting, now))
                    .get_result::<DbSystemSetting>(conn)?,
            };

            Ok(stored.into())
        })
    }
}
