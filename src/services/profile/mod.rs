//! Profile service for CRUD operations on visual profiles.
//!
//! This service provides methods to create, read, update, and delete
//! profiles, enforce name uniqueness, track per-course usage, and seed the
//! stock profiles on first run. Every mutation invalidates the shared cache
//! before returning and publishes a lifecycle event afterwards.
//!
//! Name matching is case-insensitive throughout (duplicate checks,
//! availability, search).

use std::cell::RefCell;

use chrono::Utc;
use rusqlite::{params, Row};

use crate::models::profile::{default_profiles, ColorProfile, ProfileDraft};
use crate::services::cache::ProfileCache;
use crate::services::database::Database;
use crate::services::events::{ObserverRegistry, ProfileEvent};

mod error;
pub mod export;

pub use error::{ProfileError, ProfileResult};

/// Service for managing visual profiles.
pub struct ProfileService<'a> {
    db: &'a Database,
    cache: &'a dyn ProfileCache,
    observers: &'a ObserverRegistry,
    /// Per-instance memo in front of the shared cache.
    memo: RefCell<Option<Vec<ColorProfile>>>,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService over the given database, cache, and
    /// observer registry.
    pub fn new(
        db: &'a Database,
        cache: &'a dyn ProfileCache,
        observers: &'a ObserverRegistry,
    ) -> Self {
        Self {
            db,
            cache,
            observers,
            memo: RefCell::new(None),
        }
    }

    /// Seed the stock profiles if the table is empty.
    pub fn install_defaults(&self, user: i64) -> ProfileResult<usize> {
        let count: i64 =
            self.db
                .connection()
                .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?;

        if count > 0 {
            return Ok(0);
        }

        log::info!("Installing default visual profiles");
        let mut installed = 0;
        for draft in default_profiles() {
            match self.create(&draft, user) {
                Ok(_) => installed += 1,
                Err(e) => log::warn!("Failed to install default profile: {}", e),
            }
        }

        Ok(installed)
    }

    /// Create a new profile and return its id.
    pub fn create(&self, draft: &ProfileDraft, user: i64) -> ProfileResult<i64> {
        draft.validate()?;

        if !self.name_available(&draft.name, None)? {
            return Err(ProfileError::DuplicateName(draft.name.trim().to_string()));
        }

        let record = draft.normalized();
        let now = Utc::now().timestamp();

        self.db.connection().execute(
            "INSERT INTO profiles (name, primary_color, secondary_color, background_color,
             header_image, time_created, time_modified, user_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.name,
                record.primary_color,
                record.secondary_color,
                record.background_color,
                record.header_image,
                now,
                now,
                user,
            ],
        )?;

        let id = self.db.connection().last_insert_rowid();
        self.invalidate_list();

        self.observers.publish(&ProfileEvent::Created {
            id,
            name: record.name.clone(),
        });
        log::info!("Created profile '{}' (id {})", record.name, id);

        Ok(id)
    }

    /// Update an existing profile.
    pub fn update(&self, id: i64, draft: &ProfileDraft, user: i64) -> ProfileResult<()> {
        if self.get(id)?.is_none() {
            return Err(ProfileError::NotFound(id));
        }

        draft.validate()?;

        if !self.name_available(&draft.name, Some(id))? {
            return Err(ProfileError::DuplicateName(draft.name.trim().to_string()));
        }

        let record = draft.normalized();
        let now = Utc::now().timestamp();

        self.db.connection().execute(
            "UPDATE profiles SET name = ?1, primary_color = ?2, secondary_color = ?3,
             background_color = ?4, header_image = ?5, time_modified = ?6, user_modified = ?7
             WHERE id = ?8",
            params![
                record.name,
                record.primary_color,
                record.secondary_color,
                record.background_color,
                record.header_image,
                now,
                user,
                id,
            ],
        )?;

        self.invalidate_list();
        // Course lookups embed the profile record
        self.cache.invalidate_all_courses();

        self.observers.publish(&ProfileEvent::Updated {
            id,
            name: record.name.clone(),
        });

        Ok(())
    }

    /// Delete a profile. Fails while any course still uses it.
    pub fn delete(&self, id: i64) -> ProfileResult<()> {
        let profile = self.get(id)?.ok_or(ProfileError::NotFound(id))?;

        let count = self.usage_count(id)?;
        if count > 0 {
            return Err(ProfileError::InUse { id, count });
        }

        self.db
            .connection()
            .execute("DELETE FROM profiles WHERE id = ?1", params![id])?;

        self.invalidate_list();
        self.cache.invalidate_all_courses();

        self.observers.publish(&ProfileEvent::Deleted {
            id,
            name: profile.name.clone(),
        });
        log::info!("Deleted profile '{}' (id {})", profile.name, id);

        Ok(())
    }

    /// Get a profile by id.
    pub fn get(&self, id: i64) -> ProfileResult<Option<ColorProfile>> {
        let result = self.db.connection().query_row(
            "SELECT id, name, primary_color, secondary_color, background_color,
             header_image, time_created, time_modified, user_modified
             FROM profiles WHERE id = ?1",
            params![id],
            row_to_profile,
        );

        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all profiles ordered by name.
    ///
    /// Reads go memo, then shared cache, then database. Pass `true` to skip
    /// both caches and reload.
    pub fn list(&self, force_refresh: bool) -> ProfileResult<Vec<ColorProfile>> {
        if !force_refresh {
            if let Some(profiles) = self.memo.borrow().clone() {
                return Ok(profiles);
            }
            if let Some(profiles) = self.cache.get_profiles() {
                *self.memo.borrow_mut() = Some(profiles.clone());
                return Ok(profiles);
            }
        }

        let mut stmt = self.db.connection().prepare(
            "SELECT id, name, primary_color, secondary_color, background_color,
             header_image, time_created, time_modified, user_modified
             FROM profiles
             ORDER BY name COLLATE NOCASE ASC",
        )?;

        let profiles = stmt
            .query_map([], row_to_profile)?
            .collect::<Result<Vec<_>, _>>()?;

        *self.memo.borrow_mut() = Some(profiles.clone());
        self.cache.set_profiles(profiles.clone());

        Ok(profiles)
    }

    /// Search profiles by name or color, case-insensitively.
    /// A blank query returns the full list.
    pub fn search(&self, query: &str) -> ProfileResult<Vec<ColorProfile>> {
        let query = query.trim().to_lowercase();
        let profiles = self.list(false)?;

        if query.is_empty() {
            return Ok(profiles);
        }

        Ok(profiles
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.primary_color.to_lowercase().contains(&query)
                    || p.secondary_color.to_lowercase().contains(&query)
                    || p.background_color.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// Check whether a profile name is free (optionally excluding one id).
    pub fn name_available(&self, name: &str, exclude_id: Option<i64>) -> ProfileResult<bool> {
        let count: i64 = if let Some(id) = exclude_id {
            self.db.connection().query_row(
                "SELECT COUNT(*) FROM profiles WHERE LOWER(name) = LOWER(?1) AND id != ?2",
                params![name.trim(), id],
                |row| row.get(0),
            )?
        } else {
            self.db.connection().query_row(
                "SELECT COUNT(*) FROM profiles WHERE LOWER(name) = LOWER(?1)",
                params![name.trim()],
                |row| row.get(0),
            )?
        };

        Ok(count == 0)
    }

    /// Number of courses currently assigned to a profile.
    pub fn usage_count(&self, id: i64) -> ProfileResult<i64> {
        let count: i64 = self.db.connection().query_row(
            "SELECT COUNT(*) FROM course_profiles WHERE profile_id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(count)
    }

    /// Profiles paired with their usage counts, most used first.
    pub fn list_with_usage(&self) -> ProfileResult<Vec<(ColorProfile, i64)>> {
        let profiles = self.list(false)?;
        let mut with_usage = Vec::with_capacity(profiles.len());

        for profile in profiles {
            let count = match profile.id {
                Some(id) => self.usage_count(id)?,
                None => 0,
            };
            with_usage.push((profile, count));
        }

        with_usage.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(with_usage)
    }

    fn invalidate_list(&self) {
        self.memo.borrow_mut().take();
        self.cache.invalidate_profiles();
    }
}

fn row_to_profile(row: &Row<'_>) -> Result<ColorProfile, rusqlite::Error> {
    Ok(ColorProfile {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        primary_color: row.get(2)?,
        secondary_color: row.get(3)?,
        background_color: row.get(4)?,
        header_image: row.get(5)?,
        time_created: row.get(6)?,
        time_modified: row.get(7)?,
        user_modified: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::MemoryCache;
    use pretty_assertions::assert_eq;

    fn setup() -> (Database, MemoryCache, ObserverRegistry) {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        (db, MemoryCache::new(), ObserverRegistry::new())
    }

    fn draft(name: &str) -> ProfileDraft {
        ProfileDraft::new(name, "#0066CC", "#004499", "#F0F5FF")
    }

    fn assign_course(db: &Database, course_id: i64, profile_id: i64) {
        db.connection()
            .execute(
                "INSERT INTO course_profiles (course_id, profile_id, time_created, time_modified, user_modified)
                 VALUES (?1, ?2, 0, 0, 0)",
                params![course_id, profile_id],
            )
            .unwrap();
    }

    #[test]
    fn test_create_and_get() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 7).unwrap();
        let profile = service.get(id).unwrap().unwrap();

        assert_eq!(profile.name, "Ocean");
        assert_eq!(profile.primary_color, "#0066CC");
        assert_eq!(profile.user_modified, 7);
        assert!(profile.time_created > 0);
    }

    #[test]
    fn test_create_normalizes_colors() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let input = ProfileDraft::new("Ocean", "0066cc", "#00449f", "f0f5ff");
        let id = service.create(&input, 1).unwrap();

        let profile = service.get(id).unwrap().unwrap();
        assert_eq!(profile.primary_color, "#0066CC");
        assert_eq!(profile.secondary_color, "#00449F");
        assert_eq!(profile.background_color, "#F0F5FF");
    }

    #[test]
    fn test_create_duplicate_name_fails() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        service.create(&draft("Ocean"), 1).unwrap();
        let err = service.create(&draft("Ocean"), 1).unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateName(_)));

        // Case-insensitive policy
        let err = service.create(&draft("OCEAN"), 1).unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateName(_)));
    }

    #[test]
    fn test_create_invalid_color_names_field() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let bad = ProfileDraft::new("Ocean", "#0066CC", "red", "#F0F5FF");
        let err = service.create(&bad, 1).unwrap_err();
        match err {
            ProfileError::Validation(v) => assert_eq!(v.field, "secondary_color"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_update() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 1).unwrap();
        let before = service.get(id).unwrap().unwrap();

        let mut changed = draft("Deep Ocean");
        changed.primary_color = "#123456".to_string();
        service.update(id, &changed, 2).unwrap();

        let after = service.get(id).unwrap().unwrap();
        assert_eq!(after.name, "Deep Ocean");
        assert_eq!(after.primary_color, "#123456");
        assert_eq!(after.user_modified, 2);
        assert_eq!(after.time_created, before.time_created);
    }

    #[test]
    fn test_update_missing_profile() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let err = service.update(999, &draft("Ghost"), 1).unwrap_err();
        assert!(matches!(err, ProfileError::NotFound(999)));
    }

    #[test]
    fn test_update_keeps_own_name() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 1).unwrap();
        // Re-saving under the same name is not a duplicate
        service.update(id, &draft("Ocean"), 1).unwrap();
    }

    #[test]
    fn test_update_to_taken_name_fails() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        service.create(&draft("Ocean"), 1).unwrap();
        let id = service.create(&draft("Forest"), 1).unwrap();

        let err = service.update(id, &draft("ocean"), 1).unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateName(_)));
    }

    #[test]
    fn test_delete() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 1).unwrap();
        service.delete(id).unwrap();
        assert!(service.get(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_profile() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let err = service.delete(42).unwrap_err();
        assert!(matches!(err, ProfileError::NotFound(42)));
    }

    #[test]
    fn test_delete_in_use_fails() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 1).unwrap();
        assign_course(&db, 10, id);
        assign_course(&db, 11, id);

        let err = service.delete(id).unwrap_err();
        match err {
            ProfileError::InUse { count, .. } => assert_eq!(count, 2),
            other => panic!("expected InUse, got {:?}", other),
        }

        // Unassign, then deletion succeeds
        db.connection()
            .execute("DELETE FROM course_profiles WHERE profile_id = ?1", params![id])
            .unwrap();
        service.delete(id).unwrap();
    }

    #[test]
    fn test_list_sorted_by_name() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        service.create(&draft("Zed"), 1).unwrap();
        service.create(&draft("Alpha"), 1).unwrap();
        service.create(&draft("Mid"), 1).unwrap();

        let names: Vec<String> = service
            .list(false)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zed"]);
    }

    #[test]
    fn test_list_populates_and_uses_cache() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        service.create(&draft("Ocean"), 1).unwrap();
        assert!(cache.get_profiles().is_none(), "create invalidates");

        service.list(false).unwrap();
        assert_eq!(cache.get_profiles().unwrap().len(), 1);

        // A fresh service instance (empty memo) is served from the shared cache
        let other = ProfileService::new(&db, &cache, &observers);
        assert_eq!(other.list(false).unwrap().len(), 1);
    }

    #[test]
    fn test_mutations_invalidate_cache() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 1).unwrap();
        service.list(false).unwrap();
        assert!(cache.get_profiles().is_some());

        service.update(id, &draft("Sea"), 1).unwrap();
        assert!(cache.get_profiles().is_none());

        // The same instance must not serve its stale memo either
        let names: Vec<String> = service
            .list(false)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Sea"]);
    }

    #[test]
    fn test_search_by_name_and_color() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        service.create(&draft("Ocean Blue"), 1).unwrap();
        service
            .create(&ProfileDraft::new("Forest", "#228B22", "#006400", "#F0FFF0"), 1)
            .unwrap();

        let hits = service.search("ocean").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ocean Blue");

        // Colors are stored upper-case; search stays case-insensitive
        let hits = service.search("228b22").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Forest");

        let hits = service.search("   ").unwrap();
        assert_eq!(hits.len(), 2);

        let hits = service.search("nothing").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_name_available() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 1).unwrap();

        assert!(!service.name_available("Ocean", None).unwrap());
        assert!(!service.name_available("ocean", None).unwrap());
        assert!(service.name_available("Forest", None).unwrap());
        assert!(service.name_available("Ocean", Some(id)).unwrap());
    }

    #[test]
    fn test_usage_count() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let id = service.create(&draft("Ocean"), 1).unwrap();
        assert_eq!(service.usage_count(id).unwrap(), 0);

        assign_course(&db, 10, id);
        assign_course(&db, 11, id);
        assert_eq!(service.usage_count(id).unwrap(), 2);
    }

    #[test]
    fn test_list_with_usage_orders_most_used_first() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        let busy = service.create(&draft("Busy"), 1).unwrap();
        let idle = service.create(&draft("Idle"), 1).unwrap();
        assign_course(&db, 1, busy);
        assign_course(&db, 2, busy);
        assign_course(&db, 3, idle);

        let stats = service.list_with_usage().unwrap();
        assert_eq!(stats[0].0.name, "Busy");
        assert_eq!(stats[0].1, 2);
        assert_eq!(stats[1].1, 1);
    }

    #[test]
    fn test_install_defaults() {
        let (db, cache, observers) = setup();
        let service = ProfileService::new(&db, &cache, &observers);

        assert_eq!(service.install_defaults(1).unwrap(), 4);
        assert_eq!(service.list(false).unwrap().len(), 4);

        // Second run is a no-op
        assert_eq!(service.install_defaults(1).unwrap(), 0);
        assert_eq!(service.list(false).unwrap().len(), 4);
    }

    #[test]
    fn test_events_fire_on_mutations() {
        let (db, cache, mut observers) = setup();

        let mut mock = crate::services::events::MockProfileObserver::new();
        mock.expect_on_event()
            .withf(|e| matches!(e, ProfileEvent::Created { name, .. } if name == "Ocean"))
            .times(1)
            .return_const(());
        mock.expect_on_event()
            .withf(|e| matches!(e, ProfileEvent::Deleted { .. }))
            .times(1)
            .return_const(());
        observers.register(Box::new(mock));

        let service = ProfileService::new(&db, &cache, &observers);
        let id = service.create(&draft("Ocean"), 1).unwrap();
        service.delete(id).unwrap();
    }
}
