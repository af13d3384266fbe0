//! Privacy handling for profile data.
//!
//! Profiles and course assignments are system-wide configuration, not
//! personal data, so right-to-be-forgotten requests anonymize the
//! `user_modified` actor reference instead of deleting rows.

use rusqlite::params;

use crate::models::profile::ANONYMOUS_USER;
use crate::services::database::Database;
use crate::services::profile::ProfileResult;

/// What a user touched, for data-export requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFootprint {
    /// Ids of profiles last modified by the user
    pub profile_ids: Vec<i64>,
    /// Course ids whose assignment the user last modified
    pub course_ids: Vec<i64>,
}

impl UserFootprint {
    pub fn is_empty(&self) -> bool {
        self.profile_ids.is_empty() && self.course_ids.is_empty()
    }
}

pub struct PrivacyService<'a> {
    db: &'a Database,
}

impl<'a> PrivacyService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Report the rows that reference a user.
    pub fn user_footprint(&self, user: i64) -> ProfileResult<UserFootprint> {
        let conn = self.db.connection();

        let mut stmt =
            conn.prepare("SELECT id FROM profiles WHERE user_modified = ?1 ORDER BY id")?;
        let profile_ids = stmt
            .query_map(params![user], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        let mut stmt = conn
            .prepare("SELECT course_id FROM course_profiles WHERE user_modified = ?1 ORDER BY course_id")?;
        let course_ids = stmt
            .query_map(params![user], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(UserFootprint {
            profile_ids,
            course_ids,
        })
    }

    /// Anonymize every reference to a single user. Rows are kept.
    pub fn anonymize_user(&self, user: i64) -> ProfileResult<usize> {
        let conn = self.db.connection();

        let profiles = conn.execute(
            "UPDATE profiles SET user_modified = ?1 WHERE user_modified = ?2",
            params![ANONYMOUS_USER, user],
        )?;
        let assignments = conn.execute(
            "UPDATE course_profiles SET user_modified = ?1 WHERE user_modified = ?2",
            params![ANONYMOUS_USER, user],
        )?;

        let total = profiles + assignments;
        if total > 0 {
            log::info!("Anonymized {} row(s) for user {}", total, user);
        }
        Ok(total)
    }

    /// Anonymize every user reference in both tables.
    pub fn anonymize_all(&self) -> ProfileResult<usize> {
        let conn = self.db.connection();

        let profiles = conn.execute(
            "UPDATE profiles SET user_modified = ?1 WHERE user_modified != ?1",
            params![ANONYMOUS_USER],
        )?;
        let assignments = conn.execute(
            "UPDATE course_profiles SET user_modified = ?1 WHERE user_modified != ?1",
            params![ANONYMOUS_USER],
        )?;

        Ok(profiles + assignments)
    }
}
