//! Course assignment service.
//!
//! Assigning a profile to a course always replaces any existing assignment,
//! so each course carries at most one profile. Passing the `NO_PROFILE`
//! sentinel removes the assignment. Course lookups are cached, including the
//! "no profile" answer, so repeated misses stay cheap.

use chrono::Utc;
use rusqlite::params;

use crate::models::assignment::{CourseAssignment, NO_PROFILE};
use crate::models::profile::ColorProfile;
use crate::services::cache::ProfileCache;
use crate::services::database::Database;
use crate::services::profile::{ProfileError, ProfileResult, ProfileService};

/// Service managing the course-to-profile relation.
pub struct AssignmentService<'a> {
    db: &'a Database,
    cache: &'a dyn ProfileCache,
}

impl<'a> AssignmentService<'a> {
    pub fn new(db: &'a Database, cache: &'a dyn ProfileCache) -> Self {
        Self { db, cache }
    }

    /// Assign a profile to a course, replacing any existing assignment.
    ///
    /// `NO_PROFILE` (0) removes the assignment and assigns nothing.
    pub fn assign(
        &self,
        course_id: i64,
        profile_id: i64,
        profiles: &ProfileService<'_>,
        user: i64,
    ) -> ProfileResult<()> {
        // Clear any existing assignment first
        self.db.connection().execute(
            "DELETE FROM course_profiles WHERE course_id = ?1",
            params![course_id],
        )?;

        if profile_id != NO_PROFILE {
            if profiles.get(profile_id)?.is_none() {
                // Leave the cache invalidated; the old row is already gone
                self.cache.invalidate_course(course_id);
                return Err(ProfileError::NotFound(profile_id));
            }

            let now = Utc::now().timestamp();
            self.db.connection().execute(
                "INSERT INTO course_profiles (course_id, profile_id, time_created, time_modified, user_modified)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![course_id, profile_id, now, now, user],
            )?;
            log::info!("Assigned profile {} to course {}", profile_id, course_id);
        } else {
            log::info!("Removed profile assignment from course {}", course_id);
        }

        self.cache.invalidate_course(course_id);
        Ok(())
    }

    /// The profile assigned to a course, if any. Cached both ways.
    pub fn profile_for_course(&self, course_id: i64) -> ProfileResult<Option<ColorProfile>> {
        if let Some(cached) = self.cache.get_course_profile(course_id) {
            return Ok(cached);
        }

        let result = self.db.connection().query_row(
            "SELECT p.id, p.name, p.primary_color, p.secondary_color, p.background_color,
                    p.header_image, p.time_created, p.time_modified, p.user_modified
             FROM profiles p
             JOIN course_profiles cp ON cp.profile_id = p.id
             WHERE cp.course_id = ?1",
            params![course_id],
            |row| {
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
            },
        );

        let profile = match result {
            Ok(profile) => Some(profile),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        // Cache the absence too, so repeated misses skip the join
        self.cache.set_course_profile(course_id, profile.clone());

        Ok(profile)
    }

    /// The raw assignment row for a course, bypassing the cache.
    pub fn assignment_for_course(&self, course_id: i64) -> ProfileResult<Option<CourseAssignment>> {
        let result = self.db.connection().query_row(
            "SELECT id, course_id, profile_id, time_created, time_modified, user_modified
             FROM course_profiles WHERE course_id = ?1",
            params![course_id],
            |row| {
                Ok(CourseAssignment {
                    id: Some(row.get(0)?),
                    course_id: row.get(1)?,
                    profile_id: row.get(2)?,
                    time_created: row.get(3)?,
                    time_modified: row.get(4)?,
                    user_modified: row.get(5)?,
                })
            },
        );

        match result {
            Ok(assignment) => Ok(Some(assignment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Ids of courses using a profile, ordered, optionally limited.
    pub fn courses_using(&self, profile_id: i64, limit: Option<usize>) -> ProfileResult<Vec<i64>> {
        let mut stmt = self.db.connection().prepare(
            "SELECT course_id FROM course_profiles WHERE profile_id = ?1 ORDER BY course_id ASC",
        )?;

        let mut courses = stmt
            .query_map(params![profile_id], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        if let Some(limit) = limit {
            courses.truncate(limit);
        }

        Ok(courses)
    }

    /// Cascade cleanup when a course is deleted in the host system.
    pub fn handle_course_deleted(&self, course_id: i64) -> ProfileResult<()> {
        let removed = self.db.connection().execute(
            "DELETE FROM course_profiles WHERE course_id = ?1",
            params![course_id],
        )?;

        if removed > 0 {
            log::info!("Removed profile assignment for deleted course {}", course_id);
        }
        self.cache.invalidate_course(course_id);

        Ok(())
    }
}
