//! JSON boundary facade.
//!
//! The host UI layer talks to the store through these handlers, which mirror
//! the admin AJAX surface: every response is a JSON object with `success`
//! plus either a payload or an `error` message. Expected store errors become
//! user-facing messages; unexpected failures are logged and reported
//! generically so internals never leak. Authentication and CSRF belong to
//! the host and are assumed to have happened already.

use serde_json::{json, Value};

use crate::models::profile::ProfileDraft;
use crate::services::assignment::AssignmentService;
use crate::services::cache::ProfileCache;
use crate::services::contrast;
use crate::services::database::Database;
use crate::services::events::ObserverRegistry;
use crate::services::profile::export::ProfileExport;
use crate::services::profile::{ProfileError, ProfileService};
use crate::services::theme;

pub mod rate_limit;

pub use rate_limit::RateLimiter;

/// Course rows returned per usage query before `has_more` kicks in.
const COURSE_LIST_LIMIT: usize = 10;

pub struct ApiHandler<'a> {
    profiles: ProfileService<'a>,
    assignments: AssignmentService<'a>,
    limiter: &'a RateLimiter,
}

impl<'a> ApiHandler<'a> {
    pub fn new(
        db: &'a Database,
        cache: &'a dyn ProfileCache,
        observers: &'a ObserverRegistry,
        limiter: &'a RateLimiter,
    ) -> Self {
        Self {
            profiles: ProfileService::new(db, cache, observers),
            assignments: AssignmentService::new(db, cache),
            limiter,
        }
    }

    pub fn get_profile(&self, user: i64, id: i64) -> Value {
        self.guarded(user, |api| {
            match api.profiles.get(id)? {
                Some(profile) => Ok(json!({ "success": true, "profile": profile })),
                None => Err(ProfileError::NotFound(id)),
            }
        })
    }

    pub fn list_profiles(&self, user: i64) -> Value {
        self.guarded(user, |api| {
            let profiles = api.profiles.list(false)?;
            let count = profiles.len();
            Ok(json!({ "success": true, "profiles": profiles, "count": count }))
        })
    }

    pub fn search_profiles(&self, user: i64, query: &str) -> Value {
        self.guarded(user, |api| {
            let profiles = api.profiles.search(query)?;
            let count = profiles.len();
            Ok(json!({ "success": true, "profiles": profiles, "count": count }))
        })
    }

    pub fn create_profile(&self, user: i64, draft: &ProfileDraft) -> Value {
        self.guarded(user, |api| {
            let id = api.profiles.create(draft, user)?;
            Ok(json!({ "success": true, "profileid": id }))
        })
    }

    pub fn update_profile(&self, user: i64, id: i64, draft: &ProfileDraft) -> Value {
        self.guarded(user, |api| {
            api.profiles.update(id, draft, user)?;
            Ok(json!({ "success": true, "profileid": id }))
        })
    }

    pub fn delete_profile(&self, user: i64, id: i64) -> Value {
        self.guarded(user, |api| {
            api.profiles.delete(id)?;
            Ok(json!({ "success": true }))
        })
    }

    pub fn check_contrast(&self, user: i64, color_a: &str, color_b: &str) -> Value {
        self.guarded(user, |_| {
            let report = contrast::check_contrast(color_a, color_b)?;
            Ok(json!({
                "success": true,
                "ratio": report.display_ratio(),
                "aa": report.aa,
                "aa_large": report.aa_large,
                "aaa": report.aaa,
                "aaa_large": report.aaa_large,
            }))
        })
    }

    pub fn get_usage(&self, user: i64, id: i64) -> Value {
        self.guarded(user, |api| {
            let count = api.profiles.usage_count(id)?;
            let courses = api.assignments.courses_using(id, Some(COURSE_LIST_LIMIT))?;
            Ok(json!({
                "success": true,
                "count": count,
                "courses": courses,
                "has_more": count as usize > COURSE_LIST_LIMIT,
            }))
        })
    }

    pub fn validate_name(&self, user: i64, name: &str, exclude_id: Option<i64>) -> Value {
        self.guarded(user, |api| {
            let available = api.profiles.name_available(name, exclude_id)?;
            Ok(json!({ "success": true, "available": available }))
        })
    }

    pub fn assign_profile(&self, user: i64, course_id: i64, profile_id: i64) -> Value {
        self.guarded(user, |api| {
            api.assignments
                .assign(course_id, profile_id, &api.profiles, user)?;
            Ok(json!({ "success": true }))
        })
    }

    pub fn get_course_profile(&self, user: i64, course_id: i64) -> Value {
        self.guarded(user, |api| {
            let profile = api.assignments.profile_for_course(course_id)?;
            Ok(json!({ "success": true, "profile": profile }))
        })
    }

    pub fn export_all(&self, user: i64) -> Value {
        self.guarded(user, |api| {
            let profiles = api.profiles.export_all()?;
            let count = profiles.len();
            Ok(json!({ "success": true, "profiles": profiles, "count": count }))
        })
    }

    pub fn import_profiles(&self, user: i64, entries: Vec<ProfileExport>) -> Value {
        self.guarded(user, |api| {
            let outcome = api.profiles.import(entries, user)?;
            Ok(json!({
                "success": true,
                "imported": outcome.imported,
                "errors": outcome.errors,
            }))
        })
    }

    pub fn preview_css(&self, user: i64, id: i64) -> Value {
        self.guarded(user, |api| {
            match api.profiles.get(id)? {
                Some(profile) => Ok(json!({
                    "success": true,
                    "css": theme::profile_css(&profile),
                    "profile": profile,
                })),
                None => Err(ProfileError::NotFound(id)),
            }
        })
    }

    /// Apply the rate limit, run the action, and map errors to payloads.
    fn guarded<F>(&self, user: i64, action: F) -> Value
    where
        F: FnOnce(&Self) -> Result<Value, ProfileError>,
    {
        if !self.limiter.allow(user) {
            return json!({ "success": false, "error": "Too many requests" });
        }

        match action(self) {
            Ok(payload) => payload,
            Err(err) if err.is_expected() => {
                json!({ "success": false, "error": err.to_string() })
            }
            Err(err) => {
                log::error!("Unexpected failure in profile API: {}", err);
                json!({ "success": false, "error": "An unexpected error occurred" })
            }
        }
    }
}
