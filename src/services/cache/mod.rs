//! Shared cache for profile lookups.
//!
//! Mutating operations invalidate before returning, so a read that follows a
//! successful write always sees fresh state. Course lookups cache the "no
//! profile" answer too; the outer `Option` means "not cached", the inner one
//! carries the cached answer.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::profile::ColorProfile;

/// Cache seam injected into the profile and assignment services.
pub trait ProfileCache {
    /// Cached full profile list, if present.
    fn get_profiles(&self) -> Option<Vec<ColorProfile>>;
    fn set_profiles(&self, profiles: Vec<ColorProfile>);
    fn invalidate_profiles(&self);

    /// Cached per-course lookup. `None` = not cached,
    /// `Some(None)` = cached as "course has no profile".
    fn get_course_profile(&self, course_id: i64) -> Option<Option<ColorProfile>>;
    fn set_course_profile(&self, course_id: i64, profile: Option<ColorProfile>);
    fn invalidate_course(&self, course_id: i64);

    /// Drop every per-course entry. Used when a profile's colors change,
    /// since cached course lookups embed the profile record.
    fn invalidate_all_courses(&self);
}

/// In-memory cache backing the default wiring.
#[derive(Default)]
pub struct MemoryCache {
    profiles: Mutex<Option<Vec<ColorProfile>>>,
    course_profiles: Mutex<HashMap<i64, Option<ColorProfile>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileCache for MemoryCache {
    fn get_profiles(&self) -> Option<Vec<ColorProfile>> {
        self.profiles.lock().unwrap().clone()
    }

    fn set_profiles(&self, profiles: Vec<ColorProfile>) {
        *self.profiles.lock().unwrap() = Some(profiles);
    }

    fn invalidate_profiles(&self) {
        *self.profiles.lock().unwrap() = None;
    }

    fn get_course_profile(&self, course_id: i64) -> Option<Option<ColorProfile>> {
        self.course_profiles.lock().unwrap().get(&course_id).cloned()
    }

    fn set_course_profile(&self, course_id: i64, profile: Option<ColorProfile>) {
        self.course_profiles
            .lock()
            .unwrap()
            .insert(course_id, profile);
    }

    fn invalidate_course(&self, course_id: i64) {
        self.course_profiles.lock().unwrap().remove(&course_id);
    }

    fn invalidate_all_courses(&self) {
        self.course_profiles.lock().unwrap().clear();
    }
}
