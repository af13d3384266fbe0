//! Course assignment model.
//!
//! Each course carries at most one visual profile. Assignments are replaced
//! wholesale: assigning a new profile first removes any existing row.

use serde::{Deserialize, Serialize};

/// A course-to-profile assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAssignment {
    pub id: Option<i64>,
    pub course_id: i64,
    pub profile_id: i64,
    /// Timestamp the assignment was made (unix seconds)
    pub time_created: i64,
    pub time_modified: i64,
    /// Id of the user who made the assignment (0 when anonymized)
    pub user_modified: i64,
}

/// Profile id meaning "no profile" when passed to an assign operation.
pub const NO_PROFILE: i64 = 0;
