//! Visual profile model.
//!
//! A profile is a named triple of colors (primary, secondary, background)
//! that can be assigned to courses, plus an optional header image reference.

use serde::{Deserialize, Serialize};

use crate::utils::color::normalize_hex_color;

/// Maximum allowed profile name length.
pub const MAX_NAME_LENGTH: usize = 50;

/// Sentinel user id recorded after privacy anonymization.
pub const ANONYMOUS_USER: i64 = 0;

/// A named visual profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorProfile {
    /// Unique identifier (database primary key)
    pub id: Option<i64>,
    /// Display name (must be unique across profiles)
    pub name: String,
    /// Primary color, canonical `#RRGGBB`
    pub primary_color: String,
    /// Secondary color, canonical `#RRGGBB`
    pub secondary_color: String,
    /// Background color, canonical `#RRGGBB`
    pub background_color: String,
    /// Optional header image URL/reference
    pub header_image: Option<String>,
    /// Creation timestamp (unix seconds)
    pub time_created: i64,
    /// Last modification timestamp (unix seconds)
    pub time_modified: i64,
    /// Id of the last user who modified this profile (0 when anonymized)
    pub user_modified: i64,
}

/// Input for creating or updating a profile.
///
/// Colors here are raw user input; [`ProfileDraft::validate`] checks and
/// [`ProfileDraft::normalized`] canonicalizes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub header_image: Option<String>,
}

impl ProfileDraft {
    /// Create a draft from a name and three colors.
    pub fn new(
        name: impl Into<String>,
        primary: impl Into<String>,
        secondary: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            primary_color: primary.into(),
            secondary_color: secondary.into(),
            background_color: background.into(),
            header_image: None,
        }
    }

    /// Validate the draft, naming the first offending field.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftValidationError::new("name", "name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DraftValidationError::new(
                "name",
                "name must be 50 characters or less",
            ));
        }

        for (field, value) in [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
            ("background_color", &self.background_color),
        ] {
            if value.trim().is_empty() {
                return Err(DraftValidationError::new(field, "color is required"));
            }
            if normalize_hex_color(value).is_none() {
                return Err(DraftValidationError::new(
                    field,
                    "invalid color format (use hex like #FF0000)",
                ));
            }
        }

        Ok(())
    }

    /// Return a copy with trimmed name and canonical upper-case colors.
    ///
    /// Call only after [`validate`](Self::validate) has passed; colors that
    /// fail to normalize are left untouched here.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            primary_color: normalize_hex_color(&self.primary_color)
                .unwrap_or_else(|| self.primary_color.clone()),
            secondary_color: normalize_hex_color(&self.secondary_color)
                .unwrap_or_else(|| self.secondary_color.clone()),
            background_color: normalize_hex_color(&self.background_color)
                .unwrap_or_else(|| self.background_color.clone()),
            header_image: self
                .header_image
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        }
    }
}

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl DraftValidationError {
    fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

impl std::fmt::Display for DraftValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for DraftValidationError {}

/// Stock profiles installed on an empty store.
pub fn default_profiles() -> Vec<ProfileDraft> {
    vec![
        ProfileDraft::new("Corporate Blue", "#0066CC", "#004499", "#F0F5FF"),
        ProfileDraft::new("Nature Green", "#228B22", "#006400", "#F0FFF0"),
        ProfileDraft::new("Modern Purple", "#6A4C93", "#483D8B", "#F5F0FF"),
        ProfileDraft::new("Dynamic Orange", "#FF6B35", "#E55100", "#FFF5F0"),
    ]
}
