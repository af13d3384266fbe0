//! Profile export and import.
//!
//! The wire format is a flat JSON array of name + colors + header image.
//! Import is best-effort: each entry is validated and created independently,
//! failures are counted and logged rather than aborting the batch.

use serde::{Deserialize, Serialize};

use super::{ProfileResult, ProfileService};
use crate::models::profile::{ColorProfile, ProfileDraft};

/// A profile as it appears in the export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileExport {
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
}

impl From<&ColorProfile> for ProfileExport {
    fn from(profile: &ColorProfile) -> Self {
        Self {
            name: profile.name.clone(),
            primary_color: profile.primary_color.clone(),
            secondary_color: profile.secondary_color.clone(),
            background_color: profile.background_color.clone(),
            header_image: profile.header_image.clone(),
        }
    }
}

impl From<ProfileExport> for ProfileDraft {
    fn from(entry: ProfileExport) -> Self {
        Self {
            name: entry.name,
            primary_color: entry.primary_color,
            secondary_color: entry.secondary_color,
            background_color: entry.background_color,
            header_image: entry.header_image,
        }
    }
}

/// Counts from a best-effort import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub errors: usize,
}

impl<'a> ProfileService<'a> {
    /// Export every profile, ordered by name.
    pub fn export_all(&self) -> ProfileResult<Vec<ProfileExport>> {
        Ok(self.list(false)?.iter().map(ProfileExport::from).collect())
    }

    /// Import profiles, creating each entry independently.
    pub fn import(&self, entries: Vec<ProfileExport>, user: i64) -> ProfileResult<ImportOutcome> {
        let mut outcome = ImportOutcome::default();

        for entry in entries {
            let name = entry.name.clone();
            match self.create(&ProfileDraft::from(entry), user) {
                Ok(_) => outcome.imported += 1,
                Err(e) => {
                    log::warn!("Skipping profile '{}' during import: {}", name, e);
                    outcome.errors += 1;
                }
            }
        }

        log::info!(
            "Imported {} profile(s), {} error(s)",
            outcome.imported,
            outcome.errors
        );
        Ok(outcome)
    }
}
