//! CSS rendering for visual profiles.
//!
//! Renders a profile as CSS custom properties plus the small rule block the
//! host theme injects ahead of its stylesheet. This is string output only;
//! the SCSS pipeline itself belongs to the host.

use crate::models::profile::ColorProfile;

/// CSS custom property names emitted for a profile.
const VAR_PRIMARY: &str = "--profile-primary";
const VAR_SECONDARY: &str = "--profile-secondary";
const VAR_BACKGROUND: &str = "--profile-background";

/// Render a profile as a `:root` custom-property block.
pub fn profile_css_variables(profile: &ColorProfile) -> String {
    format!(
        ":root {{\n    {}: {};\n    {}: {};\n    {}: {};\n}}\n",
        VAR_PRIMARY,
        profile.primary_color,
        VAR_SECONDARY,
        profile.secondary_color,
        VAR_BACKGROUND,
        profile.background_color,
    )
}

/// Render the full preview stylesheet for a profile.
pub fn profile_css(profile: &ColorProfile) -> String {
    let mut css = profile_css_variables(profile);
    css.push('\n');
    css.push_str(&format!(
        ".navbar {{ background-color: var({primary}); }}\n\
         .btn-primary {{ background-color: var({primary}); border-color: var({primary}); }}\n\
         .btn-secondary {{ background-color: var({secondary}); border-color: var({secondary}); }}\n\
         body, #page {{ background-color: var({background}); }}\n",
        primary = VAR_PRIMARY,
        secondary = VAR_SECONDARY,
        background = VAR_BACKGROUND,
    ));
    css
}
