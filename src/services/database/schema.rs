use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_profiles_table(conn)?;
    run_profile_migrations(conn)?;
    create_course_profiles_table(conn)?;
    Ok(())
}

fn create_profiles_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            primary_color TEXT NOT NULL,
            secondary_color TEXT NOT NULL,
            background_color TEXT NOT NULL,
            header_image TEXT,
            time_created INTEGER NOT NULL,
            time_modified INTEGER NOT NULL,
            user_modified INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create profiles table")?;

    Ok(())
}

fn run_profile_migrations(conn: &Connection) -> Result<()> {
    // header_image arrived after the first release
    migrations::ensure_column(
        conn,
        "profiles",
        "header_image",
        "ALTER TABLE profiles ADD COLUMN header_image TEXT",
    )?;

    Ok(())
}

fn create_course_profiles_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL UNIQUE,
            profile_id INTEGER NOT NULL REFERENCES profiles(id),
            time_created INTEGER NOT NULL,
            time_modified INTEGER NOT NULL,
            user_modified INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create course_profiles table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_course_profiles_profile
         ON course_profiles (profile_id)",
        [],
    )
    .context("Failed to create course_profiles index")?;

    Ok(())
}
