// Visual Profiles admin tool
// Main entry point

use anyhow::{bail, Context, Result};
use std::path::Path;

use visual_profiles::config::AppConfig;
use visual_profiles::models::profile::ProfileDraft;
use visual_profiles::services::assignment::AssignmentService;
use visual_profiles::services::cache::MemoryCache;
use visual_profiles::services::contrast;
use visual_profiles::services::database::Database;
use visual_profiles::services::events::ObserverRegistry;
use visual_profiles::services::profile::export::ProfileExport;
use visual_profiles::services::profile::ProfileService;
use visual_profiles::services::theme;

const USAGE: &str = "\
Usage: visual-profiles <command> [args]

Commands:
  list                          List all profiles with usage counts
  search <query>                Search profiles by name or color
  create <name> <primary> <secondary> <background>
                                Create a profile
  delete <id>                   Delete a profile (fails while in use)
  assign <course> <profile>     Assign a profile to a course (profile 0 removes)
  contrast <colorA> <colorB>    WCAG contrast check between two hex colors
  css <id>                      Print the CSS preview for a profile
  export <file>                 Export all profiles to a JSON file
  import <file>                 Import profiles from a JSON file
";

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print!("{}", USAGE);
        return Ok(());
    };

    // Contrast checks need no database
    if command == "contrast" {
        return run_contrast(&args[1..]);
    }

    let config = AppConfig::load()?;
    let db_path = config.resolved_database_path()?;
    let db_path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;

    log::info!("Opening profile database at {}", db_path_str);
    let db = Database::new(db_path_str)?;
    db.initialize_schema()?;

    let cache = MemoryCache::new();
    let observers = ObserverRegistry::new();
    let profiles = ProfileService::new(&db, &cache, &observers);
    let assignments = AssignmentService::new(&db, &cache);

    if config.seed_defaults {
        let installed = profiles.install_defaults(0)?;
        if installed > 0 {
            log::info!("Installed {} default profile(s)", installed);
        }
    }

    match command.as_str() {
        "list" => {
            for (profile, usage) in profiles.list_with_usage()? {
                println!(
                    "{:>4}  {:<30} {} {} {}  ({} course(s))",
                    profile.id.unwrap_or(0),
                    profile.name,
                    profile.primary_color,
                    profile.secondary_color,
                    profile.background_color,
                    usage,
                );
            }
        }
        "search" => {
            let query = args.get(1).map(String::as_str).unwrap_or("");
            for profile in profiles.search(query)? {
                println!("{:>4}  {}", profile.id.unwrap_or(0), profile.name);
            }
        }
        "create" => {
            let [name, primary, secondary, background] = &args[1..] else {
                bail!("create expects: <name> <primary> <secondary> <background>");
            };
            let draft = ProfileDraft::new(name, primary, secondary, background);
            let id = profiles.create(&draft, 0)?;
            println!("Created profile {} ({})", id, name);
        }
        "delete" => {
            let id = parse_id(args.get(1), "profile id")?;
            profiles.delete(id)?;
            println!("Deleted profile {}", id);
        }
        "assign" => {
            let course = parse_id(args.get(1), "course id")?;
            let profile = parse_id(args.get(2), "profile id")?;
            assignments.assign(course, profile, &profiles, 0)?;
            println!("Course {} updated", course);
        }
        "css" => {
            let id = parse_id(args.get(1), "profile id")?;
            let profile = profiles
                .get(id)?
                .with_context(|| format!("No profile with id {}", id))?;
            print!("{}", theme::profile_css(&profile));
        }
        "export" => {
            let path = args.get(1).context("export expects a file path")?;
            let entries = profiles.export_all()?;
            let json = serde_json::to_string_pretty(&entries)?;
            std::fs::write(Path::new(path), json)
                .with_context(|| format!("Failed to write {}", path))?;
            println!("Exported {} profile(s) to {}", entries.len(), path);
        }
        "import" => {
            let path = args.get(1).context("import expects a file path")?;
            let content = std::fs::read_to_string(Path::new(path))
                .with_context(|| format!("Failed to read {}", path))?;
            let entries: Vec<ProfileExport> =
                serde_json::from_str(&content).context("Invalid profile export file")?;
            let outcome = profiles.import(entries, 0)?;
            println!(
                "Imported {} profile(s), {} error(s)",
                outcome.imported, outcome.errors
            );
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print!("{}", USAGE);
        }
    }

    Ok(())
}

fn run_contrast(args: &[String]) -> Result<()> {
    let [color_a, color_b] = args else {
        bail!("contrast expects: <colorA> <colorB>");
    };

    let report = contrast::check_contrast(color_a, color_b)?;
    println!("Contrast ratio: {:.2}", report.display_ratio());
    println!("  AA (normal text):    {}", pass(report.aa));
    println!("  AA (large text):     {}", pass(report.aa_large));
    println!("  AAA (normal text):   {}", pass(report.aaa));
    println!("  AAA (large text):    {}", pass(report.aaa_large));
    Ok(())
}

fn pass(ok: bool) -> &'static str {
    if ok {
        "pass"
    } else {
        "fail"
    }
}

fn parse_id(arg: Option<&String>, what: &str) -> Result<i64> {
    arg.with_context(|| format!("Missing {}", what))?
        .parse()
        .with_context(|| format!("Invalid {}", what))
}
