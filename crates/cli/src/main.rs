//! FixIt command-line tool.
//!
//! Inspects and edits the authority directory (which offices a report can
//! be routed to, and their contact addresses), resolves backend identifiers,
//! and generates / validates configuration files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fixit_core::authority::routing::{authority_class_for, directory_keys_for};
use fixit_core::authority::Authority;
use fixit_core::config::AppConfig;
use fixit_core::storage::KeyValueStore;
use fixit_core::{resolve, AuthorityStore, RawId};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// FixIt command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "fixit",
    version,
    about = "Manage authority routing for the FixIt PH issue reporter"
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when it is missing.
    #[arg(short, long, global = true, default_value = "./fixit.toml")]
    config: PathBuf,

    /// Override the configured log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./fixit.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,

    /// Inspect and edit the authority directory.
    Authorities {
        #[command(subcommand)]
        action: AuthoritiesAction,
    },

    /// Print the canonical form of a JSON identifier value.
    ResolveId {
        /// A JSON value, e.g. '{"_id": {"$oid": "65f0..."}}' or '"abc"'.
        json: String,
    },
}

#[derive(Subcommand, Debug)]
enum AuthoritiesAction {
    /// List effective authorities, for one category or all of them.
    List {
        /// Category key (case-insensitive). Unknown categories show the
        /// default list.
        category: Option<String>,
    },
    /// Set (or clear, with "") an authority's contact email.
    SetEmail {
        category: String,
        id: String,
        email: String,
    },
    /// Drop stored edits for one category, or for every category.
    Reset {
        category: Option<String>,
    },
    /// Show where a report category is routed.
    Route {
        /// Free-text report category, e.g. "Broken water pipe".
        report_category: String,
    },
}

type Store = AuthorityStore<Box<dyn KeyValueStore>>;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load_or_default(&cli.config) {
        Ok(config) => Some(config),
        Err(e) => {
            // Reported by the command that needs it; logging still starts.
            eprintln!("Warning: {e}");
            None
        }
    };

    let level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.log.level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .without_time()
        .init();

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: Option<AppConfig>) -> Result<()> {
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&cli.config),
        Commands::ResolveId { json } => cmd_resolve_id(&json),
        Commands::Authorities { action } => {
            let config = match config {
                Some(config) => config,
                None => AppConfig::load_or_default(&cli.config)
                    .context("failed to load configuration file")?,
            };
            let store = open_store(&config)?;

            match action {
                AuthoritiesAction::List { category } => cmd_list(&store, category.as_deref()),
                AuthoritiesAction::SetEmail {
                    category,
                    id,
                    email,
                } => cmd_set_email(&store, &category, &id, &email),
                AuthoritiesAction::Reset { category } => cmd_reset(&store, category.as_deref()),
                AuthoritiesAction::Route { report_category } => {
                    cmd_route(&store, &report_category)
                }
            }
        }
    }
}

fn open_store(config: &AppConfig) -> Result<Store> {
    debug!(data_dir = %config.storage.data_dir.display(), "opening authority store");
    AuthorityStore::open(config).context("failed to open the authority directory")
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_init(output: &Path) -> Result<()> {
    let default_config = r#"# FixIt configuration

[storage]
# "sqlite" keeps authority edits in <data_dir>/fixit.db; "memory" forgets them on exit.
backend = "sqlite"
# data_dir = "/var/lib/fixit"
overrides_key = "authorities_emails_v1"

[log]
level = "warn"
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("Default configuration written to {}", output.display());
    println!(
        "Validate with: fixit validate --config {}",
        output.display()
    );
    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => println!("  [OK] All values are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Storage backend: {:?}", config.storage.backend);
    println!("  Database       : {}", config.storage.database_path().display());
    println!("  Overrides key  : {}", config.storage.overrides_key);
    println!("  Log level      : {}", config.log.level);
    Ok(())
}

fn cmd_resolve_id(json: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("identifier is not valid JSON")?;
    match resolve(&RawId::from(value)) {
        Some(id) => println!("{id}"),
        None => println!("<absent>"),
    }
    Ok(())
}

fn cmd_list(store: &Store, category: Option<&str>) -> Result<()> {
    match category {
        Some(category) => {
            let list = store.get_for_category(category);
            print_authorities(category, &list);
        }
        None => {
            for (category, list) in store.all() {
                print_authorities(&category, &list);
                println!();
            }
        }
    }
    Ok(())
}

fn cmd_set_email(store: &Store, category: &str, id: &str, email: &str) -> Result<()> {
    let email = email.trim();
    store
        .check_email_edit(category, id, email)
        .context("cannot update authority email")?;

    store.update_email(category, id, email);

    let updated = store
        .find(category, id)
        .context("authority disappeared after update")?;
    if updated.email != email {
        anyhow::bail!("update was not applied");
    }
    if email.is_empty() {
        println!("Cleared email for {} ({})", updated.name, updated.id);
    } else {
        println!("Set email for {} ({}) to {}", updated.name, updated.id, email);
    }
    Ok(())
}

fn cmd_reset(store: &Store, category: Option<&str>) -> Result<()> {
    match category {
        Some(category) => {
            store.reset_category(category);
            println!("Restored built-in authorities for '{}'", category.to_lowercase());
        }
        None => {
            store.reset_all();
            println!("Restored built-in authorities for every category");
        }
    }
    Ok(())
}

fn cmd_route(store: &Store, report_category: &str) -> Result<()> {
    match authority_class_for(report_category) {
        Some(class) => println!("'{}' routes to {}", report_category, class),
        None => println!("'{}' matches no class; offering Default and Others", report_category),
    }
    println!();
    for key in directory_keys_for(report_category) {
        let list = store.get_for_category(&key);
        print_authorities(&key, &list);
    }
    Ok(())
}

fn print_authorities(category: &str, list: &[Authority]) {
    println!("{category}");

    if list.is_empty() {
        println!("  (no authorities)");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Name", "Department", "Email"]);
    for a in list {
        let email = if a.has_email() { a.email.as_str() } else { "-" };
        table.add_row(vec![a.id.as_str(), a.name.as_str(), a.department.as_str(), email]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixit_core::config::StorageBackend;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config
    }

    #[test]
    fn test_cli_parses_set_email() {
        let cli = Cli::try_parse_from([
            "fixit",
            "authorities",
            "set-email",
            "utilities",
            "util-oedc",
            "ops@oedc.ph",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Authorities {
                action: AuthoritiesAction::SetEmail { .. }
            }
        ));
    }

    #[test]
    fn test_set_email_then_list() {
        let store = open_store(&memory_config()).unwrap();
        cmd_set_email(&store, "Utilities", "util-oedc", " ops@oedc.ph ").unwrap();
        assert_eq!(store.find("utilities", "util-oedc").unwrap().email, "ops@oedc.ph");
        cmd_list(&store, Some("utilities")).unwrap();
    }

    #[test]
    fn test_set_email_rejects_unknown_authority() {
        let store = open_store(&memory_config()).unwrap();
        assert!(cmd_set_email(&store, "utilities", "util-nope", "a@b.ph").is_err());
        assert!(cmd_set_email(&store, "utilities", "util-oedc", "not-an-email").is_err());
    }

    #[test]
    fn test_open_store_rejects_invalid_config() {
        let mut config = memory_config();
        config.log.level = "loud".into();
        let err = open_store(&config).err().unwrap();
        assert!(format!("{err:#}").contains("log.level"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixit.toml");
        cmd_init(&path).unwrap();
        AppConfig::load_and_validate(&path).unwrap();
        assert!(cmd_init(&path).is_err());
    }

    #[test]
    fn test_resolve_id_rejects_bad_json() {
        assert!(cmd_resolve_id("{oops").is_err());
        cmd_resolve_id(r#"{"_id": {"$oid": "abc"}}"#).unwrap();
    }
}
