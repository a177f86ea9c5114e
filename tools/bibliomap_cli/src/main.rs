use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bibliomap::bootstrap;
use bibliomap::json_db::storage::{file_storage, JsonDbConfig, ENV_DATA_ROOT};
use bibliomap::utils::logger;

#[derive(Parser, Debug)]
#[command(name = "bibliomap", about = "Administration de la base Bibliomap")]
struct Cli {
    /// Racine des données. Par défaut : variable PATH_BIBLIOMAP_DATA.
    #[arg(long)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Opérations de base de données
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Charge les jeux de données : <dossier> contenant les
    /// fichiers bibliomap.<collection>.json
    Populate { json_dir: PathBuf },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Initialise la base : collections, validateurs, index
    Init,

    /// Supprime la base (soft par défaut) [--hard]
    Drop {
        #[arg(long)]
        hard: bool,
    },
}

fn build_cfg(data_root_opt: Option<PathBuf>) -> Result<JsonDbConfig> {
    match data_root_opt {
        Some(p) => Ok(JsonDbConfig::new(p)),
        None => JsonDbConfig::from_env().with_context(|| {
            format!(
                "{} non défini (ex: export {}=/var/lib/bibliomap) et --data-root absent",
                ENV_DATA_ROOT, ENV_DATA_ROOT
            )
        }),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = build_cfg(cli.data_root)?;
    logger::init_logging(&cfg.data_root);

    match cli.cmd {
        Cmd::Db { action } => match action {
            DbAction::Init => {
                bootstrap::apply_catalog(&cfg)?;
            }
            DbAction::Drop { hard } => {
                let mode = if hard {
                    file_storage::DropMode::Hard
                } else {
                    file_storage::DropMode::Soft
                };
                file_storage::drop_db(&cfg, bootstrap::DB_NAME, mode)?;
                println!(
                    "✅ Base supprimée ({}) : {}",
                    if hard { "hard" } else { "soft" },
                    bootstrap::DB_NAME
                );
            }
        },

        Cmd::Populate { json_dir } => {
            // La base doit exister : un populate sur une base absente est
            // une erreur d'usage, pas une création implicite
            file_storage::open_db(&cfg, bootstrap::DB_NAME)
                .context("base inexistante : lancez d'abord `bibliomap-cli db init`")?;

            let reports = bootstrap::load_fixtures(&cfg, &json_dir)?;

            let failed = reports
                .iter()
                .filter(|r| matches!(r.outcome, bootstrap::LoadOutcome::Failed(_)))
                .count();
            if failed > 0 {
                anyhow::bail!("{} collection(s) en échec", failed);
            }
        }
    }

    Ok(())
}
