#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use planning_chauffeurs::{
    io,
    model::{AssignmentChanges, AssignmentId, DriverId, Location, NewAssignment, StatusKind},
    scheduler::{SchedError, SchedulerOptions},
    store::AssignmentStore,
    storage::JsonStorage,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des statuts chauffeurs
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du planning
    #[arg(long, global = true, env = "PLANNING_FILE", default_value = "planning.json")]
    planning: String,

    /// Ne pas revérifier les chevauchements lors d'une modification
    #[arg(long, global = true)]
    keep_update_gap: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer le registre des chauffeurs depuis un CSV `id,name`
    ImportDrivers {
        #[arg(long)]
        csv: String,
    },

    /// Affecter un statut à un chauffeur
    Create {
        #[arg(long)]
        driver: String,
        /// LEAVE | ON_CALL | WEEKEND_SERVICE | WEEKDAY_SERVICE
        #[arg(long)]
        status: StatusKind,
        /// SITE_A | SITE_B | BOTH
        #[arg(long, default_value = "SITE_A")]
        location: Location,
        /// RFC3339, ou date/heure naïve en UTC
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Modifier une affectation existante (tous les champs sont remplacés)
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        status: StatusKind,
        /// SITE_A | SITE_B | BOTH ; remplace le lieu existant, SITE_A si omis
        #[arg(long, default_value = "SITE_A")]
        location: Location,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Supprimer une affectation
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Statuts en cours pour un chauffeur
    Current {
        #[arg(long)]
        driver: String,
        /// Instant de référence (défaut : maintenant)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Tester une affectation sans l'enregistrer
    Check {
        #[arg(long)]
        driver: String,
        #[arg(long)]
        status: StatusKind,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Affectation à ignorer (cas d'une modification)
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Planning en cours et à venir de tous les chauffeurs
    Planning {
        #[arg(long)]
        as_of: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn as_of_or_now(raw: Option<String>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => io::parse_instant(&raw),
        None => Ok(Utc::now()),
    }
}

/// Code 2 = conflit (liste affichée), erreur ordinaire sinon.
fn report(err: SchedError) -> Result<i32> {
    match err {
        SchedError::Conflict(list) => {
            eprintln!("Conflict with {} assignment(s):", list.len());
            for c in &list {
                eprintln!("  {c}");
            }
            Ok(2)
        }
        other => Err(other.into()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let options = SchedulerOptions {
        revalidate_on_update: !cli.keep_update_gap,
    };
    let store = AssignmentStore::open(JsonStorage::open(&cli.planning)?, options)?;

    let code = match cli.cmd {
        Commands::ImportDrivers { csv } => {
            let drivers = io::import_drivers_csv(csv)?;
            let n = drivers.len();
            store.register_drivers(drivers)?;
            println!("{n} driver(s) imported");
            0
        }
        Commands::Create {
            driver,
            status,
            location,
            start,
            end,
        } => {
            let candidate = NewAssignment {
                driver_id: DriverId::new(driver),
                status,
                location,
                start: io::parse_instant(&start)?,
                end: io::parse_instant(&end)?,
            };
            match store.create(candidate, Utc::now()) {
                Ok(a) => {
                    println!("{}", a.id);
                    0
                }
                Err(err) => report(err)?,
            }
        }
        Commands::Update {
            id,
            status,
            location,
            start,
            end,
        } => {
            let changes = AssignmentChanges {
                status,
                location,
                start: io::parse_instant(&start)?,
                end: io::parse_instant(&end)?,
            };
            match store.update(&AssignmentId::new(id), changes) {
                Ok(a) => {
                    println!("{} updated", a.id);
                    0
                }
                Err(err) => report(err)?,
            }
        }
        Commands::Delete { id } => {
            let removed = store.delete(&AssignmentId::new(id))?;
            println!("{} deleted", removed.id);
            0
        }
        Commands::Current { driver, as_of } => {
            let as_of = as_of_or_now(as_of)?;
            let driver = DriverId::new(driver);
            for a in store.current_statuses(&driver, as_of)? {
                println!(
                    "{} | {} | {} | {} → {}",
                    a.id,
                    a.status,
                    a.location,
                    a.start.to_rfc3339(),
                    a.end.to_rfc3339()
                );
            }
            println!("displayed: {}", store.displayed_status(&driver, as_of)?);
            0
        }
        Commands::Check {
            driver,
            status,
            start,
            end,
            exclude,
        } => {
            let exclude = exclude.map(AssignmentId::new);
            let conflicts = store.check_conflict(
                &DriverId::new(driver),
                io::parse_instant(&start)?,
                io::parse_instant(&end)?,
                status,
                exclude.as_ref(),
            )?;
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                report(SchedError::Conflict(conflicts))?
            }
        }
        Commands::Planning {
            as_of,
            out_json,
            out_csv,
        } => {
            let as_of = as_of_or_now(as_of)?;
            let snapshot = store.snapshot()?;
            let report = snapshot.planning_for_all_drivers(as_of);
            let drivers = &snapshot.planning().drivers;
            if let Some(path) = out_json {
                io::export_planning_json(path, drivers, &report)?;
            }
            if let Some(path) = out_csv {
                io::export_planning_csv(path, drivers, &report)?;
            }
            // impression compacte
            for (driver_id, rows) in &report {
                for row in rows {
                    let a = &row.assignment;
                    println!(
                        "{} | {} | {} | {} → {} | {}d",
                        driver_id,
                        a.status,
                        a.location,
                        a.start.to_rfc3339(),
                        a.end.to_rfc3339(),
                        row.duration_days
                    );
                }
            }
            0
        }
    };

    std::process::exit(code);
}
