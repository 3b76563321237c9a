// MyRent - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. Opening the SQLite store
// 4. Dispatching to the import, export, dashboard and catalogue operations

use clap::{Parser, Subcommand};
use myrent::app::catalogue::{self, ManualDraft};
use myrent::app::dashboard::AnalyticsAggregator;
use myrent::app::import::ImportPipeline;
use myrent::core::analytics::{DashboardStats, InsightKind};
use myrent::core::export;
use myrent::core::model::{PropertyRecord, Status};
use myrent::platform::config::{self, AppConfig, PlatformPaths};
use myrent::platform::sqlite::SqliteStore;
use myrent::util::constants;
use myrent::util::error::{ExportError, MyRentError, Result};
use myrent::util::logging;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// MyRent - Personal rental-listing catalogue.
///
/// Import listings from spreadsheet exports or JSON backups, keep them in a
/// local database, and review portfolio statistics.
#[derive(Parser, Debug)]
#[command(name = "myrent", version, about)]
struct Cli {
    /// SQLite database file (overrides config and the platform default).
    #[arg(long = "db", global = true)]
    db: Option<PathBuf>,

    /// Directory containing config.toml.
    #[arg(long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a spreadsheet (xlsx, xls, ods, csv) or a JSON backup.
    Import {
        file: PathBuf,
    },

    /// Write a JSON backup of every property.
    Export {
        /// Output directory (defaults to the current directory).
        #[arg(long = "out")]
        out: Option<PathBuf>,
    },

    /// Write a blank import template holding only the header row.
    Template {
        /// Output file (defaults to modelo_imoveis.xlsx / .csv).
        #[arg(long = "out")]
        out: Option<PathBuf>,

        /// Write CSV instead of a workbook.
        #[arg(long = "csv")]
        csv: bool,
    },

    /// Show portfolio statistics.
    Stats {
        /// Print the full statistics as JSON.
        #[arg(long = "json")]
        json: bool,
    },

    /// List properties, optionally filtered by status.
    List {
        #[arg(long = "status")]
        status: Option<Status>,
    },

    /// Add a property by hand.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "")]
        region: String,
        #[arg(long, default_value_t = 0.0)]
        area: f64,
        #[arg(long, default_value_t = 0.0)]
        rent: f64,
        #[arg(long, default_value_t = 0.0)]
        condo: f64,
        #[arg(long, default_value_t = 0.0)]
        iptu: f64,
        #[arg(long)]
        status: Option<Status>,
        /// Repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long = "url", default_value = "")]
        url: String,
    },

    /// Delete a property by id.
    Delete {
        id: i64,
    },
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());
    let (app_config, config_warnings) = config::load_config(&config_dir);

    logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {warning}");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "MyRent starting"
    );

    if let Err(e) = run(cli, &platform_paths, &app_config) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, paths: &PlatformPaths, app_config: &AppConfig) -> Result<()> {
    // Database path: CLI override > config > platform default
    let db_path = cli
        .db
        .clone()
        .or_else(|| app_config.database_path.clone())
        .unwrap_or_else(|| paths.default_database_path());

    match cli.command {
        Command::Import { file } => {
            let mut store = open_store(&db_path)?;
            let summary = ImportPipeline::new(&mut store)
                .import_file(&file, app_config.max_import_file_size)?;
            println!("{summary}");
        }
        Command::Export { out } => {
            let store = open_store(&db_path)?;
            let records = catalogue::list_properties(&store, None)?;
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let path = dir.join(export::backup_file_name(chrono::Local::now().date_naive()));
            let mut writer = BufWriter::new(create_file(&path)?);
            let count = export::export_backup(&records, &mut writer)?;
            writer.flush().map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), count, "Backup written");
            println!("{count} imóveis exportados para {}", path.display());
        }
        Command::Template { out, csv } => write_template(out, csv)?,
        Command::Stats { json } => {
            let store = open_store(&db_path)?;
            let stats = AnalyticsAggregator::new(&store)
                .with_config(app_config.analytics)
                .compute()?;
            if json {
                let text = serde_json::to_string_pretty(&stats)
                    .map_err(|source| ExportError::Json { source })?;
                println!("{text}");
            } else {
                print_stats(&stats);
            }
        }
        Command::List { status } => {
            let store = open_store(&db_path)?;
            print_records(&catalogue::list_properties(&store, status)?);
        }
        Command::Add {
            title,
            address,
            region,
            area,
            rent,
            condo,
            iptu,
            status,
            tags,
            notes,
            url,
        } => {
            let mut store = open_store(&db_path)?;
            let draft = ManualDraft {
                title,
                address,
                region,
                area,
                rent_value: rent,
                condo_fee: condo,
                iptu,
                status: status.unwrap_or_default(),
                tags,
                notes,
                listing_url: url,
            };
            let record = catalogue::add_property(&mut store, draft)?;
            println!(
                "Imóvel #{} adicionado (custo total R$ {:.2})",
                record.id.unwrap_or_default(),
                record.total_cost
            );
        }
        Command::Delete { id } => {
            let mut store = open_store(&db_path)?;
            catalogue::delete_property(&mut store, id)?;
            println!("Imóvel #{id} removido");
        }
    }
    Ok(())
}

fn open_store(db_path: &Path) -> Result<SqliteStore> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| MyRentError::Io {
            path: parent.to_path_buf(),
            operation: "create data directory",
            source,
        })?;
    }
    Ok(SqliteStore::open(db_path)?)
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| {
        MyRentError::from(ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    })
}

fn write_template(out: Option<PathBuf>, csv: bool) -> Result<()> {
    let default_name = PathBuf::from(constants::TEMPLATE_FILE_NAME);
    let path = match (out, csv) {
        (Some(path), _) => path,
        (None, true) => default_name.with_extension("csv"),
        (None, false) => default_name,
    };

    if csv {
        let file = create_file(&path)?;
        export::write_template_csv(BufWriter::new(file), &path)?;
    } else {
        let bytes = export::template_xlsx_bytes()?;
        std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
    }

    tracing::info!(path = %path.display(), csv, "Template written");
    println!("Modelo salvo em {}", path.display());
    Ok(())
}

fn print_stats(stats: &DashboardStats) {
    println!("Imóveis:          {}", stats.total);
    println!("Visitados:        {}", stats.visited_count);
    println!("Custo médio:      R$ {:.2}", stats.avg_cost);
    println!(
        "Totais:           aluguel R$ {:.2} | condomínio R$ {:.2} | IPTU R$ {:.2}",
        stats.totals.rent, stats.totals.condo, stats.totals.iptu
    );

    if !stats.status_counts.is_empty() {
        println!("\nPor status:");
        for entry in &stats.status_counts {
            println!("  {:<14} {}", entry.status.label(), entry.count);
        }
    }

    if !stats.region_counts.is_empty() {
        println!("\nPor região:");
        for entry in &stats.region_counts {
            println!("  {:<24} {}", entry.region, entry.count);
        }
    }

    if !stats.cost_by_region.is_empty() {
        println!("\nCusto médio por região:");
        for entry in &stats.cost_by_region {
            println!(
                "  {:<24} aluguel {:>10.2}  condomínio {:>9.2}  IPTU {:>8.2}",
                entry.label, entry.rent, entry.condo, entry.iptu
            );
        }
    }

    for insight in &stats.insights {
        let marker = match insight.kind {
            InsightKind::Warning => "!",
            InsightKind::Info => "i",
        };
        println!("\n[{marker}] {}", insight.text);
    }
}

fn print_records(records: &[PropertyRecord]) {
    if records.is_empty() {
        println!("Nenhum imóvel encontrado.");
        return;
    }
    for record in records {
        println!(
            "#{:<5} {:<12} R$ {:>10.2}  {}  ({})",
            record.id.unwrap_or_default(),
            record.status.label(),
            record.total_cost,
            record.title,
            record.address
        );
    }
}
