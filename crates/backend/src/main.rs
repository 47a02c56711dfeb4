#![allow(clippy::unnecessary_map_or)]

pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use crate::shared::config::{self, Config};
use crate::shared::data::{dataset, policy};

#[derive(Parser)]
#[command(name = "bestmuscat")]
#[command(about = "Best Muscat directory: preview server and site build commands")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview API + static site
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the detail view of one business as JSON
    Detail { slug: String },
    /// Write sitemap.xml into the site root
    Sitemap,
    /// Write redirect stubs for pretty URLs
    Stubs,
    /// Report category-required fields that are missing
    Qa,
    /// Rewrite legacy about/hours shapes in the dataset file
    Normalize,
    /// Upsert rows of the places CSV into the dataset file
    Import {
        #[arg(long)]
        src: Option<String>,
    },
    /// Build best-things JSON from the spotlight CSV
    BestThings {
        #[arg(long)]
        src: Option<String>,
        #[arg(long)]
        out: Option<String>,
        #[arg(long)]
        cap_per_cat: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    system::tracing::initialize()?;

    let cli = Cli::parse();
    let config = config::load_config()?;
    policy::initialize_policy(&config)?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(&config, port).await?,
        Commands::Detail { slug } => {
            let data = dataset::load_dataset(&config).await?;
            match handlers::a001_business::detail_view(&data, policy::get_policy(), &slug) {
                Some(view) => println!("{}", serde_json::to_string_pretty(&view)?),
                None => {
                    tracing::error!("No business with slug '{}'", slug);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Sitemap => {
            let data = dataset::load_dataset(&config).await?;
            let executor = usecases::u501_generate_sitemap::SitemapExecutor::new(
                config.site_root(),
                config.base_url(),
            );
            executor.run(&data, policy::get_policy(), today())?;
        }
        Commands::Stubs => {
            let data = dataset::load_dataset(&config).await?;
            usecases::u502_generate_route_stubs::RouteStubExecutor::new(config.site_root())
                .run(&data, policy::get_policy())?;
        }
        Commands::Qa => {
            let data = dataset::load_dataset(&config).await?;
            let report = usecases::u503_missing_fields_report::MissingFieldsExecutor::new(
                policy::get_policy(),
            )
            .run(&data);
            println!("{}", usecases::u503_missing_fields_report::format_report(&report));
            if !report.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Normalize => {
            let changed =
                usecases::u504_normalize_dataset::NormalizeExecutor::new(config.dataset_path())
                    .run()?;
            println!("Normalized fields: {}", changed);
        }
        Commands::Import { src } => {
            let source = config::resolve_path(src.as_deref().unwrap_or(&config.data.places_csv));
            let summary = usecases::u506_import_places_csv::ImportPlacesExecutor::new(
                source,
                config.dataset_path(),
                config.site_root(),
            )
            .run()?;
            println!(
                "Imported places: {} new, {} updated, {} skipped",
                summary.created, summary.updated, summary.skipped
            );
        }
        Commands::BestThings {
            src,
            out,
            cap_per_cat,
        } => {
            let source = config::resolve_path(src.as_deref().unwrap_or(&config.data.best_things_csv));
            let output = config::resolve_path(out.as_deref().unwrap_or(&config.data.best_things_out));
            let cap = cap_per_cat.unwrap_or(config.data.cap_per_category);
            let count = usecases::u505_build_best_things::BestThingsExecutor::new(source, output, cap)
                .run(today())?;
            println!("Best things written: {}", count);
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn serve(config: &Config, port: Option<u16>) -> anyhow::Result<()> {
    dataset::initialize_dataset(config).await?;

    let app = routes::build_app(&config.site_root());

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
