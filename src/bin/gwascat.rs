use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gwascat::app::App;
use gwascat::domain::StudyAccession;
use gwascat::error::GwascatError;
use gwascat::fetch::FtpSumstatSource;
use gwascat::index::StudyIndex;
use gwascat::metadata::{CatalogApi, CatalogHttpClient, DEFAULT_API_ENDPOINT, parse_study_metadata};
use gwascat::store::CacheStore;

const DEFAULT_STUDY_INDEX: &str = "gwas-catalog-v1.0.3.1-studies-r2024-11-20.tsv";
const DEFAULT_CACHE_DIR: &str = "/tmp/catalog/sumstat";

#[derive(Parser)]
#[command(name = "gwascat")]
#[command(about = "Fetch and preprocess GWAS Catalog summary statistics")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch a study's summary statistics and print the table")]
    Fetch(FetchArgs),
    #[command(about = "Render a Manhattan plot for a study")]
    Manhattan(ManhattanArgs),
    #[command(about = "Fetch study metadata from the GWAS Catalog REST API")]
    Metadata(MetadataArgs),
}

#[derive(Args)]
struct FetchArgs {
    study: String,

    #[arg(long, default_value = DEFAULT_STUDY_INDEX)]
    index: String,

    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: Utf8PathBuf,
}

#[derive(Args)]
struct ManhattanArgs {
    study: String,

    #[arg(long, default_value = DEFAULT_STUDY_INDEX)]
    index: String,

    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: Utf8PathBuf,

    #[arg(long, default_value = "manhattan.html")]
    out: Utf8PathBuf,
}

#[derive(Args)]
struct MetadataArgs {
    study: String,

    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    endpoint: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(gwascat) = report.downcast_ref::<GwascatError>() {
            return ExitCode::from(map_exit_code(gwascat));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &GwascatError) -> u8 {
    match error {
        GwascatError::InvalidStudyAccession(_)
        | GwascatError::StudyNotFound(_)
        | GwascatError::AmbiguousStudy { .. } => 2,
        GwascatError::Ftp(_)
        | GwascatError::CatalogHttp(_)
        | GwascatError::CatalogStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => run_fetch(args),
        Commands::Manhattan(args) => run_manhattan(args),
        Commands::Metadata(args) => run_metadata(args),
    }
}

fn run_fetch(args: FetchArgs) -> miette::Result<()> {
    let study: StudyAccession = args.study.parse().into_diagnostic()?;
    let index = StudyIndex::from_catalog_studies(&args.index).into_diagnostic()?;
    let app = App::new(CacheStore::new(args.cache_dir), FtpSumstatSource::new());
    let sumstat = app.fetch_sumstat(&index, &study).into_diagnostic()?;
    println!("{}", sumstat.df());
    Ok(())
}

fn run_manhattan(args: ManhattanArgs) -> miette::Result<()> {
    let study: StudyAccession = args.study.parse().into_diagnostic()?;
    let index = StudyIndex::from_catalog_studies(&args.index).into_diagnostic()?;
    let app = App::new(CacheStore::new(args.cache_dir), FtpSumstatSource::new());
    let sumstat = app.fetch_sumstat(&index, &study).into_diagnostic()?;
    sumstat.manhattan(&args.out).into_diagnostic()?;
    println!("wrote {}", args.out);
    Ok(())
}

fn run_metadata(args: MetadataArgs) -> miette::Result<()> {
    let study: StudyAccession = args.study.parse().into_diagnostic()?;
    let client = CatalogHttpClient::new(&args.endpoint).into_diagnostic()?;
    let metadata = client.fetch_study(&study).into_diagnostic()?;
    let table = parse_study_metadata(&metadata).into_diagnostic()?;
    println!("{table}");
    Ok(())
}
