use anyhow::{Context, Result};
use std::sync::Arc;
use vanguard_app::config::USAGE;
use vanguard_app::{CliArgs, Config, KeyOutcome, Session, SessionOptions};
use vanguard_interfaces::{KeyReader, Surface, TerminalSurface};
use vanguard_memory::{FileStore, KeyValueStore, NullStore};

fn init_logging(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;
    let log_file = std::fs::File::create(config.log_path()).context("Failed to open log file")?;

    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_env("VANGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1)).context("Failed to parse arguments")?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::resolve(&args).context("Failed to load configuration")?;
    init_logging(&config)?;
    tracing::info!("Starting with data dir {:?}", config.data_dir);

    let store: Arc<dyn KeyValueStore> = if args.ephemeral {
        Arc::new(NullStore)
    } else {
        Arc::new(FileStore::new(config.store_dir()))
    };
    let backend = config.build_backend();
    tracing::info!("Scan backend: {}", backend.name());
    let surface: Arc<dyn Surface> = Arc::new(TerminalSurface::new());

    let (reader, mut keys) = KeyReader::spawn().context("Failed to enter raw terminal mode")?;

    let mut session = Session::new(
        Arc::clone(&surface),
        store,
        backend,
        SessionOptions::from(&config),
    );
    session.restore().await;

    while let Some(key) = keys.recv().await {
        if session.handle_key(key).await == KeyOutcome::Exit {
            break;
        }
    }

    session.shutdown().await;
    drop(reader);
    surface.writeln("\nGoodbye.");
    Ok(())
}
