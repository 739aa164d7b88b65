use clap::Parser;
use restic_mon::backups::{classify, discovery, metrics};
use restic_mon::configuration::get_configuration;
use restic_mon::startup::run;
use restic_mon::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[derive(Parser, Debug)]
#[command(
    name = "restic-mon",
    version,
    about = "Monitor the freshness of restic backups in S3 buckets"
)]
struct Cli {
    /// Run a check and exit
    #[arg(long)]
    check: bool,
    /// Print as metrics and exit
    #[arg(long)]
    metrics: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let settings = match get_configuration() {
        Ok(settings) => settings,
        Err(config::ConfigError::NotFound(name)) => {
            eprintln!("Please set {}", name);
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    // One-shot modes bypass both the cache and the HTTP server, and keep
    // stdout clean of log output.
    if cli.check {
        let backups = discovery::find_backups(&settings).await;
        let report = classify::classify(
            &backups,
            settings.monitor.warn_age_hours,
            settings.monitor.crit_age_hours,
        );
        println!("{}", report.message);
        return Ok(());
    }

    if cli.metrics {
        let backups = discovery::find_backups(&settings).await;
        println!("{}", metrics::render(&backups));
        return Ok(());
    }

    let subscriber = get_subscriber("restic-mon".into(), "info".into());
    init_subscriber(subscriber);

    tracing::info!("Starting webserver on port 8080");
    let listener = TcpListener::bind(("0.0.0.0", 8080))?;
    run(listener, settings)?.await
}
