use clap::Parser;
use kafka_committer::{batch, Committer, Config, Error, KafkaCommitter, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "kafka-committer")]
#[command(about = "Commits document add/delete operations to a Kafka topic", long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[arg(value_name = "BATCH", help = "Operations file (NDJSON); stdin when omitted")]
    input: Option<PathBuf>,

    #[arg(short, long, help = "Enable JSON output for logs")]
    json_logs: bool,

    #[arg(short, long, help = "Verbose logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, args.verbose);

    info!("Starting kafka-committer");
    info!("Loading configuration from {:?}", args.config);

    let config = match Config::from_file(&args.config) {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(Error::Config(e));
        }
    };

    info!(
        kafka_brokers = ?config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        source_reference_field = ?config.committer.source_reference_field,
        json_fields_pattern = ?config.committer.json_fields_pattern,
        "Configuration summary"
    );

    let mut operations = match &args.input {
        Some(path) => {
            info!("Reading batch from {:?}", path);
            batch::read_batch(BufReader::new(File::open(path)?))?
        }
        None => {
            info!("Reading batch from stdin");
            batch::read_batch(io::stdin().lock())?
        }
    };
    batch::map_source_content(&mut operations, &config.committer);

    let committer = KafkaCommitter::new(config)?;

    info!(operations = operations.len(), "Committing batch");
    committer.commit(&operations).await?;

    // Dispatch is fire-and-forget, so drain the client buffer before exit.
    committer.flush(Duration::from_secs(30))?;
    info!("Batch committed");

    Ok(())
}

fn init_logging(json: bool, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("kafka_committer=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("kafka_committer=info,warn"))
    };

    let fmt_layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
