/// Coinbox CLI - prepare audio samples and manage the device over HTTP
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use coinbox_client::{DeviceClient, DiscoveryPoller, DEFAULT_DEVICE_ADDR, SLOT_COUNT};
use coinbox_core::PipelineConfig;
use coinbox_pipeline::{generate_header, Pipeline};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "coinbox")]
#[command(about = "Coinbox sample toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an audio file into a device-ready WAV
    Convert {
        /// Input audio file (mp3, flac, ogg, wav, aac, m4a)
        input: PathBuf,
        /// Output WAV path (defaults to the input with a .wav extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a C header embedding a device-ready WAV's sample data
    Header {
        /// Input WAV (8-bit unsigned PCM, as produced by `convert`)
        input: PathBuf,
        /// Output header path (defaults to the input with a .h extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// C array name
        #[arg(short, long, default_value = "sample")]
        name: String,
    },
    /// Poll the network until the device answers
    Discover {
        /// Device address
        #[arg(short, long, default_value = DEFAULT_DEVICE_ADDR)]
        device: String,
        /// Probe interval in milliseconds
        #[arg(short, long, default_value_t = 500)]
        interval_ms: u64,
        /// Give up after this many seconds
        #[arg(short, long, default_value_t = 60)]
        timeout_secs: u64,
    },
    /// Convert an audio file and upload it to a device slot
    ///
    /// The device plays slot 1 with 70 % probability, slot 2 with 20 %
    /// and slot 3 with 10 %.
    Upload {
        /// Input audio file
        input: PathBuf,
        /// Target slot (1-3)
        #[arg(short, long)]
        slot: u8,
        /// Device address
        #[arg(short, long, default_value = DEFAULT_DEVICE_ADDR)]
        device: String,
    },
    /// Erase all custom samples and restore the factory defaults
    Reset {
        /// Device address
        #[arg(short, long, default_value = DEFAULT_DEVICE_ADDR)]
        device: String,
    },
    /// Restart the device (leaves configuration mode)
    Restart {
        /// Device address
        #[arg(short, long, default_value = DEFAULT_DEVICE_ADDR)]
        device: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinbox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { input, output } => convert(&input, output),
        Commands::Header {
            input,
            output,
            name,
        } => header(&input, output, &name),
        Commands::Discover {
            device,
            interval_ms,
            timeout_secs,
        } => discover(&device, interval_ms, timeout_secs).await,
        Commands::Upload {
            input,
            slot,
            device,
        } => upload(&input, slot, &device).await,
        Commands::Reset { device } => reset(&device).await,
        Commands::Restart { device } => restart(&device).await,
    }
}

fn convert(input: &std::path::Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension("wav"));
    if output == *input {
        bail!("output path equals the input path; pass --output");
    }

    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let prepared = pipeline
        .convert_file(input)
        .with_context(|| format!("converting {}", input.display()))?;

    std::fs::write(&output, &prepared.wav)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{} -> {} ({:.0} ms, {} bytes)",
        input.display(),
        output.display(),
        prepared.duration_ms(),
        prepared.wav.len()
    );
    Ok(())
}

fn header(input: &std::path::Path, output: Option<PathBuf>, name: &str) -> anyhow::Result<()> {
    let wav = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let header = generate_header(&wav, name)
        .with_context(|| format!("generating header from {}", input.display()))?;

    let output = output.unwrap_or_else(|| input.with_extension("h"));
    std::fs::write(&output, header).with_context(|| format!("writing {}", output.display()))?;

    println!("{} -> {}", input.display(), output.display());
    Ok(())
}

async fn discover(device: &str, interval_ms: u64, timeout_secs: u64) -> anyhow::Result<()> {
    let client = DeviceClient::new(device)?;
    let mut poller = DiscoveryPoller::spawn(client, Duration::from_millis(interval_ms));

    println!("Looking for the device at {device} ...");
    match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        poller.wait_until_found(),
    )
    .await
    {
        Ok(()) => {
            println!("Device found");
            Ok(())
        }
        Err(_) => bail!("device did not answer within {timeout_secs} s"),
    }
}

async fn upload(input: &std::path::Path, slot: u8, device: &str) -> anyhow::Result<()> {
    if !(1..=SLOT_COUNT as u8).contains(&slot) {
        bail!("slot must be between 1 and {SLOT_COUNT}");
    }

    let mut pipeline = Pipeline::new(PipelineConfig::default());
    let prepared = pipeline
        .convert_file(input)
        .with_context(|| format!("converting {}", input.display()))?;
    println!(
        "Prepared {} ({:.0} ms, {} bytes)",
        input.display(),
        prepared.duration_ms(),
        prepared.wav.len()
    );

    let client = DeviceClient::new(device)?;
    if !client.ping().await {
        bail!("device at {device} is not reachable");
    }

    let session = client.enter_config().await?;
    let result = session.upload_sample(slot - 1, prepared.wav).await;
    let end = session.finish().await;

    result.with_context(|| format!("uploading to slot {slot}"))?;
    if !end.exited() {
        bail!("upload succeeded but the device did not confirm the restart; power-cycle it");
    }

    println!("Uploaded to slot {slot}");
    Ok(())
}

async fn reset(device: &str) -> anyhow::Result<()> {
    let client = DeviceClient::new(device)?;
    if !client.ping().await {
        bail!("device at {device} is not reachable");
    }

    let session = client.enter_config().await?;
    let result = session.factory_reset().await;
    let end = session.finish().await;

    result.context("factory reset")?;
    if !end.exited() {
        bail!("reset succeeded but the device did not confirm the restart; power-cycle it");
    }

    println!("Factory defaults restored");
    Ok(())
}

async fn restart(device: &str) -> anyhow::Result<()> {
    let client = DeviceClient::new(device)?;
    let session = client.enter_config().await?;
    match session.finish().await {
        end if end.exited() => {
            println!("Device restarted");
            Ok(())
        }
        _ => bail!("device did not confirm the restart"),
    }
}
