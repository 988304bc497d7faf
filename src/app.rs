use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};

use crate::codec::{FileCodec, ParallelFileCodec, StringCodec};
use crate::config::DEFAULT_THREADS;
use crate::file::{output_path, validate_input};
use crate::secret::Secret;
use crate::types::{Metrics, Processing};
use crate::ui::progress::Bar;

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file.
    Encrypt {
        #[arg(short, long)]
        input: PathBuf,

        /// Defaults to the input path with `.chx` appended.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Prompted for when omitted.
        #[arg(short, long)]
        password: Option<String>,

        /// Worker threads; decryption must use the same count.
        #[arg(short, long)]
        threads: Option<Option<usize>>,
    },

    /// Decrypt a file.
    Decrypt {
        #[arg(short, long)]
        input: PathBuf,

        /// Defaults to the input path with `.chx` removed.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long)]
        threads: Option<Option<usize>>,
    },

    /// Encrypt a string into a checksummed hex frame.
    Seal {
        text: String,

        #[arg(short, long)]
        password: Option<String>,
    },

    /// Decrypt a hex frame produced by `seal`.
    Open {
        frame: String,

        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Parser)]
#[command(name = "chaoscrypt", version, about = "Encrypt strings and files with a chaotic-map block diffusion cipher.")]
pub struct App {
    /// Log codec internals.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl App {
    pub fn init() -> Result<Self> {
        let app = Self::parse();
        let level = if app.verbose { Level::DEBUG } else { Level::INFO };

        let subscriber = tracing_subscriber::fmt().with_file(true).with_line_number(true).with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(app)
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Encrypt { input, output, password, threads } => Self::run_file(input, output, password, threads.map(|t| t.unwrap_or(DEFAULT_THREADS)), Processing::Encryption).await,
            Commands::Decrypt { input, output, password, threads } => Self::run_file(input, output, password, threads.map(|t| t.unwrap_or(DEFAULT_THREADS)), Processing::Decryption).await,
            Commands::Seal { text, password } => {
                let secret = Self::get_secret(password, Processing::Encryption)?;
                let frame = StringCodec::new(&secret).encrypt(text.as_bytes())?;
                crate::ui::display::show_text("Sealed", &frame);
                Ok(())
            }
            Commands::Open { frame, password } => {
                let secret = Self::get_secret(password, Processing::Decryption)?;
                let text = StringCodec::new(&secret).decrypt_text(frame.trim())?;
                crate::ui::display::show_text("Opened", &text);
                Ok(())
            }
        }
    }

    async fn run_file(input: PathBuf, output: Option<PathBuf>, password: Option<String>, threads: Option<usize>, processing: Processing) -> Result<()> {
        let size = validate_input(&input).await?;
        let output = output.unwrap_or_else(|| output_path(&input, processing.mode()));
        let secret = Self::get_secret(password, processing)?;

        let started = Instant::now();
        let bytes = Self::process(processing, input.clone(), output.clone(), secret, threads, size).await?;
        let metrics = Metrics::new(bytes, started.elapsed());

        info!(input = %input.display(), output = %output.display(), bytes, millis = metrics.millis, "{processing} done");

        crate::ui::display::show_success(processing.mode(), &output);
        crate::ui::display::show_metrics(processing.mode(), &output, &metrics, threads);

        Ok(())
    }

    async fn process(processing: Processing, input: PathBuf, output: PathBuf, secret: Secret, threads: Option<usize>, size: u64) -> Result<u64> {
        let label = input.display().to_string();

        tokio::task::spawn_blocking(move || -> Result<u64> {
            let bar = Bar::new(size, &processing.to_string())?;
            let bytes = Self::run_codec(processing, &input, &output, &secret, threads, &bar)?;
            bar.finish();
            Ok(bytes)
        })
        .await
        .context("codec task panicked")?
        .with_context(|| format!("{processing} failed: {label}"))
    }

    fn run_codec(processing: Processing, input: &Path, output: &Path, secret: &Secret, threads: Option<usize>, bar: &Bar) -> Result<u64> {
        match (threads, processing) {
            (None, Processing::Encryption) => FileCodec::new(secret).encrypt(input, output, Some(bar)),
            (None, Processing::Decryption) => FileCodec::new(secret).decrypt(input, output, Some(bar)),
            (Some(n), Processing::Encryption) => ParallelFileCodec::new(secret, n)?.encrypt(input, output, Some(bar)),
            (Some(n), Processing::Decryption) => ParallelFileCodec::new(secret, n)?.decrypt(input, output, Some(bar)),
        }
    }

    fn get_secret(password: Option<String>, processing: Processing) -> Result<Secret> {
        match password {
            Some(password) => Ok(Secret::from_string(password)?),
            None => crate::ui::prompt::prompt_key(processing),
        }
    }
}
