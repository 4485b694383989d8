//! Command-line persona generator.
//!
//! # Environment Variables
//!
//! - `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET`: Reddit app credentials
//! - `REDDIT_USER_AGENT`: User agent (default: `PersonaGenerator/1.0`)
//! - `GEMINI_API_KEY` (or `GOOGLE_API_KEY`): Gemini API key
//! - `GEMINI_MODEL`: Model name (default: `gemini-1.5-flash`)
//! - `RUST_LOG`: Tracing filter (default: `info,persona_forge=debug`)
//!
//! # Usage
//!
//! ```bash
//! persona https://www.reddit.com/user/kojied/ --limit 50
//! persona kojied --config persona.yaml --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use persona_forge::report::FileSink;
use persona_forge::{PersonaConfig, PersonaGenerator, PersonaSink};

#[derive(Parser)]
#[command(name = "persona")]
#[command(about = "Build an evidence-backed persona from a Reddit profile", long_about = None)]
struct Cli {
    /// Profile URL (https://www.reddit.com/user/<name>/) or username
    profile: String,

    /// Maximum posts and maximum comments to fetch
    #[arg(short, long)]
    limit: Option<usize>,

    /// YAML config file; environment variables are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report file (default: persona_<user>_<date>.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the report
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write the persona as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,persona_forge=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PersonaConfig::from_yaml_file(path)?,
        None => PersonaConfig::from_env()?,
    };
    let limit = cli.limit.unwrap_or(config.pipeline.limit);

    let generator = PersonaGenerator::from_config(&config)?;
    let persona = generator
        .generate_persona(&cli.profile, limit)
        .with_context(|| format!("failed to generate persona for {}", cli.profile))?;

    let sink = FileSink::new(&cli.out_dir);
    let report_path = sink.write(&persona, cli.output.as_deref())?;
    if cli.json {
        sink.write_json(&persona, cli.output.as_deref())?;
    }

    let (verified, unverifiable) = persona.citation_tally();
    tracing::info!(
        username = persona.username(),
        verified,
        unverifiable,
        "persona run complete"
    );
    println!("Persona generated for u/{}", persona.username());
    println!("Report saved to: {}", report_path.display());
    println!("Citations: {} verified, {} unverifiable", verified, unverifiable);
    println!();
    for line in persona.summary_lines() {
        println!("   {}", line);
    }

    Ok(())
}
