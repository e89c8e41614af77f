//! j2a-convert binary entry point.
//!
//! This is a thin wrapper around the j2a-convert library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Loads the mapping table
//! 4. Converts the archive into the output directory

use anyhow::{Context, Result};
use j2a_convert::{ConvertConfig, DirectorySink, MappingTable, convert_archive};
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<()> {
    // Parse configuration from CLI args
    let config = ConvertConfig::from_args();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!(
        "Configuration loaded: input={:?}, output={:?}, mapping={:?}",
        config.input,
        config.output,
        config.mapping
    );

    // Validate configuration
    config.validate()?;

    let mapping = MappingTable::from_file(&config.mapping)?;
    tracing::info!(
        "Mapping loaded: {} animations, {} samples",
        mapping.animation_count(),
        mapping.sample_count()
    );

    let file = File::open(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;
    let mut reader = BufReader::new(file);

    let mut sink = DirectorySink::new(&config.output);
    let report = convert_archive(&mut reader, &mapping, &mut sink, &config.options(&mapping))?;

    tracing::info!(
        "{} archive converted: {} sprites, {} samples written to {}",
        report.version,
        report.animations_written,
        report.samples_written,
        sink.root().display()
    );

    Ok(())
}
