mod cli;

use ripluoliu::{
    config::{self, Config},
    report::{self, Report, TocReport},
    rip,
};
use ripluoliu_format::{Block, BlockChain, Toc};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::io::Write;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ripluoliu=trace,ripluoliu_format=trace".to_string()
        } else {
            "ripluoliu=info,ripluoliu_format=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config_or_default(cli.config.as_deref())?
        .with_overrides(cli.max_blocks, cli.output_dir.clone())?;

    run(&cli, &config)
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let buffer = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?;

    tracing::info!("Read {} bytes from {:?}", buffer.len(), cli.input);

    let (toc, toc_valid) = match Toc::parse(&buffer, 0) {
        Ok(toc) => (toc, true),
        Err(e) => {
            tracing::warn!("No valid table of contents: {}", e);
            (Toc::default(), false)
        }
    };

    let max_blocks = config.walk.max_blocks;

    let blocks: Vec<Block> = match cli.blocks {
        Some(n) => BlockChain::from_start(&buffer)
            .with_limit(max_blocks)
            .take(n)
            .collect(),
        None => Vec::new(),
    };

    let inventory = cli
        .inventory
        .then(|| ripluoliu_format::inventory(&buffer, max_blocks));
    if inventory.as_ref().is_some_and(|inv| inv.limit_reached) {
        tracing::warn!("Block limit reached before end of archive; inventory is partial");
    }

    let extracted = match cli.rip {
        Some(codec) => rip::rip_streams(&cli.input, &buffer, codec, config)?,
        None => Vec::new(),
    };

    let report = Report {
        input: cli.input.clone(),
        file_size: buffer.len() as u64,
        toc: TocReport::new(&toc, toc_valid),
        blocks,
        inventory,
        extracted,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        let json_str = serde_json::to_string_pretty(&report)?;
        writeln!(out, "{}", json_str)?;
    } else {
        report::write_text(&mut out, &report)?;
    }

    Ok(())
}
