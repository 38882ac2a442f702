use anyhow::{Context, Result};
use clap::Parser;
use resdep::catalog::load_target;
use resdep::cli::{Cli, OutputFormat};
use resdep::config::CheckConfig;
use resdep::report::{CtorReport, EnablementReport};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge the config file (if any) with command-line overrides
fn build_config(args: &Cli) -> Result<CheckConfig> {
    let mut config = match &args.config {
        Some(path) => CheckConfig::from_toml(path)?,
        None => CheckConfig::default(),
    };
    if args.catalog.is_some() {
        config.catalog = args.catalog.clone();
    }
    config.enable_syscalls.extend(args.enable.iter().cloned());
    config.disable_syscalls.extend(args.disable.iter().cloned());
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = build_config(&args)?;
    let catalog = config
        .catalog
        .as_ref()
        .context("No catalog given: pass --catalog or set `catalog` in the config file")?;
    let target = load_target(catalog)?;

    if let Some(resource) = &args.ctors {
        if target.resource(resource).is_none() {
            anyhow::bail!("Unknown resource '{}'", resource);
        }
        let report = CtorReport::new(&target, resource);
        match args.format {
            OutputFormat::Text => print!("{}", report.render_text()),
            OutputFormat::Json => println!("{}", report.to_json()?),
        }
        return Ok(());
    }

    let wanted = config.select(&target)?;
    let result = target.transitively_enabled_calls(&wanted);
    let report = EnablementReport::new(&target, &result);
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
