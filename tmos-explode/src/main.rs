use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tmos_core::{parse_with_observer, Diagnostic, ParseEvent, ParseStats, ParsedConfig, SourceInfo};
use tmos_explode::explode::explode;
use tmos_explode::inspect::render_tree;
use tmos_explode::report::{render_app_list, render_bundle, render_parse_summary};
use tmos_explode::settings::{resolve_settings, Settings};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

mod cli;
mod input;
mod path_guard;

use cli::{AppsArgs, Cli, Command, ExplodeArgs, InspectArgs, LogLevel, OutputFormat, ParseArgs};

#[derive(Serialize)]
struct ParseReport<'a> {
    version: &'a str,
    dialect: &'static str,
    sources: &'a [SourceInfo],
    stats: &'a ParseStats,
    diagnostics: &'a [Diagnostic],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let settings = resolve_settings(cli.settings.as_deref())
        .with_context(|| "failed to load settings")?;

    match cli.command {
        Command::Parse(args) => run_parse(args, &settings),
        Command::Apps(args) => run_apps(args, &settings),
        Command::Explode(args) => run_explode(args, &settings),
        Command::Inspect(args) => run_inspect(args),
    }
}

fn init_tracing(level: Option<LogLevel>) {
    let mut filter = EnvFilter::from_default_env();
    let directive = level.map(LogLevel::as_directive).or_else(|| {
        std::env::var("RUST_LOG")
            .is_err()
            .then_some(LogLevel::Warn.as_directive())
    });
    if let Some(directive) = directive {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_and_parse(files: &[PathBuf]) -> Result<ParsedConfig> {
    let configs = input::load_config_files(files)?;
    let parsed = parse_with_observer(&configs, |event| match event {
        ParseEvent::File { name, num, of } => tracing::debug!(file = name, "parsing file {num}/{of}"),
        ParseEvent::Object { name, num, of } => tracing::trace!(object = name, "object {num}/{of}"),
    })
    .with_context(|| "failed to parse configuration")?;
    Ok(parsed)
}

fn run_parse(args: ParseArgs, settings: &Settings) -> Result<()> {
    let parsed = load_and_parse(&args.files)?;
    match args.format {
        OutputFormat::Text => println!("{}", render_parse_summary(&parsed)),
        OutputFormat::Json => {
            let report = ParseReport {
                version: parsed.version(),
                dialect: parsed.dialect().name,
                sources: parsed.sources(),
                stats: parsed.stats(),
                diagnostics: parsed.diagnostics(),
            };
            println!("{}", settings.to_json(&report)?);
        }
    }
    Ok(())
}

fn run_apps(args: AppsArgs, settings: &Settings) -> Result<()> {
    let parsed = load_and_parse(&args.files)?;

    if args.list {
        match args.format {
            OutputFormat::Text => println!("{}", render_app_list(&parsed)),
            OutputFormat::Json => println!("{}", settings.to_json(&parsed.app_names())?),
        }
        return Ok(());
    }

    let bundles = match &args.app {
        Some(name) => match parsed.app(name) {
            Some(bundle) => vec![bundle],
            None => bail!("no virtual server named {name}"),
        },
        None => parsed.apps(),
    };

    match args.format {
        OutputFormat::Text => {
            let rendered = bundles.iter().map(render_bundle).collect::<Vec<_>>();
            println!("{}", rendered.join("\n\n"));
        }
        OutputFormat::Json => println!("{}", settings.to_json(&bundles)?),
    }
    Ok(())
}

fn run_explode(args: ExplodeArgs, settings: &Settings) -> Result<()> {
    if let Some(output) = &args.output {
        path_guard::ensure_report_not_input(output, &args.files)?;
    }

    let parsed = load_and_parse(&args.files)?;
    let report = explode(&parsed, &settings.base_objects());
    let json = settings.to_json(&report)?;

    match args.output {
        Some(output) => {
            fs::write(&output, json)
                .with_context(|| format!("failed to write report {}", output.display()))?;
            tracing::info!(
                apps = report.config.apps.len(),
                "wrote report to {}",
                output.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let parsed = load_and_parse(&args.files)?;
    let Some(path) = &args.path else {
        print!("{}", render_tree(parsed.tree(), args.depth));
        return Ok(());
    };

    let segments = path.split_whitespace().collect::<Vec<_>>();
    if let Some(body) = parsed.tree().leaf(&segments) {
        println!("{path} {{{body}}}");
    } else if let Some(subtree) = parsed.tree().subtree(&segments) {
        print!("{}", render_tree(subtree, args.depth));
    } else {
        bail!("path not found: {path}");
    }
    Ok(())
}
