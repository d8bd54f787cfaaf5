// Copyright 2026 The Dashboard Schema Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use dashboard_schema::{ConversionOptions, DatasourceRegistry, Generation, convert_value, detect_generation};

#[derive(Parser, Debug)]
#[command(name = "dashconv")]
#[command(version, about = "Convert dashboards between the flat and structured formats")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a dashboard to the structured (elements + layout) format
    ToStructured(ConvertArgs),
    /// Convert a dashboard to the flat (panel list) format
    ToFlat(ConvertArgs),
    /// Print which format a dashboard is written in
    Detect {
        /// Dashboard JSON file; stdin when omitted
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Dashboard JSON file; stdin when omitted
    path: Option<PathBuf>,

    /// JSON file describing the configured datasources (a list, or a map
    /// keyed by name)
    #[arg(long, value_name = "FILE")]
    datasources: Option<PathBuf>,

    /// Name or uid of the datasource used for queries that name none
    #[arg(long, value_name = "NAME")]
    default_datasource: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Indent the output
    #[arg(long)]
    pretty: bool,
}

impl ConvertArgs {
    fn options(&self) -> Result<ConversionOptions> {
        let registry = match &self.datasources {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening datasources file {}", path.display()))?;
                serde_json::from_reader::<_, DatasourceRegistry>(BufReader::new(file))
                    .with_context(|| format!("parsing datasources file {}", path.display()))?
            }
            None => DatasourceRegistry::new(),
        };
        Ok(ConversionOptions::new(registry, self.default_datasource.clone()))
    }
}

fn read_input(path: Option<&Path>) -> Result<Value> {
    let contents = match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    serde_json::from_str(&contents).context("input is not valid JSON")
}

fn write_output(value: &Value, args: &ConvertArgs) -> Result<()> {
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn convert(args: &ConvertArgs, target: Generation) -> Result<()> {
    let options = args.options()?;
    let input = read_input(args.path.as_deref())?;
    let source = detect_generation(&input);
    tracing::debug!(%source, %target, "converting dashboard");

    let converted = convert_value(input, target, &options)
        .with_context(|| format!("converting {source} dashboard to {target}"))?;
    if !converted.warnings.is_empty() {
        tracing::warn!(count = converted.warnings.len(), "conversion finished with warnings");
    }
    write_output(&converted.document, args)
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::ToStructured(args) => convert(args, Generation::Structured),
        Command::ToFlat(args) => convert(args, Generation::Flat),
        Command::Detect { path } => {
            let input = read_input(path.as_deref())?;
            println!("{}", detect_generation(&input));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
