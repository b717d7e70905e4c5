//! rectangle: flatten nested JSON into rows, one step at a time
//!
//! Usage:
//!   # Spread each top-level object into columns
//!   rectangle users.json -s wider:json
//!
//!   # One row per repo, with its position, then pull out the owner's login
//!   rectangle repos.json -s longer:json:repo:n -s hoist:repo:login=owner.login
//!
//!   # NDJSON input, keep users without repos, show column types
//!   rectangle --ndjson users.jsonl -s wider:json -s longer-keep:repos --describe

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use rectangle::ingest::{read_table, Format};
use rectangle::{
    hoist, lengthen, widen, ColumnSpec, HoistOptions, LengthenOptions, NameRepair, Path, Table,
    WidenOptions,
};
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

static STEP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(longer|longer-keep|wider|hoist):([^:]+)(?::(.*))?$").expect("valid step regex")
});

#[derive(Parser, Debug)]
#[command(name = "rectangle")]
#[command(about = "Flatten nested JSON into rows and columns", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one JSON value per line)
    #[arg(long)]
    ndjson: bool,

    /// Name of the column holding the decoded input
    #[arg(long, default_value = "json")]
    column: String,

    /// Name collision policy for wider and hoist: unique, check_unique, fail, minimal
    #[arg(long, default_value = "check_unique")]
    names_repair: NameRepair,

    /// Print each column's name and inferred type to stderr
    #[arg(long)]
    describe: bool,

    /// Rectangling step, applied in order. One of
    /// longer:COL[:VALUES_TO[:INDICES_TO]], longer-keep:..., wider:COL[:SEP],
    /// hoist:COL:NAME=PATH[,NAME=PATH...]
    #[arg(long = "step", short = 's', value_name = "STEP")]
    steps: Vec<Step>,
}

#[derive(Debug, Clone)]
enum Action {
    Longer {
        column: String,
        options: LengthenOptions,
    },
    Wider {
        column: String,
        names_sep: Option<String>,
    },
    Hoist {
        column: String,
        specs: Vec<ColumnSpec>,
    },
}

#[derive(Debug, Clone)]
struct Step {
    text: String,
    action: Action,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let caps = STEP_REGEX
            .captures(s)
            .ok_or_else(|| format!("malformed step `{}`", s))?;
        let column = caps[2].to_string();
        let rest = caps.get(3).map(|m| m.as_str()).filter(|r| !r.is_empty());

        let action = match &caps[1] {
            kind @ ("longer" | "longer-keep") => {
                let mut options = LengthenOptions::default().keep_empty(kind == "longer-keep");
                if let Some(rest) = rest {
                    let mut parts = rest.splitn(2, ':');
                    if let Some(values_to) = parts.next().filter(|p| !p.is_empty()) {
                        options = options.values_to(values_to);
                    }
                    if let Some(indices_to) = parts.next().filter(|p| !p.is_empty()) {
                        options = options.indices_to(indices_to);
                    }
                }
                Action::Longer { column, options }
            }
            "wider" => Action::Wider {
                column,
                names_sep: rest.map(String::from),
            },
            "hoist" => {
                let rest = rest.ok_or_else(|| format!("hoist step `{}` has no NAME=PATH specs", s))?;
                let mut specs = Vec::new();
                for pair in rest.split(',') {
                    let (name, path) = pair
                        .split_once('=')
                        .ok_or_else(|| format!("expected NAME=PATH, got `{}`", pair))?;
                    let path = Path::parse(path.trim()).map_err(|e| e.to_string())?;
                    specs.push(ColumnSpec::new(name.trim(), path));
                }
                Action::Hoist { column, specs }
            }
            other => return Err(format!("unknown step kind `{}`", other)),
        };

        Ok(Step {
            text: s.to_string(),
            action,
        })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let reader = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?;
        Box::new(BufReader::new(file)) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };
    let format = if args.ndjson { Format::Ndjson } else { Format::Json };

    let mut table = read_table(reader, &args.column, format)?;
    for step in &args.steps {
        table = apply_step(&table, step, args.names_repair)
            .with_context(|| format!("Step `{}` failed", step))?;
        tracing::info!(step = %step, rows = table.nrows(), columns = table.ncols(), "applied step");
    }

    if args.describe {
        for (name, column_type) in table.describe() {
            eprintln!("{}: {}", name, column_type);
        }
    }

    write_rows(&table)
}

fn apply_step(table: &Table, step: &Step, names_repair: NameRepair) -> Result<Table> {
    let result = match &step.action {
        Action::Longer { column, options } => lengthen(table, column, options)?,
        Action::Wider { column, names_sep } => {
            let mut options = WidenOptions::default().names_repair(names_repair);
            options.names_sep = names_sep.clone();
            widen(table, column, &options)?
        }
        Action::Hoist { column, specs } => hoist(
            table,
            column,
            specs,
            &HoistOptions::default().names_repair(names_repair),
        )?,
    };
    Ok(result)
}

/// Write rows to stdout as newline-delimited JSON
fn write_rows(table: &Table) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in table.to_records() {
        let line = serde_json::to_string(&record)?;
        writeln!(out, "{}", line)?;
    }
    out.flush().context("Failed to flush output")
}
