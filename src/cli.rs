//! Minimal CLI: (stringify | parse | classify) transactions and orders
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::debug;

use crate::classify::classify;
use crate::convert::{map_wide_fields, numeral_string};
use crate::registry::SchemaRegistry;
use crate::schema::SchemaNode;
use crate::ser::{stringify_plain, stringify_with_config, StringifyConfig};
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// convert transactions/orders between JSON text and values without losing
/// precision on wide integer fields
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// write compact JSON with wide fields as bare numerals
    Stringify(StringifyOut),
    /// parse precision-safely and print wide fields as numeral strings
    Parse(ParseOut),
    /// report how one path of each input classifies
    Classify(ClassifyOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// schema registry (JSON)
    #[arg(long, short)]
    schemas: PathBuf,

    /// inputs are orders rather than transactions
    #[arg(long, default_value_t = false)]
    order: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct StringifyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// reject inputs nested deeper than this
    #[arg(long)]
    max_depth: Option<usize>,

    /// output file, one document per line (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ParseOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file, one document per line (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ClassifyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// dotted path, array indices as numbers (e.g. call.args.0.value)
    #[arg(long)]
    path: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Run `apply` over every input in parallel; results keep input order.
    fn load_process<F>(&self, apply: F) -> anyhow::Result<Vec<String>>
    where
        F: Fn(&Path, &Value, &SchemaNode) -> anyhow::Result<String> + Sync,
    {
        let registry = SchemaRegistry::load(&self.schemas)?;
        let source_paths = resolve_file_path_patterns(&self.input)?;
        source_paths
            .par_iter()
            .map(|source_path| {
                let source = std::fs::read_to_string(source_path)
                    .with_context(|| format!("failed to read {}", source_path.display()))?;
                let value = crate::parse::parse(&source)
                    .with_context(|| format!("failed to parse {}", source_path.display()))?;
                let schema = if self.order {
                    registry.schema_for_order(&value)
                } else {
                    registry.schema_for_tx(&value)
                }
                .with_context(|| format!("no schema for {}", source_path.display()))?;
                debug!(path = %source_path.display(), "processing input");
                apply(source_path, &value, schema)
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Stringify(target) => {
                let config = StringifyConfig { max_depth: target.max_depth };
                let docs = target.input_settings.load_process(|source_path, value, schema| {
                    let value = map_wide_fields(value, schema, numeral_string)
                        .with_context(|| format!("bad wide field in {}", source_path.display()))?;
                    Ok(stringify_with_config(&value, schema, &config)?)
                })?;
                emit(target.out.as_deref(), &docs)
            }
            Command::Parse(target) => {
                let docs = target.input_settings.load_process(|source_path, value, schema| {
                    let value = map_wide_fields(value, schema, numeral_string)
                        .with_context(|| format!("bad wide field in {}", source_path.display()))?;
                    Ok(stringify_plain(&value))
                })?;
                emit(target.out.as_deref(), &docs)
            }
            Command::Classify(target) => {
                let segments: Vec<&str> = target.path.split('.').filter(|s| !s.is_empty()).collect();
                let lines = target.input_settings.load_process(|source_path, value, schema| {
                    let result = classify(&segments, schema, value);
                    Ok(format!("{}: {} {result:?}", source_path.display(), target.path))
                })?;
                emit(None, &lines)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn emit(out: Option<&Path>, docs: &[String]) -> anyhow::Result<()> {
    let mut text = docs.join("\n");
    text.push('\n');
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // an explicit glob that matches nothing is almost certainly a typo
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
