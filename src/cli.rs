//! Minimal CLI: descriptors → members (generate), C# sources → findings (scan) or fixed sources (fix)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::ir::TypeDescriptor;
use crate::splice::{fix_source, FixOptions};
use crate::stringify::{GenerateOptions, Stringifier};
use crate::target::Target;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// synthesize "describe as text" members (C# `ToString`, Java `toString`, Rust `Display`) from type descriptions
#[derive(Parser, Debug)]
#[command(name = "describe-gen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate members from JSON type descriptors
    Generate(GenerateOut),
    /// list C# classes that do not override ToString
    Scan(ScanOut),
    /// add a ToString override to C# classes lacking one
    Fix(FixOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct IndentSettings {
    /// spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// indent with tabs instead of spaces
    #[arg(long, default_value_t = false)]
    tabs: bool,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// JSON Pointer to select a subnode in each document (e.g. /data/types)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// language of the generated member
    #[arg(long, value_enum, default_value_t = Target::Csharp)]
    target: Target,

    #[command(flatten)]
    indent_settings: IndentSettings,

    /// extra indentation levels applied to every generated line
    #[arg(long, default_value_t = 0)]
    base_indent: usize,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ScanOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// also list classes that already override ToString
    #[arg(long, default_value_t = false)]
    all: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct FixOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    indent_settings: IndentSettings,

    /// only fix the first class lacking ToString in each file
    #[arg(long, default_value_t = false)]
    first_only: bool,

    /// rewrite the input files
    #[arg(long, default_value_t = false, conflicts_with = "out")]
    in_place: bool,

    /// output directory for fixed files (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn paths(&self) -> Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")
    }
}

impl IndentSettings {
    fn unit(&self) -> String {
        if self.tabs { "\t".to_string() } else { " ".repeat(self.indent) }
    }
}

impl GenerateOut {
    /// Every descriptor across all inputs, in input order.
    fn load_descriptors(&self) -> Result<Vec<TypeDescriptor>> {
        let mut out = Vec::new();
        for source_path in self.input_settings.paths()? {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            let mut json_value = serde_json::from_str::<serde_json::Value>(&source)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;

            if let Some(pointer) = self.json_pointer.as_deref() {
                json_value = match json_value.pointer_mut(pointer) {
                    Some(node) => node.take(),
                    None => bail!("JSON pointer {pointer} matched nothing in {source_path_str}"),
                };
            }

            let documents = match self.jq_expr.as_ref() {
                None => vec![json_value],
                Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                    format!("failed to apply jq expression to source file ({source_path_str})")
                })?,
            };

            for (index, document) in documents.into_iter().enumerate() {
                let descriptors = crate::path_de::descriptors_from_value(document).map_err(|error| {
                    anyhow::anyhow!("invalid type descriptor in {source_path_str} (document {index}): {error}")
                })?;
                debug!(path = %source_path_str, count = descriptors.len(), "loaded descriptors");
                out.extend(descriptors);
            }
        }
        Ok(out)
    }

    fn run(&self) -> Result<()> {
        let descriptors = self.load_descriptors()?;
        let stringifier = Stringifier::new(GenerateOptions {
            target: self.target,
            indent: self.indent_settings.unit(),
            base_indent: self.base_indent,
        });

        // collect() keeps input order; the first error aborts the whole batch
        let members = descriptors
            .par_iter()
            .map(|ty| stringifier.generate(ty))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = members.len(), target = %self.target, "generated members");

        let mut rendered = members
            .iter()
            .map(|m| m.source_text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        rendered.push('\n');
        write_or_print(self.out.as_deref(), &rendered)
    }
}

impl ScanOut {
    fn run(&self) -> Result<()> {
        let mut missing_total = 0usize;
        for path in self.input_settings.paths()? {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read source file ({})", path.display()))?;
            for class in crate::scan::scan_classes(&source) {
                let line = line_of(&source, class.keyword_offset);
                let location = format!("{}:{line}", path.display());
                if class.has_to_string {
                    if self.all {
                        println!("{} {location} {} overrides ToString", "ok".green(), class.name);
                    }
                    continue;
                }
                missing_total += 1;
                println!(
                    "{} {location} {} has no ToString override ({} properties)",
                    "missing".yellow().bold(),
                    class.name.bold(),
                    class.properties.len(),
                );
            }
        }
        info!(missing = missing_total, "scan complete");
        Ok(())
    }
}

impl FixOut {
    fn run(&self) -> Result<()> {
        let options = FixOptions { indent: self.indent_settings.unit(), first_only: self.first_only };
        let paths = self.input_settings.paths()?;
        let destinations: Vec<Option<PathBuf>> = match self.out.as_deref() {
            Some(dir) => output_paths(dir, &paths)?.into_iter().map(Some).collect(),
            None => vec![None; paths.len()],
        };
        for (path, destination) in paths.iter().zip(destinations) {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read source file ({})", path.display()))?;
            let outcome = fix_source(&source, &options)
                .with_context(|| format!("failed to fix {}", path.display()))?;
            for (class, reason) in &outcome.skipped {
                eprintln!("{} {} {class}: {reason}", "skipped".yellow(), path.display());
            }

            if self.in_place {
                if outcome.changed() {
                    std::fs::write(path, &outcome.source)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }
            } else if let Some(destination) = destination {
                write_or_print(Some(destination.as_path()), &outcome.source)?;
            } else {
                print!("{}", outcome.source);
            }
            eprintln!("{} {} ({} fixed)", "done".green(), path.display(), outcome.fixed.len());
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        let no_op = match &self.cmd {
            Command::Generate(target) => target.no_op,
            Command::Scan(target) => target.no_op,
            Command::Fix(target) => target.no_op,
        };
        // debug path
        if no_op {
            eprintln!("{self:#?}");
            return Ok(());
        }
        match &self.cmd {
            Command::Generate(target) => target.run(),
            Command::Scan(target) => target.run(),
            Command::Fix(target) => target.run(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_or_print(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

/// `dir/<file name>` for every input. Inputs sharing a file name would overwrite each other,
/// so that is rejected before anything is written.
fn output_paths(dir: &Path, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut claimed = BTreeMap::<PathBuf, &Path>::new();
    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        let file_name = input
            .file_name()
            .with_context(|| format!("input path has no file name ({})", input.display()))?;
        let destination = dir.join(file_name);
        if let Some(previous) = claimed.insert(destination.clone(), input) {
            bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                input.display(),
                destination.display()
            );
        }
        out.push(destination);
    }
    Ok(out)
}

fn line_of(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset.min(source.len())].iter().filter(|&&b| b == b'\n').count() + 1
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
            if matched.is_empty() {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
            matched.sort();
            out.append(&mut matched);
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
