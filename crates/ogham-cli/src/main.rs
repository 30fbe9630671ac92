// SPDX-License-Identifier: MIT OR Apache-2.0
//! ogham CLI binary - JSON Pointer, Patch and Merge Patch from the command line

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ogham::{
    Config, DuplicateKeyStrategy, JsonPatch, JsonPointer, JsonProvider, Value,
    from_reader, json_diff, json_merge_diff, merge_many,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ogham")]
#[command(version, about, long_about = None)]
struct Args {
    /// Compact output instead of pretty-printed
    #[arg(short = 'c', long, global = true)]
    compact: bool,

    /// Indentation width for pretty output
    #[arg(short = 'i', long, default_value = "2", global = true)]
    indent: usize,

    /// Duplicate key policy when reading: first, last or fail
    #[arg(long, default_value = "last", global = true)]
    duplicate_keys: DuplicateKeyStrategy,

    /// Deepest container nesting accepted when reading
    #[arg(long, default_value = "128", global = true)]
    max_depth: usize,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for ogham CLI
#[derive(Subcommand)]
enum Commands {
    /// Compute the RFC 6902 patch between two JSON files
    Diff {
        /// Source JSON file
        source: PathBuf,
        /// Target JSON file
        target: PathBuf,
    },
    /// Apply a JSON Patch to a JSON file
    Patch {
        /// JSON file to patch
        file: PathBuf,
        /// Patch file (JSON Patch format)
        patch: PathBuf,
    },
    /// Apply JSON Merge Patch files to a base file, in order
    Merge {
        /// Base file followed by merge patches
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Compute the RFC 7396 merge patch between two JSON files
    MergeDiff {
        /// Source JSON file
        source: PathBuf,
        /// Target JSON file
        target: PathBuf,
    },
    /// Print the value a JSON Pointer designates
    Pointer {
        /// RFC 6901 pointer, e.g. /users/0/name
        pointer: String,
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },
    /// Format JSON (pretty-print or compact)
    Format {
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },
    /// Validate JSON
    Validate {
        /// JSON file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let provider = JsonProvider::new(config(&args));
    let result = match &args.command {
        Commands::Diff { source, target } => run_diff(&provider, source, target),
        Commands::Patch { file, patch } => run_patch(&provider, file, patch),
        Commands::Merge { files } => run_merge(&provider, files),
        Commands::MergeDiff { source, target } => run_merge_diff(&provider, source, target),
        Commands::Pointer { pointer, file } => run_pointer(&provider, pointer, file.as_deref()),
        Commands::Format { file } => read_value(&provider, file.as_deref()).map(Some),
        Commands::Validate { file } => run_validate(&provider, file.as_deref()),
    };

    if let Err(e) = result.and_then(|value| emit(&provider, value.as_ref(), args.output.as_deref()))
    {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn config(args: &Args) -> Config {
    Config::default()
        .with_pretty(!args.compact)
        .with_indent(args.indent)
        .with_duplicate_keys(args.duplicate_keys)
        .with_max_depth(args.max_depth)
}

fn run_diff(provider: &JsonProvider, source: &Path, target: &Path) -> Result<Option<Value>> {
    let source = read_value(provider, Some(source))?;
    let target = read_value(provider, Some(target))?;
    let patch = json_diff(&source, &target);
    tracing::info!(operations = patch.len(), "computed patch");
    Ok(Some(patch.to_value()))
}

fn run_patch(provider: &JsonProvider, file: &Path, patch_file: &Path) -> Result<Option<Value>> {
    let value = read_value(provider, Some(file))?;
    let patch = JsonPatch::from_value(&read_value(provider, Some(patch_file))?)
        .with_context(|| format!("invalid patch in {}", patch_file.display()))?;
    let patched = patch
        .apply(&value)
        .with_context(|| format!("cannot apply {}", patch_file.display()))?;
    Ok(Some(patched))
}

fn run_merge(provider: &JsonProvider, files: &[PathBuf]) -> Result<Option<Value>> {
    let Some((base, patches)) = files.split_first() else {
        bail!("No files provided for merge");
    };
    let base = read_value(provider, Some(base))?;
    let patches = patches
        .iter()
        .map(|file| read_value(provider, Some(file)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(merge_many(&base, &patches)))
}

fn run_merge_diff(provider: &JsonProvider, source: &Path, target: &Path) -> Result<Option<Value>> {
    let source = read_value(provider, Some(source))?;
    let target = read_value(provider, Some(target))?;
    Ok(Some(json_merge_diff(&source, &target)))
}

fn run_pointer(provider: &JsonProvider, pointer: &str, file: Option<&Path>) -> Result<Option<Value>> {
    let pointer = JsonPointer::parse(pointer)?;
    let value = read_value(provider, file)?;
    Ok(Some(pointer.resolve(&value)?.clone()))
}

fn run_validate(provider: &JsonProvider, file: Option<&Path>) -> Result<Option<Value>> {
    let value = read_value(provider, file)?;
    tracing::debug!(kind = %value.kind(), "document is valid");
    println!("JSON is valid");
    Ok(None)
}

fn read_value(provider: &JsonProvider, path: Option<&Path>) -> Result<Value> {
    let config = provider.config();
    if let Some(p) = path {
        tracing::debug!(path = %p.display(), "reading document");
        let file = File::open(p).with_context(|| format!("cannot open {}", p.display()))?;
        from_reader(io::BufReader::new(file), config)
            .with_context(|| format!("cannot parse {}", p.display()))
    } else {
        let mut input = Vec::new();
        io::stdin().read_to_end(&mut input)?;
        from_reader(input.as_slice(), config).context("cannot parse standard input")
    }
}

fn emit(provider: &JsonProvider, value: Option<&Value>, output: Option<&Path>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let mut text = provider.render(value)?;
    text.push('\n');
    if let Some(path) = output {
        fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(text.as_bytes())?;
    }
    Ok(())
}
