//! Minimal CLI: OpenAPI document → TypeScript declarations file
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, ValueEnum};
use colored::Colorize;
use dialoguer::Input;
use tracing::{debug, info};

use oas_ts::codegen::DEFAULT_INDENT;
use oas_ts::resolve::DEFAULT_MAX_DEPTH;
use oas_ts::{CollisionPolicy, EmitOptions, Options, OutputFormat, ResolveOptions, SourceFormat};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate TypeScript interfaces from the component schemas of an OpenAPI document
#[derive(Parser, Debug)]
#[command(name = "oas-ts", version, about)]
pub struct CommandLineInterface {
    /// input document (.yaml/.yml or .json); prompted for when omitted
    #[arg(short, long, visible_alias = "InputFile")]
    input: Option<PathBuf>,

    /// output file name without extension; prompted for when omitted
    #[arg(short, long, visible_alias = "OutputFileName")]
    output: Option<String>,

    #[command(flatten)]
    generation: GenerationSettings,

    /// print the result to stdout instead of writing a file
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Debug, Clone)]
struct GenerationSettings {
    /// what to emit
    #[arg(long, value_enum, default_value_t = FormatArg::Ts)]
    format: FormatArg,

    /// prefix every declaration with `export`
    #[arg(long, default_value_t = false)]
    export: bool,

    /// spaces per member line
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// what to do when two different inline objects synthesize the same name
    #[arg(long, value_enum, default_value_t = CollisionArg::Reuse)]
    on_collision: CollisionArg,

    /// maximum schema nesting before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    /// TypeScript declarations (.ts)
    Ts,
    /// resolved declarations as JSON (.json), for debugging
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CollisionArg {
    /// keep the first declaration, drop the later shape
    Reuse,
    /// register the later shape as Name2, Name3, ...
    Suffix,
    /// stop with an error
    Fail,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl GenerationSettings {
    fn options(&self) -> Options {
        Options {
            resolve: ResolveOptions {
                collisions: match self.on_collision {
                    CollisionArg::Reuse => CollisionPolicy::Reuse,
                    CollisionArg::Suffix => CollisionPolicy::Suffix,
                    CollisionArg::Fail => CollisionPolicy::Fail,
                },
                max_depth: self.max_depth,
            },
            emit: EmitOptions { indent: self.indent, export: self.export },
            format: match self.format {
                FormatArg::Ts => OutputFormat::TypeScript,
                FormatArg::Json => OutputFormat::Json,
            },
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        self.run_with(prompt)
    }

    /// Like [`run`](Self::run), with `ask` answering for any argument not given.
    pub fn run_with(&self, mut ask: impl FnMut(&str) -> Option<String>) -> Result<()> {
        let input = self
            .input
            .clone()
            .or_else(|| ask("Enter input file location").map(PathBuf::from));
        let output = if self.stdout {
            None
        } else {
            self.output.clone().or_else(|| ask("Enter output file name"))
        };
        let Some(input) = input else {
            bail!("input file location and output file name are both required");
        };
        if !self.stdout && output.is_none() {
            bail!("input file location and output file name are both required");
        }

        let options = self.generation.options();
        let generated = generate_from_file(&input, &options)?;

        match output {
            None => print!("{generated}"),
            Some(base) => {
                let out = output_path(&base, options.format);
                write_output(&out, &generated)?;
                println!(
                    "{}",
                    format!("TypeScript code generated and saved to {}", out.display()).green()
                );
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Ask on the terminal; empty answers and non-interactive stdin count as missing.
fn prompt(question: &str) -> Option<String> {
    let answer = Input::<String>::new()
        .with_prompt(question)
        .allow_empty(true)
        .interact_text();
    match answer {
        Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => None,
        Err(error) => {
            debug!(%error, "prompt unavailable");
            None
        }
    }
}

fn generate_from_file(input: &Path, options: &Options) -> Result<String> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input file {}", input.display()))?;
    let format = SourceFormat::from_path(input);
    info!(input = %input.display(), ?format, "converting document");
    oas_ts::convert(&source, format, options)
        .with_context(|| format!("failed to convert {}", input.display()))
}

fn output_path(base: &str, format: OutputFormat) -> PathBuf {
    PathBuf::from(format!("{base}.{}", format.extension()))
}

fn write_output(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(out, contents)
        .with_context(|| format!("failed to write output file {}", out.display()))
}

// ------------------------------- Tests ------------------------------------ //
