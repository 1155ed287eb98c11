//! Command-line handling for the `valdump` binary.

use std::io;

use thiserror::Error;
use valdump_value::HeapError;

use crate::demos::{self, Demo};
use crate::{DumpConfig, Dumper};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown demo `{0}` (try `valdump list`)")]
    UnknownDemo(String),
    #[error("unknown option `{0}`")]
    UnknownFlag(String),
    #[error("`{flag}` expects a number, got `{value}`")]
    InvalidNumber { flag: &'static str, value: String },
    #[error("expected one demo name, got `{0}` as well")]
    ExtraArgument(String),
    #[error("failed to build demo: {0}")]
    Heap(#[from] HeapError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Errors caused by the command line itself, which get the usage text.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::UnknownDemo(_)
                | Self::UnknownFlag(_)
                | Self::InvalidNumber { .. }
                | Self::ExtraArgument(_)
        )
    }
}

#[derive(Debug)]
pub enum Command {
    Help,
    List,
    Dump {
        demo: &'static Demo,
        config: DumpConfig,
    },
}

pub fn usage() -> String {
    let mut text = String::from(
        "Usage: valdump <demo> [options]\n\
         \x20      valdump list\n\
         \n\
         Options:\n\
         \x20 --no-types        Hide the type column\n\
         \x20 --no-meta         Hide lengths, rune counts and handles\n\
         \x20 --no-refs         Disable reference labels (cycles print <cycle>)\n\
         \x20 --indent=<n>      Spaces per nesting level\n\
         \x20 --max-depth=<n>   Stop expanding below this depth\n\
         \x20 --max-items=<n>   Show at most this many list or map entries\n\
         \n\
         Demos:\n",
    );
    for demo in demos::all() {
        text.push_str(&format!("  {:<17} {}\n", demo.name, demo.summary));
    }
    text
}

/// Parse the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut config = DumpConfig::full();
    let mut demo_name: Option<&str> = None;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(Command::Help),
            "--no-types" => config = config.with_types(false),
            "--no-meta" => config = config.with_meta(false),
            "--no-refs" => config = config.with_references(false),
            flag if flag.starts_with("--") => config = numeric_flag(config, flag)?,
            name if demo_name.is_none() => demo_name = Some(name),
            extra => return Err(CliError::ExtraArgument(extra.to_owned())),
        }
    }

    match demo_name {
        None => Ok(Command::Help),
        Some("list") => Ok(Command::List),
        Some(name) => demos::find(name)
            .map(|demo| Command::Dump { demo, config })
            .ok_or_else(|| CliError::UnknownDemo(name.to_owned())),
    }
}

fn numeric_flag(config: DumpConfig, arg: &str) -> Result<DumpConfig, CliError> {
    let (flag, value) = arg
        .split_once('=')
        .ok_or_else(|| CliError::UnknownFlag(arg.to_owned()))?;
    let (flag, apply): (&'static str, fn(DumpConfig, usize) -> DumpConfig) = match flag {
        "--indent" => ("--indent", DumpConfig::with_indent_width),
        "--max-depth" => ("--max-depth", DumpConfig::with_max_depth),
        "--max-items" => ("--max-items", DumpConfig::with_max_items),
        _ => return Err(CliError::UnknownFlag(arg.to_owned())),
    };
    let n = value.parse().map_err(|_| CliError::InvalidNumber {
        flag,
        value: value.to_owned(),
    })?;
    Ok(apply(config, n))
}

/// Execute a parsed command, writing to `out`.
pub fn run<W: io::Write>(command: &Command, out: &mut W) -> Result<(), CliError> {
    match command {
        Command::Help => out.write_all(usage().as_bytes())?,
        Command::List => {
            for demo in demos::all() {
                writeln!(out, "{:<17} {}", demo.name, demo.summary)?;
            }
        }
        Command::Dump { demo, config } => {
            tracing::debug!(demo = demo.name, "building demo");
            let scene = demo.build()?;
            Dumper::new(*config).fdump(out, &scene.heap, &scene.roots)?;
        }
    }
    Ok(())
}
