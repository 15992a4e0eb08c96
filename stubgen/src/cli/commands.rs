use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use stubgen_codegen::{
    CodegenError, InterfaceOptions, MockOptions, OutputTarget, run_interface, run_mock,
    write_output,
};
use tracing::debug;

/// Long flags that may also be written with a single dash.
const LONG_FLAGS: &[&str] = &[
    "pkg",
    "type",
    "out",
    "outpkg",
    "selfpkg",
    "name",
    "stop-on-load-error",
    "help",
    "version",
];

/// Exit code for invalid arguments, shared with clap.
const USAGE_EXIT_CODE: u8 = 2;

/// Command-line interface for stubgen
#[derive(Debug, Parser)]
#[command(name = "stubgen", version)]
#[command(about = "Mock, stub and interface generator for Go", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for stubgen
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate mock and stub for an interface
    Mock {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Generate interface from struct
    Interface {
        #[command(flatten)]
        target: TargetArgs,

        /// Name of the generated interface (default: <Struct>Interface)
        #[arg(long)]
        name: Option<String>,
    },
}

/// Options shared by all commands.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// The package containing the type: a directory or an import path
    #[arg(long, default_value = ".")]
    pub pkg: String,

    /// The name of the type
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: String,

    /// Output file; defaults to stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Output package name; defaults to the package of the type
    #[arg(long)]
    pub outpkg: Option<String>,

    /// The full import path of the output package
    #[arg(long)]
    pub selfpkg: Option<String>,

    /// Abort when the package loaded with errors
    #[arg(long, default_value_t = false)]
    pub stop_on_load_error: bool,
}

impl TargetArgs {
    /// Returns the output settings.
    #[must_use]
    pub fn output(&self) -> OutputTarget {
        OutputTarget {
            out: self.out.clone(),
            outpkg: self.outpkg.clone().unwrap_or_default(),
            selfpkg: self.selfpkg.clone().unwrap_or_default(),
        }
    }
}

/// Rewrites Go-style single-dash long flags (`-pkg`) to `--pkg`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let normalized = arg.to_str().and_then(|s| {
                let rest = s.strip_prefix('-')?;
                let flag = rest.split_once('=').map_or(rest, |(name, _)| name);
                (!rest.starts_with('-') && LONG_FLAGS.contains(&flag)).then(|| format!("-{s}"))
            });
            normalized.map_or(arg, OsString::from)
        })
        .collect()
}

/// Runs a parsed command, writing generated code or a status line to `stdout`.
///
/// # Errors
/// Returns an error if generation or writing fails; see [`exit_code`].
pub fn run_cli<W: Write>(cli: Cli, stdout: &mut W) -> Result<()> {
    let (source, output) = match cli.command {
        Commands::Mock { target } => {
            let options = MockOptions {
                output: target.output(),
                pkg: target.pkg,
                type_name: target.type_name,
                stop_on_load_error: target.stop_on_load_error,
            };
            (run_mock(&options)?, options.output)
        }
        Commands::Interface { target, name } => {
            let options = InterfaceOptions {
                output: target.output(),
                pkg: target.pkg,
                type_name: target.type_name,
                name,
                stop_on_load_error: target.stop_on_load_error,
            };
            (run_interface(&options)?, options.output)
        }
    };

    write_output(&source, output.out.as_deref(), stdout)
        .with_context(|| format!("writing {}", output.path_string()))?;
    if let Some(path) = &output.out {
        debug!("generated {} bytes", source.len());
        writeln!(stdout, "File created successfully : {}", path.display())?;
    }
    Ok(())
}

/// Maps an error of [`run_cli`] to the process exit code.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CodegenError>() {
        Some(e) if e.is_usage() => USAGE_EXIT_CODE,
        _ => 1,
    }
}

/// Returns the message to print for an invalid-arguments error, followed by
/// the command usage. Other errors return `None`.
#[must_use]
pub fn usage_message(err: &anyhow::Error) -> Option<String> {
    if exit_code(err) != USAGE_EXIT_CODE {
        return None;
    }
    Some(format!("error: {err:#}\n\n{}\n", Cli::command().render_usage()))
}
