#![allow(clippy::result_large_err)]

mod cli;
pub mod config;
mod error;
pub mod project;
pub mod registry;
pub mod resolver;
pub mod suggest;
pub mod ui;

pub use error::{PuliError, Result};
pub use registry::{CommandEntry, CommandRegistry, RegistryError};
pub use resolver::{ParsedInput, Resolution, ResolveError, resolve, resolve_input};

/// Entry point for the CLI command dispatch.
pub fn run() -> Result<()> {
    use clap::Parser;

    let args: Vec<String> = std::env::args().collect();
    init_logging(wants_verbose(&args));

    let registry = command_registry()?;
    let args = canonicalize_args(args, &registry)?;
    log::debug!("dispatching {:?}", &args[1..]);
    let cli = cli::Cli::parse_from(args);

    match cli.command {
        cli::Command::Completions(args) => cli::run_completions(args),
        cli::Command::Package(args) => cli::run_package(&mut project::Project::open(&cli.dir)?, args),
        cli::Command::Type(args) => cli::run_type(&mut project::Project::open(&cli.dir)?, args),
        cli::Command::Binding(args) => cli::run_binding(&mut project::Project::open(&cli.dir)?, args),
        cli::Command::Config(args) => cli::run_config(&mut project::Project::open(&cli.dir)?, args),
        cli::Command::Build => cli::run_build(&project::Project::open(&cli.dir)?),
    }
}

/// The table of every command and alias `puli` understands.
pub fn command_registry() -> std::result::Result<CommandRegistry, RegistryError> {
    cli::registry()
}

/// Rewrites abbreviated or aliased command words in `args` to their
/// canonical form, leaving the binary name, leading global options and
/// every later argument in place.
///
/// A single argument may hold both command words (`"pack ins"`); words of
/// that argument past the command stay behind as one argument.
///
/// Arguments without a command word are returned unchanged.
pub fn canonicalize_args(
    mut args: Vec<String>,
    registry: &CommandRegistry,
) -> std::result::Result<Vec<String>, ResolveError> {
    let Some(start) = command_position(&args) else {
        return Ok(args);
    };

    // The first two words, each with the index of the argument it came from.
    let mut words: Vec<(String, usize)> = Vec::new();
    'collect: for (idx, arg) in args.iter().enumerate().skip(start) {
        for word in arg.split_whitespace() {
            words.push((word.to_string(), idx));
            if words.len() == 2 {
                break 'collect;
            }
        }
    }

    let input = words
        .iter()
        .map(|(word, _)| word.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let resolution = resolve_input(&input, registry)?;

    let consumed = resolution.consumed.min(words.len());
    let Some((_, last)) = consumed
        .checked_sub(1)
        .and_then(|idx| words.get(idx))
        .cloned()
    else {
        return Ok(args);
    };
    let used_in_last = words[..consumed]
        .iter()
        .filter(|(_, idx)| *idx == last)
        .count();
    let leftover = args[last]
        .split_whitespace()
        .skip(used_in_last)
        .collect::<Vec<_>>()
        .join(" ");

    let rest = args.split_off(last + 1);
    args.truncate(start);
    args.extend(resolution.command.split(' ').map(str::to_string));
    if !leftover.is_empty() {
        args.push(leftover);
    }
    args.extend(rest);
    Ok(args)
}

// Index of the first word that is neither an option nor an option's value.
fn command_position(args: &[String]) -> Option<usize> {
    let mut idx = 1;
    while let Some(arg) = args.get(idx) {
        match arg.as_str() {
            "--" => return None,
            _ if takes_separate_value(arg) => idx += 2,
            _ if arg.starts_with('-') => idx += 1,
            _ => return Some(idx),
        }
    }
    None
}

// `--dir`, or a short cluster ending in `d` (`-d`, `-vd`). In `-dapp` the
// value is attached.
fn takes_separate_value(arg: &str) -> bool {
    if arg == "--dir" {
        return true;
    }
    match short_cluster(arg) {
        Some(cluster) => cluster.find('d') == Some(cluster.len() - 1),
        None => false,
    }
}

fn short_cluster(arg: &str) -> Option<&str> {
    arg.strip_prefix('-')
        .filter(|cluster| !cluster.is_empty() && !cluster.starts_with('-'))
}

// Logging starts before clap runs so resolution can be traced.
fn wants_verbose(args: &[String]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|arg| *arg != "--")
        .any(|arg| {
            arg == "--verbose"
                || short_cluster(arg)
                    .and_then(|cluster| cluster.split('d').next())
                    .is_some_and(|flags| flags.contains('v'))
        })
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
