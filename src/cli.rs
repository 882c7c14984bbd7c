use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use console::style;
use uuid::Uuid;

use crate::config::{self, check_key, effective, global_config_path, read_global, write_global};
use crate::error::Result;
use crate::project::{Binding, Project};
use crate::registry::{CommandRegistry, RegistryError};
use crate::ui;

/// CLI argument parser definition.
#[derive(Parser)]
#[command(
    name = "puli",
    version,
    about = "Manages the resources, types and bindings of a Puli project",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
    /// Project root directory
    #[arg(short = 'd', long = "dir", global = true, default_value = ".")]
    pub dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
pub enum Command {
    #[command(about = "Show and manage installed packages")]
    Package(PackageArgs),
    #[command(about = "Show and manage binding types")]
    Type(TypeArgs),
    #[command(aliases = ["bind"], about = "Show and manage resource bindings")]
    Binding(BindingArgs),
    #[command(about = "Show and modify configuration values")]
    Config(ConfigArgs),
    #[command(about = "Check the bindings against the defined types")]
    Build,
    #[command(aliases = ["completion"], about = "Generate shell completion scripts")]
    Completions(CompletionsArgs),
}

/// Arguments for `puli package`.
#[derive(Args)]
pub struct PackageArgs {
    #[command(subcommand)]
    pub command: Option<PackageCommand>,
}

#[derive(Subcommand)]
pub enum PackageCommand {
    #[command(aliases = ["add"], about = "Install a package from a directory")]
    Install {
        path: PathBuf,
        name: Option<String>,
    },
    #[command(about = "Rename an installed package")]
    Rename { old: String, new: String },
    #[command(aliases = ["rm"], about = "Remove an installed package")]
    Remove { name: String },
    #[command(about = "Remove packages whose directory is gone")]
    Clean,
}

/// Arguments for `puli type`.
#[derive(Args)]
pub struct TypeArgs {
    #[command(subcommand)]
    pub command: Option<TypeCommand>,
}

#[derive(Subcommand)]
pub enum TypeCommand {
    #[command(about = "Define a binding type")]
    Define {
        name: String,
        #[arg(long = "description")]
        description: Option<String>,
    },
    #[command(about = "Remove a binding type")]
    Remove { name: String },
}

/// Arguments for `puli binding`.
#[derive(Args)]
pub struct BindingArgs {
    #[command(subcommand)]
    pub command: Option<BindingCommand>,
}

#[derive(Subcommand)]
pub enum BindingCommand {
    #[command(about = "Bind the resources matching a query to a type")]
    Add {
        query: String,
        #[arg(value_name = "TYPE")]
        type_name: String,
    },
    #[command(aliases = ["rm"], about = "Remove a binding by UUID prefix")]
    Remove { uuid: String },
    #[command(about = "Enable a binding by UUID prefix")]
    Enable { uuid: String },
    #[command(about = "Disable a binding by UUID prefix")]
    Disable { uuid: String },
}

/// Arguments for `puli config`.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Print the effective value of a key")]
    Get { key: String },
    #[command(about = "Set a configuration value")]
    Set {
        key: String,
        value: String,
        #[arg(short = 'g', long = "global")]
        global: bool,
    },
    #[command(about = "Reset a key to its inherited value")]
    Reset {
        key: String,
        #[arg(short = 'g', long = "global")]
        global: bool,
    },
}

/// Arguments for `puli completions`.
#[derive(Args)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Builds the command table from the clap definitions.
///
/// Top-level commands come first, then every `"<main> <sub>"` pair, each
/// followed by its aliases.
pub fn registry() -> std::result::Result<CommandRegistry, RegistryError> {
    let cli = Cli::command();
    let mut registry = CommandRegistry::new();

    for cmd in cli.get_subcommands() {
        let name = cmd.get_name();
        registry.command(name)?;
        for alias in cmd.get_all_aliases() {
            registry.alias(alias, name)?;
        }
    }
    registry.command("help")?;

    for cmd in cli.get_subcommands() {
        let main = cmd.get_name();
        for sub in cmd.get_subcommands() {
            let canonical = format!("{} {}", main, sub.get_name());
            registry.command(&canonical)?;
            for alias in sub.get_all_aliases() {
                registry.alias(&format!("{} {}", main, alias), &canonical)?;
            }
        }
    }

    Ok(registry)
}

pub fn run_package(project: &mut Project, args: PackageArgs) -> Result<()> {
    match args.command {
        None => {
            if project.file.packages.is_empty() {
                ui::info("No packages installed.");
                return Ok(());
            }
            ui::heading("Packages");
            let rows: Vec<Vec<String>> = project
                .file
                .packages
                .iter()
                .map(|(name, package)| {
                    vec![
                        style(name).bold().to_string(),
                        package.installer.clone(),
                        package.install_path.clone(),
                    ]
                })
                .collect();
            ui::table(&rows);
        }
        Some(PackageCommand::Install { path, name }) => {
            let name = project.install_package(&path, name.as_deref())?;
            project.save()?;
            ui::success(&format!("Installed package {}", name));
        }
        Some(PackageCommand::Rename { old, new }) => {
            project.rename_package(&old, &new)?;
            project.save()?;
            ui::success(&format!("Renamed package {} to {}", old, new));
        }
        Some(PackageCommand::Remove { name }) => {
            project.remove_package(&name)?;
            project.save()?;
            ui::success(&format!("Removed package {}", name));
        }
        Some(PackageCommand::Clean) => {
            let removed = project.clean_packages();
            if removed.is_empty() {
                ui::info("No packages to clean.");
                return Ok(());
            }
            project.save()?;
            for name in &removed {
                ui::list_item(&format!("Removed {}", name));
            }
            ui::success(&format!("Removed {} package(s)", removed.len()));
        }
    }
    Ok(())
}

pub fn run_type(project: &mut Project, args: TypeArgs) -> Result<()> {
    match args.command {
        None => {
            if project.file.types.is_empty() {
                ui::info("No types defined.");
                return Ok(());
            }
            ui::heading("Binding types");
            let rows: Vec<Vec<String>> = project
                .file
                .types
                .iter()
                .map(|(name, ty)| {
                    vec![
                        style(name).bold().to_string(),
                        ty.description.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            ui::table(&rows);
        }
        Some(TypeCommand::Define { name, description }) => {
            project.define_type(&name, description)?;
            project.save()?;
            ui::success(&format!("Defined type {}", name));
        }
        Some(TypeCommand::Remove { name }) => {
            project.remove_type(&name)?;
            project.save()?;
            ui::success(&format!("Removed type {}", name));
        }
    }
    Ok(())
}

pub fn run_binding(project: &mut Project, args: BindingArgs) -> Result<()> {
    match args.command {
        None => {
            if project.file.bindings.is_empty() {
                ui::info("No bindings.");
                return Ok(());
            }
            ui::heading("Bindings");
            let rows: Vec<Vec<String>> = project.file.bindings.iter().map(binding_row).collect();
            ui::table(&rows);
        }
        Some(BindingCommand::Add { query, type_name }) => {
            let uuid = project.add_binding(&query, &type_name)?;
            if !project.file.types.contains_key(&type_name) {
                ui::warn(&format!("The type {} is not defined yet", type_name));
            }
            project.save()?;
            ui::success(&format!("Added binding {}", short_uuid(&uuid)));
        }
        Some(BindingCommand::Remove { uuid }) => {
            let binding = project.remove_binding(&uuid)?;
            project.save()?;
            ui::success(&format!("Removed binding {}", short_uuid(&binding.uuid)));
        }
        Some(BindingCommand::Enable { uuid }) => {
            let short = short_uuid(&project.set_binding_enabled(&uuid, true)?.uuid);
            project.save()?;
            ui::success(&format!("Enabled binding {}", short));
        }
        Some(BindingCommand::Disable { uuid }) => {
            let short = short_uuid(&project.set_binding_enabled(&uuid, false)?.uuid);
            project.save()?;
            ui::success(&format!("Disabled binding {}", short));
        }
    }
    Ok(())
}

pub fn run_config(project: &mut Project, args: ConfigArgs) -> Result<()> {
    let global_path = global_config_path();
    let mut global = read_global(&global_path)?;

    match args.command {
        None => {
            ui::heading("Configuration");
            let rows: Vec<Vec<String>> = effective(&global.config, &project.file.config)
                .into_iter()
                .map(|(key, value)| {
                    vec![
                        key,
                        value.value,
                        style(format!("({})", value.origin)).dim().to_string(),
                    ]
                })
                .collect();
            ui::table(&rows);
        }
        Some(ConfigCommand::Get { key }) => {
            check_key(&key)?;
            let values = effective(&global.config, &project.file.config);
            if let Some(value) = values.get(&key) {
                ui::info(&value.value);
            }
        }
        Some(ConfigCommand::Set { key, value, global: to_global }) => {
            check_key(&key)?;
            if to_global {
                global.config.insert(key.clone(), value.clone());
                write_global(&global_path, &global)?;
            } else {
                project.file.config.insert(key.clone(), value.clone());
                project.save()?;
            }
            ui::success(&format!("Set {} to {}", key, value));
        }
        Some(ConfigCommand::Reset { key, global: to_global }) => {
            check_key(&key)?;
            if to_global {
                global.config.remove(&key);
                write_global(&global_path, &global)?;
            } else {
                project.file.config.remove(&key);
                project.save()?;
            }
            let inherited = effective(&global.config, &project.file.config)
                .remove(&key)
                .map(|value| value.value)
                .unwrap_or_default();
            ui::success(&format!("Reset {} to {}", key, inherited));
        }
    }
    Ok(())
}

pub fn run_build(project: &Project) -> Result<()> {
    let report = project.build_report();
    let puli_dir = project
        .file
        .config
        .get("puli-dir")
        .map(String::as_str)
        .or_else(|| config::default_value("puli-dir"))
        .unwrap_or_default();
    log::debug!("building into {}", project.root().join(puli_dir).display());

    for binding in &report.type_missing {
        ui::warn(&format!(
            "Binding {} refers to the undefined type {}",
            short_uuid(&binding.uuid),
            binding.type_name
        ));
    }
    ui::success(&format!(
        "{} binding(s) enabled, {} disabled, {} with missing type",
        report.enabled.len(),
        report.disabled.len(),
        report.type_missing.len()
    ));
    Ok(())
}

/// Prints shell completion scripts to stdout.
pub fn run_completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}

fn binding_row(binding: &Binding) -> Vec<String> {
    let state = if binding.enabled {
        style("enabled").green().to_string()
    } else {
        style("disabled").dim().to_string()
    };
    vec![
        short_uuid(&binding.uuid),
        binding.query.clone(),
        binding.type_name.clone(),
        state,
    ]
}

fn short_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(6).collect()
}
