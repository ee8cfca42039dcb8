//! Command dispatch: turns parsed arguments into service calls

use std::io;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{CategoryTree, LoadOutcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::render::TerminalRenderer;
use crate::cli::shell::Shell;
use crate::cli::{output, CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{
    redistribution, Adjustment, CategoryNode, Mode, NodeId, Normalization, SiblingGroup,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { parent }) => cmd_show(cli, *parent),
        Some(Commands::Tree { parent, depth }) => cmd_tree(cli, *parent, *depth),
        Some(Commands::Stats) => cmd_stats(cli),
        Some(Commands::Adjust {
            index,
            value,
            allocations,
        }) => cmd_adjust(*index, *value, allocations),
        Some(Commands::Shell) => cmd_shell(cli),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, try 'budgetctl --help'".into(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?.with_server(cli.server.as_deref())?;
    debug!(
        server = %settings.server_url,
        root = settings.root_id,
        "settings loaded"
    );
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(
        load_settings(cli)?,
        Arc::new(TerminalRenderer),
    )?)
}

#[instrument(skip(cli))]
fn cmd_show(cli: &Cli, parent: Option<NodeId>) -> CliResult<()> {
    let container = container(cli)?;
    let mut controller = container.controller();

    controller.check_auth();
    let root = parent.unwrap_or(controller.root());
    let outcome = controller.load(root);
    controller.load_stats();

    match outcome {
        LoadOutcome::Failed => Err(CliError::Unavailable(format!(
            "cannot load categories from {}",
            container.settings.server_url
        ))),
        _ => Ok(()),
    }
}

#[instrument(skip(cli))]
fn cmd_tree(cli: &Cli, parent: Option<NodeId>, depth: usize) -> CliResult<()> {
    let container = container(cli)?;
    let root = parent.unwrap_or(container.settings.root_id);
    let snapshot = container.tree_service().snapshot(root, Mode::View, depth)?;
    output::info(&to_termtree(&snapshot));
    Ok(())
}

fn to_termtree(node: &CategoryTree) -> Tree<String> {
    let label = match node.allocation {
        Some(a) => format!("{} ({a:.2}%)", node.name),
        None => node.name.clone(),
    };
    Tree::new(label).with_leaves(node.children.iter().map(to_termtree))
}

#[instrument(skip(cli))]
fn cmd_stats(cli: &Cli) -> CliResult<()> {
    let container = container(cli)?;
    match container.controller().load_stats() {
        Some(_) => Ok(()),
        None => Err(CliError::Unavailable(format!(
            "cannot fetch stats from {}",
            container.settings.server_url
        ))),
    }
}

/// Run the engine on ad-hoc numbers, no server involved.
#[instrument]
fn cmd_adjust(index: usize, value: f64, allocations: &[f64]) -> CliResult<()> {
    if index >= allocations.len() {
        return Err(CliError::InvalidArgs(format!(
            "index {index} out of range for {} allocations",
            allocations.len()
        )));
    }

    let nodes = allocations
        .iter()
        .enumerate()
        .map(|(i, a)| CategoryNode::new(i as NodeId, None, format!("#{i}"), *a))
        .collect();
    let mut group = SiblingGroup::new(nodes);
    let before = group.total();
    if (before - 100.0).abs() >= redistribution::DRIFT_TOLERANCE {
        output::warning(&format!("input sums to {before:.3}, not 100"));
    }

    let outcome = group.adjust(index, value);
    debug!(?outcome, "adjust");

    for node in group.nodes() {
        output::info(&format!("{:.2}", node.allocation));
    }
    output::detail(&format!("total {:.3}", group.total()));
    if let Adjustment::Applied {
        normalization: Normalization::Unadjustable { drift },
    } = outcome
    {
        output::warning(&format!("drift of {drift:.3} could not be corrected"));
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_shell(cli: &Cli) -> CliResult<()> {
    let container = container(cli)?;
    let mut shell = Shell::new(
        container.controller(),
        container.selector.clone(),
        container.settings.username.clone(),
    );
    let stdin = io::stdin();
    shell.run(stdin.lock())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (missing)" };
                    output::action("global", &format!("{}{state}", path.display()));
                }
                None => output::warning("no config directory for this platform"),
            }
            if let Some(path) = &cli.config {
                output::action("file", &path.display());
            }
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("no config directory for this platform".into()))?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}
