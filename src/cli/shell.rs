//! Interactive session
//!
//! Each input line is parsed as a command and dispatched to the controller,
//! one at a time, until `quit` or end of input.

use std::io::BufRead;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, instrument};

use crate::application::services::{ModeChange, SaveOutcome, ViewController};
use crate::cli::args::ModeArg;
use crate::cli::output;
use crate::cli::CliResult;
use crate::domain::{Adjustment, Mode};
use crate::infrastructure::traits::Selector;
use crate::infrastructure::InfraError;

/// One line of shell input.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
#[command(help_template = "{subcommands}")]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ShellCommand {
    /// Redraw the current level
    #[command(visible_alias = "ls")]
    Show,
    /// Open the sub-categories of a category (picker without index)
    Cd { index: Option<usize> },
    /// Go one level up
    Up,
    /// Jump to the root level
    Home,
    /// Jump to a breadcrumb
    Crumb { position: usize },
    /// Type a percentage into a legend field
    Set {
        index: usize,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Drag a slice to a percentage
    Drag {
        index: usize,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Switch between view and edit mode
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Log in (asks for the password)
    Login { username: Option<String> },
    /// Log out and return to view mode
    Logout,
    /// Submit the current allocation
    Save,
    /// Refresh participation stats
    Stats,
    /// Show the session
    Whoami,
    /// Leave the shell
    #[command(visible_alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Parse a raw input line. `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    ShellLine::try_parse_from(words).map(|l| Some(l.command))
}

pub struct Shell {
    controller: ViewController,
    selector: Arc<dyn Selector>,
    default_user: Option<String>,
}

impl Shell {
    pub fn new(
        controller: ViewController,
        selector: Arc<dyn Selector>,
        default_user: Option<String>,
    ) -> Self {
        Self {
            controller,
            selector,
            default_user,
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    /// Run until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> CliResult<()> {
        self.controller.init();
        output::hint("type 'help' for commands");

        loop {
            output::prompt(&self.prompt_label());
            let Some(line) = read_line(&mut input)? else {
                println!();
                break;
            };
            match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => {
                    if self.dispatch(command, &mut input)? == Flow::Quit {
                        break;
                    }
                }
                // also covers `help`
                Err(e) => print!("{e}"),
            }
        }
        Ok(())
    }

    fn prompt_label(&self) -> String {
        let state = self.controller.state();
        match state.mode {
            Mode::Edit => format!("budget[{}:edit]>", state.parent_id),
            Mode::View => format!("budget[{}]>", state.parent_id),
        }
    }

    #[instrument(skip(self, input))]
    fn dispatch<R: BufRead>(&mut self, command: ShellCommand, input: &mut R) -> CliResult<Flow> {
        match command {
            ShellCommand::Show => self.controller.render(),
            ShellCommand::Cd { index } => self.cd(index)?,
            ShellCommand::Up => {
                let at_root = self.controller.state().parent_id == self.controller.root();
                if at_root || self.controller.go_up().is_none() {
                    output::hint("already at the top level");
                }
            }
            ShellCommand::Home => {
                self.controller.load(self.controller.root());
            }
            ShellCommand::Crumb { position } => {
                if self.controller.navigate_crumb(position).is_none() {
                    output::hint("not a navigable breadcrumb");
                }
            }
            ShellCommand::Set { index, value } => {
                let outcome = self.controller.edit(index, &value);
                self.report_edit(outcome);
            }
            ShellCommand::Drag { index, value } => {
                let outcome = self.controller.drag(index, value);
                self.report_edit(outcome);
            }
            ShellCommand::Mode { mode } => self.switch_mode(mode.into(), input)?,
            ShellCommand::Login { username } => {
                self.login(username, input)?;
            }
            ShellCommand::Logout => self.controller.logout(),
            ShellCommand::Save => {
                if self.controller.save() == SaveOutcome::NotEditable {
                    output::warning("switch to edit mode to save");
                }
            }
            ShellCommand::Stats => {
                self.controller.load_stats();
            }
            ShellCommand::Whoami => {
                self.controller.check_auth();
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn cd(&mut self, index: Option<usize>) -> CliResult<()> {
        let index = match index {
            Some(i) => i,
            None => {
                let items = self.controller.selection_items();
                let picked = self
                    .selector
                    .select_one(&items, "category> ")
                    .map_err(|message| InfraError::Selector { message })?;
                match picked {
                    Some(item) => item.index,
                    None => return Ok(()),
                }
            }
        };
        match self.controller.drill_into(index) {
            Ok(outcome) => debug!(?outcome, "cd"),
            Err(e) => output::error(&e),
        }
        Ok(())
    }

    fn report_edit(&self, outcome: Adjustment) {
        if !outcome.is_applied() && !self.controller.state().is_editable() {
            output::warning("read-only: use 'mode edit' to change allocations");
        }
    }

    fn switch_mode<R: BufRead>(&mut self, mode: Mode, input: &mut R) -> CliResult<()> {
        if self.controller.switch_mode(mode) == ModeChange::LoginRequired {
            output::warning("log in to edit");
            if self.login(None, input)? {
                self.controller.switch_mode(mode);
            }
        }
        Ok(())
    }

    fn login<R: BufRead>(&mut self, username: Option<String>, input: &mut R) -> CliResult<bool> {
        let username = match username.or_else(|| self.default_user.clone()) {
            Some(u) => u,
            None => {
                output::prompt("username:");
                match read_line(input)? {
                    Some(u) if !u.trim().is_empty() => u.trim().to_string(),
                    _ => return Ok(false),
                }
            }
        };
        output::prompt("password:");
        let password = read_line(input)?.unwrap_or_default();
        Ok(self.controller.login(&username, &password))
    }
}

/// Next line without its line terminator; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> CliResult<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| InfraError::io("read from terminal", e))?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
