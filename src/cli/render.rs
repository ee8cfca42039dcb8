//! Terminal renderer: legend, bars, breadcrumbs and toasts on stdout/stderr

use colored::Colorize;
use itertools::Itertools;

use crate::application::presentation::{AllocationView, BreadcrumbTrail, LegendRow};
use crate::cli::output;
use crate::domain::{Session, ToastKind};
use crate::infrastructure::traits::Renderer;

const BAR_WIDTH: usize = 24;
const NAME_WIDTH: usize = 28;

/// Draws the controller's output as plain terminal text.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    fn row(row: &LegendRow, editable: bool) -> String {
        let index = if editable {
            format!("[{}]", row.index).bold().to_string()
        } else {
            format!(" {} ", row.index)
        };
        format!(
            "{} {:>4} {:<width$} {} {:>7} %",
            output::swatch(row.color),
            index,
            truncate(&row.name, NAME_WIDTH),
            output::bar(row.share, BAR_WIDTH, row.color),
            row.value,
            width = NAME_WIDTH,
        )
    }
}

/// Cut `s` to `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Breadcrumb line; navigable crumbs carry their position for `crumb <n>`.
pub fn format_trail(trail: &BreadcrumbTrail) -> String {
    trail
        .crumbs
        .iter()
        .enumerate()
        .map(|(i, crumb)| match crumb.target {
            Some(_) => format!("{} {}", crumb.name, format!("({i})").dimmed()),
            None => crumb.name.bold().to_string(),
        })
        .join(" › ")
}

impl Renderer for TerminalRenderer {
    fn render_allocations(&self, view: &AllocationView) {
        println!();
        for row in &view.rows {
            output::info(&Self::row(row, view.editable));
            if let Some(description) = &row.description {
                output::hint(&format!("          {description}"));
            }
        }

        let total = if view.total_warning {
            view.total.yellow().bold()
        } else {
            view.total.green()
        };
        println!(
            "{:>width$} {}",
            "Total",
            total,
            width = 7 + NAME_WIDTH + BAR_WIDTH
        );

        if view.editable {
            output::hint("set <n> <value> · drag <n> <value> · save");
        }
        if view.back_visible {
            output::hint("up · back to the previous level");
        }
    }

    fn render_breadcrumbs(&self, trail: &BreadcrumbTrail) {
        output::header(&format_trail(trail));
    }

    fn render_session(&self, session: &Session) {
        match (session.logged_in, session.username.as_deref()) {
            (true, Some(name)) => output::action("Logged in as", &name.bold()),
            (true, None) => output::action("Logged in", &""),
            (false, _) => output::hint("Not logged in · login to edit"),
        }
    }

    fn render_stats(&self, line: &str) {
        output::hint(line);
    }

    fn toast(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Success => output::success(message),
            ToastKind::Error => output::error(message),
        }
    }
}
