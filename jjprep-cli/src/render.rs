//! Terminal rendering for connection status and plan previews.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use jjprep_core::preview::PreviewDay;
use jjprep_core::protocol::ConnectionStatus;

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

pub fn render_status(status: &ConnectionStatus) -> String {
    if status.connected {
        match &status.email {
            Some(email) => format!("{} {}", "Connected:".green(), email),
            None => "Connected".green().to_string(),
        }
    } else {
        "Not connected".red().to_string()
    }
}

pub fn render_day(day: &PreviewDay) -> String {
    let mut lines = vec![format!("📅 Day {} {}", day.day, day.date.dimmed())];

    if day.tasks.is_empty() {
        lines.push(format!("   {}", "(no tasks)".dimmed()));
    }

    for task in &day.tasks {
        let mut line = format!("   {} {}", "•".green(), task.title);

        if let Some(duration) = task.duration {
            line.push_str(&format!(" {}", format!("({} min)", duration).dimmed()));
        }
        if let Some(kind) = &task.task_type {
            line.push_str(&format!(" {}", format!("[{}]", kind).yellow()));
        }

        lines.push(line);

        if let Some(gap) = &task.gap {
            lines.push(format!("      {}", format!("gap: {}", gap).dimmed()));
        }
    }

    lines.join("\n")
}
