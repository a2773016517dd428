// Terminal output: notification sink and application tables

use colored::Colorize;
use jobtrack_core::application::StatusBoard;
use jobtrack_core::domain::{Application, NotificationKind};
use jobtrack_core::port::NotificationSink;
use tabled::{Table, Tabled};

/// Prints notifications as colored status lines
pub struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn notify(&self, kind: NotificationKind, title: &str, message: Option<&str>) {
        let headline = match kind {
            NotificationKind::Success => format!("✓ {title}").green().bold(),
            NotificationKind::Info => format!("• {title}").cyan().bold(),
            NotificationKind::Warning => format!("! {title}").yellow().bold(),
            NotificationKind::Error => format!("✗ {title}").red().bold(),
        };

        match kind {
            NotificationKind::Error | NotificationKind::Warning => {
                eprintln!("{headline}");
                if let Some(message) = message {
                    eprintln!("  {message}");
                }
            }
            NotificationKind::Success | NotificationKind::Info => {
                println!("{headline}");
                if let Some(message) = message {
                    println!("  {message}");
                }
            }
        }
    }
}

#[derive(Tabled)]
struct ApplicationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

impl From<&Application> for ApplicationRow {
    fn from(app: &Application) -> Self {
        Self {
            id: app.id.clone(),
            status: app.status.to_string(),
            title: app.job.title.clone(),
            company: app.job.company.clone(),
            updated: app.last_update.format("%Y-%m-%d %H:%M").to_string(),
            notes: app.notes.clone().unwrap_or_default(),
        }
    }
}

pub fn print_applications(applications: &[Application]) {
    if applications.is_empty() {
        println!("{}", "No tracked applications".yellow());
        return;
    }

    let rows: Vec<ApplicationRow> = applications.iter().map(ApplicationRow::from).collect();
    println!("{}", Table::new(rows));
}

pub fn print_application(app: &Application) {
    println!("  {} {}", "ID:".bold(), app.id);
    println!("  {} {}", "Job:".bold(), app.job.title);
    println!("  {} {}", "Company:".bold(), app.job.company);
    println!("  {} {}", "Link:".bold(), app.job.link);
    println!("  {} {}", "Status:".bold(), app.status);
    println!(
        "  {} {}",
        "Added:".bold(),
        app.date_added.format("%Y-%m-%d %H:%M")
    );
    if let Some(notes) = &app.notes {
        println!("  {} {}", "Notes:".bold(), notes);
    }
}

pub fn print_board(board: &StatusBoard) {
    println!(
        "{}",
        format!("Application pipeline ({} total)", board.total())
            .cyan()
            .bold()
    );

    for (status, column) in board.columns() {
        println!();
        println!("{} ({})", status.to_string().bold(), column.len());
        for app in column {
            println!("  - {} at {} [{}]", app.job.title, app.job.company, app.id);
        }
    }
}
