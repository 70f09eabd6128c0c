mod client;
mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use commcal_core::{DateKey, EventId, Frequency};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "commcal")]
#[command(about = "Browse, create and share community calendar events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month as a calendar grid
    Month {
        /// Year to show (defaults to the current year)
        #[arg(long, allow_negative_numbers = true)]
        year: Option<i32>,

        /// Month to show, 1-12 (defaults to the current month); 13 rolls
        /// into January of the next year, 0 into December of the previous
        #[arg(long, allow_negative_numbers = true)]
        month: Option<i32>,

        /// Events shown per day before collapsing into "+N more"
        #[arg(long)]
        per_day: Option<usize>,
    },
    /// List occurrences day by day
    List {
        /// Show occurrences from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Show occurrences until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Create an event
    New {
        title: String,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Change an existing event
    Edit {
        id: EventId,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: EventFields,

        /// Stop the event from repeating
        #[arg(long, conflicts_with_all = ["repeat", "every", "until"])]
        no_repeat: bool,

        /// Make the event all day
        #[arg(long, conflicts_with = "time")]
        all_day: bool,
    },
    /// Delete an event
    Delete { id: EventId },
    /// Print a link to an event
    Share {
        id: EventId,

        /// Print an email invitation link instead
        #[arg(long, conflicts_with = "whatsapp")]
        email: bool,

        /// Print a WhatsApp message link instead
        #[arg(long)]
        whatsapp: bool,

        /// Open the link instead of printing it
        #[arg(long)]
        open: bool,
    },
    /// Show the event a share link points at
    Open { url: String },
    /// Show event counts
    Stats,
    /// Download the calendar as an .ics file
    Export {
        #[arg(short, long, default_value = "community-calendar.ics")]
        output: PathBuf,
    },
}

/// Event fields shared by `new` and `edit`.
#[derive(clap::Args)]
struct EventFields {
    /// Date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<DateKey>,

    /// Time of day (HH:MM); omit for all-day events
    #[arg(short, long, value_parser = parse_time)]
    time: Option<NaiveTime>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    organizer: Option<String>,

    /// Repeat daily, weekly, monthly or yearly
    #[arg(long)]
    repeat: Option<Frequency>,

    /// Repeat every N periods
    #[arg(long, allow_negative_numbers = true)]
    every: Option<i64>,

    /// Last date an occurrence may fall on (YYYY-MM-DD)
    #[arg(long)]
    until: Option<DateKey>,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    commcal_core::wire::time_format::parse(s)
        .ok_or_else(|| format!("Invalid time '{}'. Expected HH:MM", s))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("COMMCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Month {
            year,
            month,
            per_day,
        } => commands::month::run(year, month, per_day).await,
        Commands::List { from, to } => commands::list::run(from, to).await,
        Commands::New { title, fields } => commands::new::run(title, fields).await,
        Commands::Edit {
            id,
            title,
            fields,
            no_repeat,
            all_day,
        } => commands::edit::run(id, title, fields, no_repeat, all_day).await,
        Commands::Delete { id } => commands::delete::run(id).await,
        Commands::Share {
            id,
            email,
            whatsapp,
            open,
        } => commands::share::run(id, email, whatsapp, open).await,
        Commands::Open { url } => commands::open::run(&url).await,
        Commands::Stats => commands::stats::run().await,
        Commands::Export { output } => commands::export::run(output).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_year_flags() {
        let cli = Cli::try_parse_from(["commcal", "month", "--year", "2024", "--month", "3"]).unwrap();
        let Commands::Month { year, month, per_day } = cli.command else {
            panic!("expected month");
        };
        assert_eq!((year, month, per_day), (Some(2024), Some(3), None));

        assert!(Cli::try_parse_from(["commcal", "month", "2024-03"]).is_err());
    }

    #[test]
    fn parses_new_with_recurrence() {
        let cli = Cli::try_parse_from([
            "commcal", "new", "Choir", "--date", "2024-03-05", "--time", "19:30", "--repeat",
            "weekly", "--every", "2",
        ])
        .unwrap();
        let Commands::New { title, fields } = cli.command else {
            panic!("expected new");
        };
        assert_eq!(title, "Choir");
        assert_eq!(fields.repeat, Some(Frequency::Weekly));
        assert_eq!(fields.every, Some(2));
        assert_eq!(fields.time, NaiveTime::from_hms_opt(19, 30, 0));
    }

    #[test]
    fn rejects_non_canonical_date() {
        assert!(Cli::try_parse_from(["commcal", "new", "X", "--date", "2024-3-5"]).is_err());
    }
}
