use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use stay_calendar::calendar::WEEKDAY_LABELS;
use stay_calendar::{
    AvailabilityCalendar, AvailabilityClient, AvailabilityLoader, CalendarDay, Config,
    LoadOutcome, MonthGrid,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stay-calendar")]
#[command(about = "Preview a rental property's booking calendar")]
#[command(version)]
struct Cli {
    /// Property to load availability for
    property_id: String,

    /// Config file (defaults to ./stay-calendar.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Month to show, as YYYY-MM (defaults to the current month)
    #[arg(short, long)]
    month: Option<String>,

    /// Override today's date, as YYYY-MM-DD
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Simulate clicking a check-in and a check-out day
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    select: Option<Vec<NaiveDate>>,

    /// Print the month grid as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    info!("📅 Stay Calendar - property {}", cli.property_id);

    let client = AvailabilityClient::new(&config.api)?;
    let loader = AvailabilityLoader::new(Arc::new(client), config.calendar.horizon_months);

    let mut calendar = AvailabilityCalendar::new(today)
        .with_layout(config.calendar.week_layout)
        .with_horizon(config.calendar.horizon_months)
        .on_commit(|range| info!("✅ Range committed: {}", range));

    match loader.load(&cli.property_id, today).await {
        LoadOutcome::Fresh(snapshot) => {
            calendar.apply_snapshot(snapshot)?;
        }
        LoadOutcome::Stale { token } => warn!("Load #{} was superseded", token),
    }
    if let Some(banner) = calendar.banner() {
        eprintln!("⚠️  {}", banner);
    }

    if let Some(month) = &cli.month {
        let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}', expected YYYY-MM", month))?;
        calendar.show_month_of(first);
    }

    if let Some(days) = &cli.select {
        for day in days {
            match calendar.click(*day) {
                Ok(Some(range)) => {
                    calendar.show_month_of(range.start);
                    println!("Booked {}", range);
                }
                Ok(None) => {}
                Err(e) => println!("Not bookable: {}", e),
            }
        }
    }

    let grid = calendar.month_grid();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        print_grid(&grid);
    }

    Ok(())
}

fn print_grid(grid: &MonthGrid) {
    println!("{:^28}", grid.title());
    println!(
        "{}",
        WEEKDAY_LABELS
            .iter()
            .map(|label| format!("{:>3} ", label))
            .collect::<String>()
    );
    for week in &grid.weeks {
        let line: String = week.days.iter().map(cell).collect();
        println!("{}", line.trim_end());
    }
    println!();
    println!("x unavailable   * selected   ~ preview   ! today");
}

fn cell(day: &CalendarDay) -> String {
    if !day.is_current_month {
        return "    ".to_string();
    }
    let marker = if day.is_selected {
        '*'
    } else if day.is_hovering {
        '~'
    } else if day.is_today {
        '!'
    } else if day.is_unavailable {
        'x'
    } else {
        ' '
    };
    format!("{:>3}{}", day.date.day(), marker)
}
