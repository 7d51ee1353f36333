use chrono::NaiveDate;
use clap::Parser;
use crossterm::style::Stylize;
use patro_core::{arabic_to_numeral, logging, CalendarConfig, DateConverter, NepaliDate};
use std::path::PathBuf;
use std::process::ExitCode;

/// Bikram Sambat date for a Gregorian date (today by default).
#[derive(Parser, Debug)]
#[command(name = "patro", version, about = "Nepali calendar date lookup")]
struct Args {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List the years that have records instead of converting.
    #[arg(long)]
    years: bool,

    /// Gregorian date to convert, as YYYY-MM-DD.
    #[arg(value_parser = parse_date)]
    date: Option<NaiveDate>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => match CalendarConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[ERROR] Could not load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => CalendarConfig::default(),
    };
    tracing::info!(data_dir = %config.data_dir.display(), "using calendar data");

    let converter = DateConverter::from_config(&config);

    if args.years {
        let years = converter.list_available_years();
        if years.is_empty() {
            println!("No year records in {}", config.data_dir.display());
        }
        for year in years {
            println!("{year}  {}", arabic_to_numeral(&year.to_string()));
        }
        return ExitCode::SUCCESS;
    }

    match converter.convert_or_today(args.date) {
        Ok(date) => {
            print_date(&date);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("N/A: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_date(date: &NepaliDate) {
    let numerals = format!(
        "{}/{}/{}",
        arabic_to_numeral(&date.year().to_string()),
        arabic_to_numeral(&date.month_number().to_string()),
        date.day_in_numerals()
    );
    let headline = format!("{}  ({numerals})", date.formatted());
    if date.is_holiday() {
        println!("{}", headline.red().bold());
    } else {
        println!("{}", headline.bold());
    }

    let Some(notes) = date.annotations() else {
        println!("{}", String::from("(from month lengths only; no day details)").dim());
        return;
    };
    println!("Weekday: {:?}", notes.weekday);
    if let Some(tithi) = &notes.tithi {
        println!("Tithi:   {tithi}");
    }
    match &notes.event {
        Some(event) => println!("Event:   {}", event.clone().yellow()),
        None => println!("Event:   No events"),
    }
}
