//! Command-line driver: compile a `.ras` timetable and dump the result.
//!
//! Usage:
//!   ras2cal -i raspored.ras --stdout
//!   ras2cal -i raspored.ras --teacher "Ana" --semester-start 2025-09-29 --stdout
//!   ras2cal -i raspored.ras --ast

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{warn, Level};
use tracing_subscriber::EnvFilter;

use ras2cal::config::{parse_date, CompilerConfig, Settings};
use ras2cal::dsl::{compile_schedule, Compiler};
use ras2cal::filter::{filter_schedule, ScheduleFilter};
use ras2cal::source::load_source;

/// Timetable DSL compiler
#[derive(Parser, Debug)]
#[command(name = "ras2cal", version)]
#[command(about = "Compile a .ras timetable into a resolved schedule model")]
struct Args {
    /// Input .ras file
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// YAML settings file (default: ~/.ras2cal/config.yaml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Semester start (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    semester_start: Option<NaiveDate>,

    /// Semester end (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    semester_end: Option<NaiveDate>,

    /// Semester length in weeks, used when the source gives none
    #[arg(long)]
    semester_duration: Option<u32>,

    /// Semester title
    #[arg(long)]
    semester_title: Option<String>,

    /// Start of the first slot (HH:MM)
    #[arg(long)]
    base_time: Option<String>,

    /// Slot length in minutes
    #[arg(long)]
    duration: Option<u32>,

    /// Slots per index
    #[arg(long)]
    slots_per_index: Option<u32>,

    /// Keep only assignments with a matching teacher (regex)
    #[arg(long)]
    teacher: Option<String>,

    /// Keep only assignments with a matching room (regex)
    #[arg(long)]
    room: Option<String>,

    /// Keep only assignments with a matching group (regex)
    #[arg(long)]
    group: Option<String>,

    /// Keep only assignments with a matching subject (regex)
    #[arg(long)]
    subject: Option<String>,

    /// Print the parsed tree instead of compiling
    #[arg(long, short = 'a')]
    ast: bool,

    /// Print the compiled model as JSON
    #[arg(long, short = 's')]
    stdout: bool,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

impl Args {
    fn settings(&self) -> Result<Settings, Box<dyn std::error::Error>> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_path(path)?,
            None => Settings::load().unwrap_or_default(),
        };

        if self.semester_start.is_some() {
            settings.semester_start = self.semester_start;
        }
        if self.semester_end.is_some() {
            settings.semester_end = self.semester_end;
        }
        if let Some(weeks) = self.semester_duration {
            settings.semester_duration_weeks = weeks;
        }
        if let Some(title) = &self.semester_title {
            settings.semester_title = Some(title.clone());
        }
        if let Some(base_time) = &self.base_time {
            settings.base_time = base_time.clone();
        }
        if let Some(minutes) = self.duration {
            settings.slot_duration = minutes;
        }
        if let Some(n) = self.slots_per_index {
            settings.slots_per_index = n;
        }

        Ok(settings)
    }

    fn filter(&self) -> ScheduleFilter {
        ScheduleFilter {
            teacher: self.teacher.clone(),
            room: self.room.clone(),
            group: self.group.clone(),
            subject: self.subject.clone(),
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.settings()?;
    let source = load_source(&args.input)?;

    let (schedule, diagnostics) = Compiler::parse_with_diagnostics(&source)?;
    if !diagnostics.is_empty() {
        warn!(skipped = diagnostics.len(), "some tokens were not recognized");
    }

    let filter = args.filter();
    let schedule = if filter.is_empty() {
        schedule
    } else {
        filter_schedule(&schedule, &filter)?
    };

    if args.ast {
        println!("{schedule}");
        println!("{schedule:#?}");
        return Ok(());
    }

    let config = CompilerConfig::resolve(&settings, &schedule, Local::now().date_naive())?;
    let model = compile_schedule(&schedule, &config)?;

    if args.stdout {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        println!(
            "{}: {} events ({} - {})",
            model.semester_name,
            model.events.len(),
            model.start_date,
            model.end_date
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "slot_duration: 45\nbase_time: \"07:00\"\n").unwrap();

        let args = Args::try_parse_from([
            "ras2cal",
            "-i",
            "raspored.ras",
            "--config",
            config.to_str().unwrap(),
            "--duration",
            "60",
            "--semester-start",
            "29.09.2025",
        ])
        .unwrap();
        let settings = args.settings().unwrap();
        assert_eq!(settings.slot_duration, 60);
        assert_eq!(settings.base_time, "07:00");
        assert_eq!(settings.semester_start, NaiveDate::from_ymd_opt(2025, 9, 29));
    }

    #[test]
    fn run_succeeds_with_skipped_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raspored.ras");
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "slot_duration: 30\n").unwrap();
        std::fs::write(
            &input,
            "Srijeda je dan broj 3.\nS1 je termin broj 1 dana Srijeda.\nbesmislica.\n\
             Ana predaje pFizika tacno u terminu S1.\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "ras2cal",
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        let source = load_source(&args.input).unwrap();
        let (_, diagnostics) = Compiler::parse_with_diagnostics(&source).unwrap();
        assert_eq!(diagnostics[0].text, "besmislica");
        run(&args).unwrap();
    }
}
