//! Yaruki CLI - record a day, review history and statistics.
//!
//! Thin presentation shell over `yaruki_core`; all invariants live in
//! the core crate.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;
use yaruki_core::time::{format_clock, parse_clock};
use yaruki_core::{
    build_chart_series, compute_stats, db::open_db, default_log_level, init_logging, DayEditor,
    DayService, Question, QuestionRepository, SqliteQuestionRepository, SqliteRecordRepository,
};

/// Daily motivation tracker.
#[derive(Parser)]
#[command(name = "yaruki", version, about = "Track daily yes/no habits, sleep and motivation")]
struct Cli {
    /// Database file path.
    #[arg(long, default_value = "yaruki.sqlite3")]
    db: PathBuf,

    /// User identity (UUID). Defaults to the single local profile.
    #[arg(long)]
    user: Option<Uuid>,

    /// Absolute directory for rolling log files; logging is off when
    /// omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active question catalog.
    Questions,

    /// Record or amend one day.
    Log {
        /// Day to record; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Wake-up time as HH:MM.
        #[arg(long)]
        wake: Option<String>,

        /// Bedtime of the previous evening as HH:MM.
        #[arg(long)]
        bed: Option<String>,

        /// Sleep score, 0-100.
        #[arg(long)]
        sleep_score: Option<u8>,

        /// Free-text notes.
        #[arg(long)]
        notes: Option<String>,

        /// Question key answered yes (repeatable).
        #[arg(long = "yes", value_name = "KEY")]
        yes: Vec<String>,

        /// Question key answered no (repeatable).
        #[arg(long = "no", value_name = "KEY")]
        no: Vec<String>,
    },

    /// Show one day's stored state.
    Show {
        /// Day to show; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List the record history, newest first.
    History,

    /// Summary statistics over the whole history.
    Stats {
        /// Emit machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Chart series as JSON, oldest day first.
    Chart,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(default_log_level(), &log_dir.to_string_lossy())?;
    }

    let mut conn = open_db(&cli.db).map_err(|err| err.to_string())?;
    let questions = SqliteQuestionRepository::try_new(&conn)
        .map_err(|err| err.to_string())?
        .list_active()
        .map_err(|err| err.to_string())?;

    // Single-machine default profile; the core treats the id as opaque.
    let user_id = cli.user.unwrap_or(Uuid::nil());

    match cli.command {
        Commands::Questions => {
            for question in &questions {
                println!("{:<14} {}", question.question_key, question.question_text);
            }
            Ok(())
        }
        Commands::Log {
            date,
            wake,
            bed,
            sleep_score,
            notes,
            yes,
            no,
        } => {
            let date = date.unwrap_or_else(today);
            let repo =
                SqliteRecordRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
            let mut service = DayService::new(repo);

            let mut editor = service.load_editor_or_blank(user_id, date, &questions);
            if let Some(value) = wake {
                editor.draft.wake_up_time = Some(parse_clock(&value).map_err(|e| e.to_string())?);
            }
            if let Some(value) = bed {
                editor.draft.bedtime = Some(parse_clock(&value).map_err(|e| e.to_string())?);
            }
            if sleep_score.is_some() {
                editor.draft.sleep_score = sleep_score;
            }
            if notes.is_some() {
                editor.draft.notes = notes;
            }
            apply_answers(&mut editor, &questions, &yes, true)?;
            apply_answers(&mut editor, &questions, &no, false)?;

            let record = service
                .save(&editor, &questions)
                .map_err(|err| err.to_string())?;
            println!(
                "saved {}: score {}/{}",
                record.record_date,
                record.total_score,
                questions.len()
            );
            Ok(())
        }
        Commands::Show { date } => {
            let date = date.unwrap_or_else(today);
            let repo =
                SqliteRecordRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
            let service = DayService::new(repo);
            let editor = service
                .load_editor(user_id, date, &questions)
                .map_err(|err| err.to_string())?;

            println!("{date}  score {}/{}", editor.score(), questions.len());
            println!("  wake:        {}", clock_or_dash(editor.draft.wake_up_time));
            println!("  bed:         {}", clock_or_dash(editor.draft.bedtime));
            println!(
                "  sleep score: {}",
                editor
                    .draft
                    .sleep_score
                    .map_or_else(|| "-".to_string(), |v| v.to_string())
            );
            if let Some(notes) = &editor.draft.notes {
                println!("  notes:       {notes}");
            }
            for question in &questions {
                let mark = match editor.answers.get(&question.question_key) {
                    Some(true) => "yes",
                    Some(false) => "no",
                    None => "-",
                };
                println!("  {:<14} {mark}", question.question_key);
            }
            Ok(())
        }
        Commands::History => {
            let repo =
                SqliteRecordRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
            let service = DayService::new(repo);
            let records = service.history(user_id).map_err(|err| err.to_string())?;
            if records.is_empty() {
                println!("no records yet");
                return Ok(());
            }
            for record in &records {
                println!(
                    "{}  score {:>2}  wake {}  bed {}  sleep {}",
                    record.record_date,
                    record.total_score,
                    clock_or_dash(record.wake_up_time),
                    clock_or_dash(record.bedtime),
                    record
                        .sleep_score
                        .map_or_else(|| "-".to_string(), |v| v.to_string())
                );
            }
            Ok(())
        }
        Commands::Stats { json } => {
            let repo =
                SqliteRecordRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
            let service = DayService::new(repo);
            let records = service.history(user_id).map_err(|err| err.to_string())?;
            let stats = compute_stats(&records);

            if json {
                let rendered =
                    serde_json::to_string_pretty(&stats).map_err(|err| err.to_string())?;
                println!("{rendered}");
            } else {
                println!("records:         {}", records.len());
                println!("average score:   {:.1}", stats.avg_score);
                println!("max score:       {}", stats.max_score);
                println!("recent trend:    {:+}", stats.recent_trend);
                match stats.avg_sleep_score {
                    Some(avg) => println!("avg sleep score: {avg:.1}"),
                    None => println!("avg sleep score: no data"),
                }
            }
            Ok(())
        }
        Commands::Chart => {
            let repo =
                SqliteRecordRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
            let service = DayService::new(repo);
            let mut records = service.history(user_id).map_err(|err| err.to_string())?;
            // Charts read left to right; flip the newest-first history.
            records.reverse();
            let series = build_chart_series(&records);
            let rendered = serde_json::to_string_pretty(&series).map_err(|err| err.to_string())?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn apply_answers(
    editor: &mut DayEditor,
    questions: &[Question],
    keys: &[String],
    value: bool,
) -> Result<(), String> {
    for key in keys {
        if !editor.set_answer(key, Some(value)) {
            let known: Vec<&str> = questions
                .iter()
                .map(|question| question.question_key.as_str())
                .collect();
            return Err(format!(
                "unknown question key `{key}`; expected one of: {}",
                known.join(", ")
            ));
        }
    }
    Ok(())
}

fn clock_or_dash(value: Option<chrono::NaiveTime>) -> String {
    value.map_or_else(|| "-".to_string(), format_clock)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
