/// Deck Engine — Command-Line Tracker
///
/// Every command opens the session stored under `--data-dir`, applies
/// one operation, and saves when something changed. `show` prints the
/// ledger; `verify` replays the stored log and reports its hash.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use deck_engine::deltas::format_delta;
use deck_engine::events::{EventKind, EventRecord};
use deck_engine::scoring::{ScoreWeights, Tier};
use deck_engine::selection::{allowed_conditions, Selection, SelectionError};
use deck_engine::taxonomy::{Category, Condition, EventType, RoleId};
use deck_engine::tracker::SubmitError;
use deck_engine::view::{LedgerView, RoleView};

use deck_runtime::blob_store::FileBlobStore;
use deck_runtime::replay::{inspect_log, verify_determinism, DeterminismError};
use deck_runtime::save_codec::SaveError;
use deck_runtime::session::{LoadOutcome, Session};

#[derive(Parser, Debug)]
#[command(name = "deck", version, about = "Track card events per role and score them")]
struct Cli {
    /// Directory holding the save blobs.
    #[arg(long, env = "DECK_DATA_DIR", default_value = ".deck")]
    data_dir: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print inventories, scores and logs.
    Show {
        /// Only this role.
        #[arg(long)]
        role: Option<RoleId>,
    },
    /// Record an event for the current role (or `--role`).
    Add {
        event: EventType,
        category: Category,
        condition: Condition,
        /// Source category, transform only.
        #[arg(long)]
        src_category: Option<Category>,
        /// Source condition, transform only.
        #[arg(long)]
        src_condition: Option<Condition>,
        #[arg(long)]
        role: Option<RoleId>,
    },
    /// Remove the most recent event.
    Undo,
    /// Remove every event.
    Clear {
        /// Required; clearing cannot be undone.
        #[arg(long)]
        yes: bool,
    },
    /// Make a role current.
    Select { role: RoleId },
    /// Give a role a custom name.
    Rename { role: RoleId, name: String },
    /// Set the tier (clamped to 0..=15).
    Tier {
        #[arg(allow_negative_numbers = true)]
        tier: i64,
    },
    /// Delete the stored save, current and legacy.
    ResetSave,
    /// Replay the stored log twice and check it.
    Verify,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot open data dir: {0}")]
    Store(#[from] io::Error),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Determinism(#[from] DeterminismError),
    #[error("{event_type} cannot produce a {condition} card; pick one of: {allowed}")]
    ConditionNotAllowed {
        event_type: EventType,
        condition: Condition,
        allowed: String,
    },
    #[error("transform needs both --src-category and --src-condition")]
    PartialSource,
    #[error("refusing to clear without --yes")]
    ClearNotConfirmed,
    #[error("role name must not be blank")]
    BlankName,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let store = FileBlobStore::open(&cli.data_dir)?;
    let (mut session, outcome) = Session::open(store, ScoreWeights::default())?;
    if let LoadOutcome::Malformed { key } = outcome {
        eprintln!("warning: save {key} was unreadable; started fresh");
    }

    match cli.cmd {
        Command::Show { role } => {
            print_ledger(&session.tracker().view(), role);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Verify => return verify(session.tracker().events()),
        Command::ResetSave => {
            session.clear_save()?;
            println!("save removed");
            return Ok(ExitCode::SUCCESS);
        }
        Command::Add {
            event,
            category,
            condition,
            src_category,
            src_condition,
            role,
        } => {
            let mut selection = Selection::new(event, category, condition);
            match (src_category, src_condition) {
                (Some(c), Some(k)) => selection = selection.with_source(c, k),
                (None, None) => {}
                _ => return Err(CliError::PartialSource),
            }
            let tracker = session.tracker_mut();
            if let Some(role) = role {
                tracker.select_role(role);
            }
            let record = tracker.submit(&selection).map_err(submit_error)?;
            println!("#{} {}", record.id, describe(&record));
        }
        Command::Undo => match session.tracker_mut().undo_last() {
            Some(record) => println!("undid #{} {}", record.id, describe(&record)),
            None => {
                println!("nothing to undo");
                return Ok(ExitCode::SUCCESS);
            }
        },
        Command::Clear { yes } => {
            if !yes {
                return Err(CliError::ClearNotConfirmed);
            }
            session.tracker_mut().clear();
            println!("log cleared");
        }
        Command::Select { role } => {
            session.tracker_mut().select_role(role);
            println!("current role: {}", session.tracker().role_name(role));
        }
        Command::Rename { role, name } => {
            if !session.tracker_mut().rename_role(role, &name) {
                return Err(CliError::BlankName);
            }
            println!("{role} is now {}", session.tracker().role_name(role));
        }
        Command::Tier { tier } => {
            let tier = Tier::clamped(tier);
            session.tracker_mut().set_tier(tier);
            println!("tier {} (cap {})", tier.value(), tier.cap());
        }
    }

    session.save()?;
    Ok(ExitCode::SUCCESS)
}

fn submit_error(e: SubmitError) -> CliError {
    match e {
        SubmitError::Selection(SelectionError::ConditionNotAllowed { event_type, condition }) => {
            let allowed: Vec<&str> = allowed_conditions(event_type)
                .into_iter()
                .map(Condition::id)
                .collect();
            CliError::ConditionNotAllowed {
                event_type,
                condition,
                allowed: allowed.join(", "),
            }
        }
        other => other.into(),
    }
}

fn verify(events: &[EventRecord]) -> Result<ExitCode, CliError> {
    let weights = ScoreWeights::default();
    let hash = verify_determinism(events, &weights)?;
    let report = inspect_log(events, &weights);
    println!("events: {}", report.events);
    println!("hash:   {hash}");
    match report.rejected {
        None => {
            println!("[OK] log replays without clamping");
            Ok(ExitCode::SUCCESS)
        }
        Some(at) => {
            println!("[FAIL] {at}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn describe(record: &EventRecord) -> String {
    match record.kind {
        EventKind::Transform { src, dst } => format!("{} transform {src} -> {dst}", record.role),
        kind => format!("{} {} {}", record.role, kind.event_type(), kind.dst()),
    }
}

fn print_ledger(view: &LedgerView, only: Option<RoleId>) {
    if view.cap > 0 {
        println!("cap: {}", view.cap);
    } else {
        println!("cap: none (relative progress)");
    }
    for role_view in view.roles.values() {
        if only.is_some_and(|r| r != role_view.role) {
            continue;
        }
        print_role(role_view, role_view.role == view.current_role);
    }
}

fn print_role(v: &RoleView, current: bool) {
    let marker = if current { "*" } else { " " };
    println!();
    println!(
        "{marker} {} [{}]  score {} (cards {}, events {}){}  progress {}.{:02}%",
        v.name,
        v.role,
        v.score.total,
        v.score.inventory_score,
        v.score.event_score,
        if v.over_cap { "  OVER CAP" } else { "" },
        v.progress_bp / 100,
        v.progress_bp % 100,
    );

    let held: Vec<String> = v
        .inventory
        .nonzero()
        .map(|(slot, n)| format!("{slot} x{n}"))
        .collect();
    println!("  cards:  {}", if held.is_empty() { "-".to_string() } else { held.join(", ") });

    let counts: Vec<String> = EventType::ALL
        .into_iter()
        .map(|t| format!("{t} {}", v.statistics.get(t)))
        .collect();
    println!(
        "  events: {} ({} total, {} character deletes)",
        counts.join(", "),
        v.statistics.total(),
        v.statistics.delete_character
    );

    for row in v.rows.iter().rev() {
        println!(
            "  {:>4}. {:<40} {:>6}",
            row.number,
            describe(&row.record),
            format_delta(row.delta)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use deck_runtime::save_codec::STORAGE_KEY;

    fn deck(dir: &Path, args: &[&str]) -> Result<ExitCode, CliError> {
        let mut argv = vec![
            "deck".to_string(),
            "--data-dir".to_string(),
            dir.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        run(Cli::try_parse_from(argv).unwrap())
    }

    fn saved(dir: &Path) -> Option<serde_json::Value> {
        let raw = fs::read_to_string(dir.join(format!("{STORAGE_KEY}.json"))).ok()?;
        Some(serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_mutations_save_and_reads_do_not() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(deck(dir.path(), &["show"]).unwrap(), ExitCode::SUCCESS);
        assert_eq!(deck(dir.path(), &["verify"]).unwrap(), ExitCode::SUCCESS);
        assert!(saved(dir.path()).is_none());

        deck(dir.path(), &["tier", "3"]).unwrap();
        deck(dir.path(), &["add", "gain", "monster", "normal", "--role", "char2"]).unwrap();
        let blob = saved(dir.path()).unwrap();
        assert_eq!(blob["tier"], 3);
        assert_eq!(blob["currentRole"], "char2");
        assert_eq!(blob["logs"].as_array().unwrap().len(), 1);
        assert_eq!(blob["logs"][0]["eventType"], "gain");

        deck(dir.path(), &["undo"]).unwrap();
        assert!(saved(dir.path()).unwrap()["logs"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_negative_tier_clamps_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        deck(dir.path(), &["tier", "-4"]).unwrap();
        assert_eq!(saved(dir.path()).unwrap()["tier"], 0);
    }

    #[test]
    fn test_clear_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        deck(dir.path(), &["add", "gain", "neutral", "normal"]).unwrap();

        let err = deck(dir.path(), &["clear"]).unwrap_err();
        assert!(matches!(err, CliError::ClearNotConfirmed));
        assert_eq!(saved(dir.path()).unwrap()["logs"].as_array().unwrap().len(), 1);

        deck(dir.path(), &["clear", "--yes"]).unwrap();
        assert!(saved(dir.path()).unwrap()["logs"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_transform_needs_whole_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = deck(
            dir.path(),
            &["add", "transform", "monster", "normal", "--src-category", "character"],
        )
        .unwrap_err();
        assert!(matches!(err, CliError::PartialSource));
        assert!(saved(dir.path()).is_none());

        deck(
            dir.path(),
            &[
                "add",
                "transform",
                "monster",
                "normal",
                "--src-category",
                "character",
                "--src-condition",
                "normal",
            ],
        )
        .unwrap();
        let blob = saved(dir.path()).unwrap();
        assert_eq!(blob["logs"][0]["srcCardType"], "character");
    }

    #[test]
    fn test_disallowed_condition_lists_alternatives() {
        let dir = tempfile::tempdir().unwrap();
        let err = deck(dir.path(), &["add", "flash", "neutral", "normal"]).unwrap_err();
        match err {
            CliError::ConditionNotAllowed { event_type, condition, allowed } => {
                assert_eq!(event_type, EventType::Flash);
                assert_eq!(condition, Condition::Normal);
                assert_eq!(allowed, "foil, godfoil");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_fails_on_invalid_log() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(format!("{STORAGE_KEY}.json")),
            r#"{"logs":[{"id":1,"targetRole":"char1","eventType":"delete","cardType":"monster","foilType":"normal"}],"currentRole":"char1","tier":0}"#,
        )
        .unwrap();
        let before = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();

        assert_eq!(deck(dir.path(), &["verify"]).unwrap(), ExitCode::FAILURE);
        let after = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json"))).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reset_save_removes_blob() {
        let dir = tempfile::tempdir().unwrap();
        deck(dir.path(), &["rename", "char1", "Ada"]).unwrap();
        assert_eq!(saved(dir.path()).unwrap()["roleNames"]["char1"], "Ada");

        deck(dir.path(), &["reset-save"]).unwrap();
        assert!(saved(dir.path()).is_none());
    }
}
