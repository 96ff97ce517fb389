//! studio-runner: headless runner for Studio Mogul.
//!
//! Usage:
//!   studio-runner --seed 12345 --weeks 520 --db run.db
//!   studio-runner --seed 12345 --period month --weeks 120
//!   studio-runner --seed 12345 --ipc-mode   (JSON lines on stdin/stdout)

use anyhow::Result;
use chrono::NaiveDate;
use std::env;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use studio_core::{
    bus::EventBus,
    clock::TimePeriod,
    command::PlayerCommand,
    config::EngineConfig,
    engine::{StepOutcome, StudioEngine},
    event::{
        Notification, TOPIC_AWARDS, TOPIC_ERA_CHANGED, TOPIC_EXPENSES, TOPIC_GAME_ENDED,
        TOPIC_MILESTONE, TOPIC_MONTH_PROCESSED, TOPIC_RANDOM_EVENT, TOPIC_RUNWAY, TOPIC_SCRIPTS,
        TOPIC_TIME_ADVANCED, TOPIC_TV_EVENT,
    },
    state::{Alert, EndingType},
    store::{attach_event_log, GameStore},
    types::Week,
};

/// Topics written to the event log. state:changed is left out; it carries
/// the whole state every step.
const LOGGED_TOPICS: &[&str] = &[
    TOPIC_TIME_ADVANCED,
    TOPIC_MONTH_PROCESSED,
    TOPIC_EXPENSES,
    TOPIC_RUNWAY,
    TOPIC_ERA_CHANGED,
    TOPIC_MILESTONE,
    TOPIC_SCRIPTS,
    TOPIC_AWARDS,
    TOPIC_TV_EVENT,
    TOPIC_RANDOM_EVENT,
    TOPIC_GAME_ENDED,
];

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Advance {
        period: TimePeriod,
        #[serde(default = "one")]
        count: u64,
    },
    Command {
        command: PlayerCommand,
    },
    Save {
        slot: String,
    },
    Load {
        slot: String,
    },
    Quit,
}

fn one() -> u64 {
    1
}

#[derive(serde::Serialize)]
struct UiState {
    week:              Week,
    date:              NaiveDate,
    year:              i32,
    era:               Option<&'static str>,
    cash:              f64,
    monthly_burn:      f64,
    reputation:        i32,
    active_films:      usize,
    completed_films:   usize,
    available_scripts: usize,
    alerts:            Vec<Alert>,
    notifications:     Vec<Notification>,
    game_ended:        bool,
    ending:            Option<EndingType>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let weeks = parse_arg(&args, "--weeks", 52u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let period: TimePeriod = flag_value(&args, "--period").unwrap_or("week").parse()?;
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");

    if !ipc_mode {
        println!("Studio Mogul: studio-runner");
        println!("  seed:      {seed}");
        println!("  steps:     {weeks} × {period}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let config = EngineConfig::load(data_dir)?;
    let store = if db == ":memory:" {
        GameStore::in_memory()?
    } else {
        GameStore::open(db)?
    };
    store.migrate()?;
    let store = Rc::new(store);

    let bus = EventBus::shared();
    let mut engine = StudioEngine::new_game("Monogram Pictures", config, Rc::clone(&bus), seed)?;
    let run_id = engine.run_id.clone();
    store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), &engine.state().studio_name)?;
    let _log_writers = attach_event_log(Rc::clone(&store), &bus, run_id.clone(), LOGGED_TOPICS);
    log::info!("run {run_id} started (seed {seed})");

    if ipc_mode {
        run_ipc_loop(&mut engine, &store)?;
    } else {
        let mut steps = 0;
        while steps < weeks {
            steps += 1;
            if engine.advance_time(period) == StepOutcome::AlreadyEnded {
                break;
            }
        }
        print_summary(&engine, &store, steps)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut StudioEngine, store: &GameStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e)?;
                continue;
            }
        };

        let result: Result<()> = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::Advance { period, count } => {
                for _ in 0..count {
                    if engine.advance_time(period) == StepOutcome::AlreadyEnded {
                        break;
                    }
                }
                Ok(())
            }
            IpcCommand::Command { command } => engine.apply_command(command).map_err(Into::into),
            IpcCommand::Save { slot } => store.save_game(&slot, &engine.save_game()).map_err(Into::into),
            IpcCommand::Load { slot } => store
                .load_game(&engine.run_id, &slot)
                .map(|save| engine.load_state(save.state))
                .map_err(Into::into),
        };

        match result {
            Ok(()) => {
                let state = build_ui_state(engine);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
                stdout.flush()?;
            }
            Err(e) => write_error(&mut stdout, &e)?,
        }
    }
    Ok(())
}

fn write_error(out: &mut impl Write, e: &dyn std::fmt::Display) -> Result<()> {
    let err_json = serde_json::json!({ "error": e.to_string() });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn build_ui_state(engine: &mut StudioEngine) -> UiState {
    let notifications = engine.drain_notifications();
    let state = engine.state();
    UiState {
        week:              state.game_week,
        date:              state.current_date,
        year:              state.game_year,
        era:               studio_core::era::era_for_year(state.game_year)
            .map(|key| studio_core::era::era_info(key).name),
        cash:              state.cash,
        monthly_burn:      state.monthly_burn,
        reputation:        state.reputation(),
        active_films:      state.active_films.len(),
        completed_films:   state.completed_films.len(),
        available_scripts: state.available_scripts.len(),
        alerts:            state.alerts.clone(),
        notifications,
        game_ended:        state.game_ended(),
        ending:            state.ending_type(),
    }
}

fn print_summary(engine: &StudioEngine, store: &GameStore, steps: u64) -> Result<()> {
    let state = engine.state();
    let logged = store.events_for_run(&engine.run_id)?.len();

    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {}", engine.run_id);
    println!("  steps run:       {steps}");
    println!("  final week:      {}", state.game_week);
    println!("  final date:      {}", state.current_date);
    println!("  cash:            ${:.0}", state.cash);
    println!("  monthly burn:    ${:.0}", state.monthly_burn);
    println!("  reputation:      {}", state.reputation());
    println!("  films released:  {}", state.stats.films_released);
    println!("  oscars won:      {}", state.stats.oscars_won);
    println!("  years survived:  {:.1}", state.stats.years_survived);
    println!("  events logged:   {logged}");

    println!();
    match state.ending_type() {
        Some(ending) => println!("=== GAME OVER: {ending:?} ==="),
        None => println!("=== STILL RUNNING ==="),
    }

    println!();
    println!("=== MILESTONES ===");
    if state.milestones_seen.is_empty() {
        println!("  (none yet)");
    } else {
        for m in &state.milestones_seen {
            println!("  {} | {}", m.date, m.key);
        }
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
