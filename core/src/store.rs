//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never touches the store; saves are explicit and the event
//! log is fed by a bus subscriber.

use std::{cell::Cell, rc::Rc};

use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    bus::{EventBus, Subscription},
    error::{StudioError, StudioResult},
    event::{BusEvent, EventLogEntry},
    snapshot::SaveGame,
    types::{RunId, Week},
};

pub struct GameStore {
    conn: Connection,
}

impl GameStore {
    /// Open (or create) the game database at `path`.
    pub fn open(path: &str) -> StudioResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StudioResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StudioResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str, studio_name: &str) -> StudioResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, studio_name) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, studio_name],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> StudioResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, week, topic, payload) VALUES (?1, ?2, ?3, ?4)",
            params![entry.run_id, entry.week as i64, entry.topic, entry.payload],
        )?;
        Ok(())
    }

    pub fn events_for_week(&self, run_id: &str, week: Week) -> StudioResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, run_id, week, topic, payload
             FROM event_log WHERE run_id = ?1 AND week = ?2
             ORDER BY id ASC",
            params![run_id, week as i64],
        )
    }

    pub fn events_for_run(&self, run_id: &str) -> StudioResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, run_id, week, topic, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
            params![run_id],
        )
    }

    fn query_events(&self, sql: &str, args: impl rusqlite::Params) -> StudioResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt.query_map(args, |row| {
            Ok(EventLogEntry {
                id:      Some(row.get(0)?),
                run_id:  row.get(1)?,
                week:    row.get::<_, i64>(2)? as u64,
                topic:   row.get(3)?,
                payload: row.get(4)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Save slots ─────────────────────────────────────────────

    /// Write `save` into `slot`, replacing whatever was there.
    pub fn save_game(&self, slot: &str, save: &SaveGame) -> StudioResult<()> {
        let json = save.to_json()?;
        self.conn.execute(
            "INSERT INTO save_slot (run_id, slot, week, save_json) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (run_id, slot) DO UPDATE SET week = excluded.week, save_json = excluded.save_json",
            params![save.run_id, slot, save.week as i64, json],
        )?;
        Ok(())
    }

    pub fn load_game(&self, run_id: &str, slot: &str) -> StudioResult<SaveGame> {
        let json: Option<String> = self.conn.query_row(
            "SELECT save_json FROM save_slot WHERE run_id = ?1 AND slot = ?2",
            params![run_id, slot],
            |row| row.get(0),
        ).optional()?;
        match json {
            Some(json) => SaveGame::from_json(&json),
            None => Err(StudioError::SaveNotFound {
                run_id: run_id.to_string(),
                slot:   slot.to_string(),
            }),
        }
    }

    pub fn list_slots(&self, run_id: &str) -> StudioResult<Vec<(String, Week)>> {
        let mut stmt = self.conn.prepare(
            "SELECT slot, week FROM save_slot WHERE run_id = ?1 ORDER BY slot ASC"
        )?;
        let slots = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }
}

/// Week carried by a payload, when it carries one.
fn payload_week(event: &BusEvent) -> Option<Week> {
    match event {
        BusEvent::TimeAdvanced { week, .. }
        | BusEvent::WeekProcessed { week, .. }
        | BusEvent::ExpensesApplied { week, .. }
        | BusEvent::RandomEventApplied { week, .. } => Some(*week),
        BusEvent::StateChanged { state } => Some(state.game_week),
        _ => None,
    }
}

/// Subscribe a writer that appends every event on `topics` to the event
/// log. Events without a week of their own are stamped with the most
/// recent week seen.
pub fn attach_event_log(
    store: Rc<GameStore>,
    bus: &EventBus,
    run_id: RunId,
    topics: &[&str],
) -> Vec<Subscription> {
    let last_week = Rc::new(Cell::new(0));
    topics
        .iter()
        .map(|topic| {
            let store = Rc::clone(&store);
            let last_week = Rc::clone(&last_week);
            let run_id = run_id.clone();
            bus.subscribe(topic, move |event| {
                if let Some(week) = payload_week(event) {
                    last_week.set(week);
                }
                let entry = EventLogEntry {
                    id:      None,
                    run_id:  run_id.clone(),
                    week:    last_week.get(),
                    topic:   event.topic().to_string(),
                    payload: serde_json::to_string(event)?,
                };
                store.append_event(&entry)?;
                Ok(())
            })
        })
        .collect()
}
