//! Studio Mogul core: the time-advancement engine of a historical
//! film-studio management game (1933–2010).
//!
//! The engine owns the GameState, moves the calendar, charges monthly
//! burn, detects era changes, fans out to collaborator subsystems, and
//! decides when the game ends. Everything observable leaves through the
//! EventBus or the notification queue.

pub mod awards_subsystem;
pub mod box_office_subsystem;
pub mod bus;
pub mod clock;
pub mod command;
pub mod config;
pub mod endgame;
pub mod engine;
pub mod era;
pub mod error;
pub mod event;
pub mod history;
pub mod ledger;
pub mod loan_subsystem;
pub mod name_generator;
pub mod production_subsystem;
pub mod random_event_subsystem;
pub mod rng;
pub mod scenario_subsystem;
pub mod script_subsystem;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod subsystem;
pub mod types;
