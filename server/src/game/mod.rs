pub mod actions;
pub mod catalog;
pub mod logic;
pub mod phase;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod targeting;
pub mod types;
