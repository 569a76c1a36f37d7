//! Terminal front end for playing a quiz attempt.

mod client;
mod state;
mod ui;

pub use client::run;
pub use state::ClientApp;
