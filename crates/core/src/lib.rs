//! Core business logic for lunchvote.
//!
//! The daily result engine lives here:
//!
//! - [`VoteLedger`] keeps each menu's vote tally in step with its votes
//! - [`DailyResultResolver`] closes a day and picks its winner
//! - the streak tracker counts consecutive wins per restaurant
//!
//! The remaining services are the CRUD surface that feeds the engine.

pub mod services;

pub use services::*;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_support;
