//! Client core for the Curia kiosk web chat.
//!
//! Owns the kiosk single-channel enforcer and the server-configuration
//! applier, plus the typed seams they are composed over: the app state
//! store, socket events, the page surface, local storage, and the
//! upload handle. Transport and UI layers live elsewhere and consume
//! these pieces.

pub mod config;
pub mod configuration;
pub mod kiosk;
pub mod page;
pub mod socket;
pub mod state;
pub mod storage;
pub mod upload;

#[cfg(test)]
mod integration_tests;
