//! Astrolog - observation logbook core for amateur astronomers.
//!
//! - [`models`]: equipment, sky objects, sessions and observations
//! - [`optics`]: accessory configuration on a telescope and the figures derived from it
//! - [`db`]: repository traits, the in-memory backend and configuration
//! - [`services`]: observation creation rules, reports, sessions and accounts
//! - [`io`]: JSON logbook import

pub mod db;
pub mod io;
pub mod models;
pub mod optics;
pub mod services;
