//! Optical configuration of a telescope.
//!
//! A [`Telescope`](crate::models::Telescope) carries a transient accessory
//! configuration that determines the derived figures of the instrument:
//!
//! ```text
//!   Empty | WithEyepiece | WithCamera ── attach_eyepiece ──► WithEyepiece { eyepiece, barlow? }
//!   Empty | WithEyepiece | WithCamera ── attach_camera ────► WithCamera { camera }
//!   WithEyepiece ─────────────────────── attach_barlow ────► WithEyepiece { eyepiece, barlow }
//! ```
//!
//! The front filter is orthogonal to the three states and survives every
//! transition. Nothing here is persisted; to reproduce the figures of a
//! recorded observation, attach its accessories to a freshly read telescope.

pub mod configuration;


pub use configuration::{Configuration, OpticalPath};
