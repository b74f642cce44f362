//! # vsure-domain
//!
//! Pure domain model for the Verisure → Domoticz bridge.
//!
//! ## Responsibilities
//! - Foundational types: sensor indices, error conventions, timestamps
//! - Define the **Overview** (one alarm-provider account snapshot)
//! - Define **Devices** (the tagged union the update engine dispatches on)
//! - Define **Hub commands** (the update requests the hub understands)
//! - Define **Outcomes** (what happened to each device during a pass)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod sensor_index;
pub mod time;

pub mod command;
pub mod device;
pub mod outcome;
pub mod overview;
