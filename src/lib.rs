//! Gym Ops - Membership Eligibility & Compliance Engine
//!
//! Decides whether a gym member may check in today, whether their liability
//! waiver is still valid, what a household pays under family billing, and how
//! cancel/resubscribe/drop-in moves a member through the subscription
//! lifecycle.
//!
//! The crate is laid out hexagonally: pure rules in [`domain`], storage and
//! processor contracts in [`ports`], orchestration in [`application`], and
//! in-memory/mock implementations in [`adapters`].

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
