//! CLI command implementations for mpramap.
//!
//! Each submodule implements one subcommand.
//!
//! # Command Categories
//!
//! ## Stages
//! - [`score`] - Score alignments against the oligo designs
//! - [`group`] - Group sorted scored alignments by barcode
//! - [`resolve`] - Resolve barcodes seen with several oligos
//!
//! ## Pipeline
//! - [`map`] - All three stages in one streaming pass
//!
//! ## Reports
//! - [`summarize`] - Oligo support and coverage histogram

#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod common;
pub mod group;
pub mod map;
pub mod resolve;
pub mod score;
pub mod summarize;
