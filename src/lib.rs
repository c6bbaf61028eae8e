#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]

pub(crate) mod api;
pub mod app;
pub mod catalog;
pub mod chat;
pub mod classification;
pub mod cli;
pub mod clients;
pub mod config;
pub mod emotion;
pub mod index;
pub mod language;
pub mod observability;
pub mod pipeline;
pub mod query;
pub mod translation;
