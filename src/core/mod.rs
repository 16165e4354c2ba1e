//! Core functionality modules
//!
//! This module contains the business logic behind the bot commands:
//! - `notegpt`: client for the NoteGPT music generation service

pub mod notegpt;
