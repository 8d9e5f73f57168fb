//! passprompt - masked terminal password entry with scrub-on-drop secrets
//!
//! [`password_container::prompt`] reads a password, optionally twice for
//! confirmation, from the terminal with echo off, or a single line from
//! stdin when it is not a terminal. [`login::parse`] splits a
//! `user:password` string and prompts when the password part is missing.
//! Secrets live in a [`SecretBuffer`], which wipes its memory when dropped.

#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod error;
pub mod line_editor;
pub mod login;
pub mod password_container;
pub mod secret;
pub mod stream;
pub mod terminal;

pub use config::PromptConfig;
pub use error::{ErrorCategory, ErrorKind, PromptError, Result};
pub use login::Login;
pub use password_container::{PasswordSource, Prompter};
pub use secret::{MAX_PASSWORD_SIZE, SecretBuffer};
