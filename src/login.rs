//! `user:password` credential parsing

use std::io::{Read, Write};

use crate::config::PromptConfig;
use crate::console::RawConsole;
use crate::error::Result;
use crate::password_container::{PasswordSource, Prompter};
use crate::secret::SecretBuffer;

/// A username and the password that goes with it.
#[derive(Debug)]
pub struct Login {
    pub username: String,
    pub password: SecretBuffer,
}

/// Splits `userpass` at its first `:` into username and password, prompting
/// on the process's terminal when there is no `:`.
///
/// See [`parse_with`].
pub fn parse(userpass: String, verify: bool, message: Option<&str>) -> Option<Login> {
    let mut prompter = Prompter::stdio(PromptConfig::default());
    parse_with(userpass, verify, message, &mut prompter)
}

/// Splits `userpass` at its first `:`.
///
/// Everything before the `:` is the username, possibly empty; everything
/// after it is the password, possibly empty or containing further `:`s.
/// Without a `:` the whole string is the username and the password comes
/// from `source`, in which case `None` from `source` is returned as `None`.
///
/// `userpass` is treated as secret and wiped once the parts are copied out.
pub fn parse_with(
    userpass: String,
    verify: bool,
    message: Option<&str>,
    source: &mut dyn PasswordSource,
) -> Option<Login> {
    split(userpass, || source.prompt(verify, message).ok_or(())).ok()
}

/// Like [`parse_with`], but keeps the reason a prompt failed.
///
/// The prompter's error is returned with a `failed to read password`
/// context in front; its category and kind are unchanged.
pub fn try_parse_with<C, R, W>(
    userpass: String,
    verify: bool,
    message: Option<&str>,
    prompter: &mut Prompter<C, R, W>,
) -> Result<Login>
where
    C: RawConsole,
    R: Read,
    W: Write,
{
    split(userpass, || {
        prompter
            .try_prompt(verify, message)
            .map_err(|e| e.with_context("failed to read password"))
    })
}

fn split<E>(
    userpass: String,
    prompt: impl FnOnce() -> std::result::Result<SecretBuffer, E>,
) -> std::result::Result<Login, E> {
    let wipe = SecretBuffer::from(userpass);
    let raw = wipe.expose();

    let (username, password) = match raw.iter().position(|&b| b == b':') {
        Some(loc) => (&raw[..loc], SecretBuffer::from(raw[loc + 1..].to_vec())),
        None => (raw, prompt()?),
    };

    // `:` is ASCII, so both halves of valid UTF-8 are valid UTF-8.
    let username = String::from_utf8_lossy(username).into_owned();
    Ok(Login { username, password })
}
