//! Form definitions backing the registry routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod customer;
pub mod management;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid role")]
    InvalidRole,

    #[error("invalid profile id")]
    InvalidProfileId,

    #[error("password could not be hashed: {0}")]
    PasswordHash(String),
}

/// Upper bound on clean/decode passes; nested entity encodings deeper than
/// this lose their angle brackets instead.
const MAX_STRIP_PASSES: usize = 8;

fn clean_once(input: &str) -> String {
    ammonia::Builder::empty()
        .clean(input)
        .to_string()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Strips every tag from `input` and returns its plain text.
///
/// `<script>` and `<style>` bodies are dropped together with their tags.
/// Entity-encoded markup is decoded and stripped again until the value no
/// longer changes, so the result never contains a tag.
pub fn strip_markup(input: &str) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_STRIP_PASSES {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
    current.replace(['<', '>'], "")
}
