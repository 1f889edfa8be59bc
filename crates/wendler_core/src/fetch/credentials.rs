//! Username/password handling for the remote notes service.

use crate::fetch::{FetchError, FetchResult};
use std::fmt::{Debug, Formatter};
use std::io::{BufRead, Write};

/// HTTP Basic credentials. Both fields are non-blank.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// # Errors
    /// - `FetchError::CredentialMissing` when either value is blank.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> FetchResult<Self> {
        let username = username.into().trim().to_string();
        let password = password.into();
        if username.is_empty() {
            return Err(FetchError::CredentialMissing("username"));
        }
        if password.is_empty() {
            return Err(FetchError::CredentialMissing("password"));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Prompts for a value until a non-blank line is entered.
///
/// Gives up after `attempts` blank answers or at end of input.
///
/// # Errors
/// - `FetchError::CredentialMissing(label)` when no value was provided.
/// - `FetchError::Io` when reading or writing the prompt fails.
pub fn prompt_non_empty<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &'static str,
    attempts: u32,
) -> FetchResult<String> {
    retry_non_blank(label, attempts, || {
        write!(output, "{}: ", capitalize(label))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    })
}

/// Prompts on the terminal without echoing what is typed.
///
/// Same retry bound as [`prompt_non_empty`]; the value is returned untrimmed.
///
/// # Errors
/// - `FetchError::CredentialMissing(label)` when no value was provided.
/// - `FetchError::Io` when the terminal cannot be read.
pub fn prompt_hidden(label: &'static str, attempts: u32) -> FetchResult<String> {
    retry_non_blank(label, attempts, || {
        rpassword::prompt_password(format!("{}: ", capitalize(label))).map(Some)
    })
}

/// `read` yields `None` at end of input.
fn retry_non_blank<F>(label: &'static str, attempts: u32, mut read: F) -> FetchResult<String>
where
    F: FnMut() -> std::io::Result<Option<String>>,
{
    for _ in 0..attempts {
        match read().map_err(FetchError::Io)? {
            None => break,
            Some(value) if value.trim().is_empty() => continue,
            Some(value) => return Ok(value),
        }
    }
    Err(FetchError::CredentialMissing(label))
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{prompt_non_empty, retry_non_blank, Credentials};
    use crate::fetch::FetchError;
    use std::io::Cursor;

    #[test]
    fn blank_credentials_are_rejected() {
        assert!(matches!(
            Credentials::new("  ", "secret"),
            Err(FetchError::CredentialMissing("username"))
        ));
        assert!(matches!(
            Credentials::new("jim", ""),
            Err(FetchError::CredentialMissing("password"))
        ));
    }

    #[test]
    fn debug_output_redacts_password() {
        let credentials = Credentials::new("jim", "hunter2").unwrap();
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("jim"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn prompt_retries_blank_answers() {
        let mut input = Cursor::new("\n   \njim\n");
        let mut output = Vec::new();
        let value = prompt_non_empty(&mut input, &mut output, "username", 3).unwrap();
        assert_eq!(value, "jim");
        assert_eq!(String::from_utf8(output).unwrap().matches("Username: ").count(), 3);
    }

    #[test]
    fn prompt_gives_up_after_attempts_or_eof() {
        let mut input = Cursor::new("\n\n\njim\n");
        let mut output = Vec::new();
        let err = prompt_non_empty(&mut input, &mut output, "password", 3).unwrap_err();
        assert!(matches!(err, FetchError::CredentialMissing("password")));

        let mut empty = Cursor::new("");
        let err = prompt_non_empty(&mut empty, &mut output, "username", 3).unwrap_err();
        assert!(matches!(err, FetchError::CredentialMissing("username")));
    }

    #[test]
    fn hidden_answers_are_retried_and_kept_untrimmed() {
        let mut answers = vec![Some(" ".to_string()), Some(" s3cret ".to_string())].into_iter();
        let mut calls = 0;
        let value = retry_non_blank("password", 3, || {
            calls += 1;
            Ok(answers.next().flatten())
        })
        .unwrap();
        assert_eq!(value, " s3cret ");
        assert_eq!(calls, 2);
    }

    #[test]
    fn hidden_prompt_gives_up_after_blank_attempts() {
        let mut calls = 0;
        let err = retry_non_blank("password", 3, || {
            calls += 1;
            Ok(Some(String::new()))
        })
        .unwrap_err();
        assert!(matches!(err, FetchError::CredentialMissing("password")));
        assert_eq!(calls, 3);
    }

    #[test]
    fn hidden_prompt_read_failure_is_io_error() {
        let err = retry_non_blank("password", 3, || {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no tty"))
        })
        .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
