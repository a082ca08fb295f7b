//! # Interactive Menu
//!
//! Two operations, picked by number:
//!
//! 1. Encode: source image, message, output path, password
//! 2. Decode: encoded image, password
//!
//! Anything else prints a hint and ends normally. Every error is caught here,
//! reported in plain words and turned into [`MenuOutcome::Failed`].
//!
//! The menu reads from any `BufRead` and writes to any `Write`, so tests can
//! drive it with in-memory buffers.

use log::debug;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::common::error::{CypherError, Result};
use crate::cypher::ImageCypher;

/// How a menu session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// A message was hidden; holds the written image path
    Encoded(PathBuf),
    /// A message was recovered and printed
    Decoded,
    /// The choice was neither 1 nor 2
    InvalidChoice,
    /// An operation raised an error
    Failed,
}

impl MenuOutcome {
    /// Process exit status: 1 for failures, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            MenuOutcome::Failed => 1,
            _ => 0,
        }
    }
}

/// Run one menu session.
///
/// # Example
/// ```ignore
/// let stdin = std::io::stdin();
/// let stdout = std::io::stdout();
/// let outcome = run_menu(&cypher, &mut stdin.lock(), &mut stdout.lock());
/// std::process::exit(outcome.exit_code());
/// ```
pub fn run_menu<R: BufRead, W: Write>(cypher: &ImageCypher, input: &mut R, output: &mut W) -> MenuOutcome {
    match session(cypher, input, output) {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!("Menu session failed: {:?}", e);
            // Nothing more can be reported if the terminal itself is gone.
            let _ = writeln!(output, "\nError: {}", e);
            let _ = writeln!(output, "The program terminated with an error.");
            MenuOutcome::Failed
        }
    }
}

fn session<R: BufRead, W: Write>(cypher: &ImageCypher, input: &mut R, output: &mut W) -> Result<MenuOutcome> {
    writeln!(output, "=== ImageCypher - Secure Steganography ===")?;
    writeln!(output, "1. Encode a message")?;
    writeln!(output, "2. Decode a message")?;

    let choice = prompt(input, output, "\nChoose an option (1/2): ")?;

    match choice.as_str() {
        "1" => {
            let image_path = prompt(input, output, "Source image path: ")?;
            let message = prompt(input, output, "Secret message: ")?;
            let output_path = prompt(input, output, "Path to save the encoded image: ")?;
            let password = prompt(input, output, "Encryption password: ")?;
            require_all(&[
                image_path.as_str(),
                message.as_str(),
                output_path.as_str(),
                password.as_str(),
            ])?;

            let written = cypher.encode_file(&image_path, &message, &output_path, &password)?;
            writeln!(output, "Message hidden in the image successfully.")?;
            Ok(MenuOutcome::Encoded(written.as_path().to_path_buf()))
        }
        "2" => {
            let image_path = prompt(input, output, "Encoded image path: ")?;
            let password = prompt(input, output, "Decryption password: ")?;
            require_all(&[image_path.as_str(), password.as_str()])?;

            let message = cypher.decode_file(&image_path, &password)?;
            writeln!(output, "\nDecoded secret message: {}", message)?;
            Ok(MenuOutcome::Decoded)
        }
        _ => {
            writeln!(output, "Invalid option. Please choose 1 or 2.")?;
            Ok(MenuOutcome::InvalidChoice)
        }
    }
}

/// Print `label`, read one line and trim it. End of input reads as empty.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn require_all(fields: &[&str]) -> Result<()> {
    if fields.iter().any(|field| field.is_empty()) {
        return Err(CypherError::Validation("All fields are required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> (MenuOutcome, String) {
        let cypher = ImageCypher::default();
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let outcome = run_menu(&cypher, &mut input, &mut output);
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_invalid_choice_exits_zero() {
        let (outcome, text) = run("7\n");
        assert_eq!(outcome, MenuOutcome::InvalidChoice);
        assert_eq!(outcome.exit_code(), 0);
        assert!(text.contains("Invalid option"));
    }

    #[test]
    fn test_empty_input_is_invalid_choice() {
        let (outcome, _) = run("");
        assert_eq!(outcome, MenuOutcome::InvalidChoice);
    }

    #[test]
    fn test_missing_encode_field_fails() {
        let (outcome, text) = run("1\nin.png\n\nout.png\npw\n");
        assert_eq!(outcome, MenuOutcome::Failed);
        assert_eq!(outcome.exit_code(), 1);
        assert!(text.contains("All fields are required"));
        assert!(text.contains("terminated with an error"));
    }

    #[test]
    fn test_whitespace_only_password_counts_as_missing() {
        let (outcome, text) = run("2\nimage.png\n   \n");
        assert_eq!(outcome, MenuOutcome::Failed);
        assert!(text.contains("All fields are required"));
    }

    #[test]
    fn test_decode_missing_file_reports_path_error() {
        let (outcome, text) = run("2\n/no/such/dir/image.png\npw\n");
        assert_eq!(outcome, MenuOutcome::Failed);
        assert!(text.contains("Invalid file path"));
    }

    #[test]
    fn test_require_all() {
        assert!(require_all(&["a", "b"]).is_ok());
        assert!(require_all(&["a", ""]).is_err());
    }
}
