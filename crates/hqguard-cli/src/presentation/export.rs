//! Rendering of the exported variable for shells.
//!
//! Shell lines are built from the raw path bytes, so a working directory
//! whose name is not UTF-8 is exported unchanged.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::ValueEnum;
use hqguard_core::{ExportedVar, GuardOutcome};
use serde_json::json;
use thiserror::Error;

/// Output dialect for the export line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShellFormat {
    /// POSIX shells: `export NAME='value'`
    #[default]
    Sh,
    /// fish: `set -gx NAME 'value'`
    Fish,
    /// One JSON object with name, value, and outcome
    Json,
}

/// Errors while rendering the export line.
#[derive(Debug, Error)]
pub enum ExportError {
    /// JSON strings cannot carry arbitrary path bytes.
    #[error("{} is not valid UTF-8 and cannot be written as JSON", .0.display())]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Render `var` so that evaluating the output publishes it.
///
/// `outcome` is only included in JSON output.
pub fn render_export(
    var: &ExportedVar,
    outcome: Option<&GuardOutcome>,
    format: ShellFormat,
) -> Result<Vec<u8>, ExportError> {
    let value = var.value.as_os_str().as_encoded_bytes();

    let mut line = Vec::with_capacity(value.len() + var.name.len() + 16);
    match format {
        ShellFormat::Sh => {
            line.extend_from_slice(b"export ");
            line.extend_from_slice(var.name.as_bytes());
            line.push(b'=');
            sh_quote(value, &mut line);
        }
        ShellFormat::Fish => {
            line.extend_from_slice(b"set -gx ");
            line.extend_from_slice(var.name.as_bytes());
            line.push(b' ');
            fish_quote(value, &mut line);
        }
        ShellFormat::Json => {
            let value = var
                .value
                .to_str()
                .ok_or_else(|| ExportError::NonUtf8Path(var.value.clone()))?;
            serde_json::to_writer(
                &mut line,
                &json!({
                    "name": var.name,
                    "value": value,
                    "outcome": outcome,
                }),
            )?;
        }
    }
    Ok(line)
}

/// Write a rendered line to stdout, newline-terminated.
pub fn print_line(line: &[u8]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(line)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Single-quote for POSIX sh; embedded quotes become `'\''`.
fn sh_quote(value: &[u8], out: &mut Vec<u8>) {
    out.push(b'\'');
    for &b in value {
        if b == b'\'' {
            out.extend_from_slice(br"'\''");
        } else {
            out.push(b);
        }
    }
    out.push(b'\'');
}

/// Single-quote for fish, where `\` and `'` are escapable inside quotes.
fn fish_quote(value: &[u8], out: &mut Vec<u8>) {
    out.push(b'\'');
    for &b in value {
        if b == b'\\' || b == b'\'' {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b'\'');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(value: impl Into<PathBuf>) -> ExportedVar {
        ExportedVar {
            name: "HQ_SERVER_DIR".to_string(),
            value: value.into(),
        }
    }

    fn render(var: &ExportedVar, format: ShellFormat) -> String {
        String::from_utf8(render_export(var, None, format).unwrap()).unwrap()
    }

    #[test]
    fn sh_export_line() {
        let out = render(&var("/w/.server/hq-current"), ShellFormat::Sh);
        assert_eq!(out, "export HQ_SERVER_DIR='/w/.server/hq-current'");
    }

    #[test]
    fn sh_escapes_single_quotes() {
        let out = render(&var("/it's/.server/hq-current"), ShellFormat::Sh);
        assert_eq!(out, r"export HQ_SERVER_DIR='/it'\''s/.server/hq-current'");
    }

    #[test]
    fn fish_escapes_quotes_and_backslashes() {
        let out = render(&var(r"/a\b/it's"), ShellFormat::Fish);
        assert_eq!(out, r"set -gx HQ_SERVER_DIR '/a\\b/it\'s'");
    }

    #[test]
    fn json_includes_outcome() {
        let outcome = GuardOutcome::Started { pid: 12 };
        let out =
            render_export(&var("/w/hq-current"), Some(&outcome), ShellFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed["name"], "HQ_SERVER_DIR");
        assert_eq!(parsed["value"], "/w/hq-current");
        assert_eq!(parsed["outcome"]["state"], "started");
        assert_eq!(parsed["outcome"]["pid"], 12);
    }

    #[test]
    fn json_without_outcome_is_null() {
        let out = render_export(&var("/w/hq-current"), None, ShellFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(parsed["outcome"].is_null());
    }

    #[cfg(unix)]
    mod non_utf8 {
        use super::super::{ExportError, ExportedVar, ShellFormat, render_export};
        use super::var;
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        fn latin1_path() -> ExportedVar {
            var(OsStr::from_bytes(b"/w/caf\xe9/.server/hq-current"))
        }

        #[test]
        fn sh_keeps_path_bytes() {
            let out = render_export(&latin1_path(), None, ShellFormat::Sh).unwrap();
            assert_eq!(
                out,
                b"export HQ_SERVER_DIR='/w/caf\xe9/.server/hq-current'".to_vec()
            );
        }

        #[test]
        fn fish_keeps_path_bytes() {
            let out = render_export(&latin1_path(), None, ShellFormat::Fish).unwrap();
            assert_eq!(
                out,
                b"set -gx HQ_SERVER_DIR '/w/caf\xe9/.server/hq-current'".to_vec()
            );
        }

        #[test]
        fn json_refuses_non_utf8_path() {
            let err = render_export(&latin1_path(), None, ShellFormat::Json).unwrap_err();
            assert!(matches!(err, ExportError::NonUtf8Path(_)));
        }
    }
}
