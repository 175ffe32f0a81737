use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use dokploy_defs::SecretRegistry;
use log::error;

use crate::SecretMasker;

const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Escapes a workflow command payload so multi-line messages stay on one line.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a workflow command property value (e.g. the `name` of `set-output`).
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Formats a workflow command such as `::debug::message`.
pub fn issue_command(command: &str, message: &str) -> String {
    format!("::{}::{}", command, escape_data(message))
}

/// Secret registry backed by the runner's `add-mask` command and the local
/// log masker.
pub struct ActionsSecretRegistry {
    masker: SecretMasker,
}

impl ActionsSecretRegistry {
    pub fn new(masker: SecretMasker) -> Self {
        ActionsSecretRegistry { masker }
    }
}

impl SecretRegistry for ActionsSecretRegistry {
    fn register_secret(&self, value: &str) {
        // The runner masks line by line, so each line is registered on its own
        for line in value.lines().filter(|l| !l.trim().is_empty()) {
            println!("{}", issue_command("add-mask", line));
            self.masker.add(line);
        }
        self.masker.add(value);
    }
}

/// Publishes a step output, using the `GITHUB_OUTPUT` file when the runner
/// provides one and the legacy `set-output` command otherwise.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match env::var_os(OUTPUT_FILE_ENV) {
        Some(path) if !path.is_empty() => write_output_file(Path::new(&path), name, value),
        _ => {
            println!(
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            );
            Ok(())
        }
    }
}

/// Marks the step as failed. The caller is responsible for the exit code.
pub fn set_failed(message: &str) {
    error!("{}", message);
}

/// Formats a `key=value` entry for a runner file command, switching to the
/// heredoc form when the value spans lines.
pub fn prepare_key_value_message(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}", name, value);
    }

    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    format!("{}<<{}\n{}\n{}", name, delimiter, value, delimiter)
}

fn write_output_file(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;

    writeln!(file, "{}", prepare_key_value_message(name, value))
        .with_context(|| format!("Failed to write output '{}'", name))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100%\r\ndone"), "100%25%0D%0Adone");
        assert_eq!(escape_data("plain"), "plain");
    }

    #[test]
    fn test_escape_property() {
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn test_issue_command_escapes_multiline_payload() {
        assert_eq!(
            issue_command("debug", "request body: {\n  \"a\": 1\n}"),
            "::debug::request body: {%0A  \"a\": 1%0A}"
        );
    }

    #[test]
    fn test_prepare_single_line_output() {
        assert_eq!(
            prepare_key_value_message("application-id", "app-123"),
            "application-id=app-123"
        );
    }

    #[test]
    fn test_prepare_multiline_output_uses_delimiter() {
        let message = prepare_key_value_message("notes", "line one\nline two");
        let lines: Vec<&str> = message.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("notes<<ghadelimiter_"));
        let delimiter = lines[0].trim_start_matches("notes<<");
        assert_eq!(lines[1], "line one");
        assert_eq!(lines[2], "line two");
        assert_eq!(lines[3], delimiter);
    }

    #[test]
    fn test_write_output_file_appends() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_output_file(file.path(), "first", "1").unwrap();
        write_output_file(file.path(), "application-id", "app-123").unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "first=1\napplication-id=app-123\n");
    }

    #[test]
    fn test_registry_feeds_masker() {
        let masker = SecretMasker::new();
        let registry = ActionsSecretRegistry::new(masker.clone());

        registry.register_secret("first-line\nsecond-line");
        assert_eq!(
            masker.mask("first-line and second-line"),
            "*** and ***"
        );
    }
}
