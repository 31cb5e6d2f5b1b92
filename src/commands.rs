//! Command list loading.
//!
//! The command list is a flat text file: a header line naming the list,
//! then one device command per line. Lines are taken whole, so commands
//! containing commas (`show interfaces | include error,drop`) need no
//! quoting.

use std::fs;
use std::path::Path;

use crate::error::{InputError, Result};

/// Read the command list, skipping the header line.
///
/// Blank lines are dropped. Like the inventory, a missing file is a
/// hard failure.
pub fn read_commands(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| InputError::CommandList {
        path: path.to_path_buf(),
        source,
    })?;

    let commands = content
        .lines()
        .skip(1)
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_list(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_header_skipped() {
        let file = write_list("command\nshow version\nshow ip interface brief\n");

        let commands = read_commands(file.path()).unwrap();
        assert_eq!(commands, vec!["show version", "show ip interface brief"]);
    }

    #[test]
    fn test_commas_preserved() {
        let file = write_list("command\nshow interfaces | include error,drop\n");

        let commands = read_commands(file.path()).unwrap();
        assert_eq!(commands, vec!["show interfaces | include error,drop"]);
    }

    #[test]
    fn test_blank_lines_dropped() {
        let file = write_list("command\nshow version\n\n   \nshow clock\n\n");

        let commands = read_commands(file.path()).unwrap();
        assert_eq!(commands, vec!["show version", "show clock"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let file = write_list("command\r\nshow version\r\nshow clock\r\n");

        let commands = read_commands(file.path()).unwrap();
        assert_eq!(commands, vec!["show version", "show clock"]);
    }

    #[test]
    fn test_missing_file_is_hard_failure() {
        let err = read_commands(Path::new("/nonexistent/commandlist.csv")).unwrap_err();
        assert!(err.to_string().contains("commandlist.csv"));
    }
}
