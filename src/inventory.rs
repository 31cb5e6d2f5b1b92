//! Device inventory loading.
//!
//! The inventory is a CSV with a header row of `host`, `username`,
//! `password`, and optionally `secret`. Each row is one device to sweep.
//! Row order is preserved: sessions run in the order operators wrote
//! them, which matters when early devices gate reachability of later
//! ones.

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::{InputError, Result};

/// One inventory row.
#[derive(Debug, Deserialize)]
pub struct DeviceRecord {
    /// Hostname or address to connect to.
    pub host: String,

    /// Login username.
    pub username: String,

    /// Login password.
    #[serde(deserialize_with = "secret_field")]
    pub password: SecretString,

    /// Escalation secret. Falls back to the login password when the
    /// column is absent or empty.
    #[serde(default, deserialize_with = "optional_secret_field")]
    pub secret: Option<SecretString>,
}

/// Read the device inventory, preserving row order.
///
/// A missing or malformed file is a hard failure: a sweep that silently
/// skips its inventory has nothing to do.
pub fn read_inventory(path: &Path) -> Result<Vec<DeviceRecord>> {
    let wrap = |source: csv::Error| InputError::Inventory {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(wrap)?;

    let mut devices = Vec::new();
    for row in reader.deserialize() {
        devices.push(row.map_err(wrap)?);
    }

    Ok(devices)
}

fn secret_field<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn optional_secret_field<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()).map(SecretString::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use secrecy::ExposeSecret;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_rows_in_order() {
        let file = write_csv(
            "host,username,password,secret\n\
             10.0.0.1,ops,pw1,en1\n\
             10.0.0.2,ops,pw2,en2\n\
             core-sw.tokyo,admin,pw3,en3\n",
        );

        let devices = read_inventory(file.path()).unwrap();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].host, "10.0.0.1");
        assert_eq!(devices[1].host, "10.0.0.2");
        assert_eq!(devices[2].host, "core-sw.tokyo");
        assert_eq!(devices[2].username, "admin");
        assert_eq!(devices[0].password.expose_secret(), "pw1");
        assert_eq!(devices[0].secret.as_ref().unwrap().expose_secret(), "en1");
    }

    #[test]
    fn test_empty_secret_column_is_none() {
        let file = write_csv(
            "host,username,password,secret\n\
             10.0.0.1,ops,pw1,\n",
        );

        let devices = read_inventory(file.path()).unwrap();
        assert!(devices[0].secret.is_none());
    }

    #[test]
    fn test_missing_secret_column() {
        let file = write_csv(
            "host,username,password\n\
             10.0.0.1,ops,pw1\n",
        );

        let devices = read_inventory(file.path()).unwrap();
        assert!(devices[0].secret.is_none());
    }

    #[test]
    fn test_missing_file_is_hard_failure() {
        let err = read_inventory(Path::new("/nonexistent/hostlist.csv")).unwrap_err();
        assert!(err.to_string().contains("hostlist.csv"));
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let file = write_csv(
            "host,username,password,secret\n\
             10.0.0.1,ops,hunter2,enable2\n",
        );

        let devices = read_inventory(file.path()).unwrap();
        let debug = format!("{:?}", devices[0]);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("enable2"));
    }
}
