use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::types::DeviceAttributes;

pub enum MessageLogMode {
    /// Log every exchange.
    Full,
    /// Log reads only when the decoded attributes differ from the
    /// previously logged ones. Logins and commands always log.
    ChangesOnly,
}

/// NDJSON exchange log. Credentials and token values never appear in
/// the output.
pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    previous_attrs: Option<DeviceAttributes>,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            mode,
            file,
            previous_attrs: None,
        })
    }

    pub fn log_login(&mut self, status: u16) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "login",
            "status": status,
        });
        self.write_line(&entry);
    }

    pub fn log_read(&mut self, status: u16, attrs: Option<&DeviceAttributes>) {
        if let MessageLogMode::ChangesOnly = self.mode
            && attrs.is_some()
            && self.previous_attrs.as_ref() == attrs
        {
            return;
        }
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "read",
            "status": status,
            "attrs": attrs,
        });
        self.write_line(&entry);
        if let Some(a) = attrs {
            self.previous_attrs = Some(a.clone());
        }
    }

    pub fn log_command(&mut self, action: &str, body: &Value) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "action": action,
            "body": body,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::NamedTempFile;

    fn attrs(mode: &str, timer_switch: u8) -> DeviceAttributes {
        DeviceAttributes {
            mode: mode.to_string(),
            timer_switch,
        }
    }

    fn read_lines(path: &str) -> Vec<Value> {
        let mut contents = String::new();
        std::fs::File::open(path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn log_read_writes_ndjson() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::Full, path).unwrap();
        logger.log_read(200, Some(&attrs("eco", 0)));

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "read");
        assert_eq!(lines[0]["status"], 200);
        assert_eq!(lines[0]["attrs"]["mode"], "eco");
        assert!(lines[0]["ts"].as_str().is_some());
    }

    #[test]
    fn changes_only_skips_repeated_reads() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::ChangesOnly, path).unwrap();

        logger.log_read(200, Some(&attrs("cft", 0)));
        logger.log_read(200, Some(&attrs("cft", 0)));
        logger.log_read(200, Some(&attrs("eco", 0)));

        let lines = read_lines(path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["attrs"]["mode"], "cft");
        assert_eq!(lines[1]["attrs"]["mode"], "eco");
    }

    #[test]
    fn changes_only_always_logs_failed_reads() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::ChangesOnly, path).unwrap();

        logger.log_read(200, Some(&attrs("cft", 0)));
        logger.log_read(500, None);
        logger.log_read(500, None);

        let lines = read_lines(path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1]["status"], 500);
    }

    #[test]
    fn log_command_captures_action_and_body() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::Full, path).unwrap();
        logger.log_command("set_mode", &json!({"attrs": {"mode": "cft"}}));

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "cmd");
        assert_eq!(lines[0]["action"], "set_mode");
        assert_eq!(lines[0]["body"]["attrs"]["mode"], "cft");
    }

    #[test]
    fn log_login_records_status_only() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap();
        let mut logger = MessageLogger::new(MessageLogMode::Full, path).unwrap();
        logger.log_login(200);

        let lines = read_lines(path);
        assert_eq!(lines[0]["dir"], "login");
        assert_eq!(lines[0]["status"], 200);
        assert!(lines[0].get("body").is_none());
    }
}
