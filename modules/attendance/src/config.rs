use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// `modules.attendance` configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttendanceConfig {
    /// Directory holding both documents; relative paths resolve against the home dir.
    pub data_dir: String,
    pub users_file: String,
    pub logs_file: String,
    /// Mount `POST /api/reset`.
    pub enable_reset: bool,
    pub max_display_name_length: usize,
    pub max_comment_length: usize,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_owned(),
            users_file: "users.json".to_owned(),
            logs_file: "logs.json".to_owned(),
            enable_reset: true,
            max_display_name_length: 100,
            max_comment_length: 500,
        }
    }
}

impl AttendanceConfig {
    pub fn data_dir(&self, home_dir: &Path) -> PathBuf {
        let dir = Path::new(&self.data_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            home_dir.join(dir)
        }
    }

    pub fn users_path(&self, home_dir: &Path) -> PathBuf {
        self.data_dir(home_dir).join(&self.users_file)
    }

    pub fn logs_path(&self, home_dir: &Path) -> PathBuf {
        self.data_dir(home_dir).join(&self.logs_file)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_display_name_length: self.max_display_name_length,
            max_comment_length: self.max_comment_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_data_dir_is_under_home() {
        let cfg = AttendanceConfig::default();
        let home = Path::new("/srv/labpresence");
        assert_eq!(
            cfg.users_path(home),
            PathBuf::from("/srv/labpresence/data/users.json")
        );
        assert_eq!(
            cfg.logs_path(home),
            PathBuf::from("/srv/labpresence/data/logs.json")
        );
    }

    #[test]
    fn absolute_data_dir_is_kept() {
        let cfg = AttendanceConfig {
            data_dir: "/var/lib/attendance".into(),
            ..Default::default()
        };
        assert_eq!(
            cfg.users_path(Path::new("/ignored")),
            PathBuf::from("/var/lib/attendance/users.json")
        );
    }

    #[test]
    fn partial_section_fills_defaults() {
        let cfg: AttendanceConfig =
            serde_json::from_value(serde_json::json!({ "enable_reset": false })).unwrap();
        assert!(!cfg.enable_reset);
        assert_eq!(cfg.users_file, "users.json");
        assert_eq!(cfg.max_comment_length, 500);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<AttendanceConfig, _> =
            serde_json::from_value(serde_json::json!({ "data_directory": "x" }));
        assert!(res.is_err());
    }
}
