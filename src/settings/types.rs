/// Settings record definitions
///
/// CamelCase JSON matching the dashboard's settings form. Every field has a
/// serde default so partial records merge cleanly with the defaults.

use serde::{Deserialize, Serialize};

/// Complete platform settings record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub profile: ProfileSettings,
    pub notifications: NotificationSettings,
    pub appearance: AppearanceSettings,
    pub system: SystemSettings,
    pub security: SecuritySettings,
}

/// User profile fields (display-only; there is no account system)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSettings {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub location: String,
    pub timezone: String,
    pub job_title: String,
    pub department: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            location: String::new(),
            timezone: "America/Los_Angeles".to_string(),
            job_title: String::new(),
            department: String::new(),
        }
    }
}

/// Notification toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub agent_alerts: bool,
    pub workflow_updates: bool,
    pub system_maintenance: bool,
    pub weekly_reports: bool,
    pub security_alerts: bool,
    pub performance_reports: bool,
    pub data_backup_notifications: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            agent_alerts: true,
            workflow_updates: true,
            system_maintenance: false,
            weekly_reports: true,
            security_alerts: true,
            performance_reports: false,
            data_backup_notifications: true,
        }
    }
}

/// Dashboard appearance preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppearanceSettings {
    pub theme: String,
    pub accent_color: String,
    pub compact_mode: bool,
    pub animations: bool,
    pub font_size: String,
    pub sidebar_collapsed: bool,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            accent_color: "blue".to_string(),
            compact_mode: false,
            animations: true,
            font_size: "medium".to_string(),
            sidebar_collapsed: false,
        }
    }
}

/// System limits and housekeeping knobs
///
/// Stored as strings because the dashboard form fields are free text; the
/// server does not interpret them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub auto_save: bool,
    pub data_retention: String,
    pub max_agents: String,
    pub api_rate_limit: String,
    pub session_timeout: String,
    pub backup_frequency: String,
    pub log_level: String,
    pub cache_size: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            data_retention: "90".to_string(),
            max_agents: "50".to_string(),
            api_rate_limit: "1000".to_string(),
            session_timeout: "30".to_string(),
            backup_frequency: "daily".to_string(),
            log_level: "info".to_string(),
            cache_size: "512".to_string(),
        }
    }
}

/// Security toggles (display-only; nothing here is enforced)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub two_factor_auth: bool,
    pub session_management: bool,
    pub ip_whitelist: bool,
    pub audit_logging: bool,
    pub password_expiry: String,
    pub login_attempts: String,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor_auth: true,
            session_management: true,
            ip_whitelist: false,
            audit_logging: true,
            password_expiry: "90".to_string(),
            login_attempts: "5".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_installation() {
        let settings = Settings::default();
        assert_eq!(settings.profile.timezone, "America/Los_Angeles");
        assert!(settings.notifications.email_notifications);
        assert!(!settings.notifications.system_maintenance);
        assert_eq!(settings.appearance.theme, "dark");
        assert_eq!(settings.system.max_agents, "50");
        assert_eq!(settings.security.login_attempts, "5");
    }

    #[test]
    fn partial_record_merges_with_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "appearance": { "theme": "light" }
        }))
        .unwrap();
        assert_eq!(settings.appearance.theme, "light");
        assert_eq!(settings.appearance.accent_color, "blue");
        assert!(settings.notifications.agent_alerts);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert!(json["notifications"]["emailNotifications"].as_bool().unwrap());
        assert_eq!(json["system"]["logLevel"], "info");
    }
}
