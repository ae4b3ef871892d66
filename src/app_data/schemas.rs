//! This module defines the schemas for the records the dashboard keeps in storage.
//! Field names follow the stored JSON layout (camelCase), so records written by
//! earlier sessions decode unchanged.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// A record with a fixed storage key.
/// extend to add more schema metadata
pub trait SchemaType {
    const STORAGE_KEY: &'static str;
}

/// Storage keys of every record the dashboard owns.
pub const RECORD_KEYS: [&str; 5] = [
    AppConfig::STORAGE_KEY,
    UserProfile::STORAGE_KEY,
    CameraList::STORAGE_KEY,
    EventList::STORAGE_KEY,
    MasterData::STORAGE_KEY,
];

/// Free-text rules attached to the monitoring configuration.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    pub what_to_do: String,
    pub where_to_do: String,
    pub how_to_do: String,
    pub when_to_do: String,
}

/// Plan tier and monitored object/action/area for the dashboard.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub plan: String,
    pub object: String,
    pub action: String,
    pub area: String,
    pub rules: Rules,
    pub example_text: String,
}

impl SchemaType for AppConfig {
    const STORAGE_KEY: &'static str = "appConfig";
}

/// Partial update for `AppConfig`. Only the fields set are overwritten.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Rules>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_text: Option<String>,
}

impl AppConfig {
    /// Shallow merge: every field present in `patch` replaces the current one.
    pub fn merge(&mut self, patch: AppConfigPatch) {
        if let Some(plan) = patch.plan {
            self.plan = plan;
        }
        if let Some(object) = patch.object {
            self.object = object;
        }
        if let Some(action) = patch.action {
            self.action = action;
        }
        if let Some(area) = patch.area {
            self.area = area;
        }
        if let Some(rules) = patch.rules {
            self.rules = rules;
        }
        if let Some(example_text) = patch.example_text {
            self.example_text = example_text;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    pub company_name: String,
    pub industry: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BillingInfo {
    pub payment_method: String,
    pub next_billing: String,
    pub current_cycle: String,
}

/// Account owner profile: business, user identity and billing groups.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub business: BusinessInfo,
    pub user: UserInfo,
    pub billing: BillingInfo,
}

impl SchemaType for UserProfile {
    const STORAGE_KEY: &'static str = "userProfile";
}

/// Partial update for `UserProfile`. A group included here replaces the
/// stored group as a whole; groups are never merged field by field.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<BillingInfo>,
}

impl UserProfile {
    pub fn merge(&mut self, patch: UserProfilePatch) {
        if let Some(business) = patch.business {
            self.business = business;
        }
        if let Some(user) = patch.user {
            self.user = user;
        }
        if let Some(billing) = patch.billing {
            self.billing = billing;
        }
    }
}

/// Type alias for Camera ID, always positive once stored.
pub type CameraId = u32;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CameraStatus::Active => "active",
            CameraStatus::Inactive => "inactive",
        })
    }
}

/// A camera in the inventory.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    pub ip: String,
    pub features: Vec<String>,
    pub area: String,
    pub status: CameraStatus,
}

/// A camera about to be added; the id is assigned on insert.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct NewCamera {
    pub name: String,
    pub ip: String,
    pub features: Vec<String>,
    pub area: String,
    pub status: CameraStatus,
}

impl NewCamera {
    /// Builds the stored record. Capability tags keep their first occurrence.
    pub fn with_id(self, id: CameraId) -> Camera {
        let mut features: Vec<String> = Vec::with_capacity(self.features.len());
        for feature in self.features {
            if !features.contains(&feature) {
                features.push(feature);
            }
        }

        Camera {
            id,
            name: self.name,
            ip: self.ip,
            features,
            area: self.area,
            status: self.status,
        }
    }
}

/// Storage wrapper for the ordered camera inventory.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CameraList(pub Vec<Camera>);

impl SchemaType for CameraList {
    const STORAGE_KEY: &'static str = "cameras";
}

impl CameraList {
    /// Id for the next insert: max existing id plus one, 1 when empty.
    /// `None` once the id space is used up.
    pub fn next_id(&self) -> Option<CameraId> {
        self.0.iter().map(|camera| camera.id).max().unwrap_or(0).checked_add(1)
    }
}

/// Type alias for Event ID.
pub type EventId = u32;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] =
        [Severity::High, Severity::Medium, Severity::Low];

    /// Same spelling as the stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected event shown on the events board.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24 hour clock
    pub time: String,
    pub event_name: String,
    pub event_area: String,
    pub severity: Severity,
    pub pinned: bool,
    pub action_points: Vec<String>,
    pub details: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct EventList(pub Vec<Event>);

impl SchemaType for EventList {
    const STORAGE_KEY: &'static str = "events";
}

/// The five taxonomy categories kept in master data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterCategory {
    /// Areas of interest.
    Aoi,
    /// Objects of interest.
    Ooi,
    /// Actions of interest.
    Hoi,
    /// Event types.
    Events,
    /// Variables of interest.
    Voi,
}

impl MasterCategory {
    pub const ALL: [MasterCategory; 5] = [
        MasterCategory::Aoi,
        MasterCategory::Ooi,
        MasterCategory::Hoi,
        MasterCategory::Events,
        MasterCategory::Voi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MasterCategory::Aoi => "aoi",
            MasterCategory::Ooi => "ooi",
            MasterCategory::Hoi => "hoi",
            MasterCategory::Events => "events",
            MasterCategory::Voi => "voi",
        }
    }
}

impl fmt::Display for MasterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MasterCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MasterCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown master data category: {}", s))
    }
}

/// Label lists for each taxonomy category.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct MasterData {
    #[serde(default)]
    pub aoi: Vec<String>,
    #[serde(default)]
    pub ooi: Vec<String>,
    #[serde(default)]
    pub hoi: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub voi: Vec<String>,
}

impl SchemaType for MasterData {
    const STORAGE_KEY: &'static str = "masterData";
}

impl MasterData {
    pub fn category(&self, category: MasterCategory) -> &[String] {
        match category {
            MasterCategory::Aoi => &self.aoi,
            MasterCategory::Ooi => &self.ooi,
            MasterCategory::Hoi => &self.hoi,
            MasterCategory::Events => &self.events,
            MasterCategory::Voi => &self.voi,
        }
    }

    /// Replaces one category's list wholesale.
    pub fn replace(&mut self, category: MasterCategory, items: Vec<String>) {
        let slot = match category {
            MasterCategory::Aoi => &mut self.aoi,
            MasterCategory::Ooi => &mut self.ooi,
            MasterCategory::Hoi => &mut self.hoi,
            MasterCategory::Events => &mut self.events,
            MasterCategory::Voi => &mut self.voi,
        };
        *slot = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_json_layout() {
        let camera = Camera {
            id: 3,
            name: "Dock B Camera 1".to_string(),
            ip: "192.168.1.103".to_string(),
            features: vec!["Vehicle Tracking".to_string()],
            area: "Dock B".to_string(),
            status: CameraStatus::Inactive,
        };

        let value = serde_json::to_value(&camera).unwrap();
        assert_eq!(value["status"], "inactive");
        assert_eq!(value["ip"], "192.168.1.103");
    }

    #[test]
    fn test_event_decodes_camel_case() {
        let json = r#"{
            "id": 7, "date": "2025-08-01", "time": "09:05",
            "eventName": "Vehicle Arrival", "eventArea": "Dock A",
            "severity": "high", "pinned": false,
            "actionPoints": ["Review footage"], "details": "x"
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, 7);
        assert_eq!(event.severity, Severity::High);
        assert_eq!(event.action_points, vec!["Review footage"]);
    }

    #[test]
    fn test_event_with_unknown_severity_is_rejected() {
        let json = r#"{
            "id": 7, "date": "2025-08-01", "time": "09:05",
            "eventName": "Vehicle Arrival", "eventArea": "Dock A",
            "severity": "critical", "pinned": false,
            "actionPoints": [], "details": "x"
        }"#;

        assert!(serde_json::from_str::<Event>(json).is_err());
    }

    #[test]
    fn test_camera_list_next_id() {
        assert_eq!(CameraList::default().next_id(), Some(1));

        let cameras = CameraList(vec![
            NewCamera::default().with_id(4),
            NewCamera::default().with_id(10),
            NewCamera::default().with_id(2),
        ]);
        assert_eq!(cameras.next_id(), Some(11));

        let full = CameraList(vec![NewCamera::default().with_id(u32::MAX)]);
        assert_eq!(full.next_id(), None);
    }

    #[test]
    fn test_display_matches_stored_spelling() {
        for severity in Severity::ALL {
            let stored = serde_json::to_string(&severity).unwrap();
            assert_eq!(stored, format!("\"{}\"", severity));
        }
        for status in [CameraStatus::Active, CameraStatus::Inactive] {
            let stored = serde_json::to_string(&status).unwrap();
            assert_eq!(stored, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_record_keys_are_distinct() {
        let mut keys = RECORD_KEYS.to_vec();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), RECORD_KEYS.len());
        assert!(keys.contains(&"cameras"));
    }

    #[test]
    fn test_new_camera_dedups_features_in_order() {
        let camera = NewCamera {
            features: vec![
                "Counting".to_string(),
                "Security".to_string(),
                "Counting".to_string(),
            ],
            ..Default::default()
        }
        .with_id(1);

        assert_eq!(camera.features, vec!["Counting", "Security"]);
    }

    #[test]
    fn test_config_patch_only_touches_present_fields() {
        let mut config = AppConfig {
            plan: "Basic".to_string(),
            object: "sack".to_string(),
            action: "counting".to_string(),
            area: "dock-1".to_string(),
            rules: Rules::default(),
            example_text: String::new(),
        };
        let before = config.clone();

        config.merge(AppConfigPatch {
            area: Some("dock-2".to_string()),
            ..Default::default()
        });

        assert_eq!(config.area, "dock-2");
        assert_eq!(config.plan, before.plan);
        assert_eq!(config.rules, before.rules);
    }

    #[test]
    fn test_master_category_parse() {
        assert_eq!("hoi".parse::<MasterCategory>().unwrap(), MasterCategory::Hoi);
        assert!("areas".parse::<MasterCategory>().is_err());
        for category in MasterCategory::ALL {
            assert_eq!(category.to_string().parse::<MasterCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_master_data_replace() {
        let mut master = MasterData::default();
        master.replace(MasterCategory::Voi, vec!["Sack Count".to_string()]);
        assert_eq!(master.category(MasterCategory::Voi), ["Sack Count"]);
        assert!(master.category(MasterCategory::Aoi).is_empty());
    }
}
