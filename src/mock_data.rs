//! Seed records written on first run.
//!
//! The fixed defaults never change between runs. Events are random: each call
//! to `generate_events` draws a fresh batch from the supplied random source.

use chrono::{Duration, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::app_data::{
    AppConfig, BillingInfo, BusinessInfo, Camera, CameraStatus, Event,
    MasterData, Rules, Severity, UserInfo, UserProfile,
};

pub const EVENT_BATCH_SIZE: u32 = 50;

/// Events are dated within this many days back from today.
pub const EVENT_WINDOW_DAYS: i64 = 30;

const PIN_PROBABILITY: f64 = 0.2;

const EVENT_TYPES: [&str; 5] = [
    "Vehicle Arrival",
    "Loading Complete",
    "Violation Detected",
    "Count Mismatch",
    "Security Alert",
];

const EVENT_AREAS: [&str; 5] =
    ["Dock A", "Dock B", "Warehouse", "Loading Bay", "Gate Area"];

const ACTION_POINTS: [&str; 3] =
    ["Review footage", "Notify supervisor", "Update count"];

const EXAMPLE_TEXT: &str = "For night trucks these are two ROI where the truck will come and there are two stations corresponding to it. Do count loading and unloading of sacks.";

/// Owned copies of static string lists.
pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn default_config() -> AppConfig {
    AppConfig {
        plan: "Basic".to_string(),
        object: "sack".to_string(),
        action: "counting".to_string(),
        area: "dock-1".to_string(),
        rules: Rules::default(),
        example_text: EXAMPLE_TEXT.to_string(),
    }
}

pub fn default_profile() -> UserProfile {
    UserProfile {
        business: BusinessInfo {
            company_name: "AutomatUp Industries".to_string(),
            industry: "Manufacturing".to_string(),
            address: "123 Industrial Ave, Tech City".to_string(),
            phone: "+1-555-0123".to_string(),
        },
        user: UserInfo {
            name: "John Manager".to_string(),
            email: "john@automatup.com".to_string(),
            role: "admin".to_string(),
            status: "active".to_string(),
            phone: "+1-555-0124".to_string(),
        },
        billing: BillingInfo {
            payment_method: "Credit Card ****1234".to_string(),
            next_billing: "2025-09-20".to_string(),
            current_cycle: "Monthly".to_string(),
        },
    }
}

pub fn default_cameras() -> Vec<Camera> {
    let seed: [(&str, &[&str], &str, CameraStatus); 10] = [
        ("Dock A Camera 1", &["Counting"], "Dock A", CameraStatus::Active),
        (
            "Dock A Camera 2",
            &["Counting", "Violation Detection"],
            "Dock A",
            CameraStatus::Active,
        ),
        ("Dock B Camera 1", &["Vehicle Tracking"], "Dock B", CameraStatus::Active),
        ("Gate Camera", &["Access Control"], "Main Gate", CameraStatus::Active),
        ("Warehouse Cam 1", &["Counting"], "Warehouse", CameraStatus::Inactive),
        (
            "Warehouse Cam 2",
            &["Safety Monitoring"],
            "Warehouse",
            CameraStatus::Active,
        ),
        (
            "Loading Bay 1",
            &["Vehicle Tracking", "Counting"],
            "Loading Bay",
            CameraStatus::Active,
        ),
        ("Loading Bay 2", &["Counting"], "Loading Bay", CameraStatus::Active),
        ("Perimeter Cam 1", &["Security"], "Perimeter", CameraStatus::Active),
        ("Perimeter Cam 2", &["Security"], "Perimeter", CameraStatus::Active),
    ];

    seed.into_iter()
        .zip(1..)
        .map(|((name, features, area, status), id)| Camera {
            id,
            name: name.to_string(),
            ip: format!("192.168.1.{}", 100 + id),
            features: strings(features),
            area: area.to_string(),
            status,
        })
        .collect()
}

pub fn default_master_data() -> MasterData {
    MasterData {
        aoi: strings(&[
            "Dock A",
            "Dock B",
            "Warehouse",
            "Loading Bay",
            "Gate Area",
        ]),
        ooi: strings(&["Sacks", "Vehicles", "Personnel", "Equipment"]),
        hoi: strings(&["Loading", "Unloading", "Counting", "Tracking"]),
        events: strings(&[
            "Vehicle Arrival",
            "Loading Complete",
            "Violation Detected",
            "Count Mismatch",
        ]),
        voi: strings(&[
            "Truck License Plate",
            "Sack Count",
            "Person ID",
            "Time Stamp",
        ]),
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &'a [&'a str]) -> &'a str {
    // the pools are non-empty constants
    items.choose(rng).copied().unwrap_or_default()
}

/// Generates the synthetic event batch, ids `1..=50`, dated relative to `today`.
pub fn generate_events<R: Rng + ?Sized>(
    rng: &mut R, today: NaiveDate,
) -> Vec<Event> {
    (1..=EVENT_BATCH_SIZE)
        .map(|id| {
            let days_back = rng.random_range(0..EVENT_WINDOW_DAYS);
            let date = today - Duration::days(days_back);
            let hour = rng.random_range(0..24u32);
            let minute = rng.random_range(0..60u32);

            let event_name = pick(rng, &EVENT_TYPES);
            let event_area = pick(rng, &EVENT_AREAS);
            let severity = *Severity::ALL.choose(rng).unwrap_or(&Severity::Low);
            let pinned = rng.random_bool(PIN_PROBABILITY);

            // the details line draws its own type and area
            let details = format!(
                "Event details for {} at {}",
                pick(rng, &EVENT_TYPES),
                pick(rng, &EVENT_AREAS)
            );

            Event {
                id,
                date: date.format("%Y-%m-%d").to_string(),
                time: format!("{:02}:{:02}", hour, minute),
                event_name: event_name.to_string(),
                event_area: event_area.to_string(),
                severity,
                pinned,
                action_points: strings(&ACTION_POINTS),
                details,
            }
        })
        .collect()
}
