//! Console front end: turns one input line into one response.
//!
//! Lines starting with `/` are commands; anything else is an analytics prompt
//! sent to the remote service.
//!
//! | command                                    | effect                          |
//! |--------------------------------------------|---------------------------------|
//! | `/cameras` / `/camera <id>`                | list / show cameras             |
//! | `/add-camera <name>, <ip>, <area>[, a; b]` | add a camera with feature tags  |
//! | `/events` / `/event <id>`                  | summary with pins / show event  |
//! | `/pin <id>`                                | toggle an event pin             |
//! | `/config` / `/area <area>`                 | show config / change the area   |
//! | `/company <name>`                          | rename the business             |
//! | `/master` / `/master <category> a, b`      | show / replace a taxonomy list  |
//! | `/reset`                                   | wipe and reseed all records     |

use std::str::FromStr;

use anyhow::anyhow;
use log::{info, trace};
use serde::Serialize;

use crate::app_data::{
    AppConfigPatch, AppStateStore, CameraId, CameraStatus, EventId,
    MasterCategory, NewCamera, UserProfilePatch,
};
use crate::error::Result;
use crate::mock_api::{RemoteService, DEFAULT_CHART_TYPE};

pub struct Dashboard<State, Remote> {
    state: State,
    remote: Remote,
}

fn parse_arg<T: FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse().map_err(|_| anyhow!("Invalid {}: {:?}", what, raw))
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl<State: AppStateStore, Remote: RemoteService> Dashboard<State, Remote> {
    pub fn new(state: State, remote: Remote) -> Self {
        Self { state, remote }
    }

    /// Header line shown at startup.
    pub fn banner(&self) -> String {
        let config = self.state.config();
        let profile = self.state.profile();
        format!(
            "{} | plan {} | monitoring {} {} at {}",
            profile.business.company_name,
            config.plan,
            config.object,
            config.action,
            config.area
        )
    }

    pub async fn handle(&mut self, line: &str) -> Result<String> {
        let line = line.trim();
        trace!("Handling input: {:?}", line);

        let Some(line) = line.strip_prefix('/') else {
            return self.ask(line).await;
        };

        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match (command, arg) {
            ("cameras", "") => Ok(self.list_cameras()),
            ("camera", id) if !id.is_empty() => {
                let id: CameraId = parse_arg(id, "camera id")?;
                match self.state.camera(id) {
                    Some(camera) => pretty(&camera),
                    None => Ok(format!("Camera {} not found.", id)),
                }
            }
            ("add-camera", fields) if !fields.is_empty() => self.add_camera(fields),
            ("events", "") => Ok(self.list_events()),
            ("event", id) if !id.is_empty() => {
                let id: EventId = parse_arg(id, "event id")?;
                match self.state.event(id) {
                    Some(event) => pretty(&event),
                    None => Ok(format!("Event {} not found.", id)),
                }
            }
            ("pin", id) if !id.is_empty() => self.toggle_pin(id),
            ("config", "") => pretty(&self.state.config()),
            ("area", area) if !area.is_empty() => {
                let config = self.state.update_config(AppConfigPatch {
                    area: Some(area.to_string()),
                    ..Default::default()
                })?;
                Ok(format!("Monitoring area set to {}.", config.area))
            }
            ("company", name) if !name.is_empty() => {
                let mut business = self.state.profile().business;
                business.company_name = name.to_string();
                self.state.update_profile(UserProfilePatch {
                    business: Some(business),
                    ..Default::default()
                })?;
                Ok(format!("Company renamed to {}.", name))
            }
            ("master", "") => pretty(&self.state.master_data()),
            ("master", rest) => self.replace_master(rest),
            ("reset", "") => {
                self.state.reset()?;
                Ok("State reset to defaults.".to_string())
            }
            _ => Err(anyhow!("Unknown command: /{}", line)),
        }
    }

    fn add_camera(&mut self, fields: &str) -> Result<String> {
        let mut parts = fields.splitn(4, ',').map(str::trim);
        let (Some(name), Some(ip), Some(area)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(anyhow!(
                "Expected: add-camera <name>, <ip>, <area>[, feature; feature]"
            ));
        };

        let camera = self.state.add_camera(NewCamera {
            name: name.to_string(),
            ip: ip.to_string(),
            features: parts.next().map(|f| split_list(f, ';')).unwrap_or_default(),
            area: area.to_string(),
            status: CameraStatus::Active,
        })?;

        Ok(format!("Camera {} added as #{}.", camera.name, camera.id))
    }

    fn replace_master(&mut self, rest: &str) -> Result<String> {
        let (category, items) = rest.split_once(' ').unwrap_or((rest, ""));
        let category: MasterCategory = category.parse()?;
        self.state.update_master_data(category, split_list(items, ','))?;

        let master = self.state.master_data();
        Ok(format!("{}: {}", category, master.category(category).join(", ")))
    }

    fn toggle_pin(&mut self, id: &str) -> Result<String> {
        let id: EventId = parse_arg(id, "event id")?;

        Ok(match self.state.toggle_event_pin(id)? {
            Some(event) if event.pinned => format!("Event {} pinned.", id),
            Some(_) => format!("Event {} unpinned.", id),
            None => format!("Event {} not found.", id),
        })
    }

    fn list_cameras(&self) -> String {
        self.state
            .cameras()
            .iter()
            .map(|camera| {
                format!(
                    "#{} {} {} [{}] {} ({})",
                    camera.id,
                    camera.name,
                    camera.ip,
                    camera.area,
                    camera.status,
                    camera.features.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn list_events(&self) -> String {
        let events = self.state.events();
        let pinned = self.state.pinned_events();

        let mut lines =
            vec![format!("{} events, {} pinned", events.len(), pinned.len())];
        lines.extend(pinned.iter().map(|event| {
            format!(
                "* #{} {} {} {} at {} ({})",
                event.id,
                event.date,
                event.time,
                event.event_name,
                event.event_area,
                event.severity
            )
        }));
        lines.join("\n")
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        let query = self.remote.generate_query(prompt).await?;
        let chart =
            self.remote.generate_chart_data(&query, DEFAULT_CHART_TYPE).await?;
        info!("Chart ready with {} labels", chart.labels.len());

        Ok(format!("{}\n{}", query, pretty(&chart)?))
    }
}
