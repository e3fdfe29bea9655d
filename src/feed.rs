//! Inbound boundary: document-change batches from the message store and the
//! launch parameters each per-display overlay window is opened with.

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::config::OverlayConfig;
use crate::error::LaunchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    System,
    /// Any type this overlay does not know about (stickers, polls, ...).
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDoc {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default)]
    pub message_type: MessageType,
}

/// One entry of a snapshot's change list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub doc: MessageDoc,
}

impl FeedChange {
    /// Text to show, if this change is a new text message.
    pub fn arrival(&self) -> Option<&str> {
        if self.kind != ChangeKind::Added {
            return None;
        }
        match self.doc.message_type {
            MessageType::Text => Some(&self.doc.text),
            _ => None,
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

/// Decode a JSON array of changes and keep the new text arrivals, in order.
/// Only a payload that is not an array is an error; entries that fail to
/// decode are skipped so the rest of the batch still arrives.
pub fn arrivals_from_json(payload: &str) -> Result<Vec<String>, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(payload)?;
    let mut out = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        let change: FeedChange = match serde_json::from_value(entry) {
            Ok(change) => change,
            Err(e) => {
                debug!(idx, error = %e, "undecodable feed change skipped");
                continue;
            }
        };
        match change.arrival() {
            Some(text) => out.push(text.to_string()),
            None => debug!(kind = ?change.kind, message_type = ?change.doc.message_type, "feed change ignored"),
        }
    }
    Ok(out)
}

/// Query parameters a launcher passes to each overlay window:
/// `?roomId=..&width=..&height=..&workAreaHeight=..`.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParams {
    pub room_id: String,
    pub width: f64,
    pub height: f64,
    pub work_area_height: f64,
}

impl LaunchParams {
    pub fn from_query(query: &str) -> Result<Self, LaunchError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut room_id = None;
        let mut width = None;
        let mut height = None;
        let mut work_area_height = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "roomId" => room_id = Some(value.into_owned()),
                "width" => width = Some(parse_number("width", &value)?),
                "height" => height = Some(parse_number("height", &value)?),
                "workAreaHeight" => work_area_height = Some(parse_number("workAreaHeight", &value)?),
                _ => {}
            }
        }
        Ok(Self {
            room_id: room_id.filter(|r| !r.is_empty()).ok_or(LaunchError::Missing("roomId"))?,
            width: width.ok_or(LaunchError::Missing("width"))?,
            height: height.ok_or(LaunchError::Missing("height"))?,
            work_area_height: work_area_height.ok_or(LaunchError::Missing("workAreaHeight"))?,
        })
    }

    /// Copy the display metrics into `config`.
    pub fn apply(&self, config: &mut OverlayConfig) {
        config.screen_width = self.width;
        config.screen_height = self.height;
        config.work_area_height = self.work_area_height;
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<f64, LaunchError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LaunchError::NotNumeric { name, value: value.to_string() })
}
