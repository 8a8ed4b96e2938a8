//! Translation between the row store's fixed schema and [`Channel`].
//!
//! The table uses these user-facing field names:
//!
//! | field                  | meaning                       |
//! |------------------------|-------------------------------|
//! | `NombreCanal`          | channel name                  |
//! | `CantidadVistas`       | total views                   |
//! | `CantidadSuscriptores` | subscribers                   |
//! | `CantidadVideos`       | number of videos              |
//! | `IdCanal`              | platform channel id, optional |
//!
//! Counts are coerced with one documented policy, [`coerce_count`]: numbers, numeric strings,
//! empty strings and nulls are all accepted and anything unusable becomes 0.

use crate::model::{Channel, ChannelDraft, coerce_count_str, coerce_opt_count};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

/// One page of the rows list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RowPage {
    #[serde(default)]
    pub(crate) count: u64,
    /// Absolute URL of the next page, if any.
    pub(crate) next: Option<String>,
    #[serde(default)]
    pub(crate) results: VecDeque<ChannelRow>,
}

/// A channel row as the store returns it.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelRow {
    pub(crate) id: u64,
    #[serde(rename = "NombreCanal", default)]
    pub(crate) name: Option<String>,
    #[serde(rename = "CantidadVistas", default)]
    pub(crate) views: Value,
    #[serde(rename = "CantidadSuscriptores", default)]
    pub(crate) subscribers: Value,
    #[serde(rename = "CantidadVideos", default)]
    pub(crate) video_count: Value,
    #[serde(rename = "IdCanal", default)]
    pub(crate) platform_id: Option<String>,
}

/// The body sent to create a row.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub(crate) struct NewChannelRow {
    #[serde(rename = "NombreCanal")]
    pub(crate) name: String,
    #[serde(rename = "CantidadVistas")]
    pub(crate) views: u64,
    #[serde(rename = "CantidadSuscriptores")]
    pub(crate) subscribers: u64,
    #[serde(rename = "CantidadVideos")]
    pub(crate) video_count: u64,
    #[serde(rename = "IdCanal", skip_serializing_if = "Option::is_none")]
    pub(crate) platform_id: Option<String>,
}

/// Turns any JSON value the store may hold in a number column into a count.
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => coerce_count_str(s),
        _ => 0,
    }
}

impl From<ChannelRow> for Channel {
    fn from(row: ChannelRow) -> Self {
        if row.name.is_none() {
            tracing::warn!(row_id = row.id, "store row has no channel name");
        }
        Channel {
            id: row.id,
            name: row.name.unwrap_or_default(),
            views: coerce_count(&row.views),
            subscribers: coerce_count(&row.subscribers),
            video_count: coerce_count(&row.video_count),
            platform_id: row.platform_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

impl TryFrom<&ChannelDraft> for NewChannelRow {
    type Error = Error;

    fn try_from(draft: &ChannelDraft) -> Result<Self> {
        let name = draft
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Validation("channel name is required".into()))?;

        Ok(NewChannelRow {
            name: name.to_string(),
            views: coerce_opt_count(draft.views.as_deref()),
            subscribers: coerce_opt_count(draft.subscribers.as_deref()),
            video_count: coerce_opt_count(draft.video_count.as_deref()),
            platform_id: draft.platform_id.clone(),
        })
    }
}
