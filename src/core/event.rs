use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Badge id to level, in the order the server sent them.
///
/// Serialized as a JSON object so log lines read like `{"subscriber":12}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeLevels(Vec<(String, i64)>);

impl BadgeLevels {
    pub fn push(&mut self, badge: impl Into<String>, level: i64) {
        self.0.push((badge.into(), level));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(badge, level)| (badge.as_str(), *level))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for BadgeLevels {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(badge, level)| (badge.into(), level))
                .collect(),
        )
    }
}

impl Serialize for BadgeLevels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (badge, level) in &self.0 {
            map.serialize_entry(badge, level)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BadgeLevels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelsVisitor;

        impl<'de> Visitor<'de> for LevelsVisitor {
            type Value = BadgeLevels;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of badge ids to integer levels")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut levels = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((badge, level)) = access.next_entry::<String, i64>()? {
                    levels.push((badge, level));
                }
                Ok(BadgeLevels(levels))
            }
        }

        deserializer.deserialize_map(LevelsVisitor)
    }
}

/// One inbound chat message, independent of the transport that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub sender_login: String,
    pub display_name: String,
    /// Hex color picked by the sender, if any.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub badges: BadgeLevels,
    pub message: String,
    #[serde(default)]
    pub first_message: bool,
    #[serde(default)]
    pub is_action: bool,
    /// RFC 3339 server timestamp.
    #[serde(default)]
    pub sent_at: Option<String>,
}

impl ChatEvent {
    pub fn new(display_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>, level: i64) -> Self {
        self.badges.push(badge, level);
        self
    }

    pub fn first_message(mut self, first: bool) -> Self {
        self.first_message = first;
        self
    }
}
