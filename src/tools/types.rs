//! Value types shared by several tools

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

/// 3D point in millimeters.
///
/// Coordinates keep the agent's number form so `6000` is forwarded as
/// `6000`, not `6000.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Number,
    pub y: Number,
    pub z: Number,
}

/// An element id the protocol may leave unspecified.
///
/// On the wire "unspecified" is `-1`; in Rust it is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionalId(Option<i64>);

impl OptionalId {
    /// Wire value for "no id"
    pub const SENTINEL: i64 = -1;

    pub fn none() -> Self {
        Self(None)
    }

    pub fn some(id: i64) -> Self {
        Self(Some(id))
    }

    pub fn get(&self) -> Option<i64> {
        self.0
    }

    /// Value sent to Revit
    pub fn wire(&self) -> i64 {
        self.0.unwrap_or(Self::SENTINEL)
    }
}

impl Serialize for OptionalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.wire())
    }
}

impl<'de> Deserialize<'de> for OptionalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = i64::deserialize(deserializer)?;
        Ok(if id == Self::SENTINEL { Self::none() } else { Self::some(id) })
    }
}
