use serde::{Deserialize, Deserializer};
use std::fmt::{Display, Formatter};

use crate::error::ProtectError;

/// Anything that can be looked up by opaque ID or display name.
pub trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// A physical display (a "viewer" on the wire).
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// May reference a liveview that is no longer listed.
    #[serde(default, rename = "liveview")]
    pub current_liveview_id: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct Liveview {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct PtzCamera {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "modelKey")]
    pub model_key: String,
    /// Outer `Some` means the key was present in the payload, even when null.
    #[serde(
        default,
        rename = "activePatrolSlot",
        deserialize_with = "deserialize_present"
    )]
    pub active_patrol_slot: Option<Option<i32>>,
}

impl PtzCamera {
    pub fn has_ptz(&self) -> bool {
        self.active_patrol_slot.is_some() || self.model_key == "camera"
    }
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Named for Viewport {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Liveview {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for PtzCamera {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// PTZ preset slot: `-1` is the home position, `0..=9` are numbered slots.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Preset(i32);

impl Preset {
    pub const MIN: i32 = -1;
    pub const MAX: i32 = 9;
    pub const HOME: Self = Self(-1);
    /// Entries in the interactive preset menu, home first.
    pub const MENU_LEN: usize = 11;

    pub fn new(value: i32) -> Result<Self, ProtectError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ProtectError::InvalidPreset(value))
        }
    }

    /// Menu row 0 is home, row 10 is preset 9.
    pub fn from_menu_index(index: usize) -> Option<Self> {
        if index < Self::MENU_LEN {
            Some(Self(index as i32 - 1))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_home(self) -> bool {
        self == Self::HOME
    }

    pub fn menu_label(self) -> String {
        if self.is_home() {
            "Home (-1)".to_string()
        } else {
            format!("Preset {}", self.0)
        }
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_home() {
            write!(f, "home position")
        } else {
            write!(f, "preset {}", self.0)
        }
    }
}
