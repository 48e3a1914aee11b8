#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, NodeId};

/// How a [`Condition`] affects the restriction it is attached to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Modifier {
    #[default]
    Unknown = 0,
    Open = 1,
    Closed = 2,
    Off = 3,
    Comment = 4,
}

impl Modifier {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Unknown),
            1 => Some(Self::Open),
            2 => Some(Self::Closed),
            3 => Some(Self::Off),
            4 => Some(Self::Comment),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Off => "off",
            Self::Comment => "comment",
        }
    }
}

/// A time-of-day interval, in caller-defined units since midnight.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    pub from: u32,
    pub to: u32,
}

impl TimeSpan {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }
}

/// Weekday selector, 0 = Sunday.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Weekday(pub u8);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay {
    pub month: u8,
    pub day: u8,
}

impl MonthDay {
    pub fn new(month: u8, day: u8) -> Self {
        Self { month, day }
    }
}

/// Time scope under which a turn restriction applies.
///
/// Each of the three selector lists has its own length; an empty list places
/// no constraint on that dimension.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    pub modifier: Modifier,
    pub times: Vec<TimeSpan>,
    pub weekdays: Vec<Weekday>,
    pub monthdays: Vec<MonthDay>,
}

/// A turn from one edge to another via a node, either forbidden or mandated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnRestriction {
    pub via: NodeId,
    pub from: EdgeId,
    pub to: EdgeId,
    /// `true` for "only" restrictions (the turn is mandatory), `false` for "no".
    pub is_only: bool,
    pub conditions: Vec<Condition>,
}

impl TurnRestriction {
    pub fn new(via: NodeId, from: EdgeId, to: EdgeId, is_only: bool) -> Self {
        Self {
            via,
            from,
            to,
            is_only,
            conditions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty()
    }
}
