use std::fmt;

use crate::compose::Channel;

/// Identifies one displayed pane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaneId {
    Green,
    Red,
    Combined,
}

impl From<Channel> for PaneId {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Green => Self::Green,
            Channel::Red => Self::Red,
        }
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => write!(f, "Green"),
            Self::Red => write!(f, "Red"),
            Self::Combined => write!(f, "Combined"),
        }
    }
}

/// Which panes a contrast change applies to; also encodes the display mode.
///
/// `None` means nothing is loaded, `Combined` means the composite view is shown,
/// and the remaining variants select panes of the split view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContrastTarget {
    #[default]
    None,
    Green,
    Red,
    Both,
    Combined,
}

impl ContrastTarget {
    /// Choices offered in split view.
    pub const SPLIT: &[Self] = &[Self::Green, Self::Red, Self::Both];

    pub fn panes(self) -> &'static [PaneId] {
        match self {
            Self::None => &[],
            Self::Green => &[PaneId::Green],
            Self::Red => &[PaneId::Red],
            Self::Both => &[PaneId::Green, PaneId::Red],
            Self::Combined => &[PaneId::Combined],
        }
    }

    pub fn is_composite(self) -> bool {
        self == Self::Combined
    }

    pub fn is_split(self) -> bool {
        matches!(self, Self::Green | Self::Red | Self::Both)
    }
}

impl fmt::Display for ContrastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Green => write!(f, "Green"),
            Self::Red => write!(f, "Red"),
            Self::Both => write!(f, "Both"),
            Self::Combined => write!(f, "Combined"),
        }
    }
}
