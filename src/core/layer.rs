//! Layer identities and their fixed ordering.

use std::fmt;

/// The seven layers, numbered bottom-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum LayerKind {
    /// Raw byte transport.
    Physical = 1,
    /// Hardware addressing.
    DataLink = 2,
    /// Network addressing.
    Network = 3,
    /// Sequence labelling.
    Transport = 4,
    /// Session state tagging.
    Session = 5,
    /// Generic value serialization.
    Presentation = 6,
    /// Request envelope (public entry point).
    Application = 7,
}

impl LayerKind {
    /// Layers in send order: top of the stack first.
    pub const DOWNWARD: [LayerKind; 7] = [
        LayerKind::Application,
        LayerKind::Presentation,
        LayerKind::Session,
        LayerKind::Transport,
        LayerKind::Network,
        LayerKind::DataLink,
        LayerKind::Physical,
    ];

    /// Parse a layer from its number (1 = Physical .. 7 = Application).
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Physical),
            2 => Some(Self::DataLink),
            3 => Some(Self::Network),
            4 => Some(Self::Transport),
            5 => Some(Self::Session),
            6 => Some(Self::Presentation),
            7 => Some(Self::Application),
            _ => None,
        }
    }

    /// Layer number, 1 (Physical) to 7 (Application).
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Human-readable layer name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::DataLink => "Data Link",
            Self::Network => "Network",
            Self::Transport => "Transport",
            Self::Session => "Session",
            Self::Presentation => "Presentation",
            Self::Application => "Application",
        }
    }

    /// The layer this one delegates to on send, `None` for Physical.
    pub fn below(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// The layer that delegates to this one, `None` for Application.
    pub fn above(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
