use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Address of one managed element instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef {
    pub dma_id: u32,
    pub element_id: u32,
}

impl ElementRef {
    pub fn new(dma_id: u32, element_id: u32) -> Self {
        ElementRef { dma_id, element_id }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dma_id, self.element_id)
    }
}

/// Name and version of the protocol an element runs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProtocolIdentity {
    pub name: String,
    pub version: String,
}

impl ProtocolIdentity {
    pub fn new(name: &str, version: &str) -> Self {
        ProtocolIdentity {
            name: name.to_owned(),
            version: version.to_owned(),
        }
    }
}

impl fmt::Display for ProtocolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Run state reported by the element registry.
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash, Default)]
#[strum(ascii_case_insensitive)]
pub enum ElementState {
    Active,
    Paused,
    Stopped,
    Error,
    #[default]
    Unknown,
}

impl ElementState {
    /// Maps a registry state string, falling back to `Unknown`.
    pub fn from_wire(state: &str) -> Self {
        ElementState::from_str(state.trim()).unwrap_or_default()
    }
}

/// What the registry knows about an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementInfo {
    pub name: String,
    pub protocol: ProtocolIdentity,
    pub state: ElementState,
}

impl ElementInfo {
    /// Only active elements answer table requests.
    pub fn is_reachable(&self) -> bool {
        self.state == ElementState::Active
    }
}
