//! Element and protocol metadata as reported by the element registry.

pub mod element;
pub mod parameter;
pub mod value;

pub use element::{ElementInfo, ElementRef, ElementState, ProtocolIdentity};
pub use parameter::{
    ColumnDefinition, InterpretationType, ParameterDefinition, ParameterOptions, ProtocolSchema,
};
pub use value::{RawColumns, RawValue};
