use bitflags::bitflags;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Semantic type the protocol declares for a parameter's value.
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq, Hash, Default)]
#[strum(ascii_case_insensitive)]
pub enum InterpretationType {
    #[strum(to_string = "double", serialize = "numeric")]
    Numeric,
    #[strum(to_string = "string", serialize = "text")]
    Text,
    #[default]
    #[strum(to_string = "other")]
    Other,
}

impl InterpretationType {
    /// Maps a registry interpretation string, falling back to `Other`.
    pub fn from_wire(interpretation: &str) -> Self {
        InterpretationType::from_str(interpretation.trim()).unwrap_or_default()
    }
}

bitflags! {
    /// Display options a protocol attaches to a parameter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ParameterOptions: u32 {
        const TIME = 1;
        const HOURS = 2;
    }
}

impl ParameterOptions {
    /// Collects known option names (case-insensitive). Unknown names are ignored.
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| ParameterOptions::from_name(&name.trim().to_ascii_uppercase()))
            .fold(ParameterOptions::empty(), |acc, flag| acc | flag)
    }

    /// Values carry a number of hours to be shown as a duration.
    pub fn is_duration(&self) -> bool {
        self.intersects(ParameterOptions::TIME | ParameterOptions::HOURS)
    }
}

/// One column position of a table parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub parameter_id: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDefinition {
    pub id: u32,
    pub name: String,
    pub is_table: bool,
    pub interpretation: InterpretationType,
    pub options: ParameterOptions,
    /// Declared column order; empty for scalar parameters.
    pub columns: Vec<ColumnDefinition>,
}

impl ParameterDefinition {
    pub fn scalar(id: u32, name: &str, interpretation: InterpretationType) -> Self {
        ParameterDefinition {
            id,
            name: name.to_owned(),
            is_table: false,
            interpretation,
            options: ParameterOptions::empty(),
            columns: Vec::new(),
        }
    }

    pub fn table(id: u32, name: &str, column_ids: &[u32]) -> Self {
        ParameterDefinition {
            id,
            name: name.to_owned(),
            is_table: true,
            interpretation: InterpretationType::Other,
            options: ParameterOptions::empty(),
            columns: column_ids
                .iter()
                .map(|&parameter_id| ColumnDefinition { parameter_id })
                .collect(),
        }
    }

    pub fn with_options(mut self, options: ParameterOptions) -> Self {
        self.options = options;
        self
    }

    /// Position of `parameter_id` among this table's declared columns.
    pub fn column_position(&self, parameter_id: u32) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.parameter_id == parameter_id)
    }
}

/// Full parameter set of one protocol version.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProtocolSchema {
    parameters: Vec<ParameterDefinition>,
}

impl ProtocolSchema {
    pub fn new(parameters: Vec<ParameterDefinition>) -> Self {
        ProtocolSchema { parameters }
    }

    pub fn parameter(&self, id: u32) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|parameter| parameter.id == id)
    }

    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FromIterator<ParameterDefinition> for ProtocolSchema {
    fn from_iter<T: IntoIterator<Item = ParameterDefinition>>(iter: T) -> Self {
        ProtocolSchema::new(iter.into_iter().collect())
    }
}
