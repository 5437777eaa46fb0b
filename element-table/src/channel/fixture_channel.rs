//! In-memory element registry loaded from a JSON document.
//!
//! Used for standalone runs and tests. The document lists elements,
//! protocols and table snapshots:
//!
//! ```json
//! {
//!   "elements":  [{ "dmaId": 477, "elementId": 178, "name": "Router",
//!                   "protocol": { "name": "Skyline Router", "version": "1.0.0.1" },
//!                   "state": "Active" }],
//!   "protocols": [{ "name": "Skyline Router", "version": "1.0.0.1",
//!                   "parameters": [{ "id": 100, "name": "Ports", "isTable": true,
//!                                    "columns": [101, 102] }] }],
//!   "tables":    [{ "dmaId": 477, "elementId": 178, "parameterId": 100,
//!                   "columns": [["OK", "FAIL"], [10.0, -1]] }]
//! }
//! ```

use crate::channel::trait_def::ElementChannel;
use crate::schema::{
    ColumnDefinition, ElementInfo, ElementRef, ElementState, InterpretationType,
    ParameterDefinition, ParameterOptions, ProtocolIdentity, ProtocolSchema, RawColumns,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Error, ErrorKind};
use std::path::Path;
use thrift::{ApplicationError, ApplicationErrorKind, TransportError, TransportErrorKind};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[serde(default)]
    pub elements: Vec<FixtureElement>,
    #[serde(default)]
    pub protocols: Vec<FixtureProtocol>,
    #[serde(default)]
    pub tables: Vec<FixtureTable>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureElement {
    pub dma_id: u32,
    pub element_id: u32,
    #[serde(default)]
    pub name: String,
    pub protocol: FixtureProtocolRef,
    #[serde(default = "default_state")]
    pub state: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixtureProtocolRef {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureProtocol {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub parameters: Vec<FixtureParameter>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureParameter {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub is_table: bool,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub columns: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTable {
    pub dma_id: u32,
    pub element_id: u32,
    pub parameter_id: u32,
    /// `null` stands for a table that reports no values.
    #[serde(default)]
    pub columns: Option<RawColumns>,
}

fn default_state() -> String {
    ElementState::Active.to_string()
}

impl FixtureElement {
    fn element_ref(&self) -> ElementRef {
        ElementRef::new(self.dma_id, self.element_id)
    }

    fn info(&self) -> ElementInfo {
        ElementInfo {
            name: self.name.clone(),
            protocol: ProtocolIdentity::new(&self.protocol.name, &self.protocol.version),
            state: ElementState::from_wire(&self.state),
        }
    }
}

impl From<&FixtureParameter> for ParameterDefinition {
    fn from(parameter: &FixtureParameter) -> Self {
        ParameterDefinition {
            id: parameter.id,
            name: parameter.name.clone(),
            is_table: parameter.is_table,
            interpretation: InterpretationType::from_wire(&parameter.interpretation),
            options: ParameterOptions::from_names(parameter.options.iter().map(String::as_str)),
            columns: parameter
                .columns
                .iter()
                .map(|&parameter_id| ColumnDefinition { parameter_id })
                .collect(),
        }
    }
}

/// [`ElementChannel`] answering from a [`Fixture`].
#[derive(Clone, Debug, Default)]
pub struct FixtureChannel {
    fixture: Fixture,
}

impl FixtureChannel {
    pub fn new(fixture: Fixture) -> Self {
        FixtureChannel { fixture }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(FixtureChannel::new)
    }

    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value).map(FixtureChannel::new)
    }

    /// Loads a fixture document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let fixture: Fixture = serde_json::from_reader(reader).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Invalid fixture {}: {e}", path.display()),
            )
        })?;

        log::debug!(
            "Loaded fixture {} ({} elements, {} protocols, {} tables)",
            path.display(),
            fixture.elements.len(),
            fixture.protocols.len(),
            fixture.tables.len()
        );

        Ok(FixtureChannel::new(fixture))
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    fn element(&self, element: ElementRef) -> Option<&FixtureElement> {
        self.fixture
            .elements
            .iter()
            .find(|candidate| candidate.element_ref() == element)
    }
}

impl ElementChannel for FixtureChannel {
    fn get_element(&mut self, element: ElementRef) -> thrift::Result<Option<ElementInfo>> {
        Ok(self.element(element).map(FixtureElement::info))
    }

    fn get_protocol(&mut self, protocol: &ProtocolIdentity) -> thrift::Result<ProtocolSchema> {
        self.fixture
            .protocols
            .iter()
            .find(|candidate| {
                candidate.name == protocol.name && candidate.version == protocol.version
            })
            .map(|found| {
                found
                    .parameters
                    .iter()
                    .map(ParameterDefinition::from)
                    .collect::<ProtocolSchema>()
            })
            .ok_or_else(|| {
                thrift::Error::Application(ApplicationError::new(
                    ApplicationErrorKind::MissingResult,
                    format!("Protocol {protocol} is not part of the fixture"),
                ))
            })
    }

    fn get_partial_table(
        &mut self,
        element: ElementRef,
        parameter_id: u32,
    ) -> thrift::Result<Option<RawColumns>> {
        let reachable = self
            .element(element)
            .map(|found| found.info().is_reachable())
            .unwrap_or(false);
        if !reachable {
            return Err(thrift::Error::Transport(TransportError::new(
                TransportErrorKind::NotOpen,
                format!("Element {element} is not available"),
            )));
        }

        Ok(self
            .fixture
            .tables
            .iter()
            .find(|table| {
                table.dma_id == element.dma_id
                    && table.element_id == element.element_id
                    && table.parameter_id == parameter_id
            })
            .and_then(|table| table.columns.clone()))
    }
}
