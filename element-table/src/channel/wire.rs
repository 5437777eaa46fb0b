//! Thrift encoding of the element registry service.
//!
//! ```text
//! struct ElementInfo   { 1: string name, 2: string protocolName,
//!                        3: string protocolVersion, 4: string state }
//! struct ParameterInfo { 1: i32 id, 2: string name, 3: bool isTable,
//!                        4: string interpretation, 5: list<string> options,
//!                        6: list<i32> columnParameterIds }
//! struct ProtocolInfo  { 1: string name, 2: string version,
//!                        3: list<ParameterInfo> parameters }
//! struct CellValue     { 1: optional string text, 2: optional double number }
//! struct TableSnapshot { 1: list<list<CellValue>> columns }
//!
//! ElementInfo   getElement(1: i32 dmaId, 2: i32 elementId)
//! ProtocolInfo  getProtocol(1: string name, 2: string version)
//! TableSnapshot getPartialTable(1: i32 dmaId, 2: i32 elementId, 3: i32 parameterId)
//! ```
//!
//! Unknown fields are skipped so the registry can grow its structs.

use crate::schema::{
    ColumnDefinition, ElementInfo, ElementRef, ElementState, InterpretationType,
    ParameterDefinition, ParameterOptions, ProtocolIdentity, ProtocolSchema, RawColumns, RawValue,
};
use crate::util::{id_from_wire, id_to_wire, OptionToThriftResult};
use thrift::protocol::{TFieldIdentifier, TInputProtocol, TOutputProtocol, TType};

pub const GET_ELEMENT: &str = "getElement";
pub const GET_PROTOCOL: &str = "getProtocol";
pub const GET_PARTIAL_TABLE: &str = "getPartialTable";

/// Upper bound for pre-allocating lists announced by the peer.
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

pub fn write_get_element_args(
    o_prot: &mut dyn TOutputProtocol,
    element: ElementRef,
) -> thrift::Result<()> {
    write_i32_field(o_prot, "dmaId", 1, id_to_wire(element.dma_id, "dmaId")?)?;
    write_i32_field(o_prot, "elementId", 2, id_to_wire(element.element_id, "elementId")?)
}

pub fn write_get_protocol_args(
    o_prot: &mut dyn TOutputProtocol,
    protocol: &ProtocolIdentity,
) -> thrift::Result<()> {
    write_string_field(o_prot, "name", 1, &protocol.name)?;
    write_string_field(o_prot, "version", 2, &protocol.version)
}

pub fn write_get_partial_table_args(
    o_prot: &mut dyn TOutputProtocol,
    element: ElementRef,
    parameter_id: u32,
) -> thrift::Result<()> {
    write_get_element_args(o_prot, element)?;
    write_i32_field(
        o_prot,
        "parameterId",
        3,
        id_to_wire(parameter_id, "parameterId")?,
    )
}

pub fn read_element_info(i_prot: &mut dyn TInputProtocol) -> thrift::Result<ElementInfo> {
    let mut name = None;
    let mut protocol_name = None;
    let mut protocol_version = None;
    let mut state = None;

    read_struct(i_prot, |i_prot, id, field_type| {
        match (id, field_type) {
            (1, TType::String) => name = Some(i_prot.read_string()?),
            (2, TType::String) => protocol_name = Some(i_prot.read_string()?),
            (3, TType::String) => protocol_version = Some(i_prot.read_string()?),
            (4, TType::String) => state = Some(i_prot.read_string()?),
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(ElementInfo {
        name: name.unwrap_or_default(),
        protocol: ProtocolIdentity {
            name: protocol_name
                .ok_or_thrift_err(|| "ElementInfo.protocolName is required".to_string())?,
            version: protocol_version
                .ok_or_thrift_err(|| "ElementInfo.protocolVersion is required".to_string())?,
        },
        state: state
            .as_deref()
            .map(ElementState::from_wire)
            .unwrap_or_default(),
    })
}

pub fn read_protocol_info(i_prot: &mut dyn TInputProtocol) -> thrift::Result<ProtocolSchema> {
    let mut name = None;
    let mut version = None;
    let mut parameters = Vec::new();

    read_struct(i_prot, |i_prot, id, field_type| {
        match (id, field_type) {
            (1, TType::String) => name = Some(i_prot.read_string()?),
            (2, TType::String) => version = Some(i_prot.read_string()?),
            (3, TType::List) => parameters = read_list(i_prot, read_parameter_info)?,
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    log::trace!(
        "Decoded protocol {}/{} with {} parameters",
        name.unwrap_or_default(),
        version.unwrap_or_default(),
        parameters.len()
    );

    Ok(ProtocolSchema::new(parameters))
}

pub fn read_table_snapshot(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Option<RawColumns>> {
    let mut columns = None;

    read_struct(i_prot, |i_prot, id, field_type| {
        match (id, field_type) {
            (1, TType::List) => {
                columns = Some(read_list(i_prot, |i_prot| read_list(i_prot, read_cell_value))?)
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(columns)
}

fn read_parameter_info(i_prot: &mut dyn TInputProtocol) -> thrift::Result<ParameterDefinition> {
    let mut id = None;
    let mut name = None;
    let mut is_table = false;
    let mut interpretation = None;
    let mut options = Vec::new();
    let mut column_ids = Vec::new();

    read_struct(i_prot, |i_prot, field_id, field_type| {
        match (field_id, field_type) {
            (1, TType::I32) => id = Some(id_from_wire(i_prot.read_i32()?, "ParameterInfo.id")?),
            (2, TType::String) => name = Some(i_prot.read_string()?),
            (3, TType::Bool) => is_table = i_prot.read_bool()?,
            (4, TType::String) => interpretation = Some(i_prot.read_string()?),
            (5, TType::List) => options = read_list(i_prot, |i_prot| i_prot.read_string())?,
            (6, TType::List) => {
                column_ids = read_list(i_prot, |i_prot| {
                    id_from_wire(i_prot.read_i32()?, "ParameterInfo.columnParameterIds")
                })?
            }
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    let id = id.ok_or_thrift_err(|| "ParameterInfo.id is required".to_string())?;

    Ok(ParameterDefinition {
        id,
        name: name.unwrap_or_default(),
        is_table,
        interpretation: interpretation
            .as_deref()
            .map(InterpretationType::from_wire)
            .unwrap_or_default(),
        options: ParameterOptions::from_names(options.iter().map(String::as_str)),
        columns: column_ids
            .into_iter()
            .map(|parameter_id| ColumnDefinition { parameter_id })
            .collect(),
    })
}

fn read_cell_value(i_prot: &mut dyn TInputProtocol) -> thrift::Result<Option<RawValue>> {
    let mut text = None;
    let mut number = None;

    read_struct(i_prot, |i_prot, id, field_type| {
        match (id, field_type) {
            (1, TType::String) => text = Some(i_prot.read_string()?),
            (2, TType::Double) => number = Some(i_prot.read_double()?),
            _ => return Ok(false),
        }
        Ok(true)
    })?;

    Ok(number.map(RawValue::Number).or(text.map(RawValue::Text)))
}

/// Reads a struct, handing each field to `read_field`.
///
/// `read_field` returns `false` for fields it does not know; those are skipped.
fn read_struct<F>(i_prot: &mut dyn TInputProtocol, mut read_field: F) -> thrift::Result<()>
where
    F: FnMut(&mut dyn TInputProtocol, i16, TType) -> thrift::Result<bool>,
{
    i_prot.read_struct_begin()?;
    loop {
        let field_ident = i_prot.read_field_begin()?;
        if field_ident.field_type == TType::Stop {
            break;
        }

        let handled = match field_ident.id {
            Some(id) => read_field(&mut *i_prot, id, field_ident.field_type)?,
            None => false,
        };
        if !handled {
            i_prot.skip(field_ident.field_type)?;
        }

        i_prot.read_field_end()?;
    }
    i_prot.read_struct_end()
}

fn read_list<T, F>(i_prot: &mut dyn TInputProtocol, mut read_element: F) -> thrift::Result<Vec<T>>
where
    F: FnMut(&mut dyn TInputProtocol) -> thrift::Result<T>,
{
    let list_ident = i_prot.read_list_begin()?;
    let announced = usize::try_from(list_ident.size).unwrap_or(0);
    let mut elements = Vec::with_capacity(announced.min(MAX_PREALLOCATED_ELEMENTS));

    for _ in 0..list_ident.size {
        elements.push(read_element(&mut *i_prot)?);
    }

    i_prot.read_list_end()?;
    Ok(elements)
}

fn write_i32_field(
    o_prot: &mut dyn TOutputProtocol,
    name: &str,
    id: i16,
    value: i32,
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::I32, id))?;
    o_prot.write_i32(value)?;
    o_prot.write_field_end()
}

fn write_string_field(
    o_prot: &mut dyn TOutputProtocol,
    name: &str,
    id: i16,
    value: &str,
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::String, id))?;
    o_prot.write_string(value)?;
    o_prot.write_field_end()
}
