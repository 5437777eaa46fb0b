/// Trait definitions for element registry communication
use crate::schema::{ElementInfo, ElementRef, ProtocolIdentity, ProtocolSchema, RawColumns};
use enum_dispatch::enum_dispatch;

/// Request/response channel to the element registry.
///
/// This trait exposes only the three requests the table pipeline needs.
/// Implementing it allows running the pipeline against a mock or an
/// in-memory registry without a live socket connection.
///
/// Errors are reported as [`thrift::Error`]. Transport errors mean the
/// element or registry could not be reached; every other kind is a
/// malformed or unexpected answer.
#[enum_dispatch]
pub trait ElementChannel {
    /// Look up an element. `Ok(None)` when the registry does not know it.
    fn get_element(&mut self, element: ElementRef) -> thrift::Result<Option<ElementInfo>>;

    /// Fetch every parameter definition of a protocol version.
    fn get_protocol(&mut self, protocol: &ProtocolIdentity) -> thrift::Result<ProtocolSchema>;

    /// Read the current values of a table parameter, column-major.
    /// `Ok(None)` when the element reports no values.
    fn get_partial_table(
        &mut self,
        element: ElementRef,
        parameter_id: u32,
    ) -> thrift::Result<Option<RawColumns>>;
}
