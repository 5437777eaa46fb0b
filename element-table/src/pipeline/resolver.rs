use crate::channel::ElementChannel;
use crate::error::{Result, TableError};
use crate::schema::{ElementRef, ProtocolIdentity, ProtocolSchema};

/// Resolves the protocol schema of `element`.
///
/// The element must be known to the registry and active. Its protocol
/// identity is returned along with the schema so callers can report it.
pub fn resolve<C: ElementChannel + ?Sized>(
    channel: &mut C,
    element: ElementRef,
) -> Result<(ProtocolIdentity, ProtocolSchema)> {
    let info = channel
        .get_element(element)
        .map_err(|e| TableError::from_channel(element, "looking up element", e))?
        .ok_or_else(|| TableError::unreachable(element, "element is not known"))?;

    if !info.is_reachable() {
        return Err(TableError::unreachable(
            element,
            format!("element is {}", info.state),
        ));
    }

    let schema = channel
        .get_protocol(&info.protocol)
        .map_err(|e| {
            TableError::from_channel(
                element,
                &format!("resolving protocol {}", info.protocol),
                e,
            )
        })?;

    log::debug!(
        "Element {element} ({}) runs {} with {} parameters",
        info.name,
        info.protocol,
        schema.len()
    );

    Ok((info.protocol, schema))
}
