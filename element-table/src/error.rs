use crate::schema::ElementRef;

pub type Result<T> = std::result::Result<T, TableError>;

/// Errors surfaced to the host for one query invocation.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// An input argument is missing or does not parse.
    #[error("Invalid argument \"{argument}\": {reason} (expected e.g. \"{example}\")")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
        example: &'static str,
    },

    /// The element cannot be resolved or does not answer.
    #[error("Element {element} is unreachable: {reason}")]
    ElementUnreachable {
        element: ElementRef,
        reason: String,
        #[source]
        source: Option<thrift::Error>,
    },

    /// The parameter is absent from the protocol or is not a table.
    #[error("Parameter {parameter_id} is not a table parameter")]
    InvalidTableReference { parameter_id: u32 },

    /// The registry answered with something we could not use.
    #[error("Transport failure while {context}: {source}")]
    TransportFailure {
        context: String,
        #[source]
        source: thrift::Error,
    },
}

impl TableError {
    pub fn unreachable(element: ElementRef, reason: impl Into<String>) -> Self {
        TableError::ElementUnreachable {
            element,
            reason: reason.into(),
            source: None,
        }
    }

    /// Classifies a channel error raised while talking about `element`.
    ///
    /// Transport errors mean the element could not be reached; anything
    /// else is a malformed or unexpected answer.
    pub fn from_channel(element: ElementRef, context: &str, err: thrift::Error) -> Self {
        if let thrift::Error::Transport(transport) = &err {
            let reason = format!("{context}: {}", transport.message);
            return TableError::ElementUnreachable {
                element,
                reason,
                source: Some(err),
            };
        }

        TableError::TransportFailure {
            context: context.to_owned(),
            source: err,
        }
    }
}
