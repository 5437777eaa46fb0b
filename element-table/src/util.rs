use thrift::{ProtocolError, ProtocolErrorKind};

/// Turns a missing required wire field into a protocol error.
pub trait OptionToThriftResult<T> {
    fn ok_or_thrift_err<F>(self, err_fn: F) -> thrift::Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> OptionToThriftResult<T> for Option<T> {
    fn ok_or_thrift_err<F>(self, err_fn: F) -> thrift::Result<T>
    where
        F: FnOnce() -> String,
    {
        self.ok_or_else(|| {
            thrift::Error::Protocol(ProtocolError::new(
                ProtocolErrorKind::InvalidData,
                err_fn(),
            ))
        })
    }
}

/// Converts a wire `i32` id into the unsigned id used by the schema model.
pub fn id_from_wire(value: i32, field: &str) -> thrift::Result<u32> {
    u32::try_from(value).map_err(|_| {
        thrift::Error::Protocol(ProtocolError::new(
            ProtocolErrorKind::NegativeSize,
            format!("{field} must not be negative, got {value}"),
        ))
    })
}

/// Converts a schema id into the wire `i32`.
pub fn id_to_wire(value: u32, field: &str) -> thrift::Result<i32> {
    i32::try_from(value).map_err(|_| {
        thrift::Error::Protocol(ProtocolError::new(
            ProtocolErrorKind::SizeLimit,
            format!("{field} {value} does not fit the wire format"),
        ))
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_or_thrift_err_with_some() {
        let value: Option<i32> = Some(42);
        let result = value.ok_or_thrift_err(|| "should not be called".to_string());
        assert_eq!(result.ok(), Some(42));
    }

    #[test]
    fn test_ok_or_thrift_err_with_none() {
        let value: Option<i32> = None;
        let result = value.ok_or_thrift_err(|| "missing field name".to_string());

        assert!(
            matches!(
                &result,
                Err(thrift::Error::Protocol(err))
                    if err.kind == ProtocolErrorKind::InvalidData
                    && err.message == "missing field name"
            ),
            "Expected InvalidData protocol error"
        );
    }

    #[test]
    fn test_ok_or_thrift_err_closure_not_evaluated() {
        let mut called = false;
        let value: Option<i32> = Some(42);

        let result = value.ok_or_thrift_err(|| {
            called = true;
            "should not be called".to_string()
        });

        assert!(!called, "Error function should not be called for Some");
        assert!(result.is_ok());
    }

    #[test]
    fn test_id_from_wire() {
        assert_eq!(id_from_wire(100, "parameter id").ok(), Some(100));

        match id_from_wire(-3, "parameter id") {
            Err(thrift::Error::Protocol(err)) => {
                assert_eq!(err.kind, ProtocolErrorKind::NegativeSize);
                assert!(err.message.contains("-3"));
            }
            other => panic!("Expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn test_id_to_wire() {
        assert_eq!(id_to_wire(477, "dma id").ok(), Some(477));
        assert!(id_to_wire(u32::MAX, "dma id").is_err());
    }
}
