/// Thrift client implementation for element registry communication
use crate::channel::trait_def::ElementChannel;
use crate::channel::wire;
use crate::schema::{ElementInfo, ElementRef, ProtocolIdentity, ProtocolSchema, RawColumns};
use crate::util::OptionToThriftResult;
use std::io::Error;
use std::os::unix::net::UnixStream;
use std::time::Duration;
use thrift::protocol::{
    verify_expected_message_type, verify_expected_sequence_number, verify_expected_service_call,
    TBinaryInputProtocol, TBinaryOutputProtocol, TInputProtocol, TMessageIdentifier, TMessageType,
    TOutputProtocol, TStructIdentifier, TType,
};

/// Default socket timeout for registry calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Production implementation of [`ElementChannel`] using Thrift over Unix sockets.
pub struct ThriftChannel {
    i_prot: TBinaryInputProtocol<UnixStream>,
    o_prot: TBinaryOutputProtocol<UnixStream>,
    sequence_number: i32,
}

impl ThriftChannel {
    /// Connects to the registry socket. A zero `timeout` blocks indefinitely.
    pub fn new(socket_path: &str, timeout: Duration) -> Result<Self, Error> {
        let socket_tx = UnixStream::connect(socket_path)?;
        let io_timeout = (!timeout.is_zero()).then_some(timeout);
        socket_tx.set_read_timeout(io_timeout)?;
        socket_tx.set_write_timeout(io_timeout)?;
        let socket_rx = socket_tx.try_clone()?;

        let in_proto = TBinaryInputProtocol::new(socket_tx, true);
        let out_proto = TBinaryOutputProtocol::new(socket_rx, true);

        log::debug!("Connected to element registry at {socket_path}");

        Ok(ThriftChannel {
            i_prot: in_proto,
            o_prot: out_proto,
            sequence_number: 0,
        })
    }

    /// Sends one call and decodes the `success` field of the reply.
    ///
    /// `Ok(None)` when the reply carries no `success` field.
    fn call<T, W, R>(&mut self, method: &str, write_args: W, read_success: R) -> thrift::Result<Option<T>>
    where
        W: FnOnce(&mut dyn TOutputProtocol) -> thrift::Result<()>,
        R: Fn(&mut dyn TInputProtocol) -> thrift::Result<T>,
    {
        self.sequence_number = self.sequence_number.wrapping_add(1);
        log::trace!("Calling {method} (seq {})", self.sequence_number);

        let message_ident =
            TMessageIdentifier::new(method, TMessageType::Call, self.sequence_number);
        self.o_prot.write_message_begin(&message_ident)?;
        self.o_prot
            .write_struct_begin(&TStructIdentifier::new(format!("{method}_args")))?;
        write_args(&mut self.o_prot)?;
        self.o_prot.write_field_stop()?;
        self.o_prot.write_struct_end()?;
        self.o_prot.write_message_end()?;
        self.o_prot.flush()?;

        let message_ident = self.i_prot.read_message_begin()?;
        verify_expected_sequence_number(self.sequence_number, message_ident.sequence_number)?;
        verify_expected_service_call(method, &message_ident.name)?;
        if message_ident.message_type == TMessageType::Exception {
            let remote_error =
                thrift::Error::read_application_error_from_in_protocol(&mut self.i_prot)?;
            self.i_prot.read_message_end()?;
            return Err(thrift::Error::Application(remote_error));
        }
        verify_expected_message_type(TMessageType::Reply, message_ident.message_type)?;

        let mut success = None;
        self.i_prot.read_struct_begin()?;
        loop {
            let field_ident = self.i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            match field_ident.id {
                Some(0) => success = Some(read_success(&mut self.i_prot)?),
                _ => self.i_prot.skip(field_ident.field_type)?,
            }
            self.i_prot.read_field_end()?;
        }
        self.i_prot.read_struct_end()?;
        self.i_prot.read_message_end()?;

        Ok(success)
    }
}

//
// ThriftChannel implements our ElementChannel trait
//
impl ElementChannel for ThriftChannel {
    fn get_element(&mut self, element: ElementRef) -> thrift::Result<Option<ElementInfo>> {
        self.call(
            wire::GET_ELEMENT,
            |o_prot| wire::write_get_element_args(o_prot, element),
            wire::read_element_info,
        )
    }

    fn get_protocol(&mut self, protocol: &ProtocolIdentity) -> thrift::Result<ProtocolSchema> {
        self.call(
            wire::GET_PROTOCOL,
            |o_prot| wire::write_get_protocol_args(o_prot, protocol),
            wire::read_protocol_info,
        )?
        .ok_or_thrift_err(|| format!("Registry returned no schema for protocol {protocol}"))
    }

    fn get_partial_table(
        &mut self,
        element: ElementRef,
        parameter_id: u32,
    ) -> thrift::Result<Option<RawColumns>> {
        let snapshot = self.call(
            wire::GET_PARTIAL_TABLE,
            |o_prot| wire::write_get_partial_table_args(o_prot, element, parameter_id),
            wire::read_table_snapshot,
        )?;

        Ok(snapshot.flatten())
    }
}
