//! Integration tests for the thrift channel against a mock element registry.
//!
//! The mock listens on a Unix socket in a temp dir, answers each call by
//! method name and records the calls it served.

#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use element_table::prelude::*;
    use std::os::unix::net::UnixListener;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;
    use thrift::protocol::{
        TBinaryInputProtocol, TBinaryOutputProtocol, TFieldIdentifier, TInputProtocol,
        TListIdentifier, TMessageIdentifier, TMessageType, TOutputProtocol, TStructIdentifier,
        TType,
    };
    use thrift::{ApplicationError, ApplicationErrorKind};

    /// How the mock answers one call.
    #[derive(Clone, Copy, Debug)]
    enum Reply {
        /// Write this `success` struct.
        Success(fn(&mut dyn TOutputProtocol) -> thrift::Result<()>),
        /// Reply without a `success` field.
        Empty,
        /// Reply with an application exception.
        Exception,
    }

    type Route = (&'static str, Reply);

    fn spawn_registry(socket_path: &Path, routes: Vec<Route>) -> thread::JoinHandle<Vec<String>> {
        let listener = UnixListener::bind(socket_path).expect("Failed to bind mock registry");

        thread::spawn(move || {
            let (stream, _) = listener.accept().expect("Failed to accept");
            let mut i_prot =
                TBinaryInputProtocol::new(stream.try_clone().expect("Failed to clone"), true);
            let mut o_prot = TBinaryOutputProtocol::new(stream, true);
            let mut calls = Vec::new();

            while let Ok(message) = i_prot.read_message_begin() {
                i_prot.skip(TType::Struct).expect("Failed to skip args");
                i_prot.read_message_end().expect("Failed to end message");

                let reply = routes
                    .iter()
                    .find(|(method, _)| *method == message.name)
                    .map(|(_, reply)| *reply)
                    .unwrap_or(Reply::Exception);
                send_reply(&mut o_prot, &message, reply).expect("Failed to reply");
                calls.push(message.name);
            }

            calls
        })
    }

    fn send_reply(
        o_prot: &mut dyn TOutputProtocol,
        call: &TMessageIdentifier,
        reply: Reply,
    ) -> thrift::Result<()> {
        if let Reply::Exception = reply {
            o_prot.write_message_begin(&TMessageIdentifier::new(
                call.name.as_str(),
                TMessageType::Exception,
                call.sequence_number,
            ))?;
            let err = ApplicationError::new(
                ApplicationErrorKind::UnknownMethod,
                format!("Unknown method {}", call.name),
            );
            thrift::Error::write_application_error_to_out_protocol(&err, o_prot)?;
            o_prot.write_message_end()?;
            return o_prot.flush();
        }

        o_prot.write_message_begin(&TMessageIdentifier::new(
            call.name.as_str(),
            TMessageType::Reply,
            call.sequence_number,
        ))?;
        o_prot.write_struct_begin(&TStructIdentifier::new("result"))?;
        if let Reply::Success(write_success) = reply {
            o_prot.write_field_begin(&TFieldIdentifier::new("success", TType::Struct, 0))?;
            write_success(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()?;
        o_prot.write_message_end()?;
        o_prot.flush()
    }

    fn string_field(o: &mut dyn TOutputProtocol, name: &str, id: i16, value: &str) -> thrift::Result<()> {
        o.write_field_begin(&TFieldIdentifier::new(name, TType::String, id))?;
        o.write_string(value)?;
        o.write_field_end()
    }

    fn element_info(o: &mut dyn TOutputProtocol, state: &str) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("ElementInfo"))?;
        string_field(o, "name", 1, "Router")?;
        string_field(o, "protocolName", 2, "Skyline Router")?;
        string_field(o, "protocolVersion", 3, "1.0.0.1")?;
        string_field(o, "state", 4, state)?;
        o.write_field_stop()?;
        o.write_struct_end()
    }

    fn active_element(o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        element_info(o, "Active")
    }

    fn stopped_element(o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        element_info(o, "Stopped")
    }

    fn parameter(
        o: &mut dyn TOutputProtocol,
        id: i32,
        name: &str,
        interpretation: &str,
        options: &[&str],
        columns: &[i32],
    ) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("ParameterInfo"))?;
        o.write_field_begin(&TFieldIdentifier::new("id", TType::I32, 1))?;
        o.write_i32(id)?;
        o.write_field_end()?;
        string_field(o, "name", 2, name)?;
        o.write_field_begin(&TFieldIdentifier::new("isTable", TType::Bool, 3))?;
        o.write_bool(!columns.is_empty())?;
        o.write_field_end()?;
        string_field(o, "interpretation", 4, interpretation)?;
        o.write_field_begin(&TFieldIdentifier::new("options", TType::List, 5))?;
        o.write_list_begin(&TListIdentifier::new(TType::String, options.len() as i32))?;
        for option in options {
            o.write_string(option)?;
        }
        o.write_list_end()?;
        o.write_field_end()?;
        o.write_field_begin(&TFieldIdentifier::new("columnParameterIds", TType::List, 6))?;
        o.write_list_begin(&TListIdentifier::new(TType::I32, columns.len() as i32))?;
        for column in columns {
            o.write_i32(*column)?;
        }
        o.write_list_end()?;
        o.write_field_end()?;
        o.write_field_stop()?;
        o.write_struct_end()
    }

    fn router_protocol(o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("ProtocolInfo"))?;
        string_field(o, "name", 1, "Skyline Router")?;
        string_field(o, "version", 2, "1.0.0.1")?;
        o.write_field_begin(&TFieldIdentifier::new("parameters", TType::List, 3))?;
        o.write_list_begin(&TListIdentifier::new(TType::Struct, 3))?;
        parameter(o, 100, "Ports", "", &[], &[101, 102])?;
        parameter(o, 101, "Status", "string", &[], &[])?;
        parameter(o, 102, "UptimeHours", "double", &["Hours"], &[])?;
        o.write_list_end()?;
        o.write_field_end()?;
        o.write_field_stop()?;
        o.write_struct_end()
    }

    fn cell(o: &mut dyn TOutputProtocol, text: Option<&str>, number: Option<f64>) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("CellValue"))?;
        if let Some(text) = text {
            string_field(o, "text", 1, text)?;
        }
        if let Some(number) = number {
            o.write_field_begin(&TFieldIdentifier::new("number", TType::Double, 2))?;
            o.write_double(number)?;
            o.write_field_end()?;
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }

    fn ports_table(o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("TableSnapshot"))?;
        o.write_field_begin(&TFieldIdentifier::new("columns", TType::List, 1))?;
        o.write_list_begin(&TListIdentifier::new(TType::List, 2))?;

        o.write_list_begin(&TListIdentifier::new(TType::Struct, 2))?;
        cell(o, Some("OK"), None)?;
        cell(o, Some("FAIL"), None)?;
        o.write_list_end()?;

        o.write_list_begin(&TListIdentifier::new(TType::Struct, 2))?;
        cell(o, None, Some(10.0))?;
        cell(o, None, Some(-1.0))?;
        o.write_list_end()?;

        o.write_list_end()?;
        o.write_field_end()?;
        o.write_field_stop()?;
        o.write_struct_end()
    }

    fn router_routes() -> Vec<Route> {
        vec![
            ("getElement", Reply::Success(active_element)),
            ("getProtocol", Reply::Success(router_protocol)),
            ("getPartialTable", Reply::Success(ports_table)),
        ]
    }

    fn arguments(table_id: &str) -> ArgumentValues {
        [
            ("DMA ID", "477"),
            ("Element ID", "178"),
            ("Table ID", table_id),
        ]
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
    }

    fn connect(socket_path: &Path) -> ThriftChannel {
        ThriftChannel::new(socket_path.to_str().unwrap(), Duration::from_secs(5))
            .expect("Failed to connect to mock registry")
    }

    #[test]
    fn test_query_over_thrift() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let socket_path = temp_dir.path().join("registry.sock");
        let registry = spawn_registry(&socket_path, router_routes());

        let mut source = ElementTableSource::new(connect(&socket_path));
        let context = source.on_arguments_processed(&arguments("100")).unwrap();

        let names: Vec<String> = source
            .columns(&context)
            .iter()
            .map(|column| column.name().to_string())
            .collect();
        assert_eq!(names, vec!["Status", "UptimeHours"]);

        let page = source.next_page(&context).unwrap();
        let rows: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|row| row.cells().iter().map(ToString::to_string).collect())
            .collect();
        assert_eq!(
            rows,
            vec![vec!["OK", "0d 10h 0m"], vec!["FAIL", "Missing"]]
        );

        drop(source);
        let calls = registry.join().expect("Registry thread panicked");
        assert_eq!(calls, vec!["getElement", "getProtocol", "getPartialTable"]);
    }

    #[test]
    fn test_unknown_element_over_thrift() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let socket_path = temp_dir.path().join("registry.sock");
        let registry = spawn_registry(&socket_path, vec![("getElement", Reply::Empty)]);

        let mut channel = connect(&socket_path);
        assert!(channel.get_element(ElementRef::new(477, 178)).unwrap().is_none());

        let mut source = ElementTableSource::new(channel);
        let result = source.on_arguments_processed(&arguments("100"));
        assert!(matches!(result, Err(TableError::ElementUnreachable { .. })));

        drop(source);
        assert_eq!(registry.join().unwrap().len(), 2);
    }

    #[test]
    fn test_stopped_element_over_thrift() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let socket_path = temp_dir.path().join("registry.sock");
        let registry = spawn_registry(
            &socket_path,
            vec![("getElement", Reply::Success(stopped_element))],
        );

        let mut source = ElementTableSource::new(connect(&socket_path));
        match source.on_arguments_processed(&arguments("100")) {
            Err(TableError::ElementUnreachable { reason, .. }) => {
                assert!(reason.contains("Stopped"))
            }
            other => panic!("expected ElementUnreachable, got {other:?}"),
        }

        drop(source);
        assert_eq!(registry.join().unwrap(), vec!["getElement"]);
    }

    #[test]
    fn test_remote_exception_is_transport_failure() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let socket_path = temp_dir.path().join("registry.sock");
        let registry = spawn_registry(
            &socket_path,
            vec![("getElement", Reply::Success(active_element))],
        );

        let mut source = ElementTableSource::new(connect(&socket_path));
        let result = source.on_arguments_processed(&arguments("100"));
        assert!(matches!(result, Err(TableError::TransportFailure { .. })));

        drop(source);
        assert_eq!(registry.join().unwrap(), vec!["getElement", "getProtocol"]);
    }

    #[test]
    fn test_table_without_values_over_thrift() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let socket_path = temp_dir.path().join("registry.sock");
        let mut routes = router_routes();
        routes.retain(|(method, _)| *method != "getPartialTable");
        routes.push(("getPartialTable", Reply::Empty));
        let registry = spawn_registry(&socket_path, routes);

        let mut source = ElementTableSource::new(connect(&socket_path));
        let context = source.on_arguments_processed(&arguments("100")).unwrap();
        let page = source.next_page(&context).unwrap();

        assert!(page.rows.is_empty());
        assert!(!page.has_next_page);
        assert_eq!(source.columns(&context).len(), 2);

        drop(source);
        registry.join().unwrap();
    }

    #[test]
    fn test_registry_hangup_is_unreachable() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let socket_path = temp_dir.path().join("registry.sock");
        let listener = UnixListener::bind(&socket_path).expect("Failed to bind");

        let mut source = ElementTableSource::new(connect(&socket_path));
        let (stream, _) = listener.accept().expect("Failed to accept");
        drop(stream);

        let result = source.on_arguments_processed(&arguments("100"));
        assert!(matches!(result, Err(TableError::ElementUnreachable { .. })));
    }
}
