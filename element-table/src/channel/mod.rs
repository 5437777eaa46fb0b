//! Channel module for element registry communication
//!
//! The pipeline talks to the registry through the [`ElementChannel`] trait.
//! The main components are:
//!
//! - `trait_def`: the channel trait
//! - `thrift_channel`: Thrift binary protocol over a Unix socket
//! - `fixture_channel`: in-memory registry read from a JSON document
//! - `wire`: Thrift encoding of the registry requests and replies

pub mod fixture_channel;
pub mod thrift_channel;
pub mod trait_def;
pub mod wire;

use enum_dispatch::enum_dispatch;

pub use fixture_channel::{Fixture, FixtureChannel};
pub use thrift_channel::{ThriftChannel, DEFAULT_TIMEOUT};
pub use trait_def::ElementChannel;

use crate::schema::{ElementInfo, ElementRef, ProtocolIdentity, ProtocolSchema, RawColumns};

/// Either channel, picked at runtime.
#[enum_dispatch(ElementChannel)]
pub enum AnyChannel {
    Thrift(ThriftChannel),
    Fixture(FixtureChannel),
}
