//! An embeddable HTTP/1.x client and server runtime based on `tokio`
//! tools.
//!
//! The heart of the crate is a set of incremental, byte-at-a-time
//! wire-format parsers with strict bounds on every peer-controlled
//! field: start lines, header blocks and chunked transfer coding. On
//! top of them sit the `RequestReceiver`/`ResponseReceiver` state
//! machines that frame message bodies across packet boundaries, the
//! `TxRequest`/`TxResponse` encoders, and per-connection protocol
//! state machines for both the server and the client role.
//!
//! The crate never opens sockets: connections are generic over any
//! byte transport implementing `AsyncRead + AsyncWrite`, so plain TCP
//! and TLS streams plug in equally.
#![recursion_limit="100"]

extern crate futures;
extern crate netbuf;
extern crate tk_bufstream;
extern crate tokio_io;
extern crate url;
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;
#[cfg(feature="date_header")] extern crate httpdate;

pub mod character;
pub mod chunked;
pub mod connection;
pub mod header_field;
pub mod headers;
pub mod request;
pub mod response;
pub mod router;
pub mod uri;
pub mod server;
pub mod client;
mod enums;
mod error;
mod limits;

pub use enums::{Method, Status, Version};
pub use error::Error;
pub use headers::{MessageHeaders, Recv};
pub use limits::Limits;
pub use request::{RequestReceiver, RxRequest, TxRequest};
pub use response::{ResponseReceiver, RxResponse, TxResponse};
pub use router::RequestRouter;
pub use uri::RequestUri;
