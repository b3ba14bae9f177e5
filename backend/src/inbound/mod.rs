//! Inbound adapters that translate external requests into domain port calls
//! while keeping framework details at the edge.
//!
//! HTML over HTTP is the only transport; it lives under [`http`].

pub mod http;
