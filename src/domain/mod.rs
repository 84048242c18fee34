//! Payment-method value objects, nonces, and the ports the dispatch core
//! talks to.

pub mod card;
pub mod invocation;
pub mod nonce;
pub mod ports;
pub mod request;
