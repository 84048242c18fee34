//! Application layer: the tokenization dispatch core and the
//! payment-method clients built on it.
//!
//! Every client funnels its request through [`dispatch::TokenizeDispatcher`],
//! which guarantees a single terminal callback per call and sequences the
//! risk-collection and analytics side effects around it.

pub mod card;
pub mod dispatch;
pub mod google_pay;
pub mod paypal;
