//! The lookup flow: origin gate, challenge verification, credential
//! exchange and member lookup, run strictly in that order.

pub mod origin;
pub mod pipeline;
pub mod rejection;

pub use origin::{origin_gate, RequestOrigin};
pub use pipeline::{handle_lookup, lookup_member};
pub use rejection::Rejection;
