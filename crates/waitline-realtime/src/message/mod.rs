//! Wire format of queue events.

pub mod codec;

pub use codec::{decode_event, encode_event};
