#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text command protocol and the relay that replicates commands between peers.

mod codec;
mod relay;

pub use codec::{encode, parse, ProtocolError};
pub use relay::{Origin, Relay};
