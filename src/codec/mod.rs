//! Codec subsystem for aeroscan
//!
//! Decode checks format validity (one record in, one out). Unpack and
//! unnest expand cardinality (one record in, zero or more out). The stages
//! stay separate so their failure rules and batch forms can be reused on
//! both the server-driven and the client-driven retrieval paths.

mod decode;
mod unnest;
mod unpack;

pub use decode::{decode_all, Decode, DecodeAll, RemoteDecoded};
pub use unnest::Unnest;
pub use unpack::{unpack_all, RemoteUnpacked, Unpack, UnpackAll};
