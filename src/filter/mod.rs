//! Two-tier filtering
//!
//! Local filters run client-side over fetched values. `filter_remote` picks
//! between a backend-filtered fetch and a fetch-all plus local filter.

mod local;
mod remote;

pub use local::{filter_local, And, KeepAll, LocalFilter};
pub use remote::{filter_remote, FilterRemote};
