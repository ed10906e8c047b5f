//! Push-style iteration with early stop
//!
//! Cursors are pulled by `drive` and every record is pushed through a chain
//! of consumer stages. Decoding, expansion and both filter tiers are stages;
//! the consumer at the end decides whether the loop continues.

mod consumer;
mod cursor;
mod driver;
mod stages;

pub use consumer::{
    consume_entries, consume_filtered_many, Consumer, FilteredConsumer, Flow, PackedConsumer,
};
pub use cursor::{Cursor, FnCursor, IterCursor};
pub use driver::{
    collect_converted, collect_converted_filtered, drive, iter_to_consumer_converted,
    iter_to_consumer_filtered, iter_to_consumer_unnested,
};
pub use stages::{Decoded, Filtered, Unfiltered, Unnested, Unpacked};
