//! Machine history: wire decoding and tabular export.
//!
//! The `history` resource sends a compact form:
//!  - `elapsedTimes` as deltas-of-deltas of ms offsets from `start`
//!  - per tag, `elapsedIndexes` as deltas into the decoded `elapsedTimes`
//!  - per tag, `values` compacted according to its type, see [`ValueCodec`]
//!
//! [`decode()`] turns that into an owned [`History`] with absolute
//! offsets, indexes, and values. [`tabulate()`] lines the tags up on the
//! shared timeline.

pub mod decoder;
pub mod error;
pub mod model;
pub mod table;

pub use decoder::{ValueCodec, decode, decode_payload};
pub use error::{HistoryError, TagFault};
pub use model::{History, HistoryTag, RawHistory, RawTag, TagDef, TagType, TagValue};
pub use table::{Row, Table, history_to_csv, tabulate};
