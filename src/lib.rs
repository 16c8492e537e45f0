/*!
Schema profiling for jsonl datasets. For every top-level field seen across
the records: how often it appears, how often it is null, and a tally of the
coarse value types encountered. Input is read in bounded-size batches so
arbitrarily large files profile in bounded memory.
*/

// value classification
pub mod kind;
// per-batch profiling and the running merge
pub mod profile;
// line reading, batching, the whole-file scan
pub mod scan;

pub use kind::{classify, TypeKind};
pub use profile::{merge_profile, profile_batch, FieldStat, Profile, Record};
pub use scan::{profile_reader, profile_source, Report, ScanError, DEFAULT_BATCH_SIZE};
