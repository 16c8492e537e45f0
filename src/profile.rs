/*!
The running profile and the two operations that build it: profile one batch
of records, and fold a batch profile into the aggregate. The merge is
associative and commutative, so any partitioning of the input into batches
produces the same profile.
*/

use crate::kind::{classify, TypeKind};

/// A decoded json object. The scan driver filters out everything else before
/// records reach this module.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// field name => FieldStat. BTreeMap so serialization order is canonical.
pub type Profile = std::collections::BTreeMap<String, FieldStat>;

/// Per-field aggregate. `count` is the number of records where the key was
/// present at all, `null_count` the subset with a null value, and `types`
/// tallies every presence by kind, null included. So count always equals the
/// sum over `types`.
#[derive(Debug,Clone,Default,PartialEq,Eq,serde::Serialize)]
pub struct FieldStat {
  pub count : u64,
  pub null_count : u64,
  pub types : std::collections::BTreeMap<TypeKind, u64>,
}

impl FieldStat {
  fn add(&mut self, value : &serde_json::Value) {
    self.count += 1;
    if value.is_null() {
      self.null_count += 1
    }
    *self.types.entry(classify(value)).or_insert(0) += 1;
  }
}

/// Profile one batch into a fresh Profile.
pub fn profile_batch(records : &[Record]) -> Profile {
  let mut profile = Profile::new();
  for record in records {
    for (field, value) in record {
      profile.entry(field.clone()).or_default().add(value)
    }
  }
  profile
}

/// Fold `src` into `dst`. Fields new to `dst` adopt the src FieldStat
/// outright, existing fields add numerically.
pub fn merge_profile(dst : &mut Profile, src : Profile) {
  use std::collections::btree_map::Entry;
  for (field, stat) in src {
    match dst.entry(field) {
      Entry::Vacant(vacant) => { vacant.insert(stat); }
      Entry::Occupied(mut occupied) => {
        let existing = occupied.get_mut();
        existing.count += stat.count;
        existing.null_count += stat.null_count;
        for (kind, tally) in stat.types {
          *existing.types.entry(kind).or_insert(0) += tally;
        }
      }
    }
  }
}
