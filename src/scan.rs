/*!
The scan driver. Reads a jsonl source line by line, keeps the accepted
records in a bounded batch, and folds each full batch into one running
profile. Lines that are blank, malformed, or not json objects are skipped
without affecting counts - messy real-world jsonl is expected.
*/

use std::io::BufRead;

use crate::profile::{merge_profile, profile_batch, Profile, Record};

/// Batch size used when the caller doesn't care. Tuning knob only - the
/// result is identical for any batch size.
pub const DEFAULT_BATCH_SIZE : usize = 1000;

#[derive(Debug,thiserror::Error)]
pub enum ScanError {
  /// The one error the profiling contract surfaces: raised before any
  /// reading when the path isn't a regular readable file.
  #[error("not a readable file: {}", .0.display())]
  NotFound(std::path::PathBuf),

  #[error("read error: {0}")]
  Io(#[from] std::io::Error),
}

/// What a whole scan produces: how many records were accepted, and the
/// per-field profile over those records.
#[derive(Debug,PartialEq,Eq,serde::Serialize)]
pub struct Report {
  pub total_rows : u64,
  pub fields : Profile,
}

/// The per-line accept/skip decision, as a value rather than as error
/// control flow. Err carries the reason, for the debug log only.
fn parse_or_skip(line : &str) -> Result<Record, &'static str> {
  match serde_json::from_str::<serde_json::Value>(line) {
    Ok(serde_json::Value::Object(map)) => Ok(map),
    Ok(_) => Err("non-object json"),
    Err(_) => Err("malformed json"),
  }
}

/// Profile a jsonl file. Checks the path first so the not-found case fails
/// before any reading, then hands the opened file to [profile_reader].
pub fn profile_source<P>(path : P, max_rows : Option<u64>, batch_size : usize)
-> Result<Report, ScanError>
where P : AsRef<std::path::Path>
{
  let path = path.as_ref();
  if !path.is_file() {
    return Err(ScanError::NotFound(path.to_path_buf()))
  }
  let file = std::fs::File::open(path)?;
  profile_reader(std::io::BufReader::new(file), max_rows, batch_size)
}

/// The scan loop, generic over the byte source so tests can feed it
/// in-memory data. The running profile is owned here and only ever touched
/// through the merge.
pub fn profile_reader<R>(istream : R, max_rows : Option<u64>, batch_size : usize)
-> Result<Report, ScanError>
where R : BufRead
{
  // a batch size of 0 would never flush inside the loop
  let batch_size = batch_size.max(1);

  // counter gives byte positions for the skip diagnostics
  let mut reader = countio::Counter::new(istream);

  let mut total_rows : u64 = 0;
  let mut fields = Profile::new();
  let mut batch : Vec<Record> = vec![];
  let mut buf : Vec<u8> = vec![];

  loop {
    // cap check up front, so reaching it stops the reading immediately and
    // a cap of 0 accepts nothing
    if max_rows.is_some_and(|cap| total_rows >= cap) {
      break
    }

    buf.clear();
    if reader.read_until(b'\n', &mut buf)? == 0 {
      break
    }

    let line = match std::str::from_utf8(&buf) {
      Ok(text) => text.trim(),
      Err(_) => {
        tracing::debug!("skipping non-utf8 line before byte {}", reader.reader_bytes());
        continue
      }
    };
    if line.is_empty() {
      continue
    }

    match parse_or_skip(line) {
      Ok(record) => {
        batch.push(record);
        total_rows += 1;
      }
      Err(reason) => {
        tracing::debug!("skipping line before byte {}: {reason}", reader.reader_bytes());
        continue
      }
    }

    if batch.len() >= batch_size {
      merge_profile(&mut fields, profile_batch(&batch));
      batch.clear();
    }
  }

  // the partial batch left over at eof or at the cap
  if !batch.is_empty() {
    merge_profile(&mut fields, profile_batch(&batch));
  }

  tracing::debug!("scanned {} bytes, {total_rows} rows, {} fields",
    reader.reader_bytes(), fields.len());

  Ok(Report{total_rows, fields})
}

#[cfg(test)]
mod test_scan {
  use super::*;
  use serde_json::json;
  use std::io::Cursor;

  fn scan(text : &str, max_rows : Option<u64>, batch_size : usize) -> Report {
    profile_reader(Cursor::new(text), max_rows, batch_size).unwrap()
  }

  const MIXED : &str = concat!(
    "{\"a\":1,\"b\":null}\n",
    "\n",
    "   \n",
    "not valid json{\n",
    "\"just a string\"\n",
    "[1,2,3]\n",
    "{\"a\":\"x\"}\n",
  );

  #[test]
  fn end_to_end_example() {
    let report = scan("{\"a\":1,\"b\":null}\n{\"a\":\"x\"}\n", None, DEFAULT_BATCH_SIZE);
    let expected = json!({
      "total_rows": 2,
      "fields": {
        "a": {"count": 2, "null_count": 0, "types": {"int": 1, "string": 1}},
        "b": {"count": 1, "null_count": 1, "types": {"null": 1}},
      }
    });
    assert_eq!(serde_json::to_value(&report).unwrap(), expected);
  }

  #[test]
  fn lenient_skipping() {
    // blanks, malformed json, and non-object values all vanish silently
    let report = scan(MIXED, None, DEFAULT_BATCH_SIZE);
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.fields["a"].count, 2);
    assert_eq!(report.fields["b"].count, 1);
  }

  #[test]
  fn missing_trailing_newline() {
    let report = scan("{\"a\":1}\n{\"a\":2}", None, DEFAULT_BATCH_SIZE);
    assert_eq!(report.total_rows, 2);
  }

  #[test]
  fn batch_size_invariance() {
    let lines = (0..25)
      .map(|i| format!("{{\"n\":{i},\"even\":{}}}\n", i % 2 == 0))
      .collect::<String>();
    let baseline = scan(&lines, None, 25);
    for batch_size in [1, 7, 1000] {
      assert_eq!(scan(&lines, None, batch_size), baseline);
    }
    // byte-identical once serialized, too
    let expected = serde_json::to_string(&baseline).unwrap();
    assert_eq!(serde_json::to_string(&scan(&lines, None, 7)).unwrap(), expected);
  }

  #[test]
  fn row_cap() {
    let lines = (0..10).map(|i| format!("{{\"n\":{i}}}\n")).collect::<String>();
    let report = scan(&lines, Some(3), DEFAULT_BATCH_SIZE);
    assert_eq!(report.total_rows, 3);
    // exactly the first 3 records, not rounded up to a batch boundary
    assert_eq!(report.fields["n"].count, 3);
    assert_eq!(report.fields["n"].types[&crate::kind::TypeKind::Int], 3);
  }

  #[test]
  fn row_cap_mid_batch_still_flushes() {
    let lines = (0..10).map(|i| format!("{{\"n\":{i}}}\n")).collect::<String>();
    // cap 5 with batch size 4: one full flush plus a partial of 1
    let report = scan(&lines, Some(5), 4);
    assert_eq!(report.total_rows, 5);
    assert_eq!(report.fields["n"].count, 5);
  }

  #[test]
  fn row_cap_skips_do_not_count() {
    let report = scan(MIXED, Some(2), DEFAULT_BATCH_SIZE);
    // the junk lines between the two objects don't eat into the cap
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.fields["a"].count, 2);
  }

  #[test]
  fn cap_of_zero_reads_nothing() {
    let report = scan("{\"a\":1}\n", Some(0), DEFAULT_BATCH_SIZE);
    assert_eq!(report.total_rows, 0);
    assert!(report.fields.is_empty());
  }

  #[test]
  fn empty_source() {
    let report = scan("", None, DEFAULT_BATCH_SIZE);
    assert_eq!(report.total_rows, 0);
    assert!(report.fields.is_empty());
  }

  #[test]
  fn not_found() {
    let err = profile_source("no/such/file.jsonl", None, DEFAULT_BATCH_SIZE).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
  }

  #[test]
  fn directory_is_not_a_source() {
    let dir = tempfile::tempdir().unwrap();
    let err = profile_source(dir.path(), None, DEFAULT_BATCH_SIZE).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
  }

  #[test]
  fn profile_source_reads_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.jsonl");
    std::fs::write(&path, "{\"a\":1,\"b\":null}\n{\"a\":\"x\"}\n").unwrap();
    let report = profile_source(&path, None, DEFAULT_BATCH_SIZE).unwrap();
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.fields["b"].null_count, 1);
  }
}
