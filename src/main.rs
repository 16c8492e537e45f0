use std::io::Write;

use clap::Parser;

/// Profile a jsonl dataset: per-field presence, null counts, and value type
/// tallies, written out as pretty-printed json.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
  /// Path to the jsonl file to profile.
  #[arg(long)]
  input : std::path::PathBuf,

  /// Maximum number of rows to read, for sampling. Unlimited when absent.
  #[arg(long)]
  max_rows : Option<u64>,

  /// Records per in-memory batch. Tuning knob only, never changes the output.
  #[arg(long, default_value_t = jlprof::DEFAULT_BATCH_SIZE)]
  batch_size : usize,

  /// Path of the json file the profile is written to.
  #[arg(long)]
  output : std::path::PathBuf,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // fails before the output file is touched, so a bad input path leaves
  // nothing behind
  let report = jlprof::profile_source(&args.input, args.max_rows, args.batch_size)?;

  if let Some(parent) = args.output.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent)?;
    }
  }
  let mut out = std::io::BufWriter::new(std::fs::File::create(&args.output)?);
  serde_json::to_writer_pretty(&mut out, &report)?;
  writeln!(out)?;
  out.flush()?;

  println!("wrote profile to {}", args.output.display());
  Ok(())
}
