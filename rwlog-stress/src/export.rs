//! CSV export of the final log contents.

use eyre::{Context, Result};
use rwlog::{Entry, RwLog};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Dump a full snapshot of the log to `path` as CSV. Takes its own read
/// session, so the exported rows are a consistent point-in-time view.
/// Returns the number of entries written.
pub fn dump_csv(log: &RwLog, path: &Path) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("failed to create dump file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let session = log
        .begin_read()
        .context("failed to open read session for dump")?;
    let mut buf = vec![Entry::default(); log.capacity()];
    let n = session.snapshot(&mut buf).context("snapshot failed")?;
    drop(session);

    writeln!(writer, "seq,writer_id,ts_ns,msg")?;
    for entry in &buf[..n] {
        writeln!(
            writer,
            "{},{},{},{}",
            entry.sequence(),
            entry.writer_id(),
            entry.timestamp_ns(),
            String::from_utf8_lossy(entry.payload())
        )?;
    }
    writer.flush()?;

    Ok(n)
}
