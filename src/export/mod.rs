// src/export/mod.rs

use crate::table::Table;
use anyhow::{Context, Result};
use csv::Writer;

/// UTF-8 byte order mark. Spreadsheet importers use it to pick the right
/// encoding for accented text.
const BOM: &[u8] = b"\xef\xbb\xbf";

/// Serialize the displayed table back to downloadable CSV bytes: BOM prefix,
/// header row, standard quoting. Artifact-column stripping happened at load
/// time; export writes the table exactly as displayed.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::from(BOM));
    writer
        .write_record(&table.headers)
        .context("writing CSV header row")?;
    for row in &table.rows {
        writer.write_record(row).context("writing CSV data row")?;
    }
    writer.flush().context("flushing CSV output")?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("recovering CSV buffer: {e}"))
}
