//! Tab-delimited serialization of the output tables.

use super::{FlagTable, SUMMARY_DIGITS, SummaryTable, VolcanoSeries, round_to};
use crate::error::Result;
use log::info;
use std::io::Write;
use std::path::Path;

fn tsv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer)
}

/// Display form of a summary value: rounded, NaN as an empty cell.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_infinite() {
        if value > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        round_to(value, SUMMARY_DIGITS).to_string()
    }
}

pub fn write_summary<W: Write>(table: &SummaryTable, writer: W) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    let mut header = vec![table.index_name.as_str()];
    header.extend(table.columns.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (id, row) in table.feature_ids.iter().zip(table.values.rows()) {
        let mut record = vec![id.clone()];
        record.extend(row.iter().map(|&v| format_value(v)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_flags<W: Write>(table: &FlagTable, writer: W) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    let mut header = vec![table.index_name.as_str()];
    header.extend(table.columns.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (id, row) in table.feature_ids.iter().zip(table.values.rows()) {
        let mut record = vec![id.as_str()];
        record.extend(row.iter().map(|&flag| if flag { "1" } else { "0" }));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Long-form volcano data: one line per (pair, feature).
pub fn write_volcano<W: Write>(series: &[VolcanoSeries], index_name: &str, cutoff: f64, writer: W) -> Result<()> {
    let mut wtr = tsv_writer(writer);
    wtr.write_record(["pair", index_name, "diff", "neg_log10_p_value", "significant"])?;

    for s in series {
        for i in 0..s.len() {
            wtr.write_record([
                s.label.clone(),
                s.feature_ids[i].clone(),
                format_value(s.differences[i]),
                format_value(s.neg_log10_p_values[i]),
                if s.is_highlighted(i, cutoff) { "1" } else { "0" }.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summary_file<P: AsRef<Path>>(table: &SummaryTable, path: P) -> Result<()> {
    write_summary(table, std::fs::File::create(path.as_ref())?)?;
    info!("Summaries written to {}", path.as_ref().display());
    Ok(())
}

pub fn write_flags_file<P: AsRef<Path>>(table: &FlagTable, path: P) -> Result<()> {
    write_flags(table, std::fs::File::create(path.as_ref())?)?;
    info!("Flags written to {}", path.as_ref().display());
    Ok(())
}

pub fn write_volcano_file<P: AsRef<Path>>(
    series: &[VolcanoSeries],
    index_name: &str,
    cutoff: f64,
    path: P,
) -> Result<()> {
    write_volcano(series, index_name, cutoff, std::fs::File::create(path.as_ref())?)?;
    info!("Pairwise volcano data written to {}", path.as_ref().display());
    Ok(())
}
