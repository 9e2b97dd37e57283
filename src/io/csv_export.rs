use std::path::Path;

use super::IoResult;
use crate::model::Row;

/// Export the timeline rows to a semicolon-delimited CSV file, one line per bar.
///
/// Columns: Row Id ; Row ; Bar ; Label ; Start ; End ; Late
/// Returns the number of bars written.
pub fn export_schedule(rows: &[Row], path: &Path) -> IoResult<usize> {
    let file = std::fs::File::create(path)?;
    let count = write_schedule(rows, file)?;
    tracing::info!(path = %path.display(), bars = count, "schedule exported");
    Ok(count)
}

pub fn write_schedule<W: std::io::Write>(rows: &[Row], out: W) -> IoResult<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(out);

    wtr.write_record(["Row Id", "Row", "Bar", "Label", "Start", "End", "Late"])?;

    let mut count = 0;
    for row in rows {
        for (idx, bar) in row.bars.iter().enumerate() {
            wtr.write_record([
                row.id.as_str(),
                row.name.as_str(),
                &idx.to_string(),
                bar.label.as_str(),
                &format!("{:.0}", bar.interval.start),
                &format!("{:.0}", bar.interval.end),
                if bar.late { "yes" } else { "no" },
            ])?;
            count += 1;
        }
    }

    wtr.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::model::{build_rows, Scenario};

    #[test]
    fn writes_one_line_per_bar() {
        let rows = build_rows(&Scenario::sample(), &TimelineConfig::default());
        let mut buf = Vec::new();
        let count = write_schedule(&rows.rows, &mut buf).unwrap();
        assert_eq!(count, rows.bar_count());

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Row Id;Row;Bar;Label;Start;End;Late"));
        let first = lines.next().unwrap();
        assert!(first.starts_with("ship_1;Order 1;0;"));
        assert!(first.ends_with(";60;180;no"));
        assert_eq!(text.lines().count(), count + 1);
    }
}
