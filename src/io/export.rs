//! CSV export of S11 traces and match summaries.
//!
//! Trace files carry everything a plotting front-end needs for magnitude,
//! phase and Smith-chart views; no rendering happens here.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::hz_to_ghz;
use crate::dataset::AntennaDataset;
use crate::errors::AntennaMatchError;
use crate::matching::MatchReport;
use crate::sweep::{mag_db, phase_deg};

/// Writes `frequency_ghz,s11_db,phase_deg,real,imag` rows for every sample.
pub fn write_s11_trace_csv<W: Write>(mut w: W, dataset: &AntennaDataset) -> io::Result<()> {
    writeln!(w, "frequency_ghz,s11_db,phase_deg,real,imag")?;
    let db = mag_db(dataset.s11());
    let phase = phase_deg(dataset.s11());
    for (i, sample) in dataset.samples().iter().enumerate() {
        writeln!(
            w,
            "{:.16e},{:.16e},{:.16e},{:.16e},{:.16e}",
            hz_to_ghz(sample.frequency),
            db[i],
            phase[i],
            sample.s11.re,
            sample.s11.im
        )?;
    }
    Ok(())
}

/// Quotes a CSV field when it holds a separator, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Writes one summary row per `(antenna, report)` pair.
///
/// Infinite return loss or VSWR are written as `inf`.
pub fn write_match_summary_csv<'a, W, I>(mut w: W, reports: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a MatchReport)>,
{
    writeln!(
        w,
        "antenna,target_ghz,frequency_ghz,s11_db,phase_deg,return_loss_db,vswr,quality"
    )?;
    for (name, r) in reports {
        writeln!(
            w,
            "{},{},{},{:.4},{:.4},{:.4},{:.4},{:?}",
            csv_field(name),
            hz_to_ghz(r.target_frequency),
            hz_to_ghz(r.frequency),
            r.s11_db,
            r.phase_deg,
            r.return_loss_db,
            r.vswr,
            r.quality
        )?;
    }
    Ok(())
}

/// Writes `<name>_s11.csv` for each dataset into `out_dir`, creating it if needed.
pub fn export_s11_traces(
    datasets: &[AntennaDataset],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, AntennaMatchError> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let path = out_dir.join(format!("{}_s11.csv", dataset.name()));
        let mut writer = BufWriter::new(File::create(&path)?);
        write_s11_trace_csv(&mut writer, dataset)?;
        writer.flush()?;
        info!(file = %path.display(), "wrote S11 trace");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sample;
    use crate::matching::evaluate;
    use crate::math::CScalar;
    use tempfile::tempdir;

    fn dataset() -> AntennaDataset {
        AntennaDataset::new(
            "antenna1",
            vec![
                Sample::new(2.3e9, CScalar::new(0.1, 0.0)),
                Sample::new(2.4e9, CScalar::new(0.0, 0.05)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn trace_csv_has_header_and_one_row_per_sample() {
        let mut buf = Vec::new();
        write_s11_trace_csv(&mut buf, &dataset()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "frequency_ghz,s11_db,phase_deg,real,imag");
        let cols: Vec<f64> = lines[2].split(',').map(|c| c.parse().unwrap()).collect();
        assert!((cols[0] - 2.4).abs() < 1e-12);
        assert!((cols[1] + 26.0206).abs() < 1e-4);
        assert!((cols[2] - 90.0).abs() < 1e-9);
        assert!((cols[4] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn summary_csv_writes_inf_for_perfect_match() {
        let perfect = AntennaDataset::new("antenna2", vec![Sample::new(2.4e9, CScalar::new(0.0, 0.0))]).unwrap();
        let report = evaluate(perfect.samples(), 2.4e9).unwrap();
        let mut buf = Vec::new();
        write_match_summary_csv(&mut buf, [(perfect.name(), &report)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("antenna2,2.4,2.4,"));
        assert!(row.contains(",inf,1.0000,Good"));
    }

    #[test]
    fn export_writes_one_file_per_dataset() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("traces");
        let written = export_s11_traces(&[dataset()], &dir).unwrap();
        assert_eq!(written, vec![dir.join("antenna1_s11.csv")]);
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn summary_csv_quotes_names_with_separators() {
        let report = evaluate(dataset().samples(), 2.4e9).unwrap();
        let mut buf = Vec::new();
        write_match_summary_csv(
            &mut buf,
            [("antenna1,rev", &report), ("ant \"b\"", &report), ("antenna3", &report)],
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert!(rows[1].starts_with("\"antenna1,rev\",2.4,"));
        assert!(rows[2].starts_with("\"ant \"\"b\"\"\",2.4,"));
        assert!(rows[3].starts_with("antenna3,2.4,"));
        // Every row keeps the header's column count once quoted commas are skipped.
        let columns = |row: &str| row.split('"').step_by(2).map(|part| part.matches(',').count()).sum::<usize>() + 1;
        assert!(rows.iter().all(|row| columns(row) == 8));
    }
}
