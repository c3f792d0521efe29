use std::{
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::PathBuf,
};

use ripple_solver::{
    Snapshot,
    SnapshotSink,
};

/// Dumps each snapshot as the raw little-endian `f32` sequence, row-major
/// (`i` outer, `j` inner), no header. The file is rewritten on every record,
/// so it always holds the latest time level.
#[derive(Clone, Debug)]
pub struct BinarySnapshotWriter {
    path: PathBuf,
}

impl BinarySnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSink for BinarySnapshotWriter {
    fn record(&mut self, snapshot: &Snapshot<'_>) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for &value in snapshot.values {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()
    }
}

/// Dumps each snapshot as text: one row per line, every value formatted to
/// 4 decimal digits and followed by a single space. Rewritten on every
/// record, like [`BinarySnapshotWriter`].
#[derive(Clone, Debug)]
pub struct TextSnapshotWriter {
    path: PathBuf,
}

impl TextSnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSink for TextSnapshotWriter {
    fn record(&mut self, snapshot: &Snapshot<'_>) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for row in snapshot.rows() {
            for value in row {
                write!(writer, "{value:.4} ")?;
            }
            writeln!(writer)?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector2;
    use ripple_solver::{
        Snapshot,
        SnapshotSink,
    };

    use super::{
        BinarySnapshotWriter,
        TextSnapshotWriter,
    };

    fn snapshot(values: &[f32]) -> Snapshot<'_> {
        Snapshot {
            level: 1,
            time: 0.001,
            dimensions: Vector2::new(2, 2),
            values,
        }
    }

    #[test]
    fn it_writes_raw_little_endian_floats() {
        let path = std::env::temp_dir().join("ripple-writer-test.bin");
        let values = [1.0f32, -2.5, 0.25, 3.0];

        BinarySnapshotWriter::new(&path)
            .record(&snapshot(&values))
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let mut expected = Vec::new();
        for value in values {
            expected.extend_from_slice(&value.to_le_bytes());
        }
        assert_eq!(bytes, expected);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn it_writes_one_row_per_line() {
        let path = std::env::temp_dir().join("ripple-writer-test.dat");
        let values = [1.0f32, -2.5, 0.25, 3.0];

        TextSnapshotWriter::new(&path)
            .record(&snapshot(&values))
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "1.0000 -2.5000 \n0.2500 3.0000 \n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn it_keeps_only_the_latest_snapshot() {
        let path = std::env::temp_dir().join("ripple-writer-latest.bin");
        let mut writer = BinarySnapshotWriter::new(&path);

        writer.record(&snapshot(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        writer.record(&snapshot(&[5.0, 6.0, 7.0, 8.0])).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &5.0f32.to_le_bytes());
        std::fs::remove_file(&path).unwrap();
    }
}
