//! Frame file reader.
//!
//! Blank lines are skipped. Every other line must hold a species name and
//! exactly six numbers. Any bad line fails the whole frame; there is no
//! partial result.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use rand::Rng;

use super::{FrameBatches, FrameRecord};
use crate::error::MolVizError;

/// Number of whitespace-separated fields in a record.
const FIELDS_PER_RECORD: usize = 7;

/// Read and parse the frame file at `path`.
///
/// Volume-species orientations are drawn from `rng`.
pub fn read_frame<R: Rng + ?Sized>(
    path: &Path,
    rng: &mut R,
) -> Result<FrameBatches, MolVizError> {
    let file = File::open(path).map_err(|e| MolVizError::from_io(path, e))?;
    parse_frame(BufReader::new(file), path, rng)
}

/// Parse frame text from `reader`. `path` is only used in error reports.
pub fn parse_frame<B: BufRead, R: Rng + ?Sized>(
    reader: B,
    path: &Path,
    rng: &mut R,
) -> Result<FrameBatches, MolVizError> {
    let mut frame = FrameBatches::new();
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                MolVizError::data_format(path, line_no, "line is not UTF-8")
            } else {
                MolVizError::from_io(path, e)
            }
        })?;
        if let Some(record) = parse_record(&line, path, line_no)? {
            frame.push(record, || jitter(&mut *rng));
        }
    }
    Ok(frame)
}

/// Parse one line. `Ok(None)` for blank lines.
fn parse_record(
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<Option<FrameRecord>, MolVizError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&species, values)) = tokens.split_first() else {
        return Ok(None);
    };
    if tokens.len() != FIELDS_PER_RECORD {
        return Err(MolVizError::data_format(
            path,
            line_no,
            format!(
                "expected {FIELDS_PER_RECORD} fields, found {}",
                tokens.len()
            ),
        ));
    }

    let mut nums = [0.0_f32; FIELDS_PER_RECORD - 1];
    for (slot, token) in nums.iter_mut().zip(values) {
        *slot = token.parse::<f32>().map_err(|_| {
            MolVizError::data_format(
                path,
                line_no,
                format!("invalid number '{token}' for species '{species}'"),
            )
        })?;
    }

    Ok(Some(FrameRecord {
        species: species.to_owned(),
        position: Vec3::new(nums[0], nums[1], nums[2]),
        orientation: Vec3::new(nums[3], nums[4], nums[5]),
    }))
}

/// Cosmetic orientation for volume molecules: each axis uniform in [-1, 1].
fn jitter<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
    )
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::frame::MoleculeKind;

    fn parse(text: &str) -> Result<FrameBatches, MolVizError> {
        let mut rng = StdRng::seed_from_u64(7);
        parse_frame(text.as_bytes(), Path::new("frame"), &mut rng)
    }

    #[test]
    fn surface_and_volume_species() {
        let frame = parse(
            "foo 1.0 2.0 3.0 0.0 0.0 0.0\nbar 0.0 0.0 0.0 1.0 0.0 0.0\n",
        )
        .unwrap();

        assert_eq!(frame.len(), 2);
        let foo = frame.get("foo").unwrap();
        assert_eq!(foo.kind, MoleculeKind::Surface);
        assert_eq!(foo.positions, vec![Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(foo.orientations, vec![Vec3::ZERO]);

        let bar = frame.get("bar").unwrap();
        assert_eq!(bar.kind, MoleculeKind::Volume);
        let o = bar.orientations[0];
        assert_ne!(o, Vec3::X);
        assert!(o.abs().max_element() <= 1.0);
    }

    #[test]
    fn blank_and_whitespace_lines_are_ignored() {
        let frame = parse("\n  \na 0 0 0 0 0 0\n\t\n").unwrap();
        assert_eq!(frame.molecule_count(), 1);
    }

    #[test]
    fn empty_input_is_an_empty_frame() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn bad_number_fails_whole_frame() {
        let err = parse("a 0 0 0 0 0 0\na 0 x 0 0 0 0\n").unwrap_err();
        assert!(
            matches!(err, MolVizError::DataFormat { line: 2, .. }),
            "{err}"
        );
    }

    #[test]
    fn wrong_field_count_is_data_format() {
        assert!(matches!(
            parse("a 0 0 0\n"),
            Err(MolVizError::DataFormat { line: 1, .. })
        ));
        assert!(matches!(
            parse("a 0 0 0 0 0 0 0\n"),
            Err(MolVizError::DataFormat { .. })
        ));
    }

    #[test]
    fn non_finite_values_do_not_panic() {
        let frame = parse("v 0 0 0 nan inf -inf\n").unwrap();
        assert_eq!(frame.get("v").unwrap().kind, MoleculeKind::Volume);
    }

    #[test]
    fn missing_file_is_not_found() {
        let mut rng = StdRng::seed_from_u64(1);
        let err =
            read_frame(Path::new("/definitely/not/here/0001"), &mut rng)
                .unwrap_err();
        assert!(matches!(err, MolVizError::NotFound(_)));
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let text = "v 0 0 0 1 1 1\nv 1 1 1 1 1 1\n";
        assert_eq!(
            parse(text).unwrap().get("v").unwrap().orientations,
            parse(text).unwrap().get("v").unwrap().orientations
        );
    }
}
