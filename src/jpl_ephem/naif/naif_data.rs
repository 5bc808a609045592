use std::{collections::HashMap, fmt};

use camino::Utf8Path;
use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::porkchop_errors::PorkchopError;

use super::{
    daf_header::{DAFHeader, DAF_RECORD_BYTES},
    spk_segment::SpkSegment,
    summary_record::{Summary, SummaryRecordControl},
};

/// NAIF id of the solar system barycenter, root of every SPK chain.
pub const SSB_ID: i32 = 0;

/// Longest target → center chain accepted before giving up (DE kernels need at most 2 hops).
const MAX_CHAIN_DEPTH: usize = 8;

/// An SPK kernel loaded in memory, segments indexed by target NAIF id.
#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    segments: HashMap<i32, Vec<SpkSegment>>,
}

impl NaifData {
    /// Read and decode a binary SPK kernel from disk.
    pub fn read_naif_file(file_path: &Utf8Path) -> Result<Self, PorkchopError> {
        let bytes = std::fs::read(file_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PorkchopError::JPLFileNotFound(file_path.to_string()),
            _ => PorkchopError::IoError(e),
        })?;
        let naif = NaifData::from_bytes(&bytes)?;
        debug!(
            path = %file_path,
            segments = naif.segment_count(),
            "loaded SPK kernel"
        );
        Ok(naif)
    }

    /// Decode an SPK kernel held in memory.
    ///
    /// Segments of a type that cannot be evaluated are skipped with a warning.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PorkchopError> {
        let daf_header = DAFHeader::from_bytes(bytes)?;
        let ss = daf_header.summary_size();

        let mut segments: HashMap<i32, Vec<SpkSegment>> = HashMap::new();
        let mut record_number = daf_header.fward as usize;
        let mut visited = 0usize;

        while record_number != 0 {
            visited += 1;
            if visited > bytes.len() / DAF_RECORD_BYTES {
                return Err(PorkchopError::NomParsingError(
                    "cycle in the DAF summary record chain".into(),
                ));
            }

            let offset = (record_number - 1) * DAF_RECORD_BYTES;
            let record = bytes
                .get(offset..offset + DAF_RECORD_BYTES)
                .ok_or_else(|| {
                    PorkchopError::NomParsingError(format!(
                        "summary record {record_number} beyond end of file"
                    ))
                })?;

            let (_, control) = SummaryRecordControl::parse(record)
                .map_err(|e| PorkchopError::NomParsingError(format!("summary record: {e}")))?;

            for i in 0..control.nsum {
                let start = 24 + i * ss * 8;
                let summary_bytes = record.get(start..start + ss * 8).ok_or_else(|| {
                    PorkchopError::NomParsingError(format!(
                        "summary {i} overflows record {record_number}"
                    ))
                })?;
                let (_, summary) = Summary::parse(summary_bytes)
                    .map_err(|e| PorkchopError::NomParsingError(format!("summary: {e}")))?;

                match SpkSegment::from_bytes(bytes, summary.clone()) {
                    Ok(segment) => segments.entry(summary.target).or_default().push(segment),
                    Err(PorkchopError::InvalidSpkDataType(data_type)) => {
                        warn!(
                            target_id = summary.target,
                            center_id = summary.center,
                            data_type,
                            "skipping SPK segment of unsupported type"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }

            record_number = control.next;
        }

        Ok(NaifData {
            daf_header,
            segments,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.values().map(Vec::len).sum()
    }

    /// Whether the kernel can position `naif_id` (the barycenter always can).
    pub fn has_target(&self, naif_id: i32) -> bool {
        naif_id == SSB_ID || self.segments.contains_key(&naif_id)
    }

    fn segment(&self, target: i32, et_seconds: f64) -> Result<&SpkSegment, PorkchopError> {
        let candidates = self
            .segments
            .get(&target)
            .ok_or(PorkchopError::MissingSegment {
                target,
                center: SSB_ID,
            })?;

        candidates
            .iter()
            .find(|segment| segment.covers(et_seconds))
            .ok_or_else(|| PorkchopError::EphemerisOutOfRange {
                naif_id: target,
                epoch: format!("ET {et_seconds:.3} s"),
            })
    }

    /// State of `target` relative to the solar system barycenter, following the chain of
    /// segment centers (e.g. Earth → Earth-Moon barycenter → SSB).
    pub fn state_wrt_ssb(
        &self,
        target: i32,
        et_seconds: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), PorkchopError> {
        let mut position = Vector3::zeros();
        let mut velocity = Vector3::zeros();
        let mut body = target;

        for _ in 0..MAX_CHAIN_DEPTH {
            if body == SSB_ID {
                return Ok((position, velocity));
            }
            let segment = self.segment(body, et_seconds)?;
            let (p, v) = segment.state(et_seconds)?;
            position += p;
            velocity += v;
            body = segment.summary.center;
        }

        Err(PorkchopError::MissingSegment {
            target,
            center: SSB_ID,
        })
    }

    /// Position (km) and velocity (km/s) of `target` relative to `center`, in the kernel frame.
    pub fn ephemeris(
        &self,
        target: i32,
        center: i32,
        et_seconds: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), PorkchopError> {
        let (pt, vt) = self.state_wrt_ssb(target, et_seconds)?;
        let (pc, vc) = self.state_wrt_ssb(center, et_seconds)?;
        Ok((pt - pc, vt - vc))
    }
}

impl fmt::Display for NaifData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.daf_header)?;
        let mut targets: Vec<_> = self.segments.keys().copied().collect();
        targets.sort_unstable();
        for target in targets {
            for segment in &self.segments[&target] {
                writeln!(f, "{}", segment.summary)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_naif_file {
    use super::*;
    use crate::jpl_ephem::naif::test_kernel::{build_spk, SyntheticSegment};
    use approx::assert_relative_eq;

    fn kernel() -> NaifData {
        let bytes = build_spk(&[
            // Sun wrt SSB, constant
            SyntheticSegment {
                target: 10,
                center: 0,
                start: -1000.0,
                end: 1000.0,
                records: vec![[vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]]; 2],
            },
            // EMB wrt SSB, moving along x at 100 km per half record
            SyntheticSegment {
                target: 3,
                center: 0,
                start: -1000.0,
                end: 1000.0,
                records: vec![
                    [vec![1.0e8, 100.0], vec![0.0, 0.0], vec![0.0, 0.0]],
                    [vec![1.0e8 + 200.0, 100.0], vec![0.0, 0.0], vec![0.0, 0.0]],
                ],
            },
            // Earth wrt EMB
            SyntheticSegment {
                target: 399,
                center: 3,
                start: -1000.0,
                end: 1000.0,
                records: vec![[vec![-4000.0], vec![10.0], vec![0.0]]],
            },
        ]);
        NaifData::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_read_synthetic_kernel() {
        let naif = kernel();
        assert_eq!(naif.segment_count(), 3);
        assert_eq!(naif.daf_header.idword, "DAF/SPK");
        assert!(naif.has_target(399));
        assert!(naif.has_target(SSB_ID));
        assert!(!naif.has_target(499));
    }

    #[test]
    fn test_chain_resolution() {
        let naif = kernel();

        // second EMB record: mid = 500, radius = 500, τ = (750 - 500) / 500 = 0.5
        let (p, v) = naif.state_wrt_ssb(399, 750.0).unwrap();
        assert_relative_eq!(p.x, 1.0e8 + 200.0 + 50.0 - 4000.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 10.0, epsilon = 1e-12);
        assert_relative_eq!(v.x, 100.0 / 500.0, epsilon = 1e-12);

        let (p, v) = naif.ephemeris(399, 10, 750.0).unwrap();
        assert_relative_eq!(p, Vector3::new(1.0e8 + 250.0 - 4000.0 - 1.0, 8.0, -3.0), epsilon = 1e-6);
        assert_relative_eq!(v, Vector3::new(0.2, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_errors() {
        let naif = kernel();
        assert_eq!(
            naif.ephemeris(499, 10, 0.0),
            Err(PorkchopError::MissingSegment {
                target: 499,
                center: 0
            })
        );
        assert!(matches!(
            naif.ephemeris(399, 10, 5000.0),
            Err(PorkchopError::EphemerisOutOfRange { naif_id: 399, .. })
        ));
        assert!(matches!(
            NaifData::read_naif_file(Utf8Path::new("missing/de440.bsp")),
            Err(PorkchopError::JPLFileNotFound(_))
        ));
    }
}
