//! GPX 1.1 reading and writing.
//!
//! Wraps the `gpx` crate. Every track and track segment of a document is
//! flattened, in document order, into the single point sequence of one
//! [`Track`]. Writing emits that sequence as one `<trk>` with one
//! `<trkseg>`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use geo_types::Point;
use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};
use log::info;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::point::GeoPoint;
use crate::track::Track;

const CREATOR: &str = concat!("trackstats ", env!("CARGO_PKG_VERSION"));

/// Parse a GPX document from any reader into a flattened track.
///
/// Every track point must carry a `<time>`; elevation is optional.
pub fn read_track<R: Read>(reader: R) -> Result<Track> {
    let gpx = gpx::read(reader)?;

    let mut points = Vec::new();
    for wp in gpx
        .tracks
        .iter()
        .flat_map(|t| t.segments.iter())
        .flat_map(|seg| seg.points.iter())
    {
        let time = wp
            .time
            .clone()
            .ok_or(Error::MissingTimestamp { index: points.len() })?;
        points.push(GeoPoint::new(
            wp.point().y(),
            wp.point().x(),
            wp.elevation,
            OffsetDateTime::from(time),
        ));
    }

    Ok(Track::new(points))
}

/// Load a track from a GPX file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Track> {
    let path = path.as_ref();
    let track = read_track(BufReader::new(File::open(path)?))?;
    info!("Loaded {} points from {}", track.len(), path.display());
    Ok(track)
}

/// Serialize a track as a GPX 1.1 document.
pub fn write_track<W: Write>(track: &Track, writer: W) -> Result<()> {
    let mut segment = TrackSegment::default();
    for p in track.points() {
        let mut wp = Waypoint::new(Point::new(p.longitude(), p.latitude()));
        wp.elevation = p.elevation();
        wp.time = Some(p.timestamp().into());
        segment.points.push(wp);
    }

    let mut trk = gpx::Track::default();
    trk.segments.push(segment);

    let doc = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(CREATOR.to_string()),
        tracks: vec![trk],
        ..Default::default()
    };
    gpx::write(&doc, writer)?;
    Ok(())
}

/// Export a track to a GPX file, replacing any existing file.
pub fn export<P: AsRef<Path>>(track: &Track, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_track(track, &mut writer)?;
    writer.flush()?;
    info!("Exported {} points to {}", track.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    const WORKOUT_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning Run</name>
    <trkseg>
      <trkpt lat="1.0" lon="1.0"><ele>10</ele><time>2024-05-01T08:00:00Z</time></trkpt>
      <trkpt lat="1.0" lon="1.0"><ele>12</ele><time>2024-05-01T08:01:00Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="2.0" lon="2.0"><time>2024-05-01T08:02:00Z</time></trkpt>
    </trkseg>
  </trk>
  <trk>
    <trkseg>
      <trkpt lat="2.5" lon="2.0"><ele>20</ele><time>2024-05-01T08:03:00Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn read_flattens_tracks_and_segments() {
        let track = read_track(WORKOUT_GPX.as_bytes()).unwrap();
        assert_eq!(track.len(), 4);

        let lats: Vec<f64> = track.points().iter().map(GeoPoint::latitude).collect();
        assert_eq!(lats, vec![1.0, 1.0, 2.0, 2.5]);
        assert_eq!(
            track.segment().duration().unwrap(),
            Duration::minutes(3)
        );
    }

    #[test]
    fn read_keeps_missing_elevation() {
        let track = read_track(WORKOUT_GPX.as_bytes()).unwrap();
        let p = &track.points()[0];
        assert!((p.latitude() - 1.0).abs() < 1e-9);
        assert!((p.longitude() - 1.0).abs() < 1e-9);
        assert_eq!(p.elevation(), Some(10.0));
        assert_eq!(track.points()[2].elevation(), None);
    }

    #[test]
    fn read_requires_time() {
        let gpx = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="48.0" lon="16.0"><time>2024-05-01T08:00:00Z</time></trkpt>
      <trkpt lat="48.1" lon="16.1"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

        assert!(matches!(
            read_track(gpx.as_bytes()),
            Err(Error::MissingTimestamp { index: 1 })
        ));
    }

    #[test]
    fn read_empty_gpx() {
        let empty = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns="http://www.topografix.com/GPX/1/1">
</gpx>"#;

        let track = read_track(empty.as_bytes()).unwrap();
        assert!(track.is_empty());
    }

    #[test]
    fn read_invalid_xml_returns_error() {
        assert!(matches!(read_track(&b"not xml at all"[..]), Err(Error::Gpx(_))));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            load("/nonexistent/trackstats/missing.gpx"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn written_track_reads_back() {
        let source = read_track(WORKOUT_GPX.as_bytes()).unwrap();
        let corrected = source.correct_altitude(0.01);
        // Point 2 has no elevation, so correction is refused.
        assert!(matches!(corrected, Err(Error::MissingElevation { index: 2 })));

        let mut buf = Vec::new();
        write_track(&source, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.matches("<trkseg>").count(), 1);

        let back = read_track(buf.as_slice()).unwrap();
        assert_eq!(back, source);
    }
}
