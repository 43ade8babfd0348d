//! Turns per-track durations into a cumulative, printable tracklist

use std::fmt::Display;

use crate::domain::track::Track;

/// One tracklist line: where the track starts, and what it is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracklistEntry {
    pub timestamp: String,
    pub title: String,
}

impl Display for TracklistEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.timestamp, self.title)
    }
}

/// Builds the tracklist: entry N starts where tracks 1..N-1 end, so the
/// first entry is always 00:00:00.
pub fn tracklist(tracks: &[Track]) -> Vec<TracklistEntry> {
    let mut entries = Vec::with_capacity(tracks.len());
    let mut offset_secs = 0.0_f64;
    for track in tracks {
        entries.push(TracklistEntry {
            timestamp: format_timestamp(offset_secs),
            title: track.title.clone(),
        });
        offset_secs += track.duration_secs;
    }
    entries
}

/// Zero-padded HH:MM:SS, flooring fractional seconds. Offsets past a day
/// keep counting hours instead of wrapping.
pub fn format_timestamp(offset_secs: f64) -> String {
    let total = offset_secs.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn mock_track(title: &str, duration_secs: f64) -> Track {
        Track {
            source: PathBuf::from(format!("/music/{title}.flac")),
            normalized: PathBuf::from(format!("/tmp/{title}.flac")),
            duration_secs,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_empty_input_gives_empty_tracklist() {
        assert!(tracklist(&[]).is_empty());
    }

    #[test]
    fn test_first_entry_is_always_zero() {
        let entries = tracklist(&[mock_track("Intro", 183.5)]);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp, "00:00:00");
        assert_eq!(entries[0].title, "Intro");
    }

    #[test]
    fn test_entries_accumulate_preceding_durations() {
        let tracks = [
            mock_track("One", 61.4),
            mock_track("Two", 2.7),
            mock_track("Three", 0.9),
        ];

        let entries = tracklist(&tracks);

        // 0.0, 61.4 and 64.1 seconds, floored
        assert_eq!(entries[0].timestamp, "00:00:00");
        assert_eq!(entries[1].timestamp, "00:01:01");
        assert_eq!(entries[2].timestamp, "00:01:04");
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let tracks = [
            mock_track("a", 10.0),
            mock_track("b", 0.0),
            mock_track("c", 3599.9),
            mock_track("d", 0.2),
        ];

        let entries = tracklist(&tracks);
        let stamps: Vec<&str> = entries.iter().map(|e| e.timestamp.as_str()).collect();

        let mut sorted = stamps.clone();
        sorted.sort();
        assert_eq!(stamps, sorted);
    }

    #[test]
    fn test_format_timestamp_pads_and_carries() {
        assert_eq!(format_timestamp(0.0), "00:00:00");
        assert_eq!(format_timestamp(59.9), "00:00:59");
        assert_eq!(format_timestamp(60.0), "00:01:00");
        assert_eq!(format_timestamp(3599.0), "00:59:59");
        assert_eq!(format_timestamp(3600.0), "01:00:00");
        assert_eq!(format_timestamp(86399.0), "23:59:59");
    }

    #[test]
    fn test_hours_widen_past_a_day() {
        assert_eq!(format_timestamp(86400.0), "24:00:00");
        assert_eq!(format_timestamp(363_723.0), "101:02:03");
    }

    #[test]
    fn test_display_renders_timestamp_then_title() {
        let entries = tracklist(&[mock_track("Opening", 2.0)]);
        assert_eq!(entries[0].to_string(), "00:00:00 Opening");
    }
}
