/// CSV document generation for extracted subtitle cues
use crate::captions::SubtitleCue;
use crate::error::{Result, SubtidexError};

/// Fixed header row of every generated document
const HEADER: &str = "Start Time,End Time,Duration,Text";

/// Render an ordered cue list as a CSV document
///
/// Output is deterministic: identical input always yields byte-identical
/// output. Text fields are double-quoted with internal quotes doubled; no
/// other escaping is applied.
pub fn to_csv(cues: &[SubtitleCue]) -> Result<String> {
    if cues.is_empty() {
        return Err(SubtidexError::EmptyInput);
    }

    let mut document = String::from(HEADER);
    document.push('\n');

    for cue in cues {
        let start = format_timestamp(cue.start);
        let end = format_timestamp(cue.start + cue.duration);
        let text = cue.text.replace('"', "\"\"");

        document.push_str(&format!(
            "{},{},{:.2},\"{}\"\n",
            start, end, cue.duration, text
        ));
    }

    Ok(document)
}

/// Format a second offset as `HH:MM:SS.mmm`
///
/// Zero-padded clock arithmetic with no day rollover handling.
pub fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0).round() as u64;

    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(3661.25), "01:01:01.250");
        assert_eq!(format_timestamp(59.999), "00:00:59.999");
        assert_eq!(format_timestamp(7322.5), "02:02:02.500");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(to_csv(&[]), Err(SubtidexError::EmptyInput)));
    }

    #[test]
    fn test_header_and_row_shape() {
        let cues = vec![SubtitleCue::new(1.0, 2.5, "hello world")];
        let document = to_csv(&cues).unwrap();

        let mut lines = document.lines();
        assert_eq!(lines.next(), Some("Start Time,End Time,Duration,Text"));
        assert_eq!(
            lines.next(),
            Some("00:00:01.000,00:00:03.500,2.50,\"hello world\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_internal_quotes_doubled() {
        let cues = vec![SubtitleCue::new(0.0, 1.0, r#"He said "hi""#)];
        let document = to_csv(&cues).unwrap();
        assert!(document.contains(r#""He said ""hi""""#));
    }

    #[test]
    fn test_output_is_deterministic() {
        let cues = vec![
            SubtitleCue::new(0.0, 1.5, "first"),
            SubtitleCue::new(1.5, 2.0, "second"),
        ];
        assert_eq!(to_csv(&cues).unwrap(), to_csv(&cues).unwrap());
    }

    #[test]
    fn test_zero_duration_cue() {
        let cues = vec![SubtitleCue::new(3661.25, 0.0, "marker")];
        let document = to_csv(&cues).unwrap();
        assert!(document.contains("01:01:01.250,01:01:01.250,0.00,\"marker\""));
    }
}
