/// Caption track payload parsing: json3 event lists and timedtext XML
use super::SubtitleCue;
use crate::error::{Result, SubtidexError};
use scraper::{Html, Selector};
use serde::Deserialize;

/// json3 caption payload: a list of timed events
#[derive(Debug, Deserialize)]
struct Json3Payload {
    events: Option<Vec<Json3Event>>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs")]
    start_ms: Option<f64>,
    #[serde(rename = "dDurationMs")]
    duration_ms: Option<f64>,
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    utf8: Option<String>,
}

/// Parse a caption track body according to its declared content type
///
/// JSON-like and XML-like bodies go straight to the matching parser. An
/// unlabeled or unrecognized content type tries JSON first, then XML, before
/// giving up with `ParseFailed`.
pub fn parse_caption_body(content_type: Option<&str>, body: &str) -> Result<Vec<SubtitleCue>> {
    match content_type {
        Some(declared) if declared.contains("application/json") => parse_json3(body),
        Some(declared) if declared.contains("text/xml") => parse_xml(body),
        _ => parse_json3(body).or_else(|_| parse_xml(body)),
    }
}

/// Parse a json3 event list into cues
///
/// Events need both a start time and at least one text segment; everything
/// else is dropped, as are events whose joined text trims to empty.
pub fn parse_json3(body: &str) -> Result<Vec<SubtitleCue>> {
    let payload: Json3Payload =
        serde_json::from_str(body).map_err(|_| SubtidexError::ParseFailed)?;
    let events = payload.events.ok_or(SubtidexError::ParseFailed)?;

    let cues = events
        .into_iter()
        .filter_map(|event| {
            let start_ms = event.start_ms?;
            let segments = event.segs?;

            let text: String = segments
                .into_iter()
                .filter_map(|segment| segment.utf8)
                .collect();
            let text = text.trim().to_string();
            if text.is_empty() {
                return None;
            }

            Some(SubtitleCue::new(
                start_ms / 1000.0,
                event.duration_ms.unwrap_or(0.0) / 1000.0,
                text,
            ))
        })
        .collect();

    Ok(cues)
}

/// Parse timedtext XML (`<text start dur>content</text>`) into cues
///
/// Missing or unparseable start/dur attributes default to 0. A body with no
/// `<text>` elements at all is treated as unparseable rather than empty.
pub fn parse_xml(body: &str) -> Result<Vec<SubtitleCue>> {
    let document = Html::parse_document(body);
    let selector = Selector::parse("text").map_err(|_| SubtidexError::ParseFailed)?;

    let mut saw_element = false;
    let mut cues = Vec::new();

    for element in document.select(&selector) {
        saw_element = true;

        let start = element
            .value()
            .attr("start")
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(0.0);
        let duration = element
            .value()
            .attr("dur")
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(0.0);

        let text: String = element.text().collect();
        let text = text.trim().to_string();
        if !text.is_empty() {
            cues.push(SubtitleCue::new(start, duration, text));
        }
    }

    if !saw_element {
        return Err(SubtidexError::ParseFailed);
    }

    Ok(cues)
}
