use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use super::Segment;
use crate::FetcherError;

static TEXT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)"#).expect("valid caption regex")
});

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("valid attribute regex"));

/// Parse a timedtext XML document into caption segments.
///
/// Element bodies are escaped twice on the wire: once for the XML document
/// and once more for any inline HTML, so the body goes through the HTML
/// parser twice. Markup left after the first pass is dropped by the second.
pub fn parse_timedtext(xml: &str) -> Result<Vec<Segment>, FetcherError> {
    if !xml.contains("<transcript") && !xml.contains("<timedtext") {
        return Err(FetcherError::Parse(
            "caption document has no transcript root".to_string(),
        ));
    }

    let mut segments = Vec::new();

    for caps in TEXT_ELEMENT.captures_iter(xml) {
        let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        let start_time = match attribute(attrs, "start") {
            Some(value) => value
                .parse::<f64>()
                .map_err(|_| FetcherError::Parse(format!("invalid start time: {}", value)))?,
            None => continue,
        };
        let duration = attribute(attrs, "dur")
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(0.0);

        let text = decode_text(body);
        if text.is_empty() {
            continue;
        }

        segments.push(Segment {
            start_time,
            duration,
            text,
        });
    }

    Ok(segments)
}

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

fn decode_text(body: &str) -> String {
    let unescaped = fragment_text(body);
    let plain = fragment_text(&unescaped);
    plain.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fragment_text(markup: &str) -> String {
    Html::parse_fragment(markup)
        .root_element()
        .text()
        .collect::<String>()
}
