//! Field extraction from the pricing service's XML responses.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::ScrapeError;

/// Text content of the first element whose ancestor chain ends with `path`.
///
/// `path` is a child-combinator chain such as `["result", "item", "goodName"]`;
/// the first segment may sit at any depth. Text of nested children is
/// concatenated. Returns `Ok(None)` when no element matches and `Err` only
/// when the document is not well-formed.
pub fn extract_text(xml: &str, path: &[&str]) -> Result<Option<String>, ScrapeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut captured: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                if captured.is_none() && ends_with(&stack, path) {
                    captured = Some(String::new());
                }
            }
            Event::Empty(e) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                if captured.is_none() && ends_with(&stack, path) {
                    return Ok(Some(String::new()));
                }
                stack.pop();
            }
            Event::Text(e) => {
                if let Some(buf) = captured.as_mut() {
                    buf.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(buf) = captured.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                if captured.is_some() && ends_with(&stack, path) {
                    return Ok(captured);
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(None)
}

fn ends_with(stack: &[String], path: &[&str]) -> bool {
    stack.len() >= path.len()
        && stack[stack.len() - path.len()..]
            .iter()
            .zip(path)
            .all(|(have, want)| have == want)
}

#[cfg(test)]
#[path = "tests/xml_tests.rs"]
mod tests;
