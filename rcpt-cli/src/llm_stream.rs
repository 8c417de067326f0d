//! Ollama `/api/generate` streaming: newline-delimited JSON chunks
//!
//!   {"model":"llama3.2","response":"Date","done":false}
//!   {"model":"llama3.2","response":": 2023-01-15","done":false}
//!   {"model":"llama3.2","response":"","done":true}
//!
//! A server with streaming disabled answers with one object holding the
//! whole `response`, which is just the one-line case.

use futures_util::StreamExt;
use serde::Deserialize;

use crate::llm::LlmError;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Started,
    Delta(String),
    Completed,
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Reassembles chunked text from an NDJSON body fed in arbitrary pieces.
#[derive(Debug, Default)]
pub struct NdjsonCollector {
    buf: String,
    raw: String,
    text: String,
    parsed_any: bool,
    done: bool,
}

impl NdjsonCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed bytes as they arrive. Complete lines are decoded immediately;
    /// each non-empty piece of model text is passed to `on_delta`.
    pub fn push(&mut self, chunk: &str, mut on_delta: impl FnMut(&str)) -> Result<(), LlmError> {
        if self.done {
            return Ok(());
        }
        self.raw.push_str(chunk);
        self.buf.push_str(chunk);

        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            self.handle_line(&line, &mut on_delta)?;
            if self.done {
                break;
            }
        }
        Ok(())
    }

    /// Flush the trailing partial line and return the concatenated text.
    pub fn finish(mut self, mut on_delta: impl FnMut(&str)) -> Result<String, LlmError> {
        if !self.done {
            let rest = std::mem::take(&mut self.buf);
            self.handle_line(&rest, &mut on_delta)?;
        }

        // Pretty-printed single object spread over several lines
        if !self.parsed_any {
            if let Ok(chunk) = serde_json::from_str::<GenerateChunk>(&self.raw) {
                if let Some(msg) = chunk.error {
                    return Err(LlmError::Server(msg));
                }
                on_delta(&chunk.response);
                self.text = chunk.response;
            }
        }
        Ok(self.text)
    }

    fn handle_line(&mut self, line: &str, on_delta: &mut impl FnMut(&str)) -> Result<(), LlmError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        let chunk: GenerateChunk = match serde_json::from_str(line) {
            Ok(c) => c,
            Err(e) => {
                tracing::trace!(error = %e, "skipping malformed stream line");
                return Ok(());
            }
        };
        self.parsed_any = true;
        if let Some(msg) = chunk.error {
            return Err(LlmError::Server(msg));
        }
        if !chunk.response.is_empty() {
            on_delta(&chunk.response);
            self.text.push_str(&chunk.response);
        }
        if chunk.done {
            self.done = true;
        }
        Ok(())
    }
}

/// Drain a streaming generate response, reporting progress through `on_event`.
pub async fn collect_generate_stream(
    resp: reqwest::Response,
    mut on_event: impl FnMut(StreamEvent) + Send,
) -> Result<String, LlmError> {
    on_event(StreamEvent::Started);

    let mut stream = resp.bytes_stream();
    let mut collector = NdjsonCollector::new();
    let mut pending: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(LlmError::Stream)?;
        pending.extend_from_slice(chunk.as_ref());

        // Only decode up to the last newline so multi-byte characters split
        // across network chunks stay intact.
        let Some(cut) = pending.iter().rposition(|b| *b == b'\n') else {
            continue;
        };
        let complete: Vec<u8> = pending.drain(..=cut).collect();
        let s = String::from_utf8_lossy(&complete);
        collector.push(&s, |d| on_event(StreamEvent::Delta(d.to_string())))?;
        if collector.is_done() {
            break;
        }
    }

    if !collector.is_done() && !pending.is_empty() {
        let s = String::from_utf8_lossy(&pending).into_owned();
        collector.push(&s, |d| on_event(StreamEvent::Delta(d.to_string())))?;
    }
    let text = collector.finish(|d| on_event(StreamEvent::Delta(d.to_string())))?;

    on_event(StreamEvent::Completed);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pieces: &[&str]) -> Result<String, LlmError> {
        let mut c = NdjsonCollector::new();
        for p in pieces {
            c.push(p, |_| {})?;
        }
        c.finish(|_| {})
    }

    #[test]
    fn test_concatenates_chunks() {
        let body = concat!(
            "{\"response\":\"Date: \",\"done\":false}\n",
            "{\"response\":\"2023-01-15\\nTotal: 5\",\"done\":false}\n",
            "{\"response\":\"\",\"done\":true}\n",
        );
        assert_eq!(collect(&[body]).unwrap(), "Date: 2023-01-15\nTotal: 5");
    }

    #[test]
    fn test_lines_split_across_pushes() {
        let text = collect(&[
            "{\"respon",
            "se\":\"Ven\",\"done\":false}\n{\"response\":\"dor: A\"",
            ",\"done\":true}",
        ])
        .unwrap();
        assert_eq!(text, "Vendor: A");
    }

    #[test]
    fn test_stops_at_done() {
        let body = concat!(
            "{\"response\":\"a\",\"done\":true}\n",
            "{\"response\":\"b\",\"done\":false}\n",
        );
        assert_eq!(collect(&[body]).unwrap(), "a");
    }

    #[test]
    fn test_skips_malformed_lines() {
        let body = "garbage\n{\"response\":\"ok\",\"done\":true}\n";
        assert_eq!(collect(&[body]).unwrap(), "ok");
    }

    #[test]
    fn test_single_pretty_object() {
        let body = "{\n  \"model\": \"llama3.2\",\n  \"response\": \"Total: 9\",\n  \"done\": true\n}";
        assert_eq!(collect(&[body]).unwrap(), "Total: 9");
    }

    #[test]
    fn test_server_error_line() {
        let err = collect(&["{\"error\":\"model 'x' not found\"}\n"]).unwrap_err();
        assert!(matches!(err, LlmError::Server(m) if m.contains("not found")));
    }

    #[test]
    fn test_deltas_reported() {
        let mut seen = Vec::new();
        let mut c = NdjsonCollector::new();
        c.push(
            "{\"response\":\"a\"}\n{\"response\":\"\"}\n{\"response\":\"b\",\"done\":true}\n",
            |d| seen.push(d.to_string()),
        )
        .unwrap();
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(c.finish(|_| {}).unwrap(), "ab");
    }
}
