//! Offline replay of captured responses
//!
//! Input is JSON lines, one response body per line. Blank lines are ignored
//! and lines that are not JSON are counted and skipped.

use crate::error::WorkerError;
use crate::interceptor::AjaxInterceptor;
use lumify_store::{BatchReport, WorkspaceId};
use serde_json::Value;
use std::io::BufRead;
use std::path::Path;

/// Totals of one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Responses offered to the store
    pub responses: usize,
    /// Lines that were not JSON
    pub skipped: usize,
    /// Merged classification counts
    pub report: BatchReport,
}

/// Replay every line of `reader` into the store
///
/// # Errors
/// `WorkerError::Io` if reading fails.
pub fn replay_reader<R: BufRead>(
    reader: R,
    interceptor: &AjaxInterceptor,
    workspace_id: &WorkspaceId,
) -> Result<ReplaySummary, WorkerError> {
    let mut summary = ReplaySummary::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(response) => {
                summary.responses += 1;
                summary.report.merge(interceptor.intercept(&response, workspace_id));
            }
            Err(err) => {
                tracing::warn!(line = number + 1, %err, "skipping line that is not json");
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        responses = summary.responses,
        skipped = summary.skipped,
        written = summary.report.written(),
        "replay finished"
    );
    Ok(summary)
}

/// Replay a JSON-lines file into the store
///
/// # Errors
/// `WorkerError::Io` if the file cannot be opened or read.
pub fn replay_file(
    path: impl AsRef<Path>,
    interceptor: &AjaxInterceptor,
    workspace_id: &WorkspaceId,
) -> Result<ReplaySummary, WorkerError> {
    let file = std::fs::File::open(path.as_ref())?;
    replay_reader(std::io::BufReader::new(file), interceptor, workspace_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::shared;
    use lumify_test_utils::{edge_json, setup_store_in, vertex_json};
    use std::io::Cursor;

    #[test]
    fn counts_responses_and_skips() {
        let t = setup_store_in("w1");
        let dispatcher = t.dispatcher.clone();
        let interceptor = AjaxInterceptor::new(shared(t.store));

        let input = [
            vertex_json("v1", "PUBLIC").to_string(),
            String::new(),
            "not json".to_string(),
            vertex_json("v1", "PRIVATE").to_string(),
            edge_json("e1", "knows", "v1", "v2").to_string(),
        ]
        .join("\n");

        let summary =
            replay_reader(Cursor::new(input), &interceptor, &WorkspaceId::new("w1")).unwrap();

        assert_eq!(summary.responses, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!((summary.report.new, summary.report.updated), (2, 1));
        assert_eq!(dispatcher.updates().len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let interceptor = AjaxInterceptor::new(shared(setup_store_in("w1").store));
        let result = replay_file("/nonexistent/responses.jsonl", &interceptor, &WorkspaceId::new("w1"));
        assert!(matches!(result, Err(WorkerError::Io(_))));
    }
}
