//! JSONL event scripts for replaying a session against a layout.
//!
//! One JSON object per line. Objects with an `"event"` field are host events
//! ([`DockEvent`]); objects with an `"op"` field are programmatic layout
//! operations ([`LayoutOp`]). Blank lines and lines starting with `#` are
//! skipped.
//!
//! ```text
//! {"event":"viewport_resize","width":1280,"height":800}
//! {"event":"pointer_down","panel":"chart","x":600,"y":300}
//! {"event":"pointer_move","x":664,"y":300}
//! {"event":"pointer_up"}
//! {"op":"toggle_fullscreen","id":"book"}
//! ```

use std::io::BufRead;

use dock_layout::LayoutOp;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DockError, Result};
use crate::host::{DockEvent, DockHost};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Event(DockEvent),
    Op(LayoutOp),
}

/// A step with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: ScriptStep,
}

/// Summary of a replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub ops_applied: usize,
    /// Operations the engine refused, as `(line, reason)`.
    pub ops_rejected: Vec<(usize, String)>,
}

pub fn parse_step(raw: &str) -> std::result::Result<ScriptStep, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let is_event = value.get("event").is_some();
    let is_op = value.get("op").is_some();
    match (is_event, is_op) {
        (true, false) => serde_json::from_value(value)
            .map(ScriptStep::Event)
            .map_err(|e| e.to_string()),
        (false, true) => serde_json::from_value(value)
            .map(ScriptStep::Op)
            .map_err(|e| e.to_string()),
        (true, true) => Err("line has both \"event\" and \"op\" fields".to_owned()),
        (false, false) => Err("expected an \"event\" or \"op\" field".to_owned()),
    }
}

/// Parse a whole script. The first malformed line aborts with its number.
pub fn parse_script(reader: impl BufRead) -> Result<Vec<ScriptLine>> {
    let mut steps = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step = parse_step(trimmed).map_err(|message| DockError::script(line_no, message))?;
        steps.push(ScriptLine {
            line: line_no,
            step,
        });
    }
    Ok(steps)
}

/// Feed every step to `host`. Rejected operations are recorded, not fatal.
pub fn replay(host: &mut DockHost, steps: &[ScriptLine]) -> ReplayReport {
    let mut report = ReplayReport::default();
    for ScriptLine { line, step } in steps {
        match step {
            ScriptStep::Event(event) => {
                let outcome = host.handle(event);
                debug!(line, ?outcome, "replayed event");
                report.events += 1;
            }
            ScriptStep::Op(op) => match host.engine_mut().dispatch(op.clone()) {
                Ok(()) => report.ops_applied += 1,
                Err(err) => {
                    warn!(line, op = op.kind(), %err, "script operation rejected");
                    report.ops_rejected.push((*line, err.to_string()));
                }
            },
        }
    }
    report
}
