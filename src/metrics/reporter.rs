//! Line-oriented output of cycle results
//!
//! Every record is written as one JSON object per line. The cycle start and
//! end are marked with plain-text lines on the same stream.

use crate::metrics::record::InstanceRecord;
use crate::Result;
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tracing::{debug, error};

/// Written in place of a record that could not be serialized.
pub const SERIALIZATION_ERROR: &str = "marshal error";

pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn cycle_started(&mut self) -> Result<()> {
        writeln!(self.out, "Start to capture pod metrics ...")?;
        Ok(())
    }

    pub fn record(&mut self, record: &InstanceRecord) -> Result<()> {
        debug!(instance = %record.name, "{}", record.message);

        writeln!(self.out, "{}", to_json_line(record))?;
        self.out.flush()?;
        Ok(())
    }

    pub fn cycle_finished(&mut self, elapsed: Duration) -> Result<()> {
        writeln!(
            self.out,
            "Captured pod metrics in {}ms",
            elapsed.as_millis()
        )?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Serializes a record to a single line, falling back to a sentinel.
pub fn to_json_line(record: &InstanceRecord) -> String {
    match serde_json::to_string(record) {
        Ok(line) => line,
        Err(e) => {
            error!(instance = %record.name, "Failed to serialize record: {}", e);
            SERIALIZATION_ERROR.to_string()
        }
    }
}
