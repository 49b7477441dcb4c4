use std::time::{Duration, Instant};

/// Timing statistics for a single predict call.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total wall-clock time of the call, tokenization included.
    pub total_time: Duration,
}

impl PipelineStats {
    /// Create a new stats tracker (call at start of operation).
    pub(crate) fn start() -> PipelineStatsBuilder {
        PipelineStatsBuilder {
            start_time: Instant::now(),
        }
    }
}

/// Builder for PipelineStats - tracks timing from creation to finalize.
pub(crate) struct PipelineStatsBuilder {
    start_time: Instant,
}

impl PipelineStatsBuilder {
    pub fn finish(self) -> PipelineStats {
        PipelineStats {
            total_time: self.start_time.elapsed(),
        }
    }
}
