use std::fmt;

/// States an ingestion moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestStage {
    Validating,
    WorkspaceOpen,
    InputSaved,
    Transcoded,
    Published,
    Committed,
    Done,
}

impl IngestStage {
    /// The state that follows this one on the success path.
    pub fn next(self) -> Option<IngestStage> {
        use IngestStage::*;
        match self {
            Validating => Some(WorkspaceOpen),
            WorkspaceOpen => Some(InputSaved),
            InputSaved => Some(Transcoded),
            Transcoded => Some(Published),
            Published => Some(Committed),
            Committed => Some(Done),
            Done => None,
        }
    }
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Records the states visited by one ingestion.
#[derive(Debug, Clone)]
pub struct StageTrail {
    visited: Vec<IngestStage>,
}

impl StageTrail {
    pub fn start() -> Self {
        Self {
            visited: vec![IngestStage::Validating],
        }
    }

    pub fn current(&self) -> IngestStage {
        // never empty, `start` seeds it
        self.visited[self.visited.len() - 1]
    }

    /// Moves to `to`, which must be the successor of the current state.
    pub fn advance(&mut self, to: IngestStage) {
        debug_assert_eq!(self.current().next(), Some(to));
        tracing::debug!(from = %self.current(), to = %to, "ingest transition");
        self.visited.push(to);
    }

    pub fn visited(&self) -> &[IngestStage] {
        &self.visited
    }

    pub fn into_visited(self) -> Vec<IngestStage> {
        self.visited
    }
}
