use thiserror::Error;

use crate::engine::EngineError;
use crate::lifecycle::Stage;

/// Fatal run failures. Solver and retrieval failures are not in here; they
/// are recorded in the run report instead.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("lifecycle stage {to} cannot follow {from}")]
    OutOfOrder { from: Stage, to: Stage },
    #[error("engine failed during {stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: EngineError,
    },
    #[error("failed to write console output: {0}")]
    Console(#[from] std::io::Error),
}
