use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal conditions of a run. None of them is retried: a trial either
/// completes with every task or the whole run stops.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to create trial directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input file {}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write copy {}", path.display())]
    WriteCopy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn worker {name}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("worker {0} panicked")]
    WorkerPanicked(String),

    #[error("worker {0} was released without running")]
    Aborted(String),

    #[error("failed to write trial log {}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
