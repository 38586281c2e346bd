use thiserror::Error;

pub type Result<T> = std::result::Result<T, InspectError>;

/// Errors surfaced while inspecting a batch of sources. Open and write
/// failures carry the offending source/path so the batch loop can report
/// them without aborting the remaining inputs.
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("no input sources supplied")]
    EmptyInput,

    #[error("cannot open dataset {path}")]
    DatasetOpen {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("cannot write {path}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
