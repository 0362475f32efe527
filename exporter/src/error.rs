use std::fmt;
use std::io;
use std::path::PathBuf;

use cardify::{SegmentError, UserInputError};

/// Where an export run was when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    Reading,
    Reconciling,
    WritingBack,
    Segmenting,
    CreatingArtifacts,
    Done,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Idle => "idle",
            ExportStage::Reading => "reading",
            ExportStage::Reconciling => "reconciling",
            ExportStage::WritingBack => "writing back",
            ExportStage::Segmenting => "segmenting",
            ExportStage::CreatingArtifacts => "creating artifacts",
            ExportStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Input(#[from] UserInputError),

    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// A store call failed. Aborts the run at `stage`.
    #[error("{stage} failed for {}: {source}", .path.display())]
    Io {
        stage: ExportStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(stage: ExportStage, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| ExportError::Io {
            stage,
            path,
            source,
        }
    }

    /// The stage an I/O failure happened in, if this is one.
    pub fn stage(&self) -> Option<ExportStage> {
        match self {
            ExportError::Io { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
