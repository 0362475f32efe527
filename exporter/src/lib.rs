pub mod error;
pub mod export;
pub mod notify;
pub mod store;

pub use error::{ExportError, ExportStage};
pub use export::{ExportOutcome, ExportReport, Exporter};
pub use notify::{CollectingNotifier, LogNotifier, Notifier};
pub use store::{DocumentStore, FsStore};
