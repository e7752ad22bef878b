pub mod discovery;
pub mod export;

pub use discovery::{discover_chat_files, discover_user_dirs};
pub use export::{
    ExportSummary, FailureThresholdExceeded, FileOutcome, export_chat_file, export_user_dir,
};
