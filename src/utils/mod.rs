pub mod environment;
pub mod logging;
pub mod paths;

pub use environment::get_gigatribe_dir;
pub use paths::{output_document_path, read_chat_file, validate_file_size};
