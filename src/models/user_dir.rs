use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDirInfo {
    pub user_id: String,
    pub path: PathBuf,
    pub chat_files: usize,
    pub has_resources: bool,
}
