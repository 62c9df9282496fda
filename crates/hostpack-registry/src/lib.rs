mod catalog;
mod git_ops;
mod repo_sync;

pub use catalog::RepositoryCatalog;
pub use repo_sync::{
    clone_repository, repository_dir_name, sync_all, sync_repository, RepoSyncResult,
    RepoSyncStatus,
};

pub(crate) use git_ops::{run_git_clone, run_git_command};
