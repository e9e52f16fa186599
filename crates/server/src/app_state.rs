use std::path::PathBuf;

use server_api::ApiContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    /// Directory served under `/static`; also holds `favicon.ico`.
    pub(crate) static_dir: PathBuf,
}
