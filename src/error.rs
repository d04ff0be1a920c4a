use thiserror::Error;

use crate::export::ExportError;
use crate::loader::LoaderError;
use crate::session::SessionError;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
