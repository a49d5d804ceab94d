use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Allocation failure: {what}")]
    AllocationFailure { what: &'static str },

    #[error("Stale scratch handle: {what}")]
    StaleHandle { what: &'static str },

    #[error("Host error: {what}")]
    Host { what: String },
}
