use armsync_common::ConfigError;
use thiserror::Error;

use crate::panel::PanelError;
use crate::store::StoreError;

/// Errors surfaced by the armsync crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Panel(#[from] PanelError),
}
