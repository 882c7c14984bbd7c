use thiserror::Error;

use crate::registry::RegistryError;
use crate::resolver::ResolveError;

#[derive(Error, Debug)]
pub enum PuliError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PuliError>;
