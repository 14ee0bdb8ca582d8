// Low-level storage access traits.

use crate::entities::*;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error("Invalid id '{0}'")]
    InvalidId(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait PlaceRepo {
    fn create_place(&self, place: Place) -> Result<()>;
    fn get_place(&self, id: &str) -> Result<Place>;
    fn all_places(&self) -> Result<Vec<Place>>;
}
