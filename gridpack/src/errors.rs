use thiserror::Error;

/// Errors raised while validating problem input at the library boundary.
///
/// Runtime packing never fails: an item the pool cannot host is simply
/// reported as unplaced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("containers: {0}")]
    Containers(String),
    #[error("items: {0}")]
    Items(String),
    #[error("dimensions: {0}")]
    Dimensions(String),
    #[error("potential points: {0}")]
    PotentialPoints(String),
}
