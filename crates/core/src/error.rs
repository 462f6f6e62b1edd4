//! Domain errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("All comparison slots are full")]
    ComparisonFull,
    #[error("Game already in comparison")]
    AlreadyInComparison,
}
