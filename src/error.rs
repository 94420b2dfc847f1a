/// Errors raised while validating arguments, before any randomness is drawn.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("bit length must not be negative, got {0}")]
    NegativeBitLength(i64),

    #[error("bit length must be at most {max}, got {actual}")]
    BitLengthTooLarge { max: i64, actual: i64 },

    #[error("bit length must be at least {min} for prime search, got {actual}")]
    BitLengthTooSmall { min: i64, actual: i64 },
}

pub type Result<T> = std::result::Result<T, Error>;
