use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("real name is required")]
    EmptyRealName,
    #[error("invalid number type: '{0}'")]
    InvalidNumberType(String),
    #[error("invalid quickdial slot: {0} (expected 1-99)")]
    InvalidQuickdial(u8),
    #[error("invalid category: {0} (expected 0 or 1)")]
    InvalidCategory(u8),
    #[error("invalid priority: {0} (expected 0 or 1)")]
    InvalidPriority(u8),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("range without start or end number: '{mention}'")]
    MissingRangeBound { mention: String },
    #[error("range bound is not numeric: '{mention}'")]
    InvalidRangeBound { mention: String },
    #[error("{context}: marker '{marker}' not found")]
    MissingMarker { marker: String, context: String },
    #[error("{context}: unexpected value '{value}' after marker '{marker}'")]
    InvalidMarkerValue {
        marker: String,
        value: String,
        context: String,
    },
}
