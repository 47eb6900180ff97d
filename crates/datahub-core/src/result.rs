//! Convenience result type alias for DataHub.

use crate::error::AppError;

/// A specialized `Result` type for DataHub operations.
///
/// Plugin hooks return this too, so a failing hook surfaces to the caller
/// with the same error type the rest of the application uses.
pub type AppResult<T> = Result<T, AppError>;
