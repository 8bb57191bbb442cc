//! Database error conversion and value normalisation helpers.

use std::fmt::Display;

use sea_orm::ColumnTrait;
use sea_orm::sea_query::{LikeExpr, SimpleExpr};
use time::{OffsetDateTime, UtcOffset};

use crate::domain::error::DomainError;

/// Convert any displayable error into a `DomainError::Database`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn db_err(e: impl Display) -> DomainError {
    DomainError::database(e.to_string())
}

/// Same instant at offset zero.
///
/// `SQLite` keeps timestamps as text, so every value written or compared must
/// share one offset for ordering and range filters to follow the instant.
#[must_use]
pub fn utc(at: OffsetDateTime) -> OffsetDateTime {
    at.to_offset(UtcOffset::UTC)
}

/// `column LIKE '%needle%'` with `%`, `_` and `\` in `needle` matched literally.
#[must_use]
pub fn contains_literal<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    column.like(LikeExpr::new(pattern).escape('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn utc_keeps_the_instant() {
        let local = datetime!(2024-01-01 10:00 +05:00);
        let normalised = utc(local);

        assert_eq!(normalised, local);
        assert_eq!(normalised.offset(), UtcOffset::UTC);
        assert_eq!(normalised.hour(), 5);
    }
}
