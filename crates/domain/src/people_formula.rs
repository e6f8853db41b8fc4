//! Filter formulas for the community people table.
//!
//! The people directory is queried with spreadsheet-style formulas. Values
//! interpolated into a formula are single-quoted, so quotes and backslashes
//! must be escaped first.

/// `Person Type` values recognised in the people table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonType {
    /// Regional chapter member.
    Member,
    /// Contributor with a recorded membership status update.
    Contributor,
}

impl PersonType {
    /// Returns the cell value stored in the people table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Contributor => "Contributor",
        }
    }
}

/// Escapes a value for use inside a single-quoted formula string.
#[must_use]
pub fn escape_formula_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Formula matching member rows for a normalized email.
#[must_use]
pub fn member_formula(normalized_email: &str) -> String {
    format!(
        "AND(LOWER({{Email}})='{}', {{Person Type}}='{}')",
        escape_formula_string(normalized_email),
        PersonType::Member.as_str()
    )
}

/// Formula matching contributor rows for a normalized email.
///
/// Contributors only count once their membership status timestamp is set.
#[must_use]
pub fn contributor_formula(normalized_email: &str) -> String {
    format!(
        "AND(LOWER({{Email}})='{}', {{Person Type}}='{}', NOT(BLANK({{mem status updated time}})))",
        escape_formula_string(normalized_email),
        PersonType::Contributor.as_str()
    )
}
