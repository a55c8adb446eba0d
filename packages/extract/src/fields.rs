//! Column splitting on wide whitespace runs.
//!
//! The layout-preserving extraction renders inter-column gaps as runs of
//! many spaces while words inside a field keep their single or double
//! spaces, so a run of [`crate::MIN_COLUMN_GAP`] or more whitespace
//! characters marks a column boundary.

use regex::Regex;

/// Splits one record segment into candidate column values.
///
/// Tokens are trimmed; tokens that trim to empty are dropped. The split is
/// idempotent: no returned field contains a gap-width whitespace run.
#[must_use]
pub fn split_columns<'a>(column_gap_re: &Regex, segment: &'a str) -> Vec<&'a str> {
    column_gap_re
        .split(segment)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportLayout;

    fn gap_re() -> Regex {
        ReportLayout::default().column_gap_re().clone()
    }

    #[test]
    fn splits_on_wide_gaps_only() {
        let fields = split_columns(
            &gap_re(),
            "1/2/2024 5:30    123    N FLOOD AVE    Traffic Stop    Citation",
        );
        assert_eq!(
            fields,
            ["1/2/2024 5:30", "123", "N FLOOD AVE", "Traffic Stop", "Citation"]
        );
    }

    #[test]
    fn keeps_narrow_spacing_inside_fields() {
        let fields = split_columns(&gap_re(), "CHEST PAIN / HEART PROBLEMS     EMS Call");
        assert_eq!(fields, ["CHEST PAIN / HEART PROBLEMS", "EMS Call"]);
    }

    #[test]
    fn three_spaces_do_not_split() {
        let fields = split_columns(&gap_re(), "Theft of   Property");
        assert_eq!(fields, ["Theft of   Property"]);
    }

    #[test]
    fn mixed_whitespace_runs_split() {
        let fields = split_columns(&gap_re(), "a \t  b");
        assert_eq!(fields, ["a", "b"]);
    }

    #[test]
    fn drops_empty_tokens() {
        assert!(split_columns(&gap_re(), "        ").is_empty());
        assert_eq!(split_columns(&gap_re(), "    abc    "), ["abc"]);
    }

    #[test]
    fn split_is_idempotent() {
        let re = gap_re();
        let fields = split_columns(
            &re,
            "1/2/2024 5:30    2024-00000123    1600 W MAIN ST    Theft of Property    Larceny",
        );

        for field in fields {
            assert_eq!(split_columns(&re, field), [field]);
        }
    }
}
