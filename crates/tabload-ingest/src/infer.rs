//! Column type suggestions from sample lines.

use std::collections::BTreeSet;

use tabload_model::ScalarType;

use crate::text::Tokenizer;

/// Narrowest-first candidates; each step widens the previous one.
///
/// `Unseen` means no sample line reached the column, `Empty` that every
/// cell seen so far was blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Candidate {
    Unseen,
    Empty,
    Bool,
    Int32,
    Int64,
    Float64,
    Text,
}

impl Candidate {
    fn classify(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            Self::Empty
        } else if token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("false") {
            Self::Bool
        } else if token.parse::<i32>().is_ok() {
            Self::Int32
        } else if token.parse::<i64>().is_ok() {
            Self::Int64
        } else if token.parse::<f64>().is_ok_and(f64::is_finite) {
            Self::Float64
        } else {
            Self::Text
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unseen, other) | (other, Self::Unseen) => other,
            (Self::Empty, Self::Empty) => Self::Empty,
            // Only text columns accept blank cells.
            (Self::Empty, _) | (_, Self::Empty) => Self::Text,
            // Booleans only mix with booleans.
            (Self::Bool, Self::Bool) => Self::Bool,
            (Self::Bool, _) | (_, Self::Bool) => Self::Text,
            (a, b) => a.max(b),
        }
    }

    fn scalar_type(self) -> ScalarType {
        match self {
            Self::Bool => ScalarType::Bool,
            Self::Int32 => ScalarType::Int32,
            Self::Int64 => ScalarType::Int64,
            Self::Float64 => ScalarType::Float64,
            Self::Unseen | Self::Empty | Self::Text => ScalarType::Text,
        }
    }
}

/// Suggests one type per column from sample data lines.
///
/// The column count is the widest line seen. A column with a blank cell
/// anywhere in the sample comes back as [`ScalarType::Text`], since no other
/// parser accepts an empty token.
pub fn infer_column_types<S: AsRef<str>>(
    lines: &[S],
    delimiters: &BTreeSet<char>,
    collapse: bool,
) -> Vec<ScalarType> {
    let tokenizer = Tokenizer::new(delimiters, collapse);
    let mut candidates: Vec<Candidate> = Vec::new();
    for line in lines {
        let tokens = tokenizer.split(line.as_ref());
        if tokens.len() > candidates.len() {
            candidates.resize(tokens.len(), Candidate::Unseen);
        }
        for (candidate, token) in candidates.iter_mut().zip(&tokens) {
            *candidate = candidate.merge(Candidate::classify(token));
        }
    }
    candidates.into_iter().map(Candidate::scalar_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comma() -> BTreeSet<char> {
        BTreeSet::from([','])
    }

    #[test]
    fn test_infers_narrowest_numeric_type() {
        let lines = ["1,2.5,5000000000,true", "2,3,7,FALSE"];
        assert_eq!(
            infer_column_types(&lines, &comma(), false),
            vec![
                ScalarType::Int32,
                ScalarType::Float64,
                ScalarType::Int64,
                ScalarType::Bool
            ]
        );
    }

    #[test]
    fn test_mixed_columns_become_text() {
        let lines = ["1,true", "x,1"];
        assert_eq!(
            infer_column_types(&lines, &comma(), false),
            vec![ScalarType::Text, ScalarType::Text]
        );
    }

    #[test]
    fn test_blank_cells_force_text() {
        let lines = ["1,,", "2,3,", ",true,"];
        assert_eq!(
            infer_column_types(&lines, &comma(), false),
            vec![ScalarType::Text, ScalarType::Text, ScalarType::Text]
        );
    }

    #[test]
    fn test_short_lines_do_not_widen() {
        let lines = ["1", "2,3"];
        assert_eq!(
            infer_column_types(&lines, &comma(), false),
            vec![ScalarType::Int32, ScalarType::Int32]
        );
    }

    #[test]
    fn test_no_lines_no_columns() {
        let lines: [&str; 0] = [];
        assert!(infer_column_types(&lines, &comma(), false).is_empty());
    }
}
