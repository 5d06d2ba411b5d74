use crate::ast::filter::{
    ComparisonFilter, ComparisonOperator, ExistenceFilter, Filter, Literal, PropertyPath,
};

/// Operators in the order they are tried; `>=` and `<=` must come before `=`, `>` and `<`
const OPERATORS: [ComparisonOperator; 6] = [
    ComparisonOperator::GreaterThanEqualTo,
    ComparisonOperator::LessThanEqualTo,
    ComparisonOperator::EqualTo,
    ComparisonOperator::GreaterThan,
    ComparisonOperator::LessThan,
    ComparisonOperator::Matches,
];

/// Parse the raw text of a `[...]` filter
///
/// The first operator that splits the text into exactly two non-empty parts makes a
/// comparison. Otherwise the whole text is the path of an existence check.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret))]
pub(crate) fn parse_filter(text: &str) -> Filter {
    for operator in OPERATORS {
        let parts: Vec<&str> = text.split(operator.as_str()).map(str::trim).collect();
        if let [path, value] = parts.as_slice() {
            if !path.is_empty() && !value.is_empty() {
                return Filter::Comparison(ComparisonFilter {
                    operator,
                    path: PropertyPath::from(*path),
                    value: parse_literal(value),
                });
            }
        }
    }
    Filter::Existence(ExistenceFilter {
        path: PropertyPath::from(text.trim()),
    })
}

/// Parse the right hand side of a comparison
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret))]
pub(crate) fn parse_literal(text: &str) -> Literal {
    match text {
        "true" => return Literal::Bool(true),
        "false" => return Literal::Bool(false),
        "null" => return Literal::Null,
        "undefined" => return Literal::Undefined,
        _ => {}
    }
    if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        if let Some(n) = text.parse::<f64>().ok().filter(|n| n.is_finite()) {
            return Literal::Number(n);
        }
    }
    Literal::String(unquote(text).unwrap_or(text).to_owned())
}

fn unquote(text: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|quote| {
        text.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::filter::{ComparisonOperator, Filter, Literal};

    use super::{parse_filter, parse_literal};

    fn comparison(text: &str) -> (ComparisonOperator, String, Literal) {
        match parse_filter(text) {
            Filter::Comparison(c) => (c.operator, c.path.as_str().to_owned(), c.value),
            f => panic!("expected comparison, got {f:?}"),
        }
    }

    #[test]
    fn operators() {
        use ComparisonOperator::*;
        assert_eq!(
            comparison("price > 10"),
            (GreaterThan, "price".into(), Literal::Number(10.0))
        );
        assert_eq!(
            comparison("price>=10"),
            (GreaterThanEqualTo, "price".into(), Literal::Number(10.0))
        );
        assert_eq!(
            comparison("price<=10"),
            (LessThanEqualTo, "price".into(), Literal::Number(10.0))
        );
        assert_eq!(
            comparison("price<10"),
            (LessThan, "price".into(), Literal::Number(10.0))
        );
        assert_eq!(
            comparison("user.name = 'John'"),
            (EqualTo, "user.name".into(), Literal::String("John".into()))
        );
        assert_eq!(
            comparison("name~^J.*n$"),
            (Matches, "name".into(), Literal::String("^J.*n$".into()))
        );
    }

    #[test]
    fn existence() {
        for text in ["isbn", " isbn ", "=10", "a=b=c", "*"] {
            assert!(
                matches!(parse_filter(text), Filter::Existence(_)),
                "{text} should be an existence filter"
            );
        }
        match parse_filter(" author.name ") {
            Filter::Existence(e) => assert_eq!(e.path.as_str(), "author.name"),
            f => panic!("expected existence, got {f:?}"),
        }
    }

    #[test]
    fn literals() {
        assert_eq!(parse_literal("true"), Literal::Bool(true));
        assert_eq!(parse_literal("false"), Literal::Bool(false));
        assert_eq!(parse_literal("null"), Literal::Null);
        assert_eq!(parse_literal("undefined"), Literal::Undefined);
        assert_eq!(parse_literal("-1.5"), Literal::Number(-1.5));
        assert_eq!(parse_literal("1e3"), Literal::Number(1000.0));
        assert_eq!(parse_literal("12abc"), Literal::String("12abc".into()));
        assert_eq!(parse_literal("\"quoted\""), Literal::String("quoted".into()));
        assert_eq!(parse_literal("'single'"), Literal::String("single".into()));
        assert_eq!(parse_literal("'mixed\""), Literal::String("'mixed\"".into()));
        assert_eq!(parse_literal("bare"), Literal::String("bare".into()));
    }
}
