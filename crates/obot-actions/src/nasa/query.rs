//! Argument grammar: `[notext] [today | <date>]`.

use obot_core::Lexer;

/// Which picture is wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApodTarget {
    Random,
    Today,
    /// An unvalidated date string.
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApodQuery {
    /// Hide the title, date and retry lines.
    pub notext: bool,
    pub target: ApodTarget,
}

pub fn parse_query(args: &str) -> ApodQuery {
    let mut lexer = Lexer::new(args);
    let first = lexer.next_token();

    if first.eq_ignore_ascii_case("notext") {
        let rest = lexer.rest().trim();
        let target = if rest.is_empty() {
            ApodTarget::Random
        } else if rest.eq_ignore_ascii_case("today") {
            ApodTarget::Today
        } else {
            ApodTarget::Date(rest.to_string())
        };
        return ApodQuery {
            notext: true,
            target,
        };
    }

    let target = if first.is_empty() {
        ApodTarget::Random
    } else if first.eq_ignore_ascii_case("today") {
        ApodTarget::Today
    } else {
        ApodTarget::Date(args.trim().to_string())
    };
    ApodQuery {
        notext: false,
        target,
    }
}
