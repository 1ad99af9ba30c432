//! Classification of raw message text into commands.
//!
//! The grammar is small:
//!
//! ```text
//! <prefix> <action> <args...>     direct invocation, e.g. "ob nasa today"
//! <shortcut> <args...>            shortcut invocation, e.g. "astron today"
//! ```
//!
//! Keywords are matched case-insensitively after trimming the text. Text that
//! starts with anything else is not a command at all and is ignored.

use std::fmt;

use obot_core::Lexer;

/// Looks names up in a command registry.
///
/// Both methods receive a case-folded probe and return the stored
/// (case-preserving) name on a hit.
pub trait CommandTable {
    /// Resolves a registered action name.
    fn resolve_action(&self, name: &str) -> Option<&str>;

    /// Resolves a bound shortcut name.
    fn resolve_shortcut(&self, name: &str) -> Option<&str>;
}

/// How a command was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// `<prefix> <action> ...`
    Direct,
    /// `<shortcut> ...`
    Shortcut,
}

/// A recognized command, ready to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'t> {
    /// How the command was written.
    pub kind: InvocationKind,
    /// The registered action name (direct) or shortcut name (shortcut).
    pub name: String,
    /// Everything after the command keyword, leading separators removed.
    pub args: &'t str,
}

/// Why text that looked like a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The prefix keyword was not followed by an action name.
    Incomplete,
    /// The named action is not registered.
    Unsupported(String),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete => f.write_str("Incomplete action command"),
            Self::Unsupported(name) => write!(f, "Action \"{name}\" is not supported"),
        }
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand<'t> {
    /// Not a command; nothing happens.
    Nop,
    /// Looked like a command but could not be resolved; the user is told why.
    Failure(ParseFailure),
    /// A command to dispatch.
    Invoke(Invocation<'t>),
}

/// Classifies `text` against `table`, using `prefix` as the direct-invocation
/// keyword.
///
/// `text` is trimmed here; the returned `args` borrow from the trimmed text.
pub fn parse_command<'t, T>(text: &'t str, prefix: &str, table: &T) -> ParsedCommand<'t>
where
    T: CommandTable + ?Sized,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedCommand::Nop;
    }

    let mut lexer = Lexer::new(trimmed);
    let first = lexer.next_token().to_lowercase();

    if first == prefix.to_lowercase() {
        let second = lexer.next_token().to_lowercase();
        if second.is_empty() {
            return ParsedCommand::Failure(ParseFailure::Incomplete);
        }
        return match table.resolve_action(&second) {
            Some(name) => ParsedCommand::Invoke(Invocation {
                kind: InvocationKind::Direct,
                name: name.to_string(),
                args: &trimmed[lexer.skip_whitespace()..],
            }),
            None => ParsedCommand::Failure(ParseFailure::Unsupported(second)),
        };
    }

    match table.resolve_shortcut(&first) {
        Some(name) => ParsedCommand::Invoke(Invocation {
            kind: InvocationKind::Shortcut,
            name: name.to_string(),
            args: &trimmed[lexer.skip_whitespace()..],
        }),
        None => ParsedCommand::Nop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Table;

    impl CommandTable for Table {
        fn resolve_action(&self, name: &str) -> Option<&str> {
            ["help", "nasa", "Inspiro"]
                .into_iter()
                .find(|n| n.eq_ignore_ascii_case(name))
        }

        fn resolve_shortcut(&self, name: &str) -> Option<&str> {
            ["astron"].into_iter().find(|n| n.eq_ignore_ascii_case(name))
        }
    }

    fn parse(text: &str) -> ParsedCommand<'_> {
        parse_command(text, "ob", &Table)
    }

    #[test]
    fn test_empty_is_nop() {
        assert_eq!(parse(""), ParsedCommand::Nop);
        assert_eq!(parse("   \n\t "), ParsedCommand::Nop);
    }

    #[test]
    fn test_plain_chat_is_nop() {
        assert_eq!(parse("hello there"), ParsedCommand::Nop);
        assert_eq!(parse("obnasa today"), ParsedCommand::Nop);
    }

    #[test]
    fn test_prefix_alone_is_incomplete() {
        assert_eq!(parse("ob"), ParsedCommand::Failure(ParseFailure::Incomplete));
        assert_eq!(
            parse("  OB   "),
            ParsedCommand::Failure(ParseFailure::Incomplete)
        );
        assert_eq!(
            ParseFailure::Incomplete.to_string(),
            "Incomplete action command"
        );
    }

    #[test]
    fn test_unknown_action_is_unsupported() {
        let parsed = parse("ob nonexistent foo");
        assert_eq!(
            parsed,
            ParsedCommand::Failure(ParseFailure::Unsupported("nonexistent".into()))
        );
        if let ParsedCommand::Failure(reason) = parsed {
            assert_eq!(reason.to_string(), "Action \"nonexistent\" is not supported");
        }
    }

    #[test]
    fn test_unsupported_reason_is_case_folded() {
        assert_eq!(
            parse("ob NOPE"),
            ParsedCommand::Failure(ParseFailure::Unsupported("nope".into()))
        );
    }

    #[test]
    fn test_direct_invocation() {
        assert_eq!(
            parse("  ob nasa notext 4 Sep  2002  "),
            ParsedCommand::Invoke(Invocation {
                kind: InvocationKind::Direct,
                name: "nasa".into(),
                args: "notext 4 Sep  2002",
            })
        );
    }

    #[test]
    fn test_direct_invocation_is_case_insensitive() {
        assert_eq!(
            parse("Ob INSPIRO"),
            ParsedCommand::Invoke(Invocation {
                kind: InvocationKind::Direct,
                name: "Inspiro".into(),
                args: "",
            })
        );
    }

    #[test]
    fn test_shortcut_invocation() {
        assert_eq!(
            parse("Astron\ttoday"),
            ParsedCommand::Invoke(Invocation {
                kind: InvocationKind::Shortcut,
                name: "astron".into(),
                args: "today",
            })
        );
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(
            parse_command("bot help", "bot", &Table),
            ParsedCommand::Invoke(Invocation {
                kind: InvocationKind::Direct,
                name: "help".into(),
                args: "",
            })
        );
        assert_eq!(parse_command("ob help", "bot", &Table), ParsedCommand::Nop);
    }
}
