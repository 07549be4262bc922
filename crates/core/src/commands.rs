//! Command interpreter.
//!
//! [`execute`] maps one input line plus the current alias table to a
//! [`CommandResult`]. It performs no I/O and mutates nothing; alias changes
//! and network work are handed back to the caller as result variants.

use crate::neofetch;
use crate::types::{AliasTable, AsyncCommand, CommandResult, MonitorRequest};

pub const HELP_TEXT: &str = "AVAILABLE COMMANDS:
------------------
help                  List available commands
clear                 Clear terminal buffer
scan [url]            Run a PageSpeed health scan on a URL
monitor [url]         Check a URL's reachability every 60s
monitor --list        List monitored URLs
monitor --stop        Stop all monitors
alias                 List aliases
alias [name]=[cmd]    Define an alias
unalias [name]        Remove an alias
neofetch              Show system vitals";

const MONITOR_USAGE: &str = "USAGE: monitor [url] | --stop | --list";

/// Expands the first token through the alias table, one level deep.
///
/// Alias arguments are placed before the arguments typed on the line, so
/// with `a = 'scan x'` the line `a y` resolves to `scan x y`.
pub fn resolve_aliases(line: &str, aliases: &AliasTable) -> Vec<String> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Vec::new();
    };

    let mut resolved: Vec<String> = match aliases.get(first) {
        Some(expansion) => {
            let expanded: Vec<String> = expansion.split_whitespace().map(String::from).collect();
            if expanded.is_empty() {
                vec![first.to_string()]
            } else {
                expanded
            }
        }
        None => vec![first.to_string()],
    };
    resolved.extend(tokens.map(String::from));
    resolved
}

pub fn execute(line: &str, aliases: &AliasTable) -> CommandResult {
    let tokens = resolve_aliases(line, aliases);
    let Some((cmd, args)) = tokens.split_first() else {
        return CommandResult::Empty;
    };

    match cmd.to_lowercase().as_str() {
        "help" => CommandResult::text(HELP_TEXT),
        "clear" => CommandResult::Clear,
        "scan" => {
            if args.is_empty() {
                return CommandResult::error("USAGE: scan [url]");
            }
            CommandResult::Async {
                command: AsyncCommand::Scan {
                    url: args.join(" "),
                },
            }
        }
        "monitor" => match args.first() {
            Some(arg) => CommandResult::Async {
                command: AsyncCommand::Monitor {
                    request: MonitorRequest::parse(arg),
                },
            },
            None => CommandResult::error(MONITOR_USAGE),
        },
        "alias" => alias(args, aliases),
        "unalias" => match args.first() {
            Some(key) => CommandResult::RemoveAlias { key: key.clone() },
            None => CommandResult::error("USAGE: unalias [name]"),
        },
        "neofetch" => CommandResult::text(neofetch::render()),
        _ => CommandResult::error(format!(
            "UNKNOWN COMMAND: '{}'. Type 'help' for assistance.",
            cmd
        )),
    }
}

fn alias(args: &[String], aliases: &AliasTable) -> CommandResult {
    if args.is_empty() {
        if aliases.is_empty() {
            return CommandResult::text("No aliases defined.");
        }
        let listing = aliases
            .iter()
            .map(|(key, value)| format!("{} = '{}'", key, value))
            .collect::<Vec<_>>()
            .join("\n");
        return CommandResult::text(listing);
    }

    let definition = args.join(" ");
    let (key, value) = definition.split_once('=').unwrap_or((definition.as_str(), ""));
    let (key, value) = (key.trim(), value.trim());

    if key.is_empty() || value.is_empty() {
        return CommandResult::error("USAGE: alias [name]=[command]");
    }
    // Resolution only ever matches the first word of a line.
    if key.contains(char::is_whitespace) {
        return CommandResult::error(format!("alias: invalid name '{}': no spaces allowed", key));
    }

    CommandResult::SetAlias {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> AliasTable {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_blank_input_is_empty() {
        let aliases = AliasTable::new();
        assert_eq!(execute("", &aliases), CommandResult::Empty);
        assert_eq!(execute("   \t ", &aliases), CommandResult::Empty);
    }

    #[test]
    fn test_unknown_command_names_the_word() {
        let result = execute("frobnicate now", &AliasTable::new());
        match result {
            CommandResult::Error { message } => assert!(message.contains("'frobnicate'")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_command_word_is_case_insensitive() {
        let aliases = AliasTable::new();
        assert_eq!(execute("CLEAR", &aliases), CommandResult::Clear);
        assert!(matches!(execute("Help", &aliases), CommandResult::Text { .. }));
    }

    #[test]
    fn test_scan_requires_url() {
        let aliases = AliasTable::new();
        assert!(matches!(execute("scan", &aliases), CommandResult::Error { .. }));

        match execute("scan example.com", &aliases) {
            CommandResult::Async { command } => {
                assert_eq!(command.word(), "scan");
                assert_eq!(command.payload(), "example.com");
            }
            other => panic!("expected async, got {:?}", other),
        }
    }

    #[test]
    fn test_monitor_variants() {
        let aliases = AliasTable::new();
        assert!(matches!(execute("monitor", &aliases), CommandResult::Error { .. }));

        for (line, payload) in [
            ("monitor --stop", "--stop"),
            ("monitor --list", "--list"),
            ("monitor example.com", "example.com"),
        ] {
            match execute(line, &aliases) {
                CommandResult::Async { command } => {
                    assert_eq!(command.word(), "monitor");
                    assert_eq!(command.payload(), payload);
                }
                other => panic!("expected async for {line}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_alias_arguments_precede_user_arguments() {
        let aliases = table(&[("a", "scan x")]);
        assert_eq!(resolve_aliases("a y", &aliases), vec!["scan", "x", "y"]);
        match execute("a y", &aliases) {
            CommandResult::Async { command } => assert_eq!(command.payload(), "x y"),
            other => panic!("expected async, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_resolution_is_not_recursive() {
        let aliases = table(&[("a", "b"), ("b", "help")]);
        match execute("a", &aliases) {
            CommandResult::Error { message } => assert!(message.contains("'b'")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_listing() {
        assert_eq!(
            execute("alias", &AliasTable::new()),
            CommandResult::text("No aliases defined.")
        );
        let aliases = table(&[("foo", "bar"), ("ex", "scan example.com")]);
        assert_eq!(
            execute("alias", &aliases),
            CommandResult::text("ex = 'scan example.com'\nfoo = 'bar'")
        );
    }

    #[test]
    fn test_alias_definition_splits_on_first_equals() {
        let aliases = AliasTable::new();
        assert_eq!(
            execute("alias q = scan a=b|c", &aliases),
            CommandResult::SetAlias {
                key: "q".to_string(),
                value: "scan a=b|c".to_string(),
            }
        );
        assert_eq!(
            execute("alias foo=bar", &aliases),
            CommandResult::SetAlias {
                key: "foo".to_string(),
                value: "bar".to_string(),
            }
        );
    }

    #[test]
    fn test_alias_definition_rejects_empty_sides() {
        let aliases = AliasTable::new();
        for line in ["alias =bar", "alias foo=", "alias foo", "alias  =  "] {
            assert!(
                matches!(execute(line, &aliases), CommandResult::Error { .. }),
                "{line} should be rejected"
            );
        }
    }

    #[test]
    fn test_alias_name_with_spaces_is_rejected() {
        let aliases = AliasTable::new();
        match execute("alias my cmd=scan x", &aliases) {
            CommandResult::Error { message } => assert!(message.contains("'my cmd'")),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(matches!(
            execute("alias my\tcmd=help", &aliases),
            CommandResult::Error { .. }
        ));
    }

    #[test]
    fn test_unalias() {
        let aliases = AliasTable::new();
        assert!(matches!(execute("unalias", &aliases), CommandResult::Error { .. }));
        assert_eq!(
            execute("unalias foo", &aliases),
            CommandResult::RemoveAlias {
                key: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_set_alias_serializes_as_tagged_intent() {
        let result = CommandResult::SetAlias {
            key: "k".to_string(),
            value: "a|b=c".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "setAlias");
        assert_eq!(json["value"], "a|b=c");
    }
}
