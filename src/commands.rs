//! Input classification for the command surface
//!
//! Classification is a strict ordered ladder of pattern checks, first match
//! wins. The ordering is part of the observable contract: several patterns
//! overlap (e.g. `listar tabelas` contains the natural-language trigger
//! `lista`), so reordering the checks changes behavior.

use crate::database::DEFAULT_LIST_LIMIT;
use crate::schema::{LEDGER_PARTIES_TABLE, OPEN_TITLES_TABLE, OPERATIONS_TABLE};

/// The three canned listing targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Operations,
    OpenTitles,
    LedgerParties,
}

/// One classified input, consumed immediately by the agent's dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutedCommand {
    /// Explicit SQL after the `sql:` prefix, case preserved.
    RawSql(String),
    ListTables,
    DescribeTable(String),
    ListEntity { kind: EntityKind, limit: i64 },
    CountRecords(&'static str),
    CountOpenTitles,
    NaturalLanguage(String),
    Freeform(String),
    /// Malformed argument: the fixed usage-hint text to display. Dispatch
    /// never reaches a gateway on this variant.
    Usage(&'static str),
}

pub const DESCRIBE_TABLE_USAGE: &str =
    "Por favor, forneça o nome da tabela. Exemplo: 'descrever tabela nome_da_tabela'";
pub const OPERATIONS_LIMIT_USAGE: &str =
    "Por favor, forneça um número válido. Exemplo: 'operacoes 20'";
pub const OPEN_TITLES_LIMIT_USAGE: &str =
    "Por favor, forneça um número válido. Exemplo: 'titulos 20'";
pub const LEDGER_PARTIES_LIMIT_USAGE: &str =
    "Por favor, forneça um número válido. Exemplo: 'cedentes 20'";

/// Interrogatives and domain nouns that route an input into the
/// natural-language pipeline when nothing more specific matched first.
const NL_KEYWORDS: [&str; 19] = [
    "quantos", "quais", "qual", "quanto", "lista", "mostre", "exiba", "cedente", "cedentes",
    "título", "títulos", "operação", "operações", "valor", "total", "aberto", "abertos", "sacado",
    "sacados",
];

/// Classify one raw input. Total: malformed arguments become `Usage`.
pub fn route(input: &str) -> RoutedCommand {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if let Some(prefix) = trimmed.get(..4) {
        if prefix.eq_ignore_ascii_case("sql:") {
            return RoutedCommand::RawSql(trimmed[4..].trim().to_string());
        }
    }

    if lower == "listar tabelas" || lower == "list tables" {
        return RoutedCommand::ListTables;
    }

    if let Some(rest) = strip_any_prefix(&lower, &["descrever tabela ", "describe table "]) {
        let name = rest.trim();
        if name.is_empty() {
            return RoutedCommand::Usage(DESCRIBE_TABLE_USAGE);
        }
        return RoutedCommand::DescribeTable(name.to_string());
    }
    if lower == "descrever tabela" || lower == "describe table" {
        return RoutedCommand::Usage(DESCRIBE_TABLE_USAGE);
    }

    if let Some(command) = route_entity_listing(&lower) {
        return command;
    }

    if lower == "contar operacoes" || lower == "total operacoes" {
        return RoutedCommand::CountRecords(OPERATIONS_TABLE);
    }
    if lower == "contar titulos" || lower == "total titulos" {
        return RoutedCommand::CountOpenTitles;
    }
    if lower == "contar registros titulos" {
        return RoutedCommand::CountRecords(OPEN_TITLES_TABLE);
    }
    if lower == "contar cedentes" {
        return RoutedCommand::CountRecords(LEDGER_PARTIES_TABLE);
    }

    if NL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return RoutedCommand::NaturalLanguage(trimmed.to_string());
    }

    RoutedCommand::Freeform(trimmed.to_string())
}

fn strip_any_prefix<'a>(lower: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
}

fn route_entity_listing(lower: &str) -> Option<RoutedCommand> {
    let entities: [(EntityKind, &str, &str, &'static str); 3] = [
        (
            EntityKind::Operations,
            "operacoes",
            "listar operacoes",
            OPERATIONS_LIMIT_USAGE,
        ),
        (
            EntityKind::OpenTitles,
            "titulos",
            "listar titulos",
            OPEN_TITLES_LIMIT_USAGE,
        ),
        (
            EntityKind::LedgerParties,
            "cedentes",
            "listar cedentes",
            LEDGER_PARTIES_LIMIT_USAGE,
        ),
    ];

    for (kind, keyword, listing_alias, usage) in entities {
        if lower == keyword || lower == listing_alias {
            return Some(RoutedCommand::ListEntity {
                kind,
                limit: DEFAULT_LIST_LIMIT,
            });
        }
        if let Some(rest) = lower.strip_prefix(keyword) {
            if let Some(rest) = rest.strip_prefix(' ') {
                // Only the first token is the limit; trailing text is ignored.
                let token = rest.split_whitespace().next().unwrap_or("");
                return Some(match token.parse::<i64>() {
                    Ok(limit) => RoutedCommand::ListEntity { kind, limit },
                    Err(_) => RoutedCommand::Usage(usage),
                });
            }
        }
    }

    None
}
