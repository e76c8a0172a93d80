//! Agent orchestration
//!
//! The agent owns the two optional backends, classifies every input through
//! [`crate::commands::route`], dispatches to the database gateway or the
//! natural-language pipeline, and appends each processed exchange to the
//! conversation history. Every path resolves to exactly one output string;
//! failures become labeled Portuguese messages, never panics.

use crate::ai::{
    ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE, GenerationProvider, PromptGenerator, SQL_MAX_TOKENS,
    SQL_TEMPERATURE, create_client, strip_sql_fences,
};
use crate::commands::{EntityKind, RoutedCommand, route};
use crate::config::{AGENT_NAME, Config};
use crate::database::{DatabaseClient, DbResult, QueryOutcome, QueryRows};
use crate::database_postgresql::PostgresDatabase;
use crate::format::format_rows;
use crate::schema::{OPEN_TITLES_TABLE, OPERATIONS_TABLE, LEDGER_PARTIES_TABLE};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

const MISSING_DATABASE: &str = "Erro: Ferramenta PostgreSQL não disponível.";
const MISSING_GENERATION: &str = "Erro: Backend de geração de texto não disponível.";
const MISSING_GENERATION_FOR_NL: &str = "Erro: Backend de geração de texto não disponível. \
     Necessário para processar consultas em linguagem natural.";
const MISSING_DATABASE_FOR_NL: &str = "Erro: Ferramenta PostgreSQL não disponível. \
     Necessária para executar consultas ao banco de dados.";

/// Who said a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One (role, text) entry in the conversation history.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// The backends an agent may hold. Absence is a typed `None`, checked once
/// per use; there is no dynamic tool registry.
#[derive(Default)]
pub struct AgentBackends {
    pub generation: Option<Box<dyn GenerationProvider>>,
    pub database: Option<Box<dyn DatabaseClient>>,
}

/// Snapshot of the agent's identity and wiring, for the `info` command.
#[derive(Debug, Clone)]
pub struct AgentInfo {
    pub name: String,
    pub version: String,
    pub generation_backend: Option<String>,
    pub database_configured: bool,
    pub conversation_length: usize,
}

pub struct Agent {
    name: String,
    generation: Option<Box<dyn GenerationProvider>>,
    database: Option<Box<dyn DatabaseClient>>,
    history: Vec<ConversationTurn>,
}

impl Agent {
    /// Build an agent from configuration: configured generation backend plus
    /// a lazy PostgreSQL gateway.
    pub fn new(config: &Config) -> Self {
        let generation = match create_client(&config.llm) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Backend de geração indisponível: {}", e);
                None
            }
        };

        Self::with_backends(AgentBackends {
            generation,
            database: Some(Box::new(PostgresDatabase::new(&config.database))),
        })
    }

    /// Build an agent over explicit backends (tests, embedding).
    pub fn with_backends(backends: AgentBackends) -> Self {
        Self {
            name: AGENT_NAME.to_string(),
            generation: backends.generation,
            database: backends.database,
            history: Vec::new(),
        }
    }

    pub fn info(&self) -> AgentInfo {
        AgentInfo {
            name: self.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generation_backend: self.generation.as_ref().map(|g| g.name().to_string()),
            database_configured: self.database.is_some(),
            conversation_length: self.history.len(),
        }
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Release the database connection, if any.
    pub async fn close(&mut self) {
        if let Some(db) = self.database.as_mut() {
            if let Err(e) = db.close().await {
                warn!("Falha ao fechar conexão: {}", e);
            }
        }
    }

    /// Process one input end to end. The input and the produced output are
    /// appended to the history as two turns, whatever branch was taken.
    pub async fn process_query(&mut self, input: &str) -> String {
        let response = self.dispatch(route(input)).await;

        self.history.push(ConversationTurn {
            role: Role::User,
            content: input.to_string(),
        });
        self.history.push(ConversationTurn {
            role: Role::Assistant,
            content: response.clone(),
        });

        response
    }

    async fn dispatch(&mut self, command: RoutedCommand) -> String {
        match command {
            RoutedCommand::RawSql(sql) => self.run_sql(&sql).await,
            RoutedCommand::ListTables => self.list_database_tables().await,
            RoutedCommand::DescribeTable(name) => self.describe_database_table(&name).await,
            RoutedCommand::ListEntity { kind, limit } => self.list_entity(kind, limit).await,
            RoutedCommand::CountRecords(table) => self.count_table_records(table).await,
            RoutedCommand::CountOpenTitles => self.count_open_titles().await,
            RoutedCommand::NaturalLanguage(question) => {
                self.answer_natural_language(&question).await
            }
            RoutedCommand::Freeform(text) => self.freeform_answer(&text).await,
            RoutedCommand::Usage(hint) => hint.to_string(),
        }
    }

    async fn run_sql(&mut self, sql: &str) -> String {
        let Some(db) = self.database.as_mut() else {
            return MISSING_DATABASE.to_string();
        };
        match db.execute_query(sql).await {
            Ok(QueryOutcome::Rows(rows)) => format_rows(&rows),
            Ok(QueryOutcome::Affected(n)) => affected_message(n),
            Err(e) => format!("Erro ao executar consulta: {e}"),
        }
    }

    async fn list_database_tables(&mut self) -> String {
        let Some(db) = self.database.as_mut() else {
            return MISSING_DATABASE.to_string();
        };
        match db.list_tables().await {
            Ok(tables) if tables.is_empty() => {
                "Nenhuma tabela encontrada no banco de dados.".to_string()
            }
            Ok(tables) => format!(
                "Tabelas disponíveis no banco de dados:\n- {}",
                tables.join("\n- ")
            ),
            Err(e) => format!("Erro ao listar tabelas: {e}"),
        }
    }

    async fn describe_database_table(&mut self, table: &str) -> String {
        let Some(db) = self.database.as_mut() else {
            return MISSING_DATABASE.to_string();
        };
        match db.describe_table(table).await {
            Ok(rows) if rows.is_empty() => {
                format!("Tabela '{table}' não encontrada ou não possui colunas.")
            }
            Ok(rows) => format_rows(&rows),
            Err(e) => format!("Erro ao descrever tabela: {e}"),
        }
    }

    async fn list_entity(&mut self, kind: EntityKind, limit: i64) -> String {
        let Some(db) = self.database.as_mut() else {
            return MISSING_DATABASE.to_string();
        };

        let (result, empty_message, error_label): (DbResult<QueryRows>, &str, &str) = match kind {
            EntityKind::Operations => (
                db.list_operations(limit).await,
                "Nenhuma operação encontrada.",
                "Erro ao buscar operações",
            ),
            EntityKind::OpenTitles => (
                db.list_open_titles(limit).await,
                "Nenhum título em aberto encontrado.",
                "Erro ao buscar títulos em aberto",
            ),
            EntityKind::LedgerParties => (
                db.list_ledger_parties(limit).await,
                "Nenhuma informação de cedente encontrada.",
                "Erro ao buscar informações de cedentes",
            ),
        };

        match result {
            Ok(rows) if rows.is_empty() => empty_message.to_string(),
            Ok(rows) => format_rows(&rows),
            Err(e) => format!("{error_label}: {e}"),
        }
    }

    async fn count_table_records(&mut self, table: &str) -> String {
        let Some(db) = self.database.as_mut() else {
            return MISSING_DATABASE.to_string();
        };
        match db.count_records(table).await {
            Ok(rows) => match rows.value(0, "total_records").and_then(display_count) {
                Some(total) => {
                    format!("A tabela {table} contém {total} registros no total.")
                }
                None => format!("Não foi possível contar os registros na tabela {table}."),
            },
            Err(e) => format!("Erro ao contar registros: {e}"),
        }
    }

    async fn count_open_titles(&mut self) -> String {
        let Some(db) = self.database.as_mut() else {
            return MISSING_DATABASE.to_string();
        };
        match db.count_open_titles().await {
            Ok(rows) => match rows.value(0, "total_titulos_abertos").and_then(display_count) {
                Some(total) => format!("Existem {total} títulos em aberto no total."),
                None => "Não foi possível contar os títulos em aberto.".to_string(),
            },
            Err(e) => format!("Erro ao contar títulos em aberto: {e}"),
        }
    }

    /// The two-call pipeline: synthesize SQL from the question, execute it,
    /// then explain the results. Schema context is fetched live on every
    /// request. Any gateway failure short-circuits into a labeled message.
    async fn answer_natural_language(&mut self, question: &str) -> String {
        if self.generation.is_none() {
            return MISSING_GENERATION_FOR_NL.to_string();
        }
        if self.database.is_none() {
            return MISSING_DATABASE_FOR_NL.to_string();
        }

        // Phase 1: SQL synthesis against the live schema.
        let tables_overview = self.list_database_tables().await;
        let operations_schema = self.describe_database_table(OPERATIONS_TABLE).await;
        let open_titles_schema = self.describe_database_table(OPEN_TITLES_TABLE).await;
        let ledger_parties_schema = self.describe_database_table(LEDGER_PARTIES_TABLE).await;

        let synthesis_prompt = PromptGenerator::sql_synthesis_prompt(
            &tables_overview,
            &[
                (OPERATIONS_TABLE, operations_schema),
                (OPEN_TITLES_TABLE, open_titles_schema),
                (LEDGER_PARTIES_TABLE, ledger_parties_schema),
            ],
        );

        let Some(generation) = self.generation.as_ref() else {
            return MISSING_GENERATION_FOR_NL.to_string();
        };
        let raw_sql = match generation
            .generate_text(question, Some(&synthesis_prompt), SQL_MAX_TOKENS, SQL_TEMPERATURE)
            .await
        {
            Ok(text) => text,
            Err(e) => return format!("Erro ao gerar consulta SQL: {}", e.user_message()),
        };

        let sql = strip_sql_fences(&raw_sql);
        info!("Consulta em linguagem natural: {}", question);
        info!("SQL gerado: {}", sql);

        // Phase 2: execute and explain.
        let Some(db) = self.database.as_mut() else {
            return MISSING_DATABASE_FOR_NL.to_string();
        };
        let results = match db.execute_query(&sql).await {
            Ok(QueryOutcome::Rows(rows)) => format_rows(&rows),
            Ok(QueryOutcome::Affected(n)) => affected_message(n),
            Err(e) => return format!("Erro ao executar consulta: {e}"),
        };
        debug!("Resultados formatados para explicação: {} bytes", results.len());

        let explanation_prompt =
            PromptGenerator::explanation_prompt(&self.name, question, &sql, &results);

        let Some(generation) = self.generation.as_ref() else {
            return MISSING_GENERATION_FOR_NL.to_string();
        };
        match generation
            .generate_text(
                "Por favor, explique os resultados da consulta de forma amigável.",
                Some(&explanation_prompt),
                ANSWER_MAX_TOKENS,
                ANSWER_TEMPERATURE,
            )
            .await
        {
            Ok(answer) => answer,
            Err(e) => format!("Erro ao gerar explicação: {}", e.user_message()),
        }
    }

    async fn freeform_answer(&mut self, text: &str) -> String {
        let Some(generation) = self.generation.as_ref() else {
            return MISSING_GENERATION.to_string();
        };

        let persona = PromptGenerator::assistant_prompt(&self.name);
        match generation
            .generate_text(text, Some(&persona), ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE)
            .await
        {
            Ok(answer) => answer,
            Err(e) => format!("Erro ao gerar resposta: {}", e.user_message()),
        }
    }
}

fn affected_message(n: u64) -> String {
    format!("Consulta executada com sucesso. Linhas afetadas: {n}")
}

fn display_count(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiError, AiResult};
    use crate::database::{DatabaseError, DbResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Records every gateway call so tests can assert call counts and order.
    #[derive(Default)]
    struct DbLog {
        executed: Vec<String>,
        list_tables_calls: usize,
        described: Vec<String>,
        listed_entities: Vec<(String, i64)>,
        counted: Vec<String>,
        open_title_counts: usize,
    }

    struct MockDatabase {
        log: Arc<Mutex<DbLog>>,
        tables: Vec<String>,
        describe_rows: QueryRows,
        execute_outcome: Option<QueryOutcome>,
        entity_rows: QueryRows,
        count_rows: QueryRows,
    }

    impl MockDatabase {
        fn new(log: Arc<Mutex<DbLog>>) -> Self {
            Self {
                log,
                tables: vec![
                    "fato_operacoes".to_string(),
                    "fato_titulosabertos".to_string(),
                ],
                describe_rows: QueryRows {
                    columns: vec!["column_name".to_string(), "data_type".to_string()],
                    rows: vec![vec![json!("valor"), json!("numeric")]],
                },
                execute_outcome: Some(QueryOutcome::Rows(QueryRows {
                    columns: vec!["total".to_string()],
                    rows: vec![vec![json!(42)]],
                })),
                entity_rows: QueryRows {
                    columns: vec!["cedente".to_string()],
                    rows: vec![vec![json!("ACME LTDA")]],
                },
                count_rows: QueryRows {
                    columns: vec!["total_records".to_string()],
                    rows: vec![vec![json!(42)]],
                },
            }
        }
    }

    #[async_trait]
    impl DatabaseClient for MockDatabase {
        async fn execute_query(&mut self, sql: &str) -> DbResult<QueryOutcome> {
            self.log.lock().unwrap().executed.push(sql.to_string());
            self.execute_outcome
                .clone()
                .ok_or_else(|| DatabaseError::QueryError("relation does not exist".to_string()))
        }

        async fn list_tables(&mut self) -> DbResult<Vec<String>> {
            self.log.lock().unwrap().list_tables_calls += 1;
            Ok(self.tables.clone())
        }

        async fn describe_table(&mut self, table: &str) -> DbResult<QueryRows> {
            self.log.lock().unwrap().described.push(table.to_string());
            Ok(self.describe_rows.clone())
        }

        async fn list_operations(&mut self, limit: i64) -> DbResult<QueryRows> {
            self.log
                .lock()
                .unwrap()
                .listed_entities
                .push(("operacoes".to_string(), limit));
            Ok(self.entity_rows.clone())
        }

        async fn list_open_titles(&mut self, limit: i64) -> DbResult<QueryRows> {
            self.log
                .lock()
                .unwrap()
                .listed_entities
                .push(("titulos".to_string(), limit));
            Ok(self.entity_rows.clone())
        }

        async fn list_ledger_parties(&mut self, limit: i64) -> DbResult<QueryRows> {
            self.log
                .lock()
                .unwrap()
                .listed_entities
                .push(("cedentes".to_string(), limit));
            Ok(self.entity_rows.clone())
        }

        async fn count_records(&mut self, table: &str) -> DbResult<QueryRows> {
            self.log.lock().unwrap().counted.push(table.to_string());
            Ok(self.count_rows.clone())
        }

        async fn count_open_titles(&mut self) -> DbResult<QueryRows> {
            self.log.lock().unwrap().open_title_counts += 1;
            Ok(QueryRows {
                columns: vec!["total_titulos_abertos".to_string()],
                rows: vec![vec![json!(7)]],
            })
        }

        async fn close(&mut self) -> DbResult<()> {
            Ok(())
        }
    }

    #[derive(Debug, Clone)]
    struct RecordedGeneration {
        prompt: String,
        system_prompt: Option<String>,
        max_tokens: u32,
        temperature: f32,
    }

    struct MockGeneration {
        calls: Arc<Mutex<Vec<RecordedGeneration>>>,
        responses: Mutex<VecDeque<AiResult<String>>>,
    }

    impl MockGeneration {
        fn new(
            calls: Arc<Mutex<Vec<RecordedGeneration>>>,
            responses: Vec<AiResult<String>>,
        ) -> Self {
            Self {
                calls,
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl GenerationProvider for MockGeneration {
        async fn generate_text(
            &self,
            prompt: &str,
            system_prompt: Option<&str>,
            max_tokens: u32,
            temperature: f32,
        ) -> AiResult<String> {
            self.calls.lock().unwrap().push(RecordedGeneration {
                prompt: prompt.to_string(),
                system_prompt: system_prompt.map(|s| s.to_string()),
                max_tokens,
                temperature,
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AiError::ProviderError("no scripted response".to_string())))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn agent_with_database() -> (Agent, Arc<Mutex<DbLog>>) {
        let log = Arc::new(Mutex::new(DbLog::default()));
        let agent = Agent::with_backends(AgentBackends {
            generation: None,
            database: Some(Box::new(MockDatabase::new(Arc::clone(&log)))),
        });
        (agent, log)
    }

    fn nl_agent(responses: Vec<AiResult<String>>) -> (Agent, Arc<Mutex<DbLog>>, Arc<Mutex<Vec<RecordedGeneration>>>) {
        let log = Arc::new(Mutex::new(DbLog::default()));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let agent = Agent::with_backends(AgentBackends {
            generation: Some(Box::new(MockGeneration::new(Arc::clone(&calls), responses))),
            database: Some(Box::new(MockDatabase::new(Arc::clone(&log)))),
        });
        (agent, log, calls)
    }

    #[tokio::test]
    async fn test_list_tables_output() {
        let (mut agent, log) = agent_with_database();
        let response = agent.process_query("listar tabelas").await;
        assert_eq!(
            response,
            "Tabelas disponíveis no banco de dados:\n- fato_operacoes\n- fato_titulosabertos"
        );
        assert_eq!(log.lock().unwrap().list_tables_calls, 1);
    }

    #[tokio::test]
    async fn test_count_ledger_parties() {
        let (mut agent, log) = agent_with_database();
        let response = agent.process_query("contar cedentes").await;
        assert_eq!(
            response,
            "A tabela dimcedentesconsolidado contém 42 registros no total."
        );
        assert_eq!(
            log.lock().unwrap().counted,
            vec!["dimcedentesconsolidado".to_string()]
        );
    }

    #[tokio::test]
    async fn test_count_open_titles() {
        let (mut agent, _log) = agent_with_database();
        let response = agent.process_query("contar titulos").await;
        assert_eq!(response, "Existem 7 títulos em aberto no total.");
    }

    #[tokio::test]
    async fn test_bad_limit_never_reaches_gateway() {
        let (mut agent, log) = agent_with_database();
        let response = agent.process_query("titulos abc").await;
        assert_eq!(
            response,
            "Por favor, forneça um número válido. Exemplo: 'titulos 20'"
        );

        let log = log.lock().unwrap();
        assert!(log.executed.is_empty());
        assert!(log.listed_entities.is_empty());
        assert_eq!(log.list_tables_calls, 0);
    }

    #[tokio::test]
    async fn test_entity_listing_passes_limit() {
        let (mut agent, log) = agent_with_database();
        agent.process_query("cedentes 25").await;
        assert_eq!(
            log.lock().unwrap().listed_entities,
            vec![("cedentes".to_string(), 25)]
        );
    }

    #[tokio::test]
    async fn test_raw_sql_write_reports_affected_rows() {
        let log = Arc::new(Mutex::new(DbLog::default()));
        let mut db = MockDatabase::new(Arc::clone(&log));
        db.execute_outcome = Some(QueryOutcome::Affected(3));
        let mut agent = Agent::with_backends(AgentBackends {
            generation: None,
            database: Some(Box::new(db)),
        });

        let response = agent
            .process_query("sql: DELETE FROM fato_operacoes WHERE etapa = 'cancelada'")
            .await;
        assert!(response.contains('3'), "{response}");
    }

    #[tokio::test]
    async fn test_natural_language_pipeline_call_shape() {
        let (mut agent, log, calls) = nl_agent(vec![
            Ok("```sql\nSELECT COUNT(*) as total FROM fato_titulosabertos\n```".to_string()),
            Ok("Existem 42 títulos em aberto.".to_string()),
        ]);

        let response = agent
            .process_query("Quantos títulos em aberto existem no total?")
            .await;
        assert_eq!(response, "Existem 42 títulos em aberto.");

        // Exactly one execution, with the fences already stripped.
        let log = log.lock().unwrap();
        assert_eq!(
            log.executed,
            vec!["SELECT COUNT(*) as total FROM fato_titulosabertos".to_string()]
        );
        // Live schema context: one table listing plus the three descriptions.
        assert_eq!(log.list_tables_calls, 1);
        assert_eq!(log.described.len(), 3);

        // Exactly two generation calls: deterministic synthesis, then fluent
        // explanation carrying question, SQL and results.
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].max_tokens, 500);
        assert!((calls[0].temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(calls[1].max_tokens, 1000);
        assert!((calls[1].temperature - 0.7).abs() < f32::EPSILON);
        let explanation_system = calls[1].system_prompt.as_deref().unwrap();
        assert!(explanation_system.contains("Quantos títulos em aberto existem no total?"));
        assert!(explanation_system.contains("SELECT COUNT(*) as total FROM fato_titulosabertos"));
        assert!(explanation_system.contains("| total |"));
    }

    #[tokio::test]
    async fn test_natural_language_generation_failure_label() {
        let (mut agent, log, _calls) = nl_agent(vec![Err(AiError::ApiError {
            status_code: 401,
            message: "invalid key".to_string(),
        })]);

        let response = agent.process_query("qual o valor total?").await;
        assert!(response.starts_with("Erro ao gerar consulta SQL:"), "{response}");
        assert!(response.contains("401"));
        assert!(log.lock().unwrap().executed.is_empty());
    }

    #[tokio::test]
    async fn test_natural_language_execution_failure_short_circuits() {
        let log = Arc::new(Mutex::new(DbLog::default()));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut db = MockDatabase::new(Arc::clone(&log));
        db.execute_outcome = None; // scripted failure
        let mut agent = Agent::with_backends(AgentBackends {
            generation: Some(Box::new(MockGeneration::new(
                Arc::clone(&calls),
                vec![Ok("SELECT 1".to_string()), Ok("unreachable".to_string())],
            ))),
            database: Some(Box::new(db)),
        });

        let response = agent.process_query("qual o valor total?").await;
        assert!(response.starts_with("Erro ao executar consulta:"), "{response}");
        // The explanation call never happens after an execution failure.
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_freeform_uses_persona_prompt() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut agent = Agent::with_backends(AgentBackends {
            generation: Some(Box::new(MockGeneration::new(
                Arc::clone(&calls),
                vec![Ok("Olá!".to_string())],
            ))),
            database: None,
        });

        let response = agent.process_query("bom dia").await;
        assert_eq!(response, "Olá!");

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].prompt, "bom dia");
        assert!(
            calls[0]
                .system_prompt
                .as_deref()
                .unwrap()
                .contains("fato_operacoes")
        );
    }

    #[tokio::test]
    async fn test_missing_backends_degrade_to_messages() {
        let mut agent = Agent::with_backends(AgentBackends::default());

        assert_eq!(
            agent.process_query("listar tabelas").await,
            "Erro: Ferramenta PostgreSQL não disponível."
        );
        let nl = agent.process_query("quantos cedentes existem?").await;
        assert!(nl.starts_with("Erro: Backend de geração de texto não disponível."));
    }

    #[tokio::test]
    async fn test_history_appends_two_turns_per_input() {
        let (mut agent, _log) = agent_with_database();
        agent.process_query("contar cedentes").await;
        agent.process_query("titulos abc").await;

        let history = agent.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "contar cedentes");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[3].role, Role::Assistant);
        assert_eq!(
            history[3].content,
            "Por favor, forneça um número válido. Exemplo: 'titulos 20'"
        );

        agent.clear_history();
        assert!(agent.history().is_empty());
    }

    #[tokio::test]
    async fn test_describe_empty_table_sentence() {
        let log = Arc::new(Mutex::new(DbLog::default()));
        let mut db = MockDatabase::new(Arc::clone(&log));
        db.describe_rows = QueryRows::default();
        let mut agent = Agent::with_backends(AgentBackends {
            generation: None,
            database: Some(Box::new(db)),
        });

        let response = agent.process_query("descrever tabela inexistente").await;
        assert_eq!(
            response,
            "Tabela 'inexistente' não encontrada ou não possui colunas."
        );
    }
}
