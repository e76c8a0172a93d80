//! System-prompt builders for the two-call pipeline and the freeform branch
//!
//! All prompts are Portuguese. The semantic rules and worked examples are
//! part of the observable behavior: they are what steers the model toward
//! the correct columns, so changes here change answers.

use crate::schema::LEDGER_TABLES;

/// Shared semantic rules, restated in both pipeline phases.
const SEMANTIC_RULES: &str = "\
REGRAS SEMÂNTICAS IMPORTANTES:

1. Sempre que for solicitada a \"soma dos valores da operação\", use o campo `valor_bruto` da tabela `fato_operacoes`.
2. A coluna `desagio` representa o desconto aplicado ao valor da operação ou título.
3. A coluna `situacao` da tabela de títulos representa o status atual (ex: em aberto, pago, vencido).
4. O \"operador\" é o responsável pela carteira de operações, enquanto o \"gerente\" é o comercial responsável por um grupo de cedentes.
5. Todos os campos que começam com `valor_` referem-se a valores financeiros.
6. `sacado` é quem deve pagar o título, ou seja, o cliente do cedente.
7. `cedente` é quem detém o título ou a operação (quem vende o título ou crédito).
8. A tabela `dimcedentesconsolidado` contém dados cadastrais dos cedentes, como nome, endereço, contatos e limites de crédito.";

/// Worked NL→SQL examples for the synthesis phase.
const CONVERSION_EXAMPLES: &str = "\
EXEMPLOS DE CONVERSÃO:

Pergunta: \"Quantos títulos em aberto existem no total?\"
SQL: SELECT COUNT(*) as total FROM fato_titulosabertos

Pergunta: \"Quantos títulos em aberto possui o cedente ACME LTDA?\"
SQL: SELECT COUNT(*) as total FROM fato_titulosabertos WHERE cedente = 'ACME LTDA'

Pergunta: \"Qual o valor total dos títulos em aberto do cedente XYZ?\"
SQL: SELECT SUM(valor) as valor_total FROM fato_titulosabertos WHERE cedente = 'XYZ'

Pergunta: \"Quais são os 5 maiores títulos em aberto?\"
SQL: SELECT cedente, sacado, valor, vencimento FROM fato_titulosabertos ORDER BY valor DESC LIMIT 5

Pergunta: \"Quantas operações foram realizadas no último mês?\"
SQL: SELECT COUNT(*) as total FROM fato_operacoes WHERE data >= CURRENT_DATE - INTERVAL '1 month'

Pergunta: \"Qual o valor total das operações por cedente nos últimos 30 dias?\"
SQL: SELECT cedente, SUM(valor_bruto) as valor_total FROM fato_operacoes WHERE data >= CURRENT_DATE - INTERVAL '30 days' GROUP BY cedente ORDER BY valor_total DESC

Pergunta: \"Me mostre o deságio médio por operador.\"
SQL: SELECT operador, AVG(valor_desagio) as desagio_medio FROM fato_operacoes GROUP BY operador ORDER BY desagio_medio DESC

Pergunta: \"Quais sacados têm mais de 3 títulos vencidos?\"
SQL: SELECT sacado, COUNT(*) as total_titulos FROM fato_titulosabertos WHERE vencimento < CURRENT_DATE GROUP BY sacado HAVING COUNT(*) > 3 ORDER BY total_titulos DESC

Pergunta: \"Quais são os cedentes do estado de São Paulo?\"
SQL: SELECT nome, cidade, telefone, email FROM dimcedentesconsolidado WHERE uf = 'SP'

Pergunta: \"Quais cedentes têm limite global acima de 100 mil?\"
SQL: SELECT nome, limite_global FROM dimcedentesconsolidado WHERE limite_global > 100000 ORDER BY limite_global DESC

Pergunta: \"Quais cedentes são gerenciados pelo gerente João Silva?\"
SQL: SELECT nome, telefone, email FROM dimcedentesconsolidado WHERE gerente = 'João Silva'";

/// Prompt builders for pipeline and freeform generation calls.
pub struct PromptGenerator;

impl PromptGenerator {
    /// Phase-1 system prompt: schema context (fetched live from the
    /// database, formatted by the caller) + rules + worked examples.
    pub fn sql_synthesis_prompt(tables_overview: &str, table_schemas: &[(&str, String)]) -> String {
        let mut prompt = String::from(
            "Você é um especialista em SQL que converte perguntas em linguagem natural para consultas SQL.\n\n",
        );

        prompt.push_str("INFORMAÇÕES DO BANCO DE DADOS:\n");
        prompt.push_str(tables_overview);
        prompt.push_str("\n\n");

        for (table, schema) in table_schemas {
            prompt.push_str(&format!("ESQUEMA DA TABELA {table}:\n{schema}\n\n"));
        }

        prompt.push_str(SEMANTIC_RULES);
        prompt.push_str("\n\n");
        prompt.push_str(CONVERSION_EXAMPLES);
        prompt.push_str(
            "\n\nINSTRUÇÕES:\n\
             1. Analise a pergunta em linguagem natural\n\
             2. Identifique as tabelas relevantes (fato_operacoes, fato_titulosabertos ou dimcedentesconsolidado)\n\
             3. Gere APENAS a consulta SQL correspondente, sem explicações adicionais\n\
             4. Não inclua comentários ou texto adicional, apenas a consulta SQL\n\
             5. Use aspas simples para strings\n\
             6. Certifique-se de que a consulta seja válida para PostgreSQL\n\
             7. Aplique as regras semânticas descritas acima para escolher as colunas corretas\n\n\
             Agora, converta a seguinte pergunta em uma consulta SQL:",
        );

        prompt
    }

    /// Phase-2 system prompt: restates the question, the synthesized SQL and
    /// the formatted results, plus the semantic rules.
    pub fn explanation_prompt(
        agent_name: &str,
        question: &str,
        sql: &str,
        results: &str,
    ) -> String {
        format!(
            "Você é {agent_name}, um assistente de dados inteligente especializado em interpretar \
             dados financeiros de operações e títulos.\n\n\
             A pergunta original do usuário foi: \"{question}\"\n\n\
             A consulta SQL gerada foi: \"{sql}\"\n\n\
             Os resultados da consulta são:\n{results}\n\n\
             {SEMANTIC_RULES}\n\n\
             INSTRUÇÕES:\n\
             1. Explique os resultados da consulta de forma clara e objetiva\n\
             2. Use linguagem simples e acessível\n\
             3. Forneça insights relevantes sobre os dados, incluindo tendências, anomalias ou padrões\n\
             4. Responda em português\n\
             5. Seja conciso e direto\n\
             6. Não mencione a consulta SQL, apenas explique os resultados\n\
             7. Se houver muitos resultados, resuma as informações mais importantes\n\
             8. Se aplicável, mencione totais, médias, valores máximos/mínimos\n\
             9. Formate valores monetários com R$ e separadores de milhar (ex: R$ 1.234,56)\n\
             10. Formate datas no padrão brasileiro (DD/MM/AAAA)\n\
             11. Contextualize os resultados em termos de operações financeiras\n\
             12. Sugira possíveis ações ou análises adicionais com base nos resultados\n\
             13. Se relevante, compare os resultados com médias ou valores esperados"
        )
    }

    /// Persona prompt for the freeform branch: full table documentation from
    /// the schema descriptor, semantic rules and the special-command help.
    pub fn assistant_prompt(agent_name: &str) -> String {
        let mut prompt = format!(
            "Você é {agent_name}, um assistente de dados inteligente especializado em interpretar \
             dados financeiros de operações e títulos em um banco de dados relacional. Seu trabalho \
             é responder perguntas com base em três tabelas principais: `fato_operacoes`, \
             `fato_titulosabertos` e `dimcedentesconsolidado`.\n\n### Estrutura das Tabelas\n\n"
        );

        for (i, table) in LEDGER_TABLES.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, table.render()));
            prompt.push('\n');
        }

        prompt.push_str(SEMANTIC_RULES);
        prompt.push_str(
            "\n\n### Comandos especiais:\n\
             - 'SQL: <consulta>' para executar uma consulta SQL personalizada\n\
             - 'listar tabelas' para listar todas as tabelas no banco de dados\n\
             - 'descrever tabela <nome>' para descrever a estrutura de uma tabela\n\
             - 'operacoes [limite]' para listar operações da tabela fato_operacoes\n\
             - 'titulos [limite]' para listar títulos em aberto da tabela fato_titulosabertos\n\
             - 'cedentes [limite]' para listar informações cadastrais dos cedentes\n\
             - 'contar operacoes' para contar o total de registros na tabela fato_operacoes\n\
             - 'contar titulos' para contar o total de títulos em aberto\n\
             - 'contar registros titulos' para contar o total de registros na tabela fato_titulosabertos\n\
             - 'contar cedentes' para contar o total de registros na tabela dimcedentesconsolidado\n\n\
             Responda sempre em português, de forma clara e objetiva, como um especialista em \
             operações financeiras. Forneça insights contextualizados e relevantes para o usuário.",
        );

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_prompt_embeds_live_schema() {
        let prompt = PromptGenerator::sql_synthesis_prompt(
            "Tabelas disponíveis no banco de dados:\n- fato_operacoes",
            &[("fato_operacoes", "| column_name |\n| valor_bruto |".to_string())],
        );

        assert!(prompt.contains("fato_operacoes"));
        assert!(prompt.contains("valor_bruto"));
        assert!(prompt.contains("REGRAS SEMÂNTICAS"));
        assert!(prompt.contains("EXEMPLOS DE CONVERSÃO"));
        assert!(prompt.contains("APENAS a consulta SQL"));
    }

    #[test]
    fn test_explanation_prompt_restates_question_and_sql() {
        let prompt = PromptGenerator::explanation_prompt(
            "Factora",
            "Qual o valor total?",
            "SELECT SUM(valor) FROM fato_titulosabertos",
            "| valor_total |\n| --- |\n| 10 |",
        );

        assert!(prompt.contains("Qual o valor total?"));
        assert!(prompt.contains("SELECT SUM(valor) FROM fato_titulosabertos"));
        assert!(prompt.contains("valor_total"));
        assert!(prompt.contains("R$"));
    }

    #[test]
    fn test_assistant_prompt_documents_all_tables() {
        let prompt = PromptGenerator::assistant_prompt("Factora");
        assert!(prompt.contains("fato_operacoes"));
        assert!(prompt.contains("fato_titulosabertos"));
        assert!(prompt.contains("dimcedentesconsolidado"));
        assert!(prompt.contains("limite_global"));
        assert!(prompt.contains("Comandos especiais"));
    }
}
