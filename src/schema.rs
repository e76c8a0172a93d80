//! Fixed schema descriptor for the factoring ledger
//!
//! The assistant only ever talks about three tables. Their column semantics
//! are compile-time data: the live database supplies types and ordering, but
//! the *meaning* of each column (what the LLM needs to pick the right one)
//! is documented here and rendered into the system prompts.

/// A column paired with its business meaning, in Portuguese.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDoc {
    pub name: &'static str,
    pub meaning: &'static str,
}

/// Documentation for one ledger table.
#[derive(Debug, Clone, Copy)]
pub struct TableDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [ColumnDoc],
}

impl TableDoc {
    /// Column names in declaration order, for building projection lists.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Render the table documentation as a bulleted block for LLM prompts.
    pub fn render(&self) -> String {
        let mut out = format!("Tabela: {}\n{}\n", self.name, self.description);
        for col in self.columns {
            out.push_str(&format!("- `{}`: {}\n", col.name, col.meaning));
        }
        out
    }
}

pub const OPERATIONS_TABLE: &str = "fato_operacoes";
pub const OPEN_TITLES_TABLE: &str = "fato_titulosabertos";
pub const LEDGER_PARTIES_TABLE: &str = "dimcedentesconsolidado";

/// Tables the counting operation accepts. Anything else is rejected before
/// any SQL is built.
pub const COUNTABLE_TABLES: [&str; 3] =
    [OPERATIONS_TABLE, OPEN_TITLES_TABLE, LEDGER_PARTIES_TABLE];

pub static OPERATIONS: TableDoc = TableDoc {
    name: OPERATIONS_TABLE,
    description: "Registros de operações financeiras entre cedentes e sacados.",
    columns: &[
        ColumnDoc { name: "empresa", meaning: "Empresa à qual a operação está vinculada." },
        ColumnDoc { name: "cedente", meaning: "Detentor da operação (quem vende o título ou crédito)." },
        ColumnDoc { name: "etapa", meaning: "Fase atual da operação." },
        ColumnDoc { name: "cpf_cnpj_cedente", meaning: "Documento do cedente." },
        ColumnDoc { name: "prazo_medio", meaning: "Tempo médio das operações." },
        ColumnDoc { name: "valor_bruto", meaning: "Valor total bruto da operação (valor base ao se referir a \"valor da operação\")." },
        ColumnDoc { name: "valor_desagio", meaning: "Valor descontado do bruto (perda do cedente)." },
        ColumnDoc { name: "valor_liquido", meaning: "Valor efetivamente recebido." },
        ColumnDoc { name: "valor_recompra_pendencia", meaning: "Pendências em recompra." },
        ColumnDoc { name: "cred_cedente", meaning: "Crédito do cedente." },
        ColumnDoc { name: "valor_pagto_operacao", meaning: "Pagamentos realizados na operação." },
        ColumnDoc { name: "valor_saldo", meaning: "Saldo restante da operação." },
        ColumnDoc { name: "operacao", meaning: "Identificador da operação." },
        ColumnDoc { name: "data", meaning: "Data da operação." },
        ColumnDoc { name: "operador", meaning: "Responsável por cuidar daquela carteira." },
        ColumnDoc { name: "captador", meaning: "Quem originou o negócio." },
        ColumnDoc { name: "pagamento_operacao", meaning: "Tipo ou status do pagamento." },
        ColumnDoc { name: "conta_pagto", meaning: "Conta usada no pagamento." },
        ColumnDoc { name: "indice_operacao", meaning: "Índice financeiro da operação." },
    ],
};

pub static OPEN_TITLES: TableDoc = TableDoc {
    name: OPEN_TITLES_TABLE,
    description: "Títulos financeiros em aberto (ainda não liquidados).",
    columns: &[
        ColumnDoc { name: "empresa", meaning: "Empresa relacionada ao título." },
        ColumnDoc { name: "cedente", meaning: "Quem detém o título." },
        ColumnDoc { name: "conf", meaning: "Campo auxiliar de conferência." },
        ColumnDoc { name: "conta", meaning: "Conta associada ao título." },
        ColumnDoc { name: "cpf_cnpj_cedente", meaning: "Documento do cedente." },
        ColumnDoc { name: "cpf_cnpj_sacado", meaning: "Documento do sacado." },
        ColumnDoc { name: "cr", meaning: "Campo auxiliar operacional." },
        ColumnDoc { name: "data_emissao", meaning: "Data de emissão do título." },
        ColumnDoc { name: "documento", meaning: "Número do documento de origem." },
        ColumnDoc { name: "etapa", meaning: "Fase atual do título." },
        ColumnDoc { name: "historico", meaning: "Histórico qualitativo do título." },
        ColumnDoc { name: "id_titulo", meaning: "Identificador do título (número único)." },
        ColumnDoc { name: "id_titulo_original", meaning: "Identificador do título original, quando substituído." },
        ColumnDoc { name: "m", meaning: "Campo auxiliar operacional." },
        ColumnDoc { name: "motivo", meaning: "Motivo registrado para a situação do título." },
        ColumnDoc { name: "vencimento", meaning: "Data de vencimento do título." },
        ColumnDoc { name: "nosso_numero", meaning: "Número de cobrança bancária." },
        ColumnDoc { name: "op", meaning: "Operação de origem do título." },
        ColumnDoc { name: "original", meaning: "Campo auxiliar operacional." },
        ColumnDoc { name: "sacado", meaning: "Cliente do cedente (quem paga o título)." },
        ColumnDoc { name: "situacao", meaning: "Status atual (ex: em aberto, pago, vencido)." },
        ColumnDoc { name: "tipo", meaning: "Tipo do título." },
        ColumnDoc { name: "valor", meaning: "Valor de face do título." },
        ColumnDoc { name: "valor_juros", meaning: "Juros acumulados." },
        ColumnDoc { name: "valor_multa", meaning: "Multa aplicada." },
        ColumnDoc { name: "valor_tarifas", meaning: "Tarifas cobradas." },
        ColumnDoc { name: "valor_total", meaning: "Valor total devido." },
        ColumnDoc { name: "desagio", meaning: "Desconto aplicado ao valor do título." },
    ],
};

pub static LEDGER_PARTIES: TableDoc = TableDoc {
    name: LEDGER_PARTIES_TABLE,
    description: "Dados cadastrais consolidados dos cedentes.",
    columns: &[
        ColumnDoc { name: "nome", meaning: "Nome do cedente." },
        ColumnDoc { name: "cpf_cnpj", meaning: "CPF ou CNPJ do cedente." },
        ColumnDoc { name: "endereco", meaning: "Endereço do cedente." },
        ColumnDoc { name: "cep", meaning: "CEP do endereço do cedente." },
        ColumnDoc { name: "cidade", meaning: "Cidade do cedente." },
        ColumnDoc { name: "uf", meaning: "Estado (UF) do cedente." },
        ColumnDoc { name: "email", meaning: "Email de contato do cedente." },
        ColumnDoc { name: "telefone", meaning: "Telefone de contato do cedente." },
        ColumnDoc { name: "gerente", meaning: "Gerente comercial responsável pelo cedente." },
        ColumnDoc { name: "operador", meaning: "Operador responsável pela carteira do cedente." },
        ColumnDoc { name: "captador", meaning: "Quem originou o relacionamento com o cedente." },
        ColumnDoc { name: "controlador", meaning: "Responsável pelo controle da carteira." },
        ColumnDoc { name: "fator_percentual", meaning: "Percentual do fator aplicado nas operações." },
        ColumnDoc { name: "advalorem_percentual", meaning: "Percentual de ad valorem aplicado." },
        ColumnDoc { name: "data_cadastro", meaning: "Data de cadastro do cedente." },
        ColumnDoc { name: "fonte_captacao", meaning: "Como o cedente foi captado." },
        ColumnDoc { name: "setor", meaning: "Setor de atuação do cedente." },
        ColumnDoc { name: "grupo_economico", meaning: "Grupo econômico ao qual o cedente pertence." },
        ColumnDoc { name: "primeira_operacao", meaning: "Data da primeira operação do cedente." },
        ColumnDoc { name: "limite_global", meaning: "Limite global de crédito do cedente." },
        ColumnDoc { name: "limite_boleto_especial", meaning: "Limite para boleto especial." },
        ColumnDoc { name: "limite_comissaria", meaning: "Limite para operações de comissária." },
        ColumnDoc { name: "limite_tranche", meaning: "Limite por tranche." },
        ColumnDoc { name: "limite_boleto_especial_tranche", meaning: "Limite de boleto especial por tranche." },
        ColumnDoc { name: "limite_boleto_garantido", meaning: "Limite para boleto garantido." },
        ColumnDoc { name: "limite_operacao_clean", meaning: "Limite para operação clean." },
        ColumnDoc { name: "risco_atual", meaning: "Classificação de risco atual do cedente." },
        ColumnDoc { name: "saldo", meaning: "Saldo atual do cedente." },
        ColumnDoc { name: "id_cedente", meaning: "Identificador único do cedente." },
    ],
};

/// All documented tables, in presentation order.
pub static LEDGER_TABLES: [&TableDoc; 3] = [&OPERATIONS, &OPEN_TITLES, &LEDGER_PARTIES];

/// Look up a table's documentation by name.
pub fn table_doc(name: &str) -> Option<&'static TableDoc> {
    LEDGER_TABLES.iter().find(|t| t.name == name).copied()
}

/// True if `name` may be passed to the record-counting operation.
pub fn is_countable(name: &str) -> bool {
    COUNTABLE_TABLES.contains(&name)
}
