use clap::Parser;

/// Factora - natural-language assistant for the factoring ledger
#[derive(Parser, Clone, Debug)]
#[command(name = "factora")]
#[command(version, long_about = None)]
#[command(about = "Assistente de dados em linguagem natural para operações de fomento mercantil")]
pub struct Args {
    /// Process a single query and exit
    #[arg(short, long, value_name = "CONSULTA")]
    pub query: Option<String>,
}
