mod cli;

use clap::Parser;
use cli::Args;
use factora::agent::Agent;
use factora::config::{AGENT_NAME, Config};
use nu_ansi_term::{Color, Style};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_banner() {
    let line = Color::Cyan.paint("=".repeat(50));
    println!("{line}");
    println!(
        "  {}",
        Style::new()
            .bold()
            .paint(format!("{AGENT_NAME} Agente de IA v{VERSION}"))
    );
    println!("{line}");
    println!(
        "{}",
        Color::Green.paint("Digite 'exit', 'quit' ou 'sair' para encerrar.")
    );
    println!(
        "{}",
        Color::Green.paint("Digite 'help' para ver os comandos disponíveis.")
    );
    println!("{}", Color::Cyan.paint("-".repeat(50)));
}

fn print_help() {
    println!();
    println!("{}", Color::Yellow.paint("Comandos Disponíveis:"));
    println!("  help, ajuda - Mostrar esta mensagem de ajuda");
    println!("  exit, quit, sair - Sair do programa");
    println!("  clear, limpar - Limpar o histórico de conversas");
    println!("  info - Mostrar informações sobre o agente");
    println!();
    println!("{}", Color::Yellow.paint("Comandos de Banco de Dados:"));
    println!("  listar tabelas - Listar todas as tabelas no banco de dados");
    println!("  descrever tabela <nome> - Descrever a estrutura de uma tabela");
    println!("  SQL: <consulta> - Executar uma consulta SQL");
    println!("  operacoes [limite] - Listar operações da tabela fato_operacoes");
    println!("  titulos [limite] - Listar títulos em aberto da tabela fato_titulosabertos");
    println!("  cedentes [limite] - Listar informações cadastrais dos cedentes");
    println!("  contar operacoes - Contar o total de registros na tabela fato_operacoes");
    println!("  contar titulos - Contar o total de títulos em aberto");
    println!("  contar registros titulos - Contar o total de registros na tabela fato_titulosabertos");
    println!("  contar cedentes - Contar o total de registros na tabela dimcedentesconsolidado");
    println!();
    println!("{}", Color::Yellow.paint("Consultas em Linguagem Natural:"));
    println!("  Você também pode fazer perguntas em linguagem natural sobre o banco de dados:");
    println!("  Quantos títulos em aberto possui o cedente X?");
    println!("  Qual o valor total dos títulos em aberto?");
    println!("  Quais são os 5 maiores títulos em aberto?");
    println!("{}", Color::Cyan.paint("-".repeat(50)));
}

fn print_info(agent: &Agent) {
    let info = agent.info();
    println!();
    println!("{}", Color::Yellow.paint("Informações do Agente:"));
    println!("  nome: {}", info.name);
    println!("  versão: {}", info.version);
    println!(
        "  geração de texto: {}",
        info.generation_backend.as_deref().unwrap_or("indisponível")
    );
    println!(
        "  banco de dados: {}",
        if info.database_configured {
            "configurado"
        } else {
            "indisponível"
        }
    );
    println!("  turnos de conversa: {}", info.conversation_length);
}

async fn interactive_loop(agent: &mut Agent) {
    print_banner();

    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("Você".to_string()),
        DefaultPromptSegment::Empty,
    );

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }

                let lower = input.to_lowercase();
                match lower.as_str() {
                    "exit" | "quit" | "sair" => {
                        println!(
                            "{}",
                            Color::Yellow.paint(format!("Encerrando {AGENT_NAME}. Até logo!"))
                        );
                        break;
                    }
                    "help" | "ajuda" => print_help(),
                    "clear" | "limpar" => {
                        agent.clear_history();
                        println!("{}", Color::Yellow.paint("Histórico de conversas limpo."));
                    }
                    "info" => print_info(agent),
                    _ => {
                        println!(
                            "{}",
                            Color::Blue.paint(format!("{AGENT_NAME} está pensando..."))
                        );
                        let response = agent.process_query(input).await;
                        println!(
                            "\n{} {}",
                            Color::Magenta.paint(format!("{AGENT_NAME}:")),
                            response
                        );
                    }
                }
            }
            Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => {
                println!(
                    "\n{}",
                    Color::Yellow.paint(format!("Encerrando {AGENT_NAME}. Até logo!"))
                );
                break;
            }
            Err(e) => {
                eprintln!("{}", Color::Red.paint(format!("Erro de leitura: {e}")));
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let mut agent = Agent::new(&config);

    // Single-query mode prints one response and exits 0 either way.
    if let Some(query) = args.query {
        let response = agent.process_query(&query).await;
        println!("{response}");
    } else {
        interactive_loop(&mut agent).await;
    }

    agent.close().await;
}
