//! opera-kb: one-shot CLI for the Opera knowledge-base chat webhook.
//! Reads config, sends a question (argv or stdin), prints the cleaned
//! answer and its sources to stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use opera_kb_client::config;
use opera_kb_client::{api_base, extract, ChatClient, Market, Product};

struct CliArgs {
    config_path: Option<PathBuf>,
    market: Option<Market>,
    product: Option<Product>,
    session_id: Option<String>,
    question: Option<String>,
}

fn parse_args() -> CliArgs {
    let mut parsed = CliArgs {
        config_path: None,
        market: None,
        product: None,
        session_id: None,
        question: None,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                parsed.config_path = args.get(i + 1).map(PathBuf::from);
                i += 2;
            }
            "--market" => {
                let value = args.get(i + 1).map(String::as_str).unwrap_or("");
                parsed.market = Some(value.parse().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }));
                i += 2;
            }
            "--product" => {
                let value = args.get(i + 1).map(String::as_str).unwrap_or("");
                parsed.product = Some(value.parse().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }));
                i += 2;
            }
            "--session" => {
                parsed.session_id = args.get(i + 1).cloned();
                i += 2;
            }
            other => {
                parsed.question = Some(other.to_string());
                i += 1;
            }
        }
    }
    parsed
}

fn resolve_config_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    // 1. --config <path> flag
    if let Some(path) = flag {
        return Some(path);
    }
    // 2. OPERA_KB_CONFIG env var
    if let Ok(val) = std::env::var("OPERA_KB_CONFIG") {
        return Some(PathBuf::from(val));
    }
    // 3. Default path (~/.opera-kb/config.yaml), if it exists
    config::default_config_path().filter(|p| p.exists())
}

fn main() {
    let args = parse_args();

    let cfg = match resolve_config_path(args.config_path) {
        Some(path) => match config::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!(
                    "Error: failed to load config from {}: {}",
                    path.display(),
                    e
                );
                process::exit(1);
            }
        },
        None => config::Config::default(),
    };

    let market = args.market.or(cfg.chat.market).unwrap_or_default();
    let product = args.product.or(cfg.chat.product).unwrap_or_default();
    let base_url = cfg.api.base_url.clone().unwrap_or_else(api_base);

    // Fresh conversation unless --session continues an existing one.
    let session_id = args
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // Question from argv, else the first stdin line.
    let question = match args.question {
        Some(q) => q,
        None => {
            let stdin = io::stdin();
            let mut line = String::new();
            stdin.lock().read_line(&mut line).unwrap_or(0);
            line.trim().to_string()
        }
    };

    if question.is_empty() {
        eprintln!("Error: no question provided");
        process::exit(1);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    rt.block_on(async {
        let client = ChatClient::new(base_url);
        let response = client
            .send_chat_message(&question, market, product, Some(&session_id))
            .await;

        if !response.success {
            eprintln!(
                "Error: {}",
                response.error.as_deref().unwrap_or("chat request failed")
            );
            process::exit(1);
        }

        let result = extract(&response.answer);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = writeln!(out, "{}", result.clean_text);
        if !result.sources.is_empty() {
            let _ = writeln!(out, "\nSources:");
            for source in &result.sources {
                let _ = writeln!(out, "  {}", source);
            }
        }

        // Printed to stderr so it can be fed back via --session.
        eprintln!("Session: {}", session_id);
    });
}
