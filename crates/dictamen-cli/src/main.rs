use std::sync::Arc;
use std::time::Duration;

use dictamen_core::{CoordinatorConfig, Request};
use dictamen_persistence::{FileAuditLedger, FileResultStore, StorageConfig};
use dictamen_rust::DecisionService;
use serde_json::json;

type FileService = DecisionService<FileResultStore, FileAuditLedger>;

fn build_service(config: &StorageConfig) -> Result<FileService, String> {
    let store = FileResultStore::open(config.cache_dir(), config.cache_retention_days)
        .map_err(|e| format!("cache: {e}"))?;
    let ledger =
        FileAuditLedger::open(config.ledger_path()).map_err(|e| format!("ledger: {e}"))?;
    Ok(DecisionService::new(
        Arc::new(store),
        Arc::new(ledger),
        CoordinatorConfig { wait_timeout: Duration::from_millis(config.wait_timeout_ms) },
    ))
}

fn usage() -> ! {
    eprintln!(
        "Uso: dictamen-cli ask --situation <TXT> --risk <low|medium|high> --department <TXT> --date <YYYY-MM-DD> [--actor <TXT>]\n     dictamen-cli export --from <SEQ> --to <SEQ>\n     dictamen-cli verify-chain\n     dictamen-cli sweep"
    );
    std::process::exit(2);
}

fn main() {
    // Cargar .env si existe para obtener DICTAMEN_DATA_DIR y compañía
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = StorageConfig::from_env();
    let service = match build_service(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[dictamen] error de almacenamiento: {e}");
            std::process::exit(5);
        }
    };

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("ask") => {
            let mut situation = None;
            let mut risk = None;
            let mut department = None;
            let mut date = None;
            let mut actor = "cli".to_string();
            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--situation" => {
                        i += 1;
                        situation = args.get(i).cloned();
                    }
                    "--risk" => {
                        i += 1;
                        risk = args.get(i).cloned();
                    }
                    "--department" => {
                        i += 1;
                        department = args.get(i).cloned();
                    }
                    "--date" => {
                        i += 1;
                        date = args.get(i).cloned();
                    }
                    "--actor" => {
                        i += 1;
                        if let Some(a) = args.get(i) {
                            actor = a.clone();
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            let (Some(situation), Some(risk), Some(department), Some(date)) =
                (situation, risk, department, date)
            else {
                usage();
            };
            let request = Request::new(
                json!({
                    "situation": situation,
                    "riskLevel": risk,
                    "department": department,
                    "date": date,
                }),
                actor,
            );
            match service.process(&request) {
                Ok(outcome) => {
                    println!("estado: {:?}", outcome.cache_status);
                    println!("auditoría: seq={} hash={}", outcome.audit_ref.seq, outcome.audit_ref.entry_hash);
                    println!("{}", outcome.result.payload);
                }
                Err(e) => {
                    eprintln!("[dictamen ask] {e}");
                    std::process::exit(if e.is_recoverable() { 4 } else { 5 });
                }
            }
        }
        Some("export") => {
            let mut from = 0u64;
            let mut to = service.ledger_len().saturating_sub(1);
            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--from" => {
                        i += 1;
                        from = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(from);
                    }
                    "--to" => {
                        i += 1;
                        to = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(to);
                    }
                    _ => {}
                }
                i += 1;
            }
            match service.audit_entries(from, to) {
                Ok(entries) => {
                    for e in entries {
                        match serde_json::to_string(&e) {
                            Ok(line) => println!("{line}"),
                            Err(err) => eprintln!("[dictamen export] {err}"),
                        }
                    }
                }
                Err(e) => {
                    eprintln!("[dictamen export] {e}");
                    std::process::exit(5);
                }
            }
        }
        Some("verify-chain") => {
            let len = service.ledger_len();
            if len == 0 {
                println!("ledger vacío");
                return;
            }
            match service.verify_chain(0, len - 1) {
                Ok(()) => println!("cadena íntegra: {len} entradas"),
                Err(e) => {
                    eprintln!("[dictamen verify-chain] {e}");
                    std::process::exit(5);
                }
            }
        }
        Some("sweep") => {
            println!("entradas expiradas eliminadas: {}", service.sweep_cache());
        }
        _ => usage(),
    }
}
