use clap::Parser;
use doc_intake::core::comparison;
use doc_intake::core::intake::accept_all;
use doc_intake::core::response::DryRunResponse;
use doc_intake::core::{Submission, UploadSource};
use doc_intake::utils::error::ErrorCategory;
use doc_intake::utils::{logger, validation::Validate};
use doc_intake::{
    CliConfig, IntakeOrchestrator, IntakeResponse, LocalUploadSource, TomlConfig,
    VisionTextDetector,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 設定檔先載入，命令列參數優先
    if let Some(path) = config.config.clone() {
        let file = match TomlConfig::from_file(&path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        };
        if let Err(e) = file.validate() {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
        config = config.merge_file(&file);
    }

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting doc-intake CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let source = LocalUploadSource::new(".");
    let mut candidates = Vec::with_capacity(config.files.len());
    for path in &config.files {
        match source.read_candidate(path).await {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => {
                tracing::error!("❌ Could not load {}: {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
    }

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - validation only, no OCR call");
        return match accept_all(Submission::Many(candidates)) {
            Ok(accepted) => {
                tracing::info!("✅ {} file(s) would be sent to OCR", accepted.len());
                let body = DryRunResponse::from_candidates(&accepted);
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(())
            }
            Err(e) => {
                let response = IntakeResponse::from(&e);
                println!("{}", serde_json::to_string_pretty(&response)?);
                std::process::exit(1);
            }
        };
    }

    let detector = VisionTextDetector::from_config(&config)?;
    let orchestrator = IntakeOrchestrator::new(detector);
    let outcome = orchestrator.process(candidates).await;

    let exit_code = match &outcome {
        Ok(_) => 0,
        Err(e) => {
            tracing::error!("❌ Intake failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            if e.category() == ErrorCategory::Upstream {
                2
            } else {
                1
            }
        }
    };

    let comparisons: Vec<serde_json::Value> = match (&outcome, config.form_names()) {
        (Ok(result), Some((first_name, last_name))) => {
            let today = chrono::Local::now().date_naive();
            result
                .entries
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "filename": entry.filename,
                        "report": comparison::compare(
                            &entry.extracted_fields,
                            first_name,
                            last_name,
                            today,
                        ),
                    })
                })
                .collect()
        }
        _ => Vec::new(),
    };

    let response = IntakeResponse::from_outcome(outcome);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !comparisons.is_empty() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "comparisons": comparisons }))?
        );
    }

    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
