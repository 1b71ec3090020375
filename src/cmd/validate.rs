use datamask::config::MaskYamlConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ValidationSummary {
    valid: bool,
    transformer: Option<&'static str>,
    engine: Option<String>,
    required_byte_length: Option<usize>,
    error: Option<String>,
}

pub fn run(config: PathBuf, json: bool) -> anyhow::Result<()> {
    if !config.exists() {
        anyhow::bail!("config file does not exist: {}", config.display());
    }

    let summary = match summarize(&config) {
        Ok(summary) => summary,
        Err(e) => ValidationSummary {
            valid: false,
            transformer: None,
            engine: None,
            required_byte_length: None,
            error: Some(format!("{:#}", e)),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.valid {
        println!(
            "Config OK: {} (engine: {}, {} bytes per value)",
            summary.transformer.unwrap_or_default(),
            summary.engine.as_deref().unwrap_or_default(),
            summary.required_byte_length.unwrap_or_default()
        );
    }

    if let Some(error) = summary.error {
        anyhow::bail!("invalid config {}: {}", config.display(), error);
    }
    Ok(())
}

fn summarize(path: &Path) -> anyhow::Result<ValidationSummary> {
    let yaml = MaskYamlConfig::load(path)?;
    yaml.validate()?;
    let transformer = yaml.transformer.transformer()?;
    Ok(ValidationSummary {
        valid: true,
        transformer: Some(transformer.kind()),
        engine: Some(yaml.engine.to_string()),
        required_byte_length: Some(transformer.required_byte_length()),
        error: None,
    })
}
