use datamask::config::MaskYamlConfig;
use datamask::transformer::Value;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;

pub fn run(config: PathBuf, values: Vec<String>, json: bool) -> anyhow::Result<()> {
    if !config.exists() {
        anyhow::bail!("config file does not exist: {}", config.display());
    }

    let yaml = MaskYamlConfig::load(&config)?;
    let mut transformer = yaml.build()?;
    tracing::info!(
        transformer = transformer.kind(),
        engine = %yaml.engine,
        "transforming values"
    );

    let inputs: Vec<String> = if values.is_empty() {
        io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        values
    };

    let start_time = Instant::now();
    let mut results = Vec::with_capacity(inputs.len());
    for (line, input) in inputs.into_iter().enumerate() {
        let value = transformer
            .transform(&Value::Text(input))
            .map_err(|e| anyhow::anyhow!("value {}: {}", line + 1, e))?;
        if json {
            results.push(value);
        } else {
            println!("{}", value);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    Ok(())
}
