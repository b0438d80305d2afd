//! The `recite list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use recite_providers::config::load_config_from;
use recite_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config
        .providers
        .keys()
        .filter(|name| provider_filter.as_ref().map_or(true, |f| f == *name))
        .collect();
    names.sort();

    if names.is_empty() {
        println!("No providers configured. Run `recite init` to create a config file.");
        return Ok(());
    }

    for name in names {
        let provider = create_provider(name, &config.providers[name])?;
        let marker = if *name == config.default_provider {
            " (default)"
        } else {
            ""
        };
        println!("Provider: {name}{marker}");
        for model in provider.available_models() {
            let selected = if *name == config.default_provider && model.id == config.default_model {
                "  [grading]"
            } else {
                ""
            };
            println!(
                "  {}: {} ({}K context){selected}",
                model.id,
                model.name,
                model.max_context / 1000
            );
        }
        println!();
    }

    Ok(())
}
