//! The `interviewsim list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use interviewsim_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }
        let Some(provider_config) = config.providers.get(name) else {
            continue;
        };

        found_any = true;
        println!("Provider: {name}");
        match create_provider(name, provider_config) {
            Ok(provider) => {
                for model in provider.available_models() {
                    let is_default =
                        *name == config.default_provider && model.id == config.default_model;
                    let marker = if is_default { " (default)" } else { "" };
                    println!(
                        "  {} - {} ({}K context){marker}",
                        model.id,
                        model.name,
                        model.max_context / 1000
                    );
                }
            }
            Err(e) => println!("  unavailable: {e:#}"),
        }
        println!();
    }

    if !found_any {
        println!("No providers configured. Run `interviewsim init` to create a config file.");
    }

    Ok(())
}
