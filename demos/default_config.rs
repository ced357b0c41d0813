//! Print the default configuration as TOML
//!
//! Redirect the output to a file to get a starting point for
//! `measure_walkthrough --config`.

use arscene_session::AppConfig;

fn main() -> anyhow::Result<()> {
    print!("{}", AppConfig::default().to_toml_string()?);
    Ok(())
}
