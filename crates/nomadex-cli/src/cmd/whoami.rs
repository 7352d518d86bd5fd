//! Whoami subcommand - verify credentials against the API.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use serde_json::Value;

use nomadex_api::{Credentials, authenticate};

use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
    let credentials = Credentials::from_env().context(
        "no credentials: set NOMAD_CLIENT_ACCESS_TOKEN, or NOMAD_USERNAME and NOMAD_PASSWORD",
    )?;
    let base_url = config.api.resolved_base_url()?;
    let (_client, user) = authenticate(&base_url, &credentials)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Field").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    table.add_row(vec!["Oasis", &base_url]);
    for field in ["name", "username", "email", "user_id"] {
        if let Some(value) = user.get(field).and_then(Value::as_str) {
            table.add_row(vec![field, value]);
        }
    }
    eprintln!("\n{table}");
    Ok(())
}
