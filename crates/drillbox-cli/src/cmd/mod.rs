pub mod etl;
pub mod reprocess;
pub mod serve;

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::config::Config;

/// Two-column table with the house style
pub(crate) fn table(headers: [&str; 2]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers.map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

pub fn show_config(config: &Config) {
    let http = drillbox_core::http_config();
    let mut table = table(["Setting", "Value"]);

    table.add_row(vec!["Timeout", &format!("{}s", http.timeout.as_secs())]);
    table.add_row(vec!["Max retries", &http.max_retries.to_string()]);
    table.add_row(vec![
        "Retry delay",
        &format!("{}ms", http.retry_delay.as_millis()),
    ]);
    table.add_row(vec!["ETL base URL", &config.etl.base_url]);
    table.add_row(vec!["ETL output", &config.etl.output.display().to_string()]);
    table.add_row(vec!["Page delay", &format!("{}ms", config.etl.page_delay_ms)]);
    table.add_row(vec!["Server bind", &config.server.bind]);
    table.add_row(vec![
        "Webhook log",
        &config.server.log_file.display().to_string(),
    ]);
    table.add_row(vec![
        "Notifications",
        &config.server.notification_file.display().to_string(),
    ]);
    table.add_row(vec![
        "Notifier URL",
        config.server.notify_url.as_deref().unwrap_or("disabled"),
    ]);
    table.add_row(vec![
        "API token",
        if config.server.api_token.is_some() {
            "configured"
        } else {
            "not set"
        },
    ]);
    table.add_row(vec!["Reprocess endpoint", &config.reprocess.endpoint]);

    eprintln!("\n{table}");
}
