//! Prints controller output to the terminal.

use std::sync::Mutex;

use client_core::{ConverterView, DownloadLink, PredictionDisplay, PredictionView};
use url::Url;

pub struct TerminalView {
    server_url: Option<Url>,
    last_progress: Mutex<String>,
}

impl TerminalView {
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: Url::parse(server_url).ok(),
            last_progress: Mutex::new(String::new()),
        }
    }

    /// Relative links are resolved against the server so they can be opened directly.
    pub fn resolve_link(&self, href: &str) -> String {
        self.server_url
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| href.to_string())
    }
}

impl ConverterView for TerminalView {
    fn set_drop_zone_label(&self, text: &str) {
        println!("{text}");
    }

    fn set_drop_zone_active(&self, _active: bool) {}

    fn set_progress_text(&self, text: &str) {
        let Ok(mut last) = self.last_progress.lock() else {
            return;
        };
        if !text.is_empty() && *last != text {
            println!("{text}");
        }
        *last = text.to_string();
    }

    fn clear_result(&self) {}

    fn show_error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_completion(&self, message: &str, link: Option<&DownloadLink>) {
        println!("{message}");
        if let Some(link) = link {
            println!("{}: {}", link.label, self.resolve_link(&link.href));
        }
    }
}

impl PredictionView for TerminalView {
    fn set_submit_enabled(&self, _enabled: bool) {}

    fn show_prediction(&self, display: &PredictionDisplay) {
        println!("{} [{}]", display.label, display.class.css_class());
        println!("{}", display.confidence_text);
    }

    fn show_error(&self, message: &str) {
        eprintln!("{message}");
    }
}
