//! Colorful console output for local search progress.
//!
//! Provides a `tracing` layer that formats `pvns_solver` events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Search start and end
//! - **DEBUG**: One line per round
//! - **WARN**: Explorer failures

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. The
/// filter comes from `RUST_LOG` and falls back to `pvns_solver=info`.
/// If another global subscriber is already installed it is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(default_directive())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(PvnsConsoleLayer)
            .try_init();
    });
}

fn default_directive() -> tracing_subscriber::filter::Directive {
    match "pvns_solver=info".parse() {
        Ok(directive) => directive,
        Err(_) => LevelFilter::INFO.into(),
    }
}

/// A tracing layer that formats local search events with colors.
pub struct PvnsConsoleLayer;

impl<S: Subscriber> Layer<S> for PvnsConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("pvns_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    explorers: Option<u64>,
    threads: Option<u64>,
    round: Option<u64>,
    rounds: Option<u64>,
    failures: Option<u64>,
    duration_ms: Option<u64>,
    neighborhood: Option<String>,
    name: Option<String>,
    reason: Option<String>,
    value: Option<String>,
    improved: Option<bool>,
    changed: Option<bool>,
}

impl EventVisitor {
    fn set_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "neighborhood" => self.neighborhood = Some(value),
            "name" => self.name = Some(value),
            "reason" => self.reason = Some(value),
            "value" => self.value = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field, s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "explorers" => self.explorers = Some(value),
            "threads" => self.threads = Some(value),
            "round" => self.round = Some(value),
            "rounds" => self.rounds = Some(value),
            "failures" => self.failures = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "improved" => self.improved = Some(value),
            "changed" => self.changed = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "local_search_start" => format_search_start(v),
        "round_end" => format_round_end(v),
        "local_search_end" => format_search_end(v),
        "task_failed" => format_task_failed(v),
        _ => String::new(),
    }
}

fn format_search_start(v: &EventVisitor) -> String {
    format!(
        "{} Local search │ {} explorers │ {} threads │ start {}",
        "▶".bright_green().bold(),
        v.explorers.unwrap_or(0).bright_yellow(),
        v.threads.unwrap_or(0).bright_yellow(),
        v.value.as_deref().unwrap_or("N/A").white(),
    )
}

fn format_round_end(v: &EventVisitor) -> String {
    let neighborhood = v.neighborhood.as_deref().unwrap_or("none");
    let neighborhood = if v.improved.unwrap_or(false) {
        neighborhood.bright_green().to_string()
    } else {
        neighborhood.bright_black().to_string()
    };

    let mut output = format!(
        "    {} Round {:>7} │ {:<16} │ {:>8} │ {}",
        "->".bright_blue(),
        v.round.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        neighborhood,
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.value.as_deref().unwrap_or("N/A"),
    );

    let failures = v.failures.unwrap_or(0);
    if failures > 0 {
        output.push_str(&format!(" │ {} failed", failures.bright_red()));
    }
    output
}

fn format_search_end(v: &EventVisitor) -> String {
    let status = if v.changed.unwrap_or(false) {
        "IMPROVED".bright_green().bold().to_string()
    } else {
        "UNCHANGED".bright_black().bold().to_string()
    };

    format!(
        "{} Local search complete │ {} rounds │ {} │ {} │ {}",
        "■".bright_cyan().bold(),
        v.rounds.unwrap_or(0).to_formatted_string(&Locale::en).bright_yellow(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.value.as_deref().unwrap_or("N/A").white(),
        status,
    )
}

fn format_task_failed(v: &EventVisitor) -> String {
    format!(
        "    {} {} failed: {}",
        "!".bright_red().bold(),
        v.name.as_deref().unwrap_or("task").bright_red(),
        v.reason.as_deref().unwrap_or("unknown"),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
