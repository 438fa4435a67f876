use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static RENDERS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "showtimes_renders_total",
        "Showtimes renders by outcome",
        &["outcome"]
    )
    .expect("showtimes_renders_total registers once")
});

pub static EMAILS_COMPOSED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "showtimes_emails_composed_total",
        "Notification emails composed, by outcome",
        &["outcome"]
    )
    .expect("showtimes_emails_composed_total registers once")
});

pub fn record_render(ok: bool) {
    RENDERS_TOTAL
        .with_label_values(&[if ok { "ok" } else { "error" }])
        .inc();
}

pub fn record_compose(outcome: &str) {
    EMAILS_COMPOSED_TOTAL.with_label_values(&[outcome]).inc();
}

/// Text exposition of the default registry.
pub fn gather_text() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
