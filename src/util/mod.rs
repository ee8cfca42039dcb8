pub mod testing;

/// Log targets whose trace output buries the crate's own lines: the HTTP
/// stack underneath `reqwest` and the skim picker.
pub const NOISY_LOG_TARGETS: [&str; 5] = [
    "hyper",
    "rustls",
    "reqwest::connect",
    "skim",
    "tuikit",
];

/// Whether events from `target` are dropped by the log filter.
pub fn is_noisy_target(target: &str) -> bool {
    NOISY_LOG_TARGETS
        .iter()
        .any(|name| target.starts_with(name))
}
