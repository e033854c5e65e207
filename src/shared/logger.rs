use core::fmt;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Once,
};

use env_logger::fmt::{Color, Style, StyledValue};
use log::{Level, LevelFilter};

use crate::config::CARGO_PKG_NAME;

static MAX_TARGET_WIDTH: AtomicUsize = AtomicUsize::new(0);

static SETUP_LOGS: Once = Once::new();

/// Installs the global logger once. `RUST_LOG` overrides the default `info` level.
#[cfg(test)]
pub fn setup_logger() {
    SETUP_LOGS.call_once(|| {
        // Another test harness may already own the global logger
        let _ = build_logger().is_test(true).try_init();
    });
}

/// Installs the global logger once. `RUST_LOG` overrides the default `info` level.
#[cfg(not(test))]
pub fn setup_logger() {
    SETUP_LOGS.call_once(|| {
        let _ = build_logger().try_init();
    });
}

fn build_logger() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    builder.format(|f, record| {
        use std::io::Write;
        let target = short_target(record.target(), CARGO_PKG_NAME);
        let width = target_width(target);

        let mut style = f.style();
        let level = colored_level(&mut style, record.level());

        let mut style = f.style();
        let target = style.set_bold(true).value(Padded {
            value: target,
            width,
        });

        let time = f.timestamp_micros().to_string();
        let time = time.get(11..).unwrap_or(&time); // skip date
        writeln!(f, "{time} {level} {target} > {}", record.args())
    });

    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Info);
    }

    builder.parse_env("RUST_LOG");

    builder
}

/// `colcodec::tuple::codec` is printed as `tuple::codec`, the crate root as `codec`.
/// Targets of other crates are kept as they are.
fn short_target<'a>(target: &'a str, pkg_name: &str) -> &'a str {
    match target.strip_prefix(pkg_name) {
        Some("") => "codec",
        Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        None => target,
    }
}

struct Padded<T> {
    value: T,
    width: usize,
}

impl<T: fmt::Display> fmt::Display for Padded<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{: <width$}", self.value, width = self.width)
    }
}

/// Widest target seen so far, so the messages line up
fn target_width(target: &str) -> usize {
    MAX_TARGET_WIDTH
        .fetch_max(target.len(), Ordering::Relaxed)
        .max(target.len())
}

fn colored_level(style: &mut Style, level: Level) -> StyledValue<'_, &'static str> {
    match level {
        Level::Trace => style.set_color(Color::Magenta).value("TRACE"),
        Level::Debug => style.set_color(Color::Blue).value("DEBUG"),
        Level::Info => style.set_color(Color::Green).value("INFO "),
        Level::Warn => style.set_color(Color::Yellow).value("WARN "),
        Level::Error => style.set_color(Color::Red).value("ERROR"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("colcodec", "colcodec"), "codec");
        assert_eq!(short_target("colcodec::tuple::codec", "colcodec"), "tuple::codec");
        assert_eq!(short_target("colcodecx::a", "colcodec"), "colcodecx::a");
        assert_eq!(short_target("bytes", "colcodec"), "bytes");
    }

    #[test]
    fn test_padded() {
        let padded = Padded {
            value: "tuple",
            width: 8,
        };
        assert_eq!(padded.to_string(), "tuple   ");
    }

    #[test]
    fn test_setup_logger_is_idempotent() {
        setup_logger();
        setup_logger();
        log::info!("logger ready");
    }
}
