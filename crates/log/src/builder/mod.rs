//! Logger builder implementation

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format, WriterConfig};
use crate::error::{LogError, LogResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the root span entered for the life of the program.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerGuard {
    /// A guard that holds nothing; returned when a subscriber already exists.
    #[must_use]
    pub fn noop() -> Self {
        Self { _root_span: None }
    }
}

/// Applies the display toggles shared by every format, then boxes the layer.
macro_rules! boxed_fmt_layer {
    ($layer:expr, $display:expr, $writer:expr) => {{
        let layer = $layer
            .with_writer($writer)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source);
        if $display.time {
            Box::new(layer) as BoxedLayer
        } else {
            Box::new(layer.without_time()) as BoxedLayer
        }
    }};
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber.
    ///
    /// If a subscriber is already installed (tests, embedding hosts) this
    /// returns a no-op guard instead of failing.
    pub fn build(self) -> LogResult<LoggerGuard> {
        if tracing::dispatcher::has_been_set() {
            return Ok(LoggerGuard::noop());
        }

        let filter = EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })?;

        let writer = match self.config.writer {
            WriterConfig::Stderr => BoxMakeWriter::new(std::io::stderr),
            WriterConfig::Stdout => BoxMakeWriter::new(std::io::stdout),
        };

        let display = &self.config.display;
        let fmt_layer = match self.config.format {
            Format::Pretty => boxed_fmt_layer!(tracing_subscriber::fmt::layer().pretty(), display, writer),
            Format::Compact => {
                boxed_fmt_layer!(tracing_subscriber::fmt::layer().compact(), display, writer)
            }
            Format::Json => boxed_fmt_layer!(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(display.flatten),
                display,
                writer
            ),
        };

        Registry::default()
            .with(fmt_layer)
            .with(filter)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))?;

        let root_span = self
            .config
            .service
            .as_deref()
            .map(|service| tracing::info_span!("app", service).entered());

        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }
}
