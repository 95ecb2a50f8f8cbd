use std::{fmt, io};

use nu_ansi_term::Color::{self, Blue, Magenta, Red, Yellow};
use tracing::{
    field::{Field, Visit},
    Event, Level, Metadata, Subscriber,
};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    registry::LookupSpan,
};

use crate::{cli::Args, utils::Colored};

/// Collects the message and, when requested, the structured fields of an
/// event such as `reference` or `path`.
struct EventFields {
    message: String,
    extra: Vec<(&'static str, String)>,
    keep_extra: bool,
}

impl EventFields {
    fn new(keep_extra: bool) -> Self {
        Self {
            message: String::new(),
            extra: Vec::new(),
            keep_extra,
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else if self.keep_extra {
            self.extra.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else if self.keep_extra {
            self.extra.push((field.name(), format!("{value:?}")));
        }
    }
}

fn level_tag(level: Level) -> Option<(Color, &'static str)> {
    match level {
        Level::TRACE => Some((Magenta, "[TRACE]")),
        Level::DEBUG => Some((Blue, "[DEBUG]")),
        Level::INFO => None,
        Level::WARN => Some((Yellow, "[WARN]")),
        Level::ERROR => Some((Red, "[ERROR]")),
    }
}

/// Plain formatter for command output. Info events print their message
/// alone; other levels carry a tag, and fields are appended in verbose mode.
pub struct CatalogFormatter {
    verbose: bool,
}

impl<S, N> FormatEvent<S, N> for CatalogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = EventFields::new(self.verbose);
        event.record(&mut fields);

        if let Some((color, tag)) = level_tag(*event.metadata().level()) {
            write!(writer, "{} ", Colored(color, tag))?;
        }
        write!(writer, "{}", fields.message)?;
        for (name, value) in &fields.extra {
            write!(writer, " {}", Colored(Blue, format!("{name}={value}")))?;
        }
        writeln!(writer)
    }
}

/// Info goes to stdout so command output can be piped; everything else goes
/// to stderr.
struct SplitWriter;

impl<'a> MakeWriter<'a> for SplitWriter {
    type Writer = Box<dyn io::Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        Box::new(io::stdout())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if *meta.level() == Level::INFO {
            Box::new(io::stdout())
        } else {
            Box::new(io::stderr())
        }
    }
}

fn filter_level(args: &Args) -> Level {
    match (args.quiet, args.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

pub fn setup_logging(args: &Args) {
    let level = filter_level(args);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(format!("charmstore={level}"))
        .with_target(false)
        .with_writer(SplitWriter)
        .without_time();

    let subscriber: Box<dyn Subscriber + Send + Sync> = if args.json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(
            builder
                .event_format(CatalogFormatter {
                    verbose: level > Level::INFO,
                })
                .finish(),
        )
    };

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_filter_level_from_flags() {
        let args = Args::parse_from(["charmstore", "env"]);
        assert_eq!(filter_level(&args), Level::INFO);

        let args = Args::parse_from(["charmstore", "-v", "env"]);
        assert_eq!(filter_level(&args), Level::DEBUG);

        let args = Args::parse_from(["charmstore", "-vvv", "env"]);
        assert_eq!(filter_level(&args), Level::TRACE);

        let args = Args::parse_from(["charmstore", "-q", "-v", "env"]);
        assert_eq!(filter_level(&args), Level::ERROR);
    }

    #[test]
    fn test_level_tags() {
        assert!(level_tag(Level::INFO).is_none());
        assert_eq!(level_tag(Level::WARN).map(|(_, t)| t), Some("[WARN]"));
    }

    #[test]
    fn test_verbose_is_above_info() {
        assert!(Level::DEBUG > Level::INFO);
        assert!(Level::ERROR < Level::INFO);
    }
}
