// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig, WriterConfig};
use miette::{IntoDiagnostic, WrapErr};
use std::path::Path;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Initialize the global tracing subscriber. Returns `Ok(false)` if the config turns
/// logging off, or if a global subscriber was already installed.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_initialize_logging_global(tracing_config: TracingConfig) -> miette::Result<bool> {
    if tracing_config.get_level_filter() == LevelFilter::OFF
        || tracing_config.get_writer_config() == WriterConfig::None
    {
        return Ok(false);
    }

    let Some(layers) = try_create_layers(tracing_config)? else {
        return Ok(false);
    };

    Ok(tracing_subscriber::registry().with(layers).try_init().is_ok())
}

/// Returns the layers. This does not initialize the tracing system.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    let level_filter = tracing_config.get_level_filter();
    let writer_config = tracing_config.get_writer_config();

    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    if let Some(layer) = try_create_display_layer(level_filter, writer_config.clone()) {
        return_it.push(layer);
    }

    if let Some(layer) = try_create_file_layer(level_filter, writer_config)? {
        return_it.push(layer);
    }

    if return_it.is_empty() {
        return Ok(None);
    }

    Ok(Some(return_it))
}

pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = tracing_subscriber::fmt::layer().compact();

    match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::None | WriterConfig::File(_) => None,
    }
}

/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    // No color codes in files.
    let fmt_layer = tracing_subscriber::fmt::layer().compact().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, file_path) | WriterConfig::File(file_path) => {
            let file = try_create_log_file_appender(file_path.as_str())?;
            Some(Box::new(
                fmt_layer.with_writer(file).with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

/// Open `file_path` for appending, creating missing parent folders. A bare file name
/// lands in the current folder. The file is never rotated, since a line editing
/// session is short lived.
///
/// # Errors
///
/// Returns an error if the path has no file name, or if a folder or the file can't
/// be created.
pub fn try_create_log_file_appender(
    file_path: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = Path::new(file_path);

    let file_name = path
        .file_name()
        .ok_or_else(|| miette::miette!("Log file path {file_path:?} has no file name"))?;

    let folder = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(folder)
        .into_diagnostic()
        .wrap_err_with(|| format!("Can't create log folder {}", folder.display()))?;

    tracing_appender::rolling::RollingFileAppender::builder()
        .rotation(tracing_appender::rolling::Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(folder)
        .into_diagnostic()
        .wrap_err_with(|| format!("Can't open log file {file_path}"))
}
