//! Basic helper usage example
//!
//! Demonstrates the standard options, redirected output and subprocess
//! execution.
//!
//! Run with: cargo run --example basic_usage -- --verbose --logfile /tmp/demo.log ls -l

use clap::{Arg, ArgAction};
use cmd_helper::bridge::{self, LogBridge};
use cmd_helper::prelude::*;
use cmd_helper::{debug, info, stdoutln};
use std::sync::Arc;

fn main() {
    let mut helper = CmdHelper::new(
        HelperConfig::new("basic_usage")
            .version(env!("CARGO_PKG_VERSION"))
            .description("Sample script")
            .has_dry_run(true)
            .log_separator("=".repeat(60)),
    );
    helper
        .arg(Arg::new("cmd").required(true).help("command"))
        .arg(
            Arg::new("args")
                .num_args(0..)
                .allow_hyphen_values(true)
                .help("command arguments"),
        )
        .arg(
            Arg::new("example")
                .short('x')
                .long("example")
                .action(ArgAction::Set)
                .help("sample option"),
        );

    let matches = match helper.parse() {
        Ok(matches) => matches,
        Err(e) => {
            handle_error(helper.logger(), &e, false, true);
            return;
        }
    };
    let logger = Arc::clone(helper.logger());
    let options = helper.options().clone();

    // Libraries using the `log` facade end up in the same sinks
    if let Err(e) = bridge::install(
        LogBridge::new(Arc::clone(&logger)).with_root_target("basic_usage"),
        log::LevelFilter::Debug,
    ) {
        handle_error(&logger, &e, options.debug, false);
    }

    debug!(logger, "start processing");
    stdoutln!(logger, "Normal output");
    info!(logger, "more details for verbose mode");
    if let Some(value) = matches.get_one::<String>("example") {
        log::info!("example option: {}", value);
    }

    let mut words: Vec<String> = matches
        .get_many::<String>("cmd")
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    words.extend(matches.get_many::<String>("args").into_iter().flatten().cloned());

    let run_options = RunOptions::new()
        .print_output(true)
        .dry_run(options.dry_run)
        .parse_for("(?i)error")
        .print_errors_if_parsed(true);
    match run(&logger, words, &run_options) {
        Ok(result) => debug!(logger, "command exited with status {}", result.status),
        Err(e) => handle_error(&logger, &e, options.debug, true),
    }

    if let Err(e) = helper.finish() {
        handle_error(&logger, &e, options.debug, true);
    }
}
