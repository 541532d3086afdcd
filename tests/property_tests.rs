//! Property-based tests for cmd_helper using proptest

use cmd_helper::prelude::*;
use proptest::prelude::*;

fn named_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::NAMED.to_vec())
}

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![named_level(), (0u16..=60).prop_map(LogLevel::from_number)]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// A sink accepts a record exactly when its level reaches the threshold
    #[test]
    fn test_threshold_monotonicity(threshold in any_level(), level in any_level()) {
        let config = SinkConfig::new(threshold);
        prop_assert_eq!(config.accepts(level), level.as_number() >= threshold.as_number());
    }

    /// Raising a level never makes a sink reject it
    #[test]
    fn test_threshold_is_upward_closed(threshold in any_level(), a in any_level(), b in any_level()) {
        let config = SinkConfig::new(threshold);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if config.accepts(low) {
            prop_assert!(config.accepts(high));
        }
    }

    /// Level names and numbers resolve back to the same level
    #[test]
    fn test_level_resolve_roundtrip(level in named_level()) {
        prop_assert_eq!(LogLevel::resolve(&level.name()).unwrap(), level);
        prop_assert_eq!(LogLevel::resolve(&level.name().to_lowercase()).unwrap(), level);
        prop_assert_eq!(LogLevel::resolve(&level.as_number().to_string()).unwrap(), level);
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// Formatting depends only on the record and the continuation state
    #[test]
    fn test_file_formatting_is_repeatable(
        level in named_level(),
        message in "[a-z \\n]{0,40}",
        at_line_start in any::<bool>(),
    ) {
        let timestamp = TimestampFormat::parse("[%H:%M] ").unwrap();
        let record = LogRecord::new(level, message);

        let mut first = FileFormatter::with_timestamp(timestamp.clone());
        let mut second = FileFormatter::with_timestamp(timestamp);
        if !at_line_start {
            first.format(&LogRecord::stdout("partial"));
            second.format(&LogRecord::stdout("partial"));
        }
        prop_assert_eq!(first.at_line_start(), second.at_line_start());
        prop_assert_eq!(first.format(&record), second.format(&record));
        prop_assert_eq!(first.at_line_start(), second.at_line_start());
    }

    /// Without timestamps, the chunks of redirected output concatenate to the input
    #[test]
    fn test_plain_chunks_concatenate(chunks in prop::collection::vec("[a-z\\n ]{0,12}", 0..10)) {
        let mut formatter = FileFormatter::new();
        let rendered: String = chunks
            .iter()
            .map(|chunk| formatter.format(&LogRecord::stdout(chunk.as_str())))
            .collect();
        prop_assert_eq!(rendered, chunks.concat());
    }

    /// With timestamps, every output line starts with the stamp or its indentation
    #[test]
    fn test_stamped_lines_are_aligned(chunks in prop::collection::vec("[a-z\\n]{1,12}", 1..10)) {
        let mut formatter = FileFormatter::with_timestamp(TimestampFormat::parse("[TS] ").unwrap());
        let rendered: String = chunks
            .iter()
            .map(|chunk| formatter.format(&LogRecord::stdout(chunk.as_str())))
            .collect();

        let stripped: String = rendered
            .split('\n')
            .map(|line| {
                line.strip_prefix("[TS] ")
                    .or_else(|| line.strip_prefix("     "))
                    .unwrap_or(line)
            })
            .collect::<Vec<_>>()
            .join("\n");
        prop_assert_eq!(stripped, chunks.concat());

        for line in rendered.split('\n').filter(|line| !line.is_empty()) {
            prop_assert!(line.starts_with("[TS] ") || line.starts_with("     "));
        }
    }

    /// Console output of a named source always carries the level and source columns
    #[test]
    fn test_console_named_source_columns(level in named_level(), source in "[a-z]{1,20}", message in "[a-z ]{0,20}") {
        let record = LogRecord::new(level, message.clone()).with_source(source.clone());
        let line = ConsoleFormatter::new().render(&record);
        let name = level.name();

        let mut columns = line.split_whitespace();
        prop_assert_eq!(columns.next(), Some(name.as_ref()));
        prop_assert_eq!(columns.next(), Some(source.as_str()));
        prop_assert_eq!(line.find(&source), Some(name.len().max(7) + 1));
        prop_assert!(line.ends_with(&message));
    }
}

// ============================================================================
// Command line Tests
// ============================================================================

proptest! {
    /// Words without special characters are joined unchanged
    #[test]
    fn test_cmd_line_plain_words(words in prop::collection::vec("[a-zA-Z0-9_./-]{1,10}", 1..6)) {
        prop_assert_eq!(cmd_line(&words, false), words.join(" "));
    }
}
