#![allow(clippy::uninlined_format_args)]

use proptest::prelude::*;
use sitka::writer::format_line;
use sitka::{Format, Level, LoggerConfig, MapEnvironment, Registry, Severity, Value, stringify};
use std::sync::{Arc, Mutex};

fn capturing_registry(env: MapEnvironment) -> (Registry, Arc<Mutex<Vec<String>>>) {
    let registry = Registry::with_environment(env);
    let lines = Arc::new(Mutex::new(Vec::new()));
    let out = lines.clone();
    registry.set_log_writer(move |line, args| {
        out.lock().unwrap().push(format_line(line, args));
        Ok(Value::Undefined)
    });
    let err = lines.clone();
    registry.set_error_writer(move |line, args| {
        err.lock().unwrap().push(format_line(line, args));
        Ok(Value::Undefined)
    });
    (registry, lines)
}

fn any_level() -> impl Strategy<Value = Level> {
    proptest::sample::select(Level::ALL_LEVELS.to_vec())
}

fn any_severity() -> impl Strategy<Value = Severity> {
    proptest::sample::select(Severity::ALL.to_vec())
}

// =============================================================================
// Level gating
// =============================================================================

proptest! {
    #[test]
    fn call_is_written_iff_level_admits_it(level in any_level(), severity in any_severity()) {
        let (registry, lines) = capturing_registry(MapEnvironment::new());
        let logger = registry.get_logger(LoggerConfig::new("gate").level(level));
        let written = logger.emit(severity, "m", &[]).unwrap().is_some();
        prop_assert_eq!(written, severity.level() <= level);
        prop_assert_eq!(lines.lock().unwrap().len(), usize::from(written));
    }

    #[test]
    fn line_count_is_monotonic_in_level(a in any_level(), b in any_level()) {
        let count = |level: Level| {
            let (registry, lines) = capturing_registry(MapEnvironment::new());
            let logger = registry.get_logger(LoggerConfig::new("count").level(level));
            for severity in Severity::ALL {
                logger.emit(severity, "m", &[]).unwrap();
            }
            let n = lines.lock().unwrap().len();
            n
        };
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(count(low) <= count(high));
    }
}

// =============================================================================
// Placeholder substitution
// =============================================================================

proptest! {
    #[test]
    fn escaped_references_render_literally(
        name in "[A-Za-z_][A-Za-z0-9_]{0,11}",
        value in "[a-z0-9]{1,10}",
        sigil in prop_oneof![Just('$'), Just('%')],
    ) {
        let env: MapEnvironment = [(name.clone(), value)].into_iter().collect();
        let (registry, lines) = capturing_registry(env);
        let logger = registry.get_logger(LoggerConfig::new("esc").format("${MESSAGE}"));
        logger.info(format!("\\{sigil}{{ENV:{name}}}"), &[]).unwrap();
        prop_assert_eq!(
            lines.lock().unwrap()[0].clone(),
            format!("{sigil}{{ENV:{name}}}\n")
        );
    }

    #[test]
    fn env_references_resolve(
        name in "[A-Za-z_][A-Za-z0-9_]{0,11}",
        value in "[a-z0-9 ]{0,10}",
    ) {
        let env: MapEnvironment = [(name.clone(), value.clone())].into_iter().collect();
        let (registry, lines) = capturing_registry(env);
        let logger = registry.get_logger(LoggerConfig::new("env").format("${MESSAGE}"));
        logger.info(format!("<${{ENV:{name}}}>"), &[]).unwrap();
        prop_assert_eq!(lines.lock().unwrap()[0].clone(), format!("<{value}>\n"));
    }

    #[test]
    fn missing_context_paths_render_empty(path in "[a-z]{1,6}(\\.[a-z]{1,6}){0,3}") {
        let (registry, lines) = capturing_registry(MapEnvironment::new());
        let logger = registry.get_logger(LoggerConfig::new("ctx").format("[${CTX:missing.root}${MESSAGE}]"));
        logger.info(format!("%{{CTX:zz{path}}}"), &[]).unwrap();
        prop_assert_eq!(lines.lock().unwrap()[0].clone(), "[]\n");
    }

    #[test]
    fn plain_text_passes_through(message in "[^$%\\\\]{0,60}") {
        let (registry, lines) = capturing_registry(MapEnvironment::new());
        let logger = registry.get_logger(LoggerConfig::new("plain").format("${MESSAGE}"));
        logger.info(message.as_str(), &[]).unwrap();
        prop_assert_eq!(lines.lock().unwrap()[0].clone(), format!("{message}\n"));
    }

    #[test]
    fn json_preset_always_parses(message in "[a-zA-Z0-9 .,!?\"\n\r]{0,40}") {
        let (registry, lines) = capturing_registry(MapEnvironment::new());
        let logger = registry.get_logger(LoggerConfig::new("json").format(Format::Json));
        logger.warn(message.as_str(), &[]).unwrap();
        let line = lines.lock().unwrap()[0].clone();
        let record: serde_json::Value = serde_json::from_str(&line).unwrap();
        prop_assert_eq!(record["message"].as_str(), Some(message.as_str()));
        prop_assert_eq!(record["level"].as_str(), Some("WARN"));
    }
}

// =============================================================================
// Stringification
// =============================================================================

proptest! {
    #[test]
    fn integer_arrays_stringify_with_padding(items in prop::collection::vec(any::<i32>(), 1..8)) {
        let joined = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        prop_assert_eq!(stringify(&Value::from(items)), format!("[ {} ]", joined));
    }

    #[test]
    fn strings_stringify_verbatim(text in ".*") {
        prop_assert_eq!(stringify(&Value::from(text.as_str())), text);
    }
}
