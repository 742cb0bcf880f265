use serde_json::{json, Map, Value};

pub type CmdResult<T> = bloom::Result<(T, i32)>;

/// Options shared by every subcommand.
pub struct GlobalArgs {
    /// Node list spec (inline JSON, @file, or -); falls back to nodes.json.
    pub nodes: Option<String>,
}

impl GlobalArgs {
    pub fn load_nodes(&self) -> bloom::Result<Vec<bloom::Node>> {
        bloom::node::load(self.nodes.as_deref())
    }
}

// ============================================================================
// JSON Input Parsing (CLI layer)
// ============================================================================

/// Parse --key value pairs into a JSON object.
fn parse_kv_flags(extra: &[String]) -> bloom::Result<Value> {
    let mut obj = Map::new();
    let mut iter = extra.iter();

    while let Some(arg) = iter.next() {
        let Some(key) = arg.strip_prefix("--") else {
            return Err(bloom::Error::validation_invalid_argument(
                "payload",
                format!("Expected --key value pairs, got '{}'", arg),
                None,
                None,
            ));
        };

        // --key=value form
        if let Some((k, v)) = key.split_once('=') {
            obj.insert(k.to_string(), parse_value(v));
            continue;
        }

        let value = iter.next().ok_or_else(|| {
            bloom::Error::validation_invalid_argument(
                key,
                format!("Missing value for flag --{}", key),
                None,
                None,
            )
        })?;
        obj.insert(key.to_string(), parse_value(value));
    }

    Ok(Value::Object(obj))
}

/// Parse a string value into appropriate JSON type.
/// Order: JSON array/object → bool → string
///
/// Numbers stay strings: payload readers stringify scalars anyway, and
/// refs like `1.0` must not turn into `1`.
fn parse_value(s: &str) -> Value {
    let trimmed = s.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(v) = serde_json::from_str(s) {
            return v;
        }
    }
    match s {
        "true" => json!(true),
        "false" => json!(false),
        _ => json!(s),
    }
}

/// Merge JSON spec with --key value flags. Flags override spec values.
pub fn merge_json_sources(spec: Option<&str>, extra: &[String]) -> bloom::Result<Value> {
    let mut base = if let Some(spec) = spec {
        let raw = bloom::config::read_json_spec_to_string(spec)?;
        serde_json::from_str(&raw).map_err(|e| {
            bloom::Error::validation_invalid_json(e, Some("parse payload spec".to_string()))
        })?
    } else {
        Value::Object(Map::new())
    };

    if !extra.is_empty() {
        let flags = parse_kv_flags(extra)?;
        if let (Value::Object(base_obj), Value::Object(flags_obj)) = (&mut base, flags) {
            for (k, v) in flags_obj {
                base_obj.insert(k, v);
            }
        }
    }

    Ok(base)
}

pub mod agent;
pub mod config;
pub mod context;
pub mod filter;
pub mod node;
pub mod trigger;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (bloom::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Node(args) => dispatch!(args, global, node),
        crate::Commands::Filter(args) => dispatch!(args, global, filter),
        crate::Commands::Trigger(args) => dispatch!(args, global, trigger),
        crate::Commands::Agent(args) => dispatch!(args, global, agent),
        crate::Commands::Context(args) => dispatch!(args, global, context),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
