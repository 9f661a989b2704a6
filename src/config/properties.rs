//! Java-style `.properties` configuration format.

use log::debug;
use rustc_hash::FxHashMap;

use crate::config::{ConnectionSettings, DatasetSettings, PipelineConfig, PipelineOptions};
use crate::error::{PipelineError, Result};

pub const MODULES_KEY: &str = "modules";
pub const DB_URL_KEY: &str = "dbUrl";
pub const DB_USER_KEY: &str = "dbUser";
pub const DB_PASSWORD_KEY: &str = "dbPassword";
pub const DB_DRIVER_KEY: &str = "dbDriver";

/// Parse properties text into key/value pairs
///
/// Follows the Java `.properties` rules: `#`/`!` comment lines, a key ended
/// by the first unescaped `=`, `:` or whitespace, and a line ending in an odd
/// number of backslashes continuing onto the next line. Keys and values are
/// unescaped (`\t`, `\n`, `\r`, `\f`, `\uXXXX`, and `\` before any other
/// character yields that character). Later occurrences of a key replace
/// earlier ones.
#[must_use]
pub fn parse_properties(text: &str) -> FxHashMap<String, String> {
    let mut properties = FxHashMap::default();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let mut logical = line.trim_start().to_string();
        if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
            continue;
        }

        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        if !key.is_empty() {
            properties.insert(key, value);
        }
    }

    properties
}

fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                break;
            }
            c if c.is_whitespace() => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).map_or(rest, str::trim_start);
    (unescape(&line[..key_end]), unescape(value))
}

/// Malformed `\u` escapes are kept as written
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let decoded = (hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    None => out.push_str("\\u"),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

impl PipelineConfig {
    /// Build a configuration from properties text
    ///
    /// `modules` is required. Per-dataset keys are `<id>.fetchSql`,
    /// `<id>.updateSql` and `<id>.dtoClass` (or `<id>.shape`).
    pub fn from_properties(text: &str) -> Result<Self> {
        let properties = parse_properties(text);
        let lookup = |key: &str| {
            properties
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let modules: Vec<String> = lookup(MODULES_KEY)
            .ok_or_else(|| PipelineError::Config(format!("Missing required key '{MODULES_KEY}'")))?
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        let connection = ConnectionSettings {
            driver: lookup(DB_DRIVER_KEY).unwrap_or_default(),
            url: lookup(DB_URL_KEY).unwrap_or_default(),
            user: lookup(DB_USER_KEY),
            password: lookup(DB_PASSWORD_KEY),
        };

        let mut datasets = FxHashMap::default();
        for id in &modules {
            let settings = DatasetSettings {
                fetch_sql: lookup(&format!("{id}.fetchSql")),
                update_sql: lookup(&format!("{id}.updateSql")),
                shape: lookup(&format!("{id}.dtoClass")).or_else(|| lookup(&format!("{id}.shape"))),
            };
            datasets.insert(id.clone(), settings);
        }

        let mut options = PipelineOptions::default();
        if let Some(policy) = lookup("rowFailurePolicy") {
            options.row_failure_policy = policy.parse()?;
        }
        if let Some(flag) = lookup("logJson") {
            options.log_json = parse_flag("logJson", &flag)?;
        }
        if let Some(flag) = lookup("dryRun") {
            options.dry_run = parse_flag("dryRun", &flag)?;
        }

        debug!("Loaded {} dataset(s) from properties", modules.len());

        Ok(Self {
            modules,
            connection,
            datasets,
            options,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(PipelineError::Config(format!(
            "Invalid boolean '{other}' for key '{key}'"
        ))),
    }
}
