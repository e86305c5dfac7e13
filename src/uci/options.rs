use std::io::{self, Write};
use std::path::PathBuf;

use crate::board::MAX_SEARCH_DEPTH;
use crate::config::{EngineConfig, MAX_HASH_MB};

/// Side effect a `setoption` needs beyond updating [`UciOptions`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOptionAction {
    ReinitHash(usize),
    LoadEvalFile(PathBuf),
}

/// Options exposed through `setoption`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOptions {
    pub hash_mb: usize,
    pub depth: u32,
    pub eval_file: Option<PathBuf>,
}

impl UciOptions {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        UciOptions {
            hash_mb: config.hash_mb,
            depth: config.default_depth,
            eval_file: config.eval_file.clone(),
        }
    }

    /// Write the `uci` handshake reply.
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name magic_chess")?;
        writeln!(out, "id author magic_chess developers")?;
        writeln!(
            out,
            "option name Hash type spin default {} min 1 max {MAX_HASH_MB}",
            self.hash_mb
        )?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max {MAX_SEARCH_DEPTH}",
            self.depth
        )?;
        let eval_file = self
            .eval_file
            .as_ref()
            .map_or_else(|| "<empty>".to_string(), |p| p.display().to_string());
        writeln!(out, "option name EvalFile type string default {eval_file}")?;
        writeln!(out, "uciok")
    }

    /// Apply one option. Returns `Err` with the option name when it is not
    /// recognised.
    pub fn apply_setoption(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> Result<Option<UciOptionAction>, String> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "hash" => {
                let mb = value
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(self.hash_mb)
                    .clamp(1, MAX_HASH_MB);
                if mb != self.hash_mb {
                    self.hash_mb = mb;
                    return Ok(Some(UciOptionAction::ReinitHash(mb)));
                }
            }
            "depth" => {
                if let Some(v) = value.and_then(|v| v.parse::<u32>().ok()) {
                    self.depth = v.clamp(1, MAX_SEARCH_DEPTH);
                }
            }
            "evalfile" => {
                if let Some(path) = value.map(str::trim).filter(|v| !v.is_empty() && *v != "<empty>")
                {
                    let path = PathBuf::from(path);
                    self.eval_file = Some(path.clone());
                    return Ok(Some(UciOptionAction::LoadEvalFile(path)));
                }
            }
            _ => return Err(name.to_string()),
        }
        Ok(None)
    }
}

#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.is_empty() || parts[0] != "setoption" {
        return None;
    }

    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some((name, value))
}
