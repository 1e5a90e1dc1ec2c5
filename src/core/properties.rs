//! Ordered `KEY=value` properties file
//!
//! The store keeps every line of the file it was loaded from, so comments,
//! blank lines, and key order survive a rewrite. Untouched entries are written
//! back exactly as read; updated keys are rewritten in place and new keys are
//! appended at the end.
//!
//! Reading follows `java.util.Properties`: `=`, `:` or whitespace separate key
//! and value, a trailing odd backslash continues the entry on the next line,
//! and `\t`, `\n`, `\uXXXX` and friends are unescaped. Rewritten entries are
//! escaped the way `Properties.store` does it.

use crate::core::error::{KeeperResult, PersistenceError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
  /// Comment or blank line, kept verbatim
  Verbatim(String),
  /// Key/value entry; `raw` holds the original text until the value changes
  Entry {
    key: String,
    value: String,
    raw: Option<String>,
  },
}

/// Flat, ordered key -> string mapping backed by a text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesStore {
  path: PathBuf,
  lines: Vec<Line>,
}

impl PropertiesStore {
  /// Load a properties file from disk
  pub fn load(path: &Path) -> KeeperResult<Self> {
    let content = fs::read_to_string(path).map_err(|source| PersistenceError::Unreadable {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Self::parse(path, &content))
  }

  /// Parse properties text; `path` is remembered as the save target
  pub fn parse(path: &Path, content: &str) -> Self {
    let mut lines = Vec::new();
    let mut raw_lines = content.lines();

    while let Some(first) = raw_lines.next() {
      let trimmed = first.trim_start_matches(is_blank);
      if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
        lines.push(Line::Verbatim(first.to_string()));
        continue;
      }

      let mut raw = first.to_string();
      let mut logical = trimmed.to_string();
      while continues(&logical) {
        logical.pop();
        let Some(next) = raw_lines.next() else { break };
        raw.push('\n');
        raw.push_str(next);
        logical.push_str(next.trim_start_matches(is_blank));
      }

      let (key, value) = split_entry(&logical);
      lines.push(Line::Entry {
        key,
        value,
        raw: Some(raw),
      });
    }

    Self {
      path: path.to_path_buf(),
      lines,
    }
  }

  /// Path this store was loaded from
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Look up a value by key (last occurrence wins, as with java.util.Properties)
  pub fn get(&self, key: &str) -> Option<&str> {
    self.lines.iter().rev().find_map(|line| match line {
      Line::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
      _ => None,
    })
  }

  /// Set a value, updating the existing entry in place or appending a new one
  pub fn set(&mut self, key: &str, value: impl Into<String>) {
    let value = value.into();
    let existing = self
      .lines
      .iter()
      .rposition(|line| matches!(line, Line::Entry { key: k, .. } if k == key));

    match existing {
      Some(idx) => {
        self.lines[idx] = Line::Entry {
          key: key.to_string(),
          value,
          raw: None,
        }
      }
      None => self.lines.push(Line::Entry {
        key: key.to_string(),
        value,
        raw: None,
      }),
    }
  }

  /// Render the store back to text
  pub fn render(&self) -> String {
    let mut out = String::new();
    for line in &self.lines {
      match line {
        Line::Verbatim(text) | Line::Entry { raw: Some(text), .. } => out.push_str(text),
        Line::Entry { key, value, raw: None } => {
          escape_into(&mut out, key, true);
          out.push('=');
          escape_into(&mut out, value, false);
        }
      }
      out.push('\n');
    }
    out
  }

  /// Persist to the path the store was loaded from
  ///
  /// Writes a sibling temp file and renames it over the target, so a failed
  /// write leaves the previous contents intact.
  pub fn save(&self) -> KeeperResult<()> {
    self.save_to(&self.path)
  }

  /// Persist to an explicit path
  pub fn save_to(&self, path: &Path) -> KeeperResult<()> {
    let unwritable = |source| PersistenceError::Unwritable {
      path: path.to_path_buf(),
      source,
    };

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, self.render()).map_err(unwritable)?;
    if let Err(source) = fs::rename(&tmp_path, path) {
      let _ = fs::remove_file(&tmp_path);
      return Err(unwritable(source).into());
    }

    tracing::debug!(path = %path.display(), "saved properties");
    Ok(())
  }
}

/// Whitespace as `java.util.Properties` sees it
fn is_blank(c: char) -> bool {
  matches!(c, ' ' | '\t' | '\x0c')
}

/// An odd number of trailing backslashes continues the entry
fn continues(line: &str) -> bool {
  line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into unescaped key and value
fn split_entry(logical: &str) -> (String, String) {
  let mut key_end = logical.len();
  let mut escaped = false;
  for (idx, c) in logical.char_indices() {
    if escaped {
      escaped = false;
    } else if c == '\\' {
      escaped = true;
    } else if c == '=' || c == ':' || is_blank(c) {
      key_end = idx;
      break;
    }
  }

  let key = &logical[..key_end];
  let mut rest = logical[key_end..].trim_start_matches(is_blank);
  if let Some(after) = rest.strip_prefix(['=', ':']) {
    rest = after.trim_start_matches(is_blank);
  }

  (unescape(key), unescape(rest))
}

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
      Some('f') => out.push('\x0c'),
      Some('u') => {
        let hex: String = chars.clone().take(4).collect();
        match u32::from_str_radix(&hex, 16) {
          Ok(code) if hex.len() == 4 => {
            chars.nth(3);
            push_utf16_unit(&mut out, &mut chars, code);
          }
          _ => out.push('u'),
        }
      }
      Some(other) => out.push(other),
      None => {}
    }
  }
  out
}

/// Push one UTF-16 unit, pairing a high surrogate with a following `\uXXXX`
fn push_utf16_unit(out: &mut String, chars: &mut std::str::Chars<'_>, unit: u32) {
  if (0xD800..0xDC00).contains(&unit) {
    let tail: String = chars.clone().take(6).collect();
    if let Some(hex) = tail.strip_prefix("\\u")
      && hex.len() == 4
      && let Ok(low) = u32::from_str_radix(hex, 16)
      && (0xDC00..0xE000).contains(&low)
    {
      chars.nth(5);
      let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
      out.extend(char::from_u32(code));
      return;
    }
  }
  out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
}

/// Escape like `Properties.store`; values only escape a leading space
fn escape_into(out: &mut String, text: &str, is_key: bool) {
  for (idx, c) in text.chars().enumerate() {
    match c {
      ' ' if is_key || idx == 0 => out.push_str("\\ "),
      '\t' => out.push_str("\\t"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\x0c' => out.push_str("\\f"),
      '=' | ':' | '#' | '!' | '\\' => {
        out.push('\\');
        out.push(c);
      }
      c if (' '..='~').contains(&c) => out.push(c),
      c => {
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
          out.push_str(&format!("\\u{:04X}", unit));
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  const SAMPLE: &str = "# version info\nVERSION_NAME=6.4.0 Beta\n\nVERSION_BUILD=1234\nBUILD_TIME : 1700000000000\n";

  #[test]
  fn test_parse_and_get() {
    let store = PropertiesStore::parse(Path::new("version.properties"), SAMPLE);
    assert_eq!(store.get("VERSION_NAME"), Some("6.4.0 Beta"));
    assert_eq!(store.get("VERSION_BUILD"), Some("1234"));
    assert_eq!(store.get("BUILD_TIME"), Some("1700000000000"));
    assert_eq!(store.get("MISSING"), None);
  }

  #[test]
  fn test_set_preserves_order_and_comments() {
    let mut store = PropertiesStore::parse(Path::new("p"), SAMPLE);
    store.set("VERSION_BUILD", "1235");
    store.set("NEW_KEY", "x");

    let rendered = store.render();
    assert_eq!(
      rendered,
      "# version info\nVERSION_NAME=6.4.0 Beta\n\nVERSION_BUILD=1235\nBUILD_TIME : 1700000000000\nNEW_KEY=x\n"
    );
  }

  #[test]
  fn test_java_escapes_and_separators() {
    let content = "URL=https\\://example.com/a\\=b\nNAME value with spaces\nUNI=caf\\u00e9 \\uD83D\\uDE80\nTAB\\tKEY\\ 2:x\\ty\nMULTI=one, \\\n    two\nODD=ends\\\\\nPLAIN=ok\n";
    let store = PropertiesStore::parse(Path::new("p"), content);
    assert_eq!(store.get("URL"), Some("https://example.com/a=b"));
    assert_eq!(store.get("NAME"), Some("value with spaces"));
    assert_eq!(store.get("UNI"), Some("café 🚀"));
    assert_eq!(store.get("TAB\tKEY 2"), Some("x\ty"));
    assert_eq!(store.get("MULTI"), Some("one, two"));
    assert_eq!(store.get("ODD"), Some("ends\\"));
    assert_eq!(store.get("PLAIN"), Some("ok"));

    // Untouched entries, continuation included, are written back as read
    assert_eq!(store.render(), content);
  }

  #[test]
  fn test_rewritten_values_are_escaped() {
    let mut store = PropertiesStore::parse(Path::new("p"), "");
    store.set("URL", "a=b:c #1");
    store.set("LEAD", " x y");
    store.set("UNI", "café");
    store.set("MULTI", "one\ntwo");
    assert_eq!(
      store.render(),
      "URL=a\\=b\\:c \\#1\nLEAD=\\ x y\nUNI=caf\\u00E9\nMULTI=one\\ntwo\n"
    );

    let reparsed = PropertiesStore::parse(Path::new("p"), &store.render());
    assert_eq!(reparsed.get("URL"), Some("a=b:c #1"));
    assert_eq!(reparsed.get("LEAD"), Some(" x y"));
    assert_eq!(reparsed.get("UNI"), Some("café"));
    assert_eq!(reparsed.get("MULTI"), Some("one\ntwo"));
  }

  #[test]
  fn test_trailing_whitespace_in_value_is_kept() {
    let store = PropertiesStore::parse(Path::new("p"), "VERSION_NAME=6.4.0  Beta \n");
    assert_eq!(store.get("VERSION_NAME"), Some("6.4.0  Beta "));
  }

  #[test]
  fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("version.properties");
    fs::write(&path, SAMPLE).unwrap();

    let mut store = PropertiesStore::load(&path).unwrap();
    store.set("BUILD_TIME", "1800000000000");
    store.save().unwrap();

    let reloaded = PropertiesStore::load(&path).unwrap();
    assert_eq!(reloaded.get("BUILD_TIME"), Some("1800000000000"));
    assert_eq!(reloaded.get("VERSION_NAME"), Some("6.4.0 Beta"));
    assert!(!dir.path().join("version.properties.tmp").exists());
  }

  #[test]
  fn test_load_missing_file_is_persistence_error() {
    let dir = TempDir::new().unwrap();
    let err = PropertiesStore::load(&dir.path().join("nope.properties")).unwrap_err();
    assert!(matches!(err, crate::core::error::KeeperError::Persistence(_)));
    assert!(err.to_string().contains("nope.properties"));
  }

  #[test]
  fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let store = PropertiesStore::parse(&dir.path().join("gone").join("v.properties"), SAMPLE);
    let err = store.save().unwrap_err();
    assert!(matches!(
      err,
      crate::core::error::KeeperError::Persistence(PersistenceError::Unwritable { .. })
    ));
  }
}
