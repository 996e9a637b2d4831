//! Go import post-processing
//!
//! Rendered Go files carry a superset of imports (or none at all). This
//! pass drops the imports a file doesn't use, adds the standard library
//! packages it references, groups and sorts the import block, and
//! normalizes blank lines and trailing whitespace.

use regex::Regex;
use sacagawea_common::{GeneratorError, Result};
use std::collections::BTreeSet;

/// Standard library packages that may be added when referenced
const STANDARD_PACKAGES: &[&str] = &[
    "bytes",
    "context",
    "encoding/base64",
    "encoding/json",
    "errors",
    "fmt",
    "io",
    "io/ioutil",
    "log",
    "mime",
    "net/http",
    "net/url",
    "os",
    "sort",
    "strconv",
    "strings",
    "sync",
    "time",
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ImportSpec {
    path: String,
    name: Option<String>,
}

impl ImportSpec {
    fn standard(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
        }
    }

    /// Name the package is referenced by in the file
    fn local_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let last = self.path.rsplit('/').next().unwrap_or(&self.path);
        let last = match last.rsplit_once(".v") {
            Some((base, version)) if version.chars().all(|c| c.is_ascii_digit()) => base,
            _ => last,
        };
        last.trim_start_matches("go-").replace('-', "_")
    }

    fn is_standard(&self) -> bool {
        let first = self.path.split('/').next().unwrap_or_default();
        !first.contains('.')
    }

    fn render(&self) -> String {
        match &self.name {
            Some(name) => format!("{} \"{}\"", name, self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

/// Fix up the imports of a Go source file and normalize its layout
pub fn process(filename: &str, source: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(source)
        .map_err(|e| format_error(filename, format!("invalid UTF-8: {}", e)))?;
    let masked = mask(text).map_err(|message| format_error(filename, message))?;
    check_balance(&masked).map_err(|message| format_error(filename, message))?;

    let package = regex(r"(?m)^[ \t]*package[ \t]+[A-Za-z_][A-Za-z0-9_]*[ \t]*$")?;
    if package.find(&masked).is_none() {
        return Err(format_error(filename, "expected 'package' clause".to_string()));
    }

    let (text, masked, existing) = remove_imports(filename, text, &masked)?;
    let used = referenced_packages(&masked)?;

    let mut imports: BTreeSet<ImportSpec> = existing
        .into_iter()
        .filter(|spec| {
            matches!(spec.name.as_deref(), Some("_") | Some("."))
                || used.contains(&spec.local_name())
        })
        .collect();

    let covered: BTreeSet<String> = imports.iter().map(ImportSpec::local_name).collect();
    for path in STANDARD_PACKAGES {
        let spec = ImportSpec::standard(path);
        let name = spec.local_name();
        if used.contains(&name) && !covered.contains(&name) {
            imports.insert(spec);
        }
    }

    // Re-find the package clause; offsets moved when imports were removed
    let clause_end = package
        .find(&masked)
        .map(|m| m.end())
        .ok_or_else(|| format_error(filename, "expected 'package' clause".to_string()))?;

    let mut output = String::with_capacity(text.len() + 256);
    output.push_str(&text[..clause_end]);
    if !imports.is_empty() {
        output.push_str("\n\n");
        output.push_str(&import_block(&imports));
        output.push('\n');
    }
    output.push_str(&text[clause_end..]);

    Ok(normalize(&output).into_bytes())
}

fn format_error(filename: &str, message: String) -> GeneratorError {
    GeneratorError::Format {
        filename: filename.to_string(),
        message,
    }
}

fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| GeneratorError::Render(format!("Invalid pattern: {}", e)))
}

/// Blank out comments and literal contents so scanning only sees code.
/// Every byte keeps its offset; newlines are preserved.
fn mask(text: &str) -> std::result::Result<String, String> {
    enum State {
        Code,
        LineComment,
        BlockComment,
        Interpreted,
        Raw,
        Rune,
    }

    let blank = |c: char, out: &mut String| {
        if c == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
        }
    };

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '"' => {
                    out.push(c);
                    state = State::Interpreted;
                }
                '`' => {
                    out.push(c);
                    state = State::Raw;
                }
                '\'' => {
                    out.push(c);
                    state = State::Rune;
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
                blank(c, &mut out);
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    blank(c, &mut out);
                }
            }
            State::Interpreted | State::Rune => {
                let close = if matches!(state, State::Interpreted) { '"' } else { '\'' };
                if c == '\\' {
                    blank(c, &mut out);
                    if let Some(escaped) = chars.next() {
                        blank(escaped, &mut out);
                    }
                } else if c == close {
                    out.push(c);
                    state = State::Code;
                } else if c == '\n' {
                    return Err("newline in string literal".to_string());
                } else {
                    blank(c, &mut out);
                }
            }
            State::Raw => {
                if c == '`' {
                    out.push(c);
                    state = State::Code;
                } else {
                    blank(c, &mut out);
                }
            }
        }
    }

    match state {
        State::Code | State::LineComment => Ok(out),
        State::BlockComment => Err("comment not terminated".to_string()),
        _ => Err("string literal not terminated".to_string()),
    }
}

fn check_balance(masked: &str) -> std::result::Result<(), String> {
    let mut stack = Vec::new();
    for (line, text) in masked.lines().enumerate() {
        for c in text.chars() {
            match c {
                '{' | '(' | '[' => stack.push(c),
                '}' | ')' | ']' => {
                    let open = match c {
                        '}' => '{',
                        ')' => '(',
                        _ => '[',
                    };
                    if stack.pop() != Some(open) {
                        return Err(format!("{}: unexpected '{}'", line + 1, c));
                    }
                }
                _ => {}
            }
        }
    }
    match stack.last() {
        Some(open) => Err(format!("unclosed '{}'", open)),
        None => Ok(()),
    }
}

type Removed = (String, String, Vec<ImportSpec>);

/// Cut every import declaration out of the file, returning the remaining
/// text, its mask and the specs that were declared
fn remove_imports(filename: &str, text: &str, masked: &str) -> Result<Removed> {
    let decl = regex(r#"(?m)^[ \t]*import[ \t]*([("])"#)?;
    let spec = regex(r#"(?m)^[ \t]*(?:([A-Za-z_][A-Za-z0-9_]*|\.)[ \t]+)?"([^"]+)""#)?;

    let mut ranges = Vec::new();
    let mut specs = Vec::new();
    for m in decl.captures_iter(masked) {
        let (Some(whole), Some(open)) = (m.get(0), m.get(1)) else {
            continue;
        };
        let start = whole.start();
        let end = if open.as_str() == "(" {
            masked[open.end()..]
                .find(')')
                .map(|i| open.end() + i + 1)
                .ok_or_else(|| format_error(filename, "import block not closed".to_string()))?
        } else {
            masked[open.start()..]
                .find('\n')
                .map_or(masked.len(), |i| open.start() + i)
        };

        // Import specs sit on their own lines inside blocks
        let body = if open.as_str() == "(" {
            text[open.end()..end - 1].to_string()
        } else {
            format!("\n{}", &text[open.start()..end])
        };
        for line in body.lines() {
            if let Some(c) = spec.captures(line) {
                specs.push(ImportSpec {
                    name: c.get(1).map(|n| n.as_str().to_string()),
                    path: c[2].to_string(),
                });
            }
        }
        ranges.push(start..end);
    }

    let mut text = text.to_string();
    let mut masked = masked.to_string();
    for range in ranges.into_iter().rev() {
        text.replace_range(range.clone(), "");
        masked.replace_range(range, "");
    }

    Ok((text, masked, specs))
}

/// Identifiers used as package qualifiers (`name.Member`)
fn referenced_packages(masked: &str) -> Result<BTreeSet<String>> {
    let selector = regex(r"(?:^|[^.\w])([A-Za-z_][A-Za-z0-9_]*)\.[A-Za-z_]")?;
    Ok(selector
        .captures_iter(masked)
        .map(|c| c[1].to_string())
        .collect())
}

fn import_block(imports: &BTreeSet<ImportSpec>) -> String {
    if imports.len() == 1 {
        if let Some(spec) = imports.iter().next() {
            return format!("import {}", spec.render());
        }
    }

    let (standard, others): (Vec<&ImportSpec>, Vec<&ImportSpec>) =
        imports.iter().partition(|spec| spec.is_standard());

    let mut block = String::from("import (\n");
    for spec in &standard {
        block.push_str(&format!("\t{}\n", spec.render()));
    }
    if !standard.is_empty() && !others.is_empty() {
        block.push('\n');
    }
    for spec in &others {
        block.push_str(&format!("\t{}\n", spec.render()));
    }
    block.push(')');
    block
}

/// Strip trailing whitespace, collapse runs of blank lines and end with a
/// single newline
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.trim_start_matches('\n').lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}
