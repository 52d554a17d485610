//! C2: Scan Ingestor — parses Makefile-style dependency output from an
//! external include scanner into `TranslationUnit -> set of included files`
//! pairs.
//!
//! Grounded on the narrow dependency-rule grammar used across Makefile
//! tooling: one logical rule per line, continuation via a trailing
//! backslash, `#` comments stripped, `target: dep1 dep2 ...` otherwise.

use crate::config::Config;
use crate::error::{DsmError, Result};
use crate::models::metrics::Diagnostics;
use crate::models::path::CanonicalPath;
use crate::models::tu::{CompileDbEntry, TranslationUnit};
use crate::services::path_normalizer::PathNormalizer;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

/// One parsed scanner rule: `target: dep1 dep2 ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerRule {
    pub target: String,
    pub deps: Vec<String>,
}

/// Joins backslash-continued lines and strips `#` comments, yielding one
/// logical line per scanner rule. Comments are only recognized outside of
/// continuation (a `#` inside a continued line is still a comment marker,
/// matching `make`'s own behavior).
fn join_logical_lines(text: &str) -> Vec<String> {
    let mut logical = Vec::new();
    let mut current = String::new();
    for raw_line in text.lines() {
        let line = strip_comment(raw_line);
        let trimmed_end = line.trim_end();
        if let Some(before_backslash) = trimmed_end.strip_suffix('\\') {
            current.push_str(before_backslash.trim_end());
            current.push(' ');
        } else {
            current.push_str(trimmed_end);
            if !current.trim().is_empty() {
                logical.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if !current.trim().is_empty() {
        logical.push(current);
    }
    logical
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_rule(logical_line: &str, line_no: usize) -> Result<ScannerRule> {
    let colon = logical_line.find(':').ok_or_else(|| DsmError::ParseError {
        line: line_no,
        detail: format!("missing ':' in rule: {logical_line:?}"),
    })?;
    let target = logical_line[..colon].trim();
    if target.is_empty() {
        return Err(DsmError::ParseError {
            line: line_no,
            detail: "empty target".to_string(),
        });
    }
    let deps = logical_line[colon + 1..]
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();
    Ok(ScannerRule {
        target: target.to_string(),
        deps,
    })
}

/// Parses the raw text of a scanner output file into rules, collecting
/// per-rule parse errors into `parse_errors` rather than aborting.
pub fn parse_scanner_output(text: &str, diagnostics: &mut Diagnostics) -> Vec<ScannerRule> {
    let mut rules = Vec::new();
    for (line_no, logical) in join_logical_lines(text).into_iter().enumerate() {
        match parse_rule(&logical, line_no + 1) {
            Ok(rule) => rules.push(rule),
            Err(_) => diagnostics.parse_errors += 1,
        }
    }
    rules
}

/// Derives one `TranslationUnit` per compile database entry: canonicalizes
/// its source path and extracts its include-search roots from the raw
/// command line. Entries whose source fails canonicalization are dropped
/// silently — a compile database entry outside the filter set is not a TU
/// the rest of the pipeline needs to know about.
pub fn translation_units_from_compile_db(
    compile_db: &[CompileDbEntry],
    normalizer: &PathNormalizer<'_>,
) -> Vec<TranslationUnit> {
    compile_db
        .iter()
        .filter_map(|entry| {
            let (source, _) = normalizer.classify(&entry.source).ok().flatten()?;
            Some(TranslationUnit::new(
                source,
                entry.include_roots(),
                entry.arguments.clone(),
            ))
        })
        .collect()
}

/// Normalizes one rule's target/deps into canonical paths, applying the
/// filter configuration. A rule's first prerequisite is always dropped from
/// the inclusion set: `-M`-style depfile output lists the TU's own primary
/// source there before any header, and it is not itself something the TU
/// includes. `known_sources`, when a compile database was available, are TU
/// source paths that get the same treatment wherever else they appear in the
/// list — covering scanners that report a TU's source more than once or out
/// of position. Independent per-rule: safe to run in parallel.
pub fn normalize_rule(
    rule: &ScannerRule,
    normalizer: &PathNormalizer<'_>,
    known_sources: &FxHashSet<CanonicalPath>,
) -> Option<(CanonicalPath, FxHashSet<CanonicalPath>)> {
    let (target, _) = normalizer.classify(&rule.target).ok().flatten()?;
    let mut deps = FxHashSet::default();
    for (i, dep) in rule.deps.iter().enumerate() {
        let Ok(Some((path, _))) = normalizer.classify(dep) else {
            continue;
        };
        if i == 0 || known_sources.contains(&path) {
            continue;
        }
        deps.insert(path);
    }
    Some((target, deps))
}

/// Ingests a set of raw scanner rules for the whole project in parallel,
/// producing normalized `(tu, deps)` pairs. Rules whose target fails
/// canonicalization are dropped and counted.
pub fn ingest_rules_parallel(
    rules: &[ScannerRule],
    config: &Config,
    project_root: &str,
    known_sources: &FxHashSet<CanonicalPath>,
) -> Result<(Vec<(CanonicalPath, FxHashSet<CanonicalPath>)>, Diagnostics)> {
    let normalizer = PathNormalizer::new(config, project_root)?;
    let results: Vec<Option<(CanonicalPath, FxHashSet<CanonicalPath>)>> = rules
        .par_iter()
        .map(|rule| normalize_rule(rule, &normalizer, known_sources))
        .collect();

    let mut diagnostics = Diagnostics::default();
    let mut out = Vec::with_capacity(results.len());
    for (rule, result) in rules.iter().zip(results) {
        match result {
            Some(pair) => out.push(pair),
            None => {
                diagnostics.path_errors += 1;
                tracing::debug!(target = %rule.target, "dropped scanner rule: path error");
            }
        }
    }
    Ok((out, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_backslash_continuations() {
        let text = "a.o: a.cpp \\\n  a.h \\\n  b.h\nc.o: c.cpp\n";
        let lines = join_logical_lines(text);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec!["a.o:", "a.cpp", "a.h", "b.h"]
        );
    }

    #[test]
    fn strips_comments() {
        let text = "a.o: a.cpp # this is a comment\n";
        let lines = join_logical_lines(text);
        assert_eq!(lines[0].trim(), "a.o: a.cpp");
    }

    #[test]
    fn parses_simple_rule() {
        let mut diag = Diagnostics::default();
        let rules = parse_scanner_output("a.o: a.cpp a.h b.h\n", &mut diag);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].target, "a.o");
        assert_eq!(rules[0].deps, vec!["a.cpp", "a.h", "b.h"]);
        assert_eq!(diag.parse_errors, 0);
    }

    #[test]
    fn counts_malformed_rules() {
        let mut diag = Diagnostics::default();
        let rules = parse_scanner_output("not a rule at all\nb.o: b.cpp\n", &mut diag);
        assert_eq!(rules.len(), 1);
        assert_eq!(diag.parse_errors, 1);
    }

    #[test]
    fn normalize_rule_excludes_own_primary_source() {
        let config = Config::default();
        let normalizer = PathNormalizer::new(&config, "/proj").unwrap();
        let rule = ScannerRule {
            target: "a.o".to_string(),
            deps: vec!["a.cpp".to_string(), "a.h".to_string(), "b.h".to_string()],
        };
        let (_, deps) = normalize_rule(&rule, &normalizer, &FxHashSet::default()).unwrap();
        assert_eq!(deps.len(), 2);
        assert!(!deps.contains(&CanonicalPath::new("a.cpp")));
    }

    #[test]
    fn normalize_rule_excludes_known_compile_db_sources() {
        let config = Config::default();
        let normalizer = PathNormalizer::new(&config, "/proj").unwrap();
        let rule = ScannerRule {
            target: "a.o".to_string(),
            deps: vec![
                "a.cpp".to_string(),
                "a.h".to_string(),
                "shared_gen.cpp".to_string(),
            ],
        };
        let mut known_sources = FxHashSet::default();
        known_sources.insert(CanonicalPath::new("shared_gen.cpp"));
        let (_, deps) = normalize_rule(&rule, &normalizer, &known_sources).unwrap();
        assert_eq!(deps.len(), 1);
        assert!(deps.contains(&CanonicalPath::new("a.h")));
    }

    #[test]
    fn translation_units_derive_include_roots_from_compile_db() {
        let config = Config::default();
        let normalizer = PathNormalizer::new(&config, "/proj").unwrap();
        let entry = CompileDbEntry {
            source: "a.cpp".to_string(),
            directory: "/proj".to_string(),
            arguments: vec![
                "-Iinclude".to_string(),
                "-isystem".to_string(),
                "/usr/include".to_string(),
            ],
        };
        let tus = translation_units_from_compile_db(&[entry], &normalizer);
        assert_eq!(tus.len(), 1);
        assert_eq!(tus[0].source.as_str(), "a.cpp");
        assert_eq!(tus[0].include_roots, vec!["include", "/usr/include"]);
    }
}
