//! C6: Library Graph Builder — parses `build.ninja` link rules into a
//! library→library / executable→library graph.

use crate::models::library_graph::{LibraryGraph, LibraryNode, TargetKind};

/// Rule names recognized as producing a linked artifact, configurable by the
/// caller in principle but fixed to the common CMake/Ninja defaults here.
const STATIC_LIB_RULES: &[&str] = &["STATIC_LIBRARY_LINKER", "AR", "CXX_STATIC_LIBRARY_LINKER"];
const SHARED_LIB_RULES: &[&str] = &["SHARED_LIBRARY_LINKER", "CXX_SHARED_LIBRARY_LINKER"];
const EXECUTABLE_RULES: &[&str] = &["EXECUTABLE_LINKER", "CXX_EXECUTABLE_LINKER", "LINK_EXE"];

/// One parsed `build <outputs>: <rule> <inputs> | <implicit> || <order_only>` statement.
struct BuildStatement {
    outputs: Vec<String>,
    rule: String,
    order_only: Vec<String>,
}

fn parse_build_statements(ninja_text: &str) -> Vec<BuildStatement> {
    let mut statements = Vec::new();
    let mut pending = String::new();

    for raw_line in ninja_text.lines() {
        let line = raw_line.trim_end();
        if let Some(rest) = line.strip_suffix('$') {
            pending.push_str(rest);
            pending.push(' ');
            continue;
        }
        pending.push_str(line);
        let logical = std::mem::take(&mut pending);
        let trimmed = logical.trim_start();
        if let Some(rest) = trimmed.strip_prefix("build ") {
            if let Some(stmt) = parse_one_statement(rest) {
                statements.push(stmt);
            }
        }
    }
    statements
}

fn parse_one_statement(rest: &str) -> Option<BuildStatement> {
    let colon = rest.find(':')?;
    let outputs_part = &rest[..colon];
    let after_colon = rest[colon + 1..].trim_start();

    let outputs: Vec<String> = outputs_part
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();

    let mut tokens = after_colon.split_whitespace();
    let rule = tokens.next()?.to_string();
    let remainder: Vec<&str> = tokens.collect();

    // order-only deps follow `||`; implicit deps follow `|` (not needed here).
    let order_only = if let Some(pos) = remainder.iter().position(|t| *t == "||") {
        remainder[pos + 1..]
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        Vec::new()
    };

    Some(BuildStatement {
        outputs,
        rule,
        order_only,
    })
}

/// Strips common prefix/suffix decorations to recover a library's logical
/// name from its output filename.
fn logical_library_name(output_path: &str) -> String {
    let file_name = output_path.rsplit('/').next().unwrap_or(output_path);
    let stripped = file_name.strip_prefix("lib").unwrap_or(file_name);
    for suffix in [".a", ".so", ".dylib", ".dll", ".lib"] {
        if let Some(base) = stripped.strip_suffix(suffix) {
            return base.to_string();
        }
    }
    stripped.to_string()
}

fn classify_rule(rule: &str) -> Option<TargetKind> {
    if STATIC_LIB_RULES.contains(&rule) {
        Some(TargetKind::StaticLibrary)
    } else if SHARED_LIB_RULES.contains(&rule) {
        Some(TargetKind::SharedLibrary)
    } else if EXECUTABLE_RULES.contains(&rule) {
        Some(TargetKind::Executable)
    } else {
        None
    }
}

/// Parses textual `build.ninja` content into a `LibraryGraph`.
pub fn build_library_graph(ninja_text: &str) -> LibraryGraph {
    let statements = parse_build_statements(ninja_text);
    let mut graph = LibraryGraph::new();

    // First pass: register every linked target so edges can resolve by
    // logical name regardless of statement order.
    let mut output_to_name = std::collections::HashMap::new();
    for stmt in &statements {
        let Some(kind) = classify_rule(&stmt.rule) else {
            continue;
        };
        for output in &stmt.outputs {
            let name = logical_library_name(output);
            output_to_name.insert(output.clone(), name.clone());
            graph.add_node(LibraryNode {
                name,
                kind,
                output_path: output.clone(),
            });
        }
    }

    for stmt in &statements {
        if classify_rule(&stmt.rule).is_none() {
            continue;
        }
        for output in &stmt.outputs {
            let Some(from_name) = output_to_name.get(output) else {
                continue;
            };
            for dep in &stmt.order_only {
                if let Some(to_name) = output_to_name.get(dep) {
                    if to_name != from_name {
                        graph.add_edge(from_name, to_name);
                    }
                }
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_lib_and_executable_with_order_only_dep() {
        let ninja = "build libfoo.a: STATIC_LIBRARY_LINKER foo.o\n\
                     build app: EXECUTABLE_LINKER main.o || libfoo.a\n";
        let graph = build_library_graph(ninja);
        assert!(graph.nodes.contains_key("foo"));
        assert!(graph.nodes.contains_key("app"));
        assert_eq!(graph.fan_out("app"), 1);
        assert_eq!(graph.fan_in("foo"), 1);
    }

    #[test]
    fn strips_lib_prefix_and_extension() {
        assert_eq!(logical_library_name("libutil.so"), "util");
        assert_eq!(logical_library_name("out/libcore.a"), "core");
        assert_eq!(logical_library_name("tool.exe"), "tool.exe");
    }

    #[test]
    fn handles_line_continuation() {
        let ninja = "build libfoo.a: STATIC_LIBRARY_LINKER $\n  foo.o bar.o\n";
        let graph = build_library_graph(ninja);
        assert!(graph.nodes.contains_key("foo"));
    }
}
