//! The formula analyzer: validate, dependency extraction, and
//! entity-scoped cycle analysis (spec §4.2). All operations here are pure
//! functions of their inputs.

use std::collections::{HashMap, HashSet};

use crate::ast::{BinaryOp, Expr};
use crate::functions;
use crate::parser::parse;
use crate::value::InferredType;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub inferred_type: InferredType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    pub field_id: String,
    pub known: bool,
    pub field_type: Option<InferredType>,
}

/// Parses, resolves field references against `known_fields`, and type
/// checks the expression, producing the combined diagnostic result.
pub fn validate(text: &str, known_fields: &HashMap<String, InferredType>) -> AnalysisResult {
    let expr = match parse(text) {
        Ok(expr) => expr,
        Err(errs) => {
            return AnalysisResult {
                errors: errs.iter().map(|e| e.with_location(text)).collect(),
                warnings: Vec::new(),
                inferred_type: InferredType::Unknown,
            }
        }
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let inferred_type = infer(&expr, known_fields, &mut errors, &mut warnings);

    AnalysisResult {
        errors,
        warnings,
        inferred_type,
    }
}

fn infer(
    expr: &Expr,
    known_fields: &HashMap<String, InferredType>,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> InferredType {
    match expr {
        Expr::Number(_) => InferredType::Number,
        Expr::Text(_) => InferredType::Text,
        Expr::Boolean(_) => InferredType::Boolean,
        Expr::FieldRef { name, .. } => match known_fields.get(name) {
            Some(ty) => *ty,
            None => {
                errors.push(format!("unknown field '{name}'"));
                InferredType::Unknown
            }
        },
        Expr::Not(inner) => {
            let ty = infer(inner, known_fields, errors, warnings);
            if ty != InferredType::Boolean && ty != InferredType::Unknown {
                errors.push(format!("'not' requires BOOLEAN, found {ty}"));
            }
            InferredType::Boolean
        }
        Expr::Negate(inner) => {
            let ty = infer(inner, known_fields, errors, warnings);
            if ty != InferredType::Number && ty != InferredType::Unknown {
                errors.push(format!("unary '-' requires NUMBER, found {ty}"));
            }
            InferredType::Number
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            let lty = infer(lhs, known_fields, errors, warnings);
            let rty = infer(rhs, known_fields, errors, warnings);
            if matches!(op, BinaryOp::Div) && matches!(rhs.as_ref(), Expr::Number(n) if *n == 0.0) {
                warnings.push("division by a literal zero".to_string());
            }
            infer_binary(*op, lty, rty, errors)
        }
        Expr::Call { name, args, .. } => {
            let arg_types: Vec<InferredType> = args
                .iter()
                .map(|a| infer(a, known_fields, errors, warnings))
                .collect();
            match functions::lookup(name) {
                None => {
                    errors.push(format!("unknown function '{name}'"));
                    InferredType::Unknown
                }
                Some(sig) => {
                    if arg_types.len() < sig.min_args
                        || sig.max_args.is_some_and(|max| arg_types.len() > max)
                    {
                        errors.push(format!(
                            "function '{name}' called with {} arguments",
                            arg_types.len()
                        ));
                    } else if let Some(expected) = sig.arg_type {
                        for ty in &arg_types {
                            if *ty != expected && *ty != InferredType::Unknown {
                                errors.push(format!(
                                    "function '{name}' expects {expected} arguments, found {ty}"
                                ));
                            }
                        }
                    }
                    sig.return_type
                }
            }
        }
    }
}

fn infer_binary(
    op: BinaryOp,
    lty: InferredType,
    rty: InferredType,
    errors: &mut Vec<String>,
) -> InferredType {
    use BinaryOp::*;
    let unknown_ok = |t: InferredType| t == InferredType::Unknown;
    match op {
        Add | Sub | Mul | Div => {
            if !unknown_ok(lty) && lty != InferredType::Number {
                errors.push(format!("arithmetic requires NUMBER, found {lty}"));
            }
            if !unknown_ok(rty) && rty != InferredType::Number {
                errors.push(format!("arithmetic requires NUMBER, found {rty}"));
            }
            InferredType::Number
        }
        And | Or => {
            if !unknown_ok(lty) && lty != InferredType::Boolean {
                errors.push(format!("logical operator requires BOOLEAN, found {lty}"));
            }
            if !unknown_ok(rty) && rty != InferredType::Boolean {
                errors.push(format!("logical operator requires BOOLEAN, found {rty}"));
            }
            InferredType::Boolean
        }
        Eq | NotEq => InferredType::Boolean,
        Lt | LtEq | Gt | GtEq => {
            if !unknown_ok(lty) && !unknown_ok(rty) && lty != rty {
                errors.push(format!("cannot compare {lty} with {rty}"));
            }
            InferredType::Boolean
        }
    }
}

/// Extracts the referenced field ids in deterministic first-occurrence
/// order, tagging each `known`/`unknown` against `known_fields`.
pub fn dependencies(text: &str, known_fields: &HashMap<String, InferredType>) -> Vec<Dependency> {
    let Ok(expr) = parse(text) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut deps = Vec::new();
    collect_deps(&expr, known_fields, &mut seen, &mut deps);
    deps
}

fn collect_deps(
    expr: &Expr,
    known_fields: &HashMap<String, InferredType>,
    seen: &mut HashSet<String>,
    out: &mut Vec<Dependency>,
) {
    match expr {
        Expr::FieldRef { name, .. } => {
            if seen.insert(name.clone()) {
                out.push(Dependency {
                    field_id: name.clone(),
                    known: known_fields.contains_key(name),
                    field_type: known_fields.get(name).copied(),
                });
            }
        }
        Expr::Not(inner) | Expr::Negate(inner) => collect_deps(inner, known_fields, seen, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_deps(lhs, known_fields, seen, out);
            collect_deps(rhs, known_fields, seen, out);
        }
        Expr::Call { args, .. } => {
            for a in args {
                collect_deps(a, known_fields, seen, out);
            }
        }
        Expr::Number(_) | Expr::Text(_) | Expr::Boolean(_) => {}
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub field_ids: Vec<String>,
    pub is_self_reference: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleAnalysis {
    pub cycles: Vec<Cycle>,
    pub all_cycle_field_ids: HashSet<String>,
}

impl CycleAnalysis {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

/// Tarjan's SCC algorithm over `field_id -> referenced_field_ids`,
/// reporting components of size > 1 and self-loops (spec §4.2).
pub fn analyze_cycles(graph: &HashMap<String, HashSet<String>>) -> CycleAnalysis {
    struct Tarjan<'g> {
        graph: &'g HashMap<String, HashSet<String>>,
        index: HashMap<String, usize>,
        low_link: HashMap<String, usize>,
        on_stack: HashSet<String>,
        stack: Vec<String>,
        next_index: usize,
        sccs: Vec<Vec<String>>,
    }

    impl<'g> Tarjan<'g> {
        fn visit(&mut self, node: &str) {
            self.index.insert(node.to_string(), self.next_index);
            self.low_link.insert(node.to_string(), self.next_index);
            self.next_index += 1;
            self.stack.push(node.to_string());
            self.on_stack.insert(node.to_string());

            if let Some(neighbors) = self.graph.get(node) {
                let mut neighbors: Vec<&String> = neighbors.iter().collect();
                neighbors.sort();
                for neighbor in neighbors {
                    if !self.index.contains_key(neighbor) {
                        self.visit(neighbor);
                        let low = self.low_link[neighbor].min(self.low_link[node]);
                        self.low_link.insert(node.to_string(), low);
                    } else if self.on_stack.contains(neighbor) {
                        let low = self.index[neighbor].min(self.low_link[node]);
                        self.low_link.insert(node.to_string(), low);
                    }
                }
            }

            if self.low_link[node] == self.index[node] {
                let mut component = Vec::new();
                loop {
                    let w = self.stack.pop().unwrap();
                    self.on_stack.remove(&w);
                    let is_root = w == node;
                    component.push(w);
                    if is_root {
                        break;
                    }
                }
                self.sccs.push(component);
            }
        }
    }

    let mut nodes: Vec<&String> = graph.keys().collect();
    nodes.sort();

    let mut tarjan = Tarjan {
        graph,
        index: HashMap::new(),
        low_link: HashMap::new(),
        on_stack: HashSet::new(),
        stack: Vec::new(),
        next_index: 0,
        sccs: Vec::new(),
    };
    for node in nodes {
        if !tarjan.index.contains_key(node) {
            tarjan.visit(node);
        }
    }

    let mut cycles = Vec::new();
    let mut all_cycle_field_ids = HashSet::new();
    for mut component in tarjan.sccs {
        component.sort();
        let is_self_reference = component.len() == 1
            && graph
                .get(&component[0])
                .is_some_and(|refs| refs.contains(&component[0]));
        if component.len() > 1 || is_self_reference {
            for id in &component {
                all_cycle_field_ids.insert(id.clone());
            }
            cycles.push(Cycle {
                field_ids: component,
                is_self_reference,
            });
        }
    }
    cycles.sort_by(|a, b| a.field_ids.first().cmp(&b.field_ids.first()));

    CycleAnalysis {
        cycles,
        all_cycle_field_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, InferredType)]) -> HashMap<String, InferredType> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn validate_reports_unknown_field() {
        let result = validate("{{ghost}} + 1", &fields(&[]));
        assert!(result.errors.iter().any(|e| e.contains("ghost")));
    }

    #[test]
    fn validate_infers_boolean_from_comparison() {
        let result = validate("age > 18", &fields(&[("age", InferredType::Number)]));
        assert_eq!(result.inferred_type, InferredType::Boolean);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn validate_type_mismatch_in_arithmetic() {
        let result = validate(
            "name + 1",
            &fields(&[("name", InferredType::Text)]),
        );
        assert!(!result.errors.is_empty());
    }

    #[test]
    fn dependencies_are_first_occurrence_ordered_and_deduped() {
        let deps = dependencies("{{b}} + {{a}} + {{b}}", &fields(&[]));
        let ids: Vec<&str> = deps.iter().map(|d| d.field_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn dependencies_tag_known_and_unknown() {
        let deps = dependencies("{{age}} + {{ghost}}", &fields(&[("age", InferredType::Number)]));
        assert!(deps[0].known);
        assert!(!deps[1].known);
    }

    #[test]
    fn cycle_detects_mutual_reference() {
        let mut graph = HashMap::new();
        graph.insert("a".to_string(), HashSet::from(["b".to_string()]));
        graph.insert("b".to_string(), HashSet::from(["a".to_string()]));
        let result = analyze_cycles(&graph);
        assert!(result.has_cycles());
        assert_eq!(result.cycles.len(), 1);
        assert_eq!(result.cycles[0].field_ids, vec!["a", "b"]);
        assert!(!result.cycles[0].is_self_reference);
    }

    #[test]
    fn cycle_detects_self_loop() {
        let mut graph = HashMap::new();
        graph.insert("a".to_string(), HashSet::from(["a".to_string()]));
        let result = analyze_cycles(&graph);
        assert_eq!(result.cycles.len(), 1);
        assert!(result.cycles[0].is_self_reference);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let mut graph = HashMap::new();
        graph.insert("a".to_string(), HashSet::from(["b".to_string()]));
        graph.insert("b".to_string(), HashSet::new());
        let result = analyze_cycles(&graph);
        assert!(!result.has_cycles());
    }

    #[test]
    fn determinism_same_input_same_output() {
        let a = validate("age + 1", &fields(&[("age", InferredType::Number)]));
        let b = validate("age + 1", &fields(&[("age", InferredType::Number)]));
        assert_eq!(a, b);
    }
}
