//! Dependency resolution.
//!
//! This module builds the reference graph of a structure and turns it into
//! an [`EvaluationPlan`]: an order in which every component is evaluated after
//! the components it references.
//!
//! Edges run from a component to the component it is calculated from.
//! `CTC` and `GROSS` are synthetic roots and add no edge. `BASIC` adds an
//! edge to the structure's anchor BASIC component, so the anchor can never
//! be calculated from itself. Cycles are found with a three-colour
//! depth-first traversal, which visits each node and edge once and always
//! terminates.

use std::collections::HashMap;

use crate::error::{ValidationError, ValidationErrors};
use crate::models::{BaseRef, StructureComponent};

use super::ValidatedStructure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// The result of a full traversal of a [`ReferenceGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    /// Node indices in dependency-first order. Only meaningful without cycles.
    pub order: Vec<usize>,
    /// Every cycle found, as component ids with the first id repeated at the end.
    pub cycles: Vec<Vec<String>>,
}

/// Directed graph of specific-id and `BASIC` references between components.
#[derive(Debug, Clone)]
pub struct ReferenceGraph {
    ids: Vec<String>,
    edges: Vec<Vec<usize>>,
}

impl ReferenceGraph {
    /// Builds the graph from `(component_id, base_reference)` pairs.
    ///
    /// Node indices follow the iteration order. `anchor` is the index of the
    /// node that `BASIC` references point at. References to ids that are not
    /// nodes are skipped; reporting them is the validator's job. When an id
    /// occurs more than once, references resolve to its first occurrence.
    pub fn build<'a>(
        nodes: impl IntoIterator<Item = (&'a str, Option<&'a BaseRef>)>,
        anchor: Option<usize>,
    ) -> Self {
        let nodes: Vec<(&str, Option<&BaseRef>)> = nodes.into_iter().collect();

        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (index, (id, _)) in nodes.iter().enumerate() {
            positions.entry(*id).or_insert(index);
        }

        let edges: Vec<Vec<usize>> = nodes
            .iter()
            .map(|(_, base)| match base {
                Some(BaseRef::Component(target)) => {
                    positions.get(target.as_str()).copied().into_iter().collect()
                }
                Some(BaseRef::Basic) => anchor.into_iter().collect(),
                _ => Vec::new(),
            })
            .collect();

        Self {
            ids: nodes.iter().map(|(id, _)| id.to_string()).collect(),
            edges,
        }
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the indices a node references.
    pub fn dependencies(&self, node: usize) -> &[usize] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walks the whole graph, producing a dependency-first order and every cycle.
    ///
    /// Roots are visited in index order, so the order is deterministic and
    /// keeps unrelated components in their declared positions.
    pub fn traverse(&self) -> Traversal {
        let mut color = vec![Color::White; self.ids.len()];
        let mut order = Vec::with_capacity(self.ids.len());
        let mut cycles = Vec::new();

        for root in 0..self.ids.len() {
            if color[root] != Color::White {
                continue;
            }

            // Each frame is (node, index of the next edge to follow).
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            color[root] = Color::Gray;

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                match self.edges[node].get(frame.1) {
                    Some(&next) => {
                        frame.1 += 1;
                        match color[next] {
                            Color::White => {
                                color[next] = Color::Gray;
                                stack.push((next, 0));
                            }
                            Color::Gray => {
                                let start = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                                let mut path: Vec<String> = stack[start..]
                                    .iter()
                                    .map(|&(n, _)| self.ids[n].clone())
                                    .collect();
                                path.push(self.ids[next].clone());
                                cycles.push(path);
                            }
                            Color::Black => {}
                        }
                    }
                    None => {
                        color[node] = Color::Black;
                        order.push(node);
                        stack.pop();
                    }
                }
            }
        }

        Traversal { order, cycles }
    }
}

/// A validated structure together with the order to evaluate it in.
///
/// Evaluation happens in two passes. The first pass holds every component
/// that does not depend on `GROSS`, directly or through other components.
/// The second pass holds the rest and runs once the first-pass earnings are
/// known. Both passes are in dependency-first order.
#[derive(Debug, Clone)]
pub struct EvaluationPlan {
    structure: ValidatedStructure,
    first_pass: Vec<usize>,
    second_pass: Vec<usize>,
    positions: HashMap<String, usize>,
}

impl EvaluationPlan {
    /// Returns the structure being evaluated.
    pub fn structure(&self) -> &ValidatedStructure {
        &self.structure
    }

    /// Returns the components in declared order.
    pub fn components(&self) -> &[StructureComponent] {
        self.structure.components()
    }

    /// Component indices evaluated before `GROSS` is known.
    pub fn first_pass(&self) -> &[usize] {
        &self.first_pass
    }

    /// Component indices that depend on `GROSS`.
    pub fn second_pass(&self) -> &[usize] {
        &self.second_pass
    }

    /// Iterates over every component index in evaluation order.
    pub fn evaluation_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.first_pass.iter().chain(self.second_pass.iter()).copied()
    }

    /// Returns the declared-order index of a component id.
    pub fn position_of(&self, component_id: &str) -> Option<usize> {
        self.positions.get(component_id).copied()
    }
}

/// Orders a validated structure for evaluation.
///
/// Returns every unresolved reference and cycle found. A structure that came
/// out of [`super::validate`] has neither, so this only fails when the
/// validator's guarantees were bypassed.
///
/// # Example
///
/// ```no_run
/// use salary_engine::calculation::{resolve, validate};
/// use salary_engine::config::ConfigLoader;
/// use salary_engine::models::StructureComponentDraft;
///
/// let config = ConfigLoader::load("./config/default").unwrap();
/// let drafts: Vec<StructureComponentDraft> = serde_json::from_str(
///     r#"[{"component_id": "hra", "percentage": "50", "base_component_ref": "BASIC"},
///         {"component_id": "basic", "percentage": "40", "base_component_ref": "CTC"}]"#,
/// )
/// .unwrap();
///
/// let plan = resolve(validate(&drafts, config.catalog()).unwrap()).unwrap();
/// let order: Vec<&str> = plan
///     .evaluation_order()
///     .map(|i| plan.components()[i].component_id.as_str())
///     .collect();
/// assert_eq!(order, vec!["basic", "hra"]);
/// ```
pub fn resolve(structure: ValidatedStructure) -> Result<EvaluationPlan, ValidationErrors> {
    let components = structure.components();

    let positions: HashMap<String, usize> = components
        .iter()
        .enumerate()
        .map(|(index, c)| (c.component_id.clone(), index))
        .collect();

    let mut errors = ValidationErrors::new();
    for component in components {
        if let Some(target) = component.rule.base().and_then(BaseRef::component_id) {
            if !positions.contains_key(target) {
                errors.push(ValidationError::UnresolvedReference {
                    component_id: component.component_id.clone(),
                    reference: target.to_string(),
                });
            }
        }
    }

    let graph = ReferenceGraph::build(
        components
            .iter()
            .map(|c| (c.component_id.as_str(), c.rule.base())),
        Some(structure.anchor()),
    );
    let traversal = graph.traverse();
    errors.extend(
        traversal
            .cycles
            .into_iter()
            .map(|path| ValidationError::DependencyCycle { path }),
    );
    errors.into_result(())?;

    // Dependencies come first in the traversal order, so one forward sweep
    // propagates GROSS dependence transitively.
    let mut depends_on_gross = vec![false; components.len()];
    for &node in &traversal.order {
        depends_on_gross[node] = components[node].rule.base() == Some(&BaseRef::Gross)
            || graph
                .dependencies(node)
                .iter()
                .any(|&dep| depends_on_gross[dep]);
    }

    let (second_pass, first_pass): (Vec<usize>, Vec<usize>) = traversal
        .order
        .iter()
        .copied()
        .partition(|&node| depends_on_gross[node]);

    Ok(EvaluationPlan {
        structure,
        first_pass,
        second_pass,
        positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::test_support::{catalog, fixed, percentage};
    use crate::calculation::validate;
    use crate::models::StructureComponentDraft;

    fn component(id: &str) -> BaseRef {
        BaseRef::Component(id.to_string())
    }

    fn plan_for(drafts: &[StructureComponentDraft]) -> EvaluationPlan {
        let structure = validate(drafts, &catalog()).expect("structure should validate");
        resolve(structure).expect("structure should resolve")
    }

    fn ids(plan: &EvaluationPlan, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .map(|&i| plan.components()[i].component_id.clone())
            .collect()
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let a = component("a");
        let graph = ReferenceGraph::build([("a", Some(&a))], None);

        let traversal = graph.traverse();
        assert_eq!(traversal.cycles, vec![vec!["a".to_string(), "a".to_string()]]);
    }

    #[test]
    fn test_two_node_cycle_is_reported_once() {
        let to_a = component("a");
        let to_b = component("b");
        let graph = ReferenceGraph::build([("a", Some(&to_b)), ("b", Some(&to_a))], None);

        let traversal = graph.traverse();
        assert_eq!(
            traversal.cycles,
            vec![vec!["a".to_string(), "b".to_string(), "a".to_string()]]
        );
    }

    #[test]
    fn test_transitive_cycle_behind_a_tail() {
        // d -> a -> b -> c -> a
        let to_a = component("a");
        let to_b = component("b");
        let to_c = component("c");
        let graph = ReferenceGraph::build(
            [
                ("d", Some(&to_a)),
                ("a", Some(&to_b)),
                ("b", Some(&to_c)),
                ("c", Some(&to_a)),
            ],
            None,
        );

        let traversal = graph.traverse();
        assert_eq!(traversal.cycles.len(), 1);
        assert_eq!(traversal.cycles[0], vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_basic_keyword_points_at_anchor() {
        let basic = BaseRef::Basic;
        let ctc = BaseRef::Ctc;
        let graph = ReferenceGraph::build([("hra", Some(&basic)), ("basic", Some(&ctc))], Some(1));

        assert_eq!(graph.dependencies(0), &[1]);
        assert!(graph.dependencies(1).is_empty());
        assert_eq!(graph.traverse().order, vec![1, 0]);
    }

    #[test]
    fn test_anchor_referencing_basic_is_a_cycle() {
        let basic = BaseRef::Basic;
        let graph = ReferenceGraph::build([("basic", Some(&basic))], Some(0));

        assert_eq!(graph.traverse().cycles, vec![vec!["basic", "basic"]]);
    }

    #[test]
    fn test_unknown_targets_are_skipped() {
        let ghost = component("ghost");
        let graph = ReferenceGraph::build([("a", Some(&ghost))], None);

        assert!(graph.dependencies(0).is_empty());
        assert_eq!(graph.traverse().order, vec![0]);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..10_000).map(|i| format!("c{}", i)).collect();
        let refs: Vec<BaseRef> = (0..10_000)
            .map(|i| component(&format!("c{}", i + 1)))
            .collect();
        let graph = ReferenceGraph::build(
            ids.iter()
                .zip(refs.iter())
                .map(|(id, r)| (id.as_str(), Some(r))),
            None,
        );

        let traversal = graph.traverse();
        assert!(traversal.cycles.is_empty());
        assert_eq!(traversal.order.first(), Some(&9_999));
        assert_eq!(traversal.order.last(), Some(&0));
    }

    #[test]
    fn test_dependencies_come_before_dependents() {
        let plan = plan_for(&[
            percentage("epf", "12", "BASIC"),
            percentage("hra", "50", "da"),
            percentage("da", "10", "BASIC"),
            percentage("basic", "40", "CTC"),
        ]);

        assert_eq!(
            ids(&plan, plan.first_pass()),
            vec!["basic", "epf", "da", "hra"]
        );
        assert!(plan.second_pass().is_empty());
    }

    #[test]
    fn test_gross_dependents_move_to_second_pass() {
        let plan = plan_for(&[
            percentage("basic", "40", "CTC"),
            percentage("esi", "0.75", "GROSS"),
            percentage("performance_bonus", "10", "esi"),
            fixed("conveyance", "1600"),
        ]);

        assert_eq!(ids(&plan, plan.first_pass()), vec!["basic", "conveyance"]);
        assert_eq!(
            ids(&plan, plan.second_pass()),
            vec!["esi", "performance_bonus"]
        );
        assert_eq!(plan.evaluation_order().count(), 4);
    }

    #[test]
    fn test_position_of_uses_declared_order() {
        let plan = plan_for(&[percentage("basic", "40", "CTC"), fixed("conveyance", "1600")]);

        assert_eq!(plan.position_of("basic"), Some(0));
        assert_eq!(plan.position_of("conveyance"), Some(1));
        assert_eq!(plan.position_of("hra"), None);
    }
}
