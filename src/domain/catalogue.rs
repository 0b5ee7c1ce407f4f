//! The immutable, in-memory procedure catalogue.
//!
//! The [`Catalogue`] knows nothing about where its procedures came from. It
//! preserves insertion order, indexes procedures by identifier, and keeps the
//! cross-reference graph formed by conditionals for integrity checks.

use std::{collections::HashMap, fmt};

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Category, Procedure, ProcedureConditional, ProcedureId};

/// An immutable collection of procedures.
///
/// Storage:
/// - Records: `Vec<Procedure>` in insertion order
/// - Lookup: `HashMap<ProcedureId, usize>` into the records
/// - Cross-references: `DiGraphMap<usize, ()>`, edges point from the
///   referencing procedure to the referenced one. Dangling references have no
///   edge.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    procedures: Vec<Procedure>,
    index: HashMap<ProcedureId, usize>,
    graph: DiGraphMap<usize, ()>,
}

/// Errors that can occur when assembling a catalogue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogueError {
    /// Two procedures share an identifier.
    #[error("duplicate procedure ID {0}")]
    DuplicateId(ProcedureId),
}

/// A data-authoring defect found by [`Catalogue::check_integrity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// A conditional references a procedure that does not exist.
    DanglingReference {
        /// The procedure holding the conditional.
        from: ProcedureId,
        /// Zero-based position of the conditional.
        conditional: usize,
        /// The missing identifier.
        target: ProcedureId,
    },
    /// A conditional references the procedure it belongs to.
    SelfReference {
        /// The procedure holding the conditional.
        id: ProcedureId,
        /// Zero-based position of the conditional.
        conditional: usize,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DanglingReference {
                from,
                conditional,
                target,
            } => write!(
                f,
                "{from}: conditional {} references unknown procedure {target}",
                conditional + 1
            ),
            Self::SelfReference { id, conditional } => write!(
                f,
                "{id}: conditional {} references its own procedure",
                conditional + 1
            ),
        }
    }
}

/// A conditional that points at some procedure.
#[derive(Debug, Clone, Copy)]
pub struct Reference<'a> {
    /// The procedure holding the conditional.
    pub from: &'a Procedure,
    /// Zero-based position of the conditional within `from`.
    pub position: usize,
    /// The conditional itself.
    pub conditional: &'a ProcedureConditional,
}

impl Catalogue {
    /// Builds a catalogue from procedures in display order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::DuplicateId`] if two procedures share an
    /// identifier. Unresolvable references are accepted here and reported by
    /// [`Catalogue::check_integrity`].
    #[instrument(skip_all)]
    pub fn new(procedures: Vec<Procedure>) -> Result<Self, CatalogueError> {
        let mut index = HashMap::with_capacity(procedures.len());
        for (position, procedure) in procedures.iter().enumerate() {
            if index.insert(procedure.id().clone(), position).is_some() {
                return Err(CatalogueError::DuplicateId(procedure.id().clone()));
            }
        }

        let mut graph = DiGraphMap::with_capacity(procedures.len(), procedures.len() * 2);
        for (position, procedure) in procedures.iter().enumerate() {
            graph.add_node(position);
            for target in procedure.references() {
                if let Some(&target) = index.get(target) {
                    graph.add_edge(position, target, ());
                }
            }
        }

        debug!(
            procedures = procedures.len(),
            references = graph.edge_count(),
            "catalogue assembled"
        );

        Ok(Self {
            procedures,
            index,
            graph,
        })
    }

    /// Looks up a procedure by identifier.
    ///
    /// An unknown identifier is an ordinary outcome, not an error.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Procedure> {
        self.index.get(id).map(|&position| &self.procedures[position])
    }

    /// Whether a procedure with this identifier exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All procedures of a category, in catalogue order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Procedure> + '_ {
        self.procedures
            .iter()
            .filter(move |procedure| procedure.category() == category)
    }

    /// All procedures, in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &Procedure> + '_ {
        self.procedures.iter()
    }

    /// The number of procedures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    /// Whether the catalogue holds no procedures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Procedures that `id` cross-references, without duplicates.
    ///
    /// Dangling references are skipped.
    pub fn references_from(&self, id: &str) -> impl Iterator<Item = &Procedure> + '_ {
        self.index
            .get(id)
            .map(|&position| {
                self.graph
                    .neighbors_directed(position, petgraph::Direction::Outgoing)
            })
            .into_iter()
            .flatten()
            .map(|target| &self.procedures[target])
    }

    /// Every conditional, anywhere in the catalogue, that references `id`.
    pub fn references_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = Reference<'a>> + 'a {
        self.procedures.iter().flat_map(move |from| {
            from.conditionals()
                .iter()
                .enumerate()
                .filter(move |(_, conditional)| {
                    conditional
                        .reference_id()
                        .is_some_and(|target| target.as_str() == id)
                })
                .map(move |(position, conditional)| Reference {
                    from,
                    position,
                    conditional,
                })
        })
    }

    /// Groups of procedures that reach each other through cross-references.
    ///
    /// Cycles are legitimate (a contingency can escalate to an emergency that
    /// offers a way back), so these are informational. Self-references are
    /// reported by [`Catalogue::check_integrity`] instead.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<ProcedureId>> {
        let mut cycles: Vec<Vec<ProcedureId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut ids: Vec<_> = component
                    .into_iter()
                    .map(|position| self.procedures[position].id().clone())
                    .collect();
                ids.sort();
                ids
            })
            .collect();

        cycles.sort();
        cycles
    }

    /// Finds references that do not resolve, and procedures that reference
    /// themselves.
    ///
    /// An empty result means every cross-reference can be navigated.
    #[must_use]
    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for procedure in &self.procedures {
            for (conditional, target) in procedure
                .conditionals()
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.reference_id().map(|target| (i, target)))
            {
                if target == procedure.id() {
                    issues.push(IntegrityIssue::SelfReference {
                        id: procedure.id().clone(),
                        conditional,
                    });
                } else if !self.contains(target) {
                    issues.push(IntegrityIssue::DanglingReference {
                        from: procedure.id().clone(),
                        conditional,
                        target: target.clone(),
                    });
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedure(id: &str, category: Category, references: &[&str]) -> Procedure {
        references
            .iter()
            .fold(
                Procedure::builder(id, category).title(id),
                |builder, reference| builder.conditional_ref("If needed", "Continue", reference),
            )
            .build()
            .unwrap()
    }

    fn catalogue(procedures: Vec<Procedure>) -> Catalogue {
        Catalogue::new(procedures).unwrap()
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let err = Catalogue::new(vec![
            procedure("N1", Category::Normal, &[]),
            procedure("N1", Category::Contingency, &[]),
        ])
        .unwrap_err();

        assert_eq!(err, CatalogueError::DuplicateId("N1".parse().unwrap()));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let catalogue = catalogue(vec![procedure("N1", Category::Normal, &[])]);

        assert!(catalogue.get("N1").is_some());
        assert!(catalogue.get("N2").is_none());
        assert!(!catalogue.contains("n1"));
    }

    #[test]
    fn by_category_preserves_insertion_order() {
        let catalogue = catalogue(vec![
            procedure("N2", Category::Normal, &[]),
            procedure("E1", Category::Emergency, &[]),
            procedure("N1", Category::Normal, &[]),
        ]);

        let ids: Vec<_> = catalogue
            .by_category(Category::Normal)
            .map(|p| p.id().as_str())
            .collect();
        assert_eq!(ids, vec!["N2", "N1"]);
        assert_eq!(catalogue.by_category(Category::Erp).count(), 0);
    }

    #[test]
    fn reports_dangling_and_self_references() {
        let catalogue = catalogue(vec![
            procedure("C1", Category::Contingency, &["E1", "E9"]),
            procedure("E1", Category::Emergency, &["E1"]),
        ]);

        assert_eq!(
            catalogue.check_integrity(),
            vec![
                IntegrityIssue::DanglingReference {
                    from: "C1".parse().unwrap(),
                    conditional: 1,
                    target: "E9".parse().unwrap(),
                },
                IntegrityIssue::SelfReference {
                    id: "E1".parse().unwrap(),
                    conditional: 0,
                },
            ]
        );
    }

    #[test]
    fn references_in_both_directions() {
        let catalogue = catalogue(vec![
            procedure("C1", Category::Contingency, &["E1", "E1"]),
            procedure("C2", Category::Contingency, &["E1", "E9"]),
            procedure("E1", Category::Emergency, &[]),
        ]);

        let from: Vec<_> = catalogue
            .references_from("C1")
            .map(|p| p.id().as_str())
            .collect();
        assert_eq!(from, vec!["E1"]);

        let to: Vec<_> = catalogue
            .references_to("E1")
            .map(|r| (r.from.id().as_str(), r.position))
            .collect();
        assert_eq!(to, vec![("C1", 0), ("C1", 1), ("C2", 0)]);

        assert_eq!(catalogue.references_from("C2").count(), 1);
        assert_eq!(catalogue.references_from("missing").count(), 0);
    }

    #[test]
    fn finds_cycles_between_procedures() {
        let catalogue = catalogue(vec![
            procedure("C4", Category::Contingency, &["C4.1"]),
            procedure("C4.1", Category::Contingency, &["C4"]),
            procedure("E1", Category::Emergency, &[]),
        ]);

        assert_eq!(
            catalogue.cycles(),
            vec![vec!["C4".parse::<ProcedureId>().unwrap(), "C4.1".parse().unwrap()]]
        );
    }
}
