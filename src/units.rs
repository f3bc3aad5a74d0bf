// Copyright 2023 Remi Bernotavicius

use crate::database::models::{UnitConversion, UnitId};
use std::collections::{HashMap, HashSet, VecDeque};

struct Edge {
    to: UnitId,
    ratio: f64,
    inverse: bool,
}

/// Stored conversions seen as an undirected graph: each row `a -> b (r)` can also be walked
/// backwards as `b -> a (1 / r)`.
pub struct ConversionGraph {
    edges: HashMap<UnitId, Vec<Edge>>,
}

impl ConversionGraph {
    pub fn new<'a>(conversions: impl IntoIterator<Item = &'a UnitConversion>) -> Self {
        let mut edges: HashMap<UnitId, Vec<Edge>> = HashMap::new();
        for c in conversions {
            edges.entry(c.from_unit_id).or_default().push(Edge {
                to: c.to_unit_id,
                ratio: c.ratio,
                inverse: false,
            });
            edges.entry(c.to_unit_id).or_default().push(Edge {
                to: c.from_unit_id,
                ratio: 1.0 / c.ratio,
                inverse: true,
            });
        }
        // Stored directions win over inverted ones when both lead to the same unit.
        for adjacent in edges.values_mut() {
            adjacent.sort_by_key(|e| e.inverse);
        }
        Self { edges }
    }

    /// What to multiply a quantity in `from` by to express it in `to`, following the fewest
    /// conversions. `None` when the units are not connected.
    pub fn conversion_factor(&self, from: UnitId, to: UnitId) -> Option<f64> {
        if from == to {
            return Some(1.0);
        }

        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, 1.0)]);
        while let Some((unit, factor)) = queue.pop_front() {
            for edge in self.edges.get(&unit).into_iter().flatten() {
                if !visited.insert(edge.to) {
                    continue;
                }
                let factor = factor * edge.ratio;
                if edge.to == to {
                    return Some(factor);
                }
                queue.push_back((edge.to, factor));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UnitConversionId;

    const ML: UnitId = UnitId(1);
    const L: UnitId = UnitId(2);
    const TSP: UnitId = UnitId(3);
    const TBSP: UnitId = UnitId(4);
    const FL_OZ: UnitId = UnitId(5);
    const CUP: UnitId = UnitId(6);
    const G: UnitId = UnitId(11);
    const KG: UnitId = UnitId(12);
    const OZ: UnitId = UnitId(13);
    const LB: UnitId = UnitId(14);
    const PIECE: UnitId = UnitId(15);

    fn graph() -> ConversionGraph {
        let rows = [
            (L, ML, 1000.0),
            (TSP, ML, 4.92892159375),
            (TBSP, ML, 14.78676478125),
            (FL_OZ, ML, 29.5735295625),
            (CUP, ML, 236.5882365),
            (TBSP, TSP, 3.0),
            (FL_OZ, TBSP, 2.0),
            (CUP, FL_OZ, 8.0),
            (KG, G, 1000.0),
            (OZ, G, 28.349523125),
            (LB, G, 453.59237),
            (LB, OZ, 16.0),
        ];
        let conversions: Vec<_> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (from_unit_id, to_unit_id, ratio))| UnitConversion {
                id: UnitConversionId(i as i32 + 1),
                from_unit_id,
                to_unit_id,
                ratio,
            })
            .collect();
        ConversionGraph::new(&conversions)
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("units should be connected");
        assert!(
            (actual - expected).abs() <= expected.abs() * 1e-9,
            "{actual} != {expected}"
        );
    }

    #[test]
    fn unit_conversion_us() {
        let graph = graph();
        assert_close(graph.conversion_factor(CUP, FL_OZ), 8.0);
        assert_close(graph.conversion_factor(CUP, TBSP), 16.0);
        assert_close(graph.conversion_factor(CUP, TSP), 48.0);

        assert_close(graph.conversion_factor(FL_OZ, CUP), 1.0 / 8.0);
        assert_close(graph.conversion_factor(TSP, CUP), 1.0 / 48.0);

        assert_close(graph.conversion_factor(TBSP, TSP), 3.0);
        assert_close(graph.conversion_factor(TSP, TBSP), 1.0 / 3.0);

        assert_close(graph.conversion_factor(LB, OZ), 16.0);
        assert_close(graph.conversion_factor(OZ, LB), 1.0 / 16.0);
    }

    #[test]
    fn unit_conversion_metric() {
        let graph = graph();
        assert_close(graph.conversion_factor(L, ML), 1_000.0);
        assert_close(graph.conversion_factor(ML, L), 1.0 / 1_000.0);
        assert_close(graph.conversion_factor(KG, G), 1_000.0);
        assert_close(graph.conversion_factor(G, KG), 1.0 / 1_000.0);
    }

    #[test]
    fn unit_conversion_us_metric() {
        let graph = graph();
        assert_close(graph.conversion_factor(L, TSP), 1000.0 / 4.92892159375);
        assert_close(graph.conversion_factor(L, CUP), 1000.0 / 236.5882365);
        assert_close(graph.conversion_factor(OZ, G), 28.349523125);
        assert_close(graph.conversion_factor(LB, G), 453.59237);
        assert_close(graph.conversion_factor(KG, LB), 1000.0 / 453.59237);
    }

    #[test]
    fn same_unit_and_disconnected_units() {
        let graph = graph();
        assert_eq!(graph.conversion_factor(PIECE, PIECE), Some(1.0));
        assert_eq!(graph.conversion_factor(CUP, G), None);
        assert_eq!(graph.conversion_factor(PIECE, CUP), None);
    }

    #[test]
    fn stored_direction_preferred_over_inverse() {
        let conversions = [
            UnitConversion {
                id: UnitConversionId(1),
                from_unit_id: CUP,
                to_unit_id: ML,
                ratio: 240.0,
            },
            UnitConversion {
                id: UnitConversionId(2),
                from_unit_id: ML,
                to_unit_id: CUP,
                ratio: 1.0 / 236.5882365,
            },
        ];
        let graph = ConversionGraph::new(&conversions);
        assert_eq!(graph.conversion_factor(CUP, ML), Some(240.0));
        assert_eq!(graph.conversion_factor(ML, CUP), Some(1.0 / 236.5882365));
    }
}
