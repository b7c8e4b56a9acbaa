use super::{order::VisitOrder, Kind};
use crate::{
    error::{try_with_capacity, Result},
    graph::CsrGraph,
    types::VId,
};

/// The candidates left at one depth of the search.
#[derive(Debug, Default)]
struct Frame {
    candidates: Vec<VId>,
    cursor: usize,
}

impl Iterator for Frame {
    type Item = VId;

    fn next(&mut self) -> Option<VId> {
        let v = self.candidates.get(self.cursor).copied();
        self.cursor += 1;
        v
    }
}

/// Depth-first enumeration of the embeddings whose first visited pattern vertex maps to a
/// given root.
///
/// `images[k]` is the target vertex assigned to the pattern vertex visited at depth `k`, and
/// `frames[k]` holds the candidates still to try for it. Extending a mapping of size `k`
/// pushes a frame; an exhausted frame is popped and the search backtracks to `k - 1`.
/// A `Search` is reused across roots through [`Search::restart`] so its buffers are
/// allocated once per worker.
pub(super) struct Search<'a> {
    target: &'a CsrGraph,
    order: &'a VisitOrder,
    kind: Kind,
    images: Vec<VId>,
    used: Vec<bool>,
    frames: Vec<Frame>,
    spare: Vec<Frame>,
}

impl<'a> Search<'a> {
    pub(super) fn new(target: &'a CsrGraph, order: &'a VisitOrder, kind: Kind) -> Result<Self> {
        let mut used = try_with_capacity(target.vertex_count())?;
        used.resize(target.vertex_count(), false);
        Ok(Self {
            target,
            order,
            kind,
            images: try_with_capacity(order.len())?,
            used,
            frames: try_with_capacity(order.len())?,
            spare: try_with_capacity(order.len())?,
        })
    }

    /// Drops the current state and starts over from `root`.
    pub(super) fn restart(&mut self, root: VId) {
        for v in self.images.drain(..) {
            self.used[v as usize] = false;
        }
        self.spare.extend(self.frames.drain(..));
        let mut frame = self.spare.pop().unwrap_or_default();
        frame.candidates.clear();
        frame.candidates.push(root);
        frame.cursor = 0;
        self.frames.push(frame);
    }

    /// Fills `frame` with the target vertices able to extend the current mapping.
    fn fill_candidates(&self, frame: &mut Frame) -> Result<()> {
        let depth = self.images.len();
        frame.candidates.clear();
        frame.cursor = 0;
        let (target, images) = (self.target, &self.images);
        let degree = self.order.degree(depth);
        let neighbors = self.order.mapped_neighbors(depth);
        let non_neighbors = self.order.mapped_non_neighbors(depth);
        let induced = self.kind == Kind::Induced;
        let accept = |w: VId| {
            target.degree(w) >= degree
                && !self.used[w as usize]
                && (!induced
                    || non_neighbors
                        .iter()
                        .all(|&j| !target.has_edge(images[j], w)))
        };
        // Scan the shortest neighbor list and probe the others.
        match neighbors
            .iter()
            .min_by_key(|&&j| target.degree(images[j]))
        {
            Some(&base) => {
                let base_neighbors = target.neighbors_of(images[base]);
                frame.candidates.try_reserve(base_neighbors.len())?;
                frame
                    .candidates
                    .extend(base_neighbors.iter().copied().filter(|&w| {
                        neighbors
                            .iter()
                            .all(|&j| j == base || target.has_edge(images[j], w))
                            && accept(w)
                    }));
            }
            None => {
                frame.candidates.try_reserve(target.vertex_count())?;
                frame
                    .candidates
                    .extend(target.vertices().filter(|&w| accept(w)));
            }
        }
        Ok(())
    }

    /// The current complete mapping, indexed by pattern vertex.
    fn row(&self) -> Result<Vec<VId>> {
        let mut row = try_with_capacity(self.images.len())?;
        row.resize(self.images.len(), 0);
        for (depth, &image) in self.images.iter().enumerate() {
            row[self.order.vertex(depth) as usize] = image;
        }
        Ok(row)
    }
}

impl<'a> Iterator for Search<'a> {
    type Item = Result<Vec<VId>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.frames.len();
            if depth == 0 {
                return None;
            }
            if self.images.len() == depth {
                if let Some(v) = self.images.pop() {
                    self.used[v as usize] = false;
                }
            }
            match self.frames[depth - 1].next() {
                Some(v) => {
                    self.images.push(v);
                    self.used[v as usize] = true;
                    if self.images.len() == self.order.len() {
                        return Some(self.row());
                    }
                    let mut frame = self.spare.pop().unwrap_or_default();
                    if let Err(e) = self.fill_candidates(&mut frame) {
                        return Some(Err(e));
                    }
                    self.frames.push(frame);
                }
                None => {
                    if let Some(frame) = self.frames.pop() {
                        self.spare.push(frame);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> CsrGraph {
        CsrGraph::from_edges(&[(0, 1), (1, 2), (2, 0)]).unwrap()
    }

    #[test]
    fn test_search_from_root() {
        let target = CsrGraph::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3), (3, 0)]).unwrap();
        let pattern = triangle();
        let order = VisitOrder::new(&pattern);
        let mut search = Search::new(&target, &order, Kind::Induced).unwrap();
        search.restart(0);
        // Pattern vertex 0 goes first and maps to 0; triangles through 0 are 012 and 023.
        let mut rows: Vec<_> = search.by_ref().collect::<Result<_>>().unwrap();
        rows.sort();
        assert_eq!(
            rows,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![0, 2, 3],
                vec![0, 3, 2]
            ]
        );
        search.restart(1);
        assert_eq!(search.count(), 2);
    }

    #[test]
    fn test_restart_after_partial_run() {
        let target = CsrGraph::from_edges(&[(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let pattern = CsrGraph::from_edges(&[(0, 1), (0, 2)]).unwrap();
        let order = VisitOrder::new(&pattern);
        let mut search = Search::new(&target, &order, Kind::Induced).unwrap();
        search.restart(0);
        assert!(search.next().unwrap().is_ok());
        search.restart(0);
        assert_eq!(search.count(), 12);
    }

    #[test]
    fn test_induced_rejects_extra_edges() {
        let pattern = CsrGraph::from_edges(&[(0, 1), (1, 2)]).unwrap();
        let order = VisitOrder::new(&pattern);
        let target = triangle();
        let mut induced = Search::new(&target, &order, Kind::Induced).unwrap();
        induced.restart(0);
        assert_eq!(induced.count(), 0);
        let mut non_induced = Search::new(&target, &order, Kind::NonInduced).unwrap();
        non_induced.restart(0);
        assert_eq!(non_induced.count(), 2);
    }
}
