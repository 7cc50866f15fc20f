use std::collections::BTreeSet;
use nab_rsk::debug_panic;
use crate::Face;

// Undirected vertex connectivity derived from triangle edges. Rebuilt from scratch whenever topology changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyGraph
{
    neighbours: Box<[Box<[u32]>]>, // sorted, no self edges
}
impl AdjacencyGraph
{
    #[must_use]
    pub fn build(vertex_count: usize, faces: &[Face]) -> Self
    {
        let mut sets = vec![BTreeSet::<u32>::new(); vertex_count];
        for (face_index, face) in faces.iter().enumerate()
        {
            if face.indices.iter().any(|i| *i as usize >= vertex_count)
            {
                debug_panic!("Face {face_index} {:?} references a vertex past the end ({vertex_count} vertices)", face.indices);
                continue;
            }

            for (a, b) in face.edges()
            {
                if a == b { continue; }
                sets[a as usize].insert(b);
                sets[b as usize].insert(a);
            }
        }

        Self
        {
            neighbours: sets.into_iter().map(|s| s.into_iter().collect()).collect(),
        }
    }

    #[inline] #[must_use]
    pub fn vertex_count(&self) -> usize { self.neighbours.len() }

    #[inline] #[must_use]
    pub fn neighbours(&self, vertex: usize) -> &[u32]
    {
        self.neighbours.get(vertex).map_or(&[][..], |n| &n[..])
    }

    #[cfg(test)]
    #[inline] #[must_use]
    pub(crate) fn are_adjacent(&self, a: usize, b: u32) -> bool
    {
        self.neighbours(a).binary_search(&b).is_ok()
    }

    // Number of undirected edges
    #[must_use]
    pub fn edge_count(&self) -> usize
    {
        self.neighbours.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    // Hop count from `start` to every vertex, None for unreachable vertices
    #[cfg(test)]
    #[must_use]
    pub(crate) fn hop_distances(&self, start: usize) -> Vec<Option<u32>>
    {
        let mut distances = vec![None; self.vertex_count()];
        if start >= distances.len()
        {
            return distances;
        }
        distances[start] = Some(0);

        let mut queue = std::collections::VecDeque::from([start]);
        while let Some(vertex) = queue.pop_front()
        {
            let next = distances[vertex].map_or(0, |d| d + 1);
            for &n in self.neighbours(vertex)
            {
                let slot = &mut distances[n as usize];
                if slot.is_none()
                {
                    *slot = Some(next);
                    queue.push_back(n as usize);
                }
            }
        }
        distances
    }
}
