use std::{collections::VecDeque, hash::Hash};

use glam::IVec2;

use crate::{HashSet, DIR_4};

/// Generate a shortest paths map on a grid according to a neighbors function.
pub fn dijkstra_map<'a, T, I>(
    mut neighbors: impl FnMut(&T) -> I + 'a,
    starts: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (T, usize)> + 'a
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = T>,
{
    let mut edge: VecDeque<(T, usize)> =
        starts.into_iter().map(|s| (s, 0)).collect();
    let mut seen = HashSet::default();

    std::iter::from_fn(move || {
        // Candidates are in a queue and consumed first-in, first-out. This
        // should guarantee that the first time a node is popped from the queue
        // it shows the shortest path length from start to that node.

        while let Some((node, len)) = edge.pop_front() {
            if !seen.contains(&node) {
                seen.insert(node.clone());
                for n in neighbors(&node) {
                    edge.push_back((n, len + 1));
                }
                return Some((node, len));
            }
        }
        None
    })
}

/// Breadth-first fill over 4-connected grid cells accepted by `is_valid`.
///
/// Start cells are always included even if they fail the predicate.
pub fn flood_fill_4<'a>(
    is_valid: impl Fn(&IVec2) -> bool + 'a,
    starts: impl IntoIterator<Item = IVec2>,
) -> impl Iterator<Item = (IVec2, usize)> + 'a {
    let starts: Vec<IVec2> = starts.into_iter().collect();
    dijkstra_map(
        move |&p: &IVec2| {
            DIR_4
                .iter()
                .map(move |&d| p + d)
                .filter(|p| is_valid(p))
                .collect::<Vec<_>>()
        },
        starts,
    )
}

#[cfg(test)]
mod test {
    use glam::ivec2;
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::HashMap;

    #[test]
    fn fill_distances() {
        let inside = |p: &IVec2| (0..3).contains(&p.x) && (0..3).contains(&p.y);
        let map: HashMap<IVec2, usize> =
            flood_fill_4(inside, [ivec2(0, 0)]).collect();

        assert_eq!(map.len(), 9);
        assert_eq!(map[&ivec2(0, 0)], 0);
        assert_eq!(map[&ivec2(2, 2)], 4);
        assert_eq!(map[&ivec2(1, 0)], 1);
    }

    #[test]
    fn fill_stops_at_walls() {
        // Wall column at x = 1 splits the area in two.
        let inside = |p: &IVec2| {
            (0..3).contains(&p.x) && (0..3).contains(&p.y) && p.x != 1
        };
        let n = flood_fill_4(inside, [ivec2(0, 0)]).count();
        assert_eq!(n, 3);
    }

    #[quickcheck]
    fn open_fill_is_taxicab(w: u8, h: u8) -> bool {
        let (w, h) = (1 + (w % 12) as i32, 1 + (h % 12) as i32);
        let inside =
            move |p: &IVec2| (0..w).contains(&p.x) && (0..h).contains(&p.y);
        let map: HashMap<IVec2, usize> =
            flood_fill_4(inside, [ivec2(0, 0)]).collect();

        map.len() == (w * h) as usize
            && map.iter().all(|(p, &n)| (p.x + p.y) as usize == n)
    }
}
