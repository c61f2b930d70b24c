//! The strongly-connected-component engine (§4.7): Tarjan's algorithm over
//! the binding-key graph, iterating source keys in deterministic
//! (key-ordered) order and emitting components in reverse topological
//! order.
//!
//! Vertices here are [`BindingKey`]s rather than an opaque integer id, so
//! the algorithm works over dense integer positions into a pre-sorted key
//! slice instead of hashing keys on every comparison. The DFS is an
//! explicit work stack rather than Tarjan's natural recursive form, so a
//! deep dependency chain can't overflow the host stack.

use rustc_hash::FxHashMap;

use crate::key::BindingKey;

/// `threshold = 0` emits every component, including singletons with no
/// self-loop (used by `components()` for downstream inference ordering).
/// `threshold = 1` emits only components that represent an actual cycle:
/// multi-key components, or a singleton whose key depends on itself. Cycle
/// classification (§4.8) always calls with threshold 1.
pub fn strongly_connected_components(
    keys: &[BindingKey],
    edges: &FxHashMap<BindingKey, rustc_hash::FxHashSet<BindingKey>>,
    threshold: usize,
) -> Vec<Vec<BindingKey>> {
    let n = keys.len();
    let pos_of: FxHashMap<&BindingKey, usize> =
        keys.iter().enumerate().map(|(i, k)| (k, i)).collect();

    // Adjacency as dense integer positions, child lists sorted ascending so
    // DFS expansion order (and therefore component membership order) is a
    // pure function of key order, not hash-map iteration order.
    let adj: Vec<Vec<usize>> = keys
        .iter()
        .map(|k| {
            let mut out: Vec<usize> = edges
                .get(k)
                .into_iter()
                .flatten()
                .filter_map(|dep| pos_of.get(dep).copied())
                .collect();
            out.sort_unstable();
            out
        })
        .collect();

    let mut indices: Vec<Option<usize>> = vec![None; n];
    let mut lowlink: Vec<usize> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut tarjan_stack: Vec<usize> = Vec::new();
    let mut counter = 0usize;
    let mut components: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if indices[start].is_some() {
            continue;
        }

        // Explicit work stack of (node, next-child-index-to-examine) frames,
        // standing in for Tarjan's natural recursive formulation.
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
        indices[start] = Some(counter);
        lowlink[start] = counter;
        counter += 1;
        tarjan_stack.push(start);
        on_stack[start] = true;

        while let Some(&(v, ci)) = frames.last() {
            if ci < adj[v].len() {
                let w = adj[v][ci];
                frames.last_mut().unwrap().1 += 1;
                if indices[w].is_none() {
                    indices[w] = Some(counter);
                    lowlink[w] = counter;
                    counter += 1;
                    tarjan_stack.push(w);
                    on_stack[w] = true;
                    frames.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(indices[w].expect("just checked Some"));
                }
            } else {
                frames.pop();
                if lowlink[v] == indices[v].expect("v was assigned an index on entry") {
                    let mut component = Vec::new();
                    loop {
                        let w = tarjan_stack.pop().expect("component root is on the stack");
                        on_stack[w] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    components.push(component);
                }
                if let Some(&(parent, _)) = frames.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }
            }
        }
    }

    components
        .into_iter()
        .filter(|component| {
            threshold == 0 || component.len() > 1 || adj[component[0]].contains(&component[0])
        })
        .map(|component| component.into_iter().map(|i| keys[i].clone()).collect())
        .collect()
}
