//! Combination enumeration for multi-valued attributes

/// Every non-empty subset of `items`
///
/// Subsets are grouped by size (singletons first) and, within a size, ordered
/// lexicographically by catalog position. Members keep catalog order.
pub fn non_empty_subsets<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let n = items.len();
    let mut subsets = Vec::new();

    for size in 1..=n {
        // Indices of the current combination, advanced like an odometer
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            subsets.push(indices.iter().map(|&i| items[i].clone()).collect());

            let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + n - size) else {
                break;
            };
            indices[pos] += 1;
            for j in pos + 1..size {
                indices[j] = indices[j - 1] + 1;
            }
        }
    }

    subsets
}
