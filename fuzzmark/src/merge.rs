//! Posting list merge.

use crate::interface::Posting;

/// Ascending union of `a` and the part of `b` at or after `min_order`.
///
/// The flag reports whether some order appears in both inputs. `a` is taken
/// whole: it is the running merge of earlier lists, already cut off.
pub fn merge(a: &[Posting], b: &[Posting], min_order: usize) -> (Vec<Posting>, bool) {
    if b.is_empty() {
        return (a.to_vec(), false);
    }

    let b = &b[b.partition_point(|p| p.order < min_order)..];
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let mut intersected = false;
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].order.cmp(&b[j].order) {
            std::cmp::Ordering::Less => {
                merged.push(a[i].clone());
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(b[j].clone());
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(a[i].clone());
                i += 1;
                j += 1;
                intersected = true;
            }
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);

    (merged, intersected)
}
