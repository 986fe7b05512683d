//! On-disk ordering of hash keys.
//!
//! Hash entries are stored sorted by [`compare_keys`] instead of in insertion order. Since
//! version 4 a permutation table after the entries records the disk slot of each inserted key so
//! the original order can be restored.

use std::cmp::Ordering;

/// Order in which the engine expects hash keys to be stored
///
/// A key starting with an uppercase letter sorts before a key starting with a lowercase letter.
/// Everything else is compared by UTF-16 code unit, so characters outside the basic
/// multilingual plane sort before `U+E000..=U+FFFF`.
///
/// ```
/// use std::cmp::Ordering;
/// use hal_yaml::order::compare_keys;
///
/// assert_eq!(compare_keys("Zebra", "apple"), Ordering::Less);
/// assert_eq!(compare_keys("apple", "Banana"), Ordering::Greater);
/// assert_eq!(compare_keys("Banana", "Zebra"), Ordering::Less);
/// ```
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.chars().next(), b.chars().next()) {
        (Some(x), Some(y)) if x.is_uppercase() && y.is_lowercase() => Ordering::Less,
        (Some(x), Some(y)) if x.is_lowercase() && y.is_uppercase() => Ordering::Greater,
        _ => a.encode_utf16().cmp(b.encode_utf16()),
    }
}

/// Insertion indices of `keys` in the order they are stored on disk
pub fn disk_order<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
    let mut order = keys.into_iter().enumerate().collect::<Vec<_>>();
    insertion_sort(&mut order, |(_, a), (_, b)| compare_keys(a, b));
    order.into_iter().map(|(index, _)| index).collect()
}

/// Invert a disk order into the table stored on disk: the disk slot of every inserted key
pub fn permutation_table(disk_order: &[usize]) -> Vec<usize> {
    let mut table = vec![0; disk_order.len()];
    for (slot, &index) in disk_order.iter().enumerate() {
        table[index] = slot;
    }
    table
}

// compare_keys is not transitive for some non-ASCII keys, this has to stay well defined for them
fn insertion_sort<T>(items: &mut [T], compare: impl Fn(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j], &items[j - 1]) == Ordering::Less {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}
