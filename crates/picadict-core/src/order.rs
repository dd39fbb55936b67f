//! Compact-notation key ordering.
//!
//! Pica3 keys do not sort as plain strings. Within a field family the
//! purely numeric continuation keys come after the alphabetic variants,
//! so at the first position where two keys differ a digit sorts after a
//! non-digit: `047A` comes before `0470`. A handful of key pairs in the
//! printed catalog are ordered against even that rule; those live in
//! [`OVERRIDES`] rather than as extra branches in the comparison, so
//! the general rule stays auditable.

use std::cmp::Ordering;

/// Key pairs force-ordered against the generic comparison rule.
///
/// Each entry `(a, b)` means `a` sorts before `b` no matter what the
/// generic rule would decide. The table is sound only if every key the
/// generic rule places strictly between a pair's members carries an
/// entry of its own putting the pair's first member ahead of it:
/// `650B` sorts between `650A` and `6500`, so it needs the
/// `("6500", "650B")` entry, or comparisons among the three keys stop
/// being transitive and the frozen order depends on insertion order.
/// Key registration checks this condition and rejects keys that would
/// break an active pair.
pub const OVERRIDES: &[(&str, &str)] = &[
    // The printed local-data section lists 6500 (free keywords) ahead
    // of its alphabetic companions, against the digits-last rule.
    ("6500", "650A"),
    ("6500", "650B"),
];

/// Compare two compact-notation keys.
///
/// Characterwise comparison, except that when exactly one of the two
/// characters at the first differing position is a digit, the digit
/// sorts last. A key that is a proper prefix of the other sorts first.
/// Pairs listed in [`OVERRIDES`] short-circuit the rule entirely.
pub fn compare(a: &str, b: &str) -> Ordering {
    if let Some(ord) = override_for(a, b) {
        return ord;
    }
    generic_compare(a, b)
}

/// The digits-last characterwise rule, without the override table.
fn generic_compare(a: &str, b: &str) -> Ordering {
    let mut rhs = b.chars();
    for ca in a.chars() {
        let Some(cb) = rhs.next() else {
            // b is a proper prefix of a
            return Ordering::Greater;
        };
        if ca == cb {
            continue;
        }
        return match (ca.is_ascii_digit(), cb.is_ascii_digit()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => ca.cmp(&cb),
        };
    }
    if rhs.next().is_some() {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

fn override_for(a: &str, b: &str) -> Option<Ordering> {
    for (first, second) in OVERRIDES {
        if a == *first && b == *second {
            return Some(Ordering::Less);
        }
        if a == *second && b == *first {
            return Some(Ordering::Greater);
        }
    }
    None
}

/// Check whether adding `key` to a catalog holding `existing` keys
/// would violate the [`OVERRIDES`] soundness condition.
///
/// A pair with only one member present never fires, so its condition
/// is checked the moment `key` completes it; against pairs that are
/// already active only `key` itself needs testing. Returns the
/// offending key together with the pair it breaks.
pub(crate) fn override_conflict<'a, I>(
    key: &str,
    existing: I,
) -> Option<(String, &'static str, &'static str)>
where
    I: Iterator<Item = &'a str> + Clone,
{
    for &(first, second) in OVERRIDES {
        let first_present = key == first || existing.clone().any(|k| k == first);
        let second_present = key == second || existing.clone().any(|k| k == second);
        if !first_present || !second_present {
            continue;
        }
        if key == first || key == second {
            if let Some(hit) = existing.clone().find(|k| breaks_pair(k, first, second)) {
                return Some((hit.to_string(), first, second));
            }
        } else if breaks_pair(key, first, second) {
            return Some((key.to_string(), first, second));
        }
    }
    None
}

/// `key` sorts generically between the pair's members without an
/// override entry of its own.
fn breaks_pair(key: &str, first: &str, second: &str) -> bool {
    if key == first || key == second {
        return false;
    }
    generic_compare(second, key) == Ordering::Less
        && generic_compare(key, first) == Ordering::Less
        && override_for(first, key) != Some(Ordering::Less)
}
