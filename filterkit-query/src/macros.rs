//! Criteria construction macros.
//!
//! ```rust
//! use filterkit_query::{criteria, group};
//! use filterkit_query::compile::Criteria;
//!
//! let g = group! { "age_gte" => 18, "status" => "active" };
//! assert_eq!(g.len(), 2);
//!
//! let single = criteria! { "age_gte" => 18 };
//! assert!(matches!(single, Criteria::Group(_)));
//!
//! let either = criteria!(or { "status" => "open" }, { "priority_gt" => 3 });
//! assert!(matches!(either, Criteria::GroupList(ref groups) if groups.len() == 2));
//! ```

/// Build a [`Group`](crate::compile::Group) from `key => value` pairs.
#[macro_export]
macro_rules! group {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut group = $crate::compile::Group::new();
        $(
            group.insert($key, $value);
        )*
        group
    }};
}

/// Build [`Criteria`](crate::compile::Criteria).
///
/// - `criteria! { k => v, ... }` - a single AND group
/// - `criteria!(or { ... }, { ... })` - groups combined with OR
#[macro_export]
macro_rules! criteria {
    (or $({ $($key:expr => $value:expr),* $(,)? }),+ $(,)?) => {
        $crate::compile::Criteria::GroupList(vec![$($crate::group!($($key => $value),*)),+])
    };
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::compile::Criteria::Group($crate::group!($($key => $value),*))
    };
}

#[cfg(test)]
mod tests {
    use crate::compile::{Criteria, Group};
    use crate::filter::FilterValue;

    #[test]
    fn test_group_macro() {
        let g = group! { "a" => 1, "b" => "x" };
        assert_eq!(g, Group::new().with("a", 1).with("b", "x"));
        assert!(group!().is_empty());
    }

    #[test]
    fn test_criteria_macro() {
        assert_eq!(criteria!(), Criteria::empty());

        let list = criteria!(or { "a" => 1 }, { "b" => true, "c" => FilterValue::Null });
        match list {
            Criteria::GroupList(groups) => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[1].len(), 2);
            }
            other => panic!("expected a group list, got {:?}", other),
        }
    }
}
