use cadr::list::{append, distinct, iter, length, list_tail, list_to_vec, reverse, reverse_in_place};
use cadr::value::list;
use proptest::prelude::*;

use crate::property::strategies::{arb_elements, arb_list};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn reverse_twice_is_identity(lst in arb_list()) {
        let snapshot = list(list_to_vec(&lst).unwrap());
        let twice = reverse(&reverse(&lst).unwrap()).unwrap();
        prop_assert_eq!(&twice, &lst);
        prop_assert_eq!(&lst, &snapshot);
    }

    #[test]
    fn reverse_in_place_matches_reverse(elements in arb_elements()) {
        let lst = list(elements.clone());
        let expected = reverse(&lst).unwrap();
        let pairs: Vec<_> = (0..elements.len())
            .map(|i| list_tail(&lst, i as i64).unwrap())
            .collect();
        let reversed = reverse_in_place(&lst).unwrap();
        prop_assert_eq!(&reversed, &expected);
        // Every pair of the result was a pair of the input.
        for (i, _) in elements.iter().enumerate() {
            let cell = list_tail(&reversed, i as i64).unwrap();
            prop_assert!(pairs.iter().any(|p| p.is_eq(&cell)));
        }
    }

    #[test]
    fn append_length_and_sharing(a in arb_elements(), b in arb_elements()) {
        let (la, lb) = (list(a.clone()), list(b.clone()));
        let joined = append(&[la.clone(), lb.clone()]).unwrap();
        prop_assert_eq!(length(&joined).unwrap(), a.len() + b.len());
        prop_assert!(list_tail(&joined, a.len() as i64).unwrap().is_eq(&lb));
        // The leading argument is copied, never linked in.
        if !a.is_empty() {
            prop_assert!(!joined.is_eq(&la));
        }
        prop_assert_eq!(length(&la).unwrap(), a.len());
    }

    #[test]
    fn distinct_is_duplicate_free_subset(elements in arb_elements()) {
        let lst = list(elements.clone());
        let unique: Vec<_> = iter(&distinct(&lst).unwrap()).collect();
        for (i, x) in unique.iter().enumerate() {
            prop_assert!(elements.contains(x));
            prop_assert!(!unique[i + 1..].contains(x));
        }
        for x in &elements {
            prop_assert!(unique.contains(x));
        }
    }
}
