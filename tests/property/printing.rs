use cadr::{display_format, read_str, write_format, SymbolTable};
use proptest::prelude::*;

use crate::property::strategies::arb_datum;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn written_form_reads_back(datum in arb_datum()) {
        let text = write_format(&datum);
        let mut symbols = SymbolTable::new();
        let back = read_str(&text, &mut symbols).unwrap();
        prop_assert_eq!(back, datum, "written as {}", text);
    }

    #[test]
    fn printing_is_deterministic(datum in arb_datum()) {
        prop_assert_eq!(write_format(&datum), write_format(&datum));
        prop_assert_eq!(display_format(&datum), display_format(&datum));
    }
}
