// Property-based tests

mod strategies;

mod list_laws {
    include!("list_laws.rs");
}

mod printing {
    include!("printing.rs");
}
