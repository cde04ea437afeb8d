// Unit tests against the public API

mod list {
    include!("list.rs");
}

mod printer {
    include!("printer.rs");
}

mod value {
    include!("value.rs");
}
