// Integration tests: reader, ports and the inlining pipeline together

mod inlining {
    include!("inlining.rs");
}

mod reader_cache {
    include!("reader_cache.rs");
}

mod scoped_ports {
    include!("scoped_ports.rs");
}
