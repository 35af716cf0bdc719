#![no_main]

use hocon::{ConfigOptions, document};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|s: String| {
    if let Ok(doc) = document::parse_string(&s, ConfigOptions::default()) {
        let _ = document::resolve(doc);
    }
});
