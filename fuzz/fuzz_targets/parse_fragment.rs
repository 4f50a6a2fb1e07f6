#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let root = html::parse_fragment(&input);
    let serialized = html::to_html(&root);
    // Serialized output must itself parse without panicking.
    let _ = html::parse_fragment(&serialized);
});
