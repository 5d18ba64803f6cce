#![no_main]

use libfuzzer_sys::fuzz_target;
use slack_di::SymbolPath;

fuzz_target!(|data: &str| {
    if let Ok(path) = SymbolPath::parse(data) {
        assert!(!path.module().is_empty());
        assert!(!path.symbol().is_empty());
        assert_eq!(path.to_string(), data);
    }
});
