#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use slack_di::Container;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    json: &'a str,
    name: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let container = Container::new();
    if container.config_json(input.json).is_ok() {
        let _ = container.get_instance(input.name);
        container.reset(slack_di::DEFAULT_GROUP);
    }
});
