#![allow(missing_docs)]

use slack_di::Component;

#[derive(Component)]
struct Empty {}

#[derive(Component)]
struct Marker;

fn main() {
    assert!(<Empty as Component>::PARAMS.is_empty());
    assert!(<Marker as Component>::PARAMS.is_empty());
}
