#![allow(missing_docs)]

use std::sync::Arc;
use slack_di::{Component, Container, Params, Provider};

#[derive(Component)]
struct Transport;

#[derive(Component)]
struct Mailer {
    transport: Arc<Transport>,
    #[component(name = "mail_from")]
    from: String,
    #[component(default)]
    retries: u32,
    signature: Option<String>,
    audit: Option<Arc<Transport>>,
}

fn main() {
    assert_eq!(<Mailer as Component>::PARAMS.len(), 5);
    assert_eq!(<Mailer as Component>::PARAMS[1].name(), "mail_from");
    assert!(<Mailer as Component>::PARAMS[2].has_default());

    let container = Container::new();
    container.register_component::<Transport>("transport");
    container.register("mail_from", Provider::value(String::from("noreply@local")));

    let mailer = container
        .apply(&slack_di::class::<Mailer>(), Params::new())
        .unwrap()
        .downcast::<Mailer>()
        .unwrap();

    assert!(Arc::ptr_eq(&mailer.transport, &container.provide::<Transport>("transport").unwrap()));
    assert_eq!(mailer.from, "noreply@local");
    assert_eq!(mailer.retries, 0);
    assert!(mailer.signature.is_none());
    assert!(mailer.audit.is_none());
}
