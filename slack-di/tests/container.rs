#![allow(missing_docs)]

use std::sync::Arc;
use slack_di::{
    Component, Container, DEFAULT_GROUP, Func, Param, Params, Provider,
    class,
    error::Error,
};

#[derive(Component)]
struct C;

#[derive(Component)]
struct D {
    c: Arc<C>,
}

#[derive(Component)]
struct E {
    d: Arc<D>,
    c: Arc<C>,
}

#[derive(Component)]
struct A {
    #[allow(dead_code)]
    b: Arc<B>,
}

#[derive(Component)]
struct B {
    #[allow(dead_code)]
    a: Arc<A>,
}

fn container() -> Container {
    let container = Container::new();
    container.register_component::<C>("c");
    container.register_component::<D>("d");
    container.register_component::<E>("e");
    container
}

#[test]
fn it_returns_the_same_instance_per_name() {
    let container = Container::new();
    container.register_component::<C>("c");

    let c1 = container.provide::<C>("c").unwrap();
    let c2 = container.provide::<C>("c").unwrap();

    assert!(Arc::ptr_eq(&c1, &c2));
}

#[test]
fn it_constructs_a_new_instance_after_reset() {
    let container = Container::new();
    container.register_component::<C>("c");

    let c1 = container.provide::<C>("c").unwrap();
    container.reset(DEFAULT_GROUP);
    let c2 = container.provide::<C>("c").unwrap();

    assert!(!Arc::ptr_eq(&c1, &c2));
}

#[test]
fn it_wires_dependencies_by_name() {
    let container = Container::new();
    container.register_component::<D>("d");
    container.register_component::<C>("c");

    let d = container.provide::<D>("d").unwrap();

    assert!(Arc::ptr_eq(&d.c, &container.provide::<C>("c").unwrap()));
}

#[test]
fn it_resets_only_the_given_group() {
    let container = Container::new();
    container.register_component::<D>("d");
    container.register_in("c", class::<C>(), "test");

    let d1 = container.provide::<D>("d").unwrap();
    let c1 = container.provide::<C>("c").unwrap();
    assert!(Arc::ptr_eq(&d1.c, &c1));

    container.reset("test");
    let d2 = container.provide::<D>("d").unwrap();
    let c2 = container.provide::<C>("c").unwrap();

    assert!(!Arc::ptr_eq(&c2, &c1));
    assert!(Arc::ptr_eq(&d2, &d1));
}

#[test]
fn it_injects_all_requested_dependencies() {
    let container = Container::with_providers([("d", Provider::from(class::<D>())), ("c", Provider::from(class::<C>()))]);

    let factory = container.inject(class::<E>(), &["d", "c"]).unwrap();
    let f1 = factory.call_with(Params::new()).unwrap().downcast::<E>().unwrap();

    assert!(Arc::ptr_eq(&f1.d.c, &f1.c));
}

#[test]
fn it_leaves_uninjected_parameters_to_the_caller() {
    let container = Container::with_providers([("d", Provider::from(class::<D>())), ("c", Provider::from(class::<C>()))]);

    let factory = container.inject(class::<E>(), &["d"]).unwrap();

    assert!(matches!(
        factory.call_with(Params::new()),
        Err(Error::ParameterMissing { ref param, .. }) if param == "c"
    ));

    let f2 = factory
        .call_with(Params::new().with("c", C))
        .unwrap()
        .downcast::<E>()
        .unwrap();
    let f3 = factory
        .call_with(Params::new().with("c", C))
        .unwrap()
        .downcast::<E>()
        .unwrap();

    assert!(!Arc::ptr_eq(&f2.d.c, &f2.c));
    assert!(!Arc::ptr_eq(&f2.c, &f3.c));
    assert!(Arc::ptr_eq(&f2.d, &f3.d));
}

#[test]
fn it_applies_functions_with_explicit_params_first() {
    let container = container();
    let same_c = Func::new("fn", [Param::required("c"), Param::required("d")], |args| {
        let c = args.get::<C>("c")?;
        let d = args.get::<D>("d")?;
        Ok(Arc::ptr_eq(&c, &d.c))
    });

    let resolved = container.apply(&same_c, Params::new()).unwrap();
    let explicit = container.apply(&same_c, Params::new().with("c", C)).unwrap();

    assert!(*resolved.downcast::<bool>().unwrap());
    assert!(!*explicit.downcast::<bool>().unwrap());
}

#[test]
fn it_requires_unresolvable_parameters_without_default() {
    let container = container();
    let needs_f = Func::new(
        "fn",
        [Param::required("c"), Param::required("d"), Param::required("e"), Param::required("f")],
        |_| Ok(true),
    );

    let err = container.apply(&needs_f, Params::new()).unwrap_err();
    assert!(matches!(err, Error::ParameterMissing { ref param, ref callable } if param == "f" && callable == "fn"));

    let explicit_none = container.apply(&needs_f, Params::new().with("f", Option::<()>::None));
    assert!(explicit_none.is_ok());
}

#[test]
fn it_uses_defaults_for_unresolvable_parameters() {
    let container = container();
    let defaults_f = Func::new(
        "fn",
        [Param::required("c"), Param::required("d"), Param::required("e"), Param::optional("f")],
        |args| Ok(args.contains("f")),
    );

    let result = container.apply(&defaults_f, Params::new()).unwrap();

    assert!(!*result.downcast::<bool>().unwrap());
}

#[test]
fn it_registers_through_a_registrant() {
    let container = Container::new();

    let provide_c = container
        .registrant("c")
        .register(Func::new("provide_c", [], |_| Ok(true)));

    assert!(*container.provide::<bool>("c").unwrap());
    assert_eq!(slack_di::Callable::name(&provide_c), "provide_c");
}

#[test]
fn it_lets_callers_override_injected_dependencies() {
    let container = Container::with_providers([("d", Provider::from(class::<D>())), ("c", Provider::from(class::<C>()))]);
    let factory = container.inject(class::<E>(), &["d"]).unwrap();
    let mine = Arc::new(D { c: Arc::new(C) });

    let e = factory
        .call_with(Params::new().with_shared("d", mine.clone()).with("c", C))
        .unwrap()
        .downcast::<E>()
        .unwrap();

    assert!(Arc::ptr_eq(&e.d, &mine));
    assert!(!Arc::ptr_eq(&e.d, &container.provide::<D>("d").unwrap()));
}

#[test]
fn it_detects_circular_dependencies() {
    let container = Container::new();
    container.register_component::<A>("a");
    container.register_component::<B>("b");

    let err = container.provide::<A>("a").err().unwrap();

    assert!(matches!(err, Error::CircularDependency { ref name, ref chain } if name == "a" && chain == &["a", "b", "a"]));
    assert!(!container.accessed("a"));
    assert!(!container.accessed("b"));
}

#[test]
fn it_recovers_after_breaking_a_cycle() {
    let container = Container::new();
    container.register_component::<A>("a");
    container.register_component::<B>("b");

    assert!(container.provide::<A>("a").is_err());

    container.register("b", Func::new("b", [], |_| Ok(())));
    container.register("a", Func::new("a", [Param::required("b")], |args| {
        args.get::<()>("b").map(|_| ())
    }));

    assert!(container.provide::<()>("a").is_ok());
}

#[test]
fn it_fails_on_unknown_names() {
    let container = container();

    assert!(matches!(container.provide::<C>("unknown"), Err(Error::ComponentNotRegistered(_))));
    assert!(matches!(container.get::<C>("unknown"), Err(Error::AttributeNotRegistered(_))));
}

#[test]
fn it_reads_registered_names_through_get() {
    let container = container();

    let e = container.get::<E>("e").unwrap();

    assert!(Arc::ptr_eq(&e.c, &container.get::<C>("c").unwrap()));
    assert!(Arc::ptr_eq(&e.d.c, &e.c));
}

#[test]
fn it_overrides_constructor_params_from_config() {
    let container = container();
    container.config([("d_c", slack_di::Setting::value(C))]);

    let d = container.provide::<D>("d").unwrap();

    assert!(!Arc::ptr_eq(&d.c, &container.provide::<C>("c").unwrap()));
}

#[test]
fn it_substitutes_test_doubles_by_name() {
    #[derive(Component)]
    struct Clock {
        #[component(default)]
        now: u64,
    }

    #[derive(Component)]
    struct Scheduler {
        clock: Arc<Clock>,
    }

    let container = Container::new();
    container.register_component::<Scheduler>("scheduler");
    container.register("clock", Provider::value(Clock { now: 42 }));

    let scheduler = container.provide::<Scheduler>("scheduler").unwrap();

    assert_eq!(scheduler.clock.now, 42);
}
