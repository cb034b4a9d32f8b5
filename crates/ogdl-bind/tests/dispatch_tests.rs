//! Dispatch integration tests
//!
//! Field access, exact and widened method resolution, failure values and
//! concurrent calls through `LocalFunction`.
//!
//! # Running Tests
//! ```bash
//! cargo test -p ogdl-bind --test dispatch_tests
//! ```

use std::sync::Arc;
use std::thread;

use ogdl_bind::{
    BindOptions, ClassDescriptor, ClassRegistry, CollectingSink, DiagnosticSink, DispatchError,
    FailureKind, InvokeError, LocalFunction, ParamType, Severity,
};
use ogdl_graph::{Graph, GraphNode, ObjectRef, Value};

struct Greeter {
    greeting: String,
}

#[derive(Default)]
struct Calc {
    total: i64,
}

struct Overloads;

struct Point {
    x: f64,
    y: f64,
}

fn registry() -> Arc<ClassRegistry> {
    let mut registry = ClassRegistry::new();

    registry.register(
        ClassDescriptor::builder::<Greeter>("demo.Greeter")
            .constructor(|| {
                Ok(Greeter {
                    greeting: "hi".to_string(),
                })
            })
            .field("greeting", |g| Value::Str(g.greeting.clone()))
            .method0("greeting", |_g| Ok("from method"))
            .method0("hello", |_g| Ok("hello"))
            .method1("greet", |g, who: String| Ok(format!("{}, {}", g.greeting, who)))
            .method1("welcome", |g, who: Option<String>| {
                let who = who.unwrap_or_else(|| "stranger".to_string());
                Ok(format!("{}, {}", g.greeting, who))
            })
            .build()
            .unwrap(),
    );

    registry.register(
        ClassDescriptor::builder::<Calc>("demo.Calc")
            .constructor(|| Ok(Calc::default()))
            .field("total", |c| Value::Long(c.total))
            .method2("add", |_c, a: i64, b: i64| Ok(a + b))
            .method2("add", |_c, a: f64, b: f64| Ok(a + b))
            .method1("accumulate", |c, n: i64| {
                c.total += n;
                Ok(c.total)
            })
            .method2("div", |_c, a: i64, b: i64| {
                if b == 0 {
                    Err(InvokeError::failed("division by zero"))
                } else {
                    Ok(a / b)
                }
            })
            .method0("panic", |_c| -> Result<(), InvokeError> { panic!("calculator on fire") })
            .build()
            .unwrap(),
    );

    registry.register(
        ClassDescriptor::builder::<Overloads>("demo.Overloads")
            .constructor(|| Ok(Overloads))
            .method1("f", |_o, _i: i32| Ok("f(int)"))
            .method1("f", |_o, _v: Value| Ok("f(object)"))
            .method1("g", |_o, _v: Value| Ok("g(object)"))
            .method1("g", |_o, _l: i64| Ok("g(long)"))
            .method1("h", |_o, _n: Graph| Ok("h(node)"))
            .method1("h", |_o, _v: Value| Ok("h(object)"))
            .build()
            .unwrap(),
    );

    registry.register(
        ClassDescriptor::builder::<Point>("demo.Point")
            .constructor(|| Ok(Point { x: 0.0, y: 0.0 }))
            .extends("demo.Shape")
            .build()
            .unwrap(),
    );

    registry.register(
        ClassDescriptor::builder::<Overloads>("demo.Canvas")
            .constructor(|| Ok(Overloads))
            .method("area", &[ParamType::class("demo.Shape")], |_c, args| {
                let shape = args.get::<ObjectRef>(0)?;
                let point = shape
                    .downcast_ref::<Point>()
                    .ok_or_else(|| InvokeError::failed("not a point"))?;
                Ok(Value::Double(point.x * point.y))
            })
            .build()
            .unwrap(),
    );

    Arc::new(registry)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn call(name: &str, args: &[&str]) -> Graph {
    Graph::new(name).with_leaves(args.iter().copied())
}

// ===== Method invocation =====

#[test]
fn test_zero_argument_method() {
    init_logging();
    let greeter = LocalFunction::new(registry(), "demo.Greeter", None);
    assert_eq!(greeter.invoke(&call("hello", &[])), Ok(Value::Str("hello".into())));
}

#[test]
fn test_method_with_arguments() {
    let greeter = LocalFunction::new(registry(), "demo.Greeter", None);
    assert_eq!(
        greeter.invoke(&call("greet", &["'bob'"])),
        Ok(Value::Str("hi, bob".into()))
    );
}

#[test]
fn test_overloads_selected_by_argument_type() {
    let calc = LocalFunction::new(registry(), "demo.Calc", None);
    assert_eq!(calc.invoke(&call("add", &["2", "3"])), Ok(Value::Long(5)));
    assert_eq!(calc.invoke(&call("add", &["2.5", "0.5"])), Ok(Value::Double(3.0)));
}

#[test]
fn test_instance_state_persists_between_calls() {
    let calc = LocalFunction::new(registry(), "demo.Calc", None);
    calc.invoke(&call("accumulate", &["4"])).unwrap();
    calc.invoke(&call("accumulate", &["6"])).unwrap();
    assert_eq!(calc.invoke(&call("total", &[])), Ok(Value::Long(10)));
}

#[test]
fn test_null_argument_reaches_optional_parameter() {
    let greeter = LocalFunction::new(registry(), "demo.Greeter", None);
    assert_eq!(
        greeter.invoke(&call("welcome", &["null"])),
        Ok(Value::Str("hi, stranger".into()))
    );
    assert_eq!(
        greeter.invoke(&call("welcome", &["'ann'"])),
        Ok(Value::Str("hi, ann".into()))
    );
}

// ===== Field access =====

#[test]
fn test_field_access_precedes_method() {
    let greeter = LocalFunction::new(registry(), "demo.Greeter", None);
    assert_eq!(greeter.invoke(&call("greeting", &[])), Ok(Value::Str("hi".into())));
}

#[test]
fn test_field_access_can_be_disabled() {
    let greeter = LocalFunction::builder(registry(), "demo.Greeter")
        .options(BindOptions::default().with_field_access(false))
        .build();
    assert_eq!(
        greeter.invoke(&call("greeting", &[])),
        Ok(Value::Str("from method".into()))
    );
}

#[test]
fn test_field_name_with_arguments_is_a_method_call() {
    let greeter = LocalFunction::new(registry(), "demo.Greeter", None);
    let err = greeter.invoke(&call("greeting", &["1"])).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Resolution);
}

// ===== Resolution =====

#[test]
fn test_fallback_picks_first_admissible_in_declaration_order() {
    let o = LocalFunction::new(registry(), "demo.Overloads", None);
    // no f(long): f(int) is not admissible for long, f(object) is
    assert_eq!(o.invoke(&call("f", &["7"])), Ok(Value::Str("f(object)".into())));
    // no f(boolean) either
    assert_eq!(o.invoke(&call("f", &["true"])), Ok(Value::Str("f(object)".into())));
}

#[test]
fn test_exact_match_wins_over_declaration_order() {
    let o = LocalFunction::new(registry(), "demo.Overloads", None);
    assert_eq!(o.invoke(&call("g", &["7"])), Ok(Value::Str("g(long)".into())));
    assert_eq!(o.invoke(&call("g", &["'s'"])), Ok(Value::Str("g(object)".into())));
}

#[test]
fn test_unreduced_node_argument() {
    let o = LocalFunction::new(registry(), "demo.Overloads", None);
    let node_call = Graph::new("h").with_child(Graph::new("pt").with_leaves(["1", "2"]));
    assert_eq!(o.invoke(&node_call), Ok(Value::Str("h(node)".into())));
}

#[test]
fn test_class_arguments_follow_supertypes() {
    let canvas = LocalFunction::builder(registry(), "demo.Canvas")
        .evaluator(Arc::new(|node: &dyn GraphNode| match node.name() {
            "p" => Value::Object(ObjectRef::new("demo.Point", Point { x: 2.0, y: 3.0 })),
            other => Value::Str(other.to_string()),
        }))
        .build();

    assert_eq!(canvas.invoke(&call("area", &["p"])), Ok(Value::Double(6.0)));
}

// ===== Failures =====

#[test]
fn test_undefined_method_returns_descriptive_failure() {
    let calc = LocalFunction::new(registry(), "demo.Calc", None);
    let err = calc.invoke(&call("mul", &["2", "3.5"])).unwrap_err();

    assert_eq!(
        err,
        DispatchError::NoSuchMethod {
            name: "mul".to_string(),
            arg_types: vec![ParamType::Long, ParamType::Double],
            class: "demo.Calc".to_string(),
        }
    );

    let rendered = calc.exec(&call("mul", &["2", "3.5"]));
    assert_eq!(
        rendered,
        Value::Str("No method mul(long,double) found in class demo.Calc".into())
    );
}

#[test]
fn test_wrong_arity_is_a_resolution_failure() {
    let calc = LocalFunction::new(registry(), "demo.Calc", None);
    let err = calc.invoke(&call("add", &["1"])).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Resolution);
}

#[test]
fn test_invocation_failure_is_distinguishable() {
    let calc = LocalFunction::new(registry(), "demo.Calc", None);
    let err = calc.invoke(&call("div", &["1", "0"])).unwrap_err();

    assert_eq!(err.kind(), FailureKind::Invocation);
    assert_eq!(
        err,
        DispatchError::Invocation {
            signature: "demo.Calc.div(long,long)".to_string(),
            source: InvokeError::failed("division by zero"),
        }
    );
    assert_eq!(calc.invoke(&call("div", &["9", "3"])), Ok(Value::Long(3)));
}

#[test]
fn test_panic_in_native_method_is_contained() {
    let calc = LocalFunction::new(registry(), "demo.Calc", None);
    let err = calc.invoke(&call("panic", &[])).unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Invocation {
            source: InvokeError::Panic(ref msg),
            ..
        } if msg == "calculator on fire"
    ));
    // the instance lock is released and the component keeps working
    assert_eq!(calc.invoke(&call("add", &["1", "1"])), Ok(Value::Long(2)));
}

#[test]
fn test_failures_are_reported_to_sink() {
    let sink = Arc::new(CollectingSink::new());
    let calc = LocalFunction::builder(registry(), "demo.Calc")
        .sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink>)
        .build();

    calc.exec(&call("nope", &[]));
    calc.exec(&call("div", &["1", "0"]));
    calc.exec(&call("add", &["1", "2"]));

    let reported = sink.diagnostics();
    let kinds: Vec<FailureKind> = reported.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![FailureKind::Resolution, FailureKind::Invocation]);
    assert!(reported.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn test_evaluator_panic_is_returned_as_failure() {
    let sink = Arc::new(CollectingSink::new());
    let calc = LocalFunction::builder(registry(), "demo.Calc")
        .evaluator(Arc::new(|node: &dyn GraphNode| {
            if node.name() == "boom" {
                panic!("evaluator on fire");
            }
            Value::Long(1)
        }))
        .sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink>)
        .build();

    let err = calc.invoke(&call("add", &["1", "boom"])).unwrap_err();
    assert_eq!(
        err,
        DispatchError::Evaluation {
            name: "add".to_string(),
            index: 1,
            source: InvokeError::Panic("evaluator on fire".to_string()),
        }
    );
    assert_eq!(err.kind(), FailureKind::Evaluation);
    assert_eq!(sink.len(), 1);

    // the component keeps answering calls
    assert_eq!(calc.invoke(&call("add", &["x", "y"])), Ok(Value::Long(2)));
}

#[test]
fn test_argument_bound_is_configurable() {
    let calc = LocalFunction::builder(registry(), "demo.Calc")
        .options(BindOptions::default().with_max_args(1))
        .build();

    assert_eq!(
        calc.invoke(&call("add", &["1", "2"])),
        Err(DispatchError::TooManyArguments {
            name: "add".to_string(),
            given: 2,
            max: 1,
        })
    );
    assert_eq!(calc.invoke(&call("accumulate", &["1"])), Ok(Value::Long(1)));
}

// ===== Concurrency =====

#[test]
fn test_concurrent_calls_are_serialized() {
    init_logging();
    let calc = Arc::new(LocalFunction::new(registry(), "demo.Calc", None));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let calc = Arc::clone(&calc);
            thread::spawn(move || {
                for _ in 0..100 {
                    calc.invoke(&call("accumulate", &["1"])).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(calc.invoke(&call("total", &[])), Ok(Value::Long(800)));
}
