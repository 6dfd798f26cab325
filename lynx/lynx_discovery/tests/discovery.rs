//! Integration tests for lynx_discovery.

use std::any::Any;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use lynx_core::error::{ConstructionError, LoadError};
use lynx_core::types::{CapabilityRef, ClassDescriptor, ModuleExports, TypeMeta};
use lynx_core::CapabilityProvider;
use lynx_discovery::ModuleRepository;
use lynx_provider::{ModuleBlueprint, StaticProvider};

// Initialize tracing for tests
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Trait the constructed plugin instances are used through.
trait Transformer: Send + Sync {
    fn apply(&self, input: &str) -> String;
}

struct Lowercase;

impl Transformer for Lowercase {
    fn apply(&self, input: &str) -> String {
        input.to_lowercase()
    }
}

struct Prefixer {
    prefix: String,
}

impl Transformer for Prefixer {
    fn apply(&self, input: &str) -> String {
        format!("{}{}", self.prefix, input)
    }
}

fn lowercase_ctor(_args: &[Value]) -> Result<Box<dyn Any + Send + Sync>, ConstructionError> {
    Ok(Box::new(Box::new(Lowercase) as Box<dyn Transformer>))
}

fn prefixer_ctor(args: &[Value]) -> Result<Box<dyn Any + Send + Sync>, ConstructionError> {
    let prefix = match args {
        [value] => value
            .as_str()
            .ok_or_else(|| ConstructionError::ArgumentMismatch {
                class: "Text.Prefixer".into(),
                index: 0,
                reason: "expected a string".into(),
            })?,
        _ => {
            return Err(ConstructionError::ArityMismatch {
                class: "Text.Prefixer".into(),
                expected: 1,
                got: args.len(),
            })
        }
    };
    Ok(Box::new(Box::new(Prefixer {
        prefix: prefix.to_owned(),
    }) as Box<dyn Transformer>))
}

/// The scenario module: classes `A : I1`, `B : I1+I2`, `C` (no interfaces).
fn scenario_provider() -> (Arc<StaticProvider>, CapabilityRef, CapabilityRef) {
    let i1 = TypeMeta::interface("I1").namespace("Scenario").build();
    let i2 = TypeMeta::interface("I2").namespace("Scenario").build();
    let a = TypeMeta::class("A")
        .namespace("Scenario")
        .with_interface(&i1)
        .build();
    let b = TypeMeta::class("B")
        .namespace("Scenario")
        .with_interface(&i1)
        .with_interface(&i2)
        .build();
    let c = TypeMeta::class("C").namespace("Scenario").build();

    let provider = Arc::new(StaticProvider::new());
    provider.register(
        "scenario.lynx",
        ModuleBlueprint::new("scenario")
            .with_class(ClassDescriptor::new(a, None))
            .with_class(ClassDescriptor::new(b, None))
            .with_class(ClassDescriptor::new(c, None)),
    );
    (provider, i1, i2)
}

#[test]
fn test_end_to_end_scenario() {
    init_tracing();
    let (provider, i1, i2) = scenario_provider();
    let repository = ModuleRepository::new(provider);
    repository.load("scenario.lynx").unwrap();

    let with_i1: Vec<String> = repository
        .classes_with_capability(&i1)
        .iter()
        .map(|c| c.simple_name().to_owned())
        .collect();
    assert_eq!(with_i1, ["A", "B"]);

    let with_i2: Vec<String> = repository
        .classes_with_capability(&i2)
        .iter()
        .map(|c| c.simple_name().to_owned())
        .collect();
    assert_eq!(with_i2, ["B"]);

    assert_eq!(
        repository
            .first_class(None, Some("C"))
            .unwrap()
            .simple_name(),
        "C"
    );
    assert_eq!(
        repository
            .first_class(Some(&i1), Some("B"))
            .unwrap()
            .simple_name(),
        "B"
    );
    assert!(repository.first_class(Some(&i2), Some("A")).is_none());

    // Default matching is case-sensitive: folded lookups miss.
    assert!(repository.first_class(None, Some("c")).is_none());
    assert!(repository.first_class(None, Some("scenario.c")).is_none());
}

#[test]
fn test_cross_module_first_match_order() {
    let i1 = TypeMeta::interface("IShared").build();
    let m1_class = TypeMeta::class("FromM1").with_interface(&i1).build();
    let m2_class = TypeMeta::class("FromM2").with_interface(&i1).build();

    let provider = Arc::new(StaticProvider::new());
    provider.register(
        "m1.lynx",
        ModuleBlueprint::new("m1").with_class(ClassDescriptor::new(m1_class, None)),
    );
    provider.register(
        "m2.lynx",
        ModuleBlueprint::new("m2").with_class(ClassDescriptor::new(m2_class, None)),
    );

    let repository = ModuleRepository::new(provider);
    repository.load("m1.lynx").unwrap();
    repository.load("m2.lynx").unwrap();

    let first = repository.first_class(Some(&i1), None).unwrap();
    assert_eq!(first.simple_name(), "FromM1");

    let all = repository.classes_with_capability(&i1);
    let names: Vec<&str> = all.iter().map(|c| c.simple_name()).collect();
    assert_eq!(names, ["FromM1", "FromM2"]);
}

#[test]
fn test_concurrent_queries_observe_one_index() {
    // Deep-ish graph so the first build does real work.
    let i0 = TypeMeta::interface("IBase").build();
    let mut interfaces = Vec::new();
    for n in 0..16 {
        interfaces.push(
            TypeMeta::interface(format!("IExt{n}"))
                .with_interface(&i0)
                .build(),
        );
    }
    let mut builder = TypeMeta::class("Busy");
    for interface in &interfaces {
        builder = builder.with_interface(interface);
    }
    let class_type = builder.build();

    let provider = Arc::new(StaticProvider::new());
    provider.register(
        "busy.lynx",
        ModuleBlueprint::new("busy").with_class(ClassDescriptor::new(class_type, None)),
    );
    let repository = ModuleRepository::new(provider);
    let module = repository.load("busy.lynx").unwrap();
    let class = module.classes().next().unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert!(class.has_capability(&i0));
                    assert!(class.matches_name("IBase"));
                    assert!(class.matches_name("Busy"));
                    assert_eq!(class.all_interfaces().count(), 17);
                }
            });
        }
    });

    // Same answers after the hammering as a fresh single-threaded query.
    assert_eq!(class.all_interfaces().count(), 17);
    assert!(class.ancestors().is_empty());
}

#[test]
fn test_slow_load_does_not_block_readers() {
    struct SlowProvider {
        inner: StaticProvider,
    }

    impl CapabilityProvider for SlowProvider {
        fn load_module(&self, path: &str) -> Result<ModuleExports, LoadError> {
            thread::sleep(Duration::from_millis(400));
            self.inner.load_module(path)
        }
    }

    let inner = StaticProvider::new();
    inner.register("slow.lynx", ModuleBlueprint::new("slow"));
    let repository = Arc::new(ModuleRepository::new(Arc::new(SlowProvider { inner })));

    let loader = {
        let repository = Arc::clone(&repository);
        thread::spawn(move || repository.load("slow.lynx").map(|_| ()))
    };

    // Give the loader time to be inside the provider call.
    thread::sleep(Duration::from_millis(50));
    let started = Instant::now();
    let snapshot = repository.modules();
    assert!(snapshot.is_empty());
    assert!(started.elapsed() < Duration::from_millis(200));

    loader.join().unwrap().unwrap();
    assert_eq!(repository.len(), 1);
}

#[test]
fn test_one_liner_construction_flow() {
    let transform = TypeMeta::interface("ITransformer").namespace("Text").build();
    let lowercase = TypeMeta::class("Lowercase")
        .namespace("Text")
        .with_interface(&transform)
        .build();
    let prefixer = TypeMeta::class("Prefixer")
        .namespace("Text")
        .with_interface(&transform)
        .build();

    let provider = Arc::new(StaticProvider::new());
    provider.register(
        "text.lynx",
        ModuleBlueprint::new("text")
            .with_class(ClassDescriptor::new(lowercase, Some(Arc::new(lowercase_ctor))))
            .with_class(ClassDescriptor::new(prefixer, Some(Arc::new(prefixer_ctor)))),
    );
    let repository = ModuleRepository::new(provider);
    repository.load("text.lynx").unwrap();

    // load -> first by capability -> construct -> cast -> use.
    let instance = repository
        .first_class(Some(&transform), None)
        .unwrap()
        .create_instance_as(&transform, &[])
        .unwrap();
    let transformer = instance.downcast::<Box<dyn Transformer>>().unwrap();
    assert_eq!(transformer.apply("AAA"), "aaa");

    // Constructor arguments reach the entry point.
    let instance = repository
        .first_class(Some(&transform), Some("Prefixer"))
        .unwrap()
        .create_instance(&[json!(">> ")])
        .unwrap();
    let transformer = instance.downcast::<Box<dyn Transformer>>().unwrap();
    assert_eq!(transformer.apply("go"), ">> go");

    // Bad arity surfaces as a construction error, never a silent default.
    let err = repository
        .first_class(None, Some("Text.Prefixer"))
        .unwrap()
        .create_instance(&[])
        .unwrap_err();
    assert!(err.to_string().contains("expects 1 argument(s)"));
}

#[test]
fn test_every_construction_is_fresh() {
    let counter_type = TypeMeta::class("Counter").build();
    let provider = Arc::new(StaticProvider::new());
    provider.register(
        "counter.lynx",
        ModuleBlueprint::new("counter").with_class(ClassDescriptor::new(
            counter_type,
            Some(Arc::new(|_args: &[Value]| {
                Ok(Box::new(Vec::<u8>::new()) as Box<dyn Any + Send + Sync>)
            })),
        )),
    );
    let repository = ModuleRepository::new(provider);
    repository.load("counter.lynx").unwrap();
    let class = repository.first_class(None, Some("Counter")).unwrap();

    let first = class.create_instance(&[]).unwrap();
    let second = class.create_instance(&[]).unwrap();
    assert_ne!(first.id(), second.id());
}
