use multi_release::config::DepsConfig;
use multi_release::domain::{
    get_pre_release_tag, get_version_from_tag, next_pre_version, next_version,
    resolve_next_version, BumpStrategy, NextType, RangePrefix, ReleaseStrategy, ReleaseType,
};
use multi_release::graph::PackageGraph;
use multi_release::package::{DependencyScope, Manifest, Package};
use multi_release::resolver::ReleaseResolver;

/// a depends on b, c and d; b does not release, c is minor, d is major.
fn fan_out() -> PackageGraph {
    let a = Manifest::named("a")
        .with_dependency(DependencyScope::Dependencies, "b", "1.0.0")
        .with_dependency(DependencyScope::Dependencies, "c", "1.0.0")
        .with_dependency(DependencyScope::DevDependencies, "d", "~1.0.0");

    PackageGraph::new(vec![
        Package::new("a", a).with_last_release("1.0.0"),
        Package::new("b", Manifest::named("b"))
            .with_last_release("1.0.0")
            .with_next_type(NextType::NoRelease),
        Package::new("c", Manifest::named("c"))
            .with_last_release("1.0.0")
            .with_next_type(ReleaseType::Minor),
        Package::new("d", Manifest::named("d"))
            .with_last_release("1.0.0")
            .with_next_type(ReleaseType::Major),
    ])
    .unwrap()
}

#[test]
fn test_inherit_release_strategy_picks_major() {
    let graph = fan_out();
    let a = graph.id_of("a").unwrap();
    let config = DepsConfig {
        release: ReleaseStrategy::Inherit,
        ..DepsConfig::default()
    };

    let mut resolver = ReleaseResolver::new(&graph, config);
    assert_eq!(
        resolver.resolve_release_type(a),
        NextType::Release(ReleaseType::Major)
    );
}

#[test]
fn test_override_with_caret_prefix() {
    let graph = fan_out();
    let a = graph.id_of("a").unwrap();
    let config = DepsConfig {
        bump: BumpStrategy::Override,
        release: ReleaseStrategy::Patch,
        prefix: RangePrefix::Caret,
    };

    let resolution = ReleaseResolver::new(&graph, config).resolve_all();
    let manifest = resolution.manifest(a);
    assert_eq!(
        manifest.dependency(DependencyScope::Dependencies, "c"),
        Some("^1.1.0")
    );
    assert_eq!(
        manifest.dependency(DependencyScope::Dependencies, "b"),
        Some("1.0.0")
    );
    assert_eq!(
        manifest.dependency(DependencyScope::DevDependencies, "d"),
        Some("^2.0.0")
    );
    assert_eq!(resolution.next_type(a), NextType::Release(ReleaseType::Patch));
}

#[test]
fn test_resolving_twice_is_stable() {
    let graph = fan_out();
    let a = graph.id_of("a").unwrap();
    let mut resolver = ReleaseResolver::new(&graph, DepsConfig::default());

    let first = resolver.resolve_release_type(a);
    let second = resolver.resolve_release_type(a);
    assert_eq!(first, second);

    let resolution = resolver.finish();
    assert_eq!(resolution.changed_ranges(a).len(), 2);
}

#[test]
fn test_three_package_cycle_terminates() {
    let graph = PackageGraph::new(vec![
        Package::new(
            "a",
            Manifest::named("a").with_dependency(DependencyScope::Dependencies, "b", "1.0.0"),
        )
        .with_last_release("1.0.0"),
        Package::new(
            "b",
            Manifest::named("b").with_dependency(DependencyScope::Dependencies, "c", "1.0.0"),
        )
        .with_last_release("1.0.0"),
        Package::new(
            "c",
            Manifest::named("c").with_dependency(DependencyScope::PeerDependencies, "a", "1.0.0"),
        )
        .with_last_release("1.0.0")
        .with_next_type(ReleaseType::Minor),
    ])
    .unwrap();

    let resolution = ReleaseResolver::new(&graph, DepsConfig::default()).resolve_all();
    for name in ["a", "b", "c"] {
        let id = graph.id_of(name).unwrap();
        assert!(resolution.next_type(id).is_release(), "{} should release", name);
    }
    assert_eq!(resolution.cycles().len(), 1);
}

/// a depends on b and c, which both depend on d.
fn diamond() -> PackageGraph {
    let on = |name: &str, deps: &[&str]| {
        deps.iter().fold(Manifest::named(name), |m, dep| {
            m.with_dependency(DependencyScope::Dependencies, *dep, "1.0.0")
        })
    };

    PackageGraph::new(vec![
        Package::new("a", on("a", &["b", "c"])).with_last_release("1.0.0"),
        Package::new("b", on("b", &["d"])).with_last_release("1.0.0"),
        Package::new("c", on("c", &["d"])).with_last_release("1.0.0"),
        Package::new("d", on("d", &[]))
            .with_last_release("1.0.0")
            .with_next_type(ReleaseType::Major),
    ])
    .unwrap()
}

#[test]
fn test_diamond_dependency_resolved_once() {
    let graph = diamond();
    let config = DepsConfig {
        release: ReleaseStrategy::Inherit,
        ..DepsConfig::default()
    };

    let mut resolver = ReleaseResolver::new(&graph, config);
    let a = graph.id_of("a").unwrap();
    assert_eq!(
        resolver.resolve_release_type(a),
        NextType::Release(ReleaseType::Major)
    );

    let resolution = resolver.finish();
    // reaching d a second time through c is not a cycle
    assert!(resolution.cycles().is_empty());

    for name in ["b", "c"] {
        let id = graph.id_of(name).unwrap();
        assert_eq!(resolution.next_type(id), NextType::Release(ReleaseType::Major));
        assert_eq!(
            resolution
                .manifest(id)
                .dependency(DependencyScope::Dependencies, "d"),
            Some("2.0.0"),
            "{} should follow d",
            name
        );
    }

    let d = graph.id_of("d").unwrap();
    assert_eq!(resolution.next_version(d).as_deref(), Some("2.0.0"));
    assert!(resolution.changed_ranges(d).is_empty());
    assert_eq!(resolution.next_version(a).as_deref(), Some("2.0.0"));
}

#[test]
fn test_range_properties() {
    assert_eq!(
        resolve_next_version("^1.0.0", "1.0.1", BumpStrategy::Satisfy, RangePrefix::Exact),
        "^1.0.0"
    );
    assert_eq!(
        resolve_next_version("workspace:*", "1.3.0", BumpStrategy::Satisfy, RangePrefix::Exact),
        "*"
    );
    assert_eq!(
        resolve_next_version("1.2.x", "1.3.0", BumpStrategy::Inherit, RangePrefix::Exact),
        "1.3.x"
    );
}

#[test]
fn test_version_properties() {
    assert_eq!(next_version(Some("1.0.0-dev.1"), ReleaseType::Patch.into()), "1.0.0");
    assert_eq!(
        next_pre_version(Some("1.0.0-dev.0"), ReleaseType::Major.into(), "dev"),
        "1.0.0-dev.1"
    );
    assert_eq!(get_pre_release_tag(Some("2.0.0-beta.3")), Some("beta".to_string()));
}

#[test]
fn test_tag_properties() {
    assert_eq!(
        get_version_from_tag(Some("app"), Some("app@1.0.0-dev.1")),
        Some("1.0.0-dev.1".to_string())
    );
    assert_eq!(get_version_from_tag(Some("abc"), Some("1.0.x-rc.0")), None);
}
