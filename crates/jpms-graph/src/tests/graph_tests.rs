//! Graph construction: fatal checks, edge order and exports.

use super::*;
use crate::{AddReads, EdgeOrigin, GraphError, ModuleKind, PackageGrant};

fn readable_names(graph: &ModuleGraph, reader: &str) -> Vec<String> {
    graph
        .readable(id(graph, reader))
        .map(|m| graph.name(m).to_string())
        .collect()
}

fn build_with(
    input: ProjectInput,
    add_reads: &[&str],
    exports: &[&str],
    limit: &[&str],
) -> crate::Result<ModuleGraph> {
    let universe = ModuleUniverse::from_input(input)?;
    let mut builder = ModuleGraph::builder(universe);
    for value in add_reads {
        builder = builder.add_reads([AddReads::parse(value)?]);
    }
    for value in exports {
        builder = builder.grants([PackageGrant::parse_exports(value)?]);
    }
    builder.limit_modules(limit.iter().map(|m| name(m))).build()
}

#[test]
fn readable_order_is_requires_then_add_reads_then_java_base() {
    let input = project(vec![
        java_base(),
        module("mod.c").build(),
        module("mod.b").build(),
        module("mod.a").requires("mod.b").build(),
    ]);
    let graph = build_with(input, &["mod.a=mod.c"], &[], &[]).expect("graph builds");

    assert_eq!(
        readable_names(&graph, "mod.a"),
        vec!["mod.a", "mod.b", "mod.c", "java.base"]
    );
    let origins: Vec<_> = graph
        .direct_reads(id(&graph, "mod.a"))
        .iter()
        .map(|(_, edge)| edge.origin)
        .collect();
    assert_eq!(
        origins,
        vec![EdgeOrigin::Requires, EdgeOrigin::AddReads, EdgeOrigin::Mandated]
    );
    assert_eq!(readable_names(&graph, "java.base"), vec!["java.base"]);
}

#[test]
fn requires_static_reads_at_compile_time() {
    let graph = build_graph(project(vec![
        module("mod.opt").exports("o").package("o", &["O"]).build(),
        module("mod.a").requires_static("mod.opt").build(),
    ]));
    assert!(graph.reads(id(&graph, "mod.a"), id(&graph, "mod.opt")));
    assert_eq!(
        graph.direct_reads(id(&graph, "mod.a"))[0].1.origin,
        EdgeOrigin::RequiresStatic
    );
}

#[test]
fn automatic_modules_read_everything_and_imply_each_other() {
    let graph = build_graph(project(vec![
        java_base(),
        jar("lib1.jar", &[("lib1", &["X"])]),
        jar("lib2-3.1.jar", &[("lib2", &["Y"])]),
        module("mod.a").requires("lib1").build(),
    ]));

    assert_eq!(graph.descriptor(id(&graph, "lib2")).kind, ModuleKind::Automatic);
    assert!(graph.reads(id(&graph, "mod.a"), id(&graph, "lib2")));
    assert_eq!(
        readable_names(&graph, "lib1"),
        vec!["lib1", "ALL-UNNAMED", "java.base", "lib2", "mod.a"]
    );
    assert!(graph.reads(ModuleId::UNNAMED, id(&graph, "mod.a")));
    assert!(!graph.reads(id(&graph, "mod.a"), ModuleId::UNNAMED));
}

#[test]
fn add_reads_all_unnamed_reads_the_class_path() {
    let graph = build_with(
        project(vec![module("mod.a").build()]),
        &["mod.a=ALL-UNNAMED"],
        &[],
        &[],
    )
    .expect("graph builds");
    assert!(graph.reads(id(&graph, "mod.a"), ModuleId::UNNAMED));
}

#[test]
fn requires_cycle_is_fatal_for_every_member() {
    let input = project(vec![
        module("mod.a").requires("mod.b").build(),
        module("mod.b").requires("mod.c").build(),
        module("mod.c").requires("mod.a").build(),
        module("mod.d").requires("mod.a").build(),
    ]);
    let universe = ModuleUniverse::from_input(input).expect("valid universe");
    let err = ModuleGraph::from_universe(universe).expect_err("cycle is fatal");

    let GraphError::RequiresCycle(cycles) = &err else {
        panic!("expected a cycle error, got {err}");
    };
    let pairs: Vec<_> = cycles
        .iter()
        .map(|c| (c.module.as_str(), c.requires.as_str()))
        .collect();
    assert_eq!(pairs, vec![("mod.a", "mod.b"), ("mod.b", "mod.c"), ("mod.c", "mod.a")]);
    assert!(err.to_string().starts_with(
        "Cycle exists in module dependencies, Module mod.a requires mod.b\n"
    ));
}

#[test]
fn self_requires_is_a_cycle() {
    let universe = ModuleUniverse::from_input(project(vec![module("mod.a").requires("mod.a").build()]))
        .expect("valid universe");
    let err = ModuleGraph::from_universe(universe).expect_err("cycle is fatal");
    assert_eq!(
        err.to_string(),
        "Cycle exists in module dependencies, Module mod.a requires mod.a"
    );
}

#[test]
fn unresolved_directive_targets_are_fatal() {
    let input = || project(vec![module("mod.a").build()]);

    let err = build_with(input(), &["mod.a=mod.zz"], &[], &[]).expect_err("unknown target");
    assert_eq!(err.to_string(), "mod.zz cannot be resolved to a module");

    let err = build_with(input(), &[], &["mod.zz/p=mod.a"], &[]).expect_err("unknown source");
    assert!(matches!(err, GraphError::UnresolvedModule { .. }));

    let err = build_with(input(), &["mod.a=mod-a"], &[], &[]).expect_err("bad name");
    assert_eq!(err.to_string(), "invalid module name: mod-a");
}

#[test]
fn repeated_add_exports_is_fatal() {
    let input = project(vec![
        module("mod.one").package("p", &["X"]).build(),
        module("mod.two").build(),
    ]);
    let err = build_with(input, &[], &["mod.one/p=mod.two", "mod.one/p=ALL-UNNAMED"], &[])
        .expect_err("duplicate grant");
    assert_eq!(
        err.to_string(),
        "can specify a package in a module only once with --add-exports"
    );
}

#[test]
fn exports_and_opens_grants_are_independent() {
    let universe = ModuleUniverse::from_input(project(vec![
        module("mod.one").package("p", &["X"]).build(),
        module("mod.two").build(),
    ]))
    .expect("valid universe");
    let graph = ModuleGraph::builder(universe)
        .grants([
            PackageGrant::parse_exports("mod.one/p=mod.two").expect("valid option"),
            PackageGrant::parse_opens("mod.one/p=mod.two").expect("valid option"),
        ])
        .build()
        .expect("graph builds");

    let (one, two) = (id(&graph, "mod.one"), id(&graph, "mod.two"));
    assert!(graph.exports_to(one, &pkg("p"), two));
    assert!(graph.opens_to(one, &pkg("p"), two));
    assert!(!graph.exports_to(one, &pkg("p"), ModuleId::UNNAMED));
}

#[test]
fn limit_modules_hides_unrequired_modules() {
    let input = || {
        project(vec![
            java_base(),
            module("mod.lib").binary().exports("l").package("l", &["L"]).build(),
            module("mod.other").binary().build(),
            module("mod.app").requires("mod.lib").build(),
        ])
    };

    let graph = build_with(input(), &[], &[], &["mod.app"]).expect("graph builds");
    assert!(graph.id_of(&name("mod.other")).is_none());
    assert!(graph.id_of(&name("mod.lib")).is_some());

    let err = build_with(input(), &["mod.app=mod.other"], &[], &["mod.app"])
        .expect_err("limited module is absent");
    assert_eq!(err.to_string(), "mod.other cannot be resolved to a module");

    assert!(build_with(input(), &["mod.app=mod.other"], &[], &[]).is_ok());
}

#[test]
fn requires_path_follows_declared_edges() {
    let graph = build_graph(project(vec![
        module("mod.c").build(),
        module("mod.b").requires_transitive("mod.c").build(),
        module("mod.a").requires_transitive("mod.b").build(),
        module("mod.d").requires("mod.a").build(),
    ]));

    let path = graph
        .requires_path(id(&graph, "mod.d"), id(&graph, "mod.c"))
        .expect("path exists");
    assert_eq!(path.format_chain(), "mod.d -> mod.a -> mod.b -> mod.c");
    assert_eq!(path.depth(), 3);
    assert!(graph.requires_path(id(&graph, "mod.c"), id(&graph, "mod.d")).is_none());
    assert_eq!(graph.direct_readers(id(&graph, "mod.a")), vec![id(&graph, "mod.d")]);
}

#[test]
fn exports_graph_as_dot_and_json() {
    let graph = build_graph(project(vec![
        java_base(),
        jar("lib1.jar", &[("lib1", &["X"])]),
        module("mod.b").exports("b").package("b", &["B"]).build(),
        module("mod.a").requires_transitive("mod.b").requires("lib1").build(),
    ]));

    let dot = graph.to_dot_format();
    assert!(dot.starts_with("digraph ModuleGraph {\n"));
    assert!(dot.contains("\"lib1\" [style=dashed];"));
    assert!(dot.contains("\"mod.a\" -> \"mod.b\" [style=bold];"));
    assert!(dot.contains("\"mod.a\" -> \"lib1\";"));
    assert!(dot.contains("\"mod.a\" -> \"java.base\" [color=gray];"));

    let json: serde_json::Value =
        serde_json::from_str(&graph.to_json().expect("serializes")).expect("valid json");
    assert_eq!(json["modules"].as_array().map(Vec::len), Some(5));
    let edges = json["edges"].as_array().expect("edges array");
    assert!(edges.iter().any(|e| e["from"] == "mod.a"
        && e["to"] == "mod.b"
        && e["transitive"] == true
        && e["origin"] == "requires"));
}
