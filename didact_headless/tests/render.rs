// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end render scenarios against the headless host.

use std::collections::HashSet;

use didact_core::trace::Tracer;
use didact_core::{
    Child, Element, ElementKind, Props, SliceEndReason, WorkLoop, WorkLoopConfig, create_element,
};
use didact_headless::{DriveError, HeadlessHost, HostError, HostOp, NodeId, StepDeadline, drive};

fn no_children() -> [Element; 0] {
    []
}

/// The page the demo renders.
fn page() -> Element {
    let items = (1..=4).chain([4; 3]).map(|i| {
        create_element("li", Props::new(), [format!("item {i}")])
    });
    create_element(
        "div",
        Props::new().with("id", "foo"),
        [
            create_element("h1", Props::new(), ["Didact!"]),
            create_element(
                "a",
                Props::new().with("href", "https://example.com"),
                ["example.com"],
            ),
            create_element("div", Props::new(), [create_element("ul", Props::new(), items)]),
            create_element("b", Props::new(), no_children()),
        ],
    )
}

/// Serializes an element tree the way `HeadlessHost::markup` serializes nodes.
fn expected_markup(element: &Element) -> String {
    match element.kind() {
        ElementKind::Text => element.text_value().unwrap_or_default().to_owned(),
        ElementKind::Tag(tag) => {
            let mut out = format!("<{tag}");
            for (name, value) in element.props().iter() {
                out.push_str(&format!(" {name}=\"{value}\""));
            }
            out.push('>');
            for child in element.children() {
                out.push_str(&expected_markup(child));
            }
            out.push_str(&format!("</{tag}>"));
            out
        }
    }
}

fn render_with_budget(element: &Element, steps: u32) -> (HeadlessHost, NodeId) {
    let mut host = HeadlessHost::new();
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
    work_loop.render(element.clone(), container);
    drive(
        &mut work_loop,
        &mut host,
        || StepDeadline::new(steps),
        1_000,
        &mut Tracer::none(),
    )
    .unwrap();
    (host, container)
}

#[test]
fn unbounded_render_mirrors_the_element_tree() {
    let page = page();
    let mut host = HeadlessHost::new();
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
    work_loop.render(page.clone(), container);
    let stats = didact_headless::run_to_idle(&mut work_loop, &mut host, &mut Tracer::none())
        .unwrap();

    assert_eq!(stats.slices, 1);
    assert_eq!(host.inner_markup(container), expected_markup(&page));
    assert!(
        host.inner_markup(container).contains(concat!(
            "<ul><li>item 1</li><li>item 2</li><li>item 3</li><li>item 4</li>",
            "<li>item 4</li><li>item 4</li><li>item 4</li></ul>"
        )),
        "list items keep source order"
    );
}

#[test]
fn simple_example_markup() {
    let element = create_element(
        "div",
        Props::new().with("id", "foo"),
        [create_element("h1", Props::new(), ["Didact!"])],
    );
    let (host, container) = render_with_budget(&element, 1);
    assert_eq!(
        host.inner_markup(container),
        r#"<div id="foo"><h1>Didact!</h1></div>"#
    );
}

#[test]
fn every_node_is_created_exactly_once() {
    let page = page();
    let (host, _) = render_with_budget(&page, 3);

    let created: Vec<NodeId> = host
        .ops()
        .iter()
        .filter_map(|op| match op {
            HostOp::Create { node, .. } => Some(*node),
            _ => None,
        })
        .collect();
    assert_eq!(created.len(), page.subtree_len());
    let unique: HashSet<_> = created.iter().collect();
    assert_eq!(unique.len(), created.len());

    let appended: Vec<NodeId> = host
        .ops()
        .iter()
        .filter_map(|op| match op {
            HostOp::Append { child, .. } => Some(*child),
            _ => None,
        })
        .collect();
    assert_eq!(appended, created, "each node is attached once, in creation order");
}

#[test]
fn appends_follow_parent_creation() {
    let (host, container) = render_with_budget(&page(), 2);
    let mut created = HashSet::from([container]);
    for op in host.ops() {
        match op {
            HostOp::Create { node, .. } => {
                created.insert(*node);
            }
            HostOp::Append { parent, child } => {
                assert!(created.contains(parent), "{parent:?} appended to before creation");
                assert!(created.contains(child), "{child:?} appended before creation");
            }
            HostOp::SetProperty { node, .. } => {
                assert!(created.contains(node), "{node:?} configured before creation");
            }
        }
    }
}

#[test]
fn props_are_applied_before_attachment() {
    let (host, _) = render_with_budget(&page(), 1);
    let ops = host.ops();
    let append_of = |node: NodeId| {
        ops.iter()
            .position(|op| matches!(op, HostOp::Append { child, .. } if *child == node))
    };
    for (i, op) in ops.iter().enumerate() {
        if let HostOp::SetProperty { node, .. } = op {
            let attached = append_of(*node).unwrap();
            assert!(i < attached, "{node:?} configured after attachment");
        }
    }
}

#[test]
fn interrupted_render_matches_unbounded_render() {
    let page = page();
    let (reference, ref_container) = render_with_budget(&page, u32::MAX);
    for steps in 1..=7 {
        let (host, container) = render_with_budget(&page, steps);
        assert_eq!(
            host.inner_markup(container),
            reference.inner_markup(ref_container),
            "budget {steps}"
        );
        assert_eq!(host.ops(), reference.ops(), "budget {steps}");
    }
}

#[test]
fn slices_never_exceed_their_budget() {
    let mut host = HeadlessHost::new();
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
    work_loop.render(page(), container);

    let mut total = 0;
    while !work_loop.is_idle() {
        let report = work_loop
            .run(&mut host, &StepDeadline::new(3), &mut Tracer::none())
            .unwrap();
        assert!(report.units <= 3, "slice ran {} units", report.units);
        if !work_loop.is_idle() {
            assert_eq!(report.units, 3, "only the last slice may be short");
            assert_eq!(report.reason, SliceEndReason::BudgetExhausted);
        }
        total += report.units;
    }
    // Every element plus the synthetic root.
    assert_eq!(total as usize, page().subtree_len() + 1);
}

#[test]
fn partial_tree_is_visible_between_slices() {
    let mut host = HeadlessHost::new();
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
    work_loop.render(page(), container);

    // root, div#foo, h1, "Didact!", a
    let _ = work_loop
        .run(&mut host, &StepDeadline::new(5), &mut Tracer::none())
        .unwrap();
    assert_eq!(
        host.inner_markup(container),
        r#"<div id="foo"><h1>Didact!</h1><a href="https://example.com"></a></div>"#
    );
}

#[test]
fn second_render_leaks_the_first_and_builds_independently() {
    let mut host = HeadlessHost::new();
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());

    let first = create_element(
        "ol",
        Props::new(),
        [
            create_element("li", Props::new(), ["a"]),
            create_element("li", Props::new(), ["b"]),
        ],
    );
    work_loop.render(first, container);
    // root, ol, li, "a"
    let _ = work_loop
        .run(&mut host, &StepDeadline::new(4), &mut Tracer::none())
        .unwrap();
    assert!(!work_loop.is_idle());

    let second = create_element(
        "p",
        Props::new(),
        [
            Child::from(create_element("span", Props::new(), ["x"])),
            Child::from("y"),
        ],
    );
    work_loop.render(second, container);
    drive(
        &mut work_loop,
        &mut host,
        || StepDeadline::new(2),
        100,
        &mut Tracer::none(),
    )
    .unwrap();

    assert_eq!(
        host.inner_markup(container),
        "<ol><li>a</li></ol><p><span>x</span>y</p>",
        "the abandoned tree stays attached and is never completed"
    );
}

#[test]
fn rendering_into_a_nested_container() {
    let mut host = HeadlessHost::new();
    let outer = host.create_container("section");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::headless());
    work_loop.render(
        create_element("div", Props::new().with("id", "mount"), no_children()),
        outer,
    );
    didact_headless::run_to_idle(&mut work_loop, &mut host, &mut Tracer::none()).unwrap();
    let mount = host.children(outer)[0];

    work_loop.render(create_element("em", Props::new(), ["hi"]), mount);
    didact_headless::run_to_idle(&mut work_loop, &mut host, &mut Tracer::none()).unwrap();
    assert_eq!(
        host.markup(outer),
        r#"<section><div id="mount"><em>hi</em></div></section>"#
    );
}

#[test]
fn host_failure_stops_the_render_and_keeps_partial_nodes() {
    let mut host = HeadlessHost::new();
    host.fail_on_tag("ul");
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
    work_loop.render(page(), container);

    let err = drive(
        &mut work_loop,
        &mut host,
        || StepDeadline::new(4),
        100,
        &mut Tracer::none(),
    )
    .unwrap_err();
    let DriveError::Render(err) = err else {
        panic!("expected a render error");
    };
    assert_eq!(err.error, HostError::CreateRejected("ul".to_owned()));
    assert_eq!(err.render_index, 1);
    assert!(work_loop.is_idle());
    assert_eq!(
        host.inner_markup(container),
        concat!(
            r#"<div id="foo"><h1>Didact!</h1>"#,
            r#"<a href="https://example.com">example.com</a><div></div></div>"#
        )
    );

    // A fresh render after the failure works normally.
    work_loop.render(create_element("b", Props::new(), ["ok"]), container);
    didact_headless::run_to_idle(&mut work_loop, &mut host, &mut Tracer::none()).unwrap();
    assert!(host.inner_markup(container).ends_with("<b>ok</b>"));
}

#[test]
fn fibers_hold_the_nodes_they_created() {
    let mut host = HeadlessHost::new();
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
    work_loop.render(page(), container);
    didact_headless::run_to_idle(&mut work_loop, &mut host, &mut Tracer::none()).unwrap();

    let fibers = work_loop.fibers();
    for id in fibers.pre_order() {
        let node = *fibers.node(id).unwrap();
        match fibers.kind(id) {
            None => assert_eq!(node, container),
            Some(ElementKind::Text) => {
                assert_eq!(host.text(node), fibers.element(id).unwrap().text_value());
            }
            Some(ElementKind::Tag(tag)) => assert_eq!(host.tag(node), Some(tag.as_str())),
        }
        if let Some(parent) = fibers.parent(id) {
            assert_eq!(host.parent(node), fibers.node(parent).copied());
        }
    }
}

#[cfg(feature = "trace")]
mod traced {
    use didact_core::trace::{RenderCompleteEvent, RenderStartEvent, SliceEndEvent, TraceSink};

    use super::*;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl TraceSink for Log {
        fn on_render_start(&mut self, e: &RenderStartEvent) {
            self.0.push(format!("start {} {}", e.render_index, e.abandoned));
        }
        fn on_slice_end(&mut self, e: &SliceEndEvent) {
            self.0.push(format!("slice {} {}", e.units, e.reason.label()));
        }
        fn on_render_complete(&mut self, e: &RenderCompleteEvent) {
            self.0.push(format!("done {} {}", e.units, e.slices));
        }
    }

    #[test]
    fn trace_reports_slices_and_abandonment() {
        let mut host = HeadlessHost::new();
        let container = host.create_container("main");
        let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
        let mut log = Log::default();

        work_loop.render(page(), container);
        let _ = work_loop
            .run(&mut host, &StepDeadline::new(2), &mut Tracer::new(&mut log))
            .unwrap();
        work_loop.render(create_element("i", Props::new(), ["z"]), container);
        drive(
            &mut work_loop,
            &mut host,
            || StepDeadline::new(2),
            10,
            &mut Tracer::new(&mut log),
        )
        .unwrap();

        assert_eq!(
            log.0,
            [
                "start 1 false",
                "slice 2 budget",
                "start 2 true",
                "slice 2 budget",
                "slice 1 idle",
                "done 3 2",
            ]
        );
    }
}
