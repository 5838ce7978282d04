// Copyright 2026 the Didact Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the classic Didact page on the headless host, three units per
//! slice, with every trace sink attached.
//!
//! Slice and unit lines go to stderr through a
//! [`PrettyPrintSink`](didact_debug::pretty::PrettyPrintSink) and, with
//! `RUST_LOG=didact=trace`, through the `log` facade as well. The final markup
//! is printed to stdout and the recording is exported as JSON lines to the
//! path given as the first argument (default `trace.jsonl`).

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

use didact_core::trace::{TraceSink, Tracer};
use didact_core::{Element, Props, WorkLoop, WorkLoopConfig, create_element};
use didact_debug::Fanout;
use didact_debug::log_sink::LogSink;
use didact_debug::pretty::PrettyPrintSink;
use didact_debug::recorder::RecorderSink;
use didact_headless::{HeadlessHost, StepDeadline, drive};

/// Units each slice may perform.
const UNITS_PER_SLICE: u32 = 3;
/// Upper bound on slices before the demo gives up.
const MAX_SLICES: u32 = 64;

fn page() -> Element {
    let items = (1..=4)
        .chain([4; 3])
        .map(|i| create_element("li", Props::new(), [format!("item {i}")]));
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
            create_element(
                "div",
                Props::new(),
                [create_element("ul", Props::new(), items)],
            ),
            create_element("b", Props::new(), Vec::<Element>::new()),
        ],
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let out_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "trace.jsonl".to_owned());

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::stderr();
    let mut recorder = RecorderSink::new();
    let mut logger = LogSink::new();

    // -- render ------------------------------------------------------------
    let mut host = HeadlessHost::new();
    let container = host.create_container("main");
    let mut work_loop = WorkLoop::new(WorkLoopConfig::browser());
    work_loop.render(page(), container);

    let stats = {
        let mut fanout = Fanout::new(vec![
            &mut pretty as &mut dyn TraceSink,
            &mut recorder,
            &mut logger,
        ]);
        let mut tracer = Tracer::new(&mut fanout);
        drive(
            &mut work_loop,
            &mut host,
            || StepDeadline::new(UNITS_PER_SLICE),
            MAX_SLICES,
            &mut tracer,
        )?
    };
    log::info!(
        "rendered {} units in {} slices, {} host operations",
        stats.units,
        stats.slices,
        host.ops().len()
    );

    println!("{}", host.markup(container));

    // -- export ------------------------------------------------------------
    let mut writer = BufWriter::new(File::create(&out_path)?);
    didact_debug::json::export(recorder.as_bytes(), &mut writer)?;
    eprintln!("wrote {out_path}");
    Ok(())
}
