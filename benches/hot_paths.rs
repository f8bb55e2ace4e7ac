//! Benchmarks for work done on every pointer move or action
//!
//! Drop resolution runs once per pointer event during a drag, and every
//! action clones the model before running.
//!
//! Run with: cargo bench hot_paths

mod support;
use support::{make_model, SCREEN};

use flexdock::layout::layout_model;
use flexdock::model::{DockLocation, NodeId, WindowId};
use flexdock::update;
use flexdock::view::{compute_drop, DragSubject, DropTuning};
use flexdock::Action;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

// ============================================================================
// Drop resolution
// ============================================================================

#[divan::bench(args = [2, 8, 16])]
fn drop_sweep(bencher: divan::Bencher, columns: usize) {
    let mut model = make_model(columns, 3, 4);
    layout_model(&mut model, SCREEN);
    let subject = DragSubject::Tab(NodeId::from("t0_0_0"));
    let tuning = DropTuning::default();
    let main = WindowId::main();

    bencher.bench_local(|| {
        let mut hits = 0;
        for step in 0..64 {
            let px = SCREEN.width * step as f64 / 64.0;
            let py = SCREEN.height * ((step * 7) % 64) as f64 / 64.0;
            if compute_drop(&model, &main, &subject, px, py, &tuning).is_some() {
                hits += 1;
            }
        }
        divan::black_box(hits)
    });
}

#[divan::bench]
fn drop_on_tab_strip() {
    let mut model = make_model(4, 2, 12);
    layout_model(&mut model, SCREEN);
    let subject = DragSubject::Tab(NodeId::from("t1_0_0"));
    divan::black_box(compute_drop(
        &model,
        &WindowId::main(),
        &subject,
        SCREEN.width / 2.0,
        45.0,
        &DropTuning::default(),
    ));
}

// ============================================================================
// Reducer
// ============================================================================

#[divan::bench(args = [2, 8, 16])]
fn select_tab(bencher: divan::Bencher, columns: usize) {
    let mut model = make_model(columns, 3, 4);
    let mut flip = false;
    bencher.bench_local(|| {
        flip = !flip;
        let tab = if flip { "t0_0_1" } else { "t0_0_2" };
        divan::black_box(update(&mut model, Action::select_tab(tab)))
    });
}

#[divan::bench(args = [2, 8, 16])]
fn move_tab_back_and_forth(bencher: divan::Bencher, columns: usize) {
    let mut model = make_model(columns, 3, 4);
    let mut flip = false;
    bencher.bench_local(|| {
        flip = !flip;
        let target = if flip { "ts1_0" } else { "ts0_0" };
        divan::black_box(update(
            &mut model,
            Action::move_node("t0_0_0", target, DockLocation::Center, None),
        ))
    });
}
