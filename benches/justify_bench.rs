use std::alloc::{GlobalAlloc, Layout, System};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use cjk_justify_embedded_graphics::MonoTextMeasurer;
use cjk_justify_render::{LayoutConfig, LayoutEngine};

const BOX_WIDTH: i32 = 480;
const PASSES: usize = 20;

const FIXTURES: &[(&str, usize)] = &[("short", 4), ("page", 64), ("chapter", 512)];

struct TrackingAllocator;

static CURRENT_ALLOC_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_ALLOC_BYTES: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL_ALLOCATOR: TrackingAllocator = TrackingAllocator;

fn current_alloc_bytes() -> usize {
    CURRENT_ALLOC_BYTES.load(Ordering::Relaxed)
}

fn peak_alloc_bytes() -> usize {
    PEAK_ALLOC_BYTES.load(Ordering::Relaxed)
}

fn reset_peak_alloc_bytes() {
    PEAK_ALLOC_BYTES.store(current_alloc_bytes(), Ordering::Relaxed);
}

fn update_peak_alloc_bytes(current: usize) {
    let mut peak = PEAK_ALLOC_BYTES.load(Ordering::Relaxed);
    while current > peak {
        match PEAK_ALLOC_BYTES.compare_exchange_weak(
            peak,
            current,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(next) => peak = next,
        }
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let current =
                CURRENT_ALLOC_BYTES.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
            update_peak_alloc_bytes(current);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        CURRENT_ALLOC_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }
}

fn synthetic_text(repeat: usize) -> String {
    let sentences = [
        "排版引擎需要同时处理中文与English words in one paragraph。",
        "greedy line filling keeps every committed line inside the content box",
        "кириллица and accents like mañana still measure as narrow glyphs",
        "两端对齐 justification stretches inter-token gaps evenly across the line",
    ];
    let mut out = String::with_capacity(repeat * 256);
    for index in 0..repeat {
        out.push_str(sentences[index % sentences.len()]);
        if index % 3 == 2 {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }
    out
}

fn main() {
    let engine = LayoutEngine::new(LayoutConfig::for_box_width(BOX_WIDTH))
        .with_text_measurer(MonoTextMeasurer::shared());

    println!("layout bench: box width {BOX_WIDTH}px, {PASSES} passes per fixture");
    for (name, repeat) in FIXTURES {
        let text = synthetic_text(*repeat);
        reset_peak_alloc_bytes();
        let start = Instant::now();
        let mut total_lines = 0usize;
        for _ in 0..PASSES {
            total_lines = black_box(engine.layout(&text)).total_line_count;
        }
        let elapsed = start.elapsed();
        println!(
            "{name:>8}: {:>7} chars -> {:>5} lines, {:>8.3} ms/pass, peak heap {} KiB",
            text.chars().count(),
            total_lines,
            elapsed.as_secs_f64() * 1000.0 / PASSES as f64,
            peak_alloc_bytes() / 1024,
        );
    }
}
