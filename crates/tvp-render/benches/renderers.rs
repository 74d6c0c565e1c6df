use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tvp_core::config::RenderMode;
use tvp_core::frame::RawFrame;
use tvp_core::layout::TerminalGeometry;
use tvp_render::Renderer;

fn gradient(w: u32, h: u32) -> RawFrame {
    let pixels: Vec<_> = (0..h)
        .flat_map(|y| (0..w).map(move |x| ((x * 255 / w) as u8, (y * 255 / h) as u8, 128)))
        .collect();
    RawFrame::from_pixels(w, h, &pixels)
}

fn bench_renderers(c: &mut Criterion) {
    let term = TerminalGeometry { cols: 200, rows: 60 };
    for mode in RenderMode::ALL {
        let mut renderer = Renderer::new(mode, true, term);
        if renderer.initialize(1920, 1080).is_err() {
            continue;
        }
        let (w, h) = renderer.decode_size();
        let frame = gradient(w, h);
        c.bench_function(&format!("render_{mode}_200x60"), |b| {
            b.iter(|| renderer.render(black_box(&frame)));
        });
    }
}

criterion_group!(benches, bench_renderers);
criterion_main!(benches);
