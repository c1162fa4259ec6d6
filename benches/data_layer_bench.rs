use chart_timeline::core::{OhlcItem, PlotRowValueIndex, RawItem, SeriesKind, ValueItem};
use chart_timeline::lwc::model::DataLayer;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn generated_bars(count: i64, step: i64) -> Vec<RawItem> {
    (0..count)
        .map(|i| {
            let base = 100.0 + (i as f64 * 0.05).sin() * 10.0;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            let low = base.min(close) - 0.75;
            let high = base.max(close) + 0.75;
            OhlcItem::new(i * step, base, high, low, close).into()
        })
        .collect()
}

fn generated_values(count: i64, step: i64, offset: i64) -> Vec<RawItem> {
    (0..count)
        .map(|i| ValueItem::new(i * step + offset, i as f64).into())
        .collect()
}

fn bench_set_series_data_10k(c: &mut Criterion) {
    let bars = generated_bars(10_000, 60);

    c.bench_function("set_series_data_single_series_10k", |b| {
        b.iter_batched(
            || (DataLayer::new(), bars.clone()),
            |(mut layer, bars)| {
                let series = layer.add_series(SeriesKind::Candlestick);
                let _ = layer
                    .set_series_data(series, black_box(bars))
                    .expect("set data");
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_merge_second_series_10k(c: &mut Criterion) {
    let bars = generated_bars(10_000, 60);
    let values = generated_values(10_000, 60, 30);

    c.bench_function("set_series_data_merge_10k", |b| {
        b.iter_batched(
            || {
                let mut layer = DataLayer::new();
                let candles = layer.add_series(SeriesKind::Candlestick);
                layer
                    .set_series_data(candles, bars.clone())
                    .expect("set candles");
                (layer, values.clone())
            },
            |(mut layer, values)| {
                let line = layer.add_series(SeriesKind::Line);
                let _ = layer
                    .set_series_data(line, black_box(values))
                    .expect("set line");
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_realtime_append_1k(c: &mut Criterion) {
    let bars = generated_bars(10_000, 60);

    c.bench_function("update_series_data_append_1k", |b| {
        b.iter_batched(
            || {
                let mut layer = DataLayer::new();
                let series = layer.add_series(SeriesKind::Candlestick);
                layer
                    .set_series_data(series, bars.clone())
                    .expect("set data");
                (layer, series)
            },
            |(mut layer, series)| {
                for i in 10_000..11_000 {
                    let _ = layer
                        .update_series_data(series, OhlcItem::new(i * 60, 1.0, 2.0, 0.5, 1.5).into())
                        .expect("append");
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_min_max_on_range(c: &mut Criterion) {
    let mut layer = DataLayer::new();
    let series = layer.add_series(SeriesKind::Candlestick);
    layer
        .set_series_data(series, generated_bars(10_000, 60))
        .expect("set data");
    let plot_list = layer.plot_list(series).expect("registered");
    let channels = [PlotRowValueIndex::High, PlotRowValueIndex::Low];

    c.bench_function("min_max_on_range_warm_cache_10k", |b| {
        b.iter(|| {
            let _ = plot_list.min_max_on_range(black_box(17), black_box(9_871), &channels);
        })
    });
}

criterion_group!(
    benches,
    bench_set_series_data_10k,
    bench_merge_second_series_10k,
    bench_realtime_append_1k,
    bench_min_max_on_range
);
criterion_main!(benches);
