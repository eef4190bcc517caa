use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use vahana_core::facts::resolve_path;
use vahana_core::{
    Catalog, FieldValue, MatrixBuilder, SelectionStore, SortKey, Vehicle, ViewOptions,
    format_currency, render_html, render_text, to_number,
};

fn selection(catalog: &Catalog, count: usize) -> Vec<Arc<Vehicle>> {
    catalog.vehicles().iter().take(count).cloned().collect()
}

fn bench_matrix_builder(c: &mut Criterion) {
    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => panic!("builtin catalog failed to load: {e}"),
    };
    let builder = MatrixBuilder::default();
    let three = selection(&catalog, 3);
    let five = selection(&catalog, 5);

    c.bench_function("matrix_build_three_vehicles", |b| {
        b.iter(|| builder.build(black_box(&three), ViewOptions::default()))
    });

    c.bench_function("matrix_build_five_sorted_diff_only", |b| {
        let view = ViewOptions {
            sort: SortKey::PriceDescending,
            diff_only: true,
        };
        b.iter(|| builder.build(black_box(&five), view))
    });

    let all = catalog.vehicles().to_vec();
    c.bench_function("matrix_build_truncates_catalog", |b| {
        b.iter(|| builder.build(black_box(&all), ViewOptions::default()))
    });

    let matrix = builder.build(&five, ViewOptions::default());
    c.bench_function("render_text_five_columns", |b| {
        b.iter(|| render_text(black_box(&matrix)))
    });
    c.bench_function("render_html_five_columns", |b| {
        b.iter(|| render_html(black_box(&matrix)))
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("format_currency_number", |b| {
        b.iter(|| format_currency(black_box(&FieldValue::Number(12_345_678.0))))
    });

    let text = FieldValue::Text("₹ 1,20,000".into());
    c.bench_function("to_number_currency_text", |b| {
        b.iter(|| to_number(black_box(&text), 0.0))
    });

    let vehicle = Vehicle::new("ktm-duke-200", "KTM", "Duke 200", "Sports")
        .with_on_road(190000.0)
        .with_mileage(35.0);
    c.bench_function("resolve_path_nested", |b| {
        b.iter(|| resolve_path(black_box(&vehicle), black_box("price.onRoad")))
    });
}

fn bench_selection_store(c: &mut Criterion) {
    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => panic!("builtin catalog failed to load: {e}"),
    };
    let vehicles = selection(&catalog, 4);

    c.bench_function("selection_add_until_full_then_clear", |b| {
        let store = SelectionStore::new(3);
        b.iter(|| {
            for v in &vehicles {
                black_box(store.add(Arc::clone(v)));
            }
            store.clear();
        })
    });
}

criterion_group!(
    benches,
    bench_matrix_builder,
    bench_formatting,
    bench_selection_store
);
criterion_main!(benches);
