use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabprep::config::WorkflowConfig;
use tabprep::dataset::{Column, Table};
use tabprep::preprocessing::{FittedTransformer, Transformer};

const WORKCLASS: [&str; 4] = ["Private", "Self-emp-not-inc", "Local-gov", "State-gov"];
const EDUCATION: [&str; 5] = ["HS-grad", "Some-college", "Bachelors", "Masters", "11th"];
const MARITAL: [&str; 3] = ["Never-married", "Married-civ-spouse", "Divorced"];
const OCCUPATION: [&str; 4] = ["Sales", "Exec-managerial", "Craft-repair", "Adm-clerical"];
const RELATIONSHIP: [&str; 4] = ["Husband", "Wife", "Own-child", "Not-in-family"];
const RACE: [&str; 3] = ["White", "Black", "Asian-Pac-Islander"];
const SEX: [&str; 2] = ["Male", "Female"];
const COUNTRY: [&str; 3] = ["United-States", "Mexico", "Germany"];

/// Deterministic adult-census-shaped table with `n` rows.
fn census_like(n: usize) -> Table {
    let pick = |values: &[&str], step: usize| -> Column {
        Column::categorical((0..n).map(|i| values[(i * step + i / 7) % values.len()]))
    };
    let numeric = |f: &dyn Fn(usize) -> f64| Column::Numeric((0..n).map(f).collect());

    Table::from_columns(vec![
        ("age", numeric(&|i| 17.0 + (i % 60) as f64)),
        ("workclass", pick(&WORKCLASS, 3)),
        ("education", pick(&EDUCATION, 7)),
        ("education-num", numeric(&|i| (i % 16) as f64 + 1.0)),
        ("marital-status", pick(&MARITAL, 5)),
        ("occupation", pick(&OCCUPATION, 11)),
        ("relationship", pick(&RELATIONSHIP, 13)),
        ("race", pick(&RACE, 17)),
        ("sex", pick(&SEX, 1)),
        ("capital-gain", numeric(&|i| if i % 23 == 0 { 5000.0 } else { 0.0 })),
        ("capital-loss", numeric(&|i| if i % 31 == 0 { 1500.0 } else { 0.0 })),
        ("hours-per-week", numeric(&|i| 20.0 + (i % 40) as f64)),
        ("native-country", pick(&COUNTRY, 19)),
    ])
    .expect("valid table")
}

fn bench_fit(c: &mut Criterion) {
    let preprocessor = WorkflowConfig::adult_census().build_preprocessor();
    for n_rows in [1_000, 10_000, 50_000].iter() {
        let table = census_like(*n_rows);
        c.bench_with_input(
            BenchmarkId::new("column_transformer_fit", n_rows),
            &table,
            |b, table| {
                b.iter(|| black_box(preprocessor.fit(black_box(table)).expect("fit")));
            },
        );
    }
}

fn bench_transform(c: &mut Criterion) {
    let preprocessor = WorkflowConfig::adult_census().build_preprocessor();
    for n_rows in [1_000, 10_000, 50_000].iter() {
        let table = census_like(*n_rows);
        let fitted = preprocessor.fit(&table).expect("fit");
        c.bench_with_input(
            BenchmarkId::new("column_transformer_transform", n_rows),
            &table,
            |b, table| {
                b.iter(|| {
                    let out = fitted.transform(black_box(table)).expect("transform");
                    black_box(out.to_array().expect("numeric output"))
                });
            },
        );
    }
}

criterion_group!(benches, bench_fit, bench_transform);
criterion_main!(benches);
