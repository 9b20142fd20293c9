use criterion::{black_box, criterion_group, criterion_main, Criterion};
use laborecon::sweep::default_female_wages;
use laborecon::{
    GridOptions, HouseholdModel, HouseholdOptions, HouseholdParams, UnionModel, UnionObjective,
    UnionOptions, UnionParams,
};

fn household_solvers(c: &mut Criterion) {
    let model = HouseholdModel::new(HouseholdParams::default()).unwrap();
    let options = HouseholdOptions::default();

    c.bench_function("household_grid_25", |b| {
        let grid = GridOptions::default().with_points(25);
        b.iter(|| model.solve_discrete(black_box(&grid)).unwrap())
    });
    c.bench_function("household_grid_25_parallel", |b| {
        let grid = GridOptions::default().with_points(25).with_parallel(true);
        b.iter(|| model.solve_discrete(black_box(&grid)).unwrap())
    });
    c.bench_function("household_simplex", |b| {
        b.iter(|| model.solve(black_box(&options)).unwrap())
    });
    c.bench_function("household_wage_sweep", |b| {
        let wages = default_female_wages();
        b.iter(|| model.solve_wage_sweep(black_box(&wages), &options).unwrap())
    });
}

fn union_solver(c: &mut Criterion) {
    let model = UnionModel::new(UnionParams::default()).unwrap();
    let options = UnionOptions::default();
    c.bench_function("union_nash", |b| {
        b.iter(|| model.solve(black_box(UnionObjective::Nash), &options).unwrap())
    });
}

criterion_group!(benches, household_solvers, union_solver);
criterion_main!(benches);
