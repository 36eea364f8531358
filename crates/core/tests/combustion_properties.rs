//! Whole-grid properties of the combustion and flame kernels

use approx::assert_relative_eq;
use ctor::ctor;
use fire_kernels_core::solver::{process_burn_in, update_flame, BurnParams};
use fire_kernels_core::{BurnFields, GridDims, KernelRegion, RealGrid, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fuel, density and reaction grids with a mix of empty, scarce and full cells
struct BurnState {
    fuel: RealGrid,
    density: RealGrid,
    react: RealGrid,
    red: RealGrid,
    green: RealGrid,
    blue: RealGrid,
    heat: RealGrid,
}

impl BurnState {
    fn random(dims: GridDims, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut field = |sample: &mut dyn FnMut(&mut StdRng) -> f32| {
            let values = (0..dims.cell_count()).map(|_| sample(&mut rng)).collect();
            RealGrid::from_vec(dims, values).unwrap()
        };

        let fuel = field(&mut |rng: &mut StdRng| match rng.random_range(0..4) {
            0 => 0.0,
            1 => rng.random_range(0.0..0.1),
            _ => rng.random_range(0.0..2.0),
        });
        let density = field(&mut |rng: &mut StdRng| rng.random_range(0.0..1.0));
        let react = field(&mut |rng: &mut StdRng| rng.random_range(0.0..1.0));
        let red = field(&mut |rng: &mut StdRng| rng.random_range(0.0..1.0));
        let green = field(&mut |rng: &mut StdRng| rng.random_range(0.0..1.0));
        let blue = field(&mut |rng: &mut StdRng| rng.random_range(0.0..1.0));
        let heat = field(&mut |_| 0.0);

        Self {
            fuel,
            density,
            react,
            red,
            green,
            blue,
            heat,
        }
    }

    fn burn(&mut self, region: &KernelRegion, params: &BurnParams) {
        let fields = BurnFields::new(&mut self.fuel, &mut self.density, &mut self.react)
            .with_heat(&mut self.heat)
            .with_color(&mut self.red, &mut self.green, &mut self.blue);
        process_burn_in(region, fields, params).unwrap();
    }
}

fn for_each_interior(dims: GridDims, mut f: impl FnMut(usize, usize, usize)) {
    for k in 1..dims.nz {
        for j in 1..dims.ny {
            for i in 1..dims.nx {
                f(i, j, k);
            }
        }
    }
}

#[test]
fn test_fuel_never_increases_or_goes_negative() {
    let dims = GridDims::new(12, 10, 6).unwrap();
    let mut state = BurnState::random(dims, 1);
    let before = state.fuel.clone();

    state.burn(&KernelRegion::interior(dims), &BurnParams::default());

    for_each_interior(dims, |i, j, k| {
        let fuel = state.fuel.get(i, j, k);
        assert!(fuel >= 0.0, "negative fuel at ({i},{j},{k})");
        assert!(fuel <= before.get(i, j, k), "fuel grew at ({i},{j},{k})");
    });
}

#[test]
fn test_density_stays_in_unit_range() {
    let dims = GridDims::new(10, 10, 4).unwrap();
    let mut state = BurnState::random(dims, 2);
    let params = BurnParams::default().with_flame_smoke(500.0).with_dt(1.0);

    state.burn(&KernelRegion::interior(dims), &params);

    for_each_interior(dims, |i, j, k| {
        let density = state.density.get(i, j, k);
        assert!((0.0..=1.0).contains(&density), "density {density} at ({i},{j},{k})");
    });
}

#[test]
fn test_empty_cells_reset_reaction_exactly() {
    let dims = GridDims::new(10, 10, 4).unwrap();
    let mut state = BurnState::random(dims, 3);
    let fuel_before = state.fuel.clone();
    let density_before = state.density.clone();
    let heat_before = state.heat.clone();

    state.burn(&KernelRegion::interior(dims), &BurnParams::default());

    let mut empty = 0;
    for_each_interior(dims, |i, j, k| {
        if fuel_before.get(i, j, k) == 0.0 {
            empty += 1;
            assert_eq!(state.react.get(i, j, k), 0.0);
            assert_eq!(state.density.get(i, j, k), density_before.get(i, j, k));
            assert_eq!(state.heat.get(i, j, k), heat_before.get(i, j, k));
        }
    });
    assert!(empty > 0, "seed should produce some empty cells");
}

#[test]
fn test_no_depletion_leaves_reaction_unchanged() {
    let dims = GridDims::new(8, 8, 3).unwrap();
    let mut state = BurnState::random(dims, 4);
    let fuel_before = state.fuel.clone();
    let react_before = state.react.clone();

    state.burn(
        &KernelRegion::interior(dims),
        &BurnParams::default().with_dt(0.0),
    );

    for_each_interior(dims, |i, j, k| {
        if fuel_before.get(i, j, k) > f32::EPSILON {
            assert_eq!(state.react.get(i, j, k), react_before.get(i, j, k));
        }
    });
}

#[test]
fn test_single_cell_scenario() {
    let dims = GridDims::new(1, 1, 1).unwrap();
    let mut fuel = RealGrid::with_value(dims, 1.0);
    let mut density = RealGrid::new(dims);
    let mut react = RealGrid::with_value(dims, 1.0);
    let mut heat = RealGrid::new(dims);

    // the interior of a single cell grid is empty, so cover the whole grid
    process_burn_in(
        &KernelRegion::full(dims),
        BurnFields::new(&mut fuel, &mut density, &mut react).with_heat(&mut heat),
        &BurnParams::default(),
    )
    .unwrap();

    let flame = 0.925_f32.sqrt();
    assert_relative_eq!(fuel.get(0, 0, 0), 0.925, epsilon = 1e-6);
    assert_relative_eq!(react.get(0, 0, 0), 0.925, epsilon = 1e-6);
    assert_relative_eq!(density.get(0, 0, 0), 0.00375, epsilon = 1e-6);
    assert_relative_eq!(
        heat.get(0, 0, 0),
        (1.0 - flame) * 1.25 + flame * 1.75,
        epsilon = 1e-5
    );
}

#[test]
fn test_interior_of_single_cell_grid_is_untouched() {
    let dims = GridDims::new(1, 1, 1).unwrap();
    let mut fuel = RealGrid::with_value(dims, 1.0);
    let mut density = RealGrid::new(dims);
    let mut react = RealGrid::with_value(dims, 1.0);

    fire_kernels_core::process_burn(
        BurnFields::new(&mut fuel, &mut density, &mut react),
        &BurnParams::default(),
    )
    .unwrap();

    assert_eq!(fuel.get(0, 0, 0), 1.0);
}

#[test]
fn test_all_empty_grid_only_zeroes_reaction() {
    let dims = GridDims::planar(8, 8).unwrap();
    let mut fuel = RealGrid::new(dims);
    let mut density = RealGrid::with_value(dims, 0.3);
    let mut react = RealGrid::with_value(dims, 0.5);
    let mut heat = RealGrid::with_value(dims, 1.0);

    fire_kernels_core::process_burn(
        BurnFields::new(&mut fuel, &mut density, &mut react).with_heat(&mut heat),
        &BurnParams::default().with_flame_smoke(3.0),
    )
    .unwrap();

    assert!(fuel.as_slice().iter().all(|&f| f == 0.0));
    assert!(density.as_slice().iter().all(|&d| d == 0.3));
    assert!(heat.as_slice().iter().all(|&h| h == 1.0));
    assert_eq!(react.get(3, 3, 0), 0.0);
    assert_eq!(react.get(0, 3, 0), 0.5, "boundary keeps its reaction");
}

#[test]
fn test_flame_matches_sqrt_of_react() {
    let dims = GridDims::new(9, 7, 5).unwrap();
    let mut state = BurnState::random(dims, 5);
    state.burn(&KernelRegion::interior(dims), &BurnParams::default());

    let mut flame = RealGrid::with_value(dims, -1.0);
    update_flame(&state.react, &mut flame).unwrap();

    for_each_interior(dims, |i, j, k| {
        let react = state.react.get(i, j, k);
        let expected = if react > 0.0 { react.sqrt() } else { 0.0 };
        assert_eq!(flame.get(i, j, k), expected);
    });
}

#[test]
fn test_result_independent_of_thread_count() {
    let dims = GridDims::new(16, 16, 8).unwrap();
    let params = BurnParams::default().with_flame_smoke_color(Vec3::new(0.9, 0.4, 0.1));

    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        let mut state = BurnState::random(dims, 6);
        pool.install(|| {
            for _ in 0..5 {
                state.burn(&KernelRegion::interior(dims), &params);
            }
        });
        state
    };

    let serial = run(1);
    let parallel = run(4);
    assert_eq!(serial.fuel, parallel.fuel);
    assert_eq!(serial.density, parallel.density);
    assert_eq!(serial.react, parallel.react);
    assert_eq!(serial.red, parallel.red);
    assert_eq!(serial.heat, parallel.heat);
}
