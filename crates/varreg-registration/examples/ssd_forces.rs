//! SSD Forces Example
//!
//! Runs a few fixed-point iterations of SSD forces on a synthetic 2D pair:
//! a Gaussian blob and a copy shifted along x. The displacement field is
//! advanced with the raw force updates and every iteration is reported
//! through the registration logger.
//!
//! Usage:
//!   RUST_LOG=info cargo run --example ssd_forces

use std::sync::Arc;

use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use varreg_core::interpolation::{Interpolator, LinearInterpolator};
use varreg_core::{DisplacementField, Image, Point, Spacing, Vector};
use varreg_registration::{
    compute_update_pass, EventHistory, GradientType, ObserverSet, RegistrationFunction,
    RegistrationLogger, SsdForceConfig, SsdForceFunction,
};

type Backend = NdArray<f32>;

const SIZE: [usize; 2] = [32, 32];
const ITERATIONS: usize = 30;

fn blob(center: [f64; 2], sigma: f64) -> Vec<f32> {
    let mut values = Vec::with_capacity(SIZE[0] * SIZE[1]);
    for y in 0..SIZE[1] {
        for x in 0..SIZE[0] {
            let dx = x as f64 - center[0];
            let dy = y as f64 - center[1];
            values.push((-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp() as f32);
        }
    }
    values
}

/// Moving image resampled at `x + u(x)`.
fn warp(moving: &Image<Backend, 2>, displacement: &[Vector<2>]) -> anyhow::Result<Vec<f32>> {
    let buffer = moving.to_buffer()?;
    let interpolator = LinearInterpolator::new();
    let mut warped = Vec::with_capacity(displacement.len());
    for y in 0..SIZE[1] {
        for x in 0..SIZE[0] {
            let position = Point::from_index([x, y]) + displacement[x + SIZE[0] * y];
            warped.push(interpolator.evaluate(&buffer, &position) as f32);
        }
    }
    Ok(warped)
}

fn field(
    displacement: &[Vector<2>],
    spacing: Spacing<2>,
    device: &<Backend as burn::tensor::backend::Backend>::Device,
) -> anyhow::Result<DisplacementField<Backend, 2>> {
    let shape = [SIZE[1], SIZE[0]];
    let components = (0..2)
        .map(|axis| {
            let values: Vec<f32> = displacement.iter().map(|u| u[axis] as f32).collect();
            Tensor::<Backend, 2>::from_data(TensorData::new(values, shape), device)
        })
        .collect();
    Ok(DisplacementField::from_components(components, spacing)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let device = Default::default();
    let spacing = Spacing::uniform(1.0);

    let fixed = Image::<Backend, 2>::from_values(blob([16.0, 16.0], 4.0), SIZE, spacing, &device)?;
    let moving = Image::<Backend, 2>::from_values(blob([17.5, 16.0], 4.0), SIZE, spacing, &device)?;

    let history = EventHistory::new();
    let observers = ObserverSet::new()
        .with_observer(Arc::new(RegistrationLogger::new()))
        .with_observer(Arc::new(history.clone()));

    for (level, gradient_type) in [GradientType::WarpedMoving, GradientType::Fixed, GradientType::Symmetric]
        .into_iter()
        .enumerate()
    {
        println!("Gradient type: {:?}", gradient_type);
        observers.level_initialized(level);

        let config = SsdForceConfig::new()
            .with_gradient_type(gradient_type)
            .with_time_step(2.0);
        let mut displacement = vec![Vector::zeros(); SIZE[0] * SIZE[1]];

        for iteration in 0..ITERATIONS {
            let warped = Image::<Backend, 2>::from_values(warp(&moving, &displacement)?, SIZE, spacing, &device)?;
            let current = field(&displacement, spacing, &device)?;

            let mut function = SsdForceFunction::new(config);
            function.set_fixed_image(&fixed);
            function.set_warped_image(&warped);
            function.set_displacement_field(&current);
            function.initialize_iteration()?;

            let pass = compute_update_pass(function.kernel()?, rayon::current_num_threads())?;
            for (u, update) in displacement.iter_mut().zip(pass.updates()) {
                *u += *update;
            }
            observers.iteration_completed(iteration, pass.metric(), pass.rms_update());
        }

        let center = displacement[16 + SIZE[0] * 16];
        println!("  Displacement at blob centre: ({:.3}, {:.3})", center[0], center[1]);
        observers.level_completed(level + 1);
    }

    let metrics = history.metrics();
    if let (Some(first), Some(last)) = (metrics.first(), metrics.last()) {
        println!("Metric: {:.6} -> {:.6} over {} iterations", first, last, metrics.len());
    }

    Ok(())
}
